use std::time::{Duration, Instant};

use expedition_core::{Command, Event, ExpeditionConfig};
use expedition_world::{self as world, consume_notice, Expedition, ExpeditionError};

/// Inactivity window after which a session is discarded, matching the
/// five-minute interaction timeout of the original chat view.
pub(crate) const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(300);

/// One player's expedition plus the inactivity bookkeeping the collaborator
/// owns. The expedition itself carries no teardown obligations; an expired
/// session is simply dropped.
#[derive(Debug)]
pub(crate) struct Session {
    expedition: Expedition,
    config: ExpeditionConfig,
    timeout: Duration,
    last_activity: Instant,
}

impl Session {
    pub(crate) fn start(config: ExpeditionConfig, timeout: Duration) -> Result<Self, ExpeditionError> {
        Ok(Self {
            expedition: Expedition::new(config)?,
            config,
            timeout,
            last_activity: Instant::now(),
        })
    }

    pub(crate) fn expedition(&self) -> &Expedition {
        &self.expedition
    }

    pub(crate) fn config(&self) -> ExpeditionConfig {
        self.config
    }

    /// Applies a command on behalf of the player and refreshes the
    /// inactivity clock.
    pub(crate) fn submit(
        &mut self,
        command: Command,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ExpeditionError> {
        self.last_activity = Instant::now();
        world::apply(&mut self.expedition, command, out_events)
    }

    pub(crate) fn take_notice(&mut self) -> String {
        consume_notice(&mut self.expedition)
    }

    pub(crate) fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.last_activity) >= self.timeout
    }
}
