#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares a new expedition session.

use expedition_core::{GridDimensions, Level, WELCOME_BANNER};
use expedition_world::{query, Expedition};

/// Produces the data an adapter needs to greet the player.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the session starts.
    #[must_use]
    pub fn welcome_banner(&self, _expedition: &Expedition) -> &'static str {
        WELCOME_BANNER
    }

    /// Exposes the grid dimensions required for the first render.
    #[must_use]
    pub fn grid(&self, expedition: &Expedition) -> GridDimensions {
        query::grid(expedition)
    }

    /// Exposes the level the expedition begins on.
    #[must_use]
    pub fn starting_level(&self, expedition: &Expedition) -> Level {
        query::level(expedition)
    }
}
