#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Capability hooks for the auxiliary chat-UI controls.
//!
//! The chat surface exposes five buttons beyond the directional pad: health
//! potion, stamina potion, attack, retreat and buff. None of them carry
//! behaviour yet, but each press still flows through this system so a future
//! feature only has to supply a richer [`InteractionHooks`] implementation
//! instead of rewiring the collaborator or touching the expedition state
//! machine.

use expedition_core::{Command, InteractionSlot};
use expedition_world::Expedition;

/// Capability set invoked when the player presses an auxiliary control.
///
/// Implementations inspect the expedition read-only and respond with
/// follow-up commands for the collaborator to apply; the default responds
/// with none, matching the stub handlers of the original chat bot.
pub trait InteractionHooks {
    /// Reacts to the provided control slot being pressed.
    fn on_interact(
        &mut self,
        slot: InteractionSlot,
        expedition: &Expedition,
        out_commands: &mut Vec<Command>,
    );
}

/// Default hook set where every auxiliary control is a no-op.
#[derive(Debug, Default)]
pub struct NoopHooks;

impl InteractionHooks for NoopHooks {
    fn on_interact(
        &mut self,
        _slot: InteractionSlot,
        _expedition: &Expedition,
        _out_commands: &mut Vec<Command>,
    ) {
    }
}

/// Routes a control press through the provided hooks.
pub fn dispatch(
    hooks: &mut dyn InteractionHooks,
    slot: InteractionSlot,
    expedition: &Expedition,
    out_commands: &mut Vec<Command>,
) {
    hooks.on_interact(slot, expedition, out_commands);
}

#[cfg(test)]
mod tests {
    use expedition_core::{Command, Direction, ExpeditionConfig, InteractionSlot};
    use expedition_world::Expedition;

    use super::{dispatch, InteractionHooks, NoopHooks};

    #[test]
    fn noop_hooks_emit_no_commands() {
        let expedition =
            Expedition::new(ExpeditionConfig::with_defaults(1)).expect("default config");
        let mut hooks = NoopHooks;
        let mut commands = Vec::new();

        for slot in [
            InteractionSlot::HealthPotion,
            InteractionSlot::StaminaPotion,
            InteractionSlot::Attack,
            InteractionSlot::Retreat,
            InteractionSlot::Buff,
        ] {
            dispatch(&mut hooks, slot, &expedition, &mut commands);
        }

        assert!(commands.is_empty());
    }

    #[test]
    fn custom_hooks_can_translate_presses_into_commands() {
        struct RetreatHooks;

        impl InteractionHooks for RetreatHooks {
            fn on_interact(
                &mut self,
                slot: InteractionSlot,
                _expedition: &Expedition,
                out_commands: &mut Vec<Command>,
            ) {
                if slot == InteractionSlot::Retreat {
                    out_commands.push(Command::Move {
                        direction: Direction::Down,
                    });
                }
            }
        }

        let expedition =
            Expedition::new(ExpeditionConfig::with_defaults(1)).expect("default config");
        let mut hooks = RetreatHooks;
        let mut commands = Vec::new();

        dispatch(
            &mut hooks,
            InteractionSlot::Attack,
            &expedition,
            &mut commands,
        );
        assert!(commands.is_empty());

        dispatch(
            &mut hooks,
            InteractionSlot::Retreat,
            &expedition,
            &mut commands,
        );
        assert_eq!(
            commands,
            vec![Command::Move {
                direction: Direction::Down,
            }]
        );
    }
}
