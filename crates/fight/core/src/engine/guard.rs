//! Automatic guarding for roots.

use tracing::debug;

use super::FightEngine;
use crate::env::GUARD_COMMAND;
use crate::physics::coordinate_scale;
use crate::state::{Entity, EntityHandle, MoveType, StateNo};

impl<'a> FightEngine<'a> {
    /// Starts guarding when the guard command is held against a threatening attack.
    pub(crate) fn update_guarding(&mut self, root: EntityHandle) {
        let Some(entity) = self.state.store.get(root) else {
            return;
        };
        let eligible = entity.is_root()
            && entity.control
            && !entity.is_paused()
            && !entity.is_guarding()
            && !entity.flags.blocks_guard(entity.state_type);
        if !eligible {
            return;
        }
        let Ok(commands) = self.env.commands() else {
            return;
        };
        if !commands.is_command_active(entity.root, GUARD_COMMAND) {
            return;
        }
        if !self.is_threatened(entity) {
            return;
        }

        debug!(%root, "auto guard");
        self.change_state(root, StateNo::GUARD_START);
    }

    /// Returns true if any entity of the opponent's tree has an armed attack
    /// within its guard distance of `defender`.
    fn is_threatened(&self, defender: &Entity) -> bool {
        let store = &self.state.store;
        store
            .walk(defender.root.other())
            .into_iter()
            .filter_map(|handle| store.get(handle))
            .any(|attacker| {
                let Some(armed) = attacker.combat.armed.as_ref() else {
                    return false;
                };
                if !matches!(attacker.move_type, MoveType::Attack) {
                    return false;
                }
                let scale = coordinate_scale(defender.coordinate_p(), attacker.coordinate_p());
                let attacker_x = attacker.body.position.x * scale;
                let reach = armed.guard_distance * scale;
                (defender.body.position.x - attacker_x).abs() < reach
            })
    }

    /// Leaves the guard-end state once its animation has played out.
    pub(crate) fn finish_guard(&mut self, root: EntityHandle) {
        let Some(entity) = self.state.store.get(root) else {
            return;
        };
        if entity.machine.state != StateNo::GUARD_END || entity.is_paused() {
            return;
        }
        let Ok(animation) = self.env.animation() else {
            return;
        };
        if animation.remaining_time(root) > 0 {
            return;
        }
        if let Some(idle) = StateNo::idle_for(entity.state_type) {
            self.change_state(root, idle);
        }
    }
}
