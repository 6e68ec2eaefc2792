//! The three per-update passes.

use tracing::trace;

use super::{FightEngine, TickPhase};
use crate::combat::advance_hit_phase;
use crate::config::FightConfig;
use crate::error::report;
use crate::physics::{clamp_to_stage, integrate};
use crate::state::{EntityHandle, MoveContact, RootId, StateNo, TickFlags};

impl<'a> FightEngine<'a> {
    /// Counts down pauses and hits, follows bindings, auto-guards, then
    /// resolves every queued hit in walk order.
    pub fn run_pre_state_machine_pass(&mut self) {
        trace!(phase = TickPhase::PreStateMachine.as_str());
        for handle in self.state.store.walk_all() {
            self.pre_update(handle);
        }
        for handle in self.state.store.walk_all() {
            self.resolve_pending_hits(handle);
        }
    }

    fn pre_update(&mut self, handle: EntityHandle) {
        if !self.state.clock.can_advance(handle) {
            return;
        }
        let Some(entity) = self.state.store.get_mut(handle) else {
            return;
        };
        entity.hit_pause.advance();
        if !entity.is_paused() {
            advance_hit_phase(entity);
        }
        let is_root = entity.is_root();

        self.state.update_binding(handle);
        if is_root {
            self.update_guarding(handle);
            self.finish_guard(handle);
        }

        if let Some(entity) = self.state.store.get_mut(handle) {
            if !entity.is_paused() {
                entity.not_hit_by.iter_mut().for_each(|slot| slot.advance());
            }
        }
    }

    /// Clears one-tick flags, then evaluates every entity allowed to advance.
    pub fn run_state_machine_pass(&mut self) {
        trace!(phase = TickPhase::StateMachine.as_str());
        let order = self.state.store.walk_all();
        for handle in &order {
            if let Some(entity) = self.state.store.get_mut(*handle) {
                entity.flags = TickFlags::empty();
                entity.body.width_override = None;
            }
        }
        for handle in order {
            if !self.can_evaluate(handle) {
                continue;
            }
            if let Err(err) = self.evaluate(handle) {
                report(&err);
            }
        }
    }

    /// Moves bodies, resolves pushing and stage bounds, and sweeps removed helpers.
    pub fn run_post_state_machine_pass(&mut self) {
        trace!(phase = TickPhase::PostStateMachine.as_str());
        for handle in self.state.store.walk_all() {
            self.post_update(handle);
        }

        for root in RootId::ALL {
            let opponent_in_control = self
                .state
                .root_entity(root.other())
                .is_some_and(|opponent| opponent.control);
            if opponent_in_control {
                if let Some(entity) = self.state.root_entity_mut(root) {
                    entity.combat.combo = 0;
                }
            }
        }
        for root in RootId::ALL {
            self.state.auto_turn(root);
        }
        self.state.push_roots();
        self.clamp_to_stage();
        if self.state.config.training_mode {
            self.regenerate_training();
        }
        self.state.sweep_destroyed();
    }

    fn post_update(&mut self, handle: EntityHandle) {
        if !self.state.clock.can_advance(handle) {
            return;
        }
        let Some(entity) = self.state.store.get(handle) else {
            return;
        };
        let gets_up = entity.machine.state == StateNo::LIE_DOWN
            && !entity.is_paused()
            && entity.machine.time >= entity.definition.liedown_time;
        if gets_up {
            self.change_state(handle, StateNo::GET_UP);
        }

        let Some(entity) = self.state.store.get_mut(handle) else {
            return;
        };
        if entity.control {
            entity.combat.juggle_points = entity.definition.air_juggle;
            entity.combat.is_being_juggled = false;
        }
        integrate(entity);
        if let Some(record) = entity.defeat.as_mut() {
            record.ticks_since = record.ticks_since.saturating_add(1);
        }
        if entity.combat.move_contact != MoveContact::None {
            entity.combat.contact_ticks = entity.combat.contact_ticks.saturating_add(1);
        }
    }

    fn clamp_to_stage(&mut self) {
        let Ok(stage) = self.env.stage() else {
            return;
        };
        let (bounds, stage_p) = (stage.bounds(), stage.coordinate_p());
        for handle in self.state.store.walk_all() {
            if let Some(entity) = self.state.store.get_mut(handle) {
                if entity.binding.is_none() {
                    clamp_to_stage(entity, bounds, stage_p);
                }
            }
        }
    }

    fn regenerate_training(&mut self) {
        for root in RootId::ALL {
            let Some(entity) = self.state.root_entity_mut(root) else {
                continue;
            };
            if !entity.control {
                continue;
            }
            entity.life = (entity.life + FightConfig::TRAINING_LIFE_REGEN).min(entity.life_max());
            entity.power =
                (entity.power + FightConfig::TRAINING_POWER_REGEN).min(entity.power_max());
        }
    }
}
