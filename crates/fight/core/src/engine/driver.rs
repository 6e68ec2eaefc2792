//! State transitions, evaluation and pause control.
//!
//! The driver never interprets a state. It only decides whether a transition
//! is legal, records it on the entity's [`StateMachine`] and asks the script
//! oracle to run the state's first tick.
//!
//! [`StateMachine`]: crate::state::StateMachine

use tracing::trace;

use super::{FightEngine, TransitionError};
use crate::config::FightConfig;
use crate::error::report;
use crate::state::{Entity, EntityHandle, MachineOwner, MoveContact, RootId, StateMachine, StateNo};

impl<'a> FightEngine<'a> {
    /// Moves `entity` to `state` and evaluates its first tick.
    ///
    /// An entity in control that is running a borrowed table is switched back
    /// to its own table first. Unknown states are logged and leave the entity
    /// where it was.
    pub fn change_state(&mut self, entity: EntityHandle, state: StateNo) -> bool {
        self.try_change_state(entity, state, true)
            .map_err(|err| report(&err))
            .is_ok()
    }

    /// Same as [`Self::change_state`] but waits for the next state-machine pass
    /// to run the new state.
    pub fn change_state_without_evaluation(&mut self, entity: EntityHandle, state: StateNo) -> bool {
        self.try_change_state(entity, state, false)
            .map_err(|err| report(&err))
            .is_ok()
    }

    /// Runs `state` from `other`'s state table on `entity`.
    ///
    /// Used for get-hit reactions authored by the attacker.
    pub fn change_state_to_other_state_machine(
        &mut self,
        entity: EntityHandle,
        other: EntityHandle,
        state: StateNo,
    ) -> bool {
        self.try_change_state_to_other(entity, other, state)
            .map_err(|err| report(&err))
            .is_ok()
    }

    /// Returns `entity` to its own state table without changing its state number.
    pub fn return_to_own_state_machine(&mut self, entity: EntityHandle) {
        if let Some(entity) = self.state.store.get_mut(entity) {
            entity.machine.owner = MachineOwner::Own;
        }
    }

    fn try_change_state(
        &mut self,
        handle: EntityHandle,
        state: StateNo,
        evaluate: bool,
    ) -> Result<(), TransitionError> {
        let entity = self.state.store.try_get_mut(handle)?;
        if entity.control && matches!(entity.machine.owner, MachineOwner::BorrowingFrom(_)) {
            entity.machine.owner = MachineOwner::Own;
        }
        let owner = entity.machine.owner;
        let own_root = entity.root;

        let table = self.table_of(own_root, owner);
        self.ensure_state_exists(handle, table, state)?;

        let entity = self.state.store.try_get_mut(handle)?;
        enter_state(entity, state);
        trace!(%handle, state = state.0, %table, "state changed");

        if evaluate {
            self.evaluate_if_ready(handle)?;
        }
        Ok(())
    }

    fn try_change_state_to_other(
        &mut self,
        handle: EntityHandle,
        other: EntityHandle,
        state: StateNo,
    ) -> Result<(), TransitionError> {
        let table = self.state.store.try_get(other)?.root;
        self.ensure_state_exists(handle, table, state)?;

        let entity = self.state.store.try_get_mut(handle)?;
        entity.machine.owner = if other == handle {
            MachineOwner::Own
        } else {
            MachineOwner::BorrowingFrom(other)
        };
        enter_state(entity, state);
        trace!(%handle, %other, state = state.0, "state changed to borrowed table");

        self.evaluate_if_ready(handle)
    }

    fn ensure_state_exists(
        &self,
        entity: EntityHandle,
        table: RootId,
        state: StateNo,
    ) -> Result<(), TransitionError> {
        let script = self.env.script()?;
        if script.state_table_contains(table, state) {
            Ok(())
        } else {
            Err(TransitionError::UnknownState {
                entity,
                table,
                state,
            })
        }
    }

    /// Root whose table `owner` refers to. A vanished lender falls back to
    /// the entity's own table.
    pub(crate) fn table_of(&self, own_root: RootId, owner: MachineOwner) -> RootId {
        match owner {
            MachineOwner::Own => own_root,
            MachineOwner::BorrowingFrom(lender) => self
                .state
                .store
                .get(lender)
                .map_or(own_root, |lender| lender.root),
        }
    }

    /// Returns true if `entity` may run its state this inner update.
    pub(crate) fn can_evaluate(&self, entity: EntityHandle) -> bool {
        self.state.clock.can_advance(entity)
            && self
                .state
                .store
                .get(entity)
                .is_some_and(|entity| entity.machine.enabled && !entity.is_paused())
    }

    fn evaluate_if_ready(&mut self, entity: EntityHandle) -> Result<(), TransitionError> {
        if self.can_evaluate(entity) {
            self.evaluate(entity)
        } else {
            Ok(())
        }
    }

    /// Runs one tick of `entity`'s current state through the script oracle.
    pub(crate) fn evaluate(&mut self, handle: EntityHandle) -> Result<(), TransitionError> {
        if self.depth >= FightConfig::MAX_EVALUATION_DEPTH {
            return Err(TransitionError::EvaluationTooDeep {
                entity: handle,
                depth: self.depth,
            });
        }
        let script = self.env.script()?;

        let entity = self.state.store.try_get_mut(handle)?;
        entity.machine.time += 1;
        let (own_root, owner, state) = (entity.root, entity.machine.owner, entity.machine.state);
        let table = self.table_of(own_root, owner);

        self.depth += 1;
        script.evaluate_state(self, handle, table, state);
        self.depth -= 1;
        Ok(())
    }

    /// Freezes `entity`'s physics, animation and state evaluation.
    pub fn pause(&mut self, entity: EntityHandle) {
        if let Some(entity) = self.state.store.get_mut(entity) {
            entity.frozen = true;
        }
    }

    pub fn resume(&mut self, entity: EntityHandle) {
        if let Some(entity) = self.state.store.get_mut(entity) {
            entity.frozen = false;
        }
    }

    /// Starts a local hit-pause of `duration` ticks. Projectiles never shake.
    pub fn set_hit_paused(&mut self, entity: EntityHandle, duration: u32) {
        let Some(entity) = self.state.store.get_mut(entity) else {
            return;
        };
        if entity.is_projectile() || duration == 0 {
            return;
        }
        entity.hit_pause.active = true;
        entity.hit_pause.elapsed = 0;
        entity.hit_pause.duration = duration;
    }

    /// Freezes every entity except `mover` for `duration` inner updates.
    pub fn pause_all(&mut self, duration: u32, mover: Option<EntityHandle>) {
        self.state.clock.pause_all(duration, mover);
    }

    pub fn resume_all(&mut self) {
        self.state.clock.resume_all();
    }

    /// Sets the time dilation factor used from the next outer tick on.
    pub fn set_speed(&mut self, factor: f64) {
        self.state.clock.set_speed(factor);
    }
}

/// Records a transition on the entity's machine and clears per-move bookkeeping.
fn enter_state(entity: &mut Entity, state: StateNo) {
    let machine = &mut entity.machine;
    machine.previous = machine.state;
    machine.state = state;
    machine.time = StateMachine::JUST_ENTERED;
    machine.transitions = machine.transitions.wrapping_add(1);

    let combat = &mut entity.combat;
    combat.armed = None;
    combat.move_contact = MoveContact::None;
    combat.hit_count = 0;
    combat.contact_ticks = 0;
}
