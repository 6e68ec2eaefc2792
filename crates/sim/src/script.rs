//! Table-driven script interpreter.
//!
//! Each fighter's [`StateTable`] says what a state sets up on entry, when its
//! attack is armed and which transition leaves it. The same object answers
//! animation queries, since animation length is part of the state table.

use std::cell::RefCell;
use std::collections::HashMap;

use fight_content::{AttackWindow, FighterContent, StateSpec, StateTable, Transition};
use fight_core::physics::{coordinate_scale, rescale};
use fight_core::{
    AnimationOracle, EntityHandle, FightEngine, HitDefinition, RootId, ScriptOracle, StageOracle,
    StateNo, Vec2,
};
use tracing::{trace, warn};

pub struct TableScript {
    fighters: [FighterContent; 2],
    /// (table, state, time) each entity last evaluated, for animation queries.
    playing: RefCell<HashMap<EntityHandle, (RootId, StateNo, i32)>>,
}

impl TableScript {
    pub fn new(p1: FighterContent, p2: FighterContent) -> Self {
        Self {
            fighters: [p1, p2],
            playing: RefCell::new(HashMap::new()),
        }
    }

    pub fn fighter(&self, root: RootId) -> &FighterContent {
        &self.fighters[root.index()]
    }

    pub fn table(&self, root: RootId) -> &StateTable {
        &self.fighter(root).states
    }

    /// Attack window of `state` in `table`'s state table.
    pub fn attack_window(&self, table: RootId, state: StateNo) -> Option<&AttackWindow> {
        self.table(table).get(state)?.attack.as_ref()
    }

    fn hit(&self, table: RootId, name: &str) -> Option<&HitDefinition> {
        self.fighter(table).hits.get(name)
    }

    /// Coordinate units the table's authored values are expressed in.
    fn authored_p(&self, table: RootId) -> f64 {
        self.fighter(table).definition.coordinate_p
    }

    fn enter(
        &self,
        engine: &mut FightEngine<'_>,
        entity: EntityHandle,
        table: RootId,
        spec: &StateSpec,
    ) {
        let caller_p = self.authored_p(table);
        let state = engine.state_mut();
        if let Some(stance) = spec.stance {
            state.set_state_type(entity, stance);
        }
        if let Some(move_type) = spec.move_type {
            state.set_move_type(entity, move_type);
        }
        if let Some(control) = spec.control {
            state.set_control(entity, control);
        }
        if let Some(velocity) = spec.velocity {
            state.set_velocity(entity, velocity, caller_p);
        }
        if let Some(acceleration) = spec.acceleration {
            state.set_acceleration(entity, acceleration, caller_p);
        }
        if spec.snap_to_floor {
            self.snap_to_floor(engine, entity);
        }
    }

    fn snap_to_floor(&self, engine: &mut FightEngine<'_>, entity: EntityHandle) {
        let Ok(stage) = engine.env().stage() else {
            return;
        };
        let stage_p = stage.coordinate_p();
        let floor = stage.bounds().floor;
        let state = engine.state_mut();
        let Some((position, horizontal, own_p)) = state.entity(entity).map(|current| {
            (
                rescale(current.body.position, stage_p, current.coordinate_p()),
                current.body.velocity.x * current.facing.sign(),
                current.coordinate_p(),
            )
        }) else {
            return;
        };
        state.set_position(entity, Vec2::new(position.x, floor), stage_p);
        state.set_velocity(entity, Vec2::new(horizontal, 0.0), own_p);
        state.set_acceleration(entity, Vec2::ZERO, own_p);
    }

    /// Arms the window's hit when it opens and disarms it once it closes.
    ///
    /// A hit that connects disarms itself, so it is not re-armed for the rest
    /// of the window.
    fn update_attack(
        &self,
        engine: &mut FightEngine<'_>,
        entity: EntityHandle,
        table: RootId,
        spec: &StateSpec,
        time: i32,
    ) {
        let armed = engine
            .state()
            .entity(entity)
            .is_some_and(|entity| entity.combat.armed.is_some());
        match spec.attack.as_ref() {
            Some(window) if time == window.start => match self.hit(table, &window.hit) {
                Some(definition) => engine.state_mut().arm_attack(entity, definition.clone()),
                None => warn!(%entity, hit = %window.hit, "unknown hit in attack window"),
            },
            Some(window) if window.is_open(time) => {}
            _ if armed => engine.state_mut().disarm_attack(entity),
            _ => {}
        }
    }

    fn is_satisfied(
        &self,
        engine: &FightEngine<'_>,
        entity: EntityHandle,
        transition: &Transition,
        time: i32,
    ) -> bool {
        let Some(current) = engine.state().entity(entity) else {
            return false;
        };
        if transition.after.is_some_and(|after| time < after) {
            return false;
        }
        if let Some(command) = transition.command.as_deref() {
            let held = engine
                .env()
                .commands()
                .is_ok_and(|commands| commands.is_command_active(current.root, command));
            if !current.control || !held {
                return false;
            }
        }
        if transition.hit_over && !current.is_hit_over() {
            return false;
        }
        if transition.landed {
            let Ok(stage) = engine.env().stage() else {
                return false;
            };
            let scale = coordinate_scale(current.coordinate_p(), stage.coordinate_p());
            let floor = stage.bounds().floor * scale;
            if current.body.position.y < floor || current.body.velocity.y < 0.0 {
                return false;
            }
        }
        true
    }
}

impl ScriptOracle for TableScript {
    fn state_table_contains(&self, table: RootId, state: StateNo) -> bool {
        self.table(table).contains(state)
    }

    fn evaluate_state(
        &self,
        engine: &mut FightEngine<'_>,
        entity: EntityHandle,
        table: RootId,
        state: StateNo,
    ) {
        let Some(spec) = self.table(table).get(state) else {
            return;
        };
        let Some(time) = engine.state().entity(entity).map(|entity| entity.machine.time) else {
            return;
        };
        self.playing.borrow_mut().insert(entity, (table, state, time));

        if time == 0 {
            self.enter(engine, entity, table, spec);
        }
        self.update_attack(engine, entity, table, spec, time);

        let next = spec
            .transitions
            .iter()
            .find(|transition| self.is_satisfied(engine, entity, transition, time))
            .map(Transition::target);
        if let Some(next) = next {
            trace!(%entity, from = state.0, to = next.0, time, "transition");
            engine.change_state(entity, next);
        }
    }
}

impl AnimationOracle for TableScript {
    fn remaining_time(&self, entity: EntityHandle) -> i32 {
        match self.playing.borrow().get(&entity) {
            Some(&(table, state, time)) => self.table(table).remaining_time(state, time),
            None => i32::MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, JAB};

    #[test]
    fn tables_are_looked_up_per_root() {
        let script = fixtures::script();
        assert!(script.state_table_contains(RootId::P2, JAB));
        assert!(!script.state_table_contains(RootId::P1, StateNo(9999)));
        assert_eq!(script.fighter(RootId::P2).definition.name, "beta");
        assert_eq!(
            script.attack_window(RootId::P1, JAB).map(|window| window.reach),
            Some(30.0)
        );
        assert!(script.attack_window(RootId::P1, StateNo::STAND).is_none());
    }
}
