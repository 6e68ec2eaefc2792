//! Recording collaborators shared by the integration scenarios.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use fight_core::{
    AnimationOracle, AttackAttribute, CommandOracle, EffectRef, EffectsOracle, EntityHandle, Env,
    Facing, FightConfig, FightEngine, FightState, FighterDefinition, HitOverride,
    HitOverrideOracle, ProjectileContact, ProjectileOracle, RootId, ScriptOracle, SparkRequest,
    StageBounds, StageOracle, StateNo, Vec2,
};

/// State number scripts use for a plain attack.
pub const ATTACK: StateNo = StateNo(200);
/// Custom reaction authored in P1's table and run by P2.
pub const THROWN: StateNo = StateNo(800);

pub type Handler = Box<dyn Fn(&mut FightEngine<'_>, EntityHandle)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub entity: EntityHandle,
    pub table: RootId,
    pub state: StateNo,
    pub time: i32,
}

/// Script interpreter that knows the common state numbers, records every
/// evaluation and optionally runs a handler per (table, state).
pub struct TestScript {
    states: [HashSet<StateNo>; 2],
    handlers: HashMap<(RootId, StateNo), Handler>,
    pub evaluations: RefCell<Vec<Evaluation>>,
}

impl TestScript {
    pub fn new() -> Self {
        let common: HashSet<StateNo> = [
            StateNo::STAND,
            StateNo::CROUCH,
            StateNo::AIR,
            StateNo::GUARD_START,
            StateNo::GUARD_END,
            StateNo::GUARD_HIT_STAND,
            StateNo::GUARD_HIT_CROUCH,
            StateNo::GUARD_HIT_AIR,
            StateNo::HIT_STAND,
            StateNo::HIT_CROUCH,
            StateNo::HIT_AIR,
            StateNo::HIT_TRIP,
            StateNo::HIT_LYING,
            StateNo::LIE_DOWN,
            StateNo::GET_UP,
            ATTACK,
        ]
        .into_iter()
        .collect();
        let mut p1 = common.clone();
        p1.insert(THROWN);
        Self {
            states: [p1, common],
            handlers: HashMap::new(),
            evaluations: RefCell::new(Vec::new()),
        }
    }

    pub fn on_state(
        &mut self,
        table: RootId,
        state: StateNo,
        handler: impl Fn(&mut FightEngine<'_>, EntityHandle) + 'static,
    ) {
        self.handlers.insert((table, state), Box::new(handler));
    }

    pub fn count(&self, entity: EntityHandle, state: StateNo) -> usize {
        self.evaluations
            .borrow()
            .iter()
            .filter(|eval| eval.entity == entity && eval.state == state)
            .count()
    }

    pub fn count_for(&self, entity: EntityHandle) -> usize {
        self.evaluations
            .borrow()
            .iter()
            .filter(|eval| eval.entity == entity)
            .count()
    }

    pub fn last_for(&self, entity: EntityHandle) -> Option<Evaluation> {
        self.evaluations
            .borrow()
            .iter()
            .rev()
            .find(|eval| eval.entity == entity)
            .copied()
    }

    pub fn clear(&self) {
        self.evaluations.borrow_mut().clear();
    }
}

impl ScriptOracle for TestScript {
    fn state_table_contains(&self, table: RootId, state: StateNo) -> bool {
        self.states[table.index()].contains(&state)
    }

    fn evaluate_state(
        &self,
        engine: &mut FightEngine<'_>,
        entity: EntityHandle,
        table: RootId,
        state: StateNo,
    ) {
        let time = engine
            .state()
            .entity(entity)
            .map_or(i32::MIN, |entity| entity.machine.time);
        self.evaluations.borrow_mut().push(Evaluation {
            entity,
            table,
            state,
            time,
        });
        if let Some(handler) = self.handlers.get(&(table, state)) {
            handler(engine, entity);
        }
    }
}

pub struct TestStage {
    pub bounds: StageBounds,
    pub reflection: f64,
}

impl TestStage {
    pub fn new() -> Self {
        Self {
            bounds: StageBounds {
                left: -160.0,
                right: 160.0,
                floor: 0.0,
            },
            reflection: 0.0,
        }
    }
}

impl StageOracle for TestStage {
    fn coordinate_p(&self) -> f64 {
        240.0
    }

    fn bounds(&self) -> StageBounds {
        self.bounds
    }

    fn start_position(&self, root: RootId) -> Vec2 {
        match root {
            RootId::P1 => Vec2::new(-40.0, 0.0),
            RootId::P2 => Vec2::new(40.0, 0.0),
        }
    }

    fn reflection_intensity(&self) -> f64 {
        self.reflection
    }
}

#[derive(Default)]
pub struct TestCommands {
    held: RefCell<HashSet<(RootId, String)>>,
}

impl TestCommands {
    pub fn hold(&self, root: RootId, command: &str) {
        self.held.borrow_mut().insert((root, command.to_string()));
    }

    pub fn release(&self, root: RootId, command: &str) {
        self.held.borrow_mut().remove(&(root, command.to_string()));
    }
}

impl CommandOracle for TestCommands {
    fn is_command_active(&self, root: RootId, command: &str) -> bool {
        self.held.borrow().contains(&(root, command.to_string()))
    }
}

#[derive(Default)]
pub struct RecordingEffects {
    pub sparks: RefCell<Vec<SparkRequest>>,
    pub sounds: RefCell<Vec<(RootId, EffectRef)>>,
}

impl EffectsOracle for RecordingEffects {
    fn spawn_spark(&self, request: SparkRequest) {
        self.sparks.borrow_mut().push(request);
    }

    fn play_sound(&self, owner: RootId, sound: EffectRef) {
        self.sounds.borrow_mut().push((owner, sound));
    }
}

#[derive(Default)]
pub struct RecordingProjectiles {
    pub contacts: RefCell<Vec<(EntityHandle, EntityHandle, ProjectileContact)>>,
}

impl ProjectileOracle for RecordingProjectiles {
    fn on_contact(&self, projectile: EntityHandle, other: EntityHandle, contact: ProjectileContact) {
        self.contacts.borrow_mut().push((projectile, other, contact));
    }
}

#[derive(Default)]
pub struct TestOverrides {
    pub rule: Cell<Option<HitOverride>>,
}

impl HitOverrideOracle for TestOverrides {
    fn find_override(&self, _defender: EntityHandle, _attack: &AttackAttribute) -> Option<HitOverride> {
        self.rule.get()
    }
}

#[derive(Default)]
pub struct TestAnimation {
    pub remaining: Cell<i32>,
}

impl AnimationOracle for TestAnimation {
    fn remaining_time(&self, _entity: EntityHandle) -> i32 {
        self.remaining.get()
    }
}

/// A loaded match plus every collaborator, ready to hand out engines.
pub struct Harness {
    pub state: FightState,
    pub script: TestScript,
    pub stage: TestStage,
    pub commands: TestCommands,
    pub effects: RecordingEffects,
    pub projectiles: RecordingProjectiles,
    pub overrides: TestOverrides,
    pub animation: TestAnimation,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(FightConfig::default())
    }

    pub fn with_config(config: FightConfig) -> Self {
        let stage = TestStage::new();
        let fighter = Arc::new(FighterDefinition::default());
        let state = FightState::load_match(config, [Arc::clone(&fighter), fighter], &stage);
        Self {
            state,
            script: TestScript::new(),
            stage,
            commands: TestCommands::default(),
            effects: RecordingEffects::default(),
            projectiles: RecordingProjectiles::default(),
            overrides: TestOverrides::default(),
            animation: TestAnimation::default(),
        }
    }

    pub fn engine(&mut self) -> FightEngine<'_> {
        let env = Env::with_all(
            &self.script,
            &self.stage,
            &self.commands,
            &self.effects,
            &self.projectiles,
            &self.overrides,
            &self.animation,
        )
        .into_fight_env();
        FightEngine::new(&mut self.state, env)
    }

    pub fn tick(&mut self) -> u32 {
        self.engine().tick()
    }

    pub fn run(&mut self, ticks: usize) {
        let mut engine = self.engine();
        for _ in 0..ticks {
            engine.tick();
        }
    }

    pub fn p1(&self) -> EntityHandle {
        self.state.root_handle(RootId::P1).expect("p1 loaded")
    }

    pub fn p2(&self) -> EntityHandle {
        self.state.root_handle(RootId::P2).expect("p2 loaded")
    }

    pub fn place(&mut self, entity: EntityHandle, x: f64, facing: Facing) {
        let entity = self.state.entity_mut(entity).expect("entity is live");
        entity.body.position = Vec2::new(x, 0.0);
        entity.facing = facing;
    }
}
