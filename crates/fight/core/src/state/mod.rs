//! Match world: the entity arena, the clock and the match configuration.
//!
//! There is no ambient global state. Everything a tick touches lives in
//! [`FightState`], created by [`FightState::load_match`] and torn down by
//! [`FightState::unload_match`]. Operations that need collaborators go
//! through [`crate::engine::FightEngine`].
mod store;
pub mod types;

use std::sync::Arc;

use tracing::{debug, info};

pub use store::{EntityStore, StoreError};
pub use types::{
    Body, BodySize, CombatStatus, DefeatRecord, EffectRef, Entity, EntityHandle, EntityKind,
    Facing, FighterDefinition, HitPause, MachineOwner, MoveContact, MoveType, ReflectionRender,
    RenderAttributes, RootId, ShadowRender, StateMachine, StateNo, StateType, Tick, TickFlags,
    Vec2,
};

use crate::clock::Clock;
use crate::config::FightConfig;
use crate::env::StageOracle;
use crate::error::report;

/// Complete mutable state of a match.
#[derive(Clone, Debug)]
pub struct FightState {
    pub store: EntityStore,
    pub clock: Clock,
    pub config: FightConfig,
    /// Inner updates run since the match was loaded.
    pub tick: Tick,
    pub round: u32,
    fighters: [Option<Arc<FighterDefinition>>; 2],
}

impl FightState {
    /// Creates an empty world with no fighters loaded.
    pub fn new(config: FightConfig) -> Self {
        Self {
            store: EntityStore::new(),
            clock: Clock::new(config.speed),
            config,
            tick: Tick::ZERO,
            round: 1,
            fighters: [None, None],
        }
    }

    /// Creates both roots from their definitions at the stage's start positions.
    pub fn load_match(
        config: FightConfig,
        fighters: [Arc<FighterDefinition>; 2],
        stage: &dyn StageOracle,
    ) -> Self {
        let mut state = Self::new(config);
        for (root, definition) in RootId::ALL.into_iter().zip(fighters) {
            state.fighters[root.index()] = Some(Arc::clone(&definition));
            let position = Self::start_position(root, &definition, stage);
            state
                .store
                .create_root(root, definition, position, stage.start_facing(root));
        }
        state.apply_start_life();
        info!(
            p1 = state.fighter_name(RootId::P1),
            p2 = state.fighter_name(RootId::P2),
            "match loaded"
        );
        state
    }

    /// Destroys every entity and clears the clock.
    pub fn unload_match(&mut self) {
        self.store.clear();
        self.clock.reset();
        self.fighters = [None, None];
        self.tick = Tick::ZERO;
        info!("match unloaded");
    }

    pub fn is_loaded(&self) -> bool {
        self.store.root(RootId::P1).is_some() && self.store.root(RootId::P2).is_some()
    }

    /// Starts the next round: helpers and projectiles go away, roots return to
    /// their start positions with restored life. Power carries over.
    pub fn reset_round(&mut self, stage: &dyn StageOracle) {
        let carried_power: Vec<(RootId, i32)> = RootId::ALL
            .into_iter()
            .filter_map(|root| {
                let handle = self.store.root(root)?;
                Some((root, self.store.get(handle)?.power))
            })
            .collect();

        self.store.clear();
        self.clock.reset();
        for root in RootId::ALL {
            let Some(definition) = self.fighters[root.index()].clone() else {
                continue;
            };
            let position = Self::start_position(root, &definition, stage);
            self.store
                .create_root(root, definition, position, stage.start_facing(root));
        }
        for (root, power) in carried_power {
            if let Some(entity) = self.root_entity_mut(root) {
                entity.power = power;
            }
        }
        self.apply_start_life();
        self.round += 1;
        debug!(round = self.round, "round reset");
    }

    fn start_position(root: RootId, definition: &FighterDefinition, stage: &dyn StageOracle) -> Vec2 {
        crate::physics::rescale(
            stage.start_position(root),
            definition.coordinate_p,
            stage.coordinate_p(),
        )
    }

    fn apply_start_life(&mut self) {
        let percent = i64::from(self.config.start_life_percent);
        for root in RootId::ALL {
            if let Some(entity) = self.root_entity_mut(root) {
                let life_max = i64::from(entity.life_max());
                entity.life = (life_max * percent / 100).clamp(0, life_max) as i32;
            }
        }
    }

    fn fighter_name(&self, root: RootId) -> &str {
        self.fighters[root.index()]
            .as_deref()
            .map_or("", |definition| definition.name.as_str())
    }

    pub fn root_handle(&self, root: RootId) -> Option<EntityHandle> {
        self.store.root(root)
    }

    pub fn root_entity(&self, root: RootId) -> Option<&Entity> {
        self.store.root(root).and_then(|handle| self.store.get(handle))
    }

    pub fn root_entity_mut(&mut self, root: RootId) -> Option<&mut Entity> {
        let handle = self.store.root(root)?;
        self.store.get_mut(handle)
    }

    pub fn entity(&self, handle: EntityHandle) -> Option<&Entity> {
        self.store.get(handle)
    }

    pub fn entity_mut(&mut self, handle: EntityHandle) -> Option<&mut Entity> {
        self.store.get_mut(handle)
    }

    /// Spawns a helper under `parent`; failures are logged.
    pub fn create_helper(&mut self, parent: EntityHandle) -> Option<EntityHandle> {
        self.store.create_helper(parent).map_err(|err| report(&err)).ok()
    }

    /// Spawns a projectile for `creator`'s root; failures are logged.
    pub fn create_projectile(&mut self, creator: EntityHandle) -> Option<EntityHandle> {
        self.store
            .create_projectile(creator)
            .map_err(|err| report(&err))
            .ok()
    }

    /// Destroys a helper or projectile. Roots are reported and left alone.
    pub fn destroy(&mut self, handle: EntityHandle) -> bool {
        self.store.destroy(handle).map_err(|err| report(&err)).is_ok()
    }

    /// Marks a helper for removal by the end-of-tick sweep.
    pub fn request_destroy(&mut self, handle: EntityHandle) {
        if let Some(entity) = self.store.get_mut(handle) {
            entity.destroy_requested = true;
        }
    }

    /// Removes every entity flagged by [`Self::request_destroy`].
    pub(crate) fn sweep_destroyed(&mut self) {
        let doomed: Vec<EntityHandle> = self
            .store
            .walk_all()
            .into_iter()
            .filter(|handle| {
                self.store
                    .get(*handle)
                    .is_some_and(|entity| entity.destroy_requested)
            })
            .collect();
        for handle in doomed {
            self.destroy(handle);
        }
    }

    /// Sets power, clamped to `[0, power_max]`.
    pub fn set_power(&mut self, handle: EntityHandle, power: i32) {
        if let Some(entity) = self.store.get_mut(handle) {
            entity.power = power.clamp(0, entity.power_max());
        }
    }

    pub fn add_power(&mut self, handle: EntityHandle, delta: i32) {
        if let Some(power) = self.store.get(handle).map(|entity| entity.power) {
            self.set_power(handle, power.saturating_add(delta));
        }
    }

    /// Sets life directly, clamped to `[0, life_max]`. Does not trigger a knockout.
    pub fn set_life(&mut self, handle: EntityHandle, life: i32) {
        if let Some(entity) = self.store.get_mut(handle) {
            entity.life = life.clamp(0, entity.life_max());
        }
    }

    pub fn set_control(&mut self, handle: EntityHandle, control: bool) {
        if let Some(entity) = self.store.get_mut(handle) {
            entity.control = control;
        }
    }

    pub fn set_state_type(&mut self, handle: EntityHandle, stance: StateType) {
        if let Some(entity) = self.store.get_mut(handle) {
            entity.state_type = stance;
        }
    }

    pub fn set_move_type(&mut self, handle: EntityHandle, move_type: MoveType) {
        if let Some(entity) = self.store.get_mut(handle) {
            entity.move_type = move_type;
        }
    }

    /// Asserts one-tick flags on `handle`; they clear before its next evaluation.
    pub fn assert_flags(&mut self, handle: EntityHandle, flags: TickFlags) {
        if let Some(entity) = self.store.get_mut(handle) {
            entity.flags |= flags;
        }
    }

    /// Life of `root`, for UI and AI.
    pub fn life(&self, root: RootId) -> Option<i32> {
        self.root_entity(root).map(|entity| entity.life)
    }

    pub fn power(&self, root: RootId) -> Option<i32> {
        self.root_entity(root).map(|entity| entity.power)
    }

    pub fn state_no(&self, root: RootId) -> Option<StateNo> {
        self.root_entity(root).map(|entity| entity.machine.state)
    }

    pub fn stance(&self, root: RootId) -> Option<StateType> {
        self.root_entity(root).map(|entity| entity.state_type)
    }

    /// Displayed combo count of `root` against its opponent.
    pub fn combo(&self, root: RootId) -> Option<u32> {
        self.root_entity(root).map(|entity| entity.combat.combo)
    }
}
