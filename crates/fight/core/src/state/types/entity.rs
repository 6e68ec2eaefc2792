use std::sync::Arc;

use bitflags::bitflags;

use super::common::{EntityHandle, EntityKind, Facing, MoveType, RootId, StateNo, StateType, Vec2};
use super::fighter::FighterDefinition;
use crate::binding::Binding;
use crate::combat::{ActiveHit, HitDefinition, PendingHit};
use crate::config::FightConfig;
use crate::hitattr::{AttackAttribute, HitAttrSlot};

/// Which state table an entity is currently executing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum MachineOwner {
    #[default]
    Own,
    /// Running states authored in another entity's table (get-hit reactions).
    BorrowingFrom(EntityHandle),
}

/// Bookkeeping the driver keeps for an entity's state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateMachine {
    pub state: StateNo,
    pub previous: StateNo,
    /// Ticks spent in `state`; `-1` right after a transition, before the first evaluation.
    pub time: i32,
    pub owner: MachineOwner,
    /// Projectiles never run a state machine.
    pub enabled: bool,
    /// Monotonic count of accepted transitions.
    pub transitions: u32,
}

impl StateMachine {
    pub const JUST_ENTERED: i32 = -1;

    fn new(enabled: bool) -> Self {
        Self {
            state: StateNo::STAND,
            previous: StateNo::STAND,
            time: Self::JUST_ENTERED,
            owner: MachineOwner::Own,
            enabled,
            transitions: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    /// One-tick override of (front, back) widths.
    pub width_override: Option<(f64, f64)>,
    /// Kept inside the stage bounds each tick.
    pub screen_bound: bool,
}

/// Local freeze after contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct HitPause {
    pub active: bool,
    pub elapsed: u32,
    pub duration: u32,
}

impl HitPause {
    /// Counts one tick, clearing the pause once its duration is reached.
    pub fn advance(&mut self) {
        if !self.active {
            return;
        }
        self.elapsed += 1;
        if self.elapsed >= self.duration {
            *self = Self::default();
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum MoveContact {
    #[default]
    None,
    Hit,
    Guarded,
}

/// Combat counters and the hit records owned by an entity.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct CombatStatus {
    pub juggle_points: i32,
    pub is_being_juggled: bool,
    pub falling: bool,
    /// Consecutive hits landed on the opponent; cleared when the opponent regains control.
    pub combo: u32,
    /// Hits landed by the current move.
    pub hit_count: u32,
    pub move_contact: MoveContact,
    /// Ticks since the current move last made contact.
    pub contact_ticks: u32,
    /// Attack the entity is currently threatening with, armed by its script.
    pub armed: Option<HitDefinition>,
    pub active_hit: Option<ActiveHit>,
}

bitflags! {
    /// Flags asserted by scripts for the current tick only.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct TickFlags: u16 {
        const NO_STAND_GUARD  = 1 << 0;
        const NO_CROUCH_GUARD = 1 << 1;
        const NO_AIR_GUARD    = 1 << 2;
        const NO_AUTO_TURN    = 1 << 3;
        const NO_JUGGLE_CHECK = 1 << 4;
        const NO_PUSH         = 1 << 5;
        const INVISIBLE       = 1 << 6;
        const NO_KO_SOUND     = 1 << 7;
        const NO_SHADOW       = 1 << 8;
    }
}

impl TickFlags {
    /// Returns true if these flags forbid guarding in `stance`.
    pub fn blocks_guard(self, stance: StateType) -> bool {
        match stance {
            StateType::Standing => self.contains(Self::NO_STAND_GUARD),
            StateType::Crouching => self.contains(Self::NO_CROUCH_GUARD),
            StateType::Air => self.contains(Self::NO_AIR_GUARD),
            StateType::Lying => true,
        }
    }
}

/// How an entity lost all its life, kept for victory classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DefeatRecord {
    /// Knocked out while guarding.
    pub while_guarding: bool,
    /// Knocked out by an entity of its own root.
    pub self_inflicted: bool,
    pub attack: Option<AttackAttribute>,
    /// Ticks elapsed since the knockout.
    pub ticks_since: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ShadowRender {
    pub visible: bool,
    pub position: Vec2,
    pub alpha: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ReflectionRender {
    pub visible: bool,
    pub position: Vec2,
}

/// Attributes refreshed after each post pass for the rendering collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct RenderAttributes {
    pub shadow: ShadowRender,
    pub reflection: ReflectionRender,
}

/// A fighter, helper or projectile.
#[derive(Clone, Debug)]
pub struct Entity {
    pub handle: EntityHandle,
    pub kind: EntityKind,
    pub root: RootId,
    /// Script-visible identifier; `0` for roots.
    pub local_id: i32,
    pub parent: Option<EntityHandle>,
    pub helpers: Vec<EntityHandle>,
    /// Only populated on roots.
    pub projectiles: Vec<EntityHandle>,
    pub definition: Arc<FighterDefinition>,

    pub body: Body,
    pub facing: Facing,
    pub control: bool,
    pub life: i32,
    pub power: i32,
    pub state_type: StateType,
    pub move_type: MoveType,

    pub machine: StateMachine,
    pub combat: CombatStatus,
    pub hit_pause: HitPause,
    /// Explicit freeze requested through the driver.
    pub frozen: bool,

    pub not_hit_by: [HitAttrSlot; FightConfig::HIT_ATTR_SLOTS],
    pub pending_hits: Vec<PendingHit>,

    pub binding: Option<Binding>,
    /// Entities currently bound to this one.
    pub bound_dependents: Vec<EntityHandle>,

    pub flags: TickFlags,
    pub alive: bool,
    pub defeat: Option<DefeatRecord>,
    pub render: RenderAttributes,
    /// Removed by the end-of-tick sweep.
    pub destroy_requested: bool,
}

impl Entity {
    pub(crate) fn new(
        handle: EntityHandle,
        kind: EntityKind,
        root: RootId,
        definition: Arc<FighterDefinition>,
        position: Vec2,
        facing: Facing,
    ) -> Self {
        let life = definition.life_max;
        let juggle_points = definition.air_juggle;
        Self {
            handle,
            kind,
            root,
            local_id: 0,
            parent: None,
            helpers: Vec::new(),
            projectiles: Vec::new(),
            definition,
            body: Body {
                position,
                screen_bound: !matches!(kind, EntityKind::Projectile),
                ..Body::default()
            },
            facing,
            control: matches!(kind, EntityKind::Root),
            life,
            power: 0,
            state_type: StateType::Standing,
            move_type: MoveType::Idle,
            machine: StateMachine::new(!matches!(kind, EntityKind::Projectile)),
            combat: CombatStatus {
                juggle_points,
                ..CombatStatus::default()
            },
            hit_pause: HitPause::default(),
            frozen: false,
            not_hit_by: Default::default(),
            pending_hits: Vec::new(),
            binding: None,
            bound_dependents: Vec::new(),
            flags: TickFlags::empty(),
            alive: true,
            defeat: None,
            render: RenderAttributes::default(),
            destroy_requested: false,
        }
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        matches!(self.kind, EntityKind::Root)
    }

    #[inline]
    pub fn is_helper(&self) -> bool {
        matches!(self.kind, EntityKind::Helper)
    }

    #[inline]
    pub fn is_projectile(&self) -> bool {
        matches!(self.kind, EntityKind::Projectile)
    }

    /// Frozen by a local hit-pause or an explicit driver pause.
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.frozen || self.hit_pause.active
    }

    #[inline]
    pub fn is_guarding(&self) -> bool {
        FightConfig::is_guard_state(self.machine.state.0)
    }

    #[inline]
    pub fn coordinate_p(&self) -> f64 {
        self.definition.coordinate_p
    }

    /// Returns true once the active hit (if any) has run its course.
    pub fn is_hit_over(&self) -> bool {
        self.combat.active_hit.as_ref().is_none_or(ActiveHit::is_over)
    }

    pub fn life_max(&self) -> i32 {
        self.definition.life_max
    }

    pub fn power_max(&self) -> i32 {
        self.definition.power_max
    }
}
