//! Deterministic combat core for a two-player fighting game.
//!
//! `fight-core` owns the entity arena (fighters, helpers, projectiles), the
//! simulation clock, hit resolution and the state machine driver. State
//! scripts, stage geometry, input, effects and animation are collaborators
//! reached through the traits in [`env`]. All side-effecting mutation flows
//! through [`engine::FightEngine`], one tick at a time.
pub mod binding;
pub mod clock;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod hitattr;
pub mod physics;
pub mod state;

pub use binding::{BindAnchor, BindError, BindFacing, Binding};
pub use clock::{Clock, GlobalPause};
pub use combat::{
    ActiveHit, CornerPush, FacingRule, GroundType, GuardFlags, HitDefinition, HitOutcome,
    HitPhase, HitRejection, PauseTimes, PendingHit, VictoryType,
};
pub use config::FightConfig;
pub use engine::{FightEngine, TickPhase, TransitionError};
pub use env::{
    AnimationOracle, CommandOracle, EffectsOracle, Env, FightEnv, GUARD_COMMAND, HitOverride,
    HitOverrideOracle, OracleError, ProjectileContact, ProjectileOracle, ScriptOracle,
    ShadowParams, SparkRequest, StageBounds, StageOracle,
};
pub use error::{CombatError, ErrorSeverity};
pub use hitattr::{
    AttackAttribute, AttackClass, AttackType, ClassTypeFlag, FilterError, HitAttrSlot, Polarity,
    StanceMask,
};
pub use state::{
    Body, BodySize, CombatStatus, DefeatRecord, EffectRef, Entity, EntityHandle, EntityKind,
    EntityStore, Facing, FightState, FighterDefinition, HitPause, MachineOwner, MoveContact,
    MoveType, ReflectionRender, RenderAttributes, RootId, ShadowRender, StateMachine, StateNo,
    StateType, StoreError, Tick, TickFlags, Vec2,
};
