mod common;
mod entity;
mod fighter;

pub use common::{EntityHandle, EntityKind, Facing, MoveType, RootId, StateNo, StateType, Tick, Vec2};
pub use entity::{
    Body, CombatStatus, DefeatRecord, Entity, HitPause, MachineOwner, MoveContact,
    ReflectionRender, RenderAttributes, ShadowRender, StateMachine, TickFlags,
};
pub use fighter::{BodySize, EffectRef, FighterDefinition};
