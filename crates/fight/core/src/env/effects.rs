use crate::state::{EffectRef, Facing, RootId, Vec2};

/// A spark to draw, expressed in the owner's coordinate units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SparkRequest {
    pub owner: RootId,
    pub effect: EffectRef,
    pub position: Vec2,
    pub facing: Facing,
    pub coordinate_p: f64,
}

/// Rendering and audio side effects triggered by combat.
pub trait EffectsOracle {
    fn spawn_spark(&self, request: SparkRequest);

    fn play_sound(&self, owner: RootId, sound: EffectRef);
}
