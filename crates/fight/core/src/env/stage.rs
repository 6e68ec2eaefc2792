use crate::state::{Facing, RootId, Vec2};

/// Horizontal play area (camera already applied) and floor line, in stage units.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageBounds {
    pub left: f64,
    pub right: f64,
    pub floor: f64,
}

/// Shadow projection parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShadowParams {
    /// Vertical squash applied to the distance from the floor.
    pub scale_y: f64,
    /// Opacity at full strength, 0.0..=1.0.
    pub intensity: f64,
    /// Heights (top, bottom) across which the shadow fades in.
    pub fade: Option<(f64, f64)>,
}

impl Default for ShadowParams {
    fn default() -> Self {
        Self {
            scale_y: 0.4,
            intensity: 0.5,
            fade: None,
        }
    }
}

/// Stage geometry queried each tick for clamping and corner detection.
pub trait StageOracle {
    /// Coordinate resolution of the values returned by this oracle.
    fn coordinate_p(&self) -> f64;

    fn bounds(&self) -> StageBounds;

    fn camera_offset(&self) -> Vec2 {
        Vec2::ZERO
    }

    fn start_position(&self, root: RootId) -> Vec2;

    fn start_facing(&self, root: RootId) -> Facing {
        match root {
            RootId::P1 => Facing::Right,
            RootId::P2 => Facing::Left,
        }
    }

    fn shadow(&self) -> ShadowParams {
        ShadowParams::default()
    }

    /// Reflection opacity; `0.0` disables reflections.
    fn reflection_intensity(&self) -> f64 {
        0.0
    }
}
