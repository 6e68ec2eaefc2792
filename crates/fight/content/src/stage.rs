//! Stage geometry as authored in content files.

use fight_core::{Facing, RootId, ShadowParams, StageBounds, Vec2};

/// Static description of a stage, in the stage's own coordinate units.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StageDefinition {
    pub name: String,
    pub coordinate_p: f64,
    pub bounds: StageBounds,
    pub camera_offset: Vec2,
    pub p1_start: Vec2,
    pub p2_start: Vec2,
    pub shadow: ShadowParams,
    /// Reflection opacity; `0.0` disables reflections.
    pub reflection: f64,
}

impl StageDefinition {
    pub fn start_position(&self, root: RootId) -> Vec2 {
        match root {
            RootId::P1 => self.p1_start,
            RootId::P2 => self.p2_start,
        }
    }

    /// Each fighter starts facing the other one.
    pub fn start_facing(&self, root: RootId) -> Facing {
        let own = self.start_position(root).x;
        let other = self.start_position(root.other()).x;
        if own <= other {
            Facing::Right
        } else {
            Facing::Left
        }
    }
}

impl Default for StageDefinition {
    fn default() -> Self {
        Self {
            name: String::from("training"),
            coordinate_p: 240.0,
            bounds: StageBounds {
                left: -150.0,
                right: 150.0,
                floor: 0.0,
            },
            camera_offset: Vec2::ZERO,
            p1_start: Vec2::new(-70.0, 0.0),
            p2_start: Vec2::new(70.0, 0.0),
            shadow: ShadowParams::default(),
            reflection: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fighters_start_facing_each_other() {
        let stage = StageDefinition::default();
        assert_eq!(stage.start_facing(RootId::P1), Facing::Right);
        assert_eq!(stage.start_facing(RootId::P2), Facing::Left);

        let swapped = StageDefinition {
            p1_start: Vec2::new(70.0, 0.0),
            p2_start: Vec2::new(-70.0, 0.0),
            ..StageDefinition::default()
        };
        assert_eq!(swapped.start_facing(RootId::P1), Facing::Left);
        assert_eq!(swapped.start_position(RootId::P2), Vec2::new(-70.0, 0.0));
    }
}
