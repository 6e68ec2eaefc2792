//! Stage oracle backed by a static stage definition.

use fight_content::StageDefinition;
use fight_core::{Facing, RootId, ShadowParams, StageBounds, StageOracle, Vec2};

/// A stage whose geometry never changes during the match.
#[derive(Clone, Debug, Default)]
pub struct FixedStage(pub StageDefinition);

impl FixedStage {
    pub fn definition(&self) -> &StageDefinition {
        &self.0
    }
}

impl StageOracle for FixedStage {
    fn coordinate_p(&self) -> f64 {
        self.0.coordinate_p
    }

    fn bounds(&self) -> StageBounds {
        self.0.bounds
    }

    fn camera_offset(&self) -> Vec2 {
        self.0.camera_offset
    }

    fn start_position(&self, root: RootId) -> Vec2 {
        self.0.start_position(root)
    }

    fn start_facing(&self, root: RootId) -> Facing {
        self.0.start_facing(root)
    }

    fn shadow(&self) -> ShadowParams {
        self.0.shadow
    }

    fn reflection_intensity(&self) -> f64 {
        self.0.reflection
    }
}
