use crate::state::EntityHandle;

/// Read access to animation playback.
pub trait AnimationOracle {
    /// Ticks left in the entity's current animation; `<= 0` once it has finished.
    fn remaining_time(&self, entity: EntityHandle) -> i32;
}
