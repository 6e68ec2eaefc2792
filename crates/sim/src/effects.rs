//! Effects oracle that only logs and counts.

use std::cell::Cell;

use fight_core::{EffectRef, EffectsOracle, RootId, SparkRequest};
use tracing::debug;

/// There is nothing to draw or play in a headless run; sparks and sounds are
/// traced at debug level and tallied for the match report.
#[derive(Debug, Default)]
pub struct LoggedEffects {
    sparks: Cell<usize>,
    sounds: Cell<usize>,
}

impl LoggedEffects {
    pub fn spark_count(&self) -> usize {
        self.sparks.get()
    }

    pub fn sound_count(&self) -> usize {
        self.sounds.get()
    }
}

impl EffectsOracle for LoggedEffects {
    fn spawn_spark(&self, request: SparkRequest) {
        debug!(
            owner = %request.owner,
            effect = request.effect.index,
            common = !request.effect.in_player_file,
            x = request.position.x,
            y = request.position.y,
            "spark"
        );
        self.sparks.set(self.sparks.get() + 1);
    }

    fn play_sound(&self, owner: RootId, sound: EffectRef) {
        debug!(%owner, sound = sound.index, common = !sound.in_player_file, "sound");
        self.sounds.set(self.sounds.get() + 1);
    }
}
