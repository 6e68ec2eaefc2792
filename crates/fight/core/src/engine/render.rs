use super::FightEngine;
use crate::env::ShadowParams;
use crate::physics::coordinate_scale;
use crate::state::{Entity, ReflectionRender, ShadowRender, TickFlags, Vec2};

impl<'a> FightEngine<'a> {
    /// Recomputes shadow and reflection placement for every entity.
    ///
    /// Needs a stage; without one the previous attributes are kept.
    pub fn refresh_render_attributes(&mut self) {
        let Ok(stage) = self.env.stage() else {
            return;
        };
        let stage_p = stage.coordinate_p();
        let floor = stage.bounds().floor;
        let shadow = stage.shadow();
        let reflection = stage.reflection_intensity();

        for handle in self.state.store.walk_all() {
            if let Some(entity) = self.state.store.get_mut(handle) {
                let scale = coordinate_scale(entity.coordinate_p(), stage_p);
                let local_floor = floor * scale;
                entity.render.shadow = shadow_of(entity, local_floor, &shadow, scale);
                entity.render.reflection = reflection_of(entity, local_floor, reflection);
            }
        }
    }
}

/// Shadow mirrored below the floor and squashed by the stage's vertical
/// scale; it fades out as the body rises through the stage's fade range.
fn shadow_of(entity: &Entity, floor: f64, params: &ShadowParams, fade_scale: f64) -> ShadowRender {
    let position = entity.body.position;
    let height = floor - position.y;
    let hidden = entity
        .flags
        .intersects(TickFlags::INVISIBLE | TickFlags::NO_SHADOW);

    let fade = match params.fade {
        Some((top, bottom)) => {
            let (top, bottom) = (top * fade_scale, bottom * fade_scale);
            if height >= top {
                0.0
            } else if height <= bottom || top <= bottom {
                1.0
            } else {
                (top - height) / (top - bottom)
            }
        }
        None => 1.0,
    };

    ShadowRender {
        visible: !hidden && height >= 0.0,
        position: Vec2::new(position.x, floor + height * params.scale_y),
        alpha: params.intensity * fade,
    }
}

fn reflection_of(entity: &Entity, floor: f64, intensity: f64) -> ReflectionRender {
    let position = entity.body.position;
    ReflectionRender {
        visible: intensity > 0.0 && !entity.flags.contains(TickFlags::INVISIBLE) && position.y <= floor,
        position: Vec2::new(position.x, 2.0 * floor - position.y),
    }
}
