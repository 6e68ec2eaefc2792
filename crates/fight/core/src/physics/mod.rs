//! Position, velocity and body extents.
//!
//! Every entity stores its kinematics in its own coordinate units
//! (`FighterDefinition::coordinate_p`). Any value crossing from one entity (or
//! the stage) to another is rescaled by `target_p / source_p` first.

use crate::env::StageBounds;
use crate::state::{Entity, EntityHandle, FightState, RootId, StateType, TickFlags, Vec2};

/// Factor converting a value in `source_p` units into `target_p` units.
#[inline]
pub fn coordinate_scale(target_p: f64, source_p: f64) -> f64 {
    if source_p == 0.0 { 1.0 } else { target_p / source_p }
}

#[inline]
pub fn rescale(value: Vec2, target_p: f64, source_p: f64) -> Vec2 {
    value.scaled(coordinate_scale(target_p, source_p))
}

/// Position of `other` expressed in `observer`'s coordinate units.
pub fn position_seen_by(observer: &Entity, other: &Entity) -> Vec2 {
    rescale(other.body.position, observer.coordinate_p(), other.coordinate_p())
}

/// (front, back) body widths for the entity's stance, honouring a width override.
pub fn body_widths(entity: &Entity) -> (f64, f64) {
    if let Some(widths) = entity.body.width_override {
        return widths;
    }
    let size = &entity.definition.size;
    match entity.state_type {
        StateType::Air => (size.air_front, size.air_back),
        _ => (size.ground_front, size.ground_back),
    }
}

pub fn front_x(entity: &Entity) -> f64 {
    let (front, _) = body_widths(entity);
    entity.body.position.x + front * entity.facing.sign()
}

pub fn back_x(entity: &Entity) -> f64 {
    let (_, back) = body_widths(entity);
    entity.body.position.x - back * entity.facing.sign()
}

/// Horizontal (min, max) extent of the body in the entity's own units.
pub fn body_extent(entity: &Entity) -> (f64, f64) {
    let front = front_x(entity);
    let back = back_x(entity);
    (front.min(back), front.max(back))
}

/// Returns true if the body touches the right (or left) stage edge within `epsilon`.
pub fn is_in_corner(
    entity: &Entity,
    bounds: StageBounds,
    stage_p: f64,
    right_side: bool,
    epsilon: f64,
) -> bool {
    let scale = coordinate_scale(stage_p, entity.coordinate_p());
    let (min, max) = body_extent(entity);
    if right_side {
        max * scale > bounds.right - epsilon
    } else {
        min * scale < bounds.left + epsilon
    }
}

/// Shifts the entity so its body stays inside the stage bounds.
pub fn clamp_to_stage(entity: &mut Entity, bounds: StageBounds, stage_p: f64) {
    if !entity.body.screen_bound {
        return;
    }
    let scale = coordinate_scale(entity.coordinate_p(), stage_p);
    let left = bounds.left * scale;
    let right = bounds.right * scale;
    let (min, max) = body_extent(entity);
    if min < left {
        entity.body.position.x += left - min;
    } else if max > right {
        entity.body.position.x -= max - right;
    }
}

/// Advances position by velocity and velocity by acceleration.
///
/// Paused and bound entities do not move on their own.
pub fn integrate(entity: &mut Entity) {
    if entity.is_paused() || entity.binding.is_some() {
        return;
    }
    let velocity = entity.body.velocity;
    entity.body.position += velocity;
    let acceleration = entity.body.acceleration;
    entity.body.velocity += acceleration;
}

impl FightState {
    /// Sets velocity from a value expressed in `caller_p` units, in the
    /// entity's facing frame (positive x is forward).
    pub fn set_velocity(&mut self, handle: EntityHandle, velocity: Vec2, caller_p: f64) {
        if let Some(entity) = self.store.get_mut(handle) {
            let local = rescale(velocity, entity.coordinate_p(), caller_p);
            entity.body.velocity = local.faced(entity.facing);
        }
    }

    /// Adds a facing-relative velocity. Ignored while the entity is paused.
    pub fn add_velocity(&mut self, handle: EntityHandle, delta: Vec2, caller_p: f64) {
        if let Some(entity) = self.store.get_mut(handle) {
            if entity.is_paused() {
                return;
            }
            let local = rescale(delta, entity.coordinate_p(), caller_p);
            entity.body.velocity += local.faced(entity.facing);
        }
    }

    pub fn set_acceleration(&mut self, handle: EntityHandle, acceleration: Vec2, caller_p: f64) {
        if let Some(entity) = self.store.get_mut(handle) {
            entity.body.acceleration = rescale(acceleration, entity.coordinate_p(), caller_p);
        }
    }

    /// Sets the absolute position from a value in `caller_p` units.
    pub fn set_position(&mut self, handle: EntityHandle, position: Vec2, caller_p: f64) {
        if let Some(entity) = self.store.get_mut(handle) {
            entity.body.position = rescale(position, entity.coordinate_p(), caller_p);
        }
    }

    /// Moves by a facing-relative offset. Ignored while the entity is paused.
    pub fn add_position(&mut self, handle: EntityHandle, delta: Vec2, caller_p: f64) {
        if let Some(entity) = self.store.get_mut(handle) {
            if entity.is_paused() {
                return;
            }
            let local = rescale(delta, entity.coordinate_p(), caller_p);
            entity.body.position += local.faced(entity.facing);
        }
    }

    /// Overrides (front, back) body widths until the next evaluation.
    pub fn set_width_override(&mut self, handle: EntityHandle, front: f64, back: f64) {
        if let Some(entity) = self.store.get_mut(handle) {
            entity.body.width_override = Some((front, back));
        }
    }

    /// Separates the two roots symmetrically when their bodies overlap.
    ///
    /// Frozen roots are never pushed, and neither is a pair where nobody has
    /// control.
    pub(crate) fn push_roots(&mut self) {
        let (Some(a), Some(b)) = (self.root_entity(RootId::P1), self.root_entity(RootId::P2))
        else {
            return;
        };
        if a.is_paused() || b.is_paused() || !(a.control || b.control) {
            return;
        }
        if a.flags.contains(TickFlags::NO_PUSH) || b.flags.contains(TickFlags::NO_PUSH) {
            return;
        }
        if a.binding.is_some() || b.binding.is_some() {
            return;
        }

        let to_a = coordinate_scale(a.coordinate_p(), b.coordinate_p());
        let (a_min, a_max) = body_extent(a);
        let (b_min, b_max) = body_extent(b);
        let (b_min, b_max) = (b_min * to_a, b_max * to_a);

        let height = a.definition.size.height.max(b.definition.size.height * to_a);
        let b_y = b.body.position.y * to_a;
        if (a.body.position.y - b_y).abs() >= height {
            return;
        }

        let overlap = a_max.min(b_max) - a_min.max(b_min);
        if overlap <= 0.0 {
            return;
        }

        let a_is_left = a.body.position.x <= b.body.position.x * to_a;
        let shift = overlap / 2.0;
        let (a_shift, b_shift) = if a_is_left { (-shift, shift) } else { (shift, -shift) };

        if let Some(a) = self.root_entity_mut(RootId::P1) {
            a.body.position.x += a_shift;
        }
        if let Some(b) = self.root_entity_mut(RootId::P2) {
            b.body.position.x += b_shift / to_a;
        }
    }

    /// Turns a grounded root in control to face its opponent.
    pub(crate) fn auto_turn(&mut self, root: RootId) {
        let (Some(me), Some(opponent)) = (self.root_entity(root), self.root_entity(root.other()))
        else {
            return;
        };
        let eligible = me.control
            && !me.is_paused()
            && !me.flags.contains(TickFlags::NO_AUTO_TURN)
            && matches!(me.state_type, StateType::Standing | StateType::Crouching);
        if !eligible {
            return;
        }
        let dx = position_seen_by(me, opponent).x - me.body.position.x;
        let behind = dx * me.facing.sign() < 0.0;
        if behind {
            if let Some(me) = self.root_entity_mut(root) {
                me.facing = me.facing.opposite();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::state::{EntityStore, Facing, FighterDefinition};

    fn bounds() -> StageBounds {
        StageBounds {
            left: -150.0,
            right: 150.0,
            floor: 0.0,
        }
    }

    fn entity_at(x: f64, facing: Facing) -> Entity {
        let mut store = EntityStore::new();
        let handle = store.create_root(
            RootId::P1,
            Arc::new(FighterDefinition::default()),
            Vec2::new(x, 0.0),
            facing,
        );
        store.get(handle).unwrap().clone()
    }

    #[test]
    fn rescales_between_resolutions() {
        assert_eq!(coordinate_scale(480.0, 240.0), 2.0);
        assert_eq!(rescale(Vec2::new(1.0, -2.0), 320.0, 640.0), Vec2::new(0.5, -1.0));
    }

    #[test]
    fn front_and_back_follow_facing() {
        let right = entity_at(0.0, Facing::Right);
        assert_eq!(front_x(&right), 16.0);
        assert_eq!(back_x(&right), -15.0);

        let left = entity_at(0.0, Facing::Left);
        assert_eq!(front_x(&left), -16.0);
        assert_eq!(body_extent(&left), (-16.0, 15.0));
    }

    #[test]
    fn corner_detection_uses_epsilon() {
        // back edge at 149.5, inside the one-unit margin
        let pinned = entity_at(134.5, Facing::Left);
        assert!(is_in_corner(&pinned, bounds(), 240.0, true, 1.0));
        assert!(!is_in_corner(&pinned, bounds(), 240.0, false, 1.0));

        let free = entity_at(100.0, Facing::Left);
        assert!(!is_in_corner(&free, bounds(), 240.0, true, 1.0));
    }

    #[test]
    fn clamp_keeps_body_on_stage() {
        let mut entity = entity_at(160.0, Facing::Right);
        clamp_to_stage(&mut entity, bounds(), 240.0);
        assert_eq!(front_x(&entity), 150.0);

        let mut entity = entity_at(-160.0, Facing::Right);
        clamp_to_stage(&mut entity, bounds(), 240.0);
        assert_eq!(back_x(&entity), -150.0);
    }

    #[test]
    fn paused_entities_do_not_integrate() {
        let mut entity = entity_at(0.0, Facing::Right);
        entity.body.velocity = Vec2::new(2.0, 0.0);
        entity.body.acceleration = Vec2::new(0.0, 1.0);
        integrate(&mut entity);
        assert_eq!(entity.body.position, Vec2::new(2.0, 0.0));
        assert_eq!(entity.body.velocity, Vec2::new(2.0, 1.0));

        entity.frozen = true;
        integrate(&mut entity);
        assert_eq!(entity.body.position, Vec2::new(2.0, 0.0));
    }
}
