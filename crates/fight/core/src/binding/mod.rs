//! Time-bounded position/facing slaving of one entity to another.
//!
//! An entity is the source of at most one binding. Binding to a new target
//! cancels the previous binding, and a target that is itself bound to the
//! new source loses that binding first, so two entities are never bound to
//! each other.

use tracing::{debug, trace};

use crate::error::{CombatError, ErrorSeverity, report};
use crate::physics::{coordinate_scale, position_seen_by};
use crate::state::{EntityHandle, Facing, FightState, StoreError, Vec2};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    #[error("entity {0} cannot bind to itself")]
    SelfBinding(EntityHandle),

    /// The target went away; the binding is torn down.
    #[error("binding target {0} is no longer live")]
    TargetGone(EntityHandle),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CombatError for BindError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SelfBinding(_) => ErrorSeverity::Validation,
            Self::TargetGone(_) => ErrorSeverity::Recoverable,
            Self::Store(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::SelfBinding(_) => "BIND_SELF_BINDING",
            Self::TargetGone(_) => "BIND_TARGET_GONE",
            Self::Store(err) => err.error_code(),
        }
    }
}

/// Facing applied to the bound entity on every update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BindFacing {
    #[default]
    Keep,
    SameAsTarget,
    OppositeOfTarget,
}

/// Point on the target the offset is measured from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BindAnchor {
    #[default]
    Axis,
    Head,
    Mid,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Binding {
    pub target: EntityHandle,
    pub elapsed: u32,
    pub duration: u32,
    pub facing: BindFacing,
    /// Offset from the anchor, for a target facing right, in the source's units.
    pub offset: Vec2,
    pub anchor: BindAnchor,
}

impl FightState {
    /// Binds `source` to `target` for `duration` ticks and snaps it into place.
    pub fn bind(
        &mut self,
        source: EntityHandle,
        target: EntityHandle,
        duration: u32,
        facing: BindFacing,
        offset: Vec2,
        anchor: BindAnchor,
    ) -> bool {
        match self.try_bind(source, target, duration, facing, offset, anchor) {
            Ok(()) => true,
            Err(err) => {
                report(&err);
                false
            }
        }
    }

    fn try_bind(
        &mut self,
        source: EntityHandle,
        target: EntityHandle,
        duration: u32,
        facing: BindFacing,
        offset: Vec2,
        anchor: BindAnchor,
    ) -> Result<(), BindError> {
        if source == target {
            return Err(BindError::SelfBinding(source));
        }
        self.store.try_get(source)?;
        if !self.store.is_live(target) {
            return Err(BindError::TargetGone(target));
        }

        self.release_binding(source);
        let reverse = self
            .store
            .get(target)
            .and_then(|entity| entity.binding)
            .is_some_and(|binding| binding.target == source);
        if reverse {
            debug!(%source, %target, "cancelling reverse binding");
            self.release_binding(target);
        }

        let binding = Binding {
            target,
            elapsed: 0,
            duration,
            facing,
            offset,
            anchor,
        };
        self.store.try_get_mut(source)?.binding = Some(binding);
        self.store.try_get_mut(target)?.bound_dependents.push(source);
        self.update_binding_position(source);
        trace!(%source, %target, duration, "bound");
        Ok(())
    }

    /// Tears down `source`'s binding, if any.
    pub fn release_binding(&mut self, source: EntityHandle) {
        let Some(binding) = self.store.get_mut(source).and_then(|entity| entity.binding.take())
        else {
            return;
        };
        if let Some(target) = self.store.get_mut(binding.target) {
            target.bound_dependents.retain(|handle| *handle != source);
        }
    }

    /// Recomputes `source`'s position and facing from its live target.
    pub fn update_binding_position(&mut self, source: EntityHandle) {
        let Some(entity) = self.store.get(source) else {
            return;
        };
        let Some(binding) = entity.binding else {
            return;
        };
        let Some(target) = self.store.get(binding.target) else {
            return;
        };

        let scale = coordinate_scale(entity.coordinate_p(), target.coordinate_p());
        let size = &target.definition.size;
        let anchor = match binding.anchor {
            BindAnchor::Axis => Vec2::ZERO,
            BindAnchor::Head => size.head.faced(target.facing).scaled(scale),
            BindAnchor::Mid => size.mid.faced(target.facing).scaled(scale),
        };
        let position = position_seen_by(entity, target) + anchor + binding.offset.faced(target.facing);
        let facing = resolve_facing(binding.facing, entity.facing, target.facing);

        if let Some(entity) = self.store.get_mut(source) {
            entity.body.position = position;
            entity.facing = facing;
        }
    }

    /// Advances `source`'s binding by one tick, expiring it when its target is
    /// gone or its duration has elapsed.
    pub fn update_binding(&mut self, source: EntityHandle) {
        let Some(entity) = self.store.get(source) else {
            return;
        };
        if entity.is_paused() {
            return;
        }
        let Some(binding) = entity.binding else {
            return;
        };

        if !self.store.is_live(binding.target) {
            report(&BindError::TargetGone(binding.target));
            if let Some(entity) = self.store.get_mut(source) {
                entity.binding = None;
            }
            return;
        }

        let elapsed = binding.elapsed + 1;
        if elapsed >= binding.duration {
            self.release_binding(source);
            trace!(%source, "binding expired");
            return;
        }
        if let Some(active) = self.store.get_mut(source).and_then(|e| e.binding.as_mut()) {
            active.elapsed = elapsed;
        }
        self.update_binding_position(source);
    }

    /// Binds `source` to its root.
    pub fn bind_to_root(
        &mut self,
        source: EntityHandle,
        duration: u32,
        facing: BindFacing,
        offset: Vec2,
    ) -> bool {
        let Some(root) = self.store.get(source).and_then(|e| self.store.root(e.root)) else {
            return false;
        };
        self.bind(source, root, duration, facing, offset, BindAnchor::Axis)
    }

    /// Binds `source` to its parent.
    pub fn bind_to_parent(
        &mut self,
        source: EntityHandle,
        duration: u32,
        facing: BindFacing,
        offset: Vec2,
    ) -> bool {
        let Some(parent) = self.store.get(source).and_then(|e| e.parent) else {
            return false;
        };
        self.bind(source, parent, duration, facing, offset, BindAnchor::Axis)
    }

    /// Binds `source` to the first opponent entity with `local_id` (`-1` for any).
    ///
    /// The binding lasts one tick longer than requested.
    pub fn bind_to_target(
        &mut self,
        source: EntityHandle,
        local_id: i32,
        duration: u32,
        offset: Vec2,
        anchor: BindAnchor,
    ) -> bool {
        let Some(opponent) = self.store.get(source).map(|e| e.root.other()) else {
            return false;
        };
        let Some(target) = self.store.find_by_local_id(opponent, local_id).first().copied()
        else {
            return false;
        };
        self.bind(source, target, duration + 1, BindFacing::Keep, offset, anchor)
    }

    /// Binds every opponent entity with `local_id` (`-1` for all) to `target`.
    pub fn bind_opponents_to_self(
        &mut self,
        target: EntityHandle,
        local_id: i32,
        duration: u32,
        facing: BindFacing,
        offset: Vec2,
    ) -> usize {
        let Some(opponent) = self.store.get(target).map(|e| e.root.other()) else {
            return 0;
        };
        self.store
            .find_by_local_id(opponent, local_id)
            .into_iter()
            .filter(|source| self.bind(*source, target, duration + 1, facing, offset, BindAnchor::Axis))
            .count()
    }

    /// Returns true if `entity` is the source of an active binding.
    pub fn is_bound(&self, entity: EntityHandle) -> bool {
        self.store.get(entity).is_some_and(|e| e.binding.is_some())
    }
}

/// Facing a bound entity ends up with under `rule`.
pub fn resolve_facing(rule: BindFacing, own: Facing, target: Facing) -> Facing {
    match rule {
        BindFacing::Keep => own,
        BindFacing::SameAsTarget => target,
        BindFacing::OppositeOfTarget => target.opposite(),
    }
}
