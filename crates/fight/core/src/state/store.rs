//! Generational arena owning every entity of a match.
//!
//! Roots own their helper list and projectile list; both hold handles, never
//! references, so destroying an entity only ever leaves stale handles behind.

use std::sync::Arc;

use tracing::{debug, trace};

use super::types::{Entity, EntityHandle, EntityKind, Facing, FighterDefinition, RootId, Vec2};
use crate::error::{CombatError, ErrorSeverity};

/// Errors raised by arena operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The handle refers to a slot that was freed or recycled.
    #[error("entity {0} is no longer live")]
    StaleHandle(EntityHandle),

    /// Roots live for the whole match and cannot be destroyed.
    #[error("entity {0} is a root and cannot be destroyed")]
    NotRemovable(EntityHandle),

    #[error("root {0} has not been loaded")]
    RootMissing(RootId),
}

impl CombatError for StoreError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::StaleHandle(_) => ErrorSeverity::Recoverable,
            Self::NotRemovable(_) => ErrorSeverity::Validation,
            Self::RootMissing(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::StaleHandle(_) => "STORE_STALE_HANDLE",
            Self::NotRemovable(_) => "STORE_NOT_REMOVABLE",
            Self::RootMissing(_) => "STORE_ROOT_MISSING",
        }
    }
}

#[derive(Clone, Debug, Default)]
struct Slot {
    generation: u32,
    entity: Option<Entity>,
}

#[derive(Clone, Debug, Default)]
pub struct EntityStore {
    slots: Vec<Slot>,
    free: Vec<u32>,
    roots: [Option<EntityHandle>; 2],
    next_local_id: [i32; 2],
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self, root: RootId) -> Option<EntityHandle> {
        self.roots[root.index()]
    }

    pub fn try_root(&self, root: RootId) -> Result<EntityHandle, StoreError> {
        self.root(root).ok_or(StoreError::RootMissing(root))
    }

    pub fn get(&self, handle: EntityHandle) -> Option<&Entity> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.entity.as_ref())
    }

    pub fn get_mut(&mut self, handle: EntityHandle) -> Option<&mut Entity> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.entity.as_mut())
    }

    pub fn try_get(&self, handle: EntityHandle) -> Result<&Entity, StoreError> {
        self.get(handle).ok_or(StoreError::StaleHandle(handle))
    }

    pub fn try_get_mut(&mut self, handle: EntityHandle) -> Result<&mut Entity, StoreError> {
        self.get_mut(handle).ok_or(StoreError::StaleHandle(handle))
    }

    #[inline]
    pub fn is_live(&self, handle: EntityHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Number of live entities, roots included.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.entity.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn allocate(&mut self, build: impl FnOnce(EntityHandle) -> Entity) -> EntityHandle {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        let handle = EntityHandle::new(index, slot.generation);
        slot.entity = Some(build(handle));
        handle
    }

    fn release(&mut self, handle: EntityHandle) -> Option<Entity> {
        let slot = self
            .slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)?;
        let entity = slot.entity.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        Some(entity)
    }

    /// Creates the root fighter for `root`, replacing nothing: callers unload first.
    pub fn create_root(
        &mut self,
        root: RootId,
        definition: Arc<FighterDefinition>,
        position: Vec2,
        facing: Facing,
    ) -> EntityHandle {
        let handle = self.allocate(|handle| {
            Entity::new(handle, EntityKind::Root, root, definition, position, facing)
        });
        self.roots[root.index()] = Some(handle);
        self.next_local_id[root.index()] = 1;
        debug!(%handle, %root, "root created");
        handle
    }

    fn spawn_child(&mut self, parent: EntityHandle, kind: EntityKind) -> Result<EntityHandle, StoreError> {
        let creator = self.try_get(parent)?;
        let root = creator.root;
        let definition = Arc::clone(&creator.definition);
        let position = creator.body.position;
        let facing = creator.facing;
        let root_handle = self.try_root(root)?;

        let local_id = self.next_local_id[root.index()];
        self.next_local_id[root.index()] += 1;

        let owner = match kind {
            EntityKind::Projectile => root_handle,
            _ => parent,
        };
        let handle = self.allocate(|handle| {
            let mut entity = Entity::new(handle, kind, root, definition, position, facing);
            entity.local_id = local_id;
            entity.parent = Some(owner);
            entity
        });

        let owner_entity = self.try_get_mut(owner)?;
        match kind {
            EntityKind::Projectile => owner_entity.projectiles.push(handle),
            _ => owner_entity.helpers.push(handle),
        }
        trace!(%handle, %parent, ?kind, local_id, "entity spawned");
        Ok(handle)
    }

    /// Spawns a helper at the parent's position and facing.
    pub fn create_helper(&mut self, parent: EntityHandle) -> Result<EntityHandle, StoreError> {
        self.spawn_child(parent, EntityKind::Helper)
    }

    /// Spawns a projectile owned by the creator's root, with the creator's facing.
    pub fn create_projectile(&mut self, creator: EntityHandle) -> Result<EntityHandle, StoreError> {
        self.spawn_child(creator, EntityKind::Projectile)
    }

    /// Removes a helper or projectile.
    ///
    /// The helper's own helpers move to its parent, bindings from and to it are
    /// released, and it is unlinked from its owner's lists.
    pub fn destroy(&mut self, handle: EntityHandle) -> Result<(), StoreError> {
        let entity = self.try_get(handle)?;
        if entity.is_root() {
            return Err(StoreError::NotRemovable(handle));
        }
        let parent = entity.parent;
        let orphans = entity.helpers.clone();
        let dependents = entity.bound_dependents.clone();
        let bound_to = entity.binding.map(|binding| binding.target);

        for dependent in dependents {
            if let Some(bound) = self.get_mut(dependent) {
                bound.binding = None;
            }
        }
        if let Some(target) = bound_to.and_then(|target| self.get_mut(target)) {
            target.bound_dependents.retain(|h| *h != handle);
        }

        if let Some(parent) = parent {
            for orphan in &orphans {
                if let Some(child) = self.get_mut(*orphan) {
                    child.parent = Some(parent);
                }
            }
            if let Some(owner) = self.get_mut(parent) {
                owner.helpers.retain(|h| *h != handle);
                owner.projectiles.retain(|h| *h != handle);
                owner.helpers.extend(orphans);
            }
        }

        self.release(handle);
        debug!(%handle, "entity destroyed");
        Ok(())
    }

    /// Depth-first pre-order walk of `root`: the root, each helper subtree in
    /// container order, then the root's projectiles.
    ///
    /// Returns a snapshot so callers may create or destroy entities while iterating.
    pub fn walk(&self, root: RootId) -> Vec<EntityHandle> {
        let mut order = Vec::new();
        let Some(root_handle) = self.root(root) else {
            return order;
        };

        let mut stack = vec![root_handle];
        while let Some(handle) = stack.pop() {
            let Some(entity) = self.get(handle) else {
                continue;
            };
            order.push(handle);
            stack.extend(entity.helpers.iter().rev().copied());
        }

        if let Some(root_entity) = self.get(root_handle) {
            order.extend(root_entity.projectiles.iter().copied());
        }
        order
    }

    /// Walks root P1's tree then root P2's.
    pub fn walk_all(&self) -> Vec<EntityHandle> {
        let mut order = self.walk(RootId::P1);
        order.extend(self.walk(RootId::P2));
        order
    }

    /// Visits every entity of `root` in walk order.
    pub fn for_each_entity(&mut self, root: RootId, mut visitor: impl FnMut(&mut Entity)) {
        for handle in self.walk(root) {
            if let Some(entity) = self.get_mut(handle) {
                visitor(entity);
            }
        }
    }

    /// Finds entities of `root` with the given script-visible id; `-1` matches all.
    pub fn find_by_local_id(&self, root: RootId, local_id: i32) -> Vec<EntityHandle> {
        self.walk(root)
            .into_iter()
            .filter(|handle| {
                self.get(*handle)
                    .is_some_and(|entity| local_id == -1 || entity.local_id == local_id)
            })
            .collect()
    }

    pub fn helper_count(&self, root: RootId) -> usize {
        self.count_kind(root, EntityKind::Helper)
    }

    pub fn projectile_count(&self, root: RootId) -> usize {
        self.count_kind(root, EntityKind::Projectile)
    }

    fn count_kind(&self, root: RootId, kind: EntityKind) -> usize {
        self.walk(root)
            .into_iter()
            .filter(|handle| self.get(*handle).is_some_and(|entity| entity.kind == kind))
            .count()
    }

    /// Drops every entity and forgets both roots.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.roots = [None, None];
        self.next_local_id = [0, 0];
    }
}
