use crate::state::EntityHandle;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectileContact {
    Hit,
    Guarded,
}

/// Bookkeeping for projectile contacts (removal, hit counters, cancel animations).
pub trait ProjectileOracle {
    /// Called once for each projectile participant of a resolved hit.
    fn on_contact(&self, projectile: EntityHandle, other: EntityHandle, contact: ProjectileContact);
}
