use crate::hitattr::AttackAttribute;
use crate::state::{EntityHandle, StateNo};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitOverride {
    /// The hit is dropped before it touches the defender.
    Ignore,
    /// The defender goes to `state` instead of its standard reaction.
    Redirect { state: StateNo, force_air: bool },
}

/// Per-defender table of attacks that bypass the standard reaction.
pub trait HitOverrideOracle {
    fn find_override(&self, defender: EntityHandle, attack: &AttackAttribute) -> Option<HitOverride>;
}
