//! Hit-by / not-hit-by filtering.
//!
//! Each entity carries [`FightConfig::HIT_ATTR_SLOTS`] slots. An armed slot
//! decides, for an incoming attack, whether the attack may register as a hit.
//! Slots are armed by scripted logic and decay once per unpaused tick.
mod flags;

pub use flags::{AttackAttribute, AttackClass, AttackType, ClassTypeFlag, StanceMask};

use arrayvec::ArrayVec;
use tracing::trace;

use crate::config::FightConfig;
use crate::error::{CombatError, ErrorSeverity, report};
use crate::state::{Entity, EntityHandle, FightState, StateType, StoreError};

/// Errors raised while configuring a filter slot.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    /// A class/type flag did not parse to its two-character form.
    #[error("malformed hit attribute flag '{0}'")]
    MalformedFlag(String),

    #[error("malformed stance letters '{0}'")]
    MalformedStance(String),

    /// The slot already holds the maximum number of flags.
    #[error("hit attribute slot {slot} already holds {max} flags")]
    TooManyFlags { slot: usize, max: usize },

    #[error("hit attribute slot {0} does not exist")]
    InvalidSlot(usize),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CombatError for FilterError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MalformedFlag(_) | Self::MalformedStance(_) => ErrorSeverity::Internal,
            Self::TooManyFlags { .. } | Self::InvalidSlot(_) => ErrorSeverity::Validation,
            Self::Store(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedFlag(_) => "FILTER_MALFORMED_FLAG",
            Self::MalformedStance(_) => "FILTER_MALFORMED_STANCE",
            Self::TooManyFlags { .. } => "FILTER_TOO_MANY_FLAGS",
            Self::InvalidSlot(_) => "FILTER_INVALID_SLOT",
            Self::Store(err) => err.error_code(),
        }
    }
}

/// What a slot yields when an attack matches it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Polarity {
    /// Hit-by: only matching attacks pass.
    Allow,
    /// Not-hit-by: matching attacks are rejected.
    #[default]
    Deny,
}

/// One hit-by / not-hit-by slot.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct HitAttrSlot {
    pub active: bool,
    pub elapsed: u32,
    pub duration: u32,
    pub stance: StanceMask,
    pub flags: ArrayVec<ClassTypeFlag, { FightConfig::MAX_HIT_ATTR_FLAGS }>,
    pub polarity: Polarity,
}

impl HitAttrSlot {
    /// Arms the slot with `polarity`, clearing flags and restarting the timer.
    pub fn reset(&mut self, polarity: Polarity) {
        self.active = true;
        self.elapsed = 0;
        self.duration = 1;
        self.stance = StanceMask::empty();
        self.flags.clear();
        self.polarity = polarity;
    }

    /// Returns true if `attack` passes this slot for a defender in `stance`.
    pub fn passes(&self, stance: StateType, attack: &AttackAttribute) -> bool {
        if !self.active {
            return true;
        }
        let matched = self.stance.matches(stance)
            && (self.flags.is_empty() || self.flags.iter().any(|flag| flag.matches(attack)));
        let allow = matches!(self.polarity, Polarity::Allow);
        if matched { allow } else { !allow }
    }

    /// Advances the slot by one tick, deactivating it once its duration elapses.
    pub fn advance(&mut self) {
        if !self.active {
            return;
        }
        self.elapsed += 1;
        if self.elapsed >= self.duration {
            self.active = false;
        }
    }
}

/// Returns true if every slot of `defender` lets `attack` through.
pub fn passes_filter(defender: &Entity, attack: &AttackAttribute) -> bool {
    defender
        .not_hit_by
        .iter()
        .all(|slot| slot.passes(defender.state_type, attack))
}

impl FightState {
    /// Arms `slot` as a hit-by slot.
    pub fn reset_allow(&mut self, entity: EntityHandle, slot: usize) -> bool {
        self.configure_slot(entity, slot, |slot| {
            slot.reset(Polarity::Allow);
            Ok(())
        })
    }

    /// Arms `slot` as a not-hit-by slot.
    pub fn reset_deny(&mut self, entity: EntityHandle, slot: usize) -> bool {
        self.configure_slot(entity, slot, |slot| {
            slot.reset(Polarity::Deny);
            Ok(())
        })
    }

    pub fn set_stance_mask(&mut self, entity: EntityHandle, slot: usize, mask: StanceMask) -> bool {
        self.configure_slot(entity, slot, |slot| {
            slot.stance = mask;
            Ok(())
        })
    }

    pub fn set_filter_duration(&mut self, entity: EntityHandle, slot: usize, duration: u32) -> bool {
        self.configure_slot(entity, slot, |slot| {
            slot.duration = duration;
            Ok(())
        })
    }

    /// Registers a two-character class/type flag such as `"NA"` or `"SP"`.
    ///
    /// Malformed flags and flags beyond the slot capacity are logged and ignored.
    pub fn add_class_type_flag(&mut self, entity: EntityHandle, slot: usize, raw: &str) -> bool {
        let index = slot;
        self.configure_slot(entity, slot, |slot| {
            let flag = ClassTypeFlag::parse(raw)?;
            slot.flags
                .try_push(flag)
                .map_err(|_| FilterError::TooManyFlags {
                    slot: index,
                    max: FightConfig::MAX_HIT_ATTR_FLAGS,
                })
        })
    }

    fn configure_slot(
        &mut self,
        entity: EntityHandle,
        slot: usize,
        apply: impl FnOnce(&mut HitAttrSlot) -> Result<(), FilterError>,
    ) -> bool {
        let result = self
            .store
            .try_get_mut(entity)
            .map_err(FilterError::from)
            .and_then(|target| {
                let slot_ref = target
                    .not_hit_by
                    .get_mut(slot)
                    .ok_or(FilterError::InvalidSlot(slot))?;
                apply(slot_ref)
            });
        match result {
            Ok(()) => {
                trace!(%entity, slot, "hit attribute slot updated");
                true
            }
            Err(err) => {
                report(&err);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normal_attack() -> AttackAttribute {
        AttackAttribute::new(AttackClass::Normal, AttackType::Attack)
    }

    fn deny_standing() -> HitAttrSlot {
        let mut slot = HitAttrSlot::default();
        slot.reset(Polarity::Deny);
        slot.stance = StanceMask::STANDING;
        slot.duration = 10;
        slot
    }

    #[test]
    fn inactive_slot_passes() {
        let slot = HitAttrSlot::default();
        assert!(slot.passes(StateType::Standing, &normal_attack()));
    }

    #[test]
    fn deny_slot_rejects_matching_stance() {
        let slot = deny_standing();
        assert!(!slot.passes(StateType::Standing, &normal_attack()));
        assert!(slot.passes(StateType::Crouching, &normal_attack()));
    }

    #[test]
    fn allow_slot_requires_matching_flag() {
        let mut slot = HitAttrSlot::default();
        slot.reset(Polarity::Allow);
        slot.stance = StanceMask::all();
        slot.flags.push(ClassTypeFlag::parse("ha").unwrap());

        assert!(!slot.passes(StateType::Standing, &normal_attack()));
        let hyper = AttackAttribute::new(AttackClass::Hyper, AttackType::Attack);
        assert!(slot.passes(StateType::Standing, &hyper));
    }

    #[test]
    fn slot_expires_after_duration() {
        let mut slot = deny_standing();
        slot.duration = 2;
        slot.advance();
        assert!(slot.active);
        slot.advance();
        assert!(!slot.active);
        assert!(slot.passes(StateType::Standing, &normal_attack()));
    }
}
