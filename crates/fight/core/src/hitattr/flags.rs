//! Attack attribute vocabulary: stance masks, attack classes and attack types.

use bitflags::bitflags;

use super::FilterError;
use crate::state::StateType;

bitflags! {
    /// Set of stances a filter slot applies to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct StanceMask: u8 {
        const STANDING  = 1 << 0;
        const CROUCHING = 1 << 1;
        const AIR       = 1 << 2;
        const LYING     = 1 << 3;
    }
}

impl StanceMask {
    /// Mask containing exactly the given stance.
    pub const fn of(stance: StateType) -> Self {
        match stance {
            StateType::Standing => Self::STANDING,
            StateType::Crouching => Self::CROUCHING,
            StateType::Air => Self::AIR,
            StateType::Lying => Self::LYING,
        }
    }

    #[inline]
    pub fn matches(self, stance: StateType) -> bool {
        self.contains(Self::of(stance))
    }

    /// Parses a letter mask such as `"SCA"` (`L` selects lying).
    pub fn from_letters(letters: &str) -> Result<Self, FilterError> {
        let mut mask = Self::empty();
        for ch in letters.chars().filter(|c| !c.is_whitespace()) {
            mask |= match ch.to_ascii_uppercase() {
                'S' => Self::STANDING,
                'C' => Self::CROUCHING,
                'A' => Self::AIR,
                'L' => Self::LYING,
                _ => return Err(FilterError::MalformedStance(letters.to_owned())),
            };
        }
        Ok(mask)
    }
}

/// Strength class of an attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[derive(strum::Display, strum::EnumString, strum::AsRefStr)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackClass {
    #[default]
    Normal,
    Special,
    Hyper,
}

/// Delivery type of an attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[derive(strum::Display, strum::EnumString, strum::AsRefStr)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackType {
    #[default]
    Attack,
    Throw,
    Projectile,
}

/// Class and type of a concrete attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackAttribute {
    pub class: AttackClass,
    pub kind: AttackType,
}

impl AttackAttribute {
    pub const fn new(class: AttackClass, kind: AttackType) -> Self {
        Self { class, kind }
    }
}

/// One class/type pair registered on a filter slot.
///
/// `class == None` matches every class (the `a` class letter).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassTypeFlag {
    pub class: Option<AttackClass>,
    pub kind: AttackType,
}

impl ClassTypeFlag {
    pub fn matches(&self, attack: &AttackAttribute) -> bool {
        self.class.is_none_or(|class| class == attack.class) && self.kind == attack.kind
    }

    /// Parses the two-character form: class (`n`, `s`, `h`, `a`) then type (`a`, `p`, `t`).
    ///
    /// Whitespace is ignored and letters are case-insensitive.
    pub fn parse(raw: &str) -> Result<Self, FilterError> {
        let compact: String = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let malformed = || FilterError::MalformedFlag(raw.to_owned());

        let mut chars = compact.chars();
        let (Some(class_ch), Some(kind_ch), None) = (chars.next(), chars.next(), chars.next())
        else {
            return Err(malformed());
        };

        let class = match class_ch {
            'n' => Some(AttackClass::Normal),
            's' => Some(AttackClass::Special),
            'h' => Some(AttackClass::Hyper),
            'a' => None,
            _ => return Err(malformed()),
        };
        let kind = match kind_ch {
            'a' => AttackType::Attack,
            'p' => AttackType::Projectile,
            't' => AttackType::Throw,
            _ => return Err(malformed()),
        };
        Ok(Self { class, kind })
    }
}
