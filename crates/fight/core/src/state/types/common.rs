use std::fmt;

/// Generational handle into the entity arena.
///
/// Handles are never reused with the same generation, so references held by
/// other entities (bindings, pending hits, contact bookkeeping) go stale
/// instead of aliasing a newer entity that recycled the slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityHandle {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl EntityHandle {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    #[inline]
    pub const fn index(self) -> u32 {
        self.index
    }

    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// One of the two top-level fighters in a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RootId {
    P1,
    P2,
}

impl RootId {
    pub const ALL: [RootId; 2] = [RootId::P1, RootId::P2];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::P1 => 0,
            Self::P2 => 1,
        }
    }

    /// Returns the opposing root.
    #[inline]
    pub const fn other(self) -> Self {
        match self {
            Self::P1 => Self::P2,
            Self::P2 => Self::P1,
        }
    }
}

impl fmt::Display for RootId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::P1 => f.write_str("p1"),
            Self::P2 => f.write_str("p2"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityKind {
    Root,
    Helper,
    /// A helper whose state machine never runs; it only carries an attack.
    Projectile,
}

/// Externally defined state number. The core only knows the reserved ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateNo(pub i32);

impl StateNo {
    pub const STAND: Self = Self(0);
    pub const CROUCH: Self = Self(11);
    pub const AIR: Self = Self(51);

    pub const GUARD_START: Self = Self(120);
    pub const GUARD_END: Self = Self(140);
    pub const GUARD_HIT_STAND: Self = Self(150);
    pub const GUARD_HIT_CROUCH: Self = Self(152);
    pub const GUARD_HIT_AIR: Self = Self(154);

    pub const HIT_STAND: Self = Self(5000);
    pub const HIT_CROUCH: Self = Self(5010);
    pub const HIT_AIR: Self = Self(5020);
    pub const HIT_TRIP: Self = Self(5070);
    pub const HIT_LYING: Self = Self(5080);
    pub const LIE_DOWN: Self = Self(5110);
    pub const GET_UP: Self = Self(5120);

    /// Idle state a fighter returns to when it stops guarding in `stance`.
    pub const fn idle_for(stance: StateType) -> Option<Self> {
        match stance {
            StateType::Standing => Some(Self::STAND),
            StateType::Crouching => Some(Self::CROUCH),
            StateType::Air => Some(Self::AIR),
            StateType::Lying => None,
        }
    }
}

impl fmt::Display for StateNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stance of an entity; governs guard eligibility and hit reactions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[derive(strum::Display, strum::EnumString, strum::AsRefStr)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateType {
    #[default]
    Standing,
    Crouching,
    Air,
    Lying,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[derive(strum::Display, strum::EnumString, strum::AsRefStr)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveType {
    #[default]
    Idle,
    Attack,
    BeingHit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// `1.0` when facing right, `-1.0` when facing left.
    #[inline]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    #[inline]
    pub const fn is_right(self) -> bool {
        matches!(self, Self::Right)
    }
}

/// Continuous 2D vector in an entity's local coordinate units (y grows downward).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Mirrors the x component when `facing` is left.
    pub fn faced(self, facing: Facing) -> Self {
        Self::new(self.x * facing.sign(), self.y)
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Count of inner simulation updates since the match was loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Self = Self(0);
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facing_mirrors_vectors() {
        let v = Vec2::new(3.0, -2.0);
        assert_eq!(v.faced(Facing::Right), Vec2::new(3.0, -2.0));
        assert_eq!(v.faced(Facing::Left), Vec2::new(-3.0, -2.0));
        assert_eq!(Facing::Left.opposite(), Facing::Right);
    }

    #[test]
    fn idle_state_per_stance() {
        assert_eq!(StateNo::idle_for(StateType::Standing), Some(StateNo::STAND));
        assert_eq!(StateNo::idle_for(StateType::Crouching), Some(StateNo::CROUCH));
        assert_eq!(StateNo::idle_for(StateType::Air), Some(StateNo::AIR));
        assert_eq!(StateNo::idle_for(StateType::Lying), None);
    }

    #[test]
    fn stance_parses_case_insensitively() {
        assert_eq!("AIR".parse::<StateType>().ok(), Some(StateType::Air));
        assert_eq!(MoveType::BeingHit.as_ref(), "being_hit");
    }
}
