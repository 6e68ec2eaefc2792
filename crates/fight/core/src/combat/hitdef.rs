//! Attack descriptors and the records derived from them.

use bitflags::bitflags;

use crate::hitattr::AttackAttribute;
use crate::state::{EffectRef, EntityHandle, Facing, RootId, StateNo, StateType, Vec2};

bitflags! {
    /// Stances allowed to guard an attack (`H` high, `L` low, `M` mid, `A` air).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct GuardFlags: u8 {
        const HIGH = 1 << 0;
        const LOW  = 1 << 1;
        const MID  = 1 << 2;
        const AIR  = 1 << 3;
    }
}

impl GuardFlags {
    /// Returns true if a defender in `stance` can block an attack with these flags.
    pub fn guardable_in(self, stance: StateType) -> bool {
        match stance {
            StateType::Standing => self.intersects(Self::HIGH | Self::MID),
            StateType::Crouching => self.intersects(Self::LOW | Self::MID),
            StateType::Air => self.contains(Self::AIR),
            StateType::Lying => false,
        }
    }
}

/// How the defender reacts on the ground.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroundType {
    #[default]
    High,
    Low,
    /// Sweeps the defender off their feet.
    Trip,
    None,
}

/// Which way the defender faces once the hit lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FacingRule {
    /// Turn to face the attacker.
    #[default]
    FaceAttacker,
    /// Face the same way as the attacker.
    SameAsAttacker,
    Keep,
}

/// Extra attacker velocity when the defender is pinned in a corner, per defender case.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CornerPush {
    pub ground: f64,
    pub air: f64,
    pub down: f64,
    pub guard: f64,
    pub air_guard: f64,
}

/// Hit-pause applied to each participant, in ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PauseTimes {
    /// Attacker freeze.
    pub attacker: u32,
    /// Defender shake.
    pub defender: u32,
}

/// Complete description of an attack, authored in fighter content and armed by scripts.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HitDefinition {
    pub attribute: AttackAttribute,
    pub hit_damage: i32,
    pub guard_damage: i32,
    /// Power gained by the attacker on hit / on guard.
    pub attacker_power: i32,
    pub attacker_guard_power: i32,
    /// Power gained by the defender on hit / on guard.
    pub defender_power: i32,
    pub defender_guard_power: i32,
    pub guard_flags: GuardFlags,
    pub unguardable: bool,
    pub pause: PauseTimes,
    pub guard_pause: PauseTimes,
    /// Knockback in the defender's facing frame (negative x pushes away).
    pub ground_velocity: Vec2,
    pub air_velocity: Vec2,
    pub guard_velocity: f64,
    pub ground_type: GroundType,
    pub ground_hit_time: u32,
    pub air_hit_time: u32,
    pub guard_hit_time: u32,
    pub ground_fall: bool,
    pub air_fall: bool,
    pub spark: Option<EffectRef>,
    pub guard_spark: Option<EffectRef>,
    pub spark_offset: Vec2,
    pub hit_sound: Option<EffectRef>,
    pub guard_sound: Option<EffectRef>,
    pub attacker_state: Option<StateNo>,
    pub defender_state: Option<StateNo>,
    /// Run `defender_state` from the attacker's state table.
    pub defender_uses_attacker_states: bool,
    pub juggle_cost: i32,
    pub corner_push: CornerPush,
    /// Defender starts guarding when closer than this (attacker units).
    pub guard_distance: f64,
    pub facing: FacingRule,
    /// Attacker ignores the defender's juggle budget.
    pub no_juggle_check: bool,
}

impl Default for HitDefinition {
    fn default() -> Self {
        Self {
            attribute: AttackAttribute::default(),
            hit_damage: 0,
            guard_damage: 0,
            attacker_power: 0,
            attacker_guard_power: 0,
            defender_power: 0,
            defender_guard_power: 0,
            guard_flags: GuardFlags::HIGH | GuardFlags::LOW | GuardFlags::AIR,
            unguardable: false,
            pause: PauseTimes::default(),
            guard_pause: PauseTimes::default(),
            ground_velocity: Vec2::ZERO,
            air_velocity: Vec2::ZERO,
            guard_velocity: 0.0,
            ground_type: GroundType::High,
            ground_hit_time: 0,
            air_hit_time: 20,
            guard_hit_time: 0,
            ground_fall: false,
            air_fall: false,
            spark: None,
            guard_spark: None,
            spark_offset: Vec2::ZERO,
            hit_sound: None,
            guard_sound: None,
            attacker_state: None,
            defender_state: None,
            defender_uses_attacker_states: false,
            juggle_cost: 0,
            corner_push: CornerPush::default(),
            guard_distance: 160.0,
            facing: FacingRule::FaceAttacker,
            no_juggle_check: false,
        }
    }
}

/// Attack snapshot queued on a defender until the next pre-state-machine pass.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingHit {
    pub attacker: EntityHandle,
    pub attacker_root: RootId,
    pub attacker_facing: Facing,
    pub definition: HitDefinition,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitPhase {
    /// Frozen in hit-shake; knockback not yet applied.
    Shaking,
    /// Knockback applied, counting down the hit time.
    Recoiling { remaining: u32 },
    Over,
}

/// The hit currently affecting a defender.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveHit {
    pub attacker: EntityHandle,
    pub attacker_root: RootId,
    pub definition: HitDefinition,
    pub guarded: bool,
    /// Knockback selected for the defender's stance, in the defender's facing frame.
    pub velocity: Vec2,
    /// Recoil ticks once the shake ends.
    pub hit_time: u32,
    pub phase: HitPhase,
}

impl ActiveHit {
    pub fn is_over(&self) -> bool {
        matches!(self.phase, HitPhase::Over)
    }

    pub fn is_shaking(&self) -> bool {
        matches!(self.phase, HitPhase::Shaking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_flags_per_stance() {
        let high = GuardFlags::HIGH;
        assert!(high.guardable_in(StateType::Standing));
        assert!(!high.guardable_in(StateType::Crouching));

        let mid = GuardFlags::MID;
        assert!(mid.guardable_in(StateType::Standing));
        assert!(mid.guardable_in(StateType::Crouching));
        assert!(!mid.guardable_in(StateType::Air));

        assert!(GuardFlags::AIR.guardable_in(StateType::Air));
        assert!(!GuardFlags::all().guardable_in(StateType::Lying));
    }
}
