/// Match configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FightConfig {
    /// Ticks after a knockout during which the defeated fighter can still be hit.
    pub over_hit_grace_ticks: u32,

    /// Margin (in stage units) used when deciding whether a body touches a stage edge.
    pub corner_epsilon: f64,

    /// Initial time dilation factor. `1.0` runs one inner update per outer tick.
    pub speed: f64,

    /// Training mode disables knockouts and regenerates life/power while in control.
    pub training_mode: bool,

    /// Life restored at round start, as a percentage of the fighter's maximum.
    pub start_life_percent: u32,
}

impl FightConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum class/type flags carried by a single hit-attribute slot.
    pub const MAX_HIT_ATTR_FLAGS: usize = 10;
    /// Number of hit-attribute (hit-by / not-hit-by) slots per entity.
    pub const HIT_ATTR_SLOTS: usize = 2;
    /// Nested immediate state evaluations allowed before the driver refuses to recurse.
    pub const MAX_EVALUATION_DEPTH: u32 = 32;

    // ===== state-number ranges =====
    pub const GUARD_STATE_FIRST: i32 = 120;
    pub const GUARD_STATE_LAST: i32 = 155;

    // ===== training mode regeneration per tick =====
    pub const TRAINING_LIFE_REGEN: i32 = 3;
    pub const TRAINING_POWER_REGEN: i32 = 50;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_OVER_HIT_GRACE_TICKS: u32 = 45;
    pub const DEFAULT_CORNER_EPSILON: f64 = 1.0;
    pub const DEFAULT_SPEED: f64 = 1.0;
    pub const DEFAULT_START_LIFE_PERCENT: u32 = 100;

    pub fn new() -> Self {
        Self {
            over_hit_grace_ticks: Self::DEFAULT_OVER_HIT_GRACE_TICKS,
            corner_epsilon: Self::DEFAULT_CORNER_EPSILON,
            speed: Self::DEFAULT_SPEED,
            training_mode: false,
            start_life_percent: Self::DEFAULT_START_LIFE_PERCENT,
        }
    }

    pub fn training() -> Self {
        Self {
            training_mode: true,
            ..Self::new()
        }
    }

    /// Returns true if `state` lies inside the reserved guard state range.
    pub const fn is_guard_state(state: i32) -> bool {
        state >= Self::GUARD_STATE_FIRST && state <= Self::GUARD_STATE_LAST
    }
}

impl Default for FightConfig {
    fn default() -> Self {
        Self::new()
    }
}
