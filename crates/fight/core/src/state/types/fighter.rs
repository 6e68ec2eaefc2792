use super::common::Vec2;

/// Reference to a spark animation or sound in either the fighter's own files
/// or the shared common files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectRef {
    /// True when the resource lives in the fighter's own file.
    pub in_player_file: bool,
    pub index: i32,
}

impl EffectRef {
    pub const fn common(index: i32) -> Self {
        Self {
            in_player_file: false,
            index,
        }
    }

    pub const fn own(index: i32) -> Self {
        Self {
            in_player_file: true,
            index,
        }
    }
}

/// Body dimensions used for push, corner and spark placement.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BodySize {
    pub ground_front: f64,
    pub ground_back: f64,
    pub air_front: f64,
    pub air_back: f64,
    pub height: f64,
    /// Head anchor relative to the axis, for a fighter facing right.
    pub head: Vec2,
    /// Mid anchor relative to the axis, for a fighter facing right.
    pub mid: Vec2,
}

impl Default for BodySize {
    fn default() -> Self {
        Self {
            ground_front: 16.0,
            ground_back: 15.0,
            air_front: 12.0,
            air_back: 12.0,
            height: 60.0,
            head: Vec2::new(-5.0, -90.0),
            mid: Vec2::new(-5.0, -60.0),
        }
    }
}

/// Parsed, immutable fighter constants shared by a root and all its helpers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FighterDefinition {
    pub name: String,
    pub life_max: i32,
    pub power_max: i32,
    /// Attack strength in percent; 100 is neutral.
    pub attack: i32,
    /// Defence in percent; 100 is neutral.
    pub defence: i32,
    /// Extra defence (percent) applied while falling.
    pub fall_defence_up: i32,
    /// Ticks spent lying down before getting up.
    pub liedown_time: i32,
    /// Juggle points granted whenever control is regained.
    pub air_juggle: i32,
    /// Local coordinate resolution; every cross-entity computation rescales by it.
    pub coordinate_p: f64,
    pub size: BodySize,
    pub hit_spark: EffectRef,
    pub guard_spark: EffectRef,
    pub ko_sound: Option<EffectRef>,
}

impl FighterDefinition {
    /// Multiplier applied to outgoing damage.
    pub fn attack_multiplier(&self) -> f64 {
        f64::from(self.attack) / 100.0
    }

    /// Multiplier applied to incoming damage; falling adds `fall_defence_up`.
    pub fn defence_multiplier(&self, falling: bool) -> f64 {
        let base = 100.0 / f64::from(self.defence.max(1));
        if falling {
            base * 100.0 / f64::from(self.fall_defence_up + 100)
        } else {
            base
        }
    }
}

impl Default for FighterDefinition {
    fn default() -> Self {
        Self {
            name: String::from("fighter"),
            life_max: 1000,
            power_max: 3000,
            attack: 100,
            defence: 100,
            fall_defence_up: 50,
            liedown_time: 60,
            air_juggle: 15,
            coordinate_p: 240.0,
            size: BodySize::default(),
            hit_spark: EffectRef::common(0),
            guard_spark: EffectRef::common(40),
            ko_sound: Some(EffectRef::common(11)),
        }
    }
}
