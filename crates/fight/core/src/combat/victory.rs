use strum::{AsRefStr, Display, EnumString};

use crate::hitattr::{AttackClass, AttackType};
use crate::state::{DefeatRecord, FightState, RootId};

/// How a round was won, from the loser's knockout record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VictoryType {
    Normal,
    Special,
    Hyper,
    Throw,
    /// The loser was knocked out while guarding.
    Cheese,
    /// The loser knocked itself out.
    Suicide,
    TimeOver,
}

impl VictoryType {
    pub fn from_defeat(record: &DefeatRecord) -> Self {
        if record.self_inflicted {
            return Self::Suicide;
        }
        if record.while_guarding {
            return Self::Cheese;
        }
        match record.attack {
            Some(attack) if attack.kind == AttackType::Throw => Self::Throw,
            Some(attack) => match attack.class {
                AttackClass::Hyper => Self::Hyper,
                AttackClass::Special => Self::Special,
                AttackClass::Normal => Self::Normal,
            },
            None => Self::Normal,
        }
    }
}

impl FightState {
    /// Classifies `winner`'s victory. `None` while the opponent is still
    /// standing and time has not run out.
    pub fn victory_type(&self, winner: RootId, time_over: bool) -> Option<VictoryType> {
        let loser = self.root_entity(winner.other())?;
        match loser.defeat.as_ref() {
            Some(record) => Some(VictoryType::from_defeat(record)),
            None if time_over => Some(VictoryType::TimeOver),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hitattr::AttackAttribute;

    fn record(attack: Option<AttackAttribute>) -> DefeatRecord {
        DefeatRecord {
            while_guarding: false,
            self_inflicted: false,
            attack,
            ticks_since: 0,
        }
    }

    #[test]
    fn classification_priority() {
        let hyper_throw = AttackAttribute::new(AttackClass::Hyper, AttackType::Throw);
        assert_eq!(VictoryType::from_defeat(&record(Some(hyper_throw))), VictoryType::Throw);

        let special = AttackAttribute::new(AttackClass::Special, AttackType::Projectile);
        assert_eq!(VictoryType::from_defeat(&record(Some(special))), VictoryType::Special);

        let guarding = DefeatRecord {
            while_guarding: true,
            ..record(Some(special))
        };
        assert_eq!(VictoryType::from_defeat(&guarding), VictoryType::Cheese);

        let suicide = DefeatRecord {
            self_inflicted: true,
            ..guarding
        };
        assert_eq!(VictoryType::from_defeat(&suicide), VictoryType::Suicide);
        assert_eq!(VictoryType::from_defeat(&record(None)), VictoryType::Normal);
    }

    #[test]
    fn labels_are_snake_case() {
        assert_eq!(VictoryType::TimeOver.as_ref(), "time_over");
    }
}
