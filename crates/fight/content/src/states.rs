//! State tables for the table-driven script interpreter.
//!
//! A table maps state numbers to a [`StateSpec`]: what the state sets up on
//! entry, an optional attack window, and the transitions that leave it.

use std::collections::BTreeMap;

use fight_core::{MoveType, StateNo, StateType, Vec2};

/// Ticks of a state during which an attack is armed.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackWindow {
    /// Name of the hit in the fighter's catalog.
    pub hit: String,
    /// First and last state time (inclusive) the attack is armed.
    pub start: i32,
    pub end: i32,
    /// Horizontal reach past the body front, in fighter units.
    pub reach: f64,
}

impl AttackWindow {
    pub fn is_open(&self, time: i32) -> bool {
        self.start <= time && time <= self.end
    }
}

/// Leaves the state once every condition that is set holds.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Transition {
    pub to: i32,
    /// Minimum time spent in the state.
    pub after: Option<i32>,
    /// Command that must be held; only honoured while the entity has control.
    pub command: Option<String>,
    /// Wait until the active hit has run its course.
    pub hit_over: bool,
    /// Wait until the body is back on the floor and falling.
    pub landed: bool,
}

impl Transition {
    pub fn target(&self) -> StateNo {
        StateNo(self.to)
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StateSpec {
    pub stance: Option<StateType>,
    pub move_type: Option<MoveType>,
    pub control: Option<bool>,
    /// Facing-relative velocity set on entry.
    pub velocity: Option<Vec2>,
    pub acceleration: Option<Vec2>,
    /// Puts the body back on the floor on entry.
    pub snap_to_floor: bool,
    /// Animation length in ticks; `None` loops forever.
    pub duration: Option<i32>,
    pub attack: Option<AttackWindow>,
    /// Checked in order; the first one whose conditions hold wins.
    pub transitions: Vec<Transition>,
}

#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StateTable {
    pub states: BTreeMap<i32, StateSpec>,
}

impl StateTable {
    pub fn get(&self, state: StateNo) -> Option<&StateSpec> {
        self.states.get(&state.0)
    }

    pub fn contains(&self, state: StateNo) -> bool {
        self.states.contains_key(&state.0)
    }

    /// Animation ticks left after `time` ticks in `state`.
    pub fn remaining_time(&self, state: StateNo, time: i32) -> i32 {
        self.get(state)
            .and_then(|spec| spec.duration)
            .map_or(i32::MAX, |duration| duration - time - 1)
    }

    /// Transition targets missing from the table, as (from, to) pairs.
    pub fn dangling_transitions(&self) -> Vec<(i32, i32)> {
        self.states
            .iter()
            .flat_map(|(from, spec)| spec.transitions.iter().map(move |t| (*from, t.to)))
            .filter(|(_, to)| !self.states.contains_key(to))
            .collect()
    }

    /// Hit names referenced by attack windows.
    pub fn referenced_hits(&self) -> impl Iterator<Item = &str> {
        self.states
            .values()
            .filter_map(|spec| spec.attack.as_ref())
            .map(|attack| attack.hit.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> StateTable {
        let mut states = BTreeMap::new();
        states.insert(
            0,
            StateSpec {
                transitions: vec![Transition {
                    to: 200,
                    command: Some("jab".into()),
                    ..Transition::default()
                }],
                ..StateSpec::default()
            },
        );
        states.insert(
            200,
            StateSpec {
                attack: Some(AttackWindow {
                    hit: "jab".into(),
                    start: 3,
                    end: 5,
                    reach: 30.0,
                }),
                transitions: vec![Transition {
                    to: 7,
                    after: Some(12),
                    ..Transition::default()
                }],
                ..StateSpec::default()
            },
        );
        StateTable { states }
    }

    #[test]
    fn reports_dangling_transitions() {
        let table = table();
        assert!(table.contains(StateNo(200)));
        assert_eq!(table.dangling_transitions(), vec![(200, 7)]);
        assert_eq!(table.referenced_hits().collect::<Vec<_>>(), vec!["jab"]);
    }

    #[test]
    fn looping_states_never_finish() {
        let mut table = table();
        table.states.get_mut(&200).unwrap().duration = Some(4);
        assert_eq!(table.remaining_time(StateNo(200), 0), 3);
        assert_eq!(table.remaining_time(StateNo(200), 3), 0);
        assert_eq!(table.remaining_time(StateNo(0), 50), i32::MAX);
        assert_eq!(table.remaining_time(StateNo(999), 0), i32::MAX);
    }

    #[test]
    fn attack_window_is_inclusive() {
        let table = table();
        let window = table.get(StateNo(200)).and_then(|s| s.attack.as_ref()).unwrap();
        assert!(!window.is_open(2));
        assert!(window.is_open(3));
        assert!(window.is_open(5));
        assert!(!window.is_open(6));
    }
}
