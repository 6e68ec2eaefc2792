//! Small in-memory fighters for unit tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use fight_content::{AttackWindow, FighterContent, StateSpec, StateTable, Transition};
use fight_core::{FighterDefinition, HitDefinition, MoveType, StateNo, StateType, Vec2};

use crate::script::TableScript;

pub const JAB: StateNo = StateNo(200);
pub const HOP: StateNo = StateNo(40);

fn to(state: StateNo) -> Transition {
    Transition {
        to: state.0,
        ..Transition::default()
    }
}

fn idle(stance: StateType) -> StateSpec {
    StateSpec {
        stance: Some(stance),
        move_type: Some(MoveType::Idle),
        control: Some(true),
        ..StateSpec::default()
    }
}

fn reaction(next: StateNo) -> StateSpec {
    StateSpec {
        transitions: vec![Transition {
            hit_over: true,
            ..to(next)
        }],
        ..StateSpec::default()
    }
}

pub fn table() -> StateTable {
    let mut states = BTreeMap::new();
    states.insert(
        StateNo::STAND.0,
        StateSpec {
            snap_to_floor: true,
            transitions: vec![
                Transition {
                    command: Some("jab".into()),
                    ..to(JAB)
                },
                Transition {
                    command: Some("hop".into()),
                    ..to(HOP)
                },
            ],
            ..idle(StateType::Standing)
        },
    );
    states.insert(StateNo::CROUCH.0, idle(StateType::Crouching));
    states.insert(StateNo::AIR.0, idle(StateType::Air));
    states.insert(
        HOP.0,
        StateSpec {
            stance: Some(StateType::Air),
            control: Some(false),
            velocity: Some(Vec2::new(0.0, -4.0)),
            acceleration: Some(Vec2::new(0.0, 0.5)),
            transitions: vec![Transition {
                landed: true,
                after: Some(1),
                ..to(StateNo::STAND)
            }],
            ..StateSpec::default()
        },
    );
    states.insert(
        JAB.0,
        StateSpec {
            move_type: Some(MoveType::Attack),
            control: Some(false),
            duration: Some(8),
            attack: Some(AttackWindow {
                hit: "jab".into(),
                start: 2,
                end: 3,
                reach: 30.0,
            }),
            transitions: vec![Transition {
                after: Some(8),
                ..to(StateNo::STAND)
            }],
            ..StateSpec::default()
        },
    );
    states.insert(
        StateNo::GUARD_START.0,
        StateSpec {
            control: Some(false),
            transitions: vec![to(StateNo::GUARD_END)],
            ..StateSpec::default()
        },
    );
    states.insert(
        StateNo::GUARD_END.0,
        StateSpec {
            duration: Some(3),
            ..StateSpec::default()
        },
    );
    for guard in [
        StateNo::GUARD_HIT_STAND,
        StateNo::GUARD_HIT_CROUCH,
        StateNo::GUARD_HIT_AIR,
    ] {
        states.insert(guard.0, reaction(StateNo::GUARD_END));
    }
    for hit in [StateNo::HIT_STAND, StateNo::HIT_CROUCH, StateNo::HIT_AIR, StateNo::HIT_TRIP] {
        states.insert(hit.0, reaction(StateNo::STAND));
    }
    states.insert(StateNo::HIT_LYING.0, reaction(StateNo::LIE_DOWN));
    states.insert(
        StateNo::LIE_DOWN.0,
        StateSpec {
            stance: Some(StateType::Lying),
            ..StateSpec::default()
        },
    );
    states.insert(
        StateNo::GET_UP.0,
        StateSpec {
            transitions: vec![Transition {
                after: Some(10),
                ..to(StateNo::STAND)
            }],
            ..StateSpec::default()
        },
    );
    StateTable { states }
}

pub fn jab() -> HitDefinition {
    HitDefinition {
        hit_damage: 50,
        guard_damage: 5,
        ground_hit_time: 6,
        guard_hit_time: 4,
        ..HitDefinition::default()
    }
}

pub fn fighter(name: &str) -> FighterContent {
    FighterContent {
        definition: Arc::new(FighterDefinition {
            name: name.to_string(),
            ..FighterDefinition::default()
        }),
        hits: HashMap::from([("jab".to_string(), jab())]),
        states: table(),
    }
}

pub fn script() -> TableScript {
    TableScript::new(fighter("alpha"), fighter("beta"))
}
