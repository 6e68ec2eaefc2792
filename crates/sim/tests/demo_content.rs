//! Plays the bundled demo content end to end.

use std::path::PathBuf;

use fight_content::ContentFactory;
use fight_core::{RootId, StateNo};
use fight_sim::{Match, MatchOptions};

fn factory() -> ContentFactory {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../content");
    ContentFactory::new(dir)
}

#[test]
fn demo_fighters_are_listed() {
    assert_eq!(
        factory().fighter_names().unwrap(),
        vec!["kael".to_string(), "rook".to_string()]
    );
}

#[test]
fn every_demo_file_loads() {
    let factory = factory();
    let stage = factory.load_stage().unwrap();
    assert_eq!(stage.name, "harbor");
    assert!(!factory.load_inputs().unwrap().p1.is_empty());

    for name in ["kael", "rook"] {
        let fighter = factory.load_fighter(name).unwrap();
        for state in [
            StateNo::STAND,
            StateNo::CROUCH,
            StateNo::AIR,
            StateNo::GUARD_START,
            StateNo::GUARD_END,
            StateNo::GUARD_HIT_STAND,
            StateNo::GUARD_HIT_CROUCH,
            StateNo::GUARD_HIT_AIR,
            StateNo::HIT_STAND,
            StateNo::HIT_CROUCH,
            StateNo::HIT_AIR,
            StateNo::HIT_TRIP,
            StateNo::HIT_LYING,
            StateNo::LIE_DOWN,
            StateNo::GET_UP,
        ] {
            assert!(fighter.states.contains(state), "{name} lacks state {state}");
        }
    }
}

#[test]
fn scripted_match_lands_the_opening_jab() {
    let factory = factory();
    let mut fight = Match::load(&factory, "kael", "rook", &MatchOptions::default()).unwrap();
    for _ in 0..60 {
        fight.advance();
    }
    assert_eq!(fight.state().life(RootId::P2), Some(960));
    assert!(fight.effects().spark_count() >= 1);

    let report = fight.run(600);
    assert!(report.frames <= 600);
    assert!(report.fighters[1].life <= 960);
}
