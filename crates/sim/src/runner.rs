//! Match loop: collaborators, the world, and the per-frame schedule.

use std::fmt;
use std::sync::Arc;

use anyhow::Context;
use fight_content::{ContentFactory, FighterContent, InputScript, StageDefinition};
use fight_core::{
    AnimationOracle, CommandOracle, EffectsOracle, Env, FightConfig, FightEngine, FightEnv,
    FightState, RootId, ScriptOracle, StageOracle, StateNo, StateType, VictoryType,
};
use tracing::{debug, info};

use crate::collision::Collision;
use crate::commands::ScriptedCommands;
use crate::effects::LoggedEffects;
use crate::script::TableScript;
use crate::stage::FixedStage;

/// Command-line level overrides applied on top of `config.toml`.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchOptions {
    pub speed: Option<f64>,
    pub training: bool,
    /// Frames to run before the round is decided on time.
    pub max_frames: u64,
}

impl MatchOptions {
    /// 99 seconds at 60 frames per second.
    pub const ROUND_FRAMES: u64 = 99 * 60;

    pub fn apply(&self, config: &mut FightConfig) {
        if let Some(speed) = self.speed {
            config.speed = speed;
        }
        if self.training {
            config.training_mode = true;
        }
    }
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            speed: None,
            training: false,
            max_frames: Self::ROUND_FRAMES,
        }
    }
}

/// A loaded match and every collaborator the engine needs.
pub struct Match {
    state: FightState,
    script: TableScript,
    stage: FixedStage,
    commands: ScriptedCommands,
    effects: LoggedEffects,
    collision: Collision,
    frame: u64,
}

impl Match {
    pub fn new(
        config: FightConfig,
        stage: StageDefinition,
        inputs: InputScript,
        p1: FighterContent,
        p2: FighterContent,
    ) -> Self {
        let stage = FixedStage(stage);
        let definitions = [Arc::clone(&p1.definition), Arc::clone(&p2.definition)];
        let state = FightState::load_match(config, definitions, &stage);
        Self {
            state,
            script: TableScript::new(p1, p2),
            stage,
            commands: ScriptedCommands::new(inputs),
            effects: LoggedEffects::default(),
            collision: Collision::new(),
            frame: 0,
        }
    }

    /// Loads everything a match needs from a content directory.
    pub fn load(
        factory: &ContentFactory,
        p1: &str,
        p2: &str,
        options: &MatchOptions,
    ) -> anyhow::Result<Self> {
        let mut config = factory.load_config().context("loading match config")?;
        options.apply(&mut config);
        let stage = factory.load_stage().context("loading stage")?;
        let inputs = factory.load_inputs().context("loading inputs")?;
        let p1 = factory
            .load_fighter(p1)
            .with_context(|| format!("loading fighter '{p1}'"))?;
        let p2 = factory
            .load_fighter(p2)
            .with_context(|| format!("loading fighter '{p2}'"))?;
        Ok(Self::new(config, stage, inputs, p1, p2))
    }

    pub fn state(&self) -> &FightState {
        &self.state
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn effects(&self) -> &LoggedEffects {
        &self.effects
    }

    /// Runs one outer tick, then looks for new contacts.
    ///
    /// Returns the number of inner updates the tick performed.
    pub fn advance(&mut self) -> u32 {
        self.commands.set_frame(self.frame);
        let env: FightEnv<'_> = Env::new(
            Some(&self.script as &dyn ScriptOracle),
            Some(&self.stage as &dyn StageOracle),
            Some(&self.commands as &dyn CommandOracle),
            Some(&self.effects as &dyn EffectsOracle),
            None,
            None,
            Some(&self.script as &dyn AnimationOracle),
        );
        let updates = FightEngine::new(&mut self.state, env).tick();
        let contacts = self.collision.detect(&mut self.state, &self.script);
        if contacts > 0 {
            debug!(frame = self.frame, contacts, "contacts queued");
        }
        self.frame += 1;
        updates
    }

    /// The first root whose opponent has been knocked out.
    pub fn winner(&self) -> Option<(RootId, VictoryType)> {
        RootId::ALL.into_iter().find_map(|root| {
            self.state
                .victory_type(root, false)
                .map(|victory| (root, victory))
        })
    }

    /// Decides the round on remaining life. `None` on a draw.
    fn time_over(&self) -> Option<(RootId, VictoryType)> {
        let p1 = self.state.life(RootId::P1)?;
        let p2 = self.state.life(RootId::P2)?;
        let leader = match p1.cmp(&p2) {
            std::cmp::Ordering::Greater => RootId::P1,
            std::cmp::Ordering::Less => RootId::P2,
            std::cmp::Ordering::Equal => return None,
        };
        self.state
            .victory_type(leader, true)
            .map(|victory| (leader, victory))
    }

    /// Runs until someone is knocked out or `max_frames` have elapsed.
    pub fn run(&mut self, max_frames: u64) -> MatchReport {
        let mut outcome = None;
        while self.frame < max_frames {
            self.advance();
            outcome = self.winner();
            if outcome.is_some() {
                break;
            }
        }
        let time_over = outcome.is_none();
        if time_over {
            outcome = self.time_over();
        }
        if let Some((winner, victory)) = outcome {
            info!(frame = self.frame, %winner, %victory, "round decided");
        } else {
            info!(frame = self.frame, "draw");
        }
        self.report(outcome, time_over)
    }

    pub fn report(&self, outcome: Option<(RootId, VictoryType)>, time_over: bool) -> MatchReport {
        MatchReport {
            frames: self.frame,
            fighters: RootId::ALL
                .into_iter()
                .filter_map(|root| FighterSummary::of(&self.state, root))
                .collect(),
            outcome,
            time_over,
            sparks: self.effects.spark_count(),
            sounds: self.effects.sound_count(),
        }
    }
}

/// End-of-match snapshot of one root.
#[derive(Clone, Debug, PartialEq)]
pub struct FighterSummary {
    pub root: RootId,
    pub name: String,
    pub life: i32,
    pub life_max: i32,
    pub power: i32,
    pub state: StateNo,
    pub stance: StateType,
}

impl FighterSummary {
    fn of(state: &FightState, root: RootId) -> Option<Self> {
        let entity = state.root_entity(root)?;
        Some(Self {
            root,
            name: entity.definition.name.clone(),
            life: entity.life,
            life_max: entity.life_max(),
            power: entity.power,
            state: entity.machine.state,
            stance: entity.state_type,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MatchReport {
    pub frames: u64,
    pub fighters: Vec<FighterSummary>,
    pub outcome: Option<(RootId, VictoryType)>,
    pub time_over: bool,
    pub sparks: usize,
    pub sounds: usize,
}

impl fmt::Display for MatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "frames: {}", self.frames)?;
        for fighter in &self.fighters {
            writeln!(
                f,
                "{} {:<12} life {:>5}/{:<5} power {:>5}  state {:>5} ({})",
                fighter.root,
                fighter.name,
                fighter.life,
                fighter.life_max,
                fighter.power,
                fighter.state.0,
                fighter.stance,
            )?;
        }
        writeln!(f, "effects: {} sparks, {} sounds", self.sparks, self.sounds)?;
        match self.outcome {
            Some((winner, victory)) => write!(f, "winner: {winner} by {victory}"),
            None => write!(f, "draw"),
        }
    }
}

#[cfg(test)]
mod tests {
    use fight_content::InputSpan;
    use fight_core::{MoveType, Vec2};

    use super::*;
    use crate::fixtures::{self, JAB};

    fn span(command: &str, from: u64, until: u64) -> InputSpan {
        InputSpan {
            command: command.to_string(),
            from,
            until,
        }
    }

    fn close_stage() -> StageDefinition {
        StageDefinition {
            p1_start: Vec2::new(-25.0, 0.0),
            p2_start: Vec2::new(25.0, 0.0),
            ..StageDefinition::default()
        }
    }

    fn sparring(config: FightConfig, inputs: InputScript) -> Match {
        Match::new(
            config,
            close_stage(),
            inputs,
            fixtures::fighter("alpha"),
            fixtures::fighter("beta"),
        )
    }

    #[test]
    fn idle_fighters_time_out_in_a_draw() {
        let mut fight = sparring(FightConfig::default(), InputScript::default());
        let report = fight.run(30);
        assert_eq!(report.frames, 30);
        assert!(report.time_over);
        assert_eq!(report.outcome, None);
        assert_eq!(report.fighters.len(), 2);
        assert_eq!(report.fighters[0].state, StateNo::STAND);
        assert_eq!(report.fighters[0].name, "alpha");
        assert!(report.to_string().ends_with("draw"));
    }

    #[test]
    fn a_jab_lands_once() {
        let inputs = InputScript {
            p1: vec![span("jab", 1, 2)],
            p2: vec![],
        };
        let mut fight = sparring(FightConfig::default(), inputs);

        fight.advance();
        fight.advance();
        assert_eq!(fight.state().state_no(RootId::P1), Some(JAB));
        let p1 = fight.state().root_entity(RootId::P1).unwrap();
        assert!(!p1.control);
        assert_eq!(p1.move_type, MoveType::Attack);

        for _ in 0..12 {
            fight.advance();
        }
        assert_eq!(fight.state().life(RootId::P2), Some(950));
        assert_eq!(fight.state().state_no(RootId::P1), Some(StateNo::STAND));
        assert_eq!(fight.effects().spark_count(), 1);

        let report = fight.run(40);
        assert_eq!(report.outcome, Some((RootId::P1, VictoryType::TimeOver)));
        assert_eq!(report.fighters[1].life, 950);
    }

    #[test]
    fn holding_back_guards_the_jab() {
        let inputs = InputScript {
            p1: vec![span("jab", 1, 2)],
            p2: vec![span("holdback", 0, 30)],
        };
        let mut fight = sparring(FightConfig::default(), inputs);
        for _ in 0..14 {
            fight.advance();
        }
        assert_eq!(fight.state().life(RootId::P2), Some(995));
    }

    #[test]
    fn hop_lands_back_on_the_floor() {
        let inputs = InputScript {
            p1: vec![span("hop", 0, 1)],
            p2: vec![],
        };
        let mut fight = sparring(FightConfig::default(), inputs);
        fight.advance();
        assert_eq!(fight.state().stance(RootId::P1), Some(StateType::Air));

        for _ in 0..30 {
            fight.advance();
        }
        let p1 = fight.state().root_entity(RootId::P1).unwrap();
        assert_eq!(p1.machine.state, StateNo::STAND);
        assert_eq!(p1.state_type, StateType::Standing);
        assert_eq!(p1.body.position.y, 0.0);
        assert!(p1.control);
    }

    #[test]
    fn options_override_the_loaded_config() {
        let mut config = FightConfig::default();
        MatchOptions {
            speed: Some(0.5),
            training: true,
            ..MatchOptions::default()
        }
        .apply(&mut config);
        assert_eq!(config.speed, 0.5);
        assert!(config.training_mode);

        let mut fight = sparring(config, InputScript::default());
        let updates: u32 = (0..4).map(|_| fight.advance()).sum();
        assert_eq!(updates, 2);
    }
}
