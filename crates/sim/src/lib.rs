//! Headless match runner.
//!
//! Wires content loaded by `fight-content` into the combat core through
//! table-driven collaborators, then steps a match until someone wins or the
//! frame budget runs out.
pub mod collision;
pub mod commands;
pub mod effects;
pub mod runner;
pub mod script;
pub mod stage;

#[cfg(test)]
mod fixtures;

pub use collision::Collision;
pub use commands::ScriptedCommands;
pub use effects::LoggedEffects;
pub use runner::{FighterSummary, Match, MatchOptions, MatchReport};
pub use script::TableScript;
pub use stage::FixedStage;
