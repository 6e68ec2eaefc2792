//! Data-driven fight content and its loaders.
//!
//! This crate turns RON/TOML files into the in-memory tables the combat core
//! and the demo collaborators consume:
//! - Match configuration (TOML)
//! - Stage geometry (TOML)
//! - Fighter constants (RON)
//! - Hit definition catalogs (RON)
//! - State tables for the table-driven script interpreter (RON)
//! - Scripted input timelines (RON)
//!
//! Content is read once before a match and never appears in `FightState`.

pub mod inputs;
pub mod stage;
pub mod states;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use inputs::{InputScript, InputSpan};
pub use stage::StageDefinition;
pub use states::{AttackWindow, StateSpec, StateTable, Transition};

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, FighterContent, FighterLoader, HitCatalog, HitCatalogLoader,
    InputLoader, StageLoader, StateTableLoader,
};
