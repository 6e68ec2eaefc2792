use crate::engine::FightEngine;
use crate::state::{EntityHandle, RootId, StateNo};

/// Interpreter for the scripted state language.
///
/// The core only knows state numbers. Evaluating a state may call back into
/// the engine (change states, enqueue hits, spawn helpers) through the
/// `engine` handle it receives.
pub trait ScriptOracle {
    /// Returns true if `table` (a root's state table) defines `state`.
    fn state_table_contains(&self, table: RootId, state: StateNo) -> bool;

    /// Runs one tick of `state` from `table` for `entity`.
    fn evaluate_state(
        &self,
        engine: &mut FightEngine<'_>,
        entity: EntityHandle,
        table: RootId,
        state: StateNo,
    );
}
