//! Error types for the state machine driver.

use crate::env::OracleError;
use crate::error::{CombatError, ErrorSeverity};
use crate::state::{EntityHandle, RootId, StateNo, StoreError};

/// Identifies which pass of an inner update is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickPhase {
    PreStateMachine,
    StateMachine,
    PostStateMachine,
}

impl TickPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TickPhase::PreStateMachine => "pre_state_machine",
            TickPhase::StateMachine => "state_machine",
            TickPhase::PostStateMachine => "post_state_machine",
        }
    }
}

/// Errors surfaced while changing or evaluating an entity's state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// The destination state is not defined in the table the entity runs.
    #[error("state {state} does not exist in {table}'s table (entity {entity})")]
    UnknownState {
        entity: EntityHandle,
        table: RootId,
        state: StateNo,
    },

    /// Immediate evaluations nested deeper than the driver allows.
    #[error("evaluation of entity {entity} nested {depth} levels deep")]
    EvaluationTooDeep { entity: EntityHandle, depth: u32 },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl CombatError for TransitionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownState { .. } => ErrorSeverity::Validation,
            Self::EvaluationTooDeep { .. } => ErrorSeverity::Internal,
            Self::Store(err) => err.severity(),
            Self::Oracle(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownState { .. } => "STATE_UNKNOWN",
            Self::EvaluationTooDeep { .. } => "STATE_EVALUATION_TOO_DEEP",
            Self::Store(err) => err.error_code(),
            Self::Oracle(err) => err.error_code(),
        }
    }
}
