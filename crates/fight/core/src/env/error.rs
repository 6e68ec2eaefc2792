//! Oracle access errors.

use crate::error::{CombatError, ErrorSeverity};

/// Errors that occur when a collaborator is not wired into the environment.
///
/// Only the script oracle is required for a match to make progress; the
/// engine treats the others as optional and skips their side effects.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("ScriptOracle not available")]
    ScriptNotAvailable,

    #[error("StageOracle not available")]
    StageNotAvailable,

    #[error("CommandOracle not available")]
    CommandsNotAvailable,

    #[error("EffectsOracle not available")]
    EffectsNotAvailable,

    #[error("ProjectileOracle not available")]
    ProjectilesNotAvailable,

    #[error("HitOverrideOracle not available")]
    HitOverridesNotAvailable,

    #[error("AnimationOracle not available")]
    AnimationNotAvailable,
}

impl CombatError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            // Without a script nothing can evaluate
            ScriptNotAvailable => ErrorSeverity::Fatal,

            StageNotAvailable | CommandsNotAvailable | EffectsNotAvailable
            | ProjectilesNotAvailable | HitOverridesNotAvailable | AnimationNotAvailable => {
                ErrorSeverity::Recoverable
            }
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            ScriptNotAvailable => "ORACLE_SCRIPT_NOT_AVAILABLE",
            StageNotAvailable => "ORACLE_STAGE_NOT_AVAILABLE",
            CommandsNotAvailable => "ORACLE_COMMANDS_NOT_AVAILABLE",
            EffectsNotAvailable => "ORACLE_EFFECTS_NOT_AVAILABLE",
            ProjectilesNotAvailable => "ORACLE_PROJECTILES_NOT_AVAILABLE",
            HitOverridesNotAvailable => "ORACLE_HIT_OVERRIDES_NOT_AVAILABLE",
            AnimationNotAvailable => "ORACLE_ANIMATION_NOT_AVAILABLE",
        }
    }
}
