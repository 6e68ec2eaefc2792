//! Common error infrastructure for fight-core.
//!
//! Domain-specific errors (`TransitionError`, `BindError`, `FilterError`,
//! `StoreError`, `OracleError`) live next to the subsystem that produces them.
//! None of them ever reach a caller: every public entry point recovers locally,
//! reports the error through [`report`] and degrades to a no-op.
//!
//! # Design Principles
//!
//! - **Typed failures**: each subsystem has its own enum with specific variants
//! - **Severity classification**: severity picks the log level
//! - **Stable codes**: `error_code()` gives log filters something to grep for

use tracing::{debug, error, warn};

/// Severity level of an error, used for categorization and log levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Expected during normal play (stale handle after a helper despawned).
    Recoverable,

    /// A collaborator asked for something that does not exist.
    ///
    /// Examples: unknown state number, binding to self
    Validation,

    /// Content or wiring mistake that should be fixed at the source.
    ///
    /// Examples: malformed hit-attribute flag, runaway evaluation recursion
    Internal,

    /// A required collaborator is missing; the affected subsystem is inert.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a content or wiring bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all fight-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity by who has to fix it, not by impact on the match
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a stable, machine-readable error code.
    ///
    /// Codes are SCREAMING_SNAKE_CASE and prefixed with the subsystem
    /// (`STATE_`, `BIND_`, `FILTER_`, `STORE_`, `ORACLE_`).
    fn error_code(&self) -> &'static str;
}

/// Logs a recovered error at the level implied by its severity.
pub fn report<E: CombatError>(err: &E) {
    let code = err.error_code();
    let severity = err.severity();
    match severity {
        ErrorSeverity::Recoverable => debug!(code, severity = severity.as_str(), "{err}"),
        ErrorSeverity::Validation => warn!(code, severity = severity.as_str(), "{err}"),
        ErrorSeverity::Internal | ErrorSeverity::Fatal => {
            error!(code, severity = severity.as_str(), "{err}")
        }
    }
}
