use crate::state::RootId;

/// Name of the command that makes a fighter guard.
pub const GUARD_COMMAND: &str = "holdback";

/// Read access to matched input commands.
pub trait CommandOracle {
    fn is_command_active(&self, root: RootId, command: &str) -> bool;
}
