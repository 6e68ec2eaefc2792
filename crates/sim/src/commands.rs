//! Command oracle replaying a scripted input timeline.

use std::cell::Cell;

use fight_content::InputScript;
use fight_core::{CommandOracle, RootId};

/// Answers command queries from an [`InputScript`] at the current frame.
///
/// The runner moves the frame forward before each outer tick, so every inner
/// update of a dilated tick sees the same inputs.
#[derive(Debug, Default)]
pub struct ScriptedCommands {
    script: InputScript,
    frame: Cell<u64>,
}

impl ScriptedCommands {
    pub fn new(script: InputScript) -> Self {
        Self {
            script,
            frame: Cell::new(0),
        }
    }

    pub fn set_frame(&self, frame: u64) {
        self.frame.set(frame);
    }

    pub fn frame(&self) -> u64 {
        self.frame.get()
    }

    pub fn script(&self) -> &InputScript {
        &self.script
    }
}

impl CommandOracle for ScriptedCommands {
    fn is_command_active(&self, root: RootId, command: &str) -> bool {
        self.script.is_active(root, command, self.frame.get())
    }
}
