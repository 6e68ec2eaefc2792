//! Scripted input timelines used to drive headless matches.

use fight_core::RootId;

/// A command held from tick `from` up to, but not including, tick `until`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputSpan {
    pub command: String,
    pub from: u64,
    pub until: u64,
}

impl InputSpan {
    pub fn covers(&self, tick: u64) -> bool {
        self.from <= tick && tick < self.until
    }
}

/// Per-root list of held commands.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InputScript {
    pub p1: Vec<InputSpan>,
    pub p2: Vec<InputSpan>,
}

impl InputScript {
    pub fn spans(&self, root: RootId) -> &[InputSpan] {
        match root {
            RootId::P1 => &self.p1,
            RootId::P2 => &self.p2,
        }
    }

    /// Returns true if `root` holds `command` at `tick`.
    pub fn is_active(&self, root: RootId, command: &str, tick: u64) -> bool {
        self.spans(root)
            .iter()
            .any(|span| span.command == command && span.covers(tick))
    }

    /// Tick after which no span is active any more.
    pub fn last_tick(&self) -> u64 {
        self.p1
            .iter()
            .chain(&self.p2)
            .map(|span| span.until)
            .max()
            .unwrap_or(0)
    }
}
