//! Input timeline loader.

use std::path::Path;

use crate::inputs::InputScript;
use crate::loaders::{LoadResult, read_file};

/// Loader for scripted inputs from RON files.
pub struct InputLoader;

impl InputLoader {
    pub fn load(path: &Path) -> LoadResult<InputScript> {
        let content = read_file(path)?;
        let script: InputScript = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse input script RON: {}", e))?;

        for span in script.p1.iter().chain(&script.p2) {
            if span.until <= span.from {
                anyhow::bail!(
                    "input '{}' ends before it starts ({}..{})",
                    span.command,
                    span.from,
                    span.until
                );
            }
        }
        Ok(script)
    }
}
