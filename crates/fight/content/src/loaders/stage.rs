//! Stage geometry loader.

use std::path::Path;

use crate::loaders::{LoadResult, read_file};
use crate::stage::StageDefinition;

/// Loader for stage geometry from TOML files.
pub struct StageLoader;

impl StageLoader {
    pub fn load(path: &Path) -> LoadResult<StageDefinition> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<StageDefinition> {
        let stage: StageDefinition = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse stage TOML: {}", e))?;

        if stage.bounds.left >= stage.bounds.right {
            anyhow::bail!(
                "stage '{}' has an empty play area ({} .. {})",
                stage.name,
                stage.bounds.left,
                stage.bounds.right
            );
        }
        if stage.coordinate_p <= 0.0 {
            anyhow::bail!("stage '{}' has an invalid coordinate resolution", stage.name);
        }
        Ok(stage)
    }
}
