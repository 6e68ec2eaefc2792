//! Fighter constants loader.

use std::path::Path;

use fight_core::FighterDefinition;

use crate::loaders::{LoadResult, read_file};

/// Loader for fighter constants from RON files.
pub struct FighterLoader;

impl FighterLoader {
    /// Load a fighter definition. Omitted fields take the stock defaults.
    pub fn load(path: &Path) -> LoadResult<FighterDefinition> {
        let content = read_file(path)?;
        let definition = Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))?;
        Ok(definition)
    }

    pub fn parse(content: &str) -> LoadResult<FighterDefinition> {
        let definition: FighterDefinition = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse fighter RON: {}", e))?;

        if definition.life_max <= 0 {
            anyhow::bail!("fighter '{}' has no life", definition.name);
        }
        if definition.coordinate_p <= 0.0 {
            anyhow::bail!(
                "fighter '{}' has an invalid coordinate resolution {}",
                definition.name,
                definition.coordinate_p
            );
        }
        Ok(definition)
    }
}
