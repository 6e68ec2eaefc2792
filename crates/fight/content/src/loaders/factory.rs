//! Content factory for loading a match worth of data files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use fight_core::{FightConfig, FighterDefinition};
use tracing::debug;

use crate::inputs::InputScript;
use crate::loaders::{
    ConfigLoader, FighterLoader, HitCatalog, HitCatalogLoader, InputLoader, LoadResult,
    StageLoader, StateTableLoader,
};
use crate::stage::StageDefinition;
use crate::states::StateTable;

/// Everything loaded for one fighter.
#[derive(Clone, Debug)]
pub struct FighterContent {
    pub definition: Arc<FighterDefinition>,
    pub hits: HitCatalog,
    pub states: StateTable,
}

/// Content factory that loads all fight content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── stage.toml
/// ├── inputs.ron
/// └── fighters/
///     └── kael/
///         ├── fighter.ron
///         ├── hits.ron
///         └── states.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load match configuration from `config.toml`, or defaults if it is absent.
    pub fn load_config(&self) -> LoadResult<FightConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(FightConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load stage geometry from `stage.toml`.
    pub fn load_stage(&self) -> LoadResult<StageDefinition> {
        StageLoader::load(&self.data_dir.join("stage.toml"))
    }

    /// Load the input timeline from `inputs.ron`, or an empty one if it is absent.
    pub fn load_inputs(&self) -> LoadResult<InputScript> {
        let path = self.data_dir.join("inputs.ron");
        if !path.exists() {
            return Ok(InputScript::default());
        }
        InputLoader::load(&path)
    }

    /// Load a fighter from `fighters/{name}/`.
    pub fn load_fighter(&self, name: &str) -> LoadResult<FighterContent> {
        let dir = self.fighter_dir(name);
        let definition = FighterLoader::load(&dir.join("fighter.ron"))?;
        let hits = HitCatalogLoader::load(&dir.join("hits.ron"))?;
        let states = StateTableLoader::load(&dir.join("states.ron"), &hits)?;
        debug!(
            fighter = %definition.name,
            hits = hits.len(),
            states = states.states.len(),
            "fighter loaded"
        );
        Ok(FighterContent {
            definition: Arc::new(definition),
            hits,
            states,
        })
    }

    /// Names of every fighter directory, sorted.
    pub fn fighter_names(&self) -> LoadResult<Vec<String>> {
        let dir = self.data_dir.join("fighters");
        let entries = std::fs::read_dir(&dir)
            .map_err(|e| anyhow::anyhow!("Failed to list {}: {}", dir.display(), e))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    fn fighter_dir(&self, name: &str) -> PathBuf {
        self.data_dir.join("fighters").join(name)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use fight_core::StateNo;

    use super::*;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn data_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join("config.toml"), "over_hit_grace_ticks = 30\n");
        write(
            &root.join("stage.toml"),
            "name = \"dojo\"\n[bounds]\nleft = -150.0\nright = 150.0\nfloor = 0.0\n",
        );
        write(
            &root.join("inputs.ron"),
            r#"(p1: [(command: "jab", from: 5, until: 7)])"#,
        );
        let fighter = root.join("fighters").join("kael");
        write(&fighter.join("fighter.ron"), r#"(name: "Kael")"#);
        write(&fighter.join("hits.ron"), r#"{ "jab": (hit_damage: 30) }"#);
        write(
            &fighter.join("states.ron"),
            r#"(states: {
                0: (transitions: [(to: 200, command: Some("jab"))]),
                200: (
                    attack: Some((hit: "jab", start: 2, end: 3, reach: 20.0)),
                    transitions: [(to: 0, after: Some(10))],
                ),
            })"#,
        );
        dir
    }

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn loads_a_full_directory() {
        let dir = data_dir();
        let factory = ContentFactory::new(dir.path());

        assert_eq!(factory.load_config().unwrap().over_hit_grace_ticks, 30);
        assert_eq!(factory.load_stage().unwrap().name, "dojo");
        assert_eq!(factory.load_inputs().unwrap().last_tick(), 7);
        assert_eq!(factory.fighter_names().unwrap(), vec!["kael".to_string()]);

        let kael = factory.load_fighter("kael").unwrap();
        assert_eq!(kael.definition.name, "Kael");
        assert_eq!(kael.hits["jab"].hit_damage, 30);
        assert!(kael.states.contains(StateNo(200)));
    }

    #[test]
    fn optional_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_config().unwrap(), FightConfig::default());
        assert_eq!(factory.load_inputs().unwrap(), InputScript::default());
        assert!(factory.load_stage().is_err());
        assert!(factory.load_fighter("nobody").is_err());
    }
}
