//! Match configuration loader.

use std::path::Path;

use fight_core::{Clock, FightConfig};

use crate::loaders::{LoadResult, read_file};

/// Loader for match configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<FightConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<FightConfig> {
        let config: FightConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if !config.speed.is_finite() || config.speed < 0.0 {
            anyhow::bail!("speed must be a non-negative number, got {}", config.speed);
        }
        if config.speed > Clock::MAX_SPEED {
            anyhow::bail!("speed must be at most {}, got {}", Clock::MAX_SPEED, config.speed);
        }
        if config.start_life_percent == 0 || config.start_life_percent > 100 {
            anyhow::bail!(
                "start_life_percent must be between 1 and 100, got {}",
                config.start_life_percent
            );
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse("training_mode = true\nspeed = 0.5\n").unwrap();
        assert!(config.training_mode);
        assert_eq!(config.speed, 0.5);
        assert_eq!(
            config.over_hit_grace_ticks,
            FightConfig::DEFAULT_OVER_HIT_GRACE_TICKS
        );
    }

    #[test]
    fn rejects_negative_speed() {
        assert!(ConfigLoader::parse("speed = -1.0").is_err());
    }

    #[test]
    fn rejects_runaway_speed() {
        assert!(ConfigLoader::parse("speed = 1e9").is_err());
        assert!(ConfigLoader::parse("speed = 8.0").is_ok());
    }

    #[test]
    fn start_life_percent_is_bounded() {
        assert!(ConfigLoader::parse("start_life_percent = 0").is_err());
        assert!(ConfigLoader::parse("start_life_percent = 150").is_err());
        assert_eq!(
            ConfigLoader::parse("start_life_percent = 100")
                .unwrap()
                .start_life_percent,
            100
        );
    }
}
