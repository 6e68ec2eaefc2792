//! Hit definition catalog loader.

use std::collections::HashMap;
use std::path::Path;

use fight_core::HitDefinition;

use crate::loaders::{LoadResult, read_file};

/// Named attacks a fighter can arm.
pub type HitCatalog = HashMap<String, HitDefinition>;

/// Loader for hit catalogs from RON files.
///
/// RON format: a map from hit name to a (partial) `HitDefinition`.
///
/// ```ron
/// {
///     "jab": (hit_damage: 30, ground_velocity: (x: -3.0, y: 0.0)),
///     "sweep": (hit_damage: 70, ground_type: Trip, guard_flags: "LOW"),
/// }
/// ```
pub struct HitCatalogLoader;

impl HitCatalogLoader {
    pub fn load(path: &Path) -> LoadResult<HitCatalog> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<HitCatalog> {
        let catalog: HitCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse hit catalog RON: {}", e))?;

        for (name, hit) in &catalog {
            if hit.hit_damage < 0 || hit.guard_damage < 0 {
                anyhow::bail!("hit '{}' has negative damage", name);
            }
            if hit.juggle_cost < 0 {
                anyhow::bail!("hit '{}' has a negative juggle cost", name);
            }
        }
        Ok(catalog)
    }
}
