//! Content loaders for reading fight data from files.
//!
//! Each loader reads one file format into core types (or the content-local
//! types in [`crate::stage`], [`crate::states`] and [`crate::inputs`]).

pub mod config;
pub mod factory;
pub mod fighter;
pub mod hits;
pub mod inputs;
pub mod stage;
pub mod states;

pub use config::ConfigLoader;
pub use factory::{ContentFactory, FighterContent};
pub use fighter::FighterLoader;
pub use hits::{HitCatalog, HitCatalogLoader};
pub use inputs::InputLoader;
pub use stage::StageLoader;
pub use states::StateTableLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
