//! State table loader.

use std::path::Path;

use crate::loaders::{HitCatalog, LoadResult, read_file};
use crate::states::StateTable;

/// Loader for state tables from RON files.
///
/// RON format:
///
/// ```ron
/// (states: {
///     0: (stance: Some(Standing), control: Some(true), transitions: [
///         (to: 200, command: Some("jab")),
///     ]),
///     200: (
///         move_type: Some(Attack),
///         control: Some(false),
///         attack: Some((hit: "jab", start: 3, end: 5, reach: 30.0)),
///         transitions: [(to: 0, after: Some(14))],
///     ),
/// })
/// ```
pub struct StateTableLoader;

impl StateTableLoader {
    /// Load a state table and check it against the fighter's hit catalog.
    pub fn load(path: &Path, hits: &HitCatalog) -> LoadResult<StateTable> {
        let content = read_file(path)?;
        Self::parse(&content, hits).map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    pub fn parse(content: &str, hits: &HitCatalog) -> LoadResult<StateTable> {
        let table: StateTable = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse state table RON: {}", e))?;

        if let Some((from, to)) = table.dangling_transitions().first() {
            anyhow::bail!("state {} transitions to unknown state {}", from, to);
        }
        if let Some(missing) = table.referenced_hits().find(|name| !hits.contains_key(*name)) {
            anyhow::bail!("attack window references unknown hit '{}'", missing);
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use fight_core::{HitDefinition, MoveType, StateNo, StateType};

    use super::*;

    const TABLE: &str = r#"(states: {
        0: (stance: Some(Standing), control: Some(true), transitions: [
            (to: 200, command: Some("jab")),
        ]),
        200: (
            move_type: Some(Attack),
            control: Some(false),
            attack: Some((hit: "jab", start: 3, end: 5, reach: 30.0)),
            transitions: [(to: 0, after: Some(14))],
        ),
    })"#;

    fn catalog() -> HitCatalog {
        HitCatalog::from([("jab".to_string(), HitDefinition::default())])
    }

    #[test]
    fn parses_table() {
        let table = StateTableLoader::parse(TABLE, &catalog()).unwrap();
        let idle = table.get(StateNo::STAND).unwrap();
        assert_eq!(idle.stance, Some(StateType::Standing));
        assert_eq!(idle.transitions[0].command.as_deref(), Some("jab"));

        let jab = table.get(StateNo(200)).unwrap();
        assert_eq!(jab.move_type, Some(MoveType::Attack));
        assert_eq!(jab.attack.as_ref().map(|a| a.reach), Some(30.0));
    }

    #[test]
    fn rejects_unknown_hit() {
        assert!(StateTableLoader::parse(TABLE, &HitCatalog::new()).is_err());
    }

    #[test]
    fn rejects_dangling_transition() {
        let table = "(states: { 0: (transitions: [(to: 5)]) })";
        assert!(StateTableLoader::parse(table, &catalog()).is_err());
    }
}
