//! Source unit discovery
//!
//! A source unit is one YAML document in the configured source directory.
//! The file stem decides where its mapping lands in the aggregate tree:
//! `index` merges at the root, `partials` feeds the partials tree, and any
//! other stem becomes a namespace key of its own.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::PromptError;
use crate::tree::{self, Node, Tree};

/// File stem reserved for the top-level merge target
pub const INDEX_UNIT: &str = "index";
/// File stem reserved for the partials tree
pub const PARTIALS_UNIT: &str = "partials";

/// Top-level key holding a unit's base mapping, overridden by its named keys
const DEFAULT_KEY: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    /// Merges into the root of the aggregate tree
    Index,
    /// Becomes the partials tree
    Partials,
    /// Merges under a key equal to the file stem
    Namespace,
}

/// One loaded source unit
#[derive(Debug)]
pub struct SourceUnit {
    /// File stem, used as the namespace key for [`UnitKind::Namespace`]
    pub name: String,
    pub kind: UnitKind,
    pub tree: Tree,
}

fn unit_kind(name: &str) -> UnitKind {
    match name {
        INDEX_UNIT => UnitKind::Index,
        PARTIALS_UNIT => UnitKind::Partials,
        _ => UnitKind::Namespace,
    }
}

/// Apply the unit extraction rule
///
/// A top-level `default` key, when present, must be a mapping; it supplies the
/// unit's base tree and the remaining named keys override it. The same rule
/// applies to every unit, partials included.
fn extract(unit: &str, mut parsed: Tree) -> Result<Tree, PromptError> {
    match parsed.remove(DEFAULT_KEY) {
        None => Ok(parsed),
        Some(Node::Branch(base)) => {
            let mut result = base;
            tree::merge(&mut result, parsed);
            Ok(result)
        }
        Some(Node::Leaf(_)) => Err(PromptError::InvalidValue {
            unit: unit.to_string(),
            key: DEFAULT_KEY.to_string(),
            reason: "reserved key 'default' must be a mapping".to_string(),
        }),
    }
}

fn load_unit(name: &str, path: &Path) -> Result<Tree, PromptError> {
    let content = fs::read_to_string(path).map_err(|source| PromptError::UnitRead {
        unit: name.to_string(),
        source,
    })?;
    let value: serde_yaml::Value =
        serde_yaml::from_str(&content).map_err(|source| PromptError::UnitParse {
            unit: name.to_string(),
            source,
        })?;
    let parsed = tree::tree_from_yaml(name, value)?;
    extract(name, parsed)
}

/// Enumerate and load every source unit in `dir`
///
/// Direct entries only; subdirectories are skipped, as are files without a
/// `.yaml`/`.yml` extension. Units load in file-name order so that merge
/// precedence is deterministic. A unit that fails to load is fatal, except
/// the `partials` unit, whose absence or failure leaves the partials tree
/// empty.
pub fn load_units(dir: &Path) -> Result<Vec<SourceUnit>, PromptError> {
    let entries = fs::read_dir(dir).map_err(|source| PromptError::SourceDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| PromptError::SourceDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if path.is_dir() {
            debug!("Skipping directory: {}", path.display());
            continue;
        }
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == "yaml" || e == "yml");
        if !is_yaml {
            debug!("Skipping non-unit file: {}", path.display());
            continue;
        }
        paths.push(path);
    }
    paths.sort();

    let mut units = Vec::new();
    for path in paths {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        let kind = unit_kind(&name);

        match load_unit(&name, &path) {
            Ok(unit_tree) => {
                debug!("Loaded source unit '{}' from {}", name, path.display());
                units.push(SourceUnit {
                    name,
                    kind,
                    tree: unit_tree,
                });
            }
            Err(e) if kind == UnitKind::Partials => {
                warn!("Ignoring unusable partials unit: {e}");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(units)
}
