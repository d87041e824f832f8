//! Template tree model
//!
//! The aggregate prompt structure is a nested string-keyed mapping where every
//! value is either a template string (leaf) or a nested namespace (branch).
//! The tagged [`Node`] variant makes the merge asymmetry explicit: branches
//! union their keys across sources, leaves are overwritten by later sources.

use std::collections::BTreeMap;

use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;

use crate::error::PromptError;

/// A nested mapping of namespaces and template strings
pub type Tree = BTreeMap<String, Node>;

/// One node of a template tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A template string
    Leaf(String),
    /// A nested namespace
    Branch(Tree),
}

impl Node {
    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            Node::Leaf(s) => Some(s),
            Node::Branch(_) => None,
        }
    }

    pub fn as_branch(&self) -> Option<&Tree> {
        match self {
            Node::Leaf(_) => None,
            Node::Branch(tree) => Some(tree),
        }
    }

    /// Convert a YAML value into a node
    ///
    /// Mappings become branches. Strings become leaves; numbers and booleans
    /// are coerced to their scalar form. Sequences, nulls, and tagged values
    /// are rejected with an error naming the unit and key, since the template
    /// model has no meaning for them.
    fn from_yaml(unit: &str, key: &str, value: YamlValue) -> Result<Self, PromptError> {
        match value {
            YamlValue::String(s) => Ok(Node::Leaf(s)),
            YamlValue::Number(n) => Ok(Node::Leaf(n.to_string())),
            YamlValue::Bool(b) => Ok(Node::Leaf(b.to_string())),
            YamlValue::Mapping(mapping) => {
                let mut tree = Tree::new();
                for (k, v) in mapping {
                    let Some(name) = k.as_str().map(str::to_string) else {
                        return Err(PromptError::InvalidValue {
                            unit: unit.to_string(),
                            key: key.to_string(),
                            reason: "mapping keys must be strings".to_string(),
                        });
                    };
                    let child_key = if key.is_empty() {
                        name.clone()
                    } else {
                        format!("{}.{}", key, name)
                    };
                    let node = Node::from_yaml(unit, &child_key, v)?;
                    tree.insert(name, node);
                }
                Ok(Node::Branch(tree))
            }
            YamlValue::Sequence(_) => Err(PromptError::InvalidValue {
                unit: unit.to_string(),
                key: key.to_string(),
                reason: "sequences are not valid template values".to_string(),
            }),
            YamlValue::Null => Err(PromptError::InvalidValue {
                unit: unit.to_string(),
                key: key.to_string(),
                reason: "null is not a valid template value".to_string(),
            }),
            YamlValue::Tagged(_) => Err(PromptError::InvalidValue {
                unit: unit.to_string(),
                key: key.to_string(),
                reason: "tagged values are not valid template values".to_string(),
            }),
        }
    }

    /// Convert to JSON for use in a render context
    pub fn to_json(&self) -> JsonValue {
        match self {
            Node::Leaf(s) => JsonValue::String(s.clone()),
            Node::Branch(tree) => tree_to_json(tree),
        }
    }
}

/// Parse the top level of a YAML document into a tree
///
/// The document root must be a mapping; anything else cannot define named
/// templates.
pub fn tree_from_yaml(unit: &str, value: YamlValue) -> Result<Tree, PromptError> {
    match Node::from_yaml(unit, "", value)? {
        Node::Branch(tree) => Ok(tree),
        Node::Leaf(_) => Err(PromptError::InvalidValue {
            unit: unit.to_string(),
            key: String::new(),
            reason: "source unit must be a mapping at the top level".to_string(),
        }),
    }
}

/// Deep-merge `source` into `target`
///
/// For each key in `source`: a branch ensures `target` holds a branch under
/// that key (replacing a leaf or absent entry with an empty one) and recurses
/// into it; a leaf overwrites whatever `target` holds. Later sources win on
/// leaf collisions, while branch keys accumulate across sources.
pub fn merge(target: &mut Tree, source: Tree) {
    for (key, node) in source {
        match node {
            Node::Branch(sub) => {
                let entry = target.entry(key).or_insert_with(|| Node::Branch(Tree::new()));
                if let Node::Leaf(_) = entry {
                    *entry = Node::Branch(Tree::new());
                }
                if let Node::Branch(existing) = entry {
                    merge(existing, sub);
                }
            }
            leaf @ Node::Leaf(_) => {
                target.insert(key, leaf);
            }
        }
    }
}

/// Walk a dotted path through the tree
///
/// Returns `None` when any segment is missing or the walk hits a leaf before
/// the path is exhausted. A path ending on a branch returns the branch.
pub fn resolve<'a>(tree: &'a Tree, path: &str) -> Option<&'a Node> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = tree.get(first)?;

    for segment in segments {
        current = current.as_branch()?.get(segment)?;
    }

    Some(current)
}

/// Collect every leaf as a `(dotted name, body)` pair
pub fn flatten(tree: &Tree) -> Vec<(String, &str)> {
    fn walk<'a>(tree: &'a Tree, prefix: &str, out: &mut Vec<(String, &'a str)>) {
        for (key, node) in tree {
            let name = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };
            match node {
                Node::Leaf(body) => out.push((name, body)),
                Node::Branch(sub) => walk(sub, &name, out),
            }
        }
    }

    let mut out = Vec::new();
    walk(tree, "", &mut out);
    out
}

/// Convert a whole tree to a JSON object
pub fn tree_to_json(tree: &Tree) -> JsonValue {
    JsonValue::Object(tree.iter().map(|(k, v)| (k.clone(), v.to_json())).collect())
}
