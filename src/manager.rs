//! Prompt manager
//!
//! Owns the aggregate template tree and the partials tree. Both are built
//! once inside [`PromptManager::init`] and never mutated afterward, so a
//! manager can be shared freely across threads once constructed.

use handlebars::Handlebars;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

use crate::config::PromptConfig;
use crate::error::PromptError;
use crate::source::{self, UnitKind};
use crate::tree::{self, Node, Tree};

/// Aggregated prompt templates with a Handlebars rendering front end
pub struct PromptManager {
    config: PromptConfig,
    prompts: Tree,
    partials: Tree,
    engine: Handlebars<'static>,
}

impl PromptManager {
    /// Build a manager from the units in the configured source directory
    ///
    /// Units merge in file-name order: the `index` unit at the tree root,
    /// every other unit under a namespace key equal to its file stem. The
    /// `partials` unit feeds the partials tree instead, and each of its
    /// leaves is registered with the engine under its dotted name so
    /// templates can include it as `{{> name}}`.
    pub fn init(config: PromptConfig) -> Result<Self, PromptError> {
        let units = source::load_units(&config.source_dir)?;

        let mut prompts = Tree::new();
        let mut partials = Tree::new();
        for unit in units {
            match unit.kind {
                UnitKind::Index => tree::merge(&mut prompts, unit.tree),
                UnitKind::Partials => tree::merge(&mut partials, unit.tree),
                UnitKind::Namespace => {
                    let mut namespaced = Tree::new();
                    namespaced.insert(unit.name, Node::Branch(unit.tree));
                    tree::merge(&mut prompts, namespaced);
                }
            }
        }

        let mut engine = Handlebars::new();
        engine.set_strict_mode(false);
        // Prompts are plain text, not HTML
        engine.register_escape_fn(handlebars::no_escape);

        let flat_partials = tree::flatten(&partials);
        let partial_count = flat_partials.len();
        for (name, body) in flat_partials {
            engine
                .register_partial(&name, body)
                .map_err(|source| PromptError::Partial {
                    name,
                    source: Box::new(source),
                })?;
        }

        info!(
            "Prompt store initialized: {} top-level keys, {} partials",
            prompts.len(),
            partial_count
        );

        Ok(Self {
            config,
            prompts,
            partials,
            engine,
        })
    }

    /// Render the template at `path` with the given variables
    ///
    /// A path that resolves to nothing renders as the empty string; callers
    /// composing prompts from optional fragments do not need to guard each
    /// lookup. The render context exposes the variables under `inputs` and
    /// the partials tree under `partials`, and registered partials are also
    /// reachable through `{{> name}}`. Output is trimmed of surrounding
    /// whitespace.
    pub fn get_prompt<T: Serialize>(&self, path: &str, variables: &T) -> Result<String, PromptError> {
        let body = match tree::resolve(&self.prompts, path) {
            None => {
                debug!("No prompt at '{}', rendering empty", path);
                ""
            }
            Some(Node::Leaf(body)) => body.as_str(),
            Some(Node::Branch(_)) => {
                return Err(PromptError::NotATemplate {
                    path: path.to_string(),
                })
            }
        };

        let context = json!({
            "partials": tree::tree_to_json(&self.partials),
            "inputs": serde_json::to_value(variables)?,
        });

        let rendered = self
            .engine
            .render_template(body, &context)
            .map_err(|source| PromptError::Render {
                path: path.to_string(),
                source: Box::new(source),
            })?;

        Ok(rendered.trim().to_string())
    }

    /// The aggregate template tree
    pub fn prompts(&self) -> &Tree {
        &self.prompts
    }

    /// The partials tree (empty when no partials unit was found)
    pub fn partials(&self) -> &Tree {
        &self.partials
    }

    pub fn config(&self) -> &PromptConfig {
        &self.config
    }
}
