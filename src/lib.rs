//! PromptStore - namespaced prompt-template aggregation and rendering
//!
//! PromptStore loads a tree of named text templates from YAML source units,
//! merges them into one addressable structure, and renders a chosen template
//! against caller-supplied variables and reusable partials.
//!
//! # Source layout
//!
//! ```text
//! prompts/
//! ├── index.yaml      # merges at the tree root
//! ├── partials.yaml   # reusable fragments, available as {{> name}}
//! ├── greetings.yaml  # namespace "greetings"
//! └── emails.yaml     # namespace "emails"
//! ```
//!
//! # Merge semantics
//!
//! Units merge in file-name order. Branch keys accumulate across units while
//! leaf collisions resolve in favor of the later unit. Templates are addressed
//! by dotted path: a `formal` key in `greetings.yaml` renders via
//! `"greetings.formal"`.
//!
//! # Example
//!
//! ```ignore
//! use promptstore::{PromptConfig, PromptManager};
//!
//! let config = PromptConfig::load(None)?;
//! let store = PromptManager::init(config)?;
//! let prompt = store.get_prompt("greetings.formal", &serde_json::json!({
//!     "name": "Ada",
//! }))?;
//! ```

pub mod config;
pub mod error;
pub mod manager;
pub mod source;
pub mod tree;

pub use config::PromptConfig;
pub use error::PromptError;
pub use manager::PromptManager;
pub use source::{SourceUnit, UnitKind};
pub use tree::{Node, Tree};
