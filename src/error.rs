//! Prompt store error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading source units or rendering prompts
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Failed to read source directory {path}")]
    SourceDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read config file {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to read source unit '{unit}'")]
    UnitRead {
        unit: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse source unit '{unit}'")]
    UnitParse {
        unit: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid value at '{key}' in source unit '{unit}': {reason}")]
    InvalidValue { unit: String, key: String, reason: String },

    #[error("Failed to register partial '{name}'")]
    Partial {
        name: String,
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    #[error("Path '{path}' addresses a namespace, not a template")]
    NotATemplate { path: String },

    #[error("Failed to render prompt '{path}'")]
    Render {
        path: String,
        #[source]
        source: Box<handlebars::RenderError>,
    },

    #[error("Failed to serialize render variables")]
    Variables(#[from] serde_json::Error),
}
