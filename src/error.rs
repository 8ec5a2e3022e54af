//! Error types for the documentation generator
//!
//! Everything here is fatal: a load or setup failure aborts the run before
//! any document is written. Render-phase anomalies (unresolved references,
//! unmodeled type shapes) are not errors — see [`crate::diagnostics`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type for documentation generation
pub type Result<T> = std::result::Result<T, DocgenError>;

/// Fatal documentation-generation errors
#[derive(Error, Debug)]
pub enum DocgenError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed schema {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate schema identifier {id} (second occurrence at {path})")]
    DuplicateId { id: String, path: PathBuf },

    #[error("schema {path} failed meta-schema validation: {errors}")]
    Validation { path: PathBuf, errors: String },

    #[error("invalid meta schema {path}: {message}")]
    MetaSchema { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("render error: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),
}
