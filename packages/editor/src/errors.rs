//! Error types for the editor

use clause_model::ModelError;
use clause_template::TemplateError;
use std::time::Duration;
use thiserror::Error;

/// Why a clause reparse failed.
///
/// Every kind is caught at the coordinator boundary and reported through
/// [`ReparseResult::error`](crate::ReparseResult); none is raised to the
/// editing session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReparseError {
    /// The fragment is plain prose. Handled as "no changes needed".
    #[error("Fragment has no template reference")]
    NoTemplateReference,

    #[error("Template not found: {name}")]
    TemplateNotFound { name: String },

    #[error(transparent)]
    Conversion(#[from] ModelError),

    #[error("{0}")]
    Parse(TemplateError),

    #[error("Regeneration error: {0}")]
    Regeneration(TemplateError),

    #[error("Regeneration timed out after {after:?}")]
    TimedOut { after: Duration },

    #[error("Reparse cancelled")]
    Cancelled,
}

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Clause not found: {0}")]
    FragmentNotFound(String),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Content error: {0}")]
    Model(#[from] ModelError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Document is not file-backed")]
    NotFileBacked,

    #[error("Document is read-only")]
    ReadOnly,

    #[error("Debounced reparsing needs a tokio runtime")]
    NoRuntime,
}
