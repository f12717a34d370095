//! Error types for the orenda-research crate.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for corpus loading and engine construction.
///
/// Only construction can fail. Once a [`crate::Corpus`] is loaded every
/// engine query is infallible.
#[derive(Debug, Error)]
pub enum ResearchError {
    #[error(
        "Ground truth file not found: {}. Run `process_ground_truth` first to generate it.",
        .path.display()
    )]
    MissingSource { path: PathBuf },

    #[error("Malformed ground truth source: {0}")]
    MalformedSource(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl ResearchError {
    pub fn missing_source(path: impl Into<PathBuf>) -> Self {
        Self::MissingSource { path: path.into() }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedSource(msg.into())
    }

    /// True when the error can only be fixed by regenerating the corpus file.
    pub fn is_missing_source(&self) -> bool {
        matches!(self, Self::MissingSource { .. })
    }
}

impl From<serde_json::Error> for ResearchError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedSource(format!("invalid JSON: {err}"))
    }
}

/// Convenience result alias.
pub type Result<T> = std::result::Result<T, ResearchError>;
