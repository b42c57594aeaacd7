//! Typed errors for caller-facing contract violations and I/O.
//!
//! Payload-shape irregularities are never errors in this crate; they are
//! absorbed and reported as [`Diagnostic`](crate::diagnostics::Diagnostic)
//! values. The types here cover programming errors (bad field paths, bad
//! configuration) and failures of the collaborators around the core.

use std::path::PathBuf;
use thiserror::Error;

/// Invalid field path syntax.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("field path is empty")]
    Empty,

    #[error("empty segment at byte {position} in field path '{path}'")]
    EmptySegment { path: String, position: usize },

    #[error("unclosed '[' at byte {position} in field path '{path}'")]
    UnclosedBracket { path: String, position: usize },

    #[error("invalid index '{index}' in field path '{path}'")]
    InvalidIndex { path: String, index: String },

    #[error("unexpected character '{found}' at byte {position} in field path '{path}'")]
    UnexpectedChar {
        path: String,
        position: usize,
        found: char,
    },
}

/// Errors raised while loading an [`ExtractionConfig`](crate::config::ExtractionConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors raised by a [`Fetcher`](crate::document::Fetcher).
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no payload available for query '{0}'")]
    NotFound(String),

    #[error("query key '{0}' is not a plain file name")]
    InvalidQuery(String),

    #[error("failed to read payload {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while writing records.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
