//! Response documents and where they come from.
//!
//! A [`Fetcher`] returns one already-deserialized JSON document per
//! [`LogicalQuery`]. Network access, sessions and retries all live on the
//! far side of that trait; this crate ships only file-backed and in-memory
//! fetchers.

use crate::entity::EntityIndex;
use crate::error::FetchError;
use crate::urn::is_urn;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Key of the top-level entity pool.
pub const INCLUDED_KEY: &str = "included";

/// One response document.
#[derive(Debug, Clone, Copy)]
pub struct ResponseDocument<'d> {
    root: &'d Value,
}

impl<'d> ResponseDocument<'d> {
    pub fn new(root: &'d Value) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &'d Value {
        self.root
    }

    /// The entity pool: the top-level `included` array, or the document
    /// itself when it is a bare array. Empty otherwise.
    pub fn pool(&self) -> &'d [Value] {
        match self.root {
            Value::Array(items) => items,
            root => root
                .get(INCLUDED_KEY)
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
        }
    }

    pub fn index(&self) -> EntityIndex<'d> {
        EntityIndex::build(self.pool())
    }

    pub fn data(&self) -> Option<&'d Value> {
        self.root.get("data")
    }

    /// Identifiers listed under `data[key]`. Non-identifier entries are
    /// skipped.
    pub fn element_urns(&self, key: &str) -> Vec<String> {
        self.data()
            .and_then(|data| data.get(key))
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .filter(|urn| is_urn(urn))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// What a caller asks a [`Fetcher`] for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogicalQuery {
    /// Profile lookup by vanity name.
    Profile { vanity: String },
    /// Experience section view of a profile.
    Experiences { profile_id: String },
    /// Position list of a profile.
    Positions { profile_id: String },
}

impl LogicalQuery {
    /// Stable key naming the query, e.g. `experiences-ACoAAB`.
    pub fn key(&self) -> String {
        match self {
            Self::Profile { vanity } => format!("profile-{vanity}"),
            Self::Experiences { profile_id } => format!("experiences-{profile_id}"),
            Self::Positions { profile_id } => format!("positions-{profile_id}"),
        }
    }
}

impl fmt::Display for LogicalQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Source of response documents.
pub trait Fetcher {
    fn fetch(&self, query: &LogicalQuery) -> Result<Value, FetchError>;
}

/// Reads `<root>/<query key>.json`.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// File holding `query`'s payload. Keys that could leave `root` are
    /// rejected.
    pub fn path_for(&self, query: &LogicalQuery) -> Result<PathBuf, FetchError> {
        let key = query.key();
        if key.contains(['/', '\\']) || key.contains("..") {
            return Err(FetchError::InvalidQuery(key));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl Fetcher for FileFetcher {
    fn fetch(&self, query: &LogicalQuery) -> Result<Value, FetchError> {
        let path = self.path_for(query)?;
        if !path.exists() {
            return Err(FetchError::NotFound(query.key()));
        }
        debug!(path = %path.display(), "reading payload");
        read_json_file(&path)
    }
}

/// In-memory documents keyed by query.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    documents: IndexMap<LogicalQuery, Value>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, query: LogicalQuery, document: Value) -> Self {
        self.documents.insert(query, document);
        self
    }
}

impl Fetcher for StaticFetcher {
    fn fetch(&self, query: &LogicalQuery) -> Result<Value, FetchError> {
        self.documents
            .get(query)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(query.key()))
    }
}

/// Parses a JSON file.
pub fn read_json_file(path: &Path) -> Result<Value, FetchError> {
    let contents = fs::read_to_string(path).map_err(|source| FetchError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&contents)?)
}

/// A fetched document with tracking metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadEnvelope {
    /// Unique payload ID for tracking
    pub payload_id: Uuid,

    pub query: LogicalQuery,

    pub document: Value,

    /// Timestamp when the document was fetched
    pub received_at: DateTime<Utc>,
}

impl PayloadEnvelope {
    pub fn new(query: LogicalQuery, document: Value) -> Self {
        Self {
            payload_id: Uuid::new_v4(),
            query,
            document,
            received_at: Utc::now(),
        }
    }

    /// Fetches `query` and wraps the result.
    pub fn fetch<F: Fetcher + ?Sized>(fetcher: &F, query: LogicalQuery) -> Result<Self, FetchError> {
        let document = fetcher.fetch(&query)?;
        Ok(Self::new(query, document))
    }

    pub fn response(&self) -> ResponseDocument<'_> {
        ResponseDocument::new(&self.document)
    }
}
