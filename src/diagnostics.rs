//! Diagnostics reported alongside best-effort extraction results.
//!
//! Missing structure never aborts an extraction. Each irregularity is logged
//! where it is found and recorded here, so callers get whatever records could
//! be built plus an account of what was skipped.

use crate::anchor::Paging;
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The document carries no entity pool, or the pool is empty.
    NoEntityPool,
    /// No entity identifier matched the anchor predicate.
    NoAnchor { section: String },
    /// The anchor was found but lists no elements.
    EmptyAnchor { urn: String },
    /// The list payload is one page of a larger result.
    Paginated { urn: String, paging: Paging },
    /// A list element is not an object.
    MalformedElement { index: usize },
    /// A list element has no entity component.
    MissingEntityComponent { index: usize },
    /// A grouped header points at a nested list the pool does not hold.
    NestedListMissing { index: usize, urn: String },
    /// An element with a title but no date caption, skipped as a parent fragment.
    OrphanedParent { index: usize },
    /// An element without a role title.
    MissingRole { index: usize },
    /// A nested role under a grouped header produced no record.
    NestedRoleSkipped { index: usize, role_index: usize },
    /// No profile entity carries the requested public identifier.
    ProfileNotFound { vanity: String },
}

impl Diagnostic {
    /// Emits the diagnostic through `tracing` at a level matching its weight.
    pub fn log(&self) {
        match self {
            Diagnostic::MissingEntityComponent { .. }
            | Diagnostic::MissingRole { .. }
            | Diagnostic::NestedRoleSkipped { .. } => debug!("{}", self),
            _ => warn!("{}", self),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NoEntityPool => write!(f, "no entity pool in document"),
            Diagnostic::NoAnchor { section } => write!(f, "no {} anchor found", section),
            Diagnostic::EmptyAnchor { urn } => write!(f, "anchor {} has no elements", urn),
            Diagnostic::Paginated { urn, paging } => {
                let show = |v: Option<u64>| v.map_or_else(|| "unknown".to_string(), |n| n.to_string());
                write!(
                    f,
                    "pagination on {}: {} of {} (start: {})",
                    urn,
                    show(paging.count),
                    show(paging.total),
                    paging.start.unwrap_or(0)
                )
            }
            Diagnostic::MalformedElement { index } => write!(f, "element {}: not an object", index),
            Diagnostic::MissingEntityComponent { index } => {
                write!(f, "element {}: no entity component", index)
            }
            Diagnostic::NestedListMissing { index, urn } => {
                write!(f, "element {}: nested list {} not in pool", index, urn)
            }
            Diagnostic::OrphanedParent { index } => {
                write!(f, "element {}: skipping potential parent block", index)
            }
            Diagnostic::MissingRole { index } => write!(f, "element {}: no role title", index),
            Diagnostic::NestedRoleSkipped { index, role_index } => {
                write!(f, "element {}: nested role {} skipped", index, role_index)
            }
            Diagnostic::ProfileNotFound { vanity } => write!(f, "profile '{}' not found", vanity),
        }
    }
}

/// Accumulates diagnostics, logging each as it is pushed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        diagnostic.log();
        self.0.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    pub fn contains(&self, diagnostic: &Diagnostic) -> bool {
        self.0.contains(diagnostic)
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.0
    }
}
