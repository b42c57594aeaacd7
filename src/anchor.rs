//! Discovery of the entity that roots a paginated section view.
//!
//! Section payloads do not point at their root list directly; the root has
//! to be recognised by its identifier. The recognition rule is an
//! [`AnchorPredicate`] supplied by the caller. The scan follows pool order
//! and the first match wins.

use crate::entity::EntityIndex;
use crate::urn::Urn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

/// Decides whether an identifier names an anchor.
pub trait AnchorPredicate {
    fn matches(&self, urn: &str) -> bool;
}

impl<F> AnchorPredicate for F
where
    F: Fn(&str) -> bool,
{
    fn matches(&self, urn: &str) -> bool {
        self(urn)
    }
}

/// Matches identifiers that contain every one of the given substrings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainsAll(pub Vec<String>);

impl ContainsAll {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }
}

impl AnchorPredicate for ContainsAll {
    fn matches(&self, urn: &str) -> bool {
        self.0.iter().all(|part| urn.contains(part.as_str()))
    }
}

/// Pagination descriptor attached to a list payload.
///
/// Only reported; further pages are never fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub start: Option<u64>,
}

impl Paging {
    /// True when `total` says there are more items than this page holds.
    pub fn is_partial(&self, received: usize) -> bool {
        match self.total {
            Some(total) => total > received as u64,
            None => false,
        }
    }
}

/// A located anchor entity.
#[derive(Debug, Clone, Copy)]
pub struct Anchor<'a> {
    pub urn: &'a str,
    pub entity: &'a Value,
}

impl<'a> Anchor<'a> {
    pub fn elements(&self) -> &'a [Value] {
        list_elements(self.entity)
    }

    pub fn paging(&self) -> Option<Paging> {
        list_paging(self.entity)
    }
}

/// Scans the index in pool order and returns the first matching entity.
pub fn locate<'a, P>(index: &EntityIndex<'a>, predicate: &P) -> Option<Anchor<'a>>
where
    P: AnchorPredicate + ?Sized,
{
    let found = index
        .iter()
        .find(|(urn, _)| predicate.matches(urn))
        .map(|(urn, entity)| Anchor { urn, entity });

    match &found {
        Some(anchor) => {
            let kind = Urn::parse(anchor.urn).map_or("unknown", |u| u.entity_type());
            info!(urn = %anchor.urn, kind, "found anchor");
        }
        None => debug!(entities = index.len(), "no anchor matched"),
    }
    found
}

/// List items of an entity: `elements`, or `components.elements`.
pub fn list_elements(entity: &Value) -> &[Value] {
    entity
        .get("elements")
        .and_then(Value::as_array)
        .or_else(|| {
            entity
                .get("components")
                .and_then(|c| c.get("elements"))
                .and_then(Value::as_array)
        })
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Paging descriptor: `paging`, or `components.paging`.
pub fn list_paging(entity: &Value) -> Option<Paging> {
    let raw = entity
        .get("paging")
        .or_else(|| entity.get("components").and_then(|c| c.get("paging")))?;
    serde_json::from_value(raw.clone()).ok()
}
