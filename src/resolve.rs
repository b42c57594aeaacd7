//! Reference resolution over an [`EntityIndex`].
//!
//! Pointer fields are keys carrying a reserved leading marker (`*` in the
//! payloads this crate targets) whose value is an identifier or an array of
//! identifiers. Resolution builds a new owned tree in which every pointer
//! that can be satisfied from the index is replaced by the resolved target,
//! under the key with the marker stripped. The index itself is never
//! touched.
//!
//! Cycles are cut with a visited set scoped to the current resolution path:
//! an identifier already being resolved further up the same path is emitted
//! as its bare string instead of being expanded again. The same entity may
//! still be inlined at several independent positions of the output.

use crate::entity::{entity_urn, EntityIndex};
use crate::urn::is_urn;
use indexmap::IndexSet;
use serde_json::{Map, Value};
use tracing::trace;

/// Default leading marker on pointer keys.
pub const POINTER_MARKER: char = '*';

/// Resolves pointer fields against one response's entity index.
#[derive(Debug, Clone)]
pub struct ReferenceResolver<'i, 'a> {
    index: &'i EntityIndex<'a>,
    marker: char,
}

impl<'i, 'a> ReferenceResolver<'i, 'a> {
    pub fn new(index: &'i EntityIndex<'a>) -> Self {
        Self {
            index,
            marker: POINTER_MARKER,
        }
    }

    pub fn with_marker(mut self, marker: char) -> Self {
        self.marker = marker;
        self
    }

    pub fn marker(&self) -> char {
        self.marker
    }

    /// Resolves `node` starting from an empty visited set.
    pub fn resolve(&self, node: &Value) -> Value {
        let mut visited = IndexSet::new();
        self.resolve_with(node, &mut visited)
    }

    /// Resolves an entity with its own identifier already marked visited,
    /// so a pointer back to itself stays a bare identifier.
    pub fn resolve_entity(&self, entity: &Value) -> Value {
        let mut visited = IndexSet::new();
        if let Some(urn) = entity_urn(entity) {
            visited.insert(urn.to_string());
        }
        self.resolve_with(entity, &mut visited)
    }

    /// Resolves `node` given the identifiers already on the current path.
    ///
    /// `visited` is restored to its incoming state before returning.
    pub fn resolve_with(&self, node: &Value, visited: &mut IndexSet<String>) -> Value {
        match node {
            Value::Object(map) => Value::Object(self.resolve_object(map, visited)),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.resolve_with(item, visited))
                    .collect(),
            ),
            primitive => primitive.clone(),
        }
    }

    fn resolve_object(&self, map: &Map<String, Value>, visited: &mut IndexSet<String>) -> Map<String, Value> {
        let mut resolved = Map::with_capacity(map.len());

        for (key, value) in map {
            let stripped = key.strip_prefix(self.marker);

            match (stripped, value) {
                (Some(clean), Value::String(urn)) => match self.resolve_pointer(urn, visited) {
                    Some(target) => {
                        resolved.insert(clean.to_string(), target);
                    }
                    None => {
                        trace!(key = %key, urn = %urn, "unresolved pointer kept as-is");
                        resolved.insert(key.clone(), value.clone());
                    }
                },
                (_, Value::Array(items)) if is_urn_array(items) => {
                    let out_key = stripped.unwrap_or(key);
                    let targets = items
                        .iter()
                        .filter_map(Value::as_str)
                        .filter_map(|urn| self.resolve_pointer(urn, visited))
                        .collect();
                    resolved.insert(out_key.to_string(), Value::Array(targets));
                }
                _ => {
                    resolved.insert(key.clone(), self.resolve_with(value, visited));
                }
            }
        }

        resolved
    }

    /// Resolves one identifier. `None` when the index does not know it.
    fn resolve_pointer(&self, urn: &str, visited: &mut IndexSet<String>) -> Option<Value> {
        let target = self.index.lookup(urn)?;

        if visited.contains(urn) {
            trace!(urn = %urn, depth = visited.len(), "cycle cut");
            return Some(Value::String(urn.to_string()));
        }

        visited.insert(urn.to_string());
        let resolved = self.resolve_with(target, visited);
        visited.pop();

        Some(resolved)
    }
}

/// Non-empty and every element an identifier-shaped string.
fn is_urn_array(items: &[Value]) -> bool {
    !items.is_empty()
        && items
            .iter()
            .all(|item| item.as_str().is_some_and(is_urn))
}

/// Resolves `node` against `index` with the default marker.
pub fn resolve(node: &Value, index: &EntityIndex<'_>) -> Value {
    ReferenceResolver::new(index).resolve(node)
}
