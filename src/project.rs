//! Declarative projection of resolved entities onto flat records.
//!
//! A [`FieldsMap`] names each output key and the [`FieldPath`] its value is
//! read from. Keys whose path does not resolve are left out of the record
//! rather than set to `null`. Records can then be enriched from a side table
//! with [`merge_by_side_key`].

use crate::entity::{EntityIndex, ENTITY_URN_FIELD};
use crate::error::PathError;
use crate::path::FieldPath;
use crate::resolve::ReferenceResolver;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// A flat output record; keys keep their declaration order.
pub type Record = IndexMap<String, Value>;

/// Ordered mapping of output key -> source path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldsMap {
    fields: IndexMap<String, FieldPath>,
}

impl FieldsMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from `(out_key, path)` pairs, failing on the first
    /// malformed path.
    ///
    /// ```
    /// use urnkit::project::FieldsMap;
    ///
    /// let fields = FieldsMap::from_pairs([
    ///     ("id", "entityUrn"),
    ///     ("companyName", "company.miniCompany.name"),
    /// ]).unwrap();
    /// assert_eq!(fields.len(), 2);
    /// ```
    pub fn from_pairs<I, K, P>(pairs: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: AsRef<str>,
    {
        let mut fields = IndexMap::new();
        for (key, path) in pairs {
            fields.insert(key.into(), FieldPath::parse(path.as_ref())?);
        }
        Ok(Self { fields })
    }

    pub fn with_field(mut self, key: impl Into<String>, path: FieldPath) -> Self {
        self.fields.insert(key.into(), path);
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldPath)> {
        self.fields.iter().map(|(k, p)| (k.as_str(), p))
    }

    /// Projects a single entity.
    pub fn project_one(&self, entity: &Value) -> Record {
        self.fields
            .iter()
            .filter_map(|(key, path)| path.evaluate(entity).map(|v| (key.clone(), v.clone())))
            .collect()
    }
}

/// Projects every entity through `fields`. Pure: same inputs, same output.
pub fn project(entities: &[Value], fields: &FieldsMap) -> Vec<Record> {
    entities.iter().map(|e| fields.project_one(e)).collect()
}

/// Left join of `records` against `side_table`.
///
/// A record whose `match_field` equals a side entry's `entityUrn` receives
/// that entry's other fields; fields already present on the record are kept.
/// Records without a match pass through unchanged. When several side entries
/// share an identifier the first one is used.
pub fn merge_by_side_key(records: Vec<Record>, side_table: &[Record], match_field: &str) -> Vec<Record> {
    let mut by_urn: IndexMap<&str, &Record> = IndexMap::new();
    for side in side_table {
        if let Some(urn) = side.get(ENTITY_URN_FIELD).and_then(Value::as_str) {
            by_urn.entry(urn).or_insert(side);
        }
    }

    records
        .into_iter()
        .map(|mut record| {
            let side = record
                .get(match_field)
                .and_then(Value::as_str)
                .and_then(|key| by_urn.get(key).copied());

            if let Some(side) = side {
                for (key, value) in side {
                    if key == ENTITY_URN_FIELD {
                        continue;
                    }
                    record.entry(key.clone()).or_insert_with(|| value.clone());
                }
            }
            record
        })
        .collect()
}

/// Collects `{entityUrn, <fields>}` for every pool entity carrying at least
/// one of `fields`, in pool order.
pub fn side_table(index: &EntityIndex<'_>, fields: &[String]) -> Vec<Record> {
    index
        .iter()
        .filter_map(|(urn, entity)| {
            let mut record = Record::new();
            record.insert(ENTITY_URN_FIELD.to_string(), Value::String(urn.to_string()));
            for field in fields {
                if let Some(value) = entity.get(field) {
                    record.insert(field.clone(), value.clone());
                }
            }
            (record.len() > 1).then_some(record)
        })
        .collect()
}

/// Keeps only `keys` that are present on `object`, in `keys` order.
pub fn select_keys(object: &Value, keys: &[&str]) -> Record {
    keys.iter()
        .filter_map(|key| object.get(*key).map(|v| (key.to_string(), v.clone())))
        .collect()
}

/// Copies `object` without `keys`.
pub fn omit_keys(object: &Value, keys: &[&str]) -> Record {
    let skip: HashSet<&str> = keys.iter().copied().collect();
    object
        .as_object()
        .map(|map| {
            map.iter()
                .filter(|(k, _)| !skip.contains(k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        })
        .unwrap_or_default()
}

/// Resolves the pool entities listed in `element_urns` and, when `fields`
/// is given, projects them.
///
/// Entities come back in pool order, not in `element_urns` order.
pub fn extract_with_references(
    element_urns: &[String],
    resolver: &ReferenceResolver<'_, '_>,
    index: &EntityIndex<'_>,
    fields: Option<&FieldsMap>,
) -> Vec<Value> {
    let wanted: HashSet<&str> = element_urns.iter().map(String::as_str).collect();

    let resolved = index
        .iter()
        .filter(|(urn, _)| wanted.contains(urn))
        .map(|(_, entity)| resolver.resolve_entity(entity));

    match fields {
        Some(fields) => resolved
            .map(|entity| record_to_value(fields.project_one(&entity)))
            .collect(),
        None => resolved.collect(),
    }
}

/// Converts a record into a JSON object, keeping key order on output.
pub fn record_to_value(record: Record) -> Value {
    Value::Object(record.into_iter().collect())
}
