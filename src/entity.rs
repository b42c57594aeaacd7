//! Entity pool indexing.
//!
//! A response carries its entities as a flat array; every other component
//! looks them up by `entityUrn` through an [`EntityIndex`].

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

/// Field holding an entity's identifier.
pub const ENTITY_URN_FIELD: &str = "entityUrn";

/// Returns the identifier of `entity`, if it carries one.
pub fn entity_urn(entity: &Value) -> Option<&str> {
    entity.get(ENTITY_URN_FIELD).and_then(Value::as_str)
}

/// Identifier -> entity lookup for one response.
///
/// Built once and never mutated. Entities without an identifier are not
/// indexed. When an identifier occurs more than once the last occurrence
/// wins, while the entry keeps the position of the first occurrence, so
/// iteration follows the order identifiers were first encountered in the
/// pool.
#[derive(Debug, Clone, Default)]
pub struct EntityIndex<'a> {
    entries: IndexMap<&'a str, &'a Value>,
    skipped: usize,
}

impl<'a> EntityIndex<'a> {
    /// Builds the index in a single pass over `entities`.
    pub fn build(entities: &'a [Value]) -> Self {
        let mut entries = IndexMap::with_capacity(entities.len());
        let mut skipped = 0;

        for entity in entities {
            match entity_urn(entity) {
                Some(urn) => {
                    entries.insert(urn, entity);
                }
                None => skipped += 1,
            }
        }

        debug!(
            indexed = entries.len(),
            skipped,
            "indexed {} entities by URN",
            entries.len()
        );

        Self { entries, skipped }
    }

    /// Looks up an entity by identifier.
    pub fn lookup(&self, urn: &str) -> Option<&'a Value> {
        self.entries.get(urn).copied()
    }

    pub fn contains(&self, urn: &str) -> bool {
        self.entries.contains_key(urn)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of pool items that carried no identifier.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Identifiers in pool encounter order.
    pub fn urns(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.entries.keys().copied()
    }

    /// `(identifier, entity)` pairs in pool encounter order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Value)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_unique() {
        let pool = vec![
            json!({"entityUrn": "urn:li:a:1", "name": "one"}),
            json!({"entityUrn": "urn:li:a:2", "name": "two"}),
            json!({"entityUrn": "urn:li:a:3", "name": "three"}),
        ];

        let index = EntityIndex::build(&pool);

        assert_eq!(index.len(), 3);
        assert_eq!(index.lookup("urn:li:a:2"), Some(&pool[1]));
        assert_eq!(index.lookup("urn:li:a:4"), None);
    }

    #[test]
    fn test_duplicate_last_write_wins() {
        let pool = vec![
            json!({"entityUrn": "urn:li:a:1", "name": "first"}),
            json!({"entityUrn": "urn:li:a:2", "name": "other"}),
            json!({"entityUrn": "urn:li:a:1", "name": "second"}),
        ];

        let index = EntityIndex::build(&pool);

        assert_eq!(index.len(), 2);
        assert_eq!(index.lookup("urn:li:a:1").unwrap()["name"], "second");
        // position of the first occurrence is kept
        let urns: Vec<&str> = index.urns().collect();
        assert_eq!(urns, vec!["urn:li:a:1", "urn:li:a:2"]);
    }

    #[test]
    fn test_items_without_urn_are_skipped() {
        let pool = vec![
            json!({"entityUrn": "urn:li:a:1"}),
            json!({"name": "no urn"}),
            json!("not an object"),
            json!({"entityUrn": 7}),
        ];

        let index = EntityIndex::build(&pool);

        assert_eq!(index.len(), 1);
        assert_eq!(index.skipped(), 3);
    }

    #[test]
    fn test_iteration_follows_pool_order() {
        let pool = vec![
            json!({"entityUrn": "urn:li:z:9"}),
            json!({"entityUrn": "urn:li:a:1"}),
            json!({"entityUrn": "urn:li:m:5"}),
        ];

        let index = EntityIndex::build(&pool);
        let urns: Vec<&str> = index.iter().map(|(urn, _)| urn).collect();

        assert_eq!(urns, vec!["urn:li:z:9", "urn:li:a:1", "urn:li:m:5"]);
    }
}
