//! Integration tests for the entity index, reference resolution and projection

use serde_json::{json, Value};
use urnkit::project::{merge_by_side_key, project, side_table};
use urnkit::text::normalize;
use urnkit::{EntityIndex, FieldsMap, ReferenceResolver};

fn pool() -> Vec<Value> {
    json!([
        {"entityUrn": "urn:li:fsd_position:1", "title": "Engineer", "*company": "urn:li:fsd_company:7",
         "*skills": ["urn:li:fsd_skill:1", "urn:li:fsd_skill:404", "urn:li:fsd_skill:2"]},
        {"entityUrn": "urn:li:fsd_company:7", "name": "Acme", "universalName": "acme",
         "*headquarters": "urn:li:fsd_geo:3"},
        {"entityUrn": "urn:li:fsd_geo:3", "name": "Lisbon", "*company": "urn:li:fsd_company:7"},
        {"entityUrn": "urn:li:fsd_skill:1", "name": "Rust"},
        {"entityUrn": "urn:li:fsd_skill:2", "name": "SQL"}
    ])
    .as_array()
    .cloned()
    .unwrap()
}

#[test]
fn test_index_counts_and_duplicates() {
    let mut entities = pool();
    assert_eq!(EntityIndex::build(&entities).len(), 5);

    entities.push(json!({"entityUrn": "urn:li:fsd_skill:1", "name": "Rust (updated)"}));
    entities.push(json!({"name": "no identifier"}));
    let index = EntityIndex::build(&entities);

    assert_eq!(index.len(), 5);
    assert_eq!(index.skipped(), 1);
    assert_eq!(index.lookup("urn:li:fsd_skill:1").unwrap()["name"], "Rust (updated)");
}

#[test]
fn test_resolves_nested_pointers_and_cuts_cycles() {
    let entities = pool();
    let index = EntityIndex::build(&entities);
    let resolver = ReferenceResolver::new(&index);

    let resolved = resolver.resolve_entity(&entities[0]);

    let company = &resolved["company"];
    assert_eq!(company["name"], "Acme");
    assert_eq!(company["headquarters"]["name"], "Lisbon");
    // geo -> company would re-enter the company on this path
    assert_eq!(company["headquarters"]["company"], "urn:li:fsd_company:7");

    let skills: Vec<_> = resolved["skills"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(skills, vec!["Rust", "SQL"]);
}

#[test]
fn test_resolution_leaves_pool_untouched() {
    let entities = pool();
    let before = entities.clone();
    let index = EntityIndex::build(&entities);

    let _ = ReferenceResolver::new(&index).resolve(&json!({"*a": "urn:li:fsd_company:7"}));

    assert_eq!(entities, before);
}

#[test]
fn test_projection_and_side_merge() {
    let entities = pool();
    let index = EntityIndex::build(&entities);
    let resolver = ReferenceResolver::new(&index);
    let resolved = vec![resolver.resolve_entity(&entities[0])];

    let fields = FieldsMap::from_pairs([
        ("id", "entityUrn"),
        ("companyName", "company.name"),
        ("companyUrn", "company.entityUrn"),
        ("firstSkill", "skills[0].name"),
        ("missing", "company.miniCompany.name"),
    ])
    .unwrap();

    let first = project(&resolved, &fields);
    let second = project(&resolved, &fields);
    assert_eq!(serde_json::to_string(&first).unwrap(), serde_json::to_string(&second).unwrap());

    let record = &first[0];
    assert_eq!(record.keys().collect::<Vec<_>>(), vec!["id", "companyName", "companyUrn", "firstSkill"]);
    assert_eq!(record["firstSkill"], "Rust");

    let side = side_table(&index, &["universalName".to_string()]);
    let merged = merge_by_side_key(first, &side, "companyUrn");
    assert_eq!(merged[0]["universalName"], "acme");
    assert_eq!(merged[0]["id"], "urn:li:fsd_position:1");
}

#[test]
fn test_text_normalization() {
    assert_eq!(normalize(&json!("Engineer")), "Engineer");
    assert_eq!(normalize(&json!({"text": "Engineer"})), "Engineer");
    assert_eq!(normalize(&json!({"text": {"text": "Engineer"}})), "Engineer");
    assert_eq!(normalize(&json!({})), "");
    assert_eq!(normalize(&Value::Null), "");
    assert_eq!(normalize(&json!(["Engineer"])), "");
}
