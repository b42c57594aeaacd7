//! Section extraction.
//!
//! A section view (experience, education, ...) is a paginated list rooted at
//! an anchor entity. Each section has an extractor that walks the anchor's
//! elements and turns them into typed records.

pub mod experience;

pub use experience::{split_dates, ExperienceExtractor, ExperienceRecord};

use crate::anchor::Paging;
use crate::diagnostics::Diagnostics;
use crate::entity::EntityIndex;
use serde::Serialize;
use serde_json::Value;

/// Trait for section extractors.
///
/// Implementations hold no per-call state; one extractor can serve any
/// number of responses, including concurrently.
pub trait SectionExtractor: Send + Sync {
    type Record;

    /// Section name used in reports and logs.
    fn name(&self) -> &str;

    /// Extract the section from one response's entity index.
    ///
    /// Never fails: missing structure yields an empty or partial report
    /// with diagnostics.
    fn extract(&self, index: &EntityIndex<'_>) -> SectionReport<Self::Record>;
}

/// Result of extracting one section from one response.
#[derive(Debug, Clone, Serialize)]
pub struct SectionReport<R> {
    pub section: String,

    /// Identifier of the anchor the section was read from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_urn: Option<String>,

    /// Paging descriptor of the anchor list, when it carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paging: Option<Paging>,

    pub records: Vec<R>,

    pub diagnostics: Diagnostics,
}

impl<R> SectionReport<R> {
    pub fn new(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            anchor_urn: None,
            paging: None,
            records: Vec::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The primary sub-entity of a list element: `components.entityComponent`.
pub fn entity_component(element: &Value) -> Option<&Value> {
    element
        .get("components")?
        .get("entityComponent")
        .filter(|entity| entity.is_object())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_component() {
        let element = json!({"components": {"entityComponent": {"titleV2": "x"}}});
        assert!(entity_component(&element).is_some());

        assert!(entity_component(&json!({"components": {"entityComponent": null}})).is_none());
        assert!(entity_component(&json!({"components": {}})).is_none());
        assert!(entity_component(&json!("element")).is_none());
    }

    #[test]
    fn test_report_serialization_skips_missing_anchor() {
        let report: SectionReport<String> = SectionReport::new("experience");
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(
            value,
            json!({"section": "experience", "records": [], "diagnostics": []})
        );
    }
}
