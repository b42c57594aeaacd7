//! Aggregation over whole response documents.
//!
//! [`Pipeline`] ties the pieces together for one document at a time: it
//! builds the entity index, runs the matching extractor or projection, and
//! applies the end-date ordering.

use crate::config::ExtractionConfig;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::document::{Fetcher, LogicalQuery, PayloadEnvelope, ResponseDocument};
use crate::error::FetchError;
use crate::ordering::{sort_by_end_date, sort_records_by_end_date};
use crate::profile::{extract_profile, vanity_name, ProfileRecord};
use crate::project::{extract_with_references, merge_by_side_key, side_table, Record};
use crate::resolve::ReferenceResolver;
use crate::section::{ExperienceExtractor, ExperienceRecord, SectionExtractor, SectionReport};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};

/// Profile lookup result.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileRecord>,

    pub diagnostics: Diagnostics,
}

/// Output of [`Pipeline::run`], one variant per query kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "result", rename_all = "snake_case")]
pub enum Extraction {
    Profile(ProfileReport),
    Experiences(SectionReport<ExperienceRecord>),
    Positions(Vec<Record>),
}

/// Extraction entry points over one document.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: ExtractionConfig,
    experience: ExperienceExtractor,
}

impl Pipeline {
    pub fn new(config: ExtractionConfig) -> Self {
        let experience = ExperienceExtractor::new(config.experience.clone());
        Self { config, experience }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Experience records, current positions first, then most recent.
    #[instrument(skip_all)]
    pub fn experiences(&self, document: &Value) -> SectionReport<ExperienceRecord> {
        let index = ResponseDocument::new(document).index();
        let mut report = self.experience.extract(&index);

        sort_by_end_date(&mut report.records, ExperienceRecord::end_date);
        report
    }

    /// Position records listed under `data[elements_key]`: resolved,
    /// projected, joined with side fields and sorted by end date.
    #[instrument(skip_all)]
    pub fn positions(&self, document: &Value) -> Vec<Record> {
        let config = &self.config.positions;
        let document = ResponseDocument::new(document);
        let index = document.index();
        let resolver = ReferenceResolver::new(&index).with_marker(self.config.pointer_marker);

        let urns = document.element_urns(&config.elements_key);
        let records: Vec<Record> = extract_with_references(&urns, &resolver, &index, None)
            .iter()
            .map(|entity| config.fields.project_one(entity))
            .collect();

        let side = side_table(&index, &config.side_fields);
        let mut records = merge_by_side_key(records, &side, &config.match_field);
        sort_records_by_end_date(&mut records, &config.end_date_field);

        info!(listed = urns.len(), count = records.len(), "extracted positions");
        records
    }

    /// Profile for `vanity`, which may also be a full profile URL.
    pub fn profile(&self, document: &Value, vanity: &str) -> ProfileReport {
        let vanity = vanity_name(vanity);
        let mut diagnostics = Diagnostics::new();

        let profile = extract_profile(&ResponseDocument::new(document), vanity);
        if profile.is_none() {
            diagnostics.push(Diagnostic::ProfileNotFound {
                vanity: vanity.to_string(),
            });
        }

        ProfileReport { profile, diagnostics }
    }

    /// Dispatches one already-fetched document on its query kind.
    pub fn extract(&self, envelope: &PayloadEnvelope) -> Extraction {
        let document = &envelope.document;
        match &envelope.query {
            LogicalQuery::Profile { vanity } => Extraction::Profile(self.profile(document, vanity)),
            LogicalQuery::Experiences { .. } => Extraction::Experiences(self.experiences(document)),
            LogicalQuery::Positions { .. } => Extraction::Positions(self.positions(document)),
        }
    }

    /// Fetches `query` and extracts it.
    pub fn run<F: Fetcher + ?Sized>(&self, fetcher: &F, query: LogicalQuery) -> Result<Extraction, FetchError> {
        let envelope = PayloadEnvelope::fetch(fetcher, query)?;
        info!(payload_id = %envelope.payload_id, query = %envelope.query, "fetched payload");
        Ok(self.extract(&envelope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::StaticFetcher;
    use serde_json::json;

    fn positions_document() -> Value {
        json!({
            "data": {"*elements": ["urn:li:fsd_position:1", "urn:li:fsd_position:2"]},
            "included": [
                {"entityUrn": "urn:li:fsd_company:10", "universalName": "acme"},
                {
                    "entityUrn": "urn:li:fsd_position:1",
                    "title": "Intern",
                    "companyUrn": "urn:li:fsd_company:10",
                    "*company": "urn:li:fsd_company:10",
                    "timePeriod": {"startDate": {"year": 2015}, "endDate": {"year": 2016, "month": 8}}
                },
                {
                    "entityUrn": "urn:li:fsd_position:2",
                    "title": "Engineer",
                    "companyUrn": "urn:li:fsd_company:99",
                    "timePeriod": {"startDate": {"year": 2020, "month": 2}}
                }
            ]
        })
    }

    #[test]
    fn test_positions() {
        let records = Pipeline::default().positions(&positions_document());

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["title"], json!("Engineer"));
        assert!(records[0].get("endDate").is_none());
        assert!(records[0].get("universalName").is_none());

        assert_eq!(records[1]["title"], json!("Intern"));
        assert_eq!(records[1]["universalName"], json!("acme"));
        assert_eq!(records[1]["endDate"], json!({"year": 2016, "month": 8}));
        assert!(records[1].get("entityUrn").is_none());
    }

    #[test]
    fn test_profile_not_found() {
        let report = Pipeline::default().profile(&json!({"included": []}), "https://linkedin.com/in/ghost");

        assert!(report.profile.is_none());
        assert!(report.diagnostics.contains(&Diagnostic::ProfileNotFound {
            vanity: "ghost".to_string()
        }));
    }

    #[test]
    fn test_run_dispatches_on_query() {
        let query = LogicalQuery::Positions {
            profile_id: "ACo1".to_string(),
        };
        let fetcher = StaticFetcher::new().with_document(query.clone(), positions_document());

        match Pipeline::default().run(&fetcher, query).unwrap() {
            Extraction::Positions(records) => assert_eq!(records.len(), 2),
            other => panic!("unexpected extraction: {other:?}"),
        }

        let missing = LogicalQuery::Profile {
            vanity: "nobody".to_string(),
        };
        assert!(matches!(
            Pipeline::default().run(&fetcher, missing),
            Err(FetchError::NotFound(_))
        ));
    }
}
