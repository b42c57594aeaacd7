//! Experience section extraction.
//!
//! The experience view lists one element per block. A block is either a
//! single position, or a company group: a header naming the company whose
//! sub-components point at a nested paged list holding one element per role.
//!
//! ```text
//! anchor.elements[i].components.entityComponent
//!   ├─ titleV2 / subtitle / caption / metadata       (text nodes)
//!   └─ subComponents.components[0].components
//!        ├─ *pagedListComponent -> nested list      (grouped header)
//!        └─ fixedListComponent.components[*]
//!             .components.textComponent             (description)
//! ```

use crate::anchor::{list_elements, locate};
use crate::config::ExperienceConfig;
use crate::diagnostics::Diagnostic;
use crate::entity::{entity_urn, EntityIndex};
use crate::ordering::EndDate;
use crate::section::{entity_component, SectionExtractor, SectionReport};
use crate::text::{self, text_field};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

/// One extracted position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceRecord {
    pub role: String,

    pub company: String,

    /// Raw date caption, e.g. `Jan 2020 - Present · 4 yrs 2 mos`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_duration: Option<String>,

    /// Caption text before the separator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_period: Option<String>,

    /// Caption text after the separator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ExperienceRecord {
    /// End of the period, or `None` for a current position or an
    /// unreadable period.
    ///
    /// A caption without a separator is read as the period itself.
    pub fn end_date(&self) -> Option<EndDate> {
        match &self.time_period {
            Some(period) => EndDate::from_period_text(period),
            None => self.time_duration.as_deref().and_then(EndDate::from_period_text),
        }
    }
}

/// Splits a date caption at `separator` into `(period, duration)`.
///
/// Both sides are trimmed and text past a second separator is ignored. The
/// period is kept even when empty; the duration is `None` when empty.
/// Without a separator both parts are `None`.
///
/// ```
/// use urnkit::section::split_dates;
///
/// let (period, duration) = split_dates("Jan 2020 - Present · 4 yrs", '·');
/// assert_eq!(period.as_deref(), Some("Jan 2020 - Present"));
/// assert_eq!(duration.as_deref(), Some("4 yrs"));
/// ```
pub fn split_dates(caption: &str, separator: char) -> (Option<String>, Option<String>) {
    if !caption.contains(separator) {
        return (None, None);
    }

    let mut parts = caption.split(separator).map(str::trim);

    let period = parts.next().map(str::to_string);
    let duration = parts.next().filter(|d| !d.is_empty()).map(str::to_string);
    (period, duration)
}

/// Where a block's nested paged-list pointer leads.
enum NestedList<'a> {
    /// Present in the pool.
    Found(&'a Value),
    /// Named, but not in the pool.
    Dangling(String),
    /// No pointer at all.
    Absent,
}

/// Extractor for the experience section.
#[derive(Debug, Clone, Default)]
pub struct ExperienceExtractor {
    config: ExperienceConfig,
}

impl ExperienceExtractor {
    pub fn new(config: ExperienceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExperienceConfig {
        &self.config
    }

    fn extract_element(
        &self,
        position: usize,
        element: &Value,
        index: &EntityIndex<'_>,
        report: &mut SectionReport<ExperienceRecord>,
    ) {
        if !element.is_object() {
            report.diagnostics.push(Diagnostic::MalformedElement { index: position });
            return;
        }

        let Some(entity) = entity_component(element) else {
            report
                .diagnostics
                .push(Diagnostic::MissingEntityComponent { index: position });
            return;
        };

        match self.nested_list(entity, index) {
            NestedList::Found(nested) => {
                self.extract_group(position, entity, nested, report);
                return;
            }
            NestedList::Dangling(urn) => {
                report
                    .diagnostics
                    .push(Diagnostic::NestedListMissing { index: position, urn });
            }
            NestedList::Absent => {}
        }

        if is_present(entity, "titleV2") && !is_present(entity, "caption") {
            report.diagnostics.push(Diagnostic::OrphanedParent { index: position });
            return;
        }

        match self.extract_one(entity, None) {
            Some(record) => report.records.push(record),
            None => report.diagnostics.push(Diagnostic::MissingRole { index: position }),
        }
    }

    /// Emits one record per nested role, all under the header's company.
    fn extract_group(
        &self,
        position: usize,
        header: &Value,
        nested: &Value,
        report: &mut SectionReport<ExperienceRecord>,
    ) {
        let company = text::normalize_opt(header.get("titleV2"));
        let total_duration = text::normalize_opt(header.get("subtitle"));
        let roles = list_elements(nested);

        info!(
            element = position,
            company = %company,
            duration = %total_duration,
            roles = roles.len(),
            "grouped company"
        );

        for (role_index, role) in roles.iter().enumerate() {
            let record = entity_component(role)
                .and_then(|entity| self.extract_one(entity, Some(company.as_str())));

            match record {
                Some(record) => {
                    debug!(role = %record.role, company = %record.company, "extracted nested role");
                    report.records.push(record);
                }
                None => report.diagnostics.push(Diagnostic::NestedRoleSkipped {
                    index: position,
                    role_index,
                }),
            }
        }
    }

    /// Builds a record from one entity component.
    ///
    /// Returns `None` when the entity has no role title. A non-empty
    /// `company_override` replaces the entity's own subtitle.
    pub fn extract_one(&self, entity: &Value, company_override: Option<&str>) -> Option<ExperienceRecord> {
        let role = text_field(entity, "titleV2")?;

        let company = company_override
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .or_else(|| text_field(entity, "subtitle"))
            .unwrap_or_else(|| self.config.company_default.clone());

        let time_duration = text_field(entity, "caption");
        let (time_period, duration) = time_duration
            .as_deref()
            .map(|caption| split_dates(caption, self.config.date_separator))
            .unwrap_or((None, None));

        let description = find_description(entity).unwrap_or_else(|| self.config.description_default.clone());

        Some(ExperienceRecord {
            role,
            company,
            time_duration,
            time_period,
            duration,
            location: text_field(entity, "metadata"),
            description: Some(description),
        })
    }

    /// Looks for the nested paged-list pointer of a grouped header.
    ///
    /// Configured key spellings are tried in order, then, if enabled, every
    /// key containing the fallback substring. The first candidate present
    /// in the pool wins.
    fn nested_list<'a>(&self, entity: &Value, index: &EntityIndex<'a>) -> NestedList<'a> {
        let Some(sub) = first_sub_components(entity) else {
            return NestedList::Absent;
        };

        let named = self
            .config
            .paged_list_keys
            .iter()
            .filter_map(|key| sub.get(key.as_str()));

        let fallback = self.config.paged_list_fallback.as_deref().map(str::to_lowercase);
        let fuzzy = sub
            .iter()
            .filter(move |(key, _)| {
                fallback
                    .as_deref()
                    .is_some_and(|needle| key.to_lowercase().contains(needle))
            })
            .map(|(_, value)| value);

        let mut dangling = None;
        for urn in named.chain(fuzzy).filter_map(pointer_target) {
            if let Some(target) = index.lookup(urn) {
                return NestedList::Found(target);
            }
            dangling.get_or_insert_with(|| urn.to_string());
        }

        dangling.map_or(NestedList::Absent, NestedList::Dangling)
    }
}

impl SectionExtractor for ExperienceExtractor {
    type Record = ExperienceRecord;

    fn name(&self) -> &str {
        "experience"
    }

    fn extract(&self, index: &EntityIndex<'_>) -> SectionReport<ExperienceRecord> {
        let mut report = SectionReport::new(self.name());

        if index.is_empty() {
            report.diagnostics.push(Diagnostic::NoEntityPool);
            return report;
        }

        let Some(anchor) = locate(index, &self.config.anchor) else {
            report.diagnostics.push(Diagnostic::NoAnchor {
                section: self.name().to_string(),
            });
            return report;
        };
        report.anchor_urn = Some(anchor.urn.to_string());

        let elements = anchor.elements();
        info!(blocks = elements.len(), "found experience blocks");

        if let Some(paging) = anchor.paging() {
            report.paging = Some(paging);
            if paging.is_partial(elements.len()) {
                report.diagnostics.push(Diagnostic::Paginated {
                    urn: anchor.urn.to_string(),
                    paging,
                });
            }
        }

        if elements.is_empty() {
            report.diagnostics.push(Diagnostic::EmptyAnchor {
                urn: anchor.urn.to_string(),
            });
            return report;
        }

        for (position, element) in elements.iter().enumerate() {
            self.extract_element(position, element, index, &mut report);
        }

        info!(count = report.records.len(), "extracted experiences");
        report
    }
}

/// `subComponents.components[0].components` as an object.
fn first_sub_components(entity: &Value) -> Option<&serde_json::Map<String, Value>> {
    entity
        .get("subComponents")?
        .get("components")?
        .as_array()?
        .first()?
        .get("components")?
        .as_object()
}

/// Identifier a paged-list slot points at: the string itself, or the
/// `entityUrn` of an inlined entity.
fn pointer_target(value: &Value) -> Option<&str> {
    let urn = match value {
        Value::String(s) => s.as_str(),
        Value::Object(_) => entity_urn(value)?,
        _ => return None,
    };
    (!urn.is_empty()).then_some(urn)
}

/// First non-empty description text under the entity's fixed-list
/// sub-components.
fn find_description(entity: &Value) -> Option<String> {
    let subs = entity
        .get("subComponents")
        .and_then(|s| s.get("components"))
        .and_then(Value::as_array)?;

    subs.iter()
        .filter_map(|sub| {
            sub.get("components")?
                .get("fixedListComponent")?
                .get("components")?
                .as_array()
        })
        .flatten()
        .map(|fixed| text::normalize_opt(fixed.get("components").and_then(|c| c.get("textComponent"))))
        .find(|text| !text.is_empty())
}

fn is_present(entity: &Value, key: &str) -> bool {
    entity.get(key).is_some_and(|v| !v.is_null())
}
