//! Extraction configuration.
//!
//! Every payload convention the extractors depend on (pointer marker,
//! anchor naming, alternate key spellings, projection maps) lives here
//! instead of inline literals. [`ExtractionConfig::default`] reproduces the
//! built-in conventions; a YAML file can override any subset of them.
//!
//! ```yaml
//! pointer_marker: "*"
//! experience:
//!   anchor: ["EXPERIENCE_VIEW_DETAILS", "fsd_profile:"]
//!   paged_list_keys: ["*pagedListComponent", "pagedListComponent"]
//!   paged_list_fallback: pagedlistcomponent
//! positions:
//!   fields:
//!     id: entityUrn
//!     companyName: company.miniCompany.name
//!   side_fields: [universalName]
//!   match_field: companyUrn
//! ```

use crate::anchor::ContainsAll;
use crate::error::ConfigError;
use crate::path::FieldPath;
use crate::project::FieldsMap;
use crate::resolve::POINTER_MARKER;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Leading character marking pointer keys during resolution.
    ///
    /// Only the resolver reads it. `experience.paged_list_keys` and
    /// `positions.elements_key` are literal payload keys and are set on
    /// their own.
    pub pointer_marker: char,

    pub experience: ExperienceConfig,

    pub positions: PositionsConfig,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            pointer_marker: POINTER_MARKER,
            experience: ExperienceConfig::default(),
            positions: PositionsConfig::default(),
        }
    }
}

/// Conventions of the experience section view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceConfig {
    /// Substrings that together identify the section anchor.
    pub anchor: ContainsAll,

    /// Key spellings tried, in order, for the nested paged-list pointer of a
    /// grouped entry.
    pub paged_list_keys: Vec<String>,

    /// Case-insensitive substring tried on every sub-component key when none
    /// of `paged_list_keys` matched. `None` disables the fallback.
    pub paged_list_fallback: Option<String>,

    /// Company written when an ungrouped entry has no subtitle.
    pub company_default: String,

    /// Description written when no description text is found.
    pub description_default: String,

    /// Separator between the period and the duration in a date caption.
    pub date_separator: char,
}

impl Default for ExperienceConfig {
    fn default() -> Self {
        Self {
            anchor: ContainsAll::new(["EXPERIENCE_VIEW_DETAILS", "fsd_profile:"]),
            paged_list_keys: vec![
                "*pagedListComponent".to_string(),
                "pagedListComponent".to_string(),
            ],
            paged_list_fallback: Some("pagedlistcomponent".to_string()),
            company_default: "N/A".to_string(),
            description_default: "N/A".to_string(),
            date_separator: '·',
        }
    }
}

/// Projection of position entities listed by a document's `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionsConfig {
    /// Key under `data` holding the element identifiers.
    pub elements_key: String,

    pub fields: FieldsMap,

    /// Pool fields joined onto the projected records.
    pub side_fields: Vec<String>,

    /// Record field matched against side-table identifiers.
    pub match_field: String,

    /// Record field holding `{year, month}` used for ordering.
    pub end_date_field: String,
}

impl Default for PositionsConfig {
    fn default() -> Self {
        let pairs: [(&str, &[&str]); 12] = [
            ("id", &["entityUrn"]),
            ("title", &["title"]),
            ("companyName", &["company", "miniCompany", "name"]),
            ("companyUrn", &["companyUrn"]),
            ("companyEmployeeCount", &["company", "employeeCountRange"]),
            ("companyIndustries", &["company", "miniCompany", "industries"]),
            ("description", &["description"]),
            ("location", &["locationName"]),
            ("geoLocation", &["geoLocationName"]),
            ("timePeriod", &["timePeriod"]),
            ("startDate", &["timePeriod", "startDate"]),
            ("endDate", &["timePeriod", "endDate"]),
        ];
        let fields = pairs
            .into_iter()
            .fold(FieldsMap::new(), |map, (key, path)| map.with_field(key, FieldPath::from_keys(path)));

        Self {
            elements_key: "*elements".to_string(),
            fields,
            side_fields: vec!["universalName".to_string()],
            match_field: "companyUrn".to_string(),
            end_date_field: "endDate".to_string(),
        }
    }
}

impl ExtractionConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read, is not valid YAML, holds a
    /// malformed field path, or fails validation.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml_str(&contents)
    }

    /// Parse configuration from YAML text. Missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.experience.anchor.0.is_empty() {
            return Err(ConfigError::Invalid(
                "experience.anchor needs at least one substring".to_string(),
            ));
        }
        if self.experience.anchor.0.iter().any(String::is_empty) {
            return Err(ConfigError::Invalid(
                "experience.anchor contains an empty substring".to_string(),
            ));
        }
        if self.positions.match_field.is_empty() {
            return Err(ConfigError::Invalid(
                "positions.match_field must not be empty".to_string(),
            ));
        }
        if self.positions.elements_key.is_empty() {
            return Err(ConfigError::Invalid(
                "positions.elements_key must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ExtractionConfig::default();

        assert_eq!(config.pointer_marker, '*');
        assert_eq!(
            config.experience.paged_list_keys,
            vec!["*pagedListComponent", "pagedListComponent"]
        );
        assert_eq!(config.positions.fields.len(), 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
experience:
  paged_list_keys: ["pagedListComponentV2"]
  paged_list_fallback: null
positions:
  fields:
    id: entityUrn
    firstIndustry: company.miniCompany.industries[0]
"#;

        let config = ExtractionConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.pointer_marker, '*');
        assert_eq!(config.experience.paged_list_keys, vec!["pagedListComponentV2"]);
        assert_eq!(config.experience.paged_list_fallback, None);
        assert_eq!(config.experience.company_default, "N/A");
        assert_eq!(config.positions.fields.len(), 2);
        assert_eq!(config.positions.match_field, "companyUrn");
    }

    #[test]
    fn test_bad_field_path_fails() {
        let yaml = r#"
positions:
  fields:
    broken: "a..b"
"#;

        let result = ExtractionConfig::from_yaml_str(yaml);
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_empty_anchor_rejected() {
        let result = ExtractionConfig::from_yaml_str("experience:\n  anchor: []\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "pointer_marker: \"@\"").unwrap();

        let config = ExtractionConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.pointer_marker, '@');

        let missing = ExtractionConfig::load_from_file("/nonexistent/urnkit.yaml");
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_pointer_marker_leaves_literal_keys() {
        let config = ExtractionConfig::from_yaml_str("pointer_marker: \"@\"\n").unwrap();

        assert_eq!(config.pointer_marker, '@');
        assert_eq!(config.positions.elements_key, "*elements");
        assert_eq!(config.experience.paged_list_keys[0], "*pagedListComponent");
    }

    #[test]
    fn test_default_positions_fields() {
        let fields = PositionsConfig::default().fields;
        let keys: Vec<_> = fields.iter().map(|(key, _)| key).collect();

        assert_eq!(keys.first(), Some(&"id"));
        assert_eq!(keys.last(), Some(&"endDate"));
        assert_eq!(keys.len(), 12);
    }

    #[test]
    fn test_round_trip_default() {
        let yaml = serde_yaml::to_string(&ExtractionConfig::default()).unwrap();
        let config = ExtractionConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(config, ExtractionConfig::default());
    }
}
