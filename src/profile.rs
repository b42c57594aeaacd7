//! Profile lookup.

use crate::document::ResponseDocument;
use crate::entity::entity_urn;
use crate::path::{Extractor, FieldPath};
use crate::text;
use crate::urn::{strip_urn_prefix, PROFILE_URN_PREFIX};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;

static PROFILE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"linkedin\.com/in/([a-zA-Z0-9-]+)").expect("valid profile URL pattern"));

const PUBLIC_IDENTIFIER_FIELD: &str = "publicIdentifier";

/// Vanity name from a profile URL. Anything else is returned unchanged.
///
/// ```
/// use urnkit::profile::vanity_name;
///
/// assert_eq!(vanity_name("https://www.linkedin.com/in/jane-doe-42/"), "jane-doe-42");
/// assert_eq!(vanity_name("jane-doe-42"), "jane-doe-42");
/// ```
pub fn vanity_name(input: &str) -> &str {
    PROFILE_URL
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map_or(input, |m| m.as_str())
}

/// The pool entity whose public identifier is `vanity`.
pub fn find_profile<'d>(document: &ResponseDocument<'d>, vanity: &str) -> Option<&'d Value> {
    document
        .pool()
        .iter()
        .find(|entity| entity.get(PUBLIC_IDENTIFIER_FIELD).and_then(Value::as_str) == Some(vanity))
}

/// Profile identifier (the profile urn without its prefix) for `vanity`.
pub fn find_profile_id(document: &ResponseDocument<'_>, vanity: &str) -> Option<String> {
    let urn = entity_urn(find_profile(document, vanity)?)?;
    Some(strip_urn_prefix(urn, PROFILE_URN_PREFIX).to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthDate {
    pub month: Option<u32>,
    pub day: Option<u32>,
}

/// Flattened profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub id_urn: String,
    pub public_identifier: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<BirthDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_picture: Option<String>,
}

impl ProfileRecord {
    pub fn from_entity(entity: &Value) -> Self {
        let string = |key: &str| entity.get(key).and_then(Value::as_str).unwrap_or_default().to_string();

        let first_name = string("firstName");
        let last_name = string("lastName");
        let full_name = format!("{first_name} {last_name}").trim().to_string();

        Self {
            id_urn: strip_urn_prefix(&string("entityUrn"), PROFILE_URN_PREFIX).to_string(),
            public_identifier: string(PUBLIC_IDENTIFIER_FIELD),
            first_name,
            last_name,
            full_name,
            headline: text::text_field(entity, "headline"),
            birth_date: birth_date(entity),
            profile_picture: picture_url(entity, "profilePicture"),
            background_picture: picture_url(entity, "backgroundPicture"),
        }
    }
}

/// Profile record for `vanity`, if the document carries it.
pub fn extract_profile(document: &ResponseDocument<'_>, vanity: &str) -> Option<ProfileRecord> {
    find_profile(document, vanity).map(ProfileRecord::from_entity)
}

fn birth_date(entity: &Value) -> Option<BirthDate> {
    let on = entity.get("birthDateOn").filter(|v| v.is_object())?;
    let part = |key: &str| on.get(key).and_then(Value::as_u64).and_then(|n| u32::try_from(n).ok());

    Some(BirthDate {
        month: part("month"),
        day: part("day"),
    })
}

/// `rootUrl` joined with the largest (last) artifact's path segment.
fn picture_url(entity: &Value, picture: &str) -> Option<String> {
    let image = FieldPath::from_keys(&[picture, "displayImageReferenceResolutionResult", "vectorImage"]);
    let image = entity.extract(&image)?;

    let root = image.get("rootUrl").and_then(Value::as_str)?;
    let segment = image
        .get("artifacts")
        .and_then(Value::as_array)
        .and_then(|artifacts| artifacts.last())
        .and_then(|artifact| artifact.get("fileIdentifyingUrlPathSegment"))
        .and_then(Value::as_str)?;

    Some(format!("{root}{segment}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> Value {
        json!({
            "data": {},
            "included": [
                {"entityUrn": "urn:li:fsd_company:1", "name": "Acme"},
                {
                    "entityUrn": "urn:li:fsd_profile:ACoAAB",
                    "publicIdentifier": "jane-doe",
                    "firstName": "Jane",
                    "lastName": "Doe",
                    "headline": {"text": "Engineer at Acme"},
                    "birthDateOn": {"month": 4, "day": 12},
                    "profilePicture": {"displayImageReferenceResolutionResult": {"vectorImage": {
                        "rootUrl": "https://media.example/img/",
                        "artifacts": [
                            {"width": 100, "fileIdentifyingUrlPathSegment": "100.jpg"},
                            {"width": 800, "fileIdentifyingUrlPathSegment": "800.jpg"}
                        ]
                    }}}
                }
            ]
        })
    }

    #[test]
    fn test_vanity_name() {
        assert_eq!(vanity_name("linkedin.com/in/abc-123?trk=x"), "abc-123");
        assert_eq!(vanity_name("https://example.com/in/abc"), "https://example.com/in/abc");
    }

    #[test]
    fn test_find_profile_id() {
        let doc = document();
        let doc = ResponseDocument::new(&doc);

        assert_eq!(find_profile_id(&doc, "jane-doe"), Some("ACoAAB".to_string()));
        assert_eq!(find_profile_id(&doc, "john"), None);
    }

    #[test]
    fn test_extract_profile() {
        let doc = document();
        let profile = extract_profile(&ResponseDocument::new(&doc), "jane-doe").unwrap();

        assert_eq!(profile.id_urn, "ACoAAB");
        assert_eq!(profile.full_name, "Jane Doe");
        assert_eq!(profile.headline.as_deref(), Some("Engineer at Acme"));
        assert_eq!(
            profile.birth_date,
            Some(BirthDate {
                month: Some(4),
                day: Some(12)
            })
        );
        assert_eq!(profile.profile_picture.as_deref(), Some("https://media.example/img/800.jpg"));
        assert_eq!(profile.background_picture, None);
    }

    #[test]
    fn test_sparse_profile() {
        let entity = json!({"entityUrn": "urn:li:fsd_profile:X", "firstName": "Solo"});

        let profile = ProfileRecord::from_entity(&entity);

        assert_eq!(profile.full_name, "Solo");
        assert_eq!(profile.last_name, "");
        assert_eq!(profile.birth_date, None);
        assert_eq!(profile.headline, None);
    }
}
