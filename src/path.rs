//! Parsed field paths over resolved JSON trees.
//!
//! A path such as `company.miniCompany.industries[0]` is parsed once into an
//! ordered list of [`PathSegment`]s and then evaluated against any
//! [`serde_json::Value`]. Evaluation never fails: a missing link anywhere
//! along the path yields `None`. Only the path syntax itself can be wrong,
//! and that is reported when the path is parsed.

use crate::error::PathError;
use crate::text;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// A segment in a field path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// An object key (e.g., "company", "name")
    Key(String),
    /// An array index (e.g., [0], [5])
    Index(usize),
}

/// A dotted path with optional bracketed indices: `a.b[0].c`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPath {
    raw: String,
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// Parse a path.
    ///
    /// Keys are separated by `.`; each key may be followed by any number of
    /// `[n]` index segments. A component may consist of indices alone
    /// (`items.[0]` or `[0].name`).
    ///
    /// ```
    /// use urnkit::path::{FieldPath, PathSegment};
    ///
    /// let path = FieldPath::parse("attributes[0].name").unwrap();
    /// assert_eq!(path.segments().len(), 3);
    /// assert_eq!(path.segments()[1], PathSegment::Index(0));
    /// ```
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }

        let mut segments = Vec::new();
        let mut offset = 0;

        for component in path.split('.') {
            parse_component(path, component, offset, &mut segments)?;
            offset += component.len() + 1;
        }

        Ok(Self {
            raw: path.to_string(),
            segments,
        })
    }

    /// Builds a key-only path without parsing. Keys must not contain `.`,
    /// `[` or `]`.
    pub(crate) fn from_keys(keys: &[&str]) -> Self {
        Self {
            raw: keys.join("."),
            segments: keys.iter().map(|k| PathSegment::Key(k.to_string())).collect(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Walks the path from `root`. Returns `None` on the first missing link.
    pub fn evaluate<'v>(&self, root: &'v Value) -> Option<&'v Value> {
        self.segments
            .iter()
            .try_fold(root, |current, segment| match segment {
                PathSegment::Key(key) => current.as_object()?.get(key),
                PathSegment::Index(index) => current.as_array()?.get(*index),
            })
    }
}

fn parse_component(
    path: &str,
    component: &str,
    offset: usize,
    segments: &mut Vec<PathSegment>,
) -> Result<(), PathError> {
    let key_end = component.find(['[', ']']).unwrap_or(component.len());
    let key = &component[..key_end];
    let mut rest = &component[key_end..];

    if key.is_empty() && rest.is_empty() {
        return Err(PathError::EmptySegment {
            path: path.to_string(),
            position: offset,
        });
    }
    if !key.is_empty() {
        segments.push(PathSegment::Key(key.to_string()));
    }

    let mut position = offset + key_end;
    while !rest.is_empty() {
        if !rest.starts_with('[') {
            let found = rest.chars().next().unwrap_or(']');
            return Err(PathError::UnexpectedChar {
                path: path.to_string(),
                position,
                found,
            });
        }
        let close = rest.find(']').ok_or_else(|| PathError::UnclosedBracket {
            path: path.to_string(),
            position,
        })?;
        let digits = &rest[1..close];
        let index = digits
            .parse::<usize>()
            .map_err(|_| PathError::InvalidIndex {
                path: path.to_string(),
                index: digits.to_string(),
            })?;
        segments.push(PathSegment::Index(index));

        position += close + 1;
        rest = &rest[close + 1..];
    }

    Ok(())
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FieldPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.raw
    }
}

/// Types that can look up values by field path.
pub trait Extractor {
    /// Value at `path`, or `None` if any link is missing.
    fn extract(&self, path: &FieldPath) -> Option<&Value>;

    /// Normalized text at `path`; empty text counts as missing.
    fn extract_text(&self, path: &FieldPath) -> Option<String> {
        let value = self.extract(path)?;
        let text = text::normalize(value);
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Deserializes the value at `path` into `T`.
    fn extract_as<T>(&self, path: &FieldPath) -> Option<T>
    where
        T: DeserializeOwned,
    {
        self.extract(path)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

impl Extractor for Value {
    fn extract(&self, path: &FieldPath) -> Option<&Value> {
        path.evaluate(self)
    }
}
