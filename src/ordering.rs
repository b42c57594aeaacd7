//! Most-recent-first ordering by end date.
//!
//! Records without an end date are current and come first, in discovery
//! order. Dated records follow, newest year first, then newest month first.
//! A missing month sorts after every known month of the same year.

use crate::project::Record;
use chrono::Month;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

/// `{year, month}` end of a period. Either part may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EndDate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
}

impl EndDate {
    pub fn new(year: i32, month: Option<u32>) -> Self {
        Self {
            year: Some(year),
            month,
        }
    }

    /// Reads a `{year, month}` object. `null`, non-objects and objects
    /// carrying neither part are `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let year = object
            .get("year")
            .and_then(Value::as_i64)
            .and_then(|y| i32::try_from(y).ok());
        let month = object
            .get("month")
            .and_then(Value::as_u64)
            .and_then(|m| u32::try_from(m).ok())
            .filter(|m| (1..=12).contains(m));

        if year.is_none() && month.is_none() {
            return None;
        }
        Some(Self { year, month })
    }

    /// Parses the end of a `"<start> - <end>"` period.
    ///
    /// The end is `<Mon> <YYYY>` or `<YYYY>`. A period without an end, an
    /// end of `Present`, or unreadable text yields `None`.
    ///
    /// ```
    /// use urnkit::ordering::EndDate;
    ///
    /// assert_eq!(EndDate::from_period_text("Jan 2019 - Jun 2021"), Some(EndDate::new(2021, Some(6))));
    /// assert_eq!(EndDate::from_period_text("2015 - 2017"), Some(EndDate::new(2017, None)));
    /// assert_eq!(EndDate::from_period_text("Mar 2022 - Present"), None);
    /// ```
    pub fn from_period_text(period: &str) -> Option<Self> {
        let (_, end) = period.split_once(" - ")?;
        let end = end.trim();
        if end.eq_ignore_ascii_case("present") {
            return None;
        }

        let mut words = end.split_whitespace();
        match (words.next(), words.next(), words.next()) {
            (Some(year), None, None) => year.parse().ok().map(|y| Self::new(y, None)),
            (Some(month), Some(year), None) => {
                let month = month.parse::<Month>().ok()?.number_from_month();
                year.parse().ok().map(|y| Self::new(y, Some(month)))
            }
            _ => None,
        }
    }
}

/// Ordering of two optional end dates, most recent first.
pub fn compare_end_dates(a: Option<&EndDate>, b: Option<&EndDate>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => b.year.cmp(&a.year).then_with(|| b.month.cmp(&a.month)),
    }
}

/// Stable sort by the end date `key` extracts.
pub fn sort_by_end_date<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> Option<EndDate>,
{
    items.sort_by(|a, b| compare_end_dates(key(a).as_ref(), key(b).as_ref()));
}

/// Sorts projected records by the `{year, month}` object under `field`.
pub fn sort_records_by_end_date(records: &mut [Record], field: &str) {
    sort_by_end_date(records, |record| record.get(field).and_then(EndDate::from_value));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_current_first_then_most_recent() {
        let mut dates = vec![None, Some(EndDate::new(2020, Some(1))), Some(EndDate::new(2022, Some(6)))];

        sort_by_end_date(&mut dates, |d| *d);

        assert_eq!(
            dates,
            vec![None, Some(EndDate::new(2022, Some(6))), Some(EndDate::new(2020, Some(1)))]
        );
    }

    #[test]
    fn test_current_keep_discovery_order() {
        let mut items = vec![
            ("a", Some(EndDate::new(2019, None))),
            ("b", None),
            ("c", Some(EndDate::new(2021, Some(2)))),
            ("d", None),
        ];

        sort_by_end_date(&mut items, |(_, d)| *d);

        let names: Vec<_> = items.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["b", "d", "c", "a"]);
    }

    #[test]
    fn test_month_breaks_year_ties() {
        let dec = EndDate::new(2020, Some(12));
        let feb = EndDate::new(2020, Some(2));
        let year_only = EndDate::new(2020, None);

        assert_eq!(compare_end_dates(Some(&dec), Some(&feb)), Ordering::Less);
        assert_eq!(compare_end_dates(Some(&feb), Some(&year_only)), Ordering::Less);
    }

    #[test]
    fn test_from_value() {
        assert_eq!(
            EndDate::from_value(&json!({"year": 2022, "month": 6})),
            Some(EndDate::new(2022, Some(6)))
        );
        assert_eq!(EndDate::from_value(&json!({"year": 2022})), Some(EndDate::new(2022, None)));
        assert_eq!(EndDate::from_value(&Value::Null), None);
        assert_eq!(EndDate::from_value(&json!({})), None);
        assert_eq!(EndDate::from_value(&json!("2022")), None);
    }

    #[test]
    fn test_from_period_text() {
        assert_eq!(
            EndDate::from_period_text("Sep 2018 - September 2020"),
            Some(EndDate::new(2020, Some(9)))
        );
        assert_eq!(EndDate::from_period_text("2020 - Present"), None);
        assert_eq!(EndDate::from_period_text("2020"), None);
        assert_eq!(EndDate::from_period_text("2020 - soon"), None);
        assert_eq!(EndDate::from_period_text("Jan 2020 - Foo 2021"), None);
    }

    #[test]
    fn test_sort_records() {
        let record = |id: &str, end: Value| -> Record {
            [("id".to_string(), json!(id)), ("endDate".to_string(), end)]
                .into_iter()
                .collect()
        };
        let mut records = vec![
            record("old", json!({"year": 2015, "month": 3})),
            record("current", Value::Null),
            record("recent", json!({"year": 2023, "month": 1})),
        ];

        sort_records_by_end_date(&mut records, "endDate");

        let ids: Vec<_> = records.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["current", "recent", "old"]);
    }
}
