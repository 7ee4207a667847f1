//! Weekly opening hours.
//!
//! Hours are kept as seconds from the start of the day, grouped by weekday
//! name. A day may carry several intervals (e.g. a lunch break).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Number of seconds in a day; every interval bound must be below it.
pub const SECONDS_PER_DAY: u32 = 86_400;

/// Weekday names accepted as keys.
pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Opening intervals keyed by weekday name, each interval `[start, end]` in
/// seconds from midnight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct OpeningHours(pub BTreeMap<String, Vec<[u32; 2]>>);

impl OpeningHours {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Same interval list on every day of the week.
    pub fn every_day(intervals: Vec<[u32; 2]>) -> Self {
        Self(
            WEEKDAYS
                .iter()
                .map(|day| (day.to_string(), intervals.clone()))
                .collect(),
        )
    }

    pub fn intervals(&self, weekday: &str) -> &[[u32; 2]] {
        self.0.get(weekday).map(Vec::as_slice).unwrap_or_default()
    }

    /// Check weekday names, bounds, and that intervals of a day are ordered
    /// and do not overlap.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (day, intervals) in &self.0 {
            if !WEEKDAYS.contains(&day.as_str()) {
                return Err(ValidationError::new(format!("unknown weekday '{}'", day)));
            }

            let mut previous_end: Option<u32> = None;
            for [start, end] in intervals {
                if *start >= SECONDS_PER_DAY || *end >= SECONDS_PER_DAY {
                    return Err(ValidationError::new(format!(
                        "opening hours on {} must be below {} seconds",
                        day, SECONDS_PER_DAY
                    )));
                }
                if start > end {
                    return Err(ValidationError::new(format!(
                        "opening interval [{}, {}] on {} ends before it starts",
                        start, end, day
                    )));
                }
                if previous_end.is_some_and(|prev| *start < prev) {
                    return Err(ValidationError::new(format!(
                        "opening intervals on {} overlap or are out of order",
                        day
                    )));
                }
                previous_end = Some(*end);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_day() {
        let hours = OpeningHours::every_day(vec![[9 * 3600, 17 * 3600]]);
        assert_eq!(hours.0.len(), 7);
        assert_eq!(hours.intervals("Sunday"), &[[32_400, 61_200]]);
        assert!(hours.validate().is_ok());
    }

    #[test]
    fn test_split_day_is_valid() {
        let mut map = BTreeMap::new();
        map.insert(
            "Saturday".to_string(),
            vec![[8 * 3600, 12 * 3600], [14 * 3600, 18 * 3600]],
        );
        assert!(OpeningHours(map).validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range() {
        let mut map = BTreeMap::new();
        map.insert("Monday".to_string(), vec![[0, SECONDS_PER_DAY]]);
        assert!(OpeningHours(map).validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_and_overlapping() {
        let mut map = BTreeMap::new();
        map.insert("Monday".to_string(), vec![[100, 50]]);
        assert!(OpeningHours(map).validate().is_err());

        let mut map = BTreeMap::new();
        map.insert("Monday".to_string(), vec![[100, 500], [400, 600]]);
        assert!(OpeningHours(map).validate().is_err());
    }

    #[test]
    fn test_rejects_unknown_weekday() {
        let mut map = BTreeMap::new();
        map.insert("Funday".to_string(), vec![[0, 10]]);
        assert!(OpeningHours(map).validate().is_err());
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut map = BTreeMap::new();
        map.insert("Friday".to_string(), vec![[3600, 7200]]);
        let json = serde_json::to_value(OpeningHours(map)).unwrap();
        assert_eq!(json, serde_json::json!({ "Friday": [[3600, 7200]] }));
    }
}
