use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, Result};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// A calendar day in `YYYY-MM-DD` form.
///
/// Ordering matches the lexicographic ordering of the zero-padded string,
/// so range checks can be done on either representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MealDate(Date);

impl MealDate {
    pub fn parse(value: &str) -> Result<Self> {
        Date::parse(value, DATE_FORMAT)
            .map(Self)
            .map_err(|err| Error::InvalidDate(format!("{value}: {err}")))
    }

    fn next_day(&self) -> Option<Self> {
        self.0.next_day().map(Self)
    }
}

impl FromStr for MealDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for MealDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            self.0.month() as u8,
            self.0.day()
        )
    }
}

impl Serialize for MealDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MealDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(serde::de::Error::custom)
    }
}

/// Inclusive `[start, end]` window of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    start_date: MealDate,
    end_date: MealDate,
}

impl DateRange {
    pub fn new(start: MealDate, end: MealDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidRange(format!("{start} is after {end}")));
        }

        Ok(Self {
            start_date: start,
            end_date: end,
        })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(MealDate::parse(start)?, MealDate::parse(end)?)
    }

    pub fn start(&self) -> MealDate {
        self.start_date
    }

    pub fn end(&self) -> MealDate {
        self.end_date
    }

    pub fn contains(&self, date: MealDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// True when `other` lies entirely inside this range.
    pub fn covers(&self, other: &DateRange) -> bool {
        other.start_date >= self.start_date && other.end_date <= self.end_date
    }

    /// Smallest range spanning both, gaps included.
    pub fn union(&self, other: &DateRange) -> DateRange {
        DateRange {
            start_date: self.start_date.min(other.start_date),
            end_date: self.end_date.max(other.end_date),
        }
    }

    /// True when the two ranges overlap or sit on consecutive days.
    pub fn touches(&self, other: &DateRange) -> bool {
        let reaches = |from: &DateRange, to: &DateRange| {
            from.end_date
                .next_day()
                .is_none_or(|after| to.start_date <= after)
        };

        reaches(self, other) && reaches(other, self)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start_date, self.end_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_parse_and_display_round_trip() {
        let day = MealDate::parse("2025-01-05").unwrap();

        assert_eq!(day.0, date!(2025-01-05));
        assert_eq!(day.to_string(), "2025-01-05");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            MealDate::parse("2025-13-01"),
            Err(Error::InvalidDate(_))
        ));
        assert!(MealDate::parse("5 January").is_err());
    }

    #[test]
    fn test_ordering_matches_string_ordering() {
        let days = ["2024-12-31", "2025-01-09", "2025-01-10", "2025-10-01"];

        for pair in days.windows(2) {
            let a = MealDate::parse(pair[0]).unwrap();
            let b = MealDate::parse(pair[1]).unwrap();
            assert!(a < b);
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_range_rejects_reversed_bounds() {
        assert!(matches!(
            DateRange::parse("2025-01-10", "2025-01-01"),
            Err(Error::InvalidRange(_))
        ));
        assert!(DateRange::parse("2025-01-10", "2025-01-10").is_ok());
    }

    #[test]
    fn test_covers_and_union() {
        let january = DateRange::parse("2025-01-01", "2025-01-31").unwrap();
        let week = DateRange::parse("2025-01-06", "2025-01-12").unwrap();
        let february = DateRange::parse("2025-02-01", "2025-02-28").unwrap();

        assert!(january.covers(&week));
        assert!(!week.covers(&january));
        assert!(!january.covers(&february));
        assert_eq!(
            january.union(&february),
            DateRange::parse("2025-01-01", "2025-02-28").unwrap()
        );
    }

    #[test]
    fn test_touches_adjacent_days() {
        let first = DateRange::parse("2025-01-01", "2025-01-10").unwrap();
        let next = DateRange::parse("2025-01-11", "2025-01-20").unwrap();
        let gap = DateRange::parse("2025-01-12", "2025-01-20").unwrap();

        assert!(first.touches(&next));
        assert!(next.touches(&first));
        assert!(!first.touches(&gap));
    }

    #[test]
    fn test_serializes_camel_case_bounds() {
        let range = DateRange::parse("2025-01-01", "2025-01-31").unwrap();

        assert_eq!(
            serde_json::to_value(range).unwrap(),
            serde_json::json!({ "startDate": "2025-01-01", "endDate": "2025-01-31" })
        );
    }
}
