use std::fmt;

use chrono::NaiveDate;

use crate::error::TimelineError;

/// Wire format for calendar dates at every boundary.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a strict `YYYY-MM-DD` calendar date.
///
/// Anything else, including unpadded months/days or surrounding whitespace,
/// is rejected with [`TimelineError::InvalidDateFormat`].
pub fn parse_iso_date(s: &str) -> Result<NaiveDate, TimelineError> {
    let bytes = s.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return Err(TimelineError::InvalidDateFormat(s.to_string()));
    }
    NaiveDate::parse_from_str(s, ISO_DATE_FORMAT)
        .map_err(|_| TimelineError::InvalidDateFormat(s.to_string()))
}

/// Format a date for the document and form boundary.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// An inclusive range of calendar days: both `start` and `end` belong to it.
///
/// [`Interval::new`] enforces `start <= end`. The fields stay public so the
/// overlap math can be exercised on any pair of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Interval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Interval {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TimelineError> {
        if end < start {
            return Err(TimelineError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse both ends from ISO strings and validate their order.
    pub fn parse(start: &str, end: &str) -> Result<Self, TimelineError> {
        Self::new(parse_iso_date(start)?, parse_iso_date(end)?)
    }

    /// First day after the interval; the half-open upper bound.
    /// Saturates at `NaiveDate::MAX`, so an interval ending on that day does not
    /// overlap itself. Four-digit ISO parsing never produces such a date.
    pub fn end_exclusive(&self) -> NaiveDate {
        self.end.succ_opt().unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}..{}]",
            format_iso_date(self.start),
            format_iso_date(self.end)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        parse_iso_date(s).unwrap()
    }

    #[test]
    fn parses_strict_iso_dates() {
        assert_eq!(d("2024-02-29"), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        for bad in ["2024-1-05", "2024/01/05", " 2024-01-05", "2023-02-29", "", "20240105", "2024-13-01"] {
            assert_eq!(
                parse_iso_date(bad),
                Err(TimelineError::InvalidDateFormat(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_inverted_interval() {
        let err = Interval::parse("2024-01-10", "2024-01-01").unwrap_err();
        assert_eq!(
            err,
            TimelineError::InvalidRange {
                start: d("2024-01-10"),
                end: d("2024-01-01"),
            }
        );
        assert!(Interval::parse("2024-01-10", "2024-01-10").is_ok());
    }

    #[test]
    fn end_exclusive_is_next_day() {
        let iv = Interval::parse("2024-12-30", "2024-12-31").unwrap();
        assert_eq!(iv.end_exclusive(), d("2025-01-01"));
        assert_eq!(iv.to_string(), "[2024-12-30..2024-12-31]");
    }
}
