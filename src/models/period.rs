//! Month-granularity billing periods.
//!
//! Periods cross the HTTP boundary as `MM-YYYY` text and are stored as the
//! first instant (UTC) of the month they name.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

static PERIOD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})-(\d{4})$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("period {0:?} does not match MM-YYYY")]
    InvalidFormat(String),

    #[error("month {0} is outside 01-12")]
    MonthOutOfRange(u32),
}

/// A calendar year + month pair, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthPeriod {
    year: i32,
    month: u32,
}

impl MonthPeriod {
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::MonthOutOfRange(month));
        }
        Ok(Self { year, month })
    }

    /// Truncates an instant to the month it falls in.
    pub fn from_instant(instant: DateTime<Utc>) -> Self {
        Self {
            year: instant.year(),
            month: instant.month(),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        // month is always 1..=12, so day 1 exists
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap()
    }

    /// `YYYY-MM-01T00:00:00Z`
    pub fn start_instant(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.first_day().and_time(NaiveTime::MIN))
    }

    /// Latest instant still inside this month, one microsecond before the next
    /// month starts. Microseconds match the precision Postgres keeps.
    pub fn end_of_month(&self) -> DateTime<Utc> {
        self.next().start_instant() - Duration::microseconds(1)
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl FromStr for MonthPeriod {
    type Err = PeriodError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let caps = PERIOD_PATTERN
            .captures(text)
            .ok_or_else(|| PeriodError::InvalidFormat(text.to_string()))?;
        let month: u32 = caps[1]
            .parse()
            .map_err(|_| PeriodError::InvalidFormat(text.to_string()))?;
        let year: i32 = caps[2]
            .parse()
            .map_err(|_| PeriodError::InvalidFormat(text.to_string()))?;
        Self::new(year, month)
    }
}

impl fmt::Display for MonthPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:04}", self.month, self.year)
    }
}

/// Parses strict `MM-YYYY` text into a month value.
pub fn normalize_period(text: &str) -> Result<MonthPeriod, PeriodError> {
    text.parse()
}

pub fn end_of_month(period: MonthPeriod) -> DateTime<Utc> {
    period.end_of_month()
}

/// End of a subscription's active range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndPeriod {
    /// Still active, with no scheduled end.
    #[default]
    Unbounded,
    BoundedAt(MonthPeriod),
}

impl EndPeriod {
    pub fn as_period(&self) -> Option<MonthPeriod> {
        match self {
            EndPeriod::Unbounded => None,
            EndPeriod::BoundedAt(period) => Some(*period),
        }
    }

    /// True when the subscription is still running at or after `instant`.
    pub fn reaches(&self, instant: DateTime<Utc>) -> bool {
        match self {
            EndPeriod::Unbounded => true,
            EndPeriod::BoundedAt(period) => period.start_instant() >= instant,
        }
    }
}

impl From<Option<MonthPeriod>> for EndPeriod {
    fn from(period: Option<MonthPeriod>) -> Self {
        match period {
            Some(p) => EndPeriod::BoundedAt(p),
            None => EndPeriod::Unbounded,
        }
    }
}

/// Closed `[start, end]` instant range covered by a summary query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BillingWindow {
    /// From the first instant of `from` to the last instant of `to`. An inverted
    /// pair yields an empty window rather than an error.
    pub fn between(from: MonthPeriod, to: MonthPeriod) -> Self {
        Self {
            start: from.start_instant(),
            end: to.end_of_month(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_period_round_trip() {
        for text in ["01-2024", "02-2024", "09-1999", "12-2030", "07-0001"] {
            let period = normalize_period(text).unwrap();
            assert_eq!(period.to_string(), text);
            assert_eq!(normalize_period(&period.to_string()).unwrap(), period);
        }
    }

    #[test]
    fn test_normalize_period_rejects_bad_input() {
        for text in [
            "13-2024", "00-2024", "2024-01", "", "1-2024", "01-24", "01/2024", " 01-2024",
            "01-2024 ", "ab-2024",
        ] {
            assert!(normalize_period(text).is_err(), "{text:?} should be rejected");
        }
        assert_eq!(
            normalize_period("13-2024"),
            Err(PeriodError::MonthOutOfRange(13))
        );
        assert_eq!(
            normalize_period("2024-01"),
            Err(PeriodError::InvalidFormat("2024-01".to_string()))
        );
    }

    #[test]
    fn test_start_instant_is_first_of_month() {
        let period = normalize_period("03-2024").unwrap();
        assert_eq!(
            period.start_instant(),
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(MonthPeriod::from_instant(period.start_instant()), period);
    }

    #[test]
    fn test_end_of_month() {
        let feb = normalize_period("02-2024").unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap() - Duration::microseconds(1);
        assert_eq!(end_of_month(feb), expected);
        assert_eq!(MonthPeriod::from_instant(end_of_month(feb)), feb);

        let dec = normalize_period("12-2024").unwrap();
        assert_eq!(
            dec.end_of_month(),
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() - Duration::microseconds(1)
        );
    }

    #[test]
    fn test_from_instant_truncates_to_month() {
        let instant = Utc.with_ymd_and_hms(2025, 7, 19, 13, 45, 2).unwrap();
        assert_eq!(MonthPeriod::from_instant(instant), MonthPeriod::new(2025, 7).unwrap());
    }

    #[test]
    fn test_ordering_is_chronological() {
        let a = MonthPeriod::new(2023, 12).unwrap();
        let b = MonthPeriod::new(2024, 1).unwrap();
        assert!(a < b);
        assert_eq!(a.next(), b);
    }

    #[test]
    fn test_end_period_reaches() {
        let window_start = normalize_period("02-2024").unwrap().start_instant();
        assert!(EndPeriod::Unbounded.reaches(window_start));
        assert!(EndPeriod::BoundedAt(normalize_period("02-2024").unwrap()).reaches(window_start));
        assert!(!EndPeriod::BoundedAt(normalize_period("01-2024").unwrap()).reaches(window_start));
        assert_eq!(EndPeriod::from(None), EndPeriod::Unbounded);
    }

    #[test]
    fn test_inverted_window_is_empty() {
        let window = BillingWindow::between(
            normalize_period("05-2024").unwrap(),
            normalize_period("03-2024").unwrap(),
        );
        assert!(window.end < window.start);
    }
}
