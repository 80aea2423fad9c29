//! Trailing windows and date parsing

use analyst_core::{Error, Result};
use chrono::{DateTime, Days, Months, NaiveDate, NaiveDateTime};
use std::fmt;

/// Date format accepted from the model and rendered back to it
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Lookback of the macro indicator window, in calendar years
pub const MACRO_LOOKBACK_YEARS: u32 = 3;

/// Lookback of the sentiment news window, in days
pub const SENTIMENT_LOOKBACK_DAYS: u64 = 7;

/// Closed date range `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailingWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TrailingWindow {
    /// Window ending at `anchor` and reaching back `years` calendar years
    ///
    /// Month-end dates clamp the way calendar arithmetic does: 2024-02-29
    /// minus one year is 2023-02-28.
    pub fn years(anchor: NaiveDate, years: u32) -> Result<Self> {
        let start = anchor
            .checked_sub_months(Months::new(years * 12))
            .ok_or_else(|| Error::MalformedInput(format!("{anchor} minus {years} years is out of range")))?;
        Ok(Self { start, end: anchor })
    }

    /// Window ending at `anchor` and reaching back `days` days
    pub fn days(anchor: NaiveDate, days: u64) -> Result<Self> {
        let start = anchor
            .checked_sub_days(Days::new(days))
            .ok_or_else(|| Error::MalformedInput(format!("{anchor} minus {days} days is out of range")))?;
        Ok(Self { start, end: anchor })
    }

    /// Explicit bounds; `start` after `end` is rejected
    pub fn between(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::MalformedInput(format!(
                "start_date {start} is after end_date {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Whether `date` falls inside the window, both bounds inclusive
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for TrailingWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

/// Parse a `YYYY-MM-DD` argument
///
/// `field` names the argument in the error, so the model knows what to fix.
pub fn parse_date(raw: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| Error::MalformedInput(format!("{field} must be in YYYY-mm-dd format, got '{raw}'")))
}

/// Parse an anchor that may carry a time of day, keeping only the date
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS[.f]`, the same with a space
/// separator, and RFC 3339 timestamps.
pub fn parse_anchor(raw: &str, field: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        return Ok(date);
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(stamp.date());
        }
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(stamp.date_naive());
    }
    Err(Error::MalformedInput(format!(
        "{field} must be an ISO date (YYYY-mm-dd), got '{raw}'"
    )))
}

/// Seven-day window ending at `anchor`, fed to the news capability
pub fn sentiment_window(anchor: NaiveDate) -> Result<TrailingWindow> {
    TrailingWindow::days(anchor, SENTIMENT_LOOKBACK_DAYS)
}

/// [`sentiment_window`] for a raw anchor string
pub fn derive_sentiment_window(anchor: &str) -> Result<TrailingWindow> {
    sentiment_window(parse_anchor(anchor, "curr_date")?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_three_calendar_years() {
        let window = TrailingWindow::years(date("2024-06-15"), 3).unwrap();
        assert_eq!(window.start, date("2021-06-15"));
        assert_eq!(window.end, date("2024-06-15"));
        assert_eq!(window.to_string(), "2021-06-15 to 2024-06-15");

        // 1095 days back would land on 2021-06-16 because of 2024-02-29
        let by_days = TrailingWindow::days(date("2024-06-15"), 1095).unwrap();
        assert_eq!(by_days.start, date("2021-06-16"));
        assert_ne!(by_days.start, window.start);
    }

    #[test]
    fn test_leap_day_clamps() {
        let window = TrailingWindow::years(date("2024-02-29"), 3).unwrap();
        assert_eq!(window.start, date("2021-02-28"));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let window = TrailingWindow::days(date("2024-06-15"), 7).unwrap();
        assert!(window.contains(date("2024-06-08")));
        assert!(window.contains(date("2024-06-15")));
        assert!(!window.contains(date("2024-06-07")));
        assert!(!window.contains(date("2024-06-16")));
    }

    #[test]
    fn test_sentiment_window() {
        let window = derive_sentiment_window("2024-06-15").unwrap();
        assert_eq!(window.start.to_string(), "2024-06-08");
        assert_eq!(window.end.to_string(), "2024-06-15");

        let window = derive_sentiment_window("2024-06-15T09:30:00").unwrap();
        assert_eq!(window.start.to_string(), "2024-06-08");

        let window = derive_sentiment_window("2024-03-03").unwrap();
        assert_eq!(window.start.to_string(), "2024-02-25");
    }

    #[test]
    fn test_malformed_dates() {
        for raw in ["2024/01/01", "not-a-date", "", "2024-13-01"] {
            let err = parse_date(raw, "curr_date").unwrap_err();
            assert!(matches!(err, Error::MalformedInput(_)), "{raw}");
        }
        assert!(derive_sentiment_window("yesterday").is_err());
    }

    #[test]
    fn test_between_rejects_inverted_range() {
        let err = TrailingWindow::between(date("2024-06-15"), date("2024-06-01")).unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
        assert!(TrailingWindow::between(date("2024-06-15"), date("2024-06-15")).is_ok());
    }
}
