//! Calendar dates from the spreadsheet turned into IIIF `navDate` values.
//!
//! Cells arrive as free text (`1968-03-04`, `1968-03-04 00:00:00`, blanks,
//! typos). Only the leading `YYYY-MM-DD` is significant; anything that does
//! not parse degrades to "no date" rather than an error.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;

const DATE_PREFIX_CHARS: usize = 10;

#[derive(Debug, Clone, Copy)]
pub struct DateNormalizer {
    tz: Tz,
}

impl DateNormalizer {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Local midnight of the cell's calendar date as an ISO-8601 instant with
    /// UTC offset, or `None` when the cell is blank or not a date.
    pub fn nav_date(&self, raw: Option<&str>) -> Option<String> {
        let date = parse_calendar_date(raw?)?;
        let midnight = self.local_midnight(date)?;
        Some(format_instant(&midnight))
    }

    fn local_midnight(&self, date: NaiveDate) -> Option<DateTime<Tz>> {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        self.tz
            .from_local_datetime(&midnight)
            .earliest()
            .or_else(|| self.after_gap(midnight))
    }

    // Midnight fell inside a DST gap: take the first local time that exists.
    fn after_gap(&self, midnight: NaiveDateTime) -> Option<DateTime<Tz>> {
        (1..=24 * 4)
            .map(|quarters| midnight + Duration::minutes(15 * quarters))
            .find_map(|candidate| self.tz.from_local_datetime(&candidate).earliest())
    }
}

/// First ten characters of a cell, or an empty string when it is missing.
pub fn date_prefix(raw: Option<&str>) -> String {
    raw.map(|value| value.chars().take(DATE_PREFIX_CHARS).collect())
        .unwrap_or_default()
}

/// Parses the same ten characters [`date_prefix`] reports, untrimmed.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    if raw.trim().is_empty() {
        return None;
    }
    let prefix = date_prefix(Some(raw));
    NaiveDate::parse_from_str(&prefix, "%Y-%m-%d").ok()
}

fn format_instant(instant: &DateTime<Tz>) -> String {
    let offset = instant.offset().fix().local_minus_utc();
    if offset % 60 == 0 {
        instant.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
    } else {
        // Historic mean-time offsets carry seconds.
        instant.format("%Y-%m-%dT%H:%M:%S%::z").to_string()
    }
}
