//! Common utilities shared across the outage-watch crates.
//!
//! This crate is intentionally small so every other crate can depend on it:
//!
//! - [`observability`]: centralised tracing/logging initialisation
//! - [`datestamp`]: the `DDMonYYYY` stamp used in every file the batch writes
//!
//! # Examples
//!
//! ```rust
//! use chrono::{Local, TimeZone};
//!
//! let when = Local.with_ymd_and_hms(2023, 1, 5, 9, 30, 0).unwrap();
//! assert_eq!(outage_common::datestamp(&when), "05Jan2023");
//! ```
use chrono::{DateTime, TimeZone};
use std::fmt::Display;

pub mod observability;

/// Format string for [`datestamp`]: zero-padded day, abbreviated month, full year.
pub const DATESTAMP_FORMAT: &str = "%d%b%Y";

/// Render the day-level stamp (`19Oct2026`) used in audit and workbook file names.
pub fn datestamp<Tz>(when: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    when.format(DATESTAMP_FORMAT).to_string()
}

/// Stamp for the current local day.
pub fn today_stamp() -> String {
    datestamp(&chrono::Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn stamp_pads_day_and_abbreviates_month() {
        let when = Utc.with_ymd_and_hms(2026, 10, 9, 23, 59, 59).unwrap();
        assert_eq!(datestamp(&when), "09Oct2026");
    }

    #[test]
    fn today_stamp_has_fixed_width() {
        assert_eq!(today_stamp().len(), 9);
    }
}
