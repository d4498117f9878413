use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::SitegenError;

/// Time zone publish dates are evaluated in.
pub const DEFAULT_TIMEZONE: &str = "America/New_York";

/// Source of the calendar date used for the publish gate.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Wall clock observed in a fixed time zone.
#[derive(Debug, Clone, Copy)]
pub struct ZonedClock {
    zone: Tz,
}

impl ZonedClock {
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }

    pub fn from_name(name: &str) -> Result<Self, SitegenError> {
        Tz::from_str(name)
            .map(Self::new)
            .map_err(|_| SitegenError::Config(format!("unknown time zone '{name}'")))
    }

    /// Calendar date of `instant` in this zone.
    pub fn date_at(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.zone).date_naive()
    }
}

impl Default for ZonedClock {
    fn default() -> Self {
        Self::new(chrono_tz::America::New_York)
    }
}

impl Clock for ZonedClock {
    fn today(&self) -> NaiveDate {
        self.date_at(Utc::now())
    }
}

/// A pinned date, for reproducible runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Parses a `YYYY-MM-DD` date given on the command line or in tests.
pub fn parse_date(value: &str) -> Result<NaiveDate, SitegenError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|err| SitegenError::Config(format!("invalid date '{value}': {err}")))
}

/// Formats a date the way publish dates are written, so string comparison matches.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
