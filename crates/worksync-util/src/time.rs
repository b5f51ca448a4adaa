//! Time utilities for worksync
//!
//! Check-in dates and aggregation windows both come from [`now`], so they
//! agree on the local calendar.
//!
//! # Mock time
//!
//! Debug builds honour `WORKSYNC_MOCK_TIME="YYYY-MM-DD HH:MM:SS"`. The
//! difference from the real clock is captured once per process, so mocked
//! time keeps ticking:
//!
//! ```bash
//! WORKSYNC_MOCK_TIME="2025-12-31 23:58:00" worksync check-in
//! ```

use chrono::{
    DateTime, Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Weekday,
};
use std::sync::OnceLock;

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "WORKSYNC_MOCK_TIME";

const MOCK_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static MOCK_TIME_OFFSET: OnceLock<Option<chrono::Duration>> = OnceLock::new();

fn parse_mock_time(value: &str) -> Option<DateTime<Local>> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), MOCK_TIME_FORMAT).ok()?;
    Local.from_local_datetime(&naive).single()
}

#[allow(clippy::disallowed_methods)] // wraps Local::now()
fn mock_time_offset() -> Option<chrono::Duration> {
    *MOCK_TIME_OFFSET.get_or_init(|| {
        if !cfg!(debug_assertions) {
            return None;
        }
        let value = std::env::var(MOCK_TIME_ENV_VAR).ok()?;

        match parse_mock_time(&value) {
            Some(mock) => {
                let offset = mock.signed_duration_since(Local::now());
                tracing::info!(mock_time = %value, offset_secs = offset.num_seconds(), "Mock time enabled");
                Some(offset)
            }
            None => {
                tracing::warn!(mock_time = %value, expected_format = MOCK_TIME_FORMAT, "Ignoring unparseable mock time");
                None
            }
        }
    })
}

pub fn is_mock_time_active() -> bool {
    mock_time_offset().is_some()
}

/// Current local time, shifted by the mock offset when one is active
#[allow(clippy::disallowed_methods)] // wraps Local::now()
pub fn now() -> DateTime<Local> {
    let real = Local::now();
    match mock_time_offset() {
        Some(offset) => real + offset,
        None => real,
    }
}

/// Saturday or Sunday
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Format a DateTime as a short clock time (`HH:MM`).
pub fn format_clock_time(dt: &DateTime<Local>) -> String {
    dt.format("%H:%M").to_string()
}

/// Format a minute count as `Xh YYm`.
pub fn format_minutes(minutes: u32) -> String {
    format!("{}h {:02}m", minutes / 60, minutes % 60)
}

/// Wall-clock time of day, minute resolution.
///
/// Every constructor keeps `hour < 24` and `minute < 60`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallClock {
    hour: u8,
    minute: u8,
}

impl WallClock {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn to_naive_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour as u32, self.minute as u32, 0).unwrap_or(NaiveTime::MIN)
    }

    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }

    /// Returns minutes since midnight
    pub fn as_minutes_from_midnight(&self) -> u32 {
        (self.hour as u32) * 60 + (self.minute as u32)
    }

    /// Build a wall clock from minutes since midnight (wraps at 24h)
    pub fn from_minutes_from_midnight(minutes: u32) -> Self {
        let minutes = minutes % (24 * 60);
        Self {
            hour: (minutes / 60) as u8,
            minute: (minutes % 60) as u8,
        }
    }

    /// Resolve this wall-clock time on a given local calendar date.
    ///
    /// Returns `None` when the time does not exist on that date (DST gap).
    pub fn on_date(self, date: NaiveDate) -> Option<DateTime<Local>> {
        Local
            .from_local_datetime(&date.and_time(self.to_naive_time()))
            .earliest()
    }
}

impl PartialOrd for WallClock {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WallClock {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_minutes_from_midnight()
            .cmp(&other.as_minutes_from_midnight())
    }
}
