//! Configuration errors shared by the holiday, swap and config modules.

use std::path::PathBuf;

use chrono::NaiveDate;

/// Raised while loading or validating calendar configuration.
///
/// All of these are reported when the configuration is built, never when a
/// date is later queried.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A date is listed both as a working weekend and as a rest day.
    #[error("{date} is listed both as a working weekend and as a rest day")]
    ContradictoryOverride { date: NaiveDate },

    /// An override date sits under a year key it does not belong to.
    #[error("override {date} is filed under year {year}")]
    YearMismatch { year: i32, date: NaiveDate },

    /// A working weekend that is not a Saturday or Sunday.
    #[error("working weekend {date} is not a Saturday or Sunday")]
    WorkingWeekendOnWeekday { date: NaiveDate },

    /// A rest day that already falls on a weekend.
    #[error("rest day {date} falls on a weekend")]
    RestDayOnWeekend { date: NaiveDate },

    /// A fixed holiday whose month/day never forms a valid date.
    #[error("fixed holiday '{name}' has invalid month/day {month}/{day}")]
    InvalidFixedHoliday { name: String, month: u32, day: u32 },

    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
