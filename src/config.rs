use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::calendar::RuleEngine;
use crate::error::ConfigError;
use crate::holidays::{
    EasterHoliday, FixedHoliday, HolidayCalendar, hungarian_easter_holidays,
    hungarian_fixed_holidays,
};
use crate::swaps::{WorkdaySwapRegistry, YearOverrides, hungarian_workday_swaps};

/// The single configuration surface of the calendar: locale holidays, the
/// workday swap table and the past-month lock.
///
/// Every field has a default (Hungarian locale, lock off), so `{}` is a valid
/// configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalendarConfig {
    #[serde(default = "hungarian_fixed_holidays")]
    pub fixed_holidays: Vec<FixedHoliday>,

    #[serde(default = "hungarian_easter_holidays")]
    pub easter_holidays: Vec<EasterHoliday>,

    /// Year → overrides. Years missing here report `swap_status = missing`.
    #[serde(default = "hungarian_workday_swaps")]
    pub workday_swaps: BTreeMap<i32, YearOverrides>,

    /// Only allow writes inside the current month.
    #[serde(default)]
    pub lock_past_months: bool,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            fixed_holidays: hungarian_fixed_holidays(),
            easter_holidays: hungarian_easter_holidays(),
            workday_swaps: hungarian_workday_swaps(),
            lock_past_months: false,
        }
    }
}

impl CalendarConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load and validate a JSON config file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        info!(path = %path.display(), years = config.workday_swaps.len(), "loaded calendar config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.holiday_calendar()?;
        self.swap_registry()?;
        Ok(())
    }

    pub fn holiday_calendar(&self) -> Result<HolidayCalendar, ConfigError> {
        HolidayCalendar::new(self.fixed_holidays.clone(), self.easter_holidays.clone())
    }

    pub fn swap_registry(&self) -> Result<WorkdaySwapRegistry, ConfigError> {
        WorkdaySwapRegistry::new(self.workday_swaps.clone())
    }

    pub fn build_engine(&self) -> Result<RuleEngine, ConfigError> {
        Ok(RuleEngine::new(
            self.holiday_calendar()?,
            self.swap_registry()?,
        ))
    }
}

/// Environment variable that pins "today" for the binaries.
pub const TODAY_ENV: &str = "ATTENDANCE_CALENDAR_TODAY";

/// The pinned date from [`TODAY_ENV`], if set and valid.
pub fn today_override() -> Option<NaiveDate> {
    std::env::var(TODAY_ENV)
        .ok()
        .and_then(|raw| parse_today(&raw))
}

fn parse_today(raw: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(err) => {
            warn!(value = raw, %err, "ignoring invalid ATTENDANCE_CALENDAR_TODAY");
            None
        }
    }
}
