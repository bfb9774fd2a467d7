use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::error;

use crate::error::ConfigError;

/// Workday swap overrides for a single year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearOverrides {
    /// Saturdays/Sundays that are working days.
    #[serde(default)]
    pub working_weekends: BTreeSet<NaiveDate>,
    /// Weekdays that are days off.
    #[serde(default)]
    pub rest_days: BTreeSet<NaiveDate>,
}

impl YearOverrides {
    pub fn new<I, J>(working_weekends: I, rest_days: J) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
        J: IntoIterator<Item = NaiveDate>,
    {
        Self {
            working_weekends: working_weekends.into_iter().collect(),
            rest_days: rest_days.into_iter().collect(),
        }
    }

    fn validate(&self, year: i32) -> Result<(), ConfigError> {
        for &date in self.working_weekends.iter().chain(&self.rest_days) {
            if date.year() != year {
                return Err(ConfigError::YearMismatch { year, date });
            }
        }
        if let Some(&date) = self.working_weekends.intersection(&self.rest_days).next() {
            return Err(ConfigError::ContradictoryOverride { date });
        }
        if let Some(&date) = self.working_weekends.iter().find(|d| !is_weekend(**d)) {
            return Err(ConfigError::WorkingWeekendOnWeekday { date });
        }
        if let Some(&date) = self.rest_days.iter().find(|d| is_weekend(**d)) {
            return Err(ConfigError::RestDayOnWeekend { date });
        }
        Ok(())
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Per-year table of working weekends and shifted rest days.
///
/// The table is configuration, not computed. Every year in it has been
/// validated, so a registry value is always internally consistent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkdaySwapRegistry {
    years: BTreeMap<i32, YearOverrides>,
}

impl WorkdaySwapRegistry {
    pub fn new(years: BTreeMap<i32, YearOverrides>) -> Result<Self, ConfigError> {
        for (year, overrides) in &years {
            overrides.validate(*year)?;
        }
        Ok(Self { years })
    }

    /// Hungarian workday swaps as published for 2025 and 2026.
    pub fn hungary() -> Self {
        Self::new(hungarian_workday_swaps()).unwrap_or_else(|err| {
            error!(%err, "built-in workday swap table failed validation");
            Self::default()
        })
    }

    /// `None` means no data has been configured for `year`.
    pub fn overrides_for(&self, year: i32) -> Option<&YearOverrides> {
        self.years.get(&year)
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.keys().copied()
    }

    pub fn table(&self) -> &BTreeMap<i32, YearOverrides> {
        &self.years
    }
}

/// Only used in `const` items, so a bad date fails the build.
const fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid date in the built-in workday swap table"),
    }
}

const HU_2025_WORKING: [NaiveDate; 3] = [ymd(2025, 5, 17), ymd(2025, 10, 18), ymd(2025, 12, 13)];
const HU_2025_REST: [NaiveDate; 3] = [ymd(2025, 5, 2), ymd(2025, 10, 24), ymd(2025, 12, 24)];
const HU_2026_WORKING: [NaiveDate; 3] = [ymd(2026, 1, 10), ymd(2026, 8, 8), ymd(2026, 12, 12)];
const HU_2026_REST: [NaiveDate; 3] = [ymd(2026, 1, 2), ymd(2026, 8, 21), ymd(2026, 12, 24)];

pub fn hungarian_workday_swaps() -> BTreeMap<i32, YearOverrides> {
    BTreeMap::from([
        (2025, YearOverrides::new(HU_2025_WORKING, HU_2025_REST)),
        (2026, YearOverrides::new(HU_2026_WORKING, HU_2026_REST)),
    ])
}
