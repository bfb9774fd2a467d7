use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::ConfigError;

/// First year the Gregorian Easter computation is defined for.
pub const FIRST_GREGORIAN_YEAR: i32 = 1583;

/// A holiday on the same month/day every year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedHoliday {
    pub month: u32,
    pub day: u32,
    pub name: String,
}

/// A holiday at a fixed offset (in days) from Easter Sunday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EasterHoliday {
    pub offset_days: i64,
    pub name: String,
}

impl FixedHoliday {
    pub fn new(month: u32, day: u32, name: impl Into<String>) -> Self {
        Self {
            month,
            day,
            name: name.into(),
        }
    }

    fn in_year(&self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }
}

impl EasterHoliday {
    pub fn new(offset_days: i64, name: impl Into<String>) -> Self {
        Self {
            offset_days,
            name: name.into(),
        }
    }

    fn relative_to(&self, easter: NaiveDate) -> Option<NaiveDate> {
        let magnitude = Days::new(self.offset_days.unsigned_abs());
        if self.offset_days >= 0 {
            easter.checked_add_days(magnitude)
        } else {
            easter.checked_sub_days(magnitude)
        }
    }
}

/// Easter Sunday for `year`, using the anonymous Gregorian algorithm
/// (Meeus/Jones/Butcher). `None` before 1583.
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    if year < FIRST_GREGORIAN_YEAR {
        return None;
    }
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

/// Locale-specific public holiday rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayCalendar {
    fixed: Vec<FixedHoliday>,
    easter_relative: Vec<EasterHoliday>,
}

impl Default for HolidayCalendar {
    fn default() -> Self {
        Self::hungary()
    }
}

impl HolidayCalendar {
    /// Build a calendar, rejecting fixed holidays that can never occur
    /// (Feb 29 is accepted and simply skipped in common years).
    pub fn new(
        fixed: Vec<FixedHoliday>,
        easter_relative: Vec<EasterHoliday>,
    ) -> Result<Self, ConfigError> {
        for holiday in &fixed {
            // 2000 is a leap year, so every month/day that exists at all exists here.
            if holiday.in_year(2000).is_none() {
                return Err(ConfigError::InvalidFixedHoliday {
                    name: holiday.name.clone(),
                    month: holiday.month,
                    day: holiday.day,
                });
            }
        }
        Ok(Self {
            fixed,
            easter_relative,
        })
    }

    /// Hungarian official public holidays.
    pub fn hungary() -> Self {
        Self {
            fixed: hungarian_fixed_holidays(),
            easter_relative: hungarian_easter_holidays(),
        }
    }

    /// All public holidays of `year`, fixed and movable.
    pub fn public_holidays(&self, year: i32) -> BTreeSet<NaiveDate> {
        self.named_holidays(year)
            .into_iter()
            .map(|(date, _)| date)
            .collect()
    }

    /// Public holidays of `year` with their names, in date order.
    pub fn named_holidays(&self, year: i32) -> Vec<(NaiveDate, &str)> {
        let mut out: Vec<(NaiveDate, &str)> = self
            .fixed
            .iter()
            .filter_map(|h| h.in_year(year).map(|date| (date, h.name.as_str())))
            .collect();

        if let Some(easter) = easter_sunday(year) {
            for holiday in &self.easter_relative {
                if let Some(date) = holiday.relative_to(easter) {
                    out.push((date, holiday.name.as_str()));
                }
            }
        }

        out.sort_by_key(|(date, _)| *date);
        out.dedup_by_key(|(date, _)| *date);
        out
    }
}

pub fn hungarian_fixed_holidays() -> Vec<FixedHoliday> {
    vec![
        FixedHoliday::new(1, 1, "New Year's Day"),
        FixedHoliday::new(3, 15, "National Day"),
        FixedHoliday::new(5, 1, "Labour Day"),
        FixedHoliday::new(8, 20, "State Foundation Day"),
        FixedHoliday::new(10, 23, "1956 Memorial Day"),
        FixedHoliday::new(11, 1, "All Saints' Day"),
        FixedHoliday::new(12, 25, "Christmas Day"),
        FixedHoliday::new(12, 26, "Second Day of Christmas"),
    ]
}

pub fn hungarian_easter_holidays() -> Vec<EasterHoliday> {
    vec![
        EasterHoliday::new(-2, "Good Friday"),
        EasterHoliday::new(1, "Easter Monday"),
        EasterHoliday::new(50, "Pentecost Monday"),
    ]
}
