use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::calendar::RuleEngine;
use crate::day_state::DayState;

/// Office share (percent) the office-presence policy asks for.
pub const OFFICE_TARGET_PERCENT: u32 = 60;

/// Period a statistic is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsScope {
    Month { year: i32, month: u32 },
    Year { year: i32 },
}

impl StatsScope {
    /// `None` if the month is out of range.
    pub fn month(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| StatsScope::Month { year, month })
    }

    pub fn year(year: i32) -> Self {
        StatsScope::Year { year }
    }

    /// First and last day of the scope, or `None` outside chrono's range.
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match *self {
            StatsScope::Month { year, month } => {
                let first = NaiveDate::from_ymd_opt(year, month, 1)?;
                Some((first, last_day_of_month(first)?))
            }
            StatsScope::Year { year } => Some((
                NaiveDate::from_ymd_opt(year, 1, 1)?,
                NaiveDate::from_ymd_opt(year, 12, 31)?,
            )),
        }
    }
}

fn last_day_of_month(first: NaiveDate) -> Option<NaiveDate> {
    let next = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)?
    };
    next.pred_opt()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResult {
    /// Office share of working days, whole percent.
    pub office: u32,
    /// Home share of working days, whole percent.
    pub home: u32,
    pub total_working_days: u32,
    pub office_days: u32,
    pub home_days: u32,
    pub day_off_days: u32,
}

impl StatsResult {
    pub fn meets_office_target(&self) -> bool {
        self.total_working_days > 0 && self.office >= OFFICE_TARGET_PERCENT
    }
}

/// `100 * count / total` rounded half-up; 0 when `total` is 0.
pub fn rounded_percentage(count: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let count = u64::from(count);
    let total = u64::from(total);
    ((200 * count + total) / (2 * total)) as u32
}

/// Aggregate `records` over `scope`.
///
/// The denominator is the number of unblocked days in the scope, whatever
/// (if anything) was recorded for them. Records on blocked days or outside
/// the scope are ignored.
pub fn compute_stats(
    engine: &RuleEngine,
    records: &BTreeMap<NaiveDate, DayState>,
    scope: StatsScope,
) -> StatsResult {
    let Some((start, end)) = scope.bounds() else {
        return StatsResult::default();
    };

    let mut result = StatsResult::default();
    for date in engine.working_days_in_range(start, end) {
        result.total_working_days += 1;
        match records.get(&date).copied().unwrap_or_default() {
            DayState::Office => result.office_days += 1,
            DayState::Home => result.home_days += 1,
            DayState::DayOff => result.day_off_days += 1,
            DayState::Empty => {}
        }
    }

    result.office = rounded_percentage(result.office_days, result.total_working_days);
    result.home = rounded_percentage(result.home_days, result.total_working_days);
    result
}
