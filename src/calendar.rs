use chrono::{Datelike, NaiveDate};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::holidays::HolidayCalendar;
use crate::swaps::{WorkdaySwapRegistry, is_weekend};

/// Whether workday swap data exists for a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapStatus {
    Ok,
    Missing,
}

/// Which rule blocked a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    PublicHoliday,
    RestDay,
    Weekend,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockReason::PublicHoliday => write!(f, "public holiday"),
            BlockReason::RestDay => write!(f, "shifted rest day"),
            BlockReason::Weekend => write!(f, "weekend"),
        }
    }
}

/// Why a write to a date is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditRejection {
    Blocked(BlockReason),
    MonthLocked,
}

impl fmt::Display for EditRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditRejection::Blocked(reason) => write!(f, "day is not editable: {reason}"),
            EditRejection::MonthLocked => write!(
                f,
                "modifications are locked for months other than the current month"
            ),
        }
    }
}

/// Everything needed to decide whether a date of one year is blocked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearRuleSet {
    year: i32,
    public_holidays: BTreeSet<NaiveDate>,
    working_weekends: BTreeSet<NaiveDate>,
    rest_days: BTreeSet<NaiveDate>,
    swap_status: SwapStatus,
}

impl YearRuleSet {
    pub fn compute(year: i32, holidays: &HolidayCalendar, swaps: &WorkdaySwapRegistry) -> Self {
        let public_holidays = holidays.public_holidays(year);
        let (working_weekends, rest_days, swap_status) = match swaps.overrides_for(year) {
            Some(overrides) => (
                overrides.working_weekends.clone(),
                overrides.rest_days.clone(),
                SwapStatus::Ok,
            ),
            None => (BTreeSet::new(), BTreeSet::new(), SwapStatus::Missing),
        };
        Self {
            year,
            public_holidays,
            working_weekends,
            rest_days,
            swap_status,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn public_holidays(&self) -> &BTreeSet<NaiveDate> {
        &self.public_holidays
    }

    pub fn working_weekends(&self) -> &BTreeSet<NaiveDate> {
        &self.working_weekends
    }

    pub fn rest_days(&self) -> &BTreeSet<NaiveDate> {
        &self.rest_days
    }

    pub fn swap_status(&self) -> SwapStatus {
        self.swap_status
    }

    /// The rule that blocks `date`, checked in precedence order. A working
    /// weekend only lifts the weekend rule, never a holiday or rest day.
    pub fn block_reason(&self, date: NaiveDate) -> Option<BlockReason> {
        if self.public_holidays.contains(&date) {
            Some(BlockReason::PublicHoliday)
        } else if self.rest_days.contains(&date) {
            Some(BlockReason::RestDay)
        } else if is_weekend(date) && !self.working_weekends.contains(&date) {
            Some(BlockReason::Weekend)
        } else {
            None
        }
    }

    pub fn is_blocked(&self, date: NaiveDate) -> bool {
        self.block_reason(date).is_some()
    }
}

/// Answers "is this date editable?" with per-year memoized rule sets.
#[derive(Debug)]
pub struct RuleEngine {
    holidays: RwLock<HolidayCalendar>,
    swaps: RwLock<WorkdaySwapRegistry>,
    cache: RwLock<HashMap<i32, Arc<YearRuleSet>>>,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(HolidayCalendar::hungary(), WorkdaySwapRegistry::hungary())
    }
}

impl RuleEngine {
    pub fn new(holidays: HolidayCalendar, swaps: WorkdaySwapRegistry) -> Self {
        Self {
            holidays: RwLock::new(holidays),
            swaps: RwLock::new(swaps),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Public holidays of `year` with their display names.
    pub fn named_holidays(&self, year: i32) -> Vec<(NaiveDate, String)> {
        self.holidays
            .read()
            .named_holidays(year)
            .into_iter()
            .map(|(date, name)| (date, name.to_string()))
            .collect()
    }

    /// Swap the override table and drop every memoized rule set.
    pub fn replace_overrides(&self, swaps: WorkdaySwapRegistry) {
        let mut current = self.swaps.write();
        let mut cache = self.cache.write();
        *current = swaps;
        cache.clear();
        debug!("workday swap table replaced, rule cache invalidated");
    }

    /// Replace both holiday rules and overrides, dropping the cache.
    pub fn reconfigure(&self, holidays: HolidayCalendar, swaps: WorkdaySwapRegistry) {
        let mut current_holidays = self.holidays.write();
        let mut current_swaps = self.swaps.write();
        let mut cache = self.cache.write();
        *current_holidays = holidays;
        *current_swaps = swaps;
        cache.clear();
        debug!("calendar rules replaced, rule cache invalidated");
    }

    pub fn rule_set_for(&self, year: i32) -> Arc<YearRuleSet> {
        if let Some(rules) = self.cache.read().get(&year) {
            return Arc::clone(rules);
        }

        // Lock order: holidays, swaps, cache. Held until the insert.
        let holidays = self.holidays.read();
        let swaps = self.swaps.read();
        let computed = YearRuleSet::compute(year, &holidays, &swaps);
        debug!(
            year,
            holidays = computed.public_holidays.len(),
            "computed rule set"
        );
        if computed.swap_status == SwapStatus::Missing {
            warn!(year, "no workday swap data configured for year");
        }

        let mut cache = self.cache.write();
        let entry = cache.entry(year).or_insert_with(|| Arc::new(computed));
        Arc::clone(entry)
    }

    pub fn block_reason(&self, date: NaiveDate) -> Option<BlockReason> {
        self.rule_set_for(date.year()).block_reason(date)
    }

    pub fn is_blocked(&self, date: NaiveDate) -> bool {
        self.block_reason(date).is_some()
    }

    /// Write-time gate: the rule check plus, when `lock_past_months` is set,
    /// the requirement that `date` lies in the same month as `today`.
    pub fn check_editable(
        &self,
        date: NaiveDate,
        today: NaiveDate,
        lock_past_months: bool,
    ) -> Result<(), EditRejection> {
        if let Some(reason) = self.block_reason(date) {
            return Err(EditRejection::Blocked(reason));
        }
        if lock_past_months && (date.year(), date.month()) != (today.year(), today.month()) {
            return Err(EditRejection::MonthLocked);
        }
        Ok(())
    }

    pub fn is_editable(&self, date: NaiveDate, today: NaiveDate, lock_past_months: bool) -> bool {
        self.check_editable(date, today, lock_past_months).is_ok()
    }

    /// Unblocked days with `start <= day <= end`, in order.
    pub fn working_days_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        start
            .iter_days()
            .take_while(|d| *d <= end)
            .filter(|d| !self.is_blocked(*d))
            .collect()
    }
}
