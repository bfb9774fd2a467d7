use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::calendar::{EditRejection, RuleEngine, SwapStatus};
use crate::config::CalendarConfig;
use crate::day_state::DayState;
use crate::error::ConfigError;
use crate::holidays::FIRST_GREGORIAN_YEAR;
use crate::persistence::{DayRecords, DayStateStore, MemoryDayStateStore, PersistenceError};
use crate::stats::{StatsResult, StatsScope, compute_stats};

pub const MIN_YEAR: i32 = FIRST_GREGORIAN_YEAR;
pub const MAX_YEAR: i32 = 9999;

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("year {0} is outside the supported range 1583..=9999")]
    YearOutOfRange(i32),
    #[error("month {0} is not between 1 and 12")]
    InvalidMonth(u32),
    #[error("{0}")]
    Rejected(EditRejection),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

pub type TrackerResult<T> = Result<T, TrackerError>;

pub fn validate_year(year: i32) -> TrackerResult<i32> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(year)
    } else {
        Err(TrackerError::YearOutOfRange(year))
    }
}

pub fn validate_month(month: u32) -> TrackerResult<u32> {
    if (1..=12).contains(&month) {
        Ok(month)
    } else {
        Err(TrackerError::InvalidMonth(month))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedHoliday {
    pub date: NaiveDate,
    pub name: String,
}

/// Rule set of one year in the shape clients cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRules {
    pub year: i32,
    pub public_holidays: Vec<NaiveDate>,
    pub working_weekends: Vec<NaiveDate>,
    pub rest_days: Vec<NaiveDate>,
    pub swap_status: SwapStatus,
    pub holidays: Vec<NamedHoliday>,
}

/// Recorded states of one month keyed by day of month; unset days are `empty`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthStates {
    pub year: i32,
    pub month: u32,
    pub days: BTreeMap<u32, DayState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsReport {
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(flatten)]
    pub stats: StatsResult,
    pub meets_office_target: bool,
}

/// Rule engine, day-state store and past-month lock behind one facade.
pub struct AttendanceCalendar {
    engine: RuleEngine,
    store: Box<dyn DayStateStore>,
    lock_past_months: bool,
}

impl AttendanceCalendar {
    pub fn new(engine: RuleEngine, store: Box<dyn DayStateStore>, lock_past_months: bool) -> Self {
        Self {
            engine,
            store,
            lock_past_months,
        }
    }

    pub fn from_config(
        config: &CalendarConfig,
        store: Box<dyn DayStateStore>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(
            config.build_engine()?,
            store,
            config.lock_past_months,
        ))
    }

    /// Default rules with an in-memory store.
    pub fn in_memory() -> Self {
        Self::new(
            RuleEngine::default(),
            Box::new(MemoryDayStateStore::new()),
            false,
        )
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    pub fn lock_past_months(&self) -> bool {
        self.lock_past_months
    }

    pub fn set_lock_past_months(&mut self, locked: bool) {
        self.lock_past_months = locked;
    }

    /// Apply a new configuration without touching stored states.
    pub fn reload_config(&mut self, config: &CalendarConfig) -> Result<(), ConfigError> {
        let holidays = config.holiday_calendar()?;
        let swaps = config.swap_registry()?;
        self.engine.reconfigure(holidays, swaps);
        self.lock_past_months = config.lock_past_months;
        info!(lock_past_months = self.lock_past_months, "calendar configuration reloaded");
        Ok(())
    }

    pub fn year_rules(&self, year: i32) -> TrackerResult<YearRules> {
        let year = validate_year(year)?;
        let rules = self.engine.rule_set_for(year);
        let holidays = self
            .engine
            .named_holidays(year)
            .into_iter()
            .map(|(date, name)| NamedHoliday { date, name })
            .collect();
        Ok(YearRules {
            year,
            public_holidays: rules.public_holidays().iter().copied().collect(),
            working_weekends: rules.working_weekends().iter().copied().collect(),
            rest_days: rules.rest_days().iter().copied().collect(),
            swap_status: rules.swap_status(),
            holidays,
        })
    }

    pub fn stats(&self, year: i32, month: Option<u32>) -> TrackerResult<StatsReport> {
        let year = validate_year(year)?;
        let scope = match month {
            Some(month) => StatsScope::Month {
                year,
                month: validate_month(month)?,
            },
            None => StatsScope::year(year),
        };
        let records = match scope.bounds() {
            Some((start, end)) => self.store.load_range(start, end)?,
            None => DayRecords::new(),
        };
        let stats = compute_stats(&self.engine, &records, scope);
        Ok(StatsReport {
            year,
            month,
            stats,
            meets_office_target: stats.meets_office_target(),
        })
    }

    pub fn month_states(&self, year: i32, month: u32) -> TrackerResult<MonthStates> {
        let year = validate_year(year)?;
        let month = validate_month(month)?;
        let (start, end) = StatsScope::Month { year, month }
            .bounds()
            .ok_or(TrackerError::InvalidMonth(month))?;
        let records = self.store.load_range(start, end)?;
        let days = start
            .iter_days()
            .take_while(|d| *d <= end)
            .map(|d| (d.day(), records.get(&d).copied().unwrap_or_default()))
            .collect();
        Ok(MonthStates { year, month, days })
    }

    pub fn check_editable(&self, date: NaiveDate, today: NaiveDate) -> Result<(), EditRejection> {
        self.engine
            .check_editable(date, today, self.lock_past_months)
    }

    pub fn is_date_editable(&self, date: NaiveDate, today: NaiveDate) -> bool {
        self.check_editable(date, today).is_ok()
    }

    fn gate(&self, date: NaiveDate, today: NaiveDate) -> TrackerResult<()> {
        validate_year(date.year())?;
        self.check_editable(date, today).map_err(|rejection| {
            warn!(%date, %rejection, "rejected day state change");
            TrackerError::Rejected(rejection)
        })
    }

    pub fn day_state(&self, date: NaiveDate) -> TrackerResult<DayState> {
        validate_year(date.year())?;
        Ok(self.store.get_state(date)?)
    }

    /// Store `state` for `date` if the date passes the write gate.
    pub fn set_day_state(
        &self,
        date: NaiveDate,
        state: DayState,
        today: NaiveDate,
    ) -> TrackerResult<DayState> {
        self.gate(date, today)?;
        self.store.set_state(date, state)?;
        Ok(state)
    }

    /// Advance `date` one step through the state cycle.
    pub fn cycle_day_state(&self, date: NaiveDate, today: NaiveDate) -> TrackerResult<DayState> {
        self.gate(date, today)?;
        Ok(self.store.cycle_state(date)?)
    }

    pub fn export_records(&self) -> TrackerResult<DayRecords> {
        Ok(self.store.load_all()?)
    }

    /// Restore records as-is; imports bypass the write gate.
    pub fn import_records(&self, records: &DayRecords) -> TrackerResult<usize> {
        if let Some(date) = records.keys().find(|d| validate_year(d.year()).is_err()) {
            return Err(TrackerError::YearOutOfRange(date.year()));
        }
        self.store.import(records)?;
        info!(count = records.len(), "imported day states");
        Ok(records.len())
    }
}
