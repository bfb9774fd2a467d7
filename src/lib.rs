pub mod calendar;
pub mod config;
pub mod day_state;
pub mod error;
pub mod holidays;
#[cfg(feature = "http_api")]
pub mod http_api;
#[cfg(any(feature = "cli", feature = "http_api"))]
pub mod logging;
pub mod persistence;
pub mod stats;
pub mod swaps;
pub mod tracker;

pub use calendar::{BlockReason, EditRejection, RuleEngine, SwapStatus, YearRuleSet};
pub use config::{CalendarConfig, TODAY_ENV, today_override};
pub use day_state::{DayState, ParseDayStateError};
pub use error::ConfigError;
pub use holidays::{EasterHoliday, FixedHoliday, HolidayCalendar, easter_sunday};
#[cfg(feature = "sqlite")]
pub use persistence::SqliteDayStateStore;
pub use persistence::{
    DayRecords, DayStateStore, JsonFileDayStateStore, MemoryDayStateStore, PersistenceError,
    load_records_from_csv, load_records_from_json, open_store, save_records_to_csv,
    save_records_to_json,
};
pub use stats::{OFFICE_TARGET_PERCENT, StatsResult, StatsScope, compute_stats, rounded_percentage};
pub use swaps::{WorkdaySwapRegistry, YearOverrides};
pub use tracker::{
    AttendanceCalendar, MonthStates, StatsReport, TrackerError, YearRules, validate_month,
    validate_year,
};
