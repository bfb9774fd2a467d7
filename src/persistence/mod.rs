use crate::day_state::DayState;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Date → state records as read from a store.
pub type DayRecords = BTreeMap<NaiveDate, DayState>;

/// Key-value persistence for day states.
///
/// Stores hold no rules: they accept whatever the caller has already
/// validated. Setting a day to [`DayState::Empty`] removes its record.
pub trait DayStateStore: Send + Sync {
    /// Records with `start <= date <= end`.
    fn load_range(&self, start: NaiveDate, end: NaiveDate) -> PersistenceResult<DayRecords>;

    fn load_all(&self) -> PersistenceResult<DayRecords>;

    fn set_state(&self, date: NaiveDate, state: DayState) -> PersistenceResult<()>;

    /// Advance `date` to the next state of the cycle in one step, so
    /// concurrent cycles of the same day never read the same old state.
    fn cycle_state(&self, date: NaiveDate) -> PersistenceResult<DayState>;

    fn get_state(&self, date: NaiveDate) -> PersistenceResult<DayState> {
        Ok(self
            .load_range(date, date)?
            .get(&date)
            .copied()
            .unwrap_or_default())
    }

    /// Bulk-write `records`, leaving days not mentioned untouched.
    fn import(&self, records: &DayRecords) -> PersistenceResult<()> {
        for (date, state) in records {
            self.set_state(*date, *state)?;
        }
        Ok(())
    }
}

pub(crate) fn parse_date(input: &str) -> PersistenceResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| PersistenceError::InvalidData(format!("invalid date '{input}': {e}")))
}

pub(crate) fn parse_state(input: &str) -> PersistenceResult<DayState> {
    input
        .trim()
        .parse::<DayState>()
        .map_err(|e| PersistenceError::InvalidData(e.to_string()))
}

/// Open the store for `path`: `.json` files use [`JsonFileDayStateStore`],
/// `.db`/`.sqlite`/`.sqlite3` use SQLite, and no path keeps records in memory.
pub fn open_store(path: Option<&Path>) -> PersistenceResult<Box<dyn DayStateStore>> {
    let Some(path) = path else {
        info!("using in-memory day state store");
        return Ok(Box::new(MemoryDayStateStore::new()));
    };
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("json") => {
            info!(path = %path.display(), "using JSON day state store");
            Ok(Box::new(JsonFileDayStateStore::open(path)?))
        }
        #[cfg(feature = "sqlite")]
        Some("db" | "sqlite" | "sqlite3") => {
            info!(path = %path.display(), "using SQLite day state store");
            Ok(Box::new(SqliteDayStateStore::new(path)?))
        }
        _ => Err(PersistenceError::InvalidData(format!(
            "unsupported store path '{}'",
            path.display()
        ))),
    }
}

pub mod file;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    JsonFileDayStateStore, load_records_from_csv, load_records_from_json, save_records_to_csv,
    save_records_to_json,
};
pub use memory::MemoryDayStateStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDayStateStore;
