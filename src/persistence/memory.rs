use super::{DayRecords, DayStateStore, PersistenceResult};
use crate::day_state::DayState;
use chrono::NaiveDate;
use parking_lot::RwLock;

#[derive(Debug, Default)]
pub struct MemoryDayStateStore {
    records: RwLock<DayRecords>,
}

impl MemoryDayStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(mut records: DayRecords) -> Self {
        records.retain(|_, state| *state != DayState::Empty);
        Self {
            records: RwLock::new(records),
        }
    }
}

impl DayStateStore for MemoryDayStateStore {
    fn load_range(&self, start: NaiveDate, end: NaiveDate) -> PersistenceResult<DayRecords> {
        if start > end {
            return Ok(DayRecords::new());
        }
        let records = self.records.read();
        Ok(records
            .range(start..=end)
            .map(|(date, state)| (*date, *state))
            .collect())
    }

    fn load_all(&self) -> PersistenceResult<DayRecords> {
        Ok(self.records.read().clone())
    }

    fn set_state(&self, date: NaiveDate, state: DayState) -> PersistenceResult<()> {
        let mut records = self.records.write();
        if state == DayState::Empty {
            records.remove(&date);
        } else {
            records.insert(date, state);
        }
        Ok(())
    }

    fn cycle_state(&self, date: NaiveDate) -> PersistenceResult<DayState> {
        let mut records = self.records.write();
        let next = records.get(&date).copied().unwrap_or_default().next();
        if next == DayState::Empty {
            records.remove(&date);
        } else {
            records.insert(date, next);
        }
        Ok(next)
    }
}
