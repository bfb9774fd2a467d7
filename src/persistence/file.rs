use super::{DayRecords, DayStateStore, PersistenceResult, parse_date, parse_state};
use crate::day_state::DayState;
use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Write records as a flat `{"YYYY-MM-DD": "state"}` JSON object.
pub fn save_records_to_json<P: AsRef<Path>>(records: &DayRecords, path: P) -> PersistenceResult<()> {
    let flat: BTreeMap<String, &'static str> = records
        .iter()
        .map(|(date, state)| (date.format("%Y-%m-%d").to_string(), state.as_str()))
        .collect();
    let json = serde_json::to_string_pretty(&flat)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn load_records_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<DayRecords> {
    let raw = fs::read_to_string(path)?;
    if raw.trim().is_empty() {
        return Ok(DayRecords::new());
    }
    let flat: BTreeMap<String, String> = serde_json::from_str(&raw)?;
    let mut records = DayRecords::new();
    for (date, state) in flat {
        let state = parse_state(&state)?;
        if state != DayState::Empty {
            records.insert(parse_date(&date)?, state);
        }
    }
    Ok(records)
}

#[derive(Debug, Serialize, Deserialize)]
struct DayStateCsvRecord {
    date: NaiveDate,
    state: DayState,
}

pub fn save_records_to_csv<P: AsRef<Path>>(records: &DayRecords, path: P) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for (date, state) in records {
        writer.serialize(DayStateCsvRecord {
            date: *date,
            state: *state,
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_records_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<DayRecords> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut records = DayRecords::new();
    for record in reader.deserialize::<DayStateCsvRecord>() {
        let record = record?;
        if record.state != DayState::Empty {
            records.insert(record.date, record.state);
        }
    }
    Ok(records)
}

/// Day states kept in one JSON file, rewritten on every change.
#[derive(Debug)]
pub struct JsonFileDayStateStore {
    path: PathBuf,
    records: RwLock<DayRecords>,
}

impl JsonFileDayStateStore {
    /// Open `path`, starting empty if the file does not exist yet.
    pub fn open<P: AsRef<Path>>(path: P) -> PersistenceResult<Self> {
        let path = path.as_ref().to_path_buf();
        let records = if path.exists() {
            load_records_from_json(&path)?
        } else {
            DayRecords::new()
        };
        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    /// Apply `change` to a copy, write it out, and keep it only if the write succeeds.
    fn update(&self, change: impl FnOnce(&mut DayRecords)) -> PersistenceResult<()> {
        let mut records = self.records.write();
        let mut next = records.clone();
        change(&mut next);
        save_records_to_json(&next, &self.path)?;
        *records = next;
        Ok(())
    }
}

impl DayStateStore for JsonFileDayStateStore {
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
        self.update(|records| apply_state(records, date, state))
    }

    fn cycle_state(&self, date: NaiveDate) -> PersistenceResult<DayState> {
        let mut next = DayState::Empty;
        self.update(|records| {
            next = records.get(&date).copied().unwrap_or_default().next();
            apply_state(records, date, next);
        })?;
        Ok(next)
    }

    fn import(&self, incoming: &DayRecords) -> PersistenceResult<()> {
        self.update(|records| {
            for (date, state) in incoming {
                apply_state(records, *date, *state);
            }
        })
    }
}

fn apply_state(records: &mut DayRecords, date: NaiveDate, state: DayState) {
    if state == DayState::Empty {
        records.remove(&date);
    } else {
        records.insert(date, state);
    }
}
