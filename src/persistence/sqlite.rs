use super::{DayRecords, DayStateStore, PersistenceResult, parse_date, parse_state};
use crate::day_state::DayState;
use chrono::NaiveDate;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};

pub struct SqliteDayStateStore {
    connection: Mutex<Connection>,
}

impl SqliteDayStateStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        let connection = Connection::open_in_memory()?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS day_states (
                date TEXT PRIMARY KEY,
                state TEXT NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn write_state(conn: &Connection, date: NaiveDate, state: DayState) -> PersistenceResult<()> {
        let key = date.format("%Y-%m-%d").to_string();
        if state == DayState::Empty {
            conn.execute("DELETE FROM day_states WHERE date = ?1", params![key])?;
        } else {
            conn.execute(
                "INSERT INTO day_states (date, state) VALUES (?1, ?2)
                 ON CONFLICT(date) DO UPDATE SET state = excluded.state",
                params![key, state.as_str()],
            )?;
        }
        Ok(())
    }

    fn collect_rows(rows: Vec<(String, String)>) -> PersistenceResult<DayRecords> {
        let mut records = DayRecords::new();
        for (date, state) in rows {
            records.insert(parse_date(&date)?, parse_state(&state)?);
        }
        Ok(records)
    }
}

impl DayStateStore for SqliteDayStateStore {
    fn load_range(&self, start: NaiveDate, end: NaiveDate) -> PersistenceResult<DayRecords> {
        let conn = self.connection.lock();
        // ISO dates compare correctly as text.
        let mut stmt = conn.prepare(
            "SELECT date, state FROM day_states WHERE date BETWEEN ?1 AND ?2 ORDER BY date ASC",
        )?;
        let rows = stmt
            .query_map(
                params![
                    start.format("%Y-%m-%d").to_string(),
                    end.format("%Y-%m-%d").to_string()
                ],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Self::collect_rows(rows)
    }

    fn load_all(&self) -> PersistenceResult<DayRecords> {
        let conn = self.connection.lock();
        let mut stmt = conn.prepare("SELECT date, state FROM day_states ORDER BY date ASC")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Self::collect_rows(rows)
    }

    fn set_state(&self, date: NaiveDate, state: DayState) -> PersistenceResult<()> {
        let conn = self.connection.lock();
        Self::write_state(&conn, date, state)
    }

    fn cycle_state(&self, date: NaiveDate) -> PersistenceResult<DayState> {
        let mut conn = self.connection.lock();
        let tx = conn.transaction()?;
        let current = tx
            .query_row(
                "SELECT state FROM day_states WHERE date = ?1",
                params![date.format("%Y-%m-%d").to_string()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        let current = match current {
            Some(state) => parse_state(&state)?,
            None => DayState::Empty,
        };
        let next = current.next();
        Self::write_state(&tx, date, next)?;
        tx.commit()?;
        Ok(next)
    }

    fn import(&self, records: &DayRecords) -> PersistenceResult<()> {
        let mut conn = self.connection.lock();
        let tx = conn.transaction()?;
        for (date, state) in records {
            Self::write_state(&tx, *date, *state)?;
        }
        tx.commit()?;
        Ok(())
    }
}
