use super::{PersistenceError, PersistenceResult, ScheduleStore, SessionSnapshot};
use crate::completion::CompletionSet;
use crate::config::ScheduleConfig;
use crate::metadata::ScheduleMetadata;
use crate::schedule::Schedule;
use crate::task::TaskRecord;
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use std::sync::{Mutex, MutexGuard};

pub struct SqliteScheduleStore {
    connection: Mutex<Connection>,
}

impl SqliteScheduleStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS session_metadata (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                metadata_json TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS tasks (
                position INTEGER PRIMARY KEY,
                task_json TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS completed (
                name TEXT PRIMARY KEY
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn lock(&self) -> PersistenceResult<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| PersistenceError::LockPoisoned)
    }

    fn save_metadata(tx: &Transaction, metadata: &ScheduleMetadata) -> PersistenceResult<()> {
        let json = serde_json::to_string(metadata)?;
        tx.execute("DELETE FROM session_metadata", [])?;
        tx.execute(
            "INSERT INTO session_metadata (id, metadata_json) VALUES (1, ?1)",
            params![json],
        )?;
        Ok(())
    }

    fn save_tasks(tx: &Transaction, tasks: &[TaskRecord]) -> PersistenceResult<()> {
        tx.execute("DELETE FROM tasks", [])?;
        let mut stmt = tx.prepare("INSERT INTO tasks (position, task_json) VALUES (?1, ?2)")?;
        for (position, task) in tasks.iter().enumerate() {
            let json = serde_json::to_string(task)?;
            stmt.execute(params![position as i64, json])?;
        }
        Ok(())
    }

    fn save_completed(tx: &Transaction, completed: &CompletionSet) -> PersistenceResult<()> {
        tx.execute("DELETE FROM completed", [])?;
        let mut stmt = tx.prepare("INSERT INTO completed (name) VALUES (?1)")?;
        for name in completed.iter() {
            stmt.execute(params![name])?;
        }
        Ok(())
    }
}

impl ScheduleStore for SqliteScheduleStore {
    fn save_schedule(&self, schedule: &Schedule) -> PersistenceResult<()> {
        let snapshot = SessionSnapshot::from_schedule(schedule)?;
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        Self::save_metadata(&tx, &snapshot.metadata)?;
        Self::save_tasks(&tx, &snapshot.tasks)?;
        Self::save_completed(&tx, &snapshot.completed)?;
        tx.commit()?;
        Ok(())
    }

    fn load_schedule(&self) -> PersistenceResult<Option<Schedule>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare("SELECT metadata_json FROM session_metadata WHERE id = 1")?;
        let metadata_json_opt: Option<String> = stmt.query_row([], |row| row.get(0)).optional()?;

        let Some(metadata_json) = metadata_json_opt else {
            return Ok(None);
        };
        let metadata: ScheduleMetadata = serde_json::from_str(&metadata_json)?;

        let mut stmt = conn.prepare("SELECT task_json FROM tasks ORDER BY position ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut tasks = Vec::new();
        for json in rows {
            let task: TaskRecord = serde_json::from_str(&json?)?;
            tasks.push(task);
        }

        let mut stmt = conn.prepare("SELECT name FROM completed ORDER BY name ASC")?;
        let completed = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<CompletionSet, _>>()?;

        let snapshot = SessionSnapshot {
            metadata,
            tasks,
            completed,
        };
        snapshot.into_schedule(ScheduleConfig::default()).map(Some)
    }
}
