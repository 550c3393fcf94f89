use super::{PersistenceError, PersistenceResult, SessionSnapshot};
use crate::completion::CompletionSet;
use crate::config::ScheduleConfig;
use crate::metadata::ScheduleMetadata;
use crate::schedule::Schedule;
use crate::task::TaskRecord;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

const METADATA_ROW_NAME: &str = "__metadata__";

pub fn save_schedule_to_json<P: AsRef<Path>>(
    schedule: &Schedule,
    path: P,
) -> PersistenceResult<()> {
    let snapshot = SessionSnapshot::from_schedule(schedule)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

/// Loads with the default configuration; callers swap in their own afterwards.
pub fn load_schedule_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Schedule> {
    let file = File::open(path)?;
    let snapshot: SessionSnapshot = serde_json::from_reader(file)?;
    snapshot.into_schedule(ScheduleConfig::default())
}

#[derive(Default, Serialize, Deserialize)]
struct TaskCsvRecord {
    name: String,
    duration_hours: String,
    dependency: String,
    #[serde(default)]
    metadata_json: String,
    #[serde(default)]
    completed_json: String,
}

impl From<&TaskRecord> for TaskCsvRecord {
    fn from(task: &TaskRecord) -> Self {
        TaskCsvRecord {
            name: task.name.clone(),
            duration_hours: task
                .duration_hours
                .map(|v| v.to_string())
                .unwrap_or_default(),
            dependency: task.dependency.clone().unwrap_or_default(),
            ..TaskCsvRecord::default()
        }
    }
}

impl TaskCsvRecord {
    fn metadata_row(schedule: &Schedule) -> PersistenceResult<Self> {
        Ok(TaskCsvRecord {
            name: METADATA_ROW_NAME.to_string(),
            metadata_json: serde_json::to_string(schedule.metadata())?,
            completed_json: serde_json::to_string(schedule.completed())?,
            ..TaskCsvRecord::default()
        })
    }

    fn is_metadata_row(&self) -> bool {
        !self.metadata_json.trim().is_empty()
    }

    fn into_task(self) -> PersistenceResult<TaskRecord> {
        if self.is_metadata_row() {
            return Err(PersistenceError::InvalidData(
                "metadata row cannot be converted to task".into(),
            ));
        }
        let duration_hours = parse_f64(&self.duration_hours)?;
        let dependency = if self.dependency.is_empty() {
            None
        } else {
            Some(self.dependency)
        };
        Ok(TaskRecord {
            name: self.name,
            duration_hours,
            dependency,
        })
    }
}

pub fn save_schedule_to_csv<P: AsRef<Path>>(schedule: &Schedule, path: P) -> PersistenceResult<()> {
    super::validate_tasks(schedule.tasks())?;
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    writer.serialize(TaskCsvRecord::metadata_row(schedule)?)?;
    for task in schedule.tasks() {
        writer.serialize(TaskCsvRecord::from(task))?;
    }
    writer.flush()?;
    Ok(())
}

/// A file without a metadata row loads as a fresh session holding its tasks.
pub fn load_schedule_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Schedule> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut tasks = Vec::new();
    let mut metadata: Option<ScheduleMetadata> = None;
    let mut completed = CompletionSet::new();
    for record in reader.deserialize::<TaskCsvRecord>() {
        let record = record?;
        if record.is_metadata_row() {
            if metadata.is_some() {
                return Err(PersistenceError::InvalidData(
                    "CSV file contained multiple metadata rows".into(),
                ));
            }
            metadata = Some(serde_json::from_str(&record.metadata_json).map_err(|err| {
                PersistenceError::InvalidData(format!("invalid metadata json: {err}"))
            })?);
            if !record.completed_json.trim().is_empty() {
                completed = serde_json::from_str(&record.completed_json).map_err(|err| {
                    PersistenceError::InvalidData(format!("invalid completed json: {err}"))
                })?;
            }
            continue;
        }
        tasks.push(record.into_task()?);
    }

    let snapshot = SessionSnapshot {
        metadata: metadata.unwrap_or_default(),
        tasks,
        completed,
    };
    snapshot.into_schedule(ScheduleConfig::default())
}

fn parse_f64(input: &str) -> PersistenceResult<Option<f64>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    input
        .trim()
        .parse::<f64>()
        .map(Some)
        .map_err(|e| PersistenceError::InvalidData(format!("invalid float '{input}': {e}")))
}
