use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::config::Settings;
use crate::domain::models::{AttendanceRecord, Course, Evaluation, ScheduleEntry};

const COURSES_FILE: &str = "courses.json";
const EVALUATIONS_FILE: &str = "evaluations.json";
const ATTENDANCE_FILE: &str = "attendance.json";
const SCHEDULE_FILE: &str = "schedule.json";

/// Flat-file persistence: one JSON array per record type under the data
/// directory. No schema versioning; a missing file reads as an empty set.
#[derive(Debug, Clone)]
pub(crate) struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub(crate) async fn from_settings(settings: &Settings) -> Result<Self> {
        Self::open(Path::new(&settings.storage().data_dir)).await
    }

    pub(crate) async fn open(root: &Path) -> Result<Self> {
        tokio::fs::create_dir_all(root)
            .await
            .with_context(|| format!("Failed to create data directory {}", root.display()))?;
        Ok(Self { root: root.to_path_buf() })
    }

    pub(crate) async fn load_courses(&self) -> Result<Vec<Course>> {
        self.load_array(COURSES_FILE).await
    }

    pub(crate) async fn save_courses(&self, records: &[Course]) -> Result<()> {
        self.save_array(COURSES_FILE, records).await
    }

    pub(crate) async fn load_evaluations(&self) -> Result<Vec<Evaluation>> {
        self.load_array(EVALUATIONS_FILE).await
    }

    pub(crate) async fn save_evaluations(&self, records: &[Evaluation]) -> Result<()> {
        self.save_array(EVALUATIONS_FILE, records).await
    }

    pub(crate) async fn load_attendance(&self) -> Result<Vec<AttendanceRecord>> {
        self.load_array(ATTENDANCE_FILE).await
    }

    pub(crate) async fn save_attendance(&self, records: &[AttendanceRecord]) -> Result<()> {
        self.save_array(ATTENDANCE_FILE, records).await
    }

    pub(crate) async fn load_schedule(&self) -> Result<Vec<ScheduleEntry>> {
        self.load_array(SCHEDULE_FILE).await
    }

    pub(crate) async fn save_schedule(&self, records: &[ScheduleEntry]) -> Result<()> {
        self.save_array(SCHEDULE_FILE, records).await
    }

    pub(crate) async fn is_writable(&self) -> bool {
        let probe = self.root.join(".probe");
        match tokio::fs::write(&probe, b"ok").await {
            Ok(()) => {
                let _ = tokio::fs::remove_file(&probe).await;
                true
            }
            Err(_) => false,
        }
    }

    async fn load_array<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>> {
        let path = self.root.join(file);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read {}", path.display()))
            }
        };

        serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Writes to a sibling temp file and renames it over the target, so a
    /// crash mid-write cannot leave a truncated array behind.
    async fn save_array<T: Serialize>(&self, file: &str, records: &[T]) -> Result<()> {
        let path = self.root.join(file);
        let tmp = self.root.join(format!("{file}.tmp"));

        let bytes = serde_json::to_vec_pretty(records)
            .with_context(|| format!("Failed to serialize {file}"))?;
        tokio::fs::write(&tmp, &bytes)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .with_context(|| format!("Failed to replace {}", path.display()))?;

        Ok(())
    }
}
