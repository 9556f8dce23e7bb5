use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_epoch;
use crate::domain::models::AttendanceRecord;
use crate::domain::types::AttendanceStatus;
use crate::managers::attendance::AttendanceStats;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct AttendanceCreate {
    #[validate(length(min = 1, message = "course_id must not be empty"))]
    pub(crate) course_id: String,
    #[validate(range(min = 1, message = "date must be a positive unix timestamp"))]
    pub(crate) date: i64,
    pub(crate) status: AttendanceStatus,
}

impl AttendanceCreate {
    pub(crate) fn into_model(self, id: String) -> AttendanceRecord {
        AttendanceRecord { id, course_id: self.course_id, date: self.date, status: self.status }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AttendanceListQuery {
    #[serde(default)]
    pub(crate) course_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AttendanceResponse {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) date: i64,
    pub(crate) date_rfc3339: String,
    pub(crate) status: AttendanceStatus,
}

impl AttendanceResponse {
    pub(crate) fn from_model(record: &AttendanceRecord) -> Self {
        Self {
            id: record.id.clone(),
            course_id: record.course_id.clone(),
            date: record.date,
            date_rfc3339: format_epoch(record.date),
            status: record.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AttendanceStatsResponse {
    pub(crate) course_id: String,
    pub(crate) countable: u32,
    pub(crate) attended: u32,
    pub(crate) absences: u32,
    pub(crate) percentage: f64,
}

impl AttendanceStatsResponse {
    pub(crate) fn from_stats(course_id: String, stats: AttendanceStats) -> Self {
        Self {
            course_id,
            countable: stats.countable,
            attended: stats.attended,
            absences: stats.absences,
            percentage: stats.percentage(),
        }
    }
}
