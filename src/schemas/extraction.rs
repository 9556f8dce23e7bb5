use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::vision::{EvaluationScan, ScheduleScan, ScheduleScanEntry};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ExtractionRequest {
    /// Base64-encoded JPEG/PNG photo of the document.
    #[validate(length(min = 1, message = "image must not be empty"))]
    pub(crate) image: String,
    /// Optional free-text context passed along to the model.
    #[serde(default)]
    pub(crate) hint: Option<String>,
}

/// Result object shape: collaborator failures are reported in-band with
/// `success = false` rather than as an HTTP error.
#[derive(Debug, Serialize)]
pub(crate) struct EvaluationExtractionResponse {
    pub(crate) success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) grade: Option<f64>,
    pub(crate) weight: Option<f64>,
    pub(crate) date: Option<i64>,
    pub(crate) confidence: f64,
}

impl EvaluationExtractionResponse {
    pub(crate) fn from_scan(scan: EvaluationScan) -> Self {
        Self {
            success: true,
            error: None,
            name: scan.name,
            grade: scan.grade,
            weight: scan.weight,
            date: scan.date,
            confidence: scan.confidence,
        }
    }

    pub(crate) fn failure(message: String) -> Self {
        Self {
            success: false,
            error: Some(message),
            name: None,
            grade: None,
            weight: None,
            date: None,
            confidence: 0.0,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ScheduleExtractionEntry {
    pub(crate) course_name: String,
    pub(crate) room: String,
    pub(crate) instructor: String,
    pub(crate) weekday: String,
    pub(crate) start_time: String,
    pub(crate) end_time: String,
    pub(crate) class_type: String,
}

impl ScheduleExtractionEntry {
    fn from_scan(entry: ScheduleScanEntry) -> Self {
        Self {
            course_name: entry.course_name,
            room: entry.room,
            instructor: entry.instructor,
            weekday: entry.weekday,
            start_time: entry.start_time,
            end_time: entry.end_time,
            class_type: entry.class_type,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ScheduleExtractionResponse {
    pub(crate) success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<String>,
    pub(crate) entries: Vec<ScheduleExtractionEntry>,
    pub(crate) confidence: f64,
}

impl ScheduleExtractionResponse {
    pub(crate) fn from_scan(scan: ScheduleScan) -> Self {
        Self {
            success: true,
            error: None,
            entries: scan.entries.into_iter().map(ScheduleExtractionEntry::from_scan).collect(),
            confidence: scan.confidence,
        }
    }

    pub(crate) fn failure(message: String) -> Self {
        Self { success: false, error: Some(message), entries: Vec::new(), confidence: 0.0 }
    }
}
