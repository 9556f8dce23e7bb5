use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_epoch;
use crate::domain::models::Course;
use crate::domain::types::CourseStatus;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CourseCreate {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub(crate) name: String,
    #[validate(length(min = 1, message = "code must not be empty"))]
    pub(crate) code: String,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0, message = "min_attendance must be 0-100"))]
    pub(crate) min_attendance: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 1.0, max = 7.0, message = "min_grade must be on the 1-7 scale"))]
    pub(crate) min_grade: Option<f64>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CourseUpdate {
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) code: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0, message = "min_attendance must be 0-100"))]
    pub(crate) min_attendance: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 1.0, max = 7.0, message = "min_grade must be on the 1-7 scale"))]
    pub(crate) min_grade: Option<f64>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CourseArchiveRequest {
    pub(crate) status: CourseStatus,
    #[serde(default)]
    #[validate(range(min = 1.0, max = 7.0, message = "final_grade must be on the 1-7 scale"))]
    pub(crate) final_grade: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) code: String,
    pub(crate) min_attendance: f64,
    pub(crate) min_grade: f64,
    pub(crate) status: CourseStatus,
    pub(crate) final_grade: Option<f64>,
    pub(crate) archived_at: Option<String>,
    pub(crate) created_at: String,
}

impl CourseResponse {
    pub(crate) fn from_model(course: &Course) -> Self {
        Self {
            id: course.id.clone(),
            name: course.name.clone(),
            code: course.code.clone(),
            min_attendance: course.min_attendance,
            min_grade: course.min_grade,
            status: course.status,
            final_grade: course.final_grade,
            archived_at: course.archived_at.map(format_epoch),
            created_at: format_epoch(course.created_at),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GradeNeededQuery {
    #[serde(default)]
    pub(crate) target: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseAverageResponse {
    pub(crate) course_id: String,
    pub(crate) average: f64,
    pub(crate) graded_count: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct GradeNeededResponse {
    pub(crate) course_id: String,
    pub(crate) target: f64,
    pub(crate) current_average: f64,
    pub(crate) needed_grade: f64,
    pub(crate) points_obtained: f64,
    pub(crate) evaluated_weight: f64,
    pub(crate) pending_weight: f64,
    pub(crate) achievable: bool,
    pub(crate) achieved: bool,
}
