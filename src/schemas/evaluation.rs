use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_epoch;
use crate::domain::models::{Evaluation, EvaluationSource, GRADE_MAX};
use crate::domain::types::EvaluationStatus;

fn default_max_grade() -> f64 {
    GRADE_MAX
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum EvaluationKind {
    Manual,
    Photo,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct EvaluationCreate {
    #[validate(length(min = 1, message = "course_id must not be empty"))]
    pub(crate) course_id: String,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub(crate) name: String,
    #[validate(range(min = 0.0, max = 100.0, message = "weight must be 0-100"))]
    pub(crate) weight: f64,
    #[validate(range(min = 1, message = "date must be a positive unix timestamp"))]
    pub(crate) date: i64,
    #[serde(default)]
    #[validate(range(min = 1.0, max = 7.0, message = "grade must be on the 1-7 scale"))]
    pub(crate) grade: Option<f64>,
    pub(crate) kind: EvaluationKind,
    #[serde(default = "default_max_grade")]
    #[validate(range(exclusive_min = 0.0, message = "max_grade must be positive"))]
    pub(crate) max_grade: f64,
}

impl EvaluationCreate {
    pub(crate) fn into_model(self, id: String) -> Evaluation {
        let source = match self.kind {
            EvaluationKind::Manual => EvaluationSource::Manual { max_grade: self.max_grade },
            EvaluationKind::Photo => EvaluationSource::Photo,
        };
        Evaluation {
            id,
            course_id: self.course_id,
            name: self.name,
            weight: self.weight,
            date: self.date,
            grade: self.grade,
            status: EvaluationStatus::Pending,
            source,
        }
    }
}

/// Full replacement by id; the manager re-validates before accepting.
#[derive(Debug, Deserialize, Validate)]
pub(crate) struct EvaluationReplace {
    #[validate(length(min = 1, message = "course_id must not be empty"))]
    pub(crate) course_id: String,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub(crate) name: String,
    #[validate(range(min = 0.0, max = 100.0, message = "weight must be 0-100"))]
    pub(crate) weight: f64,
    #[validate(range(min = 1, message = "date must be a positive unix timestamp"))]
    pub(crate) date: i64,
    #[serde(default)]
    #[validate(range(min = 1.0, max = 7.0, message = "grade must be on the 1-7 scale"))]
    pub(crate) grade: Option<f64>,
    #[serde(default)]
    pub(crate) status: Option<EvaluationStatus>,
    pub(crate) kind: EvaluationKind,
    #[serde(default = "default_max_grade")]
    #[validate(range(exclusive_min = 0.0, message = "max_grade must be positive"))]
    pub(crate) max_grade: f64,
}

impl EvaluationReplace {
    pub(crate) fn into_model(self, id: String) -> Evaluation {
        let source = match self.kind {
            EvaluationKind::Manual => EvaluationSource::Manual { max_grade: self.max_grade },
            EvaluationKind::Photo => EvaluationSource::Photo,
        };
        Evaluation {
            id,
            course_id: self.course_id,
            name: self.name,
            weight: self.weight,
            date: self.date,
            grade: self.grade,
            status: self.status.unwrap_or(EvaluationStatus::Pending),
            source,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct EvaluationListQuery {
    #[serde(default)]
    pub(crate) course_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EvaluationResponse {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) name: String,
    pub(crate) weight: f64,
    pub(crate) date: i64,
    pub(crate) date_rfc3339: String,
    pub(crate) grade: Option<f64>,
    pub(crate) status: EvaluationStatus,
    pub(crate) kind: &'static str,
    pub(crate) max_grade: Option<f64>,
    pub(crate) weighted_contribution: Option<f64>,
    pub(crate) points_obtained: Option<f64>,
}

impl EvaluationResponse {
    pub(crate) fn from_model(evaluation: &Evaluation) -> Self {
        let (kind, max_grade) = match evaluation.source {
            EvaluationSource::Manual { max_grade } => ("manual", Some(max_grade)),
            EvaluationSource::Photo => ("photo", None),
        };
        Self {
            id: evaluation.id.clone(),
            course_id: evaluation.course_id.clone(),
            name: evaluation.name.clone(),
            weight: evaluation.weight,
            date: evaluation.date,
            date_rfc3339: format_epoch(evaluation.date),
            grade: evaluation.grade,
            status: evaluation.status,
            kind,
            max_grade,
            weighted_contribution: evaluation.weighted_contribution(),
            points_obtained: evaluation.points_obtained(),
        }
    }
}
