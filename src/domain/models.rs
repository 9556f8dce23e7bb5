use serde::{Deserialize, Serialize};

use crate::domain::types::{
    AttendanceStatus, ClassType, CourseStatus, EvaluationStatus, Weekday,
};

/// Bounds of the grading scale (Chilean 1.0–7.0 system).
pub(crate) const GRADE_MIN: f64 = 1.0;
pub(crate) const GRADE_MAX: f64 = 7.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Course {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) code: String,
    pub(crate) min_attendance: f64,
    pub(crate) min_grade: f64,
    pub(crate) status: CourseStatus,
    pub(crate) final_grade: Option<f64>,
    pub(crate) archived_at: Option<i64>,
    pub(crate) created_at: i64,
}

/// How an evaluation entered the system. The points formula differs per
/// variant: manual entries are scaled by their own `max_grade`, photographed
/// entries always by the scale maximum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub(crate) enum EvaluationSource {
    Manual { max_grade: f64 },
    Photo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Evaluation {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) name: String,
    /// Percentage weight towards the course grade, 0–100.
    pub(crate) weight: f64,
    /// Epoch seconds.
    pub(crate) date: i64,
    pub(crate) grade: Option<f64>,
    pub(crate) status: EvaluationStatus,
    #[serde(flatten)]
    pub(crate) source: EvaluationSource,
}

impl Evaluation {
    /// grade × weight/100, identical for every variant.
    pub(crate) fn weighted_contribution(&self) -> Option<f64> {
        self.grade.map(|grade| grade * self.weight / 100.0)
    }

    /// Points already banked towards the 100-point course total.
    pub(crate) fn points_obtained(&self) -> Option<f64> {
        let grade = self.grade?;
        let scale = match self.source {
            EvaluationSource::Manual { max_grade } => max_grade,
            EvaluationSource::Photo => GRADE_MAX,
        };
        Some(grade / scale * self.weight)
    }

    pub(crate) fn is_graded(&self) -> bool {
        self.grade.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct AttendanceRecord {
    pub(crate) id: String,
    pub(crate) course_id: String,
    /// Epoch seconds.
    pub(crate) date: i64,
    pub(crate) status: AttendanceStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ScheduleEntry {
    pub(crate) id: String,
    pub(crate) course_name: String,
    pub(crate) room: String,
    pub(crate) instructor: String,
    pub(crate) weekday: Weekday,
    /// `HH:MM`, 24-hour clock.
    pub(crate) start_time: String,
    pub(crate) end_time: String,
    pub(crate) class_type: ClassType,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluation(weight: f64, grade: Option<f64>, source: EvaluationSource) -> Evaluation {
        Evaluation {
            id: "e1".to_string(),
            course_id: "c1".to_string(),
            name: "Test 1".to_string(),
            weight,
            date: 1,
            grade,
            status: if grade.is_some() {
                EvaluationStatus::Completed
            } else {
                EvaluationStatus::Pending
            },
            source,
        }
    }

    #[test]
    fn weighted_contribution_is_grade_times_weight_fraction() {
        let e = evaluation(30.0, Some(5.5), EvaluationSource::Photo);
        assert!((e.weighted_contribution().unwrap() - 1.65).abs() < 1e-9);

        let e = evaluation(100.0, Some(7.0), EvaluationSource::Manual { max_grade: 7.0 });
        assert!((e.weighted_contribution().unwrap() - 7.0).abs() < 1e-9);
    }

    #[test]
    fn ungraded_evaluation_has_no_contribution() {
        let e = evaluation(30.0, None, EvaluationSource::Photo);
        assert!(e.weighted_contribution().is_none());
        assert!(e.points_obtained().is_none());
    }

    #[test]
    fn points_formula_depends_on_variant() {
        let manual = evaluation(40.0, Some(5.0), EvaluationSource::Manual { max_grade: 10.0 });
        assert!((manual.points_obtained().unwrap() - 20.0).abs() < 1e-9);

        let photo = evaluation(40.0, Some(3.5), EvaluationSource::Photo);
        assert!((photo.points_obtained().unwrap() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn evaluation_source_json_carries_kind_tag() {
        let e = evaluation(20.0, Some(6.0), EvaluationSource::Manual { max_grade: 7.0 });
        let value = serde_json::to_value(&e).expect("serialize");
        assert_eq!(value["kind"], "manual");
        assert_eq!(value["max_grade"], 7.0);

        let photo = evaluation(20.0, None, EvaluationSource::Photo);
        let value = serde_json::to_value(&photo).expect("serialize");
        assert_eq!(value["kind"], "photo");
    }
}
