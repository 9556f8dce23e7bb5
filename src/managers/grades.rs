use std::collections::HashMap;

use crate::domain::models::{Evaluation, EvaluationSource, GRADE_MAX, GRADE_MIN};
use crate::domain::types::EvaluationStatus;

const EPSILON: f64 = 1e-9;

/// Outcome of the one-step algebraic projection towards a target grade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct GradeProjection {
    pub(crate) current_average: f64,
    pub(crate) needed_grade: f64,
    pub(crate) points_obtained: f64,
    pub(crate) evaluated_weight: f64,
    pub(crate) pending_weight: f64,
    /// True when the needed grade fits inside the 1.0–7.0 scale.
    pub(crate) achievable: bool,
    /// True when the banked points already meet the target.
    pub(crate) achieved: bool,
}

/// In-memory map of evaluations keyed by id. Populated from the file store at
/// startup; every mutation is flushed back by the caller.
#[derive(Debug, Default)]
pub(crate) struct GradeManager {
    evaluations: HashMap<String, Evaluation>,
}

impl GradeManager {
    pub(crate) fn from_records(records: Vec<Evaluation>) -> Self {
        let evaluations =
            records.into_iter().map(|record| (record.id.clone(), record)).collect();
        Self { evaluations }
    }

    /// Snapshot for persistence, ordered by date then id so saved files are
    /// stable across runs.
    pub(crate) fn records(&self) -> Vec<Evaluation> {
        let mut records: Vec<Evaluation> = self.evaluations.values().cloned().collect();
        records.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        records
    }

    /// Inserts after validation; invalid evaluations are silently rejected.
    pub(crate) fn add(&mut self, evaluation: Evaluation) -> bool {
        let Some(evaluation) = normalize(evaluation) else {
            return false;
        };
        self.evaluations.insert(evaluation.id.clone(), evaluation);
        true
    }

    /// Replaces an existing evaluation by id after re-validation.
    pub(crate) fn update(&mut self, evaluation: Evaluation) -> bool {
        if !self.evaluations.contains_key(&evaluation.id) {
            return false;
        }
        let Some(evaluation) = normalize(evaluation) else {
            return false;
        };
        self.evaluations.insert(evaluation.id.clone(), evaluation);
        true
    }

    pub(crate) fn remove(&mut self, id: &str) -> bool {
        self.evaluations.remove(id).is_some()
    }

    pub(crate) fn get(&self, id: &str) -> Option<&Evaluation> {
        self.evaluations.get(id)
    }

    pub(crate) fn list_for_course(&self, course_id: &str) -> Vec<&Evaluation> {
        let mut list: Vec<&Evaluation> = self
            .evaluations
            .values()
            .filter(|evaluation| evaluation.course_id == course_id)
            .collect();
        list.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        list
    }

    /// Weighted mean over graded evaluations, scaled back to a full
    /// denominator. Returns 0.0 when nothing is graded yet, which is
    /// indistinguishable from a computed zero.
    pub(crate) fn current_average(&self, course_id: &str) -> f64 {
        let graded: Vec<&Evaluation> = self
            .evaluations
            .values()
            .filter(|evaluation| evaluation.course_id == course_id && evaluation.is_graded())
            .collect();

        let graded_weight: f64 = graded.iter().map(|evaluation| evaluation.weight).sum();
        if graded_weight <= EPSILON {
            return 0.0;
        }

        let contribution: f64 =
            graded.iter().filter_map(|evaluation| evaluation.weighted_contribution()).sum();
        contribution / (graded_weight / 100.0)
    }

    /// Points banked towards the 100-point course total, per-variant formula.
    pub(crate) fn points_obtained(&self, course_id: &str) -> f64 {
        self.evaluations
            .values()
            .filter(|evaluation| evaluation.course_id == course_id)
            .filter_map(|evaluation| evaluation.points_obtained())
            .sum()
    }

    /// Closed-form projection of the grade needed on the pending weight to
    /// reach `target`. With no pending weight left the current average is
    /// returned unchanged and only the `achieved` flag is meaningful.
    pub(crate) fn grade_needed(&self, course_id: &str, target: f64) -> GradeProjection {
        let evaluations: Vec<&Evaluation> = self
            .evaluations
            .values()
            .filter(|evaluation| evaluation.course_id == course_id)
            .collect();

        let evaluated_weight: f64 = evaluations
            .iter()
            .filter(|evaluation| evaluation.is_graded())
            .map(|evaluation| evaluation.weight)
            .sum();
        let pending_weight: f64 = evaluations
            .iter()
            .filter(|evaluation| !evaluation.is_graded())
            .map(|evaluation| evaluation.weight)
            .sum();

        let current_average = self.current_average(course_id);
        let points_obtained = self.points_obtained(course_id);
        let target_points = target / GRADE_MAX * 100.0;

        if pending_weight <= EPSILON {
            let achieved = points_obtained + EPSILON >= target_points;
            return GradeProjection {
                current_average,
                needed_grade: current_average,
                points_obtained,
                evaluated_weight,
                pending_weight: 0.0,
                achievable: achieved,
                achieved,
            };
        }

        let remaining_points = target_points - points_obtained;
        let needed_grade = (remaining_points / pending_weight * GRADE_MAX).max(GRADE_MIN);

        GradeProjection {
            current_average,
            needed_grade,
            points_obtained,
            evaluated_weight,
            pending_weight,
            achievable: needed_grade <= GRADE_MAX + EPSILON,
            achieved: false,
        }
    }
}

/// Validates an evaluation and enforces the grade/status invariant: status is
/// `completed` exactly when a grade is set. Returns `None` on any violation.
fn normalize(mut evaluation: Evaluation) -> Option<Evaluation> {
    if evaluation.name.trim().is_empty() || evaluation.course_id.trim().is_empty() {
        return None;
    }
    if !(0.0..=100.0).contains(&evaluation.weight) {
        return None;
    }
    if evaluation.date <= 0 {
        return None;
    }
    if let Some(grade) = evaluation.grade {
        if !(GRADE_MIN..=GRADE_MAX).contains(&grade) {
            return None;
        }
        evaluation.status = EvaluationStatus::Completed;
    } else if evaluation.status == EvaluationStatus::Completed {
        evaluation.status = EvaluationStatus::Pending;
    }
    if let EvaluationSource::Manual { max_grade } = evaluation.source {
        if max_grade <= 0.0 {
            return None;
        }
    }

    Some(evaluation)
}
