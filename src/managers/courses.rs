use std::collections::HashMap;

use thiserror::Error;

use crate::domain::models::{Course, GRADE_MAX, GRADE_MIN};
use crate::domain::types::CourseStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub(crate) enum LifecycleError {
    #[error("course not found")]
    NotFound,
    #[error("course is not active")]
    NotActive,
    #[error("course is already active")]
    AlreadyActive,
    #[error("archive target status must not be active")]
    InvalidTarget,
}

/// In-memory map of courses keyed by id. Courses reference their evaluations
/// and attendance records only through `course_id` on those records; removing
/// a course does not cascade.
#[derive(Debug, Default)]
pub(crate) struct CourseRegistry {
    courses: HashMap<String, Course>,
}

impl CourseRegistry {
    pub(crate) fn from_records(records: Vec<Course>) -> Self {
        let courses = records.into_iter().map(|record| (record.id.clone(), record)).collect();
        Self { courses }
    }

    pub(crate) fn records(&self) -> Vec<Course> {
        let mut records: Vec<Course> = self.courses.values().cloned().collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        records
    }

    pub(crate) fn add(&mut self, course: Course) -> bool {
        if !is_valid(&course) {
            return false;
        }
        self.courses.insert(course.id.clone(), course);
        true
    }

    pub(crate) fn update(&mut self, course: Course) -> bool {
        if !self.courses.contains_key(&course.id) || !is_valid(&course) {
            return false;
        }
        self.courses.insert(course.id.clone(), course);
        true
    }

    pub(crate) fn remove(&mut self, id: &str) -> bool {
        self.courses.remove(id).is_some()
    }

    pub(crate) fn get(&self, id: &str) -> Option<&Course> {
        self.courses.get(id)
    }

    /// Moves an active course into a terminal status, stamping the archive
    /// time and an optional final grade.
    pub(crate) fn archive(
        &mut self,
        id: &str,
        status: CourseStatus,
        final_grade: Option<f64>,
        archived_at: i64,
    ) -> Result<&Course, LifecycleError> {
        if status.is_active() {
            return Err(LifecycleError::InvalidTarget);
        }
        let course = self.courses.get_mut(id).ok_or(LifecycleError::NotFound)?;
        if !course.status.is_active() {
            return Err(LifecycleError::NotActive);
        }

        course.status = status;
        course.final_grade = final_grade;
        course.archived_at = Some(archived_at);
        Ok(course)
    }

    /// Returns an archived course to active, clearing the final grade and the
    /// archive timestamp.
    pub(crate) fn reactivate(&mut self, id: &str) -> Result<&Course, LifecycleError> {
        let course = self.courses.get_mut(id).ok_or(LifecycleError::NotFound)?;
        if course.status.is_active() {
            return Err(LifecycleError::AlreadyActive);
        }

        course.status = CourseStatus::Active;
        course.final_grade = None;
        course.archived_at = None;
        Ok(course)
    }
}

fn is_valid(course: &Course) -> bool {
    !course.name.trim().is_empty()
        && !course.code.trim().is_empty()
        && (0.0..=100.0).contains(&course.min_attendance)
        && (GRADE_MIN..=GRADE_MAX).contains(&course.min_grade)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(id: &str) -> Course {
        Course {
            id: id.to_string(),
            name: "General Chemistry".to_string(),
            code: "CHEM-101".to_string(),
            min_attendance: 75.0,
            min_grade: 4.0,
            status: CourseStatus::Active,
            final_grade: None,
            archived_at: None,
            created_at: 1_700_000_000,
        }
    }

    #[test]
    fn add_rejects_invalid_thresholds() {
        let mut registry = CourseRegistry::default();

        let mut blank = course("c1");
        blank.name = "".to_string();
        assert!(!registry.add(blank));

        let mut attendance = course("c2");
        attendance.min_attendance = 101.0;
        assert!(!registry.add(attendance));

        let mut grade = course("c3");
        grade.min_grade = 0.5;
        assert!(!registry.add(grade));

        assert!(registry.records().is_empty());
    }

    #[test]
    fn archive_requires_active_course_and_terminal_status() {
        let mut registry = CourseRegistry::default();
        assert!(registry.add(course("c1")));

        assert_eq!(
            registry.archive("c1", CourseStatus::Active, None, 10),
            Err(LifecycleError::InvalidTarget)
        );
        assert_eq!(
            registry.archive("missing", CourseStatus::Passed, None, 10),
            Err(LifecycleError::NotFound)
        );

        let archived =
            registry.archive("c1", CourseStatus::Passed, Some(5.8), 10).expect("archive");
        assert_eq!(archived.status, CourseStatus::Passed);
        assert_eq!(archived.final_grade, Some(5.8));
        assert_eq!(archived.archived_at, Some(10));

        // Already archived: no second archive.
        assert_eq!(
            registry.archive("c1", CourseStatus::Failed, None, 20),
            Err(LifecycleError::NotActive)
        );
    }

    #[test]
    fn reactivate_clears_archive_fields() {
        let mut registry = CourseRegistry::default();
        assert!(registry.add(course("c1")));
        assert_eq!(registry.reactivate("c1"), Err(LifecycleError::AlreadyActive));

        registry.archive("c1", CourseStatus::Withdrawn, Some(3.0), 10).expect("archive");
        let revived = registry.reactivate("c1").expect("reactivate");
        assert_eq!(revived.status, CourseStatus::Active);
        assert_eq!(revived.final_grade, None);
        assert_eq!(revived.archived_at, None);
    }

    #[test]
    fn remove_does_not_require_archive() {
        let mut registry = CourseRegistry::default();
        assert!(registry.add(course("c1")));
        assert!(registry.remove("c1"));
        assert!(!registry.remove("c1"));
    }
}
