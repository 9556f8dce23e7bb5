use std::collections::HashMap;

use serde::Serialize;

use crate::domain::models::AttendanceRecord;
use crate::domain::types::AttendanceStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct AttendanceStats {
    /// Classes counting towards the percentage (everything but cancelled).
    pub(crate) countable: u32,
    pub(crate) attended: u32,
    pub(crate) absences: u32,
}

impl AttendanceStats {
    pub(crate) fn percentage(&self) -> f64 {
        if self.countable == 0 {
            return 100.0;
        }
        f64::from(self.attended) / f64::from(self.countable) * 100.0
    }
}

/// In-memory map of attendance records keyed by id.
#[derive(Debug, Default)]
pub(crate) struct AttendanceManager {
    records: HashMap<String, AttendanceRecord>,
}

impl AttendanceManager {
    pub(crate) fn from_records(records: Vec<AttendanceRecord>) -> Self {
        let records = records.into_iter().map(|record| (record.id.clone(), record)).collect();
        Self { records }
    }

    pub(crate) fn records(&self) -> Vec<AttendanceRecord> {
        let mut records: Vec<AttendanceRecord> = self.records.values().cloned().collect();
        records.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        records
    }

    /// Inserts after validation; invalid records are silently rejected.
    pub(crate) fn register(&mut self, record: AttendanceRecord) -> bool {
        if !is_valid(&record) {
            return false;
        }
        self.records.insert(record.id.clone(), record);
        true
    }

    pub(crate) fn update(&mut self, record: AttendanceRecord) -> bool {
        if !self.records.contains_key(&record.id) || !is_valid(&record) {
            return false;
        }
        self.records.insert(record.id.clone(), record);
        true
    }

    pub(crate) fn remove(&mut self, id: &str) -> bool {
        self.records.remove(id).is_some()
    }

    pub(crate) fn list_for_course(&self, course_id: &str) -> Vec<&AttendanceRecord> {
        let mut list: Vec<&AttendanceRecord> =
            self.records.values().filter(|record| record.course_id == course_id).collect();
        list.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        list
    }

    /// Present over non-cancelled, scaled to 100. A course without countable
    /// records reads as 100.0, indistinguishable from perfect attendance.
    pub(crate) fn percentage(&self, course_id: &str) -> f64 {
        self.statistics(course_id).percentage()
    }

    pub(crate) fn statistics(&self, course_id: &str) -> AttendanceStats {
        let mut countable = 0u32;
        let mut attended = 0u32;

        for record in self.records.values() {
            if record.course_id != course_id || !record.status.is_countable() {
                continue;
            }
            countable += 1;
            if record.status == AttendanceStatus::Present {
                attended += 1;
            }
        }

        AttendanceStats { countable, attended, absences: countable - attended }
    }
}

fn is_valid(record: &AttendanceRecord) -> bool {
    !record.course_id.trim().is_empty() && record.date > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            id: id.to_string(),
            course_id: "chem-101".to_string(),
            date: 1_700_000_000 + id.len() as i64,
            status,
        }
    }

    #[test]
    fn register_rejects_invalid_records() {
        let mut manager = AttendanceManager::default();

        let mut blank = record("a1", AttendanceStatus::Present);
        blank.course_id = "  ".to_string();
        assert!(!manager.register(blank));

        let mut undated = record("a2", AttendanceStatus::Present);
        undated.date = 0;
        assert!(!manager.register(undated));

        assert!(manager.records().is_empty());
    }

    #[test]
    fn percentage_is_100_without_records() {
        let manager = AttendanceManager::default();
        assert_eq!(manager.percentage("chem-101"), 100.0);
    }

    #[test]
    fn percentage_is_100_when_all_classes_cancelled() {
        let mut manager = AttendanceManager::default();
        assert!(manager.register(record("a1", AttendanceStatus::CancelledClass)));
        assert_eq!(manager.percentage("chem-101"), 100.0);
    }

    #[test]
    fn percentage_counts_present_over_non_cancelled() {
        let mut manager = AttendanceManager::default();
        for i in 0..7 {
            assert!(manager.register(record(&format!("p{i}"), AttendanceStatus::Present)));
        }
        assert!(manager.register(record("x1", AttendanceStatus::Absent)));
        assert!(manager.register(record("x2", AttendanceStatus::Absent)));
        assert!(manager.register(record("x3", AttendanceStatus::JustifiedAbsence)));
        // Cancelled classes stay out of the denominator.
        assert!(manager.register(record("x4", AttendanceStatus::CancelledClass)));

        assert!((manager.percentage("chem-101") - 70.0).abs() < 1e-9);
    }

    #[test]
    fn statistics_breaks_down_counts() {
        let mut manager = AttendanceManager::default();
        assert!(manager.register(record("a1", AttendanceStatus::Present)));
        assert!(manager.register(record("a2", AttendanceStatus::Absent)));
        assert!(manager.register(record("a3", AttendanceStatus::JustifiedAbsence)));
        assert!(manager.register(record("a4", AttendanceStatus::CancelledClass)));

        let stats = manager.statistics("chem-101");
        assert_eq!(stats.countable, 3);
        assert_eq!(stats.attended, 1);
        assert_eq!(stats.absences, 2);
    }

    #[test]
    fn update_and_remove_by_id() {
        let mut manager = AttendanceManager::default();
        assert!(manager.register(record("a1", AttendanceStatus::Absent)));

        let mut corrected = record("a1", AttendanceStatus::Present);
        corrected.date = 1_700_000_123;
        assert!(manager.update(corrected));
        assert_eq!(manager.statistics("chem-101").attended, 1);

        assert!(!manager.update(record("missing", AttendanceStatus::Present)));
        assert!(manager.remove("a1"));
        assert!(!manager.remove("a1"));
    }
}
