use std::collections::HashMap;

use crate::domain::models::ScheduleEntry;

/// In-memory map of weekly schedule entries keyed by id.
#[derive(Debug, Default)]
pub(crate) struct ScheduleRegistry {
    entries: HashMap<String, ScheduleEntry>,
}

impl ScheduleRegistry {
    pub(crate) fn from_records(records: Vec<ScheduleEntry>) -> Self {
        let entries = records.into_iter().map(|record| (record.id.clone(), record)).collect();
        Self { entries }
    }

    /// Snapshot ordered by weekday then start time.
    pub(crate) fn records(&self) -> Vec<ScheduleEntry> {
        let mut records: Vec<ScheduleEntry> = self.entries.values().cloned().collect();
        records.sort_by(|a, b| {
            a.weekday
                .cmp(&b.weekday)
                .then_with(|| a.start_time.cmp(&b.start_time))
                .then_with(|| a.id.cmp(&b.id))
        });
        records
    }

    pub(crate) fn add(&mut self, entry: ScheduleEntry) -> bool {
        if !is_valid(&entry) {
            return false;
        }
        self.entries.insert(entry.id.clone(), entry);
        true
    }

    pub(crate) fn remove(&mut self, id: &str) -> bool {
        self.entries.remove(id).is_some()
    }
}

fn is_valid(entry: &ScheduleEntry) -> bool {
    !entry.course_name.trim().is_empty()
        && is_clock_time(&entry.start_time)
        && is_clock_time(&entry.end_time)
        && entry.start_time < entry.end_time
}

/// `HH:MM`, 24-hour clock. Lexicographic order on the canonical form matches
/// chronological order, which the registry ordering relies on.
fn is_clock_time(value: &str) -> bool {
    let Some((hours, minutes)) = value.split_once(':') else {
        return false;
    };
    if hours.len() != 2 || minutes.len() != 2 {
        return false;
    }
    let (Ok(hours), Ok(minutes)) = (hours.parse::<u8>(), minutes.parse::<u8>()) else {
        return false;
    };
    hours < 24 && minutes < 60
}
