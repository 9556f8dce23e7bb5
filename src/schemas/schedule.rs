use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::models::ScheduleEntry;
use crate::domain::types::{ClassType, Weekday};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ScheduleEntryCreate {
    #[validate(length(min = 1, message = "course_name must not be empty"))]
    pub(crate) course_name: String,
    #[serde(default)]
    pub(crate) room: String,
    #[serde(default)]
    pub(crate) instructor: String,
    pub(crate) weekday: Weekday,
    pub(crate) start_time: String,
    pub(crate) end_time: String,
    #[serde(default = "default_class_type")]
    pub(crate) class_type: ClassType,
}

fn default_class_type() -> ClassType {
    ClassType::Lecture
}

impl ScheduleEntryCreate {
    pub(crate) fn into_model(self, id: String) -> ScheduleEntry {
        ScheduleEntry {
            id,
            course_name: self.course_name,
            room: self.room,
            instructor: self.instructor,
            weekday: self.weekday,
            start_time: self.start_time,
            end_time: self.end_time,
            class_type: self.class_type,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ScheduleEntryResponse {
    pub(crate) id: String,
    pub(crate) course_name: String,
    pub(crate) room: String,
    pub(crate) instructor: String,
    pub(crate) weekday: Weekday,
    pub(crate) start_time: String,
    pub(crate) end_time: String,
    pub(crate) class_type: ClassType,
}

impl ScheduleEntryResponse {
    pub(crate) fn from_model(entry: &ScheduleEntry) -> Self {
        Self {
            id: entry.id.clone(),
            course_name: entry.course_name.clone(),
            room: entry.room.clone(),
            instructor: entry.instructor.clone(),
            weekday: entry.weekday,
            start_time: entry.start_time.clone(),
            end_time: entry.end_time.clone(),
            class_type: entry.class_type,
        }
    }
}
