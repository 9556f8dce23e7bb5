use std::sync::Arc;

use tokio::sync::RwLock;

use crate::core::config::Settings;
use crate::managers::attendance::AttendanceManager;
use crate::managers::courses::CourseRegistry;
use crate::managers::grades::GradeManager;
use crate::managers::schedule::ScheduleRegistry;
use crate::services::store::FileStore;
use crate::services::vision::VisionService;

/// Shared application state. The managers hold all records in memory; the
/// file store is their only durability. Handlers take the relevant lock,
/// mutate, then flush a snapshot back through the store.
#[derive(Clone)]
pub(crate) struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    settings: Settings,
    store: FileStore,
    courses: RwLock<CourseRegistry>,
    grades: RwLock<GradeManager>,
    attendance: RwLock<AttendanceManager>,
    schedule: RwLock<ScheduleRegistry>,
    vision: Option<VisionService>,
}

impl AppState {
    pub(crate) fn new(
        settings: Settings,
        store: FileStore,
        courses: CourseRegistry,
        grades: GradeManager,
        attendance: AttendanceManager,
        schedule: ScheduleRegistry,
        vision: Option<VisionService>,
    ) -> Self {
        Self {
            inner: Arc::new(InnerState {
                settings,
                store,
                courses: RwLock::new(courses),
                grades: RwLock::new(grades),
                attendance: RwLock::new(attendance),
                schedule: RwLock::new(schedule),
                vision,
            }),
        }
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub(crate) fn store(&self) -> &FileStore {
        &self.inner.store
    }

    pub(crate) fn courses(&self) -> &RwLock<CourseRegistry> {
        &self.inner.courses
    }

    pub(crate) fn grades(&self) -> &RwLock<GradeManager> {
        &self.inner.grades
    }

    pub(crate) fn attendance(&self) -> &RwLock<AttendanceManager> {
        &self.inner.attendance
    }

    pub(crate) fn schedule(&self) -> &RwLock<ScheduleRegistry> {
        &self.inner.schedule
    }

    pub(crate) fn vision(&self) -> Option<&VisionService> {
        self.inner.vision.as_ref()
    }
}
