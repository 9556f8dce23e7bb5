pub(crate) mod attendance;
pub(crate) mod courses;
pub(crate) mod grades;
pub(crate) mod schedule;
