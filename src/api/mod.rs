pub(crate) mod attendance;
pub(crate) mod courses;
pub(crate) mod errors;
pub(crate) mod evaluations;
pub(crate) mod extraction;
pub(crate) mod handlers;
pub(crate) mod router;
pub(crate) mod schedule;
