use std::collections::HashMap;

use serde::Serialize;

pub(crate) mod attendance;
pub(crate) mod course;
pub(crate) mod evaluation;
pub(crate) mod extraction;
pub(crate) mod schedule;

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) service: String,
    pub(crate) status: String,
    pub(crate) components: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RootResponse {
    pub(crate) message: String,
    pub(crate) version: String,
}
