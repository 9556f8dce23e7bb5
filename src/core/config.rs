use std::env;
use std::path::Path;

use thiserror::Error;

use crate::domain::models::{GRADE_MAX, GRADE_MIN};

const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://localhost:3000",
    "http://localhost:8080",
];

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    server: ServerSettings,
    runtime: RuntimeSettings,
    api: ApiSettings,
    cors: CorsSettings,
    storage: StorageSettings,
    ai: AiSettings,
    course: CourseSettings,
    telemetry: TelemetrySettings,
}

#[derive(Debug, Clone)]
pub(crate) struct ServerSettings {
    host: ServerHost,
    port: ServerPort,
}

#[derive(Debug, Clone)]
pub(crate) struct ApiSettings {
    pub(crate) project_name: String,
    pub(crate) version: String,
    pub(crate) api_v1_str: String,
}

#[derive(Debug, Clone)]
pub(crate) struct CorsSettings {
    pub(crate) origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct StorageSettings {
    pub(crate) data_dir: String,
    pub(crate) max_upload_size_mb: u64,
}

#[derive(Debug, Clone)]
pub(crate) struct AiSettings {
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    pub(crate) model: String,
    pub(crate) max_tokens: u32,
    pub(crate) temperature: f64,
    pub(crate) request_timeout: u64,
}

/// Defaults applied to newly created courses when the client omits the
/// thresholds.
#[derive(Debug, Clone)]
pub(crate) struct CourseSettings {
    pub(crate) default_min_attendance: f64,
    pub(crate) default_min_grade: f64,
}

#[derive(Debug, Clone)]
pub(crate) struct TelemetrySettings {
    pub(crate) log_level: String,
    pub(crate) json: bool,
    pub(crate) prometheus_enabled: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct RuntimeSettings {
    pub(crate) environment: Environment,
    pub(crate) strict_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Environment {
    Development,
    Production,
    Staging,
    Test,
}

impl Environment {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Staging => "staging",
            Environment::Test => "test",
        }
    }

    fn is_production(self) -> bool {
        matches!(self, Environment::Production)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ServerHost(String);

#[derive(Debug, Clone, Copy)]
pub(crate) struct ServerPort(u16);

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("invalid server host: {0}")]
    InvalidHost(String),
    #[error("invalid server port: {0}")]
    InvalidPort(String),
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
    #[error("invalid cors origins: {0}")]
    InvalidCors(String),
    #[error("missing required secret for {0}")]
    MissingSecret(&'static str),
}

impl Settings {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let host = env_or_default("UNITRACK_HOST", "0.0.0.0");
        let port = env_or_default("UNITRACK_PORT", "8000");

        let environment = parse_environment(
            env_optional("UNITRACK_ENV").or_else(|| env_optional("ENVIRONMENT")),
        );
        let strict_config = env_optional("UNITRACK_STRICT_CONFIG")
            .map(|value| parse_bool(&value))
            .unwrap_or(false)
            || environment.is_production();

        let project_name = env_or_default("PROJECT_NAME", "UniTrack API");
        let version = env_or_default("VERSION", env!("CARGO_PKG_VERSION"));
        let api_v1_str = env_or_default("API_V1_STR", "/api/v1");

        let cors_origins = parse_cors_origins(env_optional("BACKEND_CORS_ORIGINS"))?;

        let data_dir = env_or_default("DATA_DIR", "data");
        let max_upload_size_mb =
            parse_u64("MAX_UPLOAD_SIZE_MB", env_or_default("MAX_UPLOAD_SIZE_MB", "10"))?;

        let api_key = env_or_default("OPENAI_API_KEY", "");
        let base_url = env_or_default("OPENAI_BASE_URL", "https://api.openai.com/v1");
        let model = env_or_default("AI_MODEL", "gpt-4o");
        let max_tokens = parse_u32("AI_MAX_TOKENS", env_or_default("AI_MAX_TOKENS", "4000"))?;
        let temperature = parse_f64("AI_TEMPERATURE", env_or_default("AI_TEMPERATURE", "0.1"))?;
        let request_timeout =
            parse_u64("AI_REQUEST_TIMEOUT", env_or_default("AI_REQUEST_TIMEOUT", "120"))?;

        let default_min_attendance = parse_f64(
            "DEFAULT_MIN_ATTENDANCE",
            env_or_default("DEFAULT_MIN_ATTENDANCE", "75"),
        )?;
        let default_min_grade =
            parse_f64("DEFAULT_MIN_GRADE", env_or_default("DEFAULT_MIN_GRADE", "4.0"))?;

        let log_level = env_or_default("UNITRACK_LOG_LEVEL", "info");
        let json =
            env_optional("UNITRACK_LOG_JSON").map(|value| parse_bool(&value)).unwrap_or(false);
        let prometheus_enabled =
            env_optional("PROMETHEUS_ENABLED").map(|value| parse_bool(&value)).unwrap_or(false);

        let settings = Self {
            server: ServerSettings {
                host: ServerHost::parse(host)?,
                port: ServerPort::parse(port)?,
            },
            runtime: RuntimeSettings { environment, strict_config },
            api: ApiSettings { project_name, version, api_v1_str },
            cors: CorsSettings { origins: cors_origins },
            storage: StorageSettings { data_dir, max_upload_size_mb },
            ai: AiSettings { api_key, base_url, model, max_tokens, temperature, request_timeout },
            course: CourseSettings { default_min_attendance, default_min_grade },
            telemetry: TelemetrySettings { log_level, json, prometheus_enabled },
        };

        settings.validate()?;

        Ok(settings)
    }

    pub(crate) fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host.0, self.server.port.0)
    }

    pub(crate) fn server_host(&self) -> &str {
        &self.server.host.0
    }

    pub(crate) fn server_port(&self) -> u16 {
        self.server.port.0
    }

    pub(crate) fn api(&self) -> &ApiSettings {
        &self.api
    }

    pub(crate) fn cors(&self) -> &CorsSettings {
        &self.cors
    }

    pub(crate) fn storage(&self) -> &StorageSettings {
        &self.storage
    }

    pub(crate) fn ai(&self) -> &AiSettings {
        &self.ai
    }

    pub(crate) fn course(&self) -> &CourseSettings {
        &self.course
    }

    pub(crate) fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }

    pub(crate) fn runtime(&self) -> &RuntimeSettings {
        &self.runtime
    }

    pub(crate) fn max_upload_size_bytes(&self) -> usize {
        self.storage.max_upload_size_mb as usize * 1024 * 1024
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.data_dir.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "DATA_DIR",
                value: String::from("<empty>"),
            });
        }

        if !(0.0..=100.0).contains(&self.course.default_min_attendance) {
            return Err(ConfigError::InvalidValue {
                field: "DEFAULT_MIN_ATTENDANCE",
                value: self.course.default_min_attendance.to_string(),
            });
        }

        if !(GRADE_MIN..=GRADE_MAX).contains(&self.course.default_min_grade) {
            return Err(ConfigError::InvalidValue {
                field: "DEFAULT_MIN_GRADE",
                value: self.course.default_min_grade.to_string(),
            });
        }

        if !(0.0..=2.0).contains(&self.ai.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "AI_TEMPERATURE",
                value: self.ai.temperature.to_string(),
            });
        }

        if !(self.runtime.strict_config || self.runtime.environment.is_production()) {
            return Ok(());
        }

        if self.ai.api_key.is_empty() {
            return Err(ConfigError::MissingSecret("OPENAI_API_KEY"));
        }

        if self.ai.base_url.is_empty() {
            return Err(ConfigError::MissingSecret("OPENAI_BASE_URL"));
        }

        let data_dir = Path::new(&self.storage.data_dir);
        if data_dir.exists() && !data_dir.is_dir() {
            return Err(ConfigError::InvalidValue {
                field: "DATA_DIR",
                value: self.storage.data_dir.clone(),
            });
        }

        Ok(())
    }
}

impl ServerHost {
    fn parse(value: String) -> Result<Self, ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::InvalidHost(value));
        }
        Ok(Self(value))
    }
}

impl ServerPort {
    fn parse(value: String) -> Result<Self, ConfigError> {
        let parsed: u16 = value.parse().map_err(|_| ConfigError::InvalidPort(value.clone()))?;
        if parsed == 0 {
            return Err(ConfigError::InvalidPort(value));
        }
        Ok(Self(parsed))
    }
}

fn env_optional(key: &str) -> Option<String> {
    env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

fn env_or_default(key: &str, default: &str) -> String {
    env_optional(key).unwrap_or_else(|| default.to_string())
}

fn parse_u32(field: &'static str, value: String) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidValue { field, value })
}

fn parse_u64(field: &'static str, value: String) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidValue { field, value })
}

fn parse_f64(field: &'static str, value: String) -> Result<f64, ConfigError> {
    value.parse::<f64>().map_err(|_| ConfigError::InvalidValue { field, value })
}

fn parse_cors_origins(value: Option<String>) -> Result<Vec<String>, ConfigError> {
    let Some(raw) = value else {
        return Ok(default_cors_origins());
    };

    if raw.trim().is_empty() {
        return Ok(default_cors_origins());
    }

    if raw.trim_start().starts_with('[') {
        let parsed: Vec<String> =
            serde_json::from_str(&raw).map_err(|_| ConfigError::InvalidCors(raw.clone()))?;
        if parsed.is_empty() {
            return Ok(default_cors_origins());
        }
        return Ok(parsed);
    }

    let items: Vec<String> = raw
        .split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();

    if items.is_empty() {
        return Ok(default_cors_origins());
    }

    Ok(items)
}

fn parse_bool(value: &str) -> bool {
    matches!(value, "1" | "true" | "TRUE" | "yes" | "YES" | "on" | "ON")
}

fn parse_environment(value: Option<String>) -> Environment {
    match value.as_deref().map(|val| val.to_lowercase()) {
        Some(ref val) if val == "production" || val == "prod" => Environment::Production,
        Some(ref val) if val == "staging" => Environment::Staging,
        Some(ref val) if val == "test" || val == "testing" => Environment::Test,
        _ => Environment::Development,
    }
}

fn default_cors_origins() -> Vec<String> {
    DEFAULT_CORS_ORIGINS.iter().map(|item| item.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cors_origins_json() {
        let raw = "[\"http://a\",\"http://b\"]".to_string();
        let parsed = parse_cors_origins(Some(raw)).expect("cors json");
        assert_eq!(parsed, vec!["http://a".to_string(), "http://b".to_string()]);
    }

    #[test]
    fn parse_cors_origins_csv() {
        let raw = "http://a, http://b".to_string();
        let parsed = parse_cors_origins(Some(raw)).expect("cors csv");
        assert_eq!(parsed, vec!["http://a".to_string(), "http://b".to_string()]);
    }

    #[test]
    fn parse_cors_origins_defaults_on_empty() {
        let parsed = parse_cors_origins(Some(" ".to_string())).expect("cors empty");
        assert_eq!(parsed, default_cors_origins());
    }

    #[test]
    fn parse_bool_variants() {
        assert!(parse_bool("1"));
        assert!(parse_bool("true"));
        assert!(parse_bool("yes"));
        assert!(parse_bool("on"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("0"));
    }

    #[test]
    fn parse_environment_variants() {
        assert_eq!(parse_environment(Some("prod".to_string())), Environment::Production);
        assert_eq!(parse_environment(Some("production".to_string())), Environment::Production);
        assert_eq!(parse_environment(Some("staging".to_string())), Environment::Staging);
        assert_eq!(parse_environment(Some("testing".to_string())), Environment::Test);
        assert_eq!(parse_environment(None), Environment::Development);
    }
}
