use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::{json, Value};

use crate::core::config::Settings;
use crate::domain::models::{GRADE_MAX, GRADE_MIN};

const EVALUATION_SYSTEM_PROMPT: &str = r#"You extract grade information from a photographed university document (a returned exam, a grade report, or a course syllabus excerpt).

Look for a single evaluation and report it. If a field cannot be read, use null.

Respond with strict JSON only:
{
  "name": "evaluation name or null",
  "grade": <number on the 1.0-7.0 scale or null>,
  "weight": <percentage weight 0-100 or null>,
  "date": <unix timestamp in seconds or null>,
  "confidence": <0.0-1.0>
}
"#;

const SCHEDULE_SYSTEM_PROMPT: &str = r#"You extract a weekly class schedule from a photographed timetable.

Report every visible entry. Use 24-hour HH:MM times. weekday is one of monday..sunday. class_type is one of lecture, lab, seminar, other. If a field cannot be read, use an empty string.

Respond with strict JSON only:
{
  "entries": [
    {
      "course_name": "...",
      "room": "...",
      "instructor": "...",
      "weekday": "monday",
      "start_time": "08:30",
      "end_time": "10:00",
      "class_type": "lecture"
    }
  ],
  "confidence": <0.0-1.0>
}
"#;

/// Fields read from a photographed evaluation, best effort.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EvaluationScan {
    pub(crate) name: Option<String>,
    pub(crate) grade: Option<f64>,
    pub(crate) weight: Option<f64>,
    pub(crate) date: Option<i64>,
    pub(crate) confidence: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScheduleScanEntry {
    pub(crate) course_name: String,
    pub(crate) room: String,
    pub(crate) instructor: String,
    pub(crate) weekday: String,
    pub(crate) start_time: String,
    pub(crate) end_time: String,
    pub(crate) class_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScheduleScan {
    pub(crate) entries: Vec<ScheduleScanEntry>,
    pub(crate) confidence: f64,
}

/// Thin client for an OpenAI-compatible vision endpoint. One request per user
/// action: no retry, no backpressure; the caller turns failures into a
/// flagged result object.
#[derive(Debug, Clone)]
pub(crate) struct VisionService {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl VisionService {
    /// Returns `None` when no API key is configured; extraction endpoints
    /// then report an unconfigured collaborator instead of failing at boot.
    pub(crate) fn from_settings(settings: &Settings) -> Result<Option<Self>> {
        if settings.ai().api_key.is_empty() {
            return Ok(None);
        }

        let timeout = Duration::from_secs(settings.ai().request_timeout);
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Some(Self {
            client,
            api_key: settings.ai().api_key.clone(),
            base_url: settings.ai().base_url.trim_end_matches('/').to_string(),
            model: settings.ai().model.clone(),
            max_tokens: settings.ai().max_tokens,
            temperature: settings.ai().temperature,
        }))
    }

    pub(crate) async fn scan_evaluation(
        &self,
        image_base64: &str,
        hint: Option<&str>,
    ) -> Result<EvaluationScan> {
        let user_prompt = match hint {
            Some(hint) => format!("Extract the evaluation from this photo. Context: {hint}"),
            None => "Extract the evaluation from this photo.".to_string(),
        };

        let body = self.complete(EVALUATION_SYSTEM_PROMPT, &user_prompt, image_base64).await?;
        Ok(parse_evaluation_scan(&body))
    }

    pub(crate) async fn scan_schedule(&self, image_base64: &str) -> Result<ScheduleScan> {
        let body = self
            .complete(SCHEDULE_SYSTEM_PROMPT, "Extract the weekly schedule from this photo.", image_base64)
            .await?;
        Ok(parse_schedule_scan(&body))
    }

    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        image_base64: &str,
    ) -> Result<Value> {
        let timer = Instant::now();

        let content = vec![
            json!({"type": "text", "text": user_prompt}),
            json!({
                "type": "image_url",
                "image_url": {"url": format!("data:image/jpeg;base64,{image_base64}")}
            }),
        ];

        let payload = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": content}
            ],
            "max_completion_tokens": self.max_tokens,
            "temperature": self.temperature,
        });

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .context("Failed to call vision API")?;

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        if !status.is_success() {
            anyhow::bail!("Vision API error (status {status}): {body}");
        }

        let content = body
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(Value::as_str)
            .context("Missing vision response content")?;

        let parsed = parse_json_block(content)
            .with_context(|| format!("Vision response contained no JSON object: {content}"))?;

        tracing::info!(
            model = %self.model,
            duration_seconds = timer.elapsed().as_secs_f64(),
            tokens_used = body
                .get("usage")
                .and_then(|usage| usage.get("total_tokens"))
                .and_then(serde_json::Value::as_u64),
            "Vision extraction completed"
        );

        Ok(parsed)
    }
}

/// Pulls the first JSON object out of a model reply, tolerating markdown
/// fences and surrounding prose.
pub(crate) fn parse_json_block(content: &str) -> Option<Value> {
    let stripped = strip_code_fences(content);
    if let Ok(value) = serde_json::from_str::<Value>(stripped) {
        if value.is_object() {
            return Some(value);
        }
    }

    let start = stripped.find('{')?;
    let end = stripped.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&stripped[start..=end]).ok().filter(Value::is_object)
}

fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json", "JSON", ...) on the opening fence.
    let rest = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

pub(crate) fn parse_evaluation_scan(value: &Value) -> EvaluationScan {
    let grade = field_f64(value, "grade")
        .filter(|grade| (GRADE_MIN..=GRADE_MAX).contains(grade));
    EvaluationScan {
        name: value
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(ToString::to_string),
        grade,
        weight: field_f64(value, "weight").filter(|weight| (0.0..=100.0).contains(weight)),
        date: value.get("date").and_then(Value::as_i64).filter(|date| *date > 0),
        confidence: field_f64(value, "confidence").unwrap_or(0.0).clamp(0.0, 1.0),
    }
}

pub(crate) fn parse_schedule_scan(value: &Value) -> ScheduleScan {
    let entries = value
        .get("entries")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().map(parse_schedule_entry).collect())
        .unwrap_or_default();

    ScheduleScan {
        entries,
        confidence: field_f64(value, "confidence").unwrap_or(0.0).clamp(0.0, 1.0),
    }
}

fn parse_schedule_entry(value: &Value) -> ScheduleScanEntry {
    let text = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default()
            .to_string()
    };

    ScheduleScanEntry {
        course_name: text("course_name"),
        room: text("room"),
        instructor: text("instructor"),
        weekday: text("weekday").to_ascii_lowercase(),
        start_time: text("start_time"),
        end_time: text("end_time"),
        class_type: text("class_type").to_ascii_lowercase(),
    }
}

/// Models occasionally quote numbers; accept both forms.
fn field_f64(value: &Value, key: &str) -> Option<f64> {
    let field = value.get(key)?;
    field.as_f64().or_else(|| field.as_str().and_then(|text| text.trim().parse().ok()))
}
