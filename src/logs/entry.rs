//! Log entry types
//!
//! Both backends return their request log as loosely shaped JSON. This module
//! is the parsing boundary: every field is resolved here into a [`LogEntry`]
//! so the aggregation and rendering code never deals with missing values.
//!
//! - `RawLogEntry`: wire shape, every field optional and untyped
//! - `LogEntry`: validated record with sentinels for missing fields
//! - `LogField`: the categorical fields the dashboard groups by

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Category used for any missing or empty categorical field
pub const UNKNOWN: &str = "unknown";

/// A log record exactly as the backend sent it
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawLogEntry {
    #[serde(default)]
    pub log_level: Option<Value>,
    #[serde(default)]
    pub method: Option<Value>,
    #[serde(default)]
    pub status_code: Option<Value>,
    /// Usually a string with a unit suffix, e.g. `"12ms"`
    #[serde(default)]
    pub response_time: Option<Value>,
    #[serde(default)]
    pub timestamp: Option<Value>,
}

/// Body of `GET /logs` and `GET /logs2`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LogsPayload {
    /// Kept untyped so one malformed element cannot reject the whole array
    #[serde(default)]
    pub logs: Vec<Value>,
}

impl LogsPayload {
    /// Resolve every element into a validated entry.
    ///
    /// Elements that are not objects become an all-`unknown` entry so that
    /// counts still add up to the number of records the backend returned.
    pub fn into_entries(self) -> Vec<LogEntry> {
        self.logs
            .into_iter()
            .map(|value| {
                let raw = serde_json::from_value::<RawLogEntry>(value).unwrap_or_else(|e| {
                    tracing::debug!(error = %e, "Malformed log element, using sentinels");
                    RawLogEntry::default()
                });
                LogEntry::from(raw)
            })
            .collect()
    }
}

/// A validated log record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub level: String,
    pub method: String,
    pub status_code: String,
    /// Numeric part of the response time; 0 when missing or unparseable
    pub response_time_ms: u64,
    /// `None` when the backend sent no usable timestamp
    pub timestamp: Option<DateTime<Utc>>,
}

impl LogEntry {
    /// Builder used mostly by tests and demo data
    pub fn new(level: &str, method: &str, status_code: &str) -> Self {
        Self {
            level: category(level),
            method: category(method),
            status_code: category(status_code),
            response_time_ms: 0,
            timestamp: None,
        }
    }

    /// Builder method: set the response time in milliseconds
    pub fn response_time(mut self, ms: u64) -> Self {
        self.response_time_ms = ms;
        self
    }

    /// Builder method: set the timestamp
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Value of a categorical field
    pub fn field(&self, field: LogField) -> &str {
        match field {
            LogField::Level => &self.level,
            LogField::Method => &self.method,
            LogField::StatusCode => &self.status_code,
        }
    }
}

impl From<RawLogEntry> for LogEntry {
    fn from(raw: RawLogEntry) -> Self {
        Self {
            level: category_value(raw.log_level.as_ref()),
            method: category_value(raw.method.as_ref()),
            status_code: category_value(raw.status_code.as_ref()),
            response_time_ms: raw
                .response_time
                .as_ref()
                .map(parse_response_time)
                .unwrap_or(0),
            timestamp: raw.timestamp.as_ref().and_then(parse_timestamp),
        }
    }
}

/// Categorical fields of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogField {
    Level,
    Method,
    StatusCode,
}

impl LogField {
    pub const ALL: [LogField; 3] = [LogField::Level, LogField::Method, LogField::StatusCode];

    /// JSON key used by the backends
    pub fn wire_name(self) -> &'static str {
        match self {
            LogField::Level => "logLevel",
            LogField::Method => "method",
            LogField::StatusCode => "statusCode",
        }
    }
}

fn category(s: &str) -> String {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        UNKNOWN.to_string()
    } else {
        trimmed.to_string()
    }
}

fn category_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => category(s),
        // 0 and false count as missing
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
        Some(Value::Bool(true)) => "true".to_string(),
        _ => UNKNOWN.to_string(),
    }
}

/// Leading integer of a response time such as `"12ms"` or `" 7 ms"`
pub fn parse_response_time(value: &Value) -> u64 {
    match value {
        Value::String(s) => {
            let digits: String = s
                .trim_start()
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits.parse().unwrap_or(0)
        }
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        _ => 0,
    }
}

/// Parse the timestamp formats the backends are known to emit.
///
/// Accepts RFC 3339 strings, naive ISO date-times (taken as UTC), epoch
/// milliseconds as a number or numeric string, and serialized Firestore
/// timestamps (`{"_seconds": .., "_nanoseconds": ..}`).
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
                if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                    return Some(naive.and_utc());
                }
            }
            s.parse::<i64>().ok().and_then(DateTime::from_timestamp_millis)
        }
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        Value::Object(map) => {
            let seconds = map
                .get("_seconds")
                .or_else(|| map.get("seconds"))
                .and_then(Value::as_i64)?;
            let nanos = map
                .get("_nanoseconds")
                .or_else(|| map.get("nanoseconds"))
                .and_then(Value::as_u64)
                .unwrap_or(0);
            Utc.timestamp_opt(seconds, nanos as u32).single()
        }
        _ => None,
    }
}
