// src/record.rs
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Severity of an embedded application log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Info
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "critical" | "fatal" => Ok(Severity::Critical),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// One embedded application log entry: message text plus severity
#[derive(Debug, Clone, Deserialize)]
pub struct LogLine {
    pub message: String,
    #[serde(default)]
    pub severity: Severity,
}

impl LogLine {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        LogLine {
            message: message.into(),
            severity,
        }
    }
}

/// One request's aggregated logging data: HTTP metadata plus zero or more
/// embedded application log lines, in emission order.
///
/// Read-only input to the exporters - nothing in this crate retains a record
/// beyond a single `process_log` call.
#[derive(Debug, Clone, Deserialize)]
pub struct LogRecord {
    /// Request start time (RFC 3339)
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub lines: Vec<LogLine>,
}

impl LogRecord {
    pub fn new(start_time: DateTime<Utc>) -> Self {
        LogRecord {
            start_time,
            method: None,
            resource: None,
            status: None,
            lines: Vec::new(),
        }
    }

    pub fn with_lines(mut self, lines: Vec<LogLine>) -> Self {
        self.lines = lines;
        self
    }
}
