// src/exporter/applog.rs
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ConfigError;
use crate::exporter::{coerce, FieldExporter, ParsedEntry};
use crate::record::{LogRecord, Severity};
use crate::schema::{FieldValue, Schema};

/// Tag marking the start of a structured application log payload
const APP_LOG_TAG: &str = "AppLog";

const DEFAULT_DELIMITER: &str = "\t";

static DEFAULT_TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| tag_regex(DEFAULT_DELIMITER).expect("default tag regex must compile"));

/// Greedy prefix match, so a message containing the tag twice splits at the
/// last occurrence
fn tag_regex(delimiter: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^.*{}{}", APP_LOG_TAG, regex::escape(delimiter)))
}

/// Per-exporter filter settings with deployment defaults
#[derive(Debug, Clone)]
pub struct AppLogOptions {
    /// Delimiter between the tag and the JSON payload
    pub delimiter: String,
    /// Only lines at exactly this severity are considered
    pub level: Severity,
}

impl Default for AppLogOptions {
    fn default() -> Self {
        AppLogOptions {
            delimiter: DEFAULT_DELIMITER.to_string(),
            level: Severity::Info,
        }
    }
}

/// Exporter for structured application log lines embedded in a request
/// record.
///
/// A line qualifies when its message matches
/// `<arbitrary prefix>AppLog<DELIM><JSON>`, the JSON parses to an object, and
/// the object's `type` equals this exporter's `log_type`. Qualifying payloads
/// are held in encountered order; the row builder walks them with
/// `advance_line` and pulls typed values out of each payload's `data` object.
pub struct AppLogExporter {
    log_type: String,
    schema: Schema,
    level: Severity,
    tag_regex: Regex,
    entries: Vec<ParsedEntry>,
    cursor: Option<usize>,
}

impl AppLogExporter {
    /// Exporter with the default tab delimiter and info level
    pub fn new(log_type: impl Into<String>, schema: Schema) -> Self {
        AppLogExporter {
            log_type: log_type.into(),
            schema,
            level: Severity::Info,
            tag_regex: DEFAULT_TAG_REGEX.clone(),
            entries: Vec::new(),
            cursor: None,
        }
    }

    pub fn with_options(
        log_type: impl Into<String>,
        schema: Schema,
        options: AppLogOptions,
    ) -> Result<Self, ConfigError> {
        Ok(AppLogExporter {
            log_type: log_type.into(),
            schema,
            level: options.level,
            tag_regex: tag_regex(&options.delimiter)?,
            entries: Vec::new(),
            cursor: None,
        })
    }

    pub fn log_type(&self) -> &str {
        &self.log_type
    }

    /// Payload text after the tag, or None when the message does not carry
    /// the tag
    fn split_payload<'a>(&self, message: &'a str) -> Option<&'a str> {
        self.tag_regex.find(message).map(|m| &message[m.end()..])
    }

    fn current_entry(&self) -> Option<&ParsedEntry> {
        self.cursor.and_then(|i| self.entries.get(i))
    }
}

impl FieldExporter for AppLogExporter {
    fn process_log(&mut self, record: &LogRecord) {
        // Previous record's state is fully replaced, even when nothing below
        // matches
        self.cursor = None;
        self.entries.clear();

        for line in &record.lines {
            if line.message.is_empty() {
                continue;
            }
            if line.severity != self.level {
                continue;
            }
            let payload = match self.split_payload(&line.message) {
                Some(payload) => payload,
                None => continue,
            };
            let doc = match serde_json::from_str::<serde_json::Value>(payload) {
                Ok(doc) => doc,
                Err(_) => continue,
            };
            if doc.get("type").and_then(serde_json::Value::as_str) != Some(self.log_type.as_str())
            {
                continue;
            }
            self.entries.push(ParsedEntry::new(payload.to_string(), doc));
        }
    }

    fn field(&self, name: &str) -> FieldValue {
        let field_type = match self.schema.lookup(name) {
            Some(field_type) => field_type,
            None => return FieldValue::Absent,
        };
        let entry = match self.current_entry() {
            Some(entry) => entry,
            None => return FieldValue::Absent,
        };
        // No data object means absent for every field, sentinel policy only
        // applies below this point
        let data = match entry.data() {
            Some(data) => data,
            None => return FieldValue::Absent,
        };
        coerce::coerce(field_type, data.get(name))
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn is_line_oriented(&self) -> bool {
        true
    }

    fn matched_entries(&self) -> &[ParsedEntry] {
        &self.entries
    }

    fn advance_line(&mut self) -> bool {
        let next = match self.cursor {
            None => 0,
            Some(i) => i + 1,
        };
        if next >= self.entries.len() {
            return false;
        }
        self.cursor = Some(next);
        true
    }
}
