// src/exporter/mod.rs
pub mod applog;
pub mod coerce;
pub mod http;

pub use applog::{AppLogExporter, AppLogOptions};
pub use http::{RequestInfoExporter, TimestampExporter};

use crate::record::LogRecord;
use crate::schema::{FieldType, FieldValue, Schema};

/// Payload portion of a matched application log line: the raw text after the
/// `AppLog<DELIM>` tag plus its parsed JSON document.
#[derive(Debug, Clone)]
pub struct ParsedEntry {
    raw: String,
    doc: serde_json::Value,
}

impl ParsedEntry {
    pub(crate) fn new(raw: String, doc: serde_json::Value) -> Self {
        ParsedEntry { raw, doc }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn doc(&self) -> &serde_json::Value {
        &self.doc
    }

    /// The logical `type` discriminator carried by the entry
    pub fn entry_type(&self) -> Option<&str> {
        self.doc.get("type").and_then(serde_json::Value::as_str)
    }

    /// The nested `data` object holding the entry's named values
    pub fn data(&self) -> Option<&serde_json::Map<String, serde_json::Value>> {
        self.doc.get("data").and_then(serde_json::Value::as_object)
    }
}

/// A FieldExporter converts a `LogRecord` into a set of named, typed fields.
///
/// The schema accessors are used once to register the output columns. Then,
/// for each record, `process_log` is called, followed by one `field` call per
/// column to assemble a row. Line-oriented exporters produce one row per
/// matched application log line; the row builder steps the internal cursor
/// with `advance_line` before each row's `field` calls.
///
/// `process_log` is total: malformed input never surfaces as an error, it
/// only shrinks the matched set or yields absent fields.
///
/// An instance is not safe for concurrent use (the cursor and matched
/// entries are single-writer state), but instances may move between worker
/// threads that each own one record at a time.
pub trait FieldExporter: Send {
    /// Ingest one record, discarding all state derived from the previous one
    fn process_log(&mut self, record: &LogRecord);

    /// Value of the named field for the current state. `Absent` when the
    /// name is not one of this exporter's fields, the underlying data is
    /// missing or malformed, or (for line-oriented exporters) the cursor
    /// points at no line.
    fn field(&self, name: &str) -> FieldValue;

    /// The static (name, type) column list this exporter produces
    fn schema(&self) -> &Schema;

    fn field_count(&self) -> usize {
        self.schema().len()
    }

    /// Name of the i'th field; index-consistent with `field_type`
    fn field_name(&self, i: usize) -> &str {
        self.schema().name(i)
    }

    /// Type of the i'th field; index-consistent with `field_name`
    fn field_type(&self, i: usize) -> FieldType {
        self.schema().field_type(i)
    }

    /// Whether this exporter produces one row per matched line (`true`)
    /// rather than exactly one row per record (`false`)
    fn is_line_oriented(&self) -> bool {
        false
    }

    /// Entries matched during the last `process_log` call, in encountered
    /// order. Empty for non-line-oriented exporters.
    fn matched_entries(&self) -> &[ParsedEntry] {
        &[]
    }

    /// Move the cursor to the next matched entry. Returns false (leaving the
    /// cursor where it is) once the last entry has been visited, or
    /// immediately when nothing matched.
    fn advance_line(&mut self) -> bool {
        false
    }
}
