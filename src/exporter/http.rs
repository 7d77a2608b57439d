// src/exporter/http.rs - exporters over request metadata (one row per record)
use once_cell::sync::Lazy;

use crate::exporter::FieldExporter;
use crate::record::LogRecord;
use crate::schema::{FieldType, FieldValue, Schema};

static TIMESTAMP_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new(vec![("timestamp".to_string(), FieldType::Integer)])
        .expect("timestamp schema must build")
});

static REQUEST_INFO_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new(vec![
        ("method".to_string(), FieldType::String),
        ("resource".to_string(), FieldType::String),
        ("status".to_string(), FieldType::Integer),
    ])
    .expect("request info schema must build")
});

/// Exposes the request start time as a single integer field, in epoch
/// microseconds
#[derive(Debug, Default)]
pub struct TimestampExporter {
    timestamp: Option<i64>,
}

impl TimestampExporter {
    pub fn new() -> Self {
        TimestampExporter { timestamp: None }
    }
}

impl FieldExporter for TimestampExporter {
    fn process_log(&mut self, record: &LogRecord) {
        self.timestamp = Some(record.start_time.timestamp_micros());
    }

    fn field(&self, name: &str) -> FieldValue {
        if name != "timestamp" {
            return FieldValue::Absent;
        }
        match self.timestamp {
            Some(ts) => FieldValue::Integer(ts),
            None => FieldValue::Absent,
        }
    }

    fn schema(&self) -> &Schema {
        &TIMESTAMP_SCHEMA
    }
}

/// Exposes the request's method, resource and response status
#[derive(Debug, Default)]
pub struct RequestInfoExporter {
    method: Option<String>,
    resource: Option<String>,
    status: Option<i64>,
}

impl RequestInfoExporter {
    pub fn new() -> Self {
        RequestInfoExporter::default()
    }
}

impl FieldExporter for RequestInfoExporter {
    fn process_log(&mut self, record: &LogRecord) {
        self.method = record.method.clone();
        self.resource = record.resource.clone();
        self.status = record.status;
    }

    fn field(&self, name: &str) -> FieldValue {
        match name {
            "method" => self
                .method
                .clone()
                .map_or(FieldValue::Absent, FieldValue::Str),
            "resource" => self
                .resource
                .clone()
                .map_or(FieldValue::Absent, FieldValue::Str),
            "status" => self.status.map_or(FieldValue::Absent, FieldValue::Integer),
            _ => FieldValue::Absent,
        }
    }

    fn schema(&self) -> &Schema {
        &REQUEST_INFO_SCHEMA
    }
}
