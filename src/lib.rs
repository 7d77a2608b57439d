// src/lib.rs
pub mod config;
pub mod error;
pub mod exporter;
pub mod output_format;
pub mod pipeline;
pub mod record;
pub mod row;
pub mod schema;

pub use error::*;

pub use config::{ExportConfig, ExporterSpec, FieldSpec};
pub use exporter::{
    AppLogExporter, AppLogOptions, FieldExporter, ParsedEntry, RequestInfoExporter,
    TimestampExporter,
};
pub use output_format::{OutputFormat, RowWriter};
pub use pipeline::{ErrorStrategy, ExportPipeline, ExportStats, PipelineConfig};
pub use record::{LogLine, LogRecord, Severity};
pub use row::{Row, RowBuilder};
pub use schema::{FieldType, FieldValue, Schema};
