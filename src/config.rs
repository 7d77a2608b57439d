// src/config.rs - YAML exporter configuration
use serde::Deserialize;
use std::path::Path;

use crate::error::ConfigError;
use crate::exporter::{
    AppLogExporter, AppLogOptions, FieldExporter, RequestInfoExporter, TimestampExporter,
};
use crate::record::Severity;
use crate::row::RowBuilder;
use crate::schema::{FieldType, Schema};

/// One declared field of an applog exporter
#[derive(Debug, Clone, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

/// One exporter declaration
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExporterSpec {
    /// Structured application log lines of one logical type
    Applog {
        log_type: String,
        fields: Vec<FieldSpec>,
        #[serde(default)]
        delimiter: Option<String>,
        #[serde(default)]
        level: Option<Severity>,
    },
    /// Request start time in epoch microseconds
    Timestamp,
    /// Request method/resource/status
    RequestInfo,
}

/// Deployment configuration: the ordered exporter set for one output table
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    pub exporters: Vec<ExporterSpec>,
}

impl ExportConfig {
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: ExportConfig = serde_yaml::from_str(content)?;
        if config.exporters.is_empty() {
            return Err(ConfigError::InvalidSchema(
                "config declares no exporters".to_string(),
            ));
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Instantiate the declared exporters and wire them into a row builder
    pub fn build(&self) -> Result<RowBuilder, ConfigError> {
        let mut exporters: Vec<Box<dyn FieldExporter>> = Vec::with_capacity(self.exporters.len());
        for spec in &self.exporters {
            exporters.push(spec.build()?);
        }
        RowBuilder::new(exporters)
    }
}

impl ExporterSpec {
    fn build(&self) -> Result<Box<dyn FieldExporter>, ConfigError> {
        match self {
            ExporterSpec::Applog {
                log_type,
                fields,
                delimiter,
                level,
            } => {
                let schema = Schema::new(
                    fields
                        .iter()
                        .map(|f| (f.name.clone(), f.field_type))
                        .collect(),
                )?;
                let mut options = AppLogOptions::default();
                if let Some(delimiter) = delimiter {
                    options.delimiter = delimiter.clone();
                }
                if let Some(level) = level {
                    options.level = *level;
                }
                Ok(Box::new(AppLogExporter::with_options(
                    log_type.clone(),
                    schema,
                    options,
                )?))
            }
            ExporterSpec::Timestamp => Ok(Box::new(TimestampExporter::new())),
            ExporterSpec::RequestInfo => Ok(Box::new(RequestInfoExporter::new())),
        }
    }
}
