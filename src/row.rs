// src/row.rs
use crate::error::ConfigError;
use crate::exporter::FieldExporter;
use crate::record::LogRecord;
use crate::schema::{FieldValue, Schema};

/// One output row: values ordered to the row builder's merged schema
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<FieldValue>,
}

impl Row {
    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Drives a set of exporters to turn one record into zero or more rows.
///
/// The merged schema concatenates each exporter's columns in registration
/// order. Records with no line-oriented exporter produce exactly one row;
/// with one, each matched application log line produces a row and the
/// metadata exporters repeat their values on every row. At most one
/// line-oriented exporter is allowed per builder.
pub struct RowBuilder {
    exporters: Vec<Box<dyn FieldExporter>>,
    schema: Schema,
    line_exporter: Option<usize>,
}

impl RowBuilder {
    pub fn new(exporters: Vec<Box<dyn FieldExporter>>) -> Result<Self, ConfigError> {
        if exporters.is_empty() {
            return Err(ConfigError::InvalidSchema(
                "at least one exporter is required".to_string(),
            ));
        }

        let mut schema = Schema::empty();
        let mut line_exporter = None;
        for (i, exporter) in exporters.iter().enumerate() {
            schema.merge(exporter.schema())?;
            if exporter.is_line_oriented() {
                if line_exporter.is_some() {
                    return Err(ConfigError::InvalidSchema(
                        "more than one line-oriented exporter".to_string(),
                    ));
                }
                line_exporter = Some(i);
            }
        }

        Ok(RowBuilder {
            exporters,
            schema,
            line_exporter,
        })
    }

    /// The merged (name, type) column list, in output order
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Produce all rows for one record. The record must be fully processed
    /// (this call returns) before the next record is passed in.
    pub fn process(&mut self, record: &LogRecord) -> Vec<Row> {
        for exporter in &mut self.exporters {
            exporter.process_log(record);
        }

        match self.line_exporter {
            None => vec![self.collect_row()],
            Some(idx) => {
                let mut rows = Vec::new();
                while self.exporters[idx].advance_line() {
                    rows.push(self.collect_row());
                }
                rows
            }
        }
    }

    fn collect_row(&self) -> Row {
        let mut values = Vec::with_capacity(self.schema.len());
        for exporter in &self.exporters {
            for i in 0..exporter.field_count() {
                values.push(exporter.field(exporter.field_name(i)));
            }
        }
        Row { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exporter::{AppLogExporter, RequestInfoExporter, TimestampExporter};
    use crate::record::{LogLine, Severity};
    use crate::schema::FieldType;
    use chrono::{TimeZone, Utc};

    fn login_exporter() -> AppLogExporter {
        let schema = Schema::new(vec![
            ("accountId".to_string(), FieldType::String),
            ("playerId".to_string(), FieldType::Integer),
        ])
        .unwrap();
        AppLogExporter::new("login", schema)
    }

    fn login_line(account: &str, player: i64) -> LogLine {
        LogLine::new(
            format!(
                "prefix AppLog\t{{\"type\":\"login\",\"data\":{{\"accountId\":\"{}\",\"playerId\":{}}}}}",
                account, player
            ),
            Severity::Info,
        )
    }

    #[test]
    fn test_merged_schema_order() {
        let builder = RowBuilder::new(vec![
            Box::new(TimestampExporter::new()),
            Box::new(login_exporter()),
        ])
        .unwrap();

        let names: Vec<&str> = builder.schema().iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["timestamp", "accountId", "playerId"]);
    }

    #[test]
    fn test_duplicate_field_across_exporters_rejected() {
        let other = AppLogExporter::new(
            "other",
            Schema::new(vec![("timestamp".to_string(), FieldType::Integer)]).unwrap(),
        );
        let result = RowBuilder::new(vec![Box::new(TimestampExporter::new()), Box::new(other)]);
        assert!(matches!(result, Err(ConfigError::InvalidSchema(_))));
    }

    #[test]
    fn test_two_line_oriented_exporters_rejected() {
        let result = RowBuilder::new(vec![
            Box::new(login_exporter()),
            Box::new(AppLogExporter::new(
                "logout",
                Schema::new(vec![("reason".to_string(), FieldType::String)]).unwrap(),
            )),
        ]);
        assert!(matches!(result, Err(ConfigError::InvalidSchema(_))));
    }

    #[test]
    fn test_metadata_only_set_yields_one_row_per_record() {
        let mut builder = RowBuilder::new(vec![
            Box::new(TimestampExporter::new()),
            Box::new(RequestInfoExporter::new()),
        ])
        .unwrap();

        let mut record = LogRecord::new(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap());
        record.status = Some(204);

        let rows = builder.process(&record);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].values()[0], FieldValue::Integer(1_709_287_200_000_000));
        assert_eq!(rows[0].values()[3], FieldValue::Integer(204));
    }

    #[test]
    fn test_line_oriented_set_yields_one_row_per_matched_line() {
        let mut builder = RowBuilder::new(vec![
            Box::new(TimestampExporter::new()),
            Box::new(login_exporter()),
        ])
        .unwrap();

        let record = LogRecord::new(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap())
            .with_lines(vec![login_line("t4", 1111), login_line("u9", 2222)]);

        let rows = builder.process(&record);
        assert_eq!(rows.len(), 2);
        // metadata column repeats on every row
        assert_eq!(rows[0].values()[0], rows[1].values()[0]);
        assert_eq!(rows[0].values()[1], FieldValue::Str("t4".to_string()));
        assert_eq!(rows[0].values()[2], FieldValue::Integer(1111));
        assert_eq!(rows[1].values()[1], FieldValue::Str("u9".to_string()));
        assert_eq!(rows[1].values()[2], FieldValue::Integer(2222));
    }

    #[test]
    fn test_zero_matched_lines_yields_zero_rows() {
        let mut builder = RowBuilder::new(vec![Box::new(login_exporter())]).unwrap();
        let record = LogRecord::new(Utc::now())
            .with_lines(vec![LogLine::new("nothing structured", Severity::Info)]);
        assert!(builder.process(&record).is_empty());
    }

    #[test]
    fn test_rows_reflect_latest_record_only() {
        let mut builder = RowBuilder::new(vec![Box::new(login_exporter())]).unwrap();

        let first = LogRecord::new(Utc::now()).with_lines(vec![login_line("t4", 1)]);
        let rows = builder.process(&first);
        assert_eq!(rows.len(), 1);

        let second = LogRecord::new(Utc::now()).with_lines(vec![login_line("u9", 2)]);
        let rows = builder.process(&second);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].values()[0], FieldValue::Str("u9".to_string()));
    }
}
