// src/output_format.rs
use std::io::Write;

use crate::error::ProcessingError;
use crate::row::Row;
use crate::schema::Schema;

#[derive(Debug, Clone, Copy, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    #[value(name = "jsonl", help = "JSON Lines format (one object per row)")]
    Jsonl,
    #[value(name = "csv", help = "Comma-separated values with a header row")]
    Csv,
    #[value(name = "tsv", help = "Tab-separated values with a header row")]
    Tsv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" => Ok(OutputFormat::Jsonl),
            "csv" => Ok(OutputFormat::Csv),
            "tsv" => Ok(OutputFormat::Tsv),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Jsonl
    }
}

/// Serializes rows to an output stream, one line per row.
///
/// Column order follows the merged schema. The csv/tsv formats emit a header
/// row of field names before the first data row.
pub struct RowWriter {
    format: OutputFormat,
    header_written: bool,
}

impl RowWriter {
    pub fn new(format: OutputFormat) -> Self {
        RowWriter {
            format,
            header_written: false,
        }
    }

    pub fn write_row<W: Write>(
        &mut self,
        output: &mut W,
        schema: &Schema,
        row: &Row,
    ) -> Result<(), ProcessingError> {
        match self.format {
            OutputFormat::Jsonl => self.write_jsonl(output, schema, row),
            OutputFormat::Csv => self.write_delimited(output, schema, row, b','),
            OutputFormat::Tsv => self.write_delimited(output, schema, row, b'\t'),
        }
    }

    fn write_jsonl<W: Write>(
        &self,
        output: &mut W,
        schema: &Schema,
        row: &Row,
    ) -> Result<(), ProcessingError> {
        // serde_json's preserve_order map keeps the schema's column order
        let mut object = serde_json::Map::with_capacity(schema.len());
        for (i, (name, _)) in schema.iter().enumerate() {
            object.insert(name.to_string(), row.values()[i].to_json());
        }
        writeln!(output, "{}", serde_json::Value::Object(object))?;
        Ok(())
    }

    fn write_delimited<W: Write>(
        &mut self,
        output: &mut W,
        schema: &Schema,
        row: &Row,
        delimiter: u8,
    ) -> Result<(), ProcessingError> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(Vec::new());

        if !self.header_written {
            let names: Vec<&str> = schema.iter().map(|(name, _)| name).collect();
            writer.write_record(&names).map_err(csv_io_error)?;
            self.header_written = true;
        }

        let cells: Vec<String> = row.values().iter().map(|v| v.to_cell()).collect();
        writer.write_record(&cells).map_err(csv_io_error)?;

        let buffer = writer
            .into_inner()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
        output.write_all(&buffer)?;
        Ok(())
    }
}

fn csv_io_error(err: csv::Error) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exporter::{AppLogExporter, FieldExporter};
    use crate::record::{LogLine, LogRecord, Severity};
    use crate::row::RowBuilder;
    use crate::schema::FieldType;
    use chrono::Utc;

    fn one_row() -> (Schema, Vec<Row>) {
        let schema = Schema::new(vec![
            ("accountId".to_string(), FieldType::String),
            ("playerId".to_string(), FieldType::Integer),
            ("premium".to_string(), FieldType::Boolean),
        ])
        .unwrap();
        let exporter = AppLogExporter::new("login", schema);
        let mut builder = RowBuilder::new(vec![Box::new(exporter) as Box<dyn FieldExporter>]).unwrap();

        let record = LogRecord::new(Utc::now()).with_lines(vec![LogLine::new(
            "AppLog\t{\"type\":\"login\",\"data\":{\"accountId\":\"t4\",\"playerId\":1111}}",
            Severity::Info,
        )]);
        let rows = builder.process(&record);
        (builder.schema().clone(), rows)
    }

    #[test]
    fn test_jsonl_output_preserves_column_order() {
        let (schema, rows) = one_row();
        let mut writer = RowWriter::new(OutputFormat::Jsonl);
        let mut out = Vec::new();
        writer.write_row(&mut out, &schema, &rows[0]).unwrap();

        let line = String::from_utf8(out).unwrap();
        assert_eq!(
            line.trim_end(),
            r#"{"accountId":"t4","playerId":1111,"premium":null}"#
        );
    }

    #[test]
    fn test_csv_output_has_header_once() {
        let (schema, rows) = one_row();
        let mut writer = RowWriter::new(OutputFormat::Csv);
        let mut out = Vec::new();
        writer.write_row(&mut out, &schema, &rows[0]).unwrap();
        writer.write_row(&mut out, &schema, &rows[0]).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "accountId,playerId,premium");
        assert_eq!(lines[1], "t4,1111,");
    }

    #[test]
    fn test_tsv_output() {
        let (schema, rows) = one_row();
        let mut writer = RowWriter::new(OutputFormat::Tsv);
        let mut out = Vec::new();
        writer.write_row(&mut out, &schema, &rows[0]).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("accountId\tplayerId\tpremium\n"));
        assert!(text.contains("t4\t1111\t"));
    }
}
