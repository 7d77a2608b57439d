// src/pipeline.rs - streaming driver: JSONL request records in, rows out
use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

use crate::error::ProcessingError;
use crate::output_format::{OutputFormat, RowWriter};
use crate::record::LogRecord;
use crate::row::RowBuilder;

/// Configuration for driver behavior
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub error_strategy: ErrorStrategy,
    pub debug: bool,
    pub buffer_size: usize,
    pub max_line_length: usize,
    pub output_format: OutputFormat,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            error_strategy: ErrorStrategy::Skip,
            debug: false,
            buffer_size: 65536,       // 64KB
            max_line_length: 1048576, // 1MB
            output_format: OutputFormat::default(),
        }
    }
}

/// Simple error handling strategy for malformed input records
#[derive(Debug, Clone)]
pub enum ErrorStrategy {
    /// Skip problematic records and continue processing
    Skip,
    /// Stop processing on first error
    FailFast,
}

/// Runtime statistics
#[derive(Debug, Default, Clone)]
pub struct ExportStats {
    pub records_processed: usize,
    pub rows_output: usize,
    pub records_skipped: usize,
    pub errors: usize,
    pub processing_time: Duration,
}

/// Reads one JSON request record per input line, drives the row builder, and
/// writes the resulting rows.
///
/// Record-level problems (unreadable JSON, missing required fields, oversized
/// lines) honor the configured error strategy. Malformed application log
/// lines *inside* a record are not errors at this level - the exporters
/// silently drop them.
pub struct ExportPipeline {
    builder: RowBuilder,
    config: PipelineConfig,
    stats: ExportStats,
}

impl ExportPipeline {
    pub fn new(builder: RowBuilder, config: PipelineConfig) -> Self {
        ExportPipeline {
            builder,
            config,
            stats: ExportStats::default(),
        }
    }

    pub fn builder(&self) -> &RowBuilder {
        &self.builder
    }

    /// Process a single input stream to completion
    pub fn process_stream<R: BufRead, W: Write>(
        &mut self,
        input: R,
        output: &mut W,
        filename: Option<&str>,
    ) -> Result<ExportStats, ProcessingError> {
        let start_time = Instant::now();
        let mut file_stats = ExportStats::default();
        let mut writer = RowWriter::new(self.config.output_format);
        let mut line_number = 0usize;

        for line_result in input.lines() {
            let line = match line_result {
                Ok(line) => line,
                Err(e) => {
                    if e.kind() == std::io::ErrorKind::UnexpectedEof {
                        break;
                    }
                    return Err(ProcessingError::IoError(e));
                }
            };

            line_number += 1;

            if line.trim().is_empty() {
                continue;
            }

            if line.len() > self.config.max_line_length {
                let error = ProcessingError::LineTooLong {
                    length: line.len(),
                    max_length: self.config.max_line_length,
                };
                match self.config.error_strategy {
                    ErrorStrategy::FailFast => return Err(error),
                    ErrorStrategy::Skip => {
                        file_stats.errors += 1;
                        if self.config.debug {
                            eprintln!("logrow: line {}: line too long, skipping", line_number);
                        }
                        continue;
                    }
                }
            }

            file_stats.records_processed += 1;

            let record = match serde_json::from_str::<LogRecord>(&line) {
                Ok(record) => record,
                Err(e) => {
                    let mut source = anyhow::Error::new(e);
                    if let Some(f) = filename {
                        source = source.context(format!("in {}", f));
                    }
                    let error = ProcessingError::RecordError {
                        line: line_number,
                        source,
                    };
                    match self.config.error_strategy {
                        ErrorStrategy::FailFast => return Err(error),
                        ErrorStrategy::Skip => {
                            file_stats.errors += 1;
                            if self.config.debug {
                                eprintln!("logrow: line {}: {}", line_number, error);
                            }
                            continue;
                        }
                    }
                }
            };

            let rows = self.builder.process(&record);
            if rows.is_empty() {
                file_stats.records_skipped += 1;
            }

            for row in &rows {
                if let Err(e) = writer.write_row(output, self.builder.schema(), row) {
                    // Handle broken pipe gracefully
                    if e.to_string().contains("Broken pipe") {
                        break;
                    }
                    return Err(e);
                }
                file_stats.rows_output += 1;
            }
        }

        file_stats.processing_time = start_time.elapsed();

        self.stats.records_processed += file_stats.records_processed;
        self.stats.rows_output += file_stats.rows_output;
        self.stats.records_skipped += file_stats.records_skipped;
        self.stats.errors += file_stats.errors;
        self.stats.processing_time += file_stats.processing_time;

        Ok(file_stats)
    }

    /// Accumulated stats across all streams processed so far
    pub fn get_stats(&self) -> &ExportStats {
        &self.stats
    }
}
