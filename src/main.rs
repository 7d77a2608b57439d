use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use logrow::{ErrorStrategy, ExportConfig, ExportPipeline, OutputFormat, PipelineConfig};

#[derive(Parser)]
#[command(name = "logrow")]
#[command(about = "Convert request logs into typed rows for a columnar analytics store")]
#[command(version)]
struct Args {
    /// Exporter configuration file (YAML)
    #[arg(short = 'c', long = "config")]
    config_file: PathBuf,

    /// Input file with one JSON request record per line (default: stdin)
    #[arg(short = 'i', long = "input")]
    input_file: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long = "output")]
    output_file: Option<PathBuf>,

    /// Output format for rows
    #[arg(short = 'f', long = "format", value_enum, default_value = "jsonl")]
    format: OutputFormat,

    /// Print the derived (name, type) schema as JSON and exit
    #[arg(long)]
    print_schema: bool,

    /// Debug mode - show processing details
    #[arg(long)]
    debug: bool,

    /// Fail on first malformed record instead of skipping it
    #[arg(long)]
    fail_fast: bool,

    /// Maximum input line length
    #[arg(long, default_value = "1048576")] // 1MB
    max_line_length: usize,

    /// Buffer size for I/O
    #[arg(long, default_value = "65536")] // 64KB
    buffer_size: usize,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = ExportConfig::from_file(&args.config_file).map_err(|e| {
        format!(
            "Failed to load config file '{}': {}",
            args.config_file.display(),
            e
        )
    })?;

    let builder = config
        .build()
        .map_err(|e| format!("Failed to build exporters: {}", e))?;

    if args.print_schema {
        let fields: Vec<serde_json::Value> = builder
            .schema()
            .iter()
            .map(|(name, field_type)| {
                serde_json::json!({ "name": name, "type": field_type.as_str() })
            })
            .collect();
        println!("{}", serde_json::Value::Array(fields));
        return Ok(());
    }

    let pipeline_config = PipelineConfig {
        error_strategy: if args.fail_fast {
            ErrorStrategy::FailFast
        } else {
            ErrorStrategy::Skip
        },
        debug: args.debug,
        buffer_size: args.buffer_size,
        max_line_length: args.max_line_length,
        output_format: args.format,
    };

    let mut pipeline = ExportPipeline::new(builder, pipeline_config);

    // Set up input
    let input_filename = args
        .input_file
        .as_ref()
        .map(|p| p.to_string_lossy().to_string());
    let input: Box<dyn BufRead> = if let Some(input_path) = &args.input_file {
        let file = File::open(input_path).map_err(|e| {
            format!(
                "Failed to open input file '{}': {}",
                input_path.display(),
                e
            )
        })?;
        Box::new(BufReader::with_capacity(args.buffer_size, file))
    } else {
        Box::new(BufReader::with_capacity(args.buffer_size, io::stdin()))
    };

    // Set up output
    let mut output: Box<dyn Write> = if let Some(output_path) = &args.output_file {
        let file = File::create(output_path).map_err(|e| {
            format!(
                "Failed to create output file '{}': {}",
                output_path.display(),
                e
            )
        })?;
        Box::new(io::BufWriter::with_capacity(args.buffer_size, file))
    } else {
        Box::new(io::BufWriter::with_capacity(args.buffer_size, io::stdout()))
    };

    let stats = pipeline
        .process_stream(input, &mut output, input_filename.as_deref())
        .map_err(|e| format!("Processing failed: {}", e))?;

    output.flush()?;

    if args.debug {
        eprintln!("Final statistics:");
        eprintln!("  Records processed: {}", stats.records_processed);
        eprintln!("  Rows output: {}", stats.rows_output);
        eprintln!("  Records without rows: {}", stats.records_skipped);
        eprintln!("  Errors: {}", stats.errors);
        eprintln!("  Processing time: {:?}", stats.processing_time);

        if stats.records_processed > 0 {
            let rate = stats.records_processed as f64 / stats.processing_time.as_secs_f64();
            eprintln!("  Processing rate: {:.0} records/second", rate);
        }
    }

    Ok(())
}
