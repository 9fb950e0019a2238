use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use sheet_header_detect::{
    ColumnMapping, DetectError, DetectOptions, DetectionResult, HEADER_SCAN_ROWS, SourceFormat,
    compare_column_mappings, detect_headers_from_path, parse_delimiter,
};
use tracing_subscriber::EnvFilter;

const EXIT_INPUT_ERROR: u8 = 2;
const EXIT_MAPPING_CHANGED: u8 = 3;

#[derive(Debug, Parser)]
#[command(
    name = "sheetheaders",
    version,
    about = "Find the header row of CSV and Excel uploads"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Detect the header row and print the column names.
    Detect(DetectArgs),
    /// Compare detected columns with a saved field-to-column mapping.
    Compare(CompareArgs),
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// Input CSV or workbook path.
    #[arg(short, long)]
    input: PathBuf,

    /// Source format (csv or workbook); guessed from the extension by default.
    #[arg(long)]
    format: Option<String>,

    /// CSV delimiter character or "tab"; sniffed by default.
    #[arg(long)]
    delimiter: Option<String>,

    /// Number of leading rows to inspect.
    #[arg(long, default_value_t = HEADER_SCAN_ROWS)]
    scan_rows: usize,

    /// Print warning details.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Args)]
struct DetectArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Print the detection result as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct CompareArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// JSON object mapping backend field names to column names.
    #[arg(short, long)]
    mapping: PathBuf,
}

fn parse_options(args: &SourceArgs) -> Result<DetectOptions> {
    let format = args
        .format
        .as_deref()
        .map(SourceFormat::from_str)
        .transpose()
        .map_err(|error| anyhow!(error))
        .context("failed to parse --format")?;

    let delimiter = args
        .delimiter
        .as_deref()
        .map(parse_delimiter)
        .transpose()
        .map_err(|error| anyhow!(error))
        .context("failed to parse --delimiter")?;

    Ok(DetectOptions {
        format,
        delimiter,
        scan_rows: args.scan_rows,
        ..DetectOptions::default()
    })
}

fn log_warnings(result: &DetectionResult, verbose: bool) {
    if result.warnings.is_empty() {
        return;
    }

    eprintln!("warning: {} issue(s) detected", result.warnings.len());
    if verbose {
        for warning in &result.warnings {
            eprintln!("  - {:?}: {}", warning.code, warning.message);
        }
    }
}

fn run_detection(args: &SourceArgs) -> Result<DetectionResult> {
    let options = parse_options(args)?;
    let result = detect_headers_from_path(&args.input, &options)
        .with_context(|| format!("failed to detect headers in '{}'", args.input.display()))?;
    log_warnings(&result, args.verbose);
    Ok(result)
}

fn run_detect(args: &DetectArgs) -> Result<ExitCode> {
    let result = run_detection(&args.source)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        match &result.sheet_name {
            Some(sheet) => println!("header row: {} (sheet '{sheet}')", result.source_row),
            None => println!("header row: {}", result.source_row),
        }
        for column in &result.columns {
            println!("{column}");
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn run_compare(args: &CompareArgs) -> Result<ExitCode> {
    let raw = std::fs::read_to_string(&args.mapping)
        .with_context(|| format!("failed to read mapping '{}'", args.mapping.display()))?;
    let saved: ColumnMapping = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse mapping '{}'", args.mapping.display()))?;

    let result = run_detection(&args.source)?;
    let comparison = compare_column_mappings(&result.columns, &saved);
    println!("{}", comparison.message);

    if comparison.has_changes {
        Ok(ExitCode::from(EXIT_MAPPING_CHANGED))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    let input_error = error
        .chain()
        .filter_map(|cause| cause.downcast_ref::<DetectError>())
        .any(DetectError::is_input_error);
    if input_error {
        ExitCode::from(EXIT_INPUT_ERROR)
    } else {
        ExitCode::from(1)
    }
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sheet_header_detect=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    let outcome = match &cli.command {
        Commands::Detect(args) => run_detect(args),
        Commands::Compare(args) => run_compare(args),
    };

    match outcome {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            exit_code_for(&error)
        }
    }
}
