use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use fin_table_extract::{
    BatchEntry, EvidencePolicy, ExtractOptions, ExtractionReport, PageSelection, RuleSet,
    extract_document_to_csv, extract_records, read_document_lines, write_batch_summary,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "fintable",
    version,
    about = "Extract numeric financial tables from PDF, DOCX and text documents into CSV"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract tables and write one CSV per output sheet.
    Extract(ExtractArgs),
    /// Print every classified line as JSON, one record per line.
    Inspect(InspectArgs),
}

#[derive(Debug, Args)]
struct RuleArgs {
    /// Page (PDF) or line/paragraph (text, DOCX) selection like 1-3,5.
    #[arg(long)]
    pages: Option<String>,

    /// JSON file with financial_terms and exclusion_phrases overriding the built-in rules.
    #[arg(long)]
    rules: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Input document path (.pdf, .docx, .txt). Repeatable.
    #[arg(short, long = "input", required = true)]
    inputs: Vec<PathBuf>,

    /// Directory that receives the CSV files.
    #[arg(short, long)]
    output_dir: PathBuf,

    #[command(flatten)]
    rule_args: RuleArgs,

    /// Fewest regular numbers a line needs to become a table row.
    #[arg(long, default_value_t = 3)]
    min_regular: usize,

    /// Keep lines whose numbers are not all adjacent.
    #[arg(long)]
    keep_inconsistent: bool,

    /// Output delimiter character.
    #[arg(long, default_value = ",")]
    delimiter: char,

    /// Log per-document progress and list every warning.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Args)]
struct InspectArgs {
    /// Input document path (.pdf, .docx, .txt).
    #[arg(short, long)]
    input: PathBuf,

    #[command(flatten)]
    rule_args: RuleArgs,

    #[arg(short, long)]
    verbose: bool,
}

fn parse_pages(pages: Option<&str>) -> Result<Option<PageSelection>> {
    pages
        .map(PageSelection::from_str)
        .transpose()
        .map_err(|error| anyhow!("invalid page selection: {error}"))
        .context("failed to parse --pages")
}

fn load_rules(path: Option<&Path>) -> Result<RuleSet> {
    match path {
        Some(path) => RuleSet::from_path(path)
            .with_context(|| format!("failed to load rules from '{}'", path.display())),
        None => Ok(RuleSet::default()),
    }
}

fn parse_options(args: &ExtractArgs) -> Result<ExtractOptions> {
    if !args.delimiter.is_ascii() {
        anyhow::bail!("delimiter must be a single ASCII character");
    }
    if args.min_regular == 0 {
        anyhow::bail!("--min-regular must be at least 1");
    }

    Ok(ExtractOptions {
        pages: parse_pages(args.rule_args.pages.as_deref())?,
        rules: load_rules(args.rule_args.rules.as_deref())?,
        evidence: EvidencePolicy {
            min_regular_count: args.min_regular,
            require_consecutive: !args.keep_inconsistent,
        },
        delimiter: args.delimiter as u8,
    })
}

fn log_report(input: &Path, report: &ExtractionReport, verbose: bool) {
    if report.warnings.is_empty() {
        return;
    }

    eprintln!(
        "warning: {}: {} issue(s) detected",
        input.display(),
        report.warnings.len()
    );
    if verbose {
        for warning in &report.warnings {
            eprintln!(
                "  - {:?} page={:?} table_id={:?}: {}",
                warning.code, warning.page, warning.table_id, warning.message
            );
        }
    }
}

fn run_extract(args: &ExtractArgs) -> Result<ExitCode> {
    let options = parse_options(args)?;

    let mut entries = Vec::with_capacity(args.inputs.len());
    let mut total_rows = 0_usize;
    let mut failures = 0_usize;
    for input in &args.inputs {
        let result = extract_document_to_csv(input, &args.output_dir, &options)
            .with_context(|| format!("failed to extract tables from '{}'", input.display()));
        let entry = match result {
            Ok(report) => {
                log_report(input, &report, args.verbose);
                total_rows += report.row_count;
                BatchEntry {
                    input_file: input.display().to_string(),
                    status: (if report.row_count > 0 { "ok" } else { "empty" }).to_string(),
                    tables: report.table_count,
                    rows: report.row_count,
                    error: None,
                }
            }
            Err(error) => {
                failures += 1;
                eprintln!("error: {error:#}");
                BatchEntry {
                    input_file: input.display().to_string(),
                    status: "failed".to_string(),
                    tables: 0,
                    rows: 0,
                    error: Some(format!("{error:#}")),
                }
            }
        };
        entries.push(entry);
    }

    if args.inputs.len() > 1 {
        std::fs::create_dir_all(&args.output_dir).with_context(|| {
            format!("failed to create '{}'", args.output_dir.display())
        })?;
        let path = args.output_dir.join("batch_summary.csv");
        write_batch_summary(&path, &entries, options.delimiter)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
    }

    Ok(if failures > 0 {
        ExitCode::from(1)
    } else if total_rows > 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    })
}

fn run_inspect(args: &InspectArgs) -> Result<ExitCode> {
    let pages = parse_pages(args.rule_args.pages.as_deref())?;
    let rules = load_rules(args.rule_args.rules.as_deref())?;
    let document = read_document_lines(&args.input, pages.as_ref())
        .with_context(|| format!("failed to read '{}'", args.input.display()))?;
    let records = extract_records(&document.lines, &rules);

    let mut stdout = std::io::stdout().lock();
    for record in &records {
        serde_json::to_writer(&mut stdout, record).context("failed to encode record")?;
        writeln!(stdout).context("failed to write record")?;
    }

    Ok(if records.is_empty() {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    })
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "fin_table_extract=info"
    } else {
        "fin_table_extract=warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = match &cli.command {
        Commands::Extract(args) => args.verbose,
        Commands::Inspect(args) => args.verbose,
    };
    init_tracing(verbose);

    let result = match &cli.command {
        Commands::Extract(args) => run_extract(args),
        Commands::Inspect(args) => run_inspect(args),
    };
    match result {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(1)
        }
    }
}
