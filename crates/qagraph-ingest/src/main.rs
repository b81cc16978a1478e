//! CLI entry point for qagraph-ingest.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use qagraph_core::config::{load_section, DEFAULT_FILE_PREFIX};
use qagraph_core::Neo4jSettings;
use qagraph_graph::{GraphClient, GraphConfig};

use qagraph_ingest::report::IngestReport;
use qagraph_ingest::{ingest, IngestConfig, IngestError, IngestSummary, MemorySink, SheetReader};

#[derive(Parser)]
#[command(name = "qagraph-ingest")]
#[command(about = "Load question/answer spreadsheets into the Neo4j knowledge graph")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file prefix (default: qagraph).
    #[arg(short, long, default_value = DEFAULT_FILE_PREFIX, global = true)]
    config: String,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Merge every question/answer row of a spreadsheet into the graph.
    Ingest {
        /// Spreadsheet to read (.xlsx, .xls, .ods, .csv, ...).
        file: PathBuf,

        /// Worksheet name (default: first sheet).
        #[arg(long)]
        sheet: Option<String>,

        /// Validate and count without connecting to Neo4j.
        #[arg(long)]
        dry_run: bool,

        /// Write a run report into this directory.
        #[arg(long)]
        report_dir: Option<PathBuf>,

        /// Retries per row for connectivity failures.
        #[arg(long)]
        max_retries: Option<u32>,

        /// Record rejected rows and keep going instead of aborting.
        #[arg(long)]
        continue_on_error: bool,
    },
    /// Print Question, Answer and HAS_ANSWER counts as JSON.
    Stats,
    /// Print the answers linked to a question as JSON.
    Answers {
        /// Exact question text.
        #[arg(long)]
        question: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.json_logs {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    }

    match cli.command {
        Command::Ingest {
            ref file,
            ref sheet,
            dry_run,
            ref report_dir,
            max_retries,
            continue_on_error,
        } => {
            let mut config: IngestConfig = load_section(&cli.config, "ingest")?;
            if sheet.is_some() {
                config.sheet = sheet.clone();
            }
            if let Some(dir) = report_dir {
                config.report_dir = Some(dir.display().to_string());
            }
            if let Some(n) = max_retries {
                config.max_retries = n;
            }
            config.continue_on_error |= continue_on_error;

            run_ingest(&cli.config, &config, file, dry_run).await?;
        }
        Command::Stats => {
            let graph = connect(&cli.config).await?;
            let stats = graph.stats().await?;
            println!("{}", serde_json::to_string(&stats)?);
        }
        Command::Answers { ref question } => {
            let graph = connect(&cli.config).await?;
            let answers = graph.answers_for(question.trim()).await?;
            println!("{}", serde_json::to_string(&answers)?);
        }
    }

    Ok(())
}

/// Read, validate, and merge one spreadsheet, then write the run report.
async fn run_ingest(
    config_prefix: &str,
    config: &IngestConfig,
    file: &Path,
    dry_run: bool,
) -> anyhow::Result<()> {
    // Column validation happens here, before any connection is opened.
    let data = SheetReader::new(config).read(file)?;
    let mut report = IngestReport::start(file, dry_run);
    report.record_sheet(&data);

    if dry_run {
        let mut sink = MemorySink::new();
        let summary = ingest(&mut sink, &data, &config.retry_policy()).await?;
        report.record_summary(&summary);
        store_report(report, config.report_dir.as_deref());

        let stats = sink.stats();
        println!(
            "Dry run complete: {} rows valid, {} skipped; would produce {} questions, {} answers, {} HAS_ANSWER edges",
            summary.merged, summary.skipped, stats.questions, stats.answers, stats.has_answer
        );
        return Ok(());
    }

    let result = write_to_graph(config_prefix, config, &data).await;
    match &result {
        Ok(summary) => report.record_summary(summary),
        Err(IngestError::Aborted { line, merged, source }) => {
            report.record_abort(Some(*line), *merged, &source.to_string())
        }
        Err(e) => report.record_abort(None, 0, &e.to_string()),
    }
    store_report(report, config.report_dir.as_deref());

    let summary = result?;
    println!(
        "Ingestion complete: {} merged, {} skipped, {} failed (of {} rows)",
        summary.merged,
        summary.skipped,
        summary.failures.len(),
        summary.total
    );
    Ok(())
}

async fn write_to_graph(
    config_prefix: &str,
    config: &IngestConfig,
    data: &qagraph_ingest::SheetData,
) -> qagraph_ingest::Result<IngestSummary> {
    let settings: Neo4jSettings = load_section(config_prefix, "neo4j")?;
    settings.validate()?;
    let mut graph = GraphClient::connect(&GraphConfig::from(&settings)).await?;

    if config.ensure_constraints {
        if let Err(e) = graph.ensure_constraints().await {
            tracing::warn!(error = %e, "Could not create uniqueness constraints");
        }
    }

    ingest(&mut graph, data, &config.retry_policy()).await
}

async fn connect(config_prefix: &str) -> anyhow::Result<GraphClient> {
    let settings: Neo4jSettings = load_section(config_prefix, "neo4j")?;
    settings.validate()?;
    Ok(GraphClient::connect(&GraphConfig::from(&settings)).await?)
}

/// Finalize the report and store it if a directory is configured.
fn store_report(report: IngestReport, report_dir: Option<&str>) {
    let Some(dir) = report_dir else {
        return;
    };
    let report = report.finalize();
    match report.save(Path::new(dir)) {
        Ok(path) => tracing::info!(
            report_id = %report.id,
            path = %path.display(),
            "Run report recorded"
        ),
        Err(e) => tracing::warn!(error = %e, "Failed to store run report"),
    }
}
