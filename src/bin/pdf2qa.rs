//! CLI binary for pdf2qa.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ProcessConfig` and prints the run summary.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2qa::{
    process_directory_to_file, ProcessConfig, ProcessProgressCallback, ProgressCallback, RunOutput,
};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar tracking documents, with per-document
/// and per-chunk log lines printed above it.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_run_start

        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} documents  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Processing");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl ProcessProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total_documents: usize) {
        self.bar.set_length(total_documents as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Processing {total_documents} document(s)…"))
        ));
    }

    fn on_document_start(&self, _index: usize, _total: usize, file: &str) {
        self.bar.set_message(file.to_string());
    }

    fn on_document_complete(&self, index: usize, total: usize, file: &str, records: usize) {
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}",
            green("✓"),
            index,
            total,
            file,
            dim(&format!("{records} records")),
        ));
        self.bar.inc(1);
    }

    fn on_document_skipped(&self, index: usize, total: usize, file: &str, reason: &str) {
        // Truncate very long skip reasons to keep output tidy.
        let msg = truncate_message(reason, 79);
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}",
            red("✗"),
            index,
            total,
            file,
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_chunk_complete(&self, file: &str, chunk: usize, total_chunks: usize, items: usize) {
        self.bar
            .set_message(format!("{file}  chunk {chunk}/{total_chunks}  ({items} items)"));
    }

    fn on_run_complete(&self, _total_documents: usize, _total_records: usize) {
        self.bar.finish_and_clear();
    }
}

/// Cap `s` at `max` characters (with a trailing ellipsis when cut).
///
/// Skip reasons embed file names and extraction error text, so they can
/// carry multi-byte UTF-8; the cut must land on a char boundary.
fn truncate_message(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((byte_idx, _)) => format!("{}\u{2026}", &s[..byte_idx]),
        None => s.to_string(),
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Process a directory of leaflets into qa_records.tsv
  pdf2qa ./leaflets

  # Custom output path and model
  pdf2qa ./leaflets -o breast_cancer_qa.tsv --model gpt-4o

  # Against a local Ollama endpoint
  pdf2qa ./leaflets --base-url http://localhost:11434/v1 --api-key ollama

  # Quick smoke pass over the first 3 documents
  pdf2qa ./leaflets --sample

  # Fewer, longer questions per chunk
  pdf2qa ./leaflets --questions-per-chunk 8 --max-chunk-size 20000

  # Machine-readable run report alongside the sheet
  pdf2qa ./leaflets --json-report run_report.json

OUTPUT:
  A tab-delimited file with a fixed 13-column header (Sno., Question,
  Answer, Category, Pathways, …). Serial numbers are global and gap-free
  across all documents in the run. The file is written atomically and only
  when at least one record was produced.

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY     API key for the chat-completions endpoint
  PDF2QA_MODEL       Override the model ID
  PDF2QA_BASE_URL    Override the endpoint base URL
  PDF2QA_OUTPUT      Override the output path

SETUP:
  1. Set API key:    export OPENAI_API_KEY=sk-...
  2. Process:        pdf2qa ./leaflets -o qa_records.tsv

  Any OpenAI-compatible chat-completions endpoint works (OpenAI, Azure
  gateways, Ollama, vLLM, LiteLLM). Generation always runs at temperature
  0.0 so repeat runs over the same corpus produce the same sheet.
"#;

/// Extract structured Q&A records from medical patient-information documents.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2qa",
    version,
    about = "Extract structured Q&A records from medical patient-information documents",
    long_about = "Process a directory of patient-information documents (PDF, plain text, \
Markdown) into a reviewer-ready tab-delimited sheet of question/answer records, using any \
OpenAI-compatible chat-completions endpoint for generation.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory containing .pdf/.txt/.md documents.
    input: PathBuf,

    /// Output file path for the tab-delimited records.
    #[arg(short, long, env = "PDF2QA_OUTPUT", default_value = "qa_records.tsv")]
    output: PathBuf,

    /// Model ID sent to the chat-completions endpoint.
    #[arg(long, env = "PDF2QA_MODEL", default_value = "gpt-4o-mini")]
    model: String,

    /// Base URL of the OpenAI-compatible endpoint.
    #[arg(long, env = "PDF2QA_BASE_URL", default_value = "https://api.openai.com/v1")]
    base_url: String,

    /// API key (falls back to the OPENAI_API_KEY environment variable).
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Target Q&A pairs requested per chunk.
    #[arg(long, env = "PDF2QA_QUESTIONS", default_value_t = 15)]
    questions_per_chunk: usize,

    /// Maximum characters per chunk (chunks split on paragraph boundaries).
    #[arg(long, env = "PDF2QA_MAX_CHUNK_SIZE", default_value_t = 15_000)]
    max_chunk_size: usize,

    /// Minimum extracted characters below which a document is skipped.
    #[arg(long, env = "PDF2QA_MIN_TEXT_CHARS", default_value_t = 100)]
    min_text_chars: usize,

    /// Maximum tokens the model may generate per chunk.
    #[arg(long, env = "PDF2QA_MAX_TOKENS", default_value_t = 4_000)]
    max_output_tokens: usize,

    /// Per-generation-call timeout in seconds.
    #[arg(long, env = "PDF2QA_API_TIMEOUT", default_value_t = 120)]
    api_timeout: u64,

    /// Sample mode: process only the first 3 documents.
    #[arg(short, long)]
    sample: bool,

    /// Value of the "Applicable to Pathways" column.
    #[arg(long, env = "PDF2QA_PATHWAY", default_value = "Breast Cancer")]
    pathway: String,

    /// Value of the "Author Name" column.
    #[arg(long, env = "PDF2QA_AUTHOR", default_value = "Healthcare AI Team")]
    author: String,

    /// Also write a JSON run report (records, per-document results, stats).
    #[arg(long, env = "PDF2QA_JSON_REPORT")]
    json_report: Option<PathBuf>,

    /// Disable progress bar.
    #[arg(long, env = "PDF2QA_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2QA_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2QA_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active; the
    // bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && io::stderr().is_terminal();
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = ProcessConfig::builder()
        .model(&cli.model)
        .base_url(&cli.base_url)
        .questions_per_chunk(cli.questions_per_chunk)
        .max_chunk_size(cli.max_chunk_size)
        .min_text_chars(cli.min_text_chars)
        .max_output_tokens(cli.max_output_tokens)
        .api_timeout_secs(cli.api_timeout)
        .pathway(&cli.pathway)
        .author(&cli.author)
        .sample(cli.sample);

    if let Some(ref key) = cli.api_key {
        builder = builder.api_key(key);
    }
    if show_progress {
        let cb = CliProgressCallback::new();
        builder = builder.progress_callback(cb as ProgressCallback);
    }

    let config = builder.build().context("Invalid configuration")?;

    // ── Run ──────────────────────────────────────────────────────────────
    let run = process_directory_to_file(&cli.input, &cli.output, &config)
        .await
        .context("Processing failed")?;

    if let Some(ref report_path) = cli.json_report {
        let json = serde_json::to_string_pretty(&run).context("Failed to serialise run report")?;
        tokio::fs::write(report_path, json)
            .await
            .with_context(|| format!("Failed to write run report to {report_path:?}"))?;
    }

    if !cli.quiet {
        print_summary(&run, &cli.output);
    }

    Ok(())
}

/// Human-readable end-of-run summary on stderr.
fn print_summary(run: &RunOutput, output: &std::path::Path) {
    let s = &run.stats;
    eprintln!(
        "{}  {} records from {}/{} documents  {}ms  →  {}",
        if s.skipped_documents == 0 && s.failed_chunks == 0 {
            green("✔")
        } else {
            cyan("⚠")
        },
        bold(&s.total_records.to_string()),
        s.total_documents - s.skipped_documents,
        s.total_documents,
        s.total_duration_ms,
        bold(&output.display().to_string()),
    );
    if s.skipped_documents > 0 {
        eprintln!("   {} document(s) skipped", red(&s.skipped_documents.to_string()));
    }
    if s.failed_chunks > 0 {
        eprintln!(
            "   {} of {} chunk(s) failed",
            red(&s.failed_chunks.to_string()),
            s.total_chunks
        );
    }
    eprintln!(
        "   {} records/document average",
        dim(&format!("{:.1}", run.summary.avg_records_per_document))
    );
    eprintln!("   By category:");
    for (category, count) in &run.summary.per_category {
        eprintln!("     {:>5}  {}", count, dim(category));
    }
}
