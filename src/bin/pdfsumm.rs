//! CLI binary for pdfsumm.
//!
//! A thin shim over the library crate: parse flags, check the API key,
//! validate inputs, then hand everything to a `BatchDriver`.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdfsumm::{
    build_summarizer_from_config, check_credential, validate_inputs, BatchDriver,
    BatchProgressCallback, BatchReport, ExecutionMode, ExtractionMode, SummarizeConfig,
    SummaryType, Stage,
};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Exit status when the provider's API key is missing.
const EXIT_MISSING_CREDENTIAL: u8 = 3;

/// Set to `1` to skip loading a `.env` file.
const DEBUG_VAR: &str = "SUMMARIZE_CLI_DEBUG";

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

// ── CLI progress callback using indicatif ────────────────────────────────────

/// One bar per stage; in sync mode the single `Write` stage covers the
/// whole run.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold:>10}  \
             [{bar:42.green/238}] {pos:>3}/{len} files  \
             ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        let bar = ProgressBar::new(0);
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_files: usize) {
        self.bar.set_length(total_files as u64);
    }

    fn on_stage_start(&self, stage: Stage, total_files: usize) {
        let prefix = match stage {
            Stage::Extract => "Extracting",
            Stage::Summarize => "Summarising",
            Stage::Write => "Writing",
        };
        self.bar.set_length(total_files as u64);
        self.bar.set_position(0);
        self.bar.set_prefix(prefix);
        self.bar.reset_eta();
    }

    fn on_file_complete(&self, _index: usize, _total: usize, source: &Path) {
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.bar.set_message(name);
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, written: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} summaries written",
            green("✔"),
            bold(&written.to_string())
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Concise summaries next to the current directory
  pdfsumm paper1.pdf paper2.pdf

  # Bullet-point summaries into ./summaries, concurrently
  pdfsumm -s bullet_point -d summaries --asynchronous papers/*.pdf

  # No suffix: paper.pdf → paper.txt
  pdfsumm --suffix "" paper.pdf

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY          OpenAI API key (required for the default provider)
  ANTHROPIC_API_KEY       Anthropic API key (--provider anthropic)
  GEMINI_API_KEY          Google Gemini API key (--provider gemini)
  SUMMARIZE_CLI_DEBUG     Set to 1 to skip loading a .env file
  SUMMARIZE_CLI_TEST      Set to 1 to replace PDF parsing with a placeholder
  PDFIUM_LIB_PATH         Path to libpdfium if it is not installed system-wide

A .env file in the current directory (or any parent) is loaded before the
API key is checked.
"#;

/// Summarise PDF documents with an LLM.
#[derive(Parser, Debug)]
#[command(
    name = "pdfsumm",
    version,
    about = "Summarise one or more PDF documents with an LLM",
    long_about = "Takes one or more PDF FILES as input and writes an LLM-generated summary \
for each one to {output-dir}/{stem}-{suffix}.txt.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF files to summarise.
    #[arg(required = true, num_args = 1..)]
    files: Vec<PathBuf>,

    /// The type of summary that will be generated.
    #[arg(short, long, env = "PDFSUMM_SUMMARY_TYPE", value_enum,
          default_value = "concise", ignore_case = true)]
    summary_type: SummaryTypeArg,

    /// Directory for the summaries; created if missing.
    #[arg(short = 'd', long, env = "PDFSUMM_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Suffix appended to each output file name ("" for none).
    #[arg(long, env = "PDFSUMM_SUFFIX", default_value = "summary")]
    suffix: String,

    /// Run extraction and summarisation as concurrent stages.
    #[arg(short, long, env = "PDFSUMM_ASYNC")]
    asynchronous: bool,

    /// LLM model ID.
    #[arg(long, env = "PDFSUMM_MODEL", default_value = "gpt-4o-mini")]
    model: String,

    /// LLM provider: openai, anthropic, gemini, mistral, ollama.
    #[arg(long, env = "PDFSUMM_PROVIDER", default_value = "openai")]
    provider: String,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "PDFSUMM_TEMPERATURE", default_value_t = 0.0)]
    temperature: f32,

    /// Max tokens in each summary.
    #[arg(long, env = "PDFSUMM_MAX_TOKENS")]
    max_tokens: Option<usize>,

    /// Print the batch report as JSON on stdout.
    #[arg(long, env = "PDFSUMM_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDFSUMM_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFSUMM_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDFSUMM_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum SummaryTypeArg {
    Concise,
    #[value(name = "bullet_point")]
    BulletPoint,
    Detailed,
}

impl From<SummaryTypeArg> for SummaryType {
    fn from(v: SummaryTypeArg) -> Self {
        match v {
            SummaryTypeArg::Concise => SummaryType::Concise,
            SummaryTypeArg::BulletPoint => SummaryType::BulletPoint,
            SummaryTypeArg::Detailed => SummaryType::Detailed,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar covers routine INFO output; pdfium's own chatter is
    // always silenced.
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else if show_progress {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("{filter},pdfium_render=off"))),
        )
        .with_writer(io::stderr)
        .init();

    // ── Credential precondition ──────────────────────────────────────────
    if std::env::var(DEBUG_VAR).as_deref() != Ok("1") {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }
    }
    if let Err(e) = check_credential(&cli.provider) {
        println!("{e}");
        return ExitCode::from(EXIT_MISSING_CREDENTIAL);
    }

    match run(&cli, show_progress) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", red("✘"), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, show_progress: bool) -> Result<()> {
    validate_inputs(cli.files.as_slice()).context("Invalid input")?;

    let config = build_config(cli)?;
    let summarizer =
        build_summarizer_from_config(&config).context("Failed to set up the summariser")?;

    if config.extraction == ExtractionMode::Real {
        ensure_pdfium(show_progress)?;
    }

    let mut driver = BatchDriver::from_config(&config);
    if show_progress {
        driver = driver.with_progress(CliProgressCallback::new());
    }

    let report = match config.execution {
        ExecutionMode::Sync => driver
            .run(&summarizer, &cli.files, &config.output_dir, &config.suffix)
            .context("Summarisation failed")?,
        ExecutionMode::Async => {
            // Cooperative scheduling on one thread; pdfium still gets the
            // blocking pool.
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("Failed to create tokio runtime")?;
            runtime
                .block_on(driver.run_async(
                    &summarizer,
                    &cli.files,
                    &config.output_dir,
                    &config.suffix,
                ))
                .context("Summarisation failed")?
        }
    };

    print_report(cli, &report, show_progress)
}

/// Make sure the pdfium library is on disk before any extraction starts.
///
/// The first run downloads it (~30 MB) into the pdfium-auto cache; later
/// runs only check the path.
fn ensure_pdfium(show_progress: bool) -> Result<()> {
    if pdfium_auto::is_pdfium_cached() {
        return Ok(());
    }
    if !show_progress {
        pdfium_auto::ensure_pdfium_library(None).context("Failed to download PDFium engine")?;
        return Ok(());
    }

    let dl_bar = ProgressBar::new(0);
    dl_bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {bytes}/{total_bytes}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  "),
    );
    dl_bar.set_prefix("PDF engine");
    dl_bar.enable_steady_tick(Duration::from_millis(80));

    let bar = dl_bar.clone();
    pdfium_auto::ensure_pdfium_library(Some(&|downloaded, total| {
        if let Some(t) = total {
            bar.set_length(t);
        }
        bar.set_position(downloaded);
    }))
    .context("Failed to download PDFium engine")?;

    dl_bar.finish_with_message("ready ✓");
    Ok(())
}

/// Map CLI args to `SummarizeConfig`.
fn build_config(cli: &Cli) -> Result<SummarizeConfig> {
    let mut builder = SummarizeConfig::builder()
        .model(&cli.model)
        .provider_name(&cli.provider)
        .summary_type(cli.summary_type.into())
        .output_dir(&cli.output_dir)
        .suffix(&cli.suffix)
        .execution(if cli.asynchronous {
            ExecutionMode::Async
        } else {
            ExecutionMode::Sync
        })
        .extraction(ExtractionMode::from_env())
        .temperature(cli.temperature);

    if let Some(n) = cli.max_tokens {
        builder = builder.max_tokens(n);
    }

    builder.build().context("Invalid configuration")
}

fn print_report(cli: &Cli, report: &BatchReport, show_progress: bool) -> Result<()> {
    if cli.json {
        let json = serde_json::to_string_pretty(report).context("Failed to serialise report")?;
        println!("{json}");
        return Ok(());
    }
    if cli.quiet {
        return Ok(());
    }

    for record in &report.records {
        eprintln!(
            "  {} {}  →  {}  {}",
            green("✓"),
            record.source.display(),
            bold(&record.output.display().to_string()),
            dim(&format!("{} words", record.word_count)),
        );
    }
    if !show_progress {
        eprintln!(
            "Wrote {} summaries in {}ms",
            report.records.len(),
            report.duration_ms
        );
    }
    Ok(())
}
