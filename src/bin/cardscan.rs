//! CLI binary for cardscan.
//!
//! A thin shim over the library crate that maps CLI flags to `ScanConfig`,
//! renders progress, and writes the export files.

use anyhow::{Context, Result};
use cardscan::{
    ProgressCallback, ScanConfig, ScanProgressCallback, ScanSession, ScanStatus,
};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
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

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a single percentage bar whose message tracks
/// the pipeline stage. The Analyzing portion is advisory — the extraction
/// call is one remote operation — so the bar creeps rather than measures.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> ProgressCallback {
        let bar = ProgressBar::new(100);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}%  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Scanning");
        bar.enable_steady_tick(Duration::from_millis(80));
        std::sync::Arc::new(Self { bar })
    }
}

impl ScanProgressCallback for CliProgressCallback {
    fn on_stage(&self, status: ScanStatus, message: &str) {
        let label = match status {
            ScanStatus::Compressing => "Optimizing image…",
            ScanStatus::Analyzing => "Scanning cards…",
            _ => message,
        };
        self.bar.set_message(label.to_string());
    }

    fn on_progress(&self, percent: u8) {
        self.bar.set_position(percent as u64);
    }

    fn on_complete(&self, cards: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} card{} found",
            green("✔"),
            bold(&cards.to_string()),
            if cards == 1 { "" } else { "s" }
        );
    }

    fn on_error(&self, _message: &str) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Scan a card photo and write contacts_<date>.csv + .vcf next to it
  cardscan card.jpg

  # CSV only, into a chosen directory
  cardscan card.jpg --format csv -o ~/contacts

  # Export the second detected card as its own vCard
  cardscan stack.jpg --single 2

  # Machine-readable output (records + stats as JSON on stdout)
  cardscan card.jpg --json

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY    API key for the extraction service (required)
  CARDSCAN_MODEL    Override the extraction model

SETUP:
  1. Set API key:   export GEMINI_API_KEY=AIza...
  2. Scan:          cardscan card.jpg
"#;

/// Scan business-card images into digital contacts using Vision LLMs.
#[derive(Parser, Debug)]
#[command(
    name = "cardscan",
    version,
    about = "Scan business-card images into digital contacts using Vision LLMs",
    long_about = "Scan a photo of one or more business cards, extract structured contact \
records with a Vision Language Model, and export them as CSV (spreadsheet / Google \
Contacts) and vCard 3.0 (phone book) files.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Image file to scan (JPEG or PNG; may contain several cards).
    input: PathBuf,

    /// Directory to write export files into.
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Which export files to write.
    #[arg(long, value_enum, default_value = "both")]
    format: FormatArg,

    /// Export only the Nth detected card (1-indexed) as <Name>.vcf.
    #[arg(long, conflicts_with = "format")]
    single: Option<usize>,

    /// API key for the extraction service.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Extraction model ID.
    #[arg(long, env = "CARDSCAN_MODEL", default_value = cardscan::DEFAULT_MODEL)]
    model: String,

    /// Internal-reasoning token allowance for the extraction call.
    #[arg(long, default_value_t = 1024)]
    thinking_budget: u32,

    /// Extraction call timeout in seconds.
    #[arg(long, default_value_t = 60)]
    api_timeout: u64,

    /// Print records and stats as JSON on stdout instead of writing files.
    #[arg(long)]
    json: bool,

    /// Disable the progress bar.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum FormatArg {
    Csv,
    Vcf,
    Both,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
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
    let mut builder = ScanConfig::builder()
        .model(cli.model.as_str())
        .thinking_budget(cli.thinking_budget)
        .api_timeout_secs(cli.api_timeout);
    if let Some(ref key) = cli.api_key {
        builder = builder.api_key(key.as_str());
    }
    if show_progress {
        builder = builder.progress_callback(CliProgressCallback::new());
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Run the scan ─────────────────────────────────────────────────────
    let mut session = ScanSession::new(config);
    let stats = match session.process_file(&cli.input).await {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("{} Scan failed: {e}", red("✘"));
            std::process::exit(1);
        }
    };

    // ── Emit results ─────────────────────────────────────────────────────
    if cli.json {
        let output = serde_json::json!({
            "contacts": session.contacts(),
            "stats": stats,
        });
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        serde_json::to_writer_pretty(&mut handle, &output)
            .context("Failed to serialise output")?;
        handle.write_all(b"\n").ok();
        return Ok(());
    }

    if !cli.quiet {
        for contact in session.contacts() {
            let line = match (contact.company.is_empty(), contact.email.is_empty()) {
                (false, false) => {
                    format!("{} — {} ({})", contact.full_name, contact.company, contact.email)
                }
                (false, true) => format!("{} — {}", contact.full_name, contact.company),
                (true, false) => format!("{} ({})", contact.full_name, contact.email),
                (true, true) => contact.full_name.clone(),
            };
            eprintln!("  • {line}");
        }
    }

    if session.contacts().is_empty() {
        if !cli.quiet {
            eprintln!("{}", dim("No cards detected; nothing to export."));
        }
        return Ok(());
    }

    let mut written = Vec::new();
    if let Some(n) = cli.single {
        let index = n
            .checked_sub(1)
            .context("--single is 1-indexed, minimum is 1")?;
        written.push(
            session
                .save_single_vcard(index, &cli.output_dir)
                .await
                .context("Failed to write vCard")?,
        );
    } else {
        if matches!(cli.format, FormatArg::Csv | FormatArg::Both) {
            written.push(
                session
                    .save_csv(&cli.output_dir)
                    .await
                    .context("Failed to write CSV")?,
            );
        }
        if matches!(cli.format, FormatArg::Vcf | FormatArg::Both) {
            written.push(
                session
                    .save_vcard(&cli.output_dir)
                    .await
                    .context("Failed to write vCard")?,
            );
        }
    }

    if !cli.quiet {
        for path in &written {
            eprintln!("{} {}", green("✔"), bold(&path.display().to_string()));
        }
        eprintln!(
            "   {}",
            dim(&format!(
                "{}×{} → {}×{}, {} KB payload, {} ms total",
                stats.source_width,
                stats.source_height,
                stats.prepared_width,
                stats.prepared_height,
                stats.payload_bytes / 1024,
                stats.total_duration_ms
            ))
        );
    }

    Ok(())
}
