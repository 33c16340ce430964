//! CLI binary for docuconvert.
//!
//! A thin shim over the library crate: flags become a `ConversionConfig`,
//! the document goes through the same controller a GUI would drive, and the
//! result is printed, exported or copied.

use anyhow::{Context, Result};
use clap::Parser;
use docuconvert::{
    build_controller, intake, resolve_source, CanonicalFile, ConversionConfig, DocuError,
    Extraction, FsDownloadSink, IntakeSource, Locale, ResultPresenter, StatusCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
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

// ── CLI status callback using indicatif ──────────────────────────────────────

/// Spinner shown while the controller is Processing.
struct CliStatusCallback {
    bar: ProgressBar,
}

impl CliStatusCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Preparing");
        Arc::new(Self { bar })
    }
}

impl StatusCallback for CliStatusCallback {
    fn on_file_selected(&self, file_name: Option<&str>, size: usize) {
        if let Some(name) = file_name {
            self.bar.println(format!(
                "{} {}  {}",
                cyan("◆"),
                bold(name),
                dim(&format!("{:.1} KB", size as f64 / 1024.0))
            ));
        }
    }

    fn on_conversion_start(&self, file_name: &str) {
        self.bar.set_prefix("Converting");
        self.bar.set_message(file_name.to_string());
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    fn on_conversion_complete(&self, _file_name: &str, text_len: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} chars extracted",
            green("✔"),
            bold(&text_len.to_string())
        );
    }

    // The message itself is reported once, by `main`.
    fn on_conversion_error(&self, _file_name: &str, _message: &str) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Image to Markdown on stdout
  docuconvert invoice.png

  # Scanned PDF to a Markdown file and a Word document
  docuconvert contract.pdf -o contract.md --word contract.doc

  # Screenshot currently on the clipboard, result copied back
  docuconvert --paste --copy

  # Remote image
  docuconvert https://example.org/receipt.jpg

  # Vietnamese messages, JSON state dump
  docuconvert --locale vi --json scan.webp > result.json

SUPPORTED INPUTS:
  PDF, PNG, JPEG, WebP, HEIC; up to 20 MB by default (--max-file-size-mb).
  URLs must serve an image/* content type. Sites that refuse direct
  downloads: copy the image in the browser and use --paste instead.

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY          Google Gemini API key (default provider)
  OPENAI_API_KEY          OpenAI API key (with --provider openai)
  ANTHROPIC_API_KEY       Anthropic API key (with --provider anthropic)
  EDGEQUAKE_LLM_PROVIDER  Override provider (gemini, openai, anthropic, ollama)
  EDGEQUAKE_MODEL         Override model ID
  RUST_LOG                Log filter, e.g. docuconvert=debug

SETUP:
  1. Set API key:     export GEMINI_API_KEY=...
  2. Convert:         docuconvert scan.png -o scan.md
"#;

/// Extract text, tables and formulas from images and PDFs with a vision LLM.
#[derive(Parser, Debug)]
#[command(
    name = "docuconvert",
    version,
    about = "Extract text, tables and formulas from images and PDFs with a vision LLM",
    long_about = "Send an image or PDF (local file, URL or clipboard screenshot) to a multimodal \
LLM and get back clean rich text: headings, lists, pipe tables and $-delimited formulas, ready \
to paste into Word or Google Docs. Defaults to Google Gemini; any edgequake-llm vision provider works.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local file path or HTTP/HTTPS image URL.
    #[arg(required_unless_present = "paste")]
    input: Option<String>,

    /// Read the document from a clipboard image instead of INPUT.
    #[arg(long, conflicts_with = "input")]
    paste: bool,

    /// Write Markdown to this file instead of stdout.
    #[arg(short, long, env = "DOCUCONVERT_OUTPUT")]
    output: Option<PathBuf>,

    /// Also export a Word-compatible .doc to this file.
    #[arg(long, env = "DOCUCONVERT_WORD")]
    word: Option<PathBuf>,

    /// Copy the result to the clipboard.
    #[arg(long, env = "DOCUCONVERT_COPY")]
    copy: bool,

    /// Print the final state (status, file, result, tokens) as JSON.
    #[arg(long, env = "DOCUCONVERT_JSON")]
    json: bool,

    /// LLM model ID (default: gemini-2.5-flash).
    #[arg(long, env = "DOCUCONVERT_MODEL")]
    model: Option<String>,

    /// LLM provider: gemini, openai, anthropic, ollama, azure.
    #[arg(
        long,
        env = "DOCUCONVERT_PROVIDER",
        long_help = "LLM provider. Auto-detected from API key env vars if not set \
(GEMINI_API_KEY first).\nThe model must accept image and PDF input."
    )]
    provider: Option<String>,

    /// Path to a text file containing a custom instruction prompt.
    #[arg(long, env = "DOCUCONVERT_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Language of user-facing messages: en, vi.
    #[arg(long, env = "DOCUCONVERT_LOCALE", default_value = "en")]
    locale: Locale,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "DOCUCONVERT_TEMPERATURE", default_value_t = 0.1)]
    temperature: f32,

    /// Max LLM output tokens.
    #[arg(long, env = "DOCUCONVERT_MAX_TOKENS", default_value_t = 8192)]
    max_tokens: usize,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "DOCUCONVERT_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Largest accepted document in MiB.
    #[arg(long, env = "DOCUCONVERT_MAX_FILE_SIZE_MB", default_value_t = 20,
          value_parser = clap::value_parser!(u64).range(1..=1024))]
    max_file_size_mb: u64,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOCUCONVERT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "DOCUCONVERT_QUIET")]
    quiet: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "DOCUCONVERT_NO_PROGRESS")]
    no_progress: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let locale = cli.locale;

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner gives the feedback that matters; keep INFO logs out of
    // its way unless asked for.
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

    // ── Build config and controller ──────────────────────────────────────
    let config = build_config(&cli).await?;
    let mut controller = build_controller(&config).map_err(|e| localised(e, locale))?;
    if show_progress {
        controller = controller.with_callback(CliStatusCallback::new());
    }

    // ── Intake ───────────────────────────────────────────────────────────
    let source = if cli.paste {
        read_paste(locale)?
    } else {
        // clap guarantees INPUT when --paste is absent
        resolve_source(cli.input.as_deref().unwrap_or_default())
    };
    let file = intake(source, &config)
        .await
        .map_err(|e| localised(e, locale))?;
    if !show_progress {
        tracing::info!("Selected {}", describe(&file));
    }
    controller
        .select_file(Some(file))
        .map_err(|e| localised(e, locale))?;

    // ── Convert ──────────────────────────────────────────────────────────
    let extraction = controller
        .convert()
        .await
        .map_err(|e| localised(e, locale))?;

    let state = controller.snapshot();
    let mut presenter = ResultPresenter::new(locale);
    presenter.set_content(&state.result);

    // ── Present ──────────────────────────────────────────────────────────
    if let Some(ref path) = cli.output {
        let (sink, name) = sink_for(path)?;
        presenter
            .export_markdown_as(&sink, &name)
            .map_err(|e| localised(e, locale))?;
        if !cli.quiet {
            eprintln!("{}  Markdown  →  {}", green("✔"), bold(&path.display().to_string()));
        }
    }
    if let Some(ref path) = cli.word {
        let (sink, name) = sink_for(path)?;
        presenter
            .export_word_as(&sink, &name)
            .map_err(|e| localised(e, locale))?;
        if !cli.quiet {
            eprintln!("{}  Word      →  {}", green("✔"), bold(&path.display().to_string()));
        }
    }
    if cli.copy {
        copy_result(&mut presenter, cli.quiet);
    }

    if cli.json {
        let report = serde_json::json!({
            "state": state,
            "extraction": extraction,
        });
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise state")?;
        println!("{json}");
    } else if cli.output.is_none() && cli.word.is_none() {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(presenter.rendered().as_bytes())
            .context("Failed to write to stdout")?;
        handle.write_all(b"\n").ok();
    }

    if !cli.quiet && !cli.json {
        if let Some(ref x) = extraction {
            print_summary(x);
        }
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
async fn build_config(cli: &Cli) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .locale(cli.locale)
        .download_timeout_secs(cli.download_timeout)
        .max_file_bytes(cli.max_file_size_mb * 1024 * 1024);

    if let Some(ref model) = cli.model {
        builder = builder.model(model);
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider);
    }
    if let Some(ref path) = cli.system_prompt {
        let prompt = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read system prompt from {:?}", path))?;
        builder = builder.system_prompt(prompt);
    }

    builder.build().map_err(|e| localised(e, cli.locale))
}

/// Replace a library error with its localised user message.
///
/// The returned error carries the message alone; the underlying error only
/// goes to the log.
fn localised(e: DocuError, locale: Locale) -> anyhow::Error {
    tracing::debug!("{:?}", e);
    anyhow::anyhow!("{} {}", red("✘"), e.user_message(locale))
}

fn describe(file: &CanonicalFile) -> String {
    format!("{} ({})", file.name(), file.summary())
}

/// Split an output path into a sink rooted at its directory and a file name.
fn sink_for(path: &Path) -> Result<(FsDownloadSink, String)> {
    let name = path
        .file_name()
        .with_context(|| format!("Not a file path: {}", path.display()))?
        .to_string_lossy()
        .into_owned();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((FsDownloadSink::new(dir), name))
}

#[cfg(feature = "clipboard")]
fn read_paste(locale: Locale) -> Result<IntakeSource> {
    use docuconvert::{Clipboard, SystemClipboard};

    let image = SystemClipboard
        .read_image()
        .and_then(|img| img.ok_or(DocuError::ClipboardEmpty))
        .map_err(|e| localised(e, locale))?;
    Ok(IntakeSource::Paste {
        mime: image.mime,
        bytes: image.bytes,
    })
}

#[cfg(not(feature = "clipboard"))]
fn read_paste(_locale: Locale) -> Result<IntakeSource> {
    anyhow::bail!("--paste requires the `clipboard` feature")
}

#[cfg(feature = "clipboard")]
fn copy_result(presenter: &mut ResultPresenter, quiet: bool) {
    if presenter.copy(&docuconvert::SystemClipboard) && !quiet {
        if let Some(label) = presenter.copy_label() {
            eprintln!("{} {}", green("✔"), label);
        }
    }
}

#[cfg(not(feature = "clipboard"))]
fn copy_result(_presenter: &mut ResultPresenter, _quiet: bool) {
    tracing::warn!("--copy ignored: built without the `clipboard` feature");
}

fn print_summary(x: &Extraction) {
    eprintln!(
        "   {} tokens in  /  {} tokens out  —  {}ms total",
        dim(&x.input_tokens.to_string()),
        dim(&x.output_tokens.to_string()),
        x.duration_ms,
    );
}
