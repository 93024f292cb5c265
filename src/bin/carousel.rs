//! CLI binary for carousel-forge.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `PipelineConfig` and prints results.

use anyhow::{Context, Result};
use carousel_forge::{
    generate_images, generate_pptx, PipelineConfig, PipelineOutput, PipelineProgressCallback,
    ProgressCallback, Stage,
};
use clap::error::ErrorKind;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
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

/// Terminal progress: a spinner naming the running stage, plus one log line
/// per finished stage printed above it.
struct CliProgressCallback {
    bar: ProgressBar,
    stage_started: Mutex<Option<Instant>>,
    completed: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Preparing");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            stage_started: Mutex::new(None),
            completed: AtomicUsize::new(0),
        })
    }

    fn elapsed_secs(&self) -> f64 {
        self.stage_started
            .lock()
            .ok()
            .and_then(|mut t| t.take())
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl PipelineProgressCallback for CliProgressCallback {
    fn on_pipeline_start(&self, total_stages: usize) {
        self.bar.set_length(total_stages as u64);
    }

    fn on_stage_start(&self, stage: Stage) {
        if let Ok(mut t) = self.stage_started.lock() {
            *t = Some(Instant::now());
        }
        let done = self.completed.load(Ordering::SeqCst);
        let total = self.bar.length().unwrap_or(0);
        self.bar.set_prefix(format!("[{}/{}]", done + 1, total));
        self.bar.set_message(format!("{stage}…"));
    }

    fn on_stage_complete(&self, stage: Stage, detail: &str) {
        self.completed.fetch_add(1, Ordering::SeqCst);
        let detail = if detail.is_empty() {
            String::new()
        } else {
            format!("  {}", dim(detail))
        };
        self.bar.println(format!(
            "  {} {}{}  {}",
            green("✓"),
            stage,
            detail,
            dim(&format!("{:.1}s", self.elapsed_secs())),
        ));
    }

    fn on_warning(&self, stage: Stage, message: &str) {
        // Tool stderr can be long; the first line is enough on screen.
        let first = message.lines().next().unwrap_or_default();
        self.bar
            .println(format!("  {} {}: {}", yellow("⚠"), stage, first));
    }

    fn on_pipeline_complete(&self, _output: &PipelineOutput) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Deck and JPEGs (written to ../carousel_images next to the input)
  carousel data/carousel_outputs/Superhuman_pillar_01_growth_loops.json

  # Deck only, no LibreOffice needed
  carousel --pptx-only post.json

  # Custom output directory and DPI
  carousel --output-dir out/ --dpi 150 post.json

  # macOS app bundle instead of soffice on PATH
  carousel --soffice /Applications/LibreOffice.app/Contents/MacOS/soffice post.json

  # Machine-readable result
  carousel --json post.json > result.json

INPUT FORMAT:
  {
    "title": "Growth loops are changing",
    "pillar": "pillar_01",
    "slides": [
      { "title": "Optional heading", "text_lines": ["First paragraph", "Second"] }
    ]
  }

EXTERNAL TOOLS:
  soffice     LibreOffice, PPTX → PDF
              brew install --cask libreoffice  |  apt-get install libreoffice
  pdftoppm    poppler, PDF → JPEG
              brew install poppler             |  apt-get install poppler-utils

ENVIRONMENT VARIABLES:
  CAROUSEL_OUTPUT_DIR     Output directory
  CAROUSEL_SOFFICE        Office renderer binary
  CAROUSEL_PDFTOPPM       PDF rasteriser binary
  CAROUSEL_DPI            Rasterisation DPI
  CAROUSEL_TIMEOUT        Per-tool timeout in seconds
  RUST_LOG                Override log filter (e.g. carousel_forge=debug)
"#;

/// Turn carousel JSON into a branded PPTX deck and JPEG slides.
#[derive(Parser, Debug)]
#[command(
    name = "carousel",
    version,
    about = "Turn carousel JSON into a branded PPTX deck and JPEG slides",
    long_about = "Build a 4:5 branded PPTX deck (cover plus one slide per entry) from a \
carousel JSON file, then convert it to one JPEG per slide with LibreOffice and pdftoppm.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Carousel JSON file.
    input: PathBuf,

    /// Write the PPTX only and print the manual conversion commands.
    #[arg(long)]
    pptx_only: bool,

    /// Directory for the deck and images. Default: <input dir>/../carousel_images.
    #[arg(short, long, env = "CAROUSEL_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Office renderer used for PPTX → PDF.
    #[arg(long, env = "CAROUSEL_SOFFICE", default_value = "soffice")]
    soffice: String,

    /// Rasteriser used for PDF → JPEG.
    #[arg(long, env = "CAROUSEL_PDFTOPPM", default_value = "pdftoppm")]
    pdftoppm: String,

    /// Rasterisation DPI (72–600).
    #[arg(long, env = "CAROUSEL_DPI", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// Timeout per external tool invocation, in seconds.
    #[arg(long, env = "CAROUSEL_TIMEOUT", default_value_t = 120,
          value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// Print the result as JSON on stdout.
    #[arg(long, env = "CAROUSEL_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "CAROUSEL_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "CAROUSEL_QUIET")]
    quiet: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "CAROUSEL_NO_PROGRESS")]
    no_progress: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Usage errors exit 1, not clap's default 2.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            std::process::exit(code);
        }
    };

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the spinner is active; it shows
    // the same stages.
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

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn PipelineProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Run ──────────────────────────────────────────────────────────────
    let output = if cli.pptx_only {
        generate_pptx(&cli.input, &config)
            .await
            .with_context(|| format!("Failed to generate PPTX from {}", cli.input.display()))?
    } else {
        generate_images(&cli.input, &config)
            .await
            .with_context(|| format!("Failed to generate images from {}", cli.input.display()))?
    };

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
        return Ok(());
    }

    if !cli.quiet {
        print_summary(&output, &config, cli.pptx_only);
    }

    Ok(())
}

/// Map CLI args to `PipelineConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<PipelineConfig> {
    let mut builder = PipelineConfig::builder()
        .office_bin(&cli.soffice)
        .rasterizer_bin(&cli.pdftoppm)
        .dpi(cli.dpi)
        .tool_timeout_secs(cli.timeout);

    if let Some(ref dir) = cli.output_dir {
        builder = builder.output_dir(dir);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

fn print_summary(output: &PipelineOutput, config: &PipelineConfig, pptx_only: bool) {
    eprintln!(
        "{}  {} slides  {}ms  →  {}",
        green("✔"),
        output.slide_count,
        output.stats.total_duration_ms,
        bold(&output.pptx_path.display().to_string()),
    );

    if pptx_only {
        eprintln!();
        eprintln!("{}", bold("Next steps:"));
        eprintln!("  1. Open the PPTX to verify the layout");
        eprintln!("  2. Convert to images:");
        for cmd in manual_commands(&output.pptx_path, config) {
            eprintln!("     {}", cyan(&cmd));
        }
        return;
    }

    for (idx, img) in output.images.iter().enumerate() {
        let name = img
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        eprintln!("   {} {}", dim(&format!("{:>2}.", idx + 1)), name);
    }
}

/// The two commands that turn a deck into JPEGs by hand.
fn manual_commands(pptx: &Path, config: &PipelineConfig) -> [String; 2] {
    let dir = pptx.parent().unwrap_or_else(|| Path::new("."));
    let pdf = pptx.with_extension("pdf");
    let prefix = pptx.with_extension("");
    [
        format!(
            "{} --headless --convert-to pdf \"{}\" --outdir \"{}\"",
            config.office_bin,
            pptx.display(),
            dir.display()
        ),
        format!(
            "{} -jpeg -r {} \"{}\" \"{}\"",
            config.rasterizer_bin,
            config.dpi,
            pdf.display(),
            prefix.display()
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_commands_mirror_pipeline_invocations() {
        let config = PipelineConfig::default();
        let [office, raster] = manual_commands(Path::new("out/post.pptx"), &config);
        assert_eq!(
            office,
            "soffice --headless --convert-to pdf \"out/post.pptx\" --outdir \"out\""
        );
        assert_eq!(raster, "pdftoppm -jpeg -r 300 \"out/post.pdf\" \"out/post\"");
    }

    #[test]
    fn cli_maps_flags_onto_config() {
        let cli = Cli::try_parse_from([
            "carousel",
            "--dpi",
            "150",
            "--timeout",
            "30",
            "--soffice",
            "lo",
            "--output-dir",
            "decks",
            "post.json",
        ])
        .unwrap();
        let config = build_config(&cli, None).unwrap();
        assert_eq!(config.dpi, 150);
        assert_eq!(config.tool_timeout_secs, 30);
        assert_eq!(config.office_bin, "lo");
        assert_eq!(config.output_dir, Some(PathBuf::from("decks")));
    }

    #[test]
    fn dpi_out_of_range_is_a_usage_error() {
        let err = Cli::try_parse_from(["carousel", "--dpi", "20", "post.json"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }
}
