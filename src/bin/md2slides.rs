//! CLI binary for md2slides.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use md2slides::{
    build_deck, convert::write_atomic, convert_file, ConversionConfig, ConversionOutput,
    ConversionProgressCallback, ImageError, OutlineBuilder, ProgressCallback,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
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

/// Terminal progress callback: a progress bar over slides plus one log line
/// per dropped image.
struct CliProgressCallback {
    bar: ProgressBar,
    skipped: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} slides  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Parsing");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            skipped: AtomicUsize::new(0),
        })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_slides: usize) {
        self.bar.set_length(total_slides as u64);
    }

    fn on_slide_complete(&self, slide_num: usize, _total: usize, block_count: usize) {
        self.bar
            .set_message(format!("slide {slide_num}: {block_count} blocks"));
        self.bar.inc(1);
    }

    fn on_image_skipped(&self, slide_num: usize, _src: &str, reason: &ImageError) {
        self.skipped.fetch_add(1, Ordering::SeqCst);
        self.bar.println(format!(
            "  {} Slide {:>3}  {}",
            red("✗"),
            slide_num,
            dim(&reason.to_string())
        ));
    }

    fn on_conversion_complete(&self, total_slides: usize, skipped_images: usize) {
        self.bar.finish_and_clear();
        if skipped_images == 0 {
            eprintln!(
                "{} {} slides parsed",
                green("✔"),
                bold(&total_slides.to_string())
            );
        } else {
            eprintln!(
                "{} {} slides parsed  ({} images skipped)",
                cyan("⚠"),
                bold(&total_slides.to_string()),
                red(&skipped_images.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Slide records as JSON on stdout
  md2slides talk.md

  # Write JSON to a file
  md2slides talk.md -o talk.slides.json

  # Human-readable outline
  md2slides --format outline talk.md

  # Read from stdin, never touch the network
  cat talk.md | md2slides --offline -

  # Slides plus the image report (downloaded temp files, skipped images)
  md2slides --report talk.md > talk.json

DOCUMENT CONVENTIONS:
  Slides are separated by lines containing exactly ---
  A slide title is the first '# heading', '**bold line**' or 'Slide N: title'
  within the first three lines; otherwise the first heading or bold text of
  the body, otherwise "Slide N".
  '(AI prompt: ...)' annotations are removed from all text.

ENVIRONMENT VARIABLES:
  RUST_LOG                 Override the log filter (e.g. md2slides=debug)
  MD2SLIDES_IMAGE_TIMEOUT  Per-image download timeout in seconds
  MD2SLIDES_IMAGE_DIR      Directory for downloaded images
"#;

/// Convert Markdown documents into structured slide records.
#[derive(Parser, Debug)]
#[command(
    name = "md2slides",
    version,
    about = "Convert Markdown documents into structured slide records",
    long_about = "Split a Markdown document on '---' lines into slides, extract titles, strip \
generator annotations, and emit bullets, paragraphs and resolved images per slide.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Markdown file path, or - for stdin.
    input: String,

    /// Write output to this file instead of stdout.
    #[arg(short, long, env = "MD2SLIDES_OUTPUT")]
    output: Option<PathBuf>,

    /// Output format.
    #[arg(long, env = "MD2SLIDES_FORMAT", value_enum, default_value = "json")]
    format: FormatArg,

    /// Emit {slides, report} instead of the bare slide list (JSON only).
    #[arg(long)]
    report: bool,

    /// Skip remote images instead of downloading them.
    #[arg(long, env = "MD2SLIDES_OFFLINE")]
    offline: bool,

    /// Per-image download timeout in seconds.
    #[arg(long, env = "MD2SLIDES_IMAGE_TIMEOUT", default_value_t = 10,
          value_parser = clap::value_parser!(u64).range(1..))]
    image_timeout: u64,

    /// Directory for downloaded images (default: system temp dir).
    #[arg(long, env = "MD2SLIDES_IMAGE_DIR")]
    image_dir: Option<PathBuf>,

    /// Directory relative image paths resolve against (default: the input file's directory).
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Disable progress bar.
    #[arg(long, env = "MD2SLIDES_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MD2SLIDES_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MD2SLIDES_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum FormatArg {
    Json,
    Outline,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level library logs; verbose wins.
    let show_progress = !cli.quiet && !cli.no_progress;
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
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Run conversion ───────────────────────────────────────────────────
    let output = convert_file(&cli.input, &config).context("Conversion failed")?;
    let rendered = render(&output, cli.format, cli.report)?;

    if let Some(ref output_path) = cli.output {
        write_atomic(output_path, rendered.as_bytes())
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        if !cli.quiet {
            eprintln!(
                "{}  {} slides  {}ms  →  {}",
                if output.report.skipped_images.is_empty() {
                    green("✔")
                } else {
                    cyan("⚠")
                },
                output.report.slide_count,
                output.report.duration_ms,
                bold(&output_path.display().to_string()),
            );
        }
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(rendered.as_bytes())
            .context("Failed to write to stdout")?;
        if !rendered.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    if !cli.quiet && !output.report.downloaded_images.is_empty() {
        eprintln!(
            "   {} images downloaded (kept on disk for the deck builder)",
            dim(&output.report.downloaded_images.len().to_string())
        );
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .image_timeout_secs(cli.image_timeout)
        .download_images(!cli.offline);

    if let Some(ref dir) = cli.image_dir {
        builder = builder.image_dir(dir);
    }
    if let Some(ref dir) = cli.base_dir {
        builder = builder.base_dir(dir);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Serialise the conversion result in the requested format.
fn render(output: &ConversionOutput, format: FormatArg, report: bool) -> Result<String> {
    match format {
        FormatArg::Json if report => {
            serde_json::to_string_pretty(output).context("Failed to serialise output")
        }
        FormatArg::Json => {
            serde_json::to_string_pretty(&output.slides).context("Failed to serialise slides")
        }
        FormatArg::Outline => {
            let mut outline = OutlineBuilder::new();
            build_deck(&output.slides, &mut outline).context("Failed to render outline")?;
            Ok(outline.finish())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_flag() {
        let cli = Cli::try_parse_from(["md2slides", "--report", "talk.md"]).unwrap();
        assert!(cli.report);
        assert_eq!(cli.input, "talk.md");

        let cli = Cli::try_parse_from(["md2slides", "talk.md"]).unwrap();
        assert!(!cli.report);
        assert!(Cli::try_parse_from(["md2slides", "--with-report", "talk.md"]).is_err());
    }

    #[test]
    fn test_render_json_with_and_without_report() {
        let output = ConversionOutput {
            slides: md2slides::parse_slides("# Hi\n\nthere", &md2slides::NoImages),
            report: Default::default(),
        };

        let bare: serde_json::Value =
            serde_json::from_str(&render(&output, FormatArg::Json, false).unwrap()).unwrap();
        assert!(bare.is_array());

        let full: serde_json::Value =
            serde_json::from_str(&render(&output, FormatArg::Json, true).unwrap()).unwrap();
        assert!(full.get("slides").is_some());
        assert!(full.get("report").is_some());
    }
}
