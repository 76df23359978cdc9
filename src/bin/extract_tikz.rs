//! CLI binary for TikZ diagram extraction.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ExtractConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use docfigs::{
    extract, ConverterKind, DiagramSelection, ExtractConfig, ExtractProgressCallback,
    ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
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

/// Terminal progress callback: renders a live progress bar and per-diagram
/// log lines using [indicatif].
struct CliProgressCallback {
    /// The single progress bar anchored at the bottom of the terminal.
    bar: ProgressBar,
    /// Per-diagram wall-clock start times for elapsed reporting.
    start_times: Mutex<HashMap<usize, Instant>>,
    /// Count of diagrams that errored out.
    errors: AtomicUsize,
}

impl CliProgressCallback {
    /// Create a callback whose progress-bar length is set dynamically
    /// by `on_extract_start` (called after the document has been scanned).
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_extract_start

        // Initial style: spinner only (no counter until we know the total).
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Scanning");
        bar.set_message("Reading LaTeX…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
            errors: AtomicUsize::new(0),
        })
    }

    /// Switch to the full progress-bar style once we know `total`.
    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} diagrams  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Compiling");
    }
}

impl ExtractProgressCallback for CliProgressCallback {
    fn on_extract_start(&self, selected: usize) {
        self.activate_bar(selected);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Found {selected} diagrams to process…"))
        ));
    }

    fn on_diagram_start(&self, index: usize, _total: usize) {
        self.start_times
            .lock()
            .unwrap()
            .insert(index, Instant::now());
        self.bar.set_message(format!("diagram {index}"));
    }

    fn on_diagram_complete(&self, index: usize, total: usize, svg_bytes: u64) {
        let elapsed_ms = self
            .start_times
            .lock()
            .unwrap()
            .remove(&index)
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0);

        self.bar.println(format!(
            "  {} Diagram {:>3}/{:<3}  {:<12}  {}",
            green("✓"),
            index + 1,
            total,
            dim(&format!("{svg_bytes:>6} bytes")),
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
        ));
        self.bar.inc(1);
    }

    fn on_diagram_error(&self, index: usize, total: usize, error: &str) {
        let elapsed_ms = self
            .start_times
            .lock()
            .unwrap()
            .remove(&index)
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0);

        self.errors.fetch_add(1, Ordering::SeqCst);

        // Truncate very long error messages to keep output tidy.
        let first_line = error.lines().next().unwrap_or(error);
        let msg = if first_line.len() > 80 {
            format!("{}\u{2026}", &first_line[..79])
        } else {
            first_line.to_string()
        };

        self.bar.println(format!(
            "  {} Diagram {:>3}/{:<3}  {}  {}",
            red("✗"),
            index + 1,
            total,
            red(&msg),
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
        ));
        self.bar.inc(1);
    }

    fn on_extract_complete(&self, total: usize, converted: usize) {
        let failed = total.saturating_sub(converted);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} diagrams converted successfully",
                green("✔"),
                bold(&converted.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} diagrams converted  ({} failed)",
                if failed == total { red("✘") } else { cyan("⚠") },
                bold(&converted.to_string()),
                total,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract every tikzcd diagram into docs/diagrams/
  extract-tikz thesis.tex

  # Use a specific pdflatex (e.g. from a TeX Live container)
  extract-tikz thesis.tex /usr/local/texlive/2024/bin/x86_64-linux/pdflatex

  # Plain tikzpicture figures, into a custom directory
  extract-tikz --environment tikzpicture -o assets/figures paper.tex

  # Only diagrams 3 through 7
  extract-tikz --diagrams 3-7 book.tex

  # Force dvisvgm and keep the .tex/.pdf intermediates for debugging
  extract-tikz --converter dvisvgm --keep-intermediates notes.tex

  # Structured report for CI
  extract-tikz --json thesis.tex > report.json

EXTERNAL TOOLS:
  pdflatex        required — TeX Live or MacTeX
  pdf2svg         preferred converter — brew install pdf2svg
  dvisvgm         fallback converter — ships with TeX Live

  Converters are discovered per run by probing common install locations
  with --version; pass --converter-path to pin an exact binary.

ENVIRONMENT VARIABLES:
  EXTRACT_TIKZ_OUTPUT_DIR   Output directory (same as -o)
  EXTRACT_TIKZ_ENVIRONMENT  Environment name (same as --environment)
"#;

/// Extract TikZ diagrams from a LaTeX document as SVG files.
#[derive(Parser, Debug)]
#[command(
    name = "extract-tikz",
    version,
    about = "Extract TikZ diagrams from LaTeX as SVG files",
    long_about = "Extract tikzcd (or any TikZ) environments from a LaTeX document, compile \
each one standalone with pdflatex, and convert the result to SVG with pdf2svg or dvisvgm. \
Failed diagrams are reported and skipped; the run continues.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// LaTeX source file to scan.
    latex_file: PathBuf,

    /// Path to the pdflatex binary.
    #[arg(default_value = "pdflatex")]
    pdflatex: PathBuf,

    /// Directory the SVG files are written to.
    #[arg(short, long, env = "EXTRACT_TIKZ_OUTPUT_DIR", default_value = "docs/diagrams")]
    output_dir: PathBuf,

    /// TikZ environment name to extract.
    #[arg(long, env = "EXTRACT_TIKZ_ENVIRONMENT", default_value = "tikzcd")]
    environment: String,

    /// Diagram selection: all, 5, 3-15, or 1,3,5,7 (1-indexed).
    #[arg(long, default_value = "all")]
    diagrams: String,

    /// PDF→SVG converter: auto, pdf2svg, dvisvgm.
    #[arg(long, value_enum, default_value = "auto")]
    converter: ConverterArg,

    /// Exact converter binary to use, skipping path probing.
    #[arg(long)]
    converter_path: Option<PathBuf>,

    /// Border padding in points around each diagram.
    #[arg(long, default_value_t = 2,
          value_parser = clap::value_parser!(u32).range(0..=100))]
    border: u32,

    /// Keep .tex/.pdf/.aux/.log files next to the SVGs.
    #[arg(long)]
    keep_intermediates: bool,

    /// Output a structured JSON report instead of log lines.
    #[arg(long)]
    json: bool,

    /// Disable progress bar.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ConverterArg {
    Auto,
    Pdf2Svg,
    Dvisvgm,
}

impl From<ConverterArg> for ConverterKind {
    fn from(v: ConverterArg) -> Self {
        match v {
            ConverterArg::Auto => ConverterKind::Auto,
            ConverterArg::Pdf2Svg => ConverterKind::Pdf2Svg,
            ConverterArg::Dvisvgm => ConverterKind::Dvisvgm,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
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
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn ExtractProgressCallback>)
    } else {
        None
    };

    let diagrams = parse_diagrams(&cli.diagrams)?;

    let mut builder = ExtractConfig::builder()
        .output_dir(&cli.output_dir)
        .pdflatex(&cli.pdflatex)
        .environment(&cli.environment)
        .border_pt(cli.border)
        .converter(cli.converter.into())
        .diagrams(diagrams)
        .keep_intermediates(cli.keep_intermediates);

    if let Some(ref path) = cli.converter_path {
        builder = builder.converter_path(path);
    }
    if let Some(cb) = progress_cb {
        builder = builder.progress_callback(cb);
    }

    let config = builder.build().context("Invalid configuration")?;

    // ── Run extraction ───────────────────────────────────────────────────
    let output = extract(&cli.latex_file, &config).context("Extraction failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
        return Ok(());
    }

    // Summary (the callback already printed the final green/red tick).
    if !cli.quiet && !show_progress {
        eprintln!(
            "Converted {}/{} diagrams in {}ms → {}",
            output.stats.converted,
            output.diagrams.len(),
            output.stats.total_duration_ms,
            cli.output_dir.display()
        );
        if output.stats.failed > 0 {
            eprintln!("  {} diagrams failed", output.stats.failed);
        }
    } else if !cli.quiet {
        eprintln!(
            "   {} compile  /  {} convert  —  {}ms total  →  {}",
            dim(&format!("{}ms", output.stats.compile_duration_ms)),
            dim(&format!("{}ms", output.stats.convert_duration_ms)),
            output.stats.total_duration_ms,
            bold(&cli.output_dir.display().to_string()),
        );
    }

    Ok(())
}

/// Parse `--diagrams` string into `DiagramSelection`.
fn parse_diagrams(s: &str) -> Result<DiagramSelection> {
    let s = s.trim().to_lowercase();

    if s == "all" {
        return Ok(DiagramSelection::All);
    }

    // Range: "3-15"
    if let Some((start, end)) = s.split_once('-') {
        let start: usize = start
            .trim()
            .parse()
            .context("Invalid start diagram in range")?;
        let end: usize = end.trim().parse().context("Invalid end diagram in range")?;

        if start < 1 {
            anyhow::bail!("Diagrams are 1-indexed, minimum is 1 (got {})", start);
        }
        if start > end {
            anyhow::bail!(
                "Invalid diagram range '{}-{}': start must be <= end",
                start,
                end
            );
        }

        return Ok(DiagramSelection::Range(start, end));
    }

    // Set: "1,3,5,7"
    if s.contains(',') {
        let items: Vec<usize> = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<usize>()
                    .context(format!("Invalid diagram number: '{}'", p.trim()))
            })
            .collect::<Result<Vec<_>>>()?;

        for &n in &items {
            if n < 1 {
                anyhow::bail!("Diagrams are 1-indexed, minimum is 1 (got {})", n);
            }
        }

        return Ok(DiagramSelection::Set(items));
    }

    // Single diagram: "5"
    let n: usize = s.parse().context("Invalid diagram number")?;
    if n < 1 {
        anyhow::bail!("Diagrams are 1-indexed, minimum is 1 (got {})", n);
    }

    Ok(DiagramSelection::Single(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_diagrams_variants() {
        assert!(matches!(
            parse_diagrams("all").unwrap(),
            DiagramSelection::All
        ));
        assert!(matches!(
            parse_diagrams("5").unwrap(),
            DiagramSelection::Single(5)
        ));
        assert!(matches!(
            parse_diagrams("3-15").unwrap(),
            DiagramSelection::Range(3, 15)
        ));
        assert!(matches!(
            parse_diagrams("1,3,5").unwrap(),
            DiagramSelection::Set(_)
        ));
    }

    #[test]
    fn parse_diagrams_rejects_zero_and_backwards_range() {
        assert!(parse_diagrams("0").is_err());
        assert!(parse_diagrams("7-3").is_err());
        assert!(parse_diagrams("x").is_err());
    }
}
