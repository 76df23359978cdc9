//! CLI binary for PWA icon generation.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `IconConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use docfigs::{generate_icons, IconBackend, IconConfig};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Default: render docs/infinity-7-layered.svg at 192 and 512 px into docs/
  pwa-icons

  # A different logo, extra favicon sizes
  pwa-icons assets/logo.svg --sizes 32,180,192,512

  # Force the librsvg backend
  pwa-icons --backend rsvg docs/logo.svg

  # Structured report for CI
  pwa-icons --json docs/logo.svg

BACKENDS (tried in order with --backend auto):
  native   in-process resvg renderer — always available, no install needed
  rsvg     rsvg-convert — brew install librsvg
  magick   ImageMagick convert — brew install imagemagick

  External backends are discovered by probing common install locations;
  pass --rsvg-path / --magick-path to pin an exact binary.

ENVIRONMENT VARIABLES:
  PWA_ICONS_INPUT        Source SVG (same as the positional argument)
  PWA_ICONS_OUTPUT_DIR   Output directory (same as -o)
"#;

/// Rasterise an SVG into the PNG icon sizes a PWA manifest needs.
#[derive(Parser, Debug)]
#[command(
    name = "pwa-icons",
    version,
    about = "Generate PWA icon PNGs from an SVG",
    long_about = "Rasterise a single SVG into square PNG icons at the sizes a PWA manifest \
requires (192 and 512 by default). Rendering uses the in-process resvg backend when \
possible, falling back to rsvg-convert and then ImageMagick.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Source SVG file.
    #[arg(env = "PWA_ICONS_INPUT", default_value = "docs/infinity-7-layered.svg")]
    svg: PathBuf,

    /// Directory the icon-<size>.png files are written to.
    #[arg(short, long, env = "PWA_ICONS_OUTPUT_DIR", default_value = "docs")]
    output_dir: PathBuf,

    /// Pixel sizes to generate, comma-separated.
    #[arg(long, value_delimiter = ',', default_values_t = [192u32, 512])]
    sizes: Vec<u32>,

    /// Rasteriser backend: auto, native, rsvg, magick.
    #[arg(long, value_enum, default_value = "auto")]
    backend: BackendArg,

    /// Exact rsvg-convert binary to use, skipping path probing.
    #[arg(long)]
    rsvg_path: Option<PathBuf>,

    /// Exact ImageMagick convert binary to use, skipping path probing.
    #[arg(long)]
    magick_path: Option<PathBuf>,

    /// Output a structured JSON report instead of log lines.
    #[arg(long)]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum BackendArg {
    Auto,
    Native,
    Rsvg,
    Magick,
}

impl From<BackendArg> for IconBackend {
    fn from(v: BackendArg) -> Self {
        match v {
            BackendArg::Auto => IconBackend::Auto,
            BackendArg::Native => IconBackend::Native,
            BackendArg::Rsvg => IconBackend::Rsvg,
            BackendArg::Magick => IconBackend::Magick,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || cli.json {
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
    let mut builder = IconConfig::builder()
        .input(&cli.svg)
        .output_dir(&cli.output_dir)
        .sizes(cli.sizes.iter().copied())
        .backend(cli.backend.into());

    if let Some(ref path) = cli.rsvg_path {
        builder = builder.rsvg_path(path);
    }
    if let Some(ref path) = cli.magick_path {
        builder = builder.magick_path(path);
    }

    let config = builder.build().context("Invalid configuration")?;

    // ── Run generation ───────────────────────────────────────────────────
    // Any failure (missing input, all backends dead) exits 1 via anyhow.
    let output = generate_icons(&config).context("Icon generation failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
        return Ok(());
    }

    if !cli.quiet {
        for icon in &output.icons {
            eprintln!(
                "  {} {}  {:<12}  {}",
                green("✓"),
                bold(&icon.path.display().to_string()),
                dim(&format!("{} bytes", icon.bytes)),
                dim(&format!("via {}", icon.backend)),
            );
        }
        eprintln!(
            "{} {} icons generated in {}ms",
            green("✔"),
            bold(&output.stats.generated.to_string()),
            output.stats.total_duration_ms,
        );
    }

    Ok(())
}
