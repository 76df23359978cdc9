//! # docfigs
//!
//! Documentation figure tooling: extract TikZ diagrams from LaTeX as SVG,
//! and rasterise an SVG logo into PWA icon PNGs.
//!
//! ## Why this crate?
//!
//! Docs sites want the commutative diagrams from a paper or book rendered
//! as crisp inline SVG, not as screenshots or a 40 MB MathJax bundle. The
//! only reliable renderer for TikZ is TeX itself, so this crate drives the
//! real toolchain: each fragment is compiled with pdflatex and vectorised
//! by whichever PDF→SVG converter the host has. Icon packaging has the
//! same shape — one source SVG, several PNG sizes, a different converter on
//! every machine — so both tools share a first-available-tool probing core.
//!
//! ## Pipeline Overview
//!
//! ```text
//! LaTeX document                          logo.svg
//!  │                                       │
//!  ├─ 1. Scan    \begin{tikzcd}…\end       ├─ 1. Validate  <svg magic
//!  ├─ 2. Wrap    standalone document       ├─ 2. Backend   resvg → rsvg-convert → convert
//!  ├─ 3. Compile pdflatex (per diagram)    └─ 3. Render    icon-192.png, icon-512.png, …
//!  ├─ 4. Convert pdf2svg / dvisvgm
//!  └─ 5. Output  diagram_<n>.svg + stats
//! ```
//!
//! Everything is sequential and blocking: each external process finishes
//! before the next starts. There is no retry, no timeout, and no state
//! between runs.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docfigs::{extract, ExtractConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractConfig::builder()
//!         .output_dir("docs/diagrams")
//!         .build()?;
//!     let output = extract("paper.tex", &config)?;
//!     println!("{}/{} diagrams converted",
//!         output.stats.converted, output.stats.found);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `extract-tikz` and `pwa-icons` binaries (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! docfigs = { version = "0.1", default-features = false }
//! ```
//!
//! ## External tools
//!
//! | Tool | Used by | Install |
//! |------|---------|---------|
//! | `pdflatex` | extract-tikz | TeX Live / MacTeX |
//! | `pdf2svg` | extract-tikz | `brew install pdf2svg` |
//! | `dvisvgm` | extract-tikz (fallback) | ships with TeX Live |
//! | `rsvg-convert` | pwa-icons (fallback) | `brew install librsvg` |
//! | `convert` | pwa-icons (fallback) | `brew install imagemagick` |
//!
//! The icon generator needs no external tool at all in the common case —
//! its first backend is the in-process `resvg` renderer.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod icons;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    ConverterKind, DiagramSelection, ExtractConfig, ExtractConfigBuilder, IconBackend, IconConfig,
    IconConfigBuilder,
};
pub use error::{DiagramError, DocfigsError};
pub use extract::extract;
pub use icons::generate_icons;
pub use output::{
    DiagramResult, ExtractOutput, ExtractStats, IconOutput, IconResult, IconStats,
};
pub use progress::{ExtractProgressCallback, NoopProgressCallback, ProgressCallback};
