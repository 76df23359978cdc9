//! Error types for the docfigs library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`DocfigsError`] — **Fatal**: the run cannot proceed at all (missing
//!   input file, LaTeX compiler binary not found, every icon backend
//!   failed). Returned as `Err(DocfigsError)` from the top-level
//!   [`crate::extract::extract`] and [`crate::icons::generate_icons`]
//!   functions.
//!
//! * [`DiagramError`] — **Non-fatal**: a single diagram failed (compile
//!   glitch, converter missing or erroring) but the remaining diagrams are
//!   fine. Stored inside [`crate::output::DiagramResult`] so callers can
//!   inspect partial success rather than losing the whole run to one bad
//!   fragment.
//!
//! The separation mirrors the two tools' contracts: the extractor warns and
//! continues past a bad diagram, while the icon generator treats a fully
//! broken backend chain as fatal.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the docfigs library.
///
/// Diagram-level failures use [`DiagramError`] and are stored in
/// [`crate::output::DiagramResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum DocfigsError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Input file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The LaTeX source is not valid UTF-8.
    #[error("File is not valid UTF-8 text: '{path}'")]
    NotUtf8 { path: PathBuf },

    /// The icon input file does not look like an SVG document.
    #[error("File is not an SVG document: '{path}'\nExpected an '<svg' root element.")]
    NotAnSvg { path: PathBuf },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// The LaTeX compiler binary could not be spawned at all.
    #[error(
        "LaTeX compiler not found: '{path}'\n\
         Install TeX Live or MacTeX, or pass the full path to pdflatex."
    )]
    CompilerNotFound { path: PathBuf },

    /// Diagram selection matched none of the fragments found.
    #[error("Diagram selection matches nothing (document has {total} diagrams)")]
    SelectionOutOfRange { total: usize },

    // ── Icon errors ───────────────────────────────────────────────────────
    /// A specific backend was requested but is not usable on this host.
    #[error(
        "Icon backend '{backend}' is not available.\n\
         Install it, or use --backend auto to fall back to another converter."
    )]
    BackendUnavailable { backend: String },

    /// Every backend in the chain failed for a size; output would be missing.
    #[error(
        "Could not rasterise '{path}' at {size}px — all backends failed.\n\
         Tried: {tried:?}\n\
         Install librsvg (rsvg-convert) or ImageMagick (convert)."
    )]
    AllBackendsFailed {
        path: PathBuf,
        size: u32,
        tried: Vec<String>,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create the output directory or write an output file.
    #[error("Failed to write output '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single diagram.
///
/// Stored alongside [`crate::output::DiagramResult`] when a diagram fails.
/// The overall extraction continues past failed diagrams.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum DiagramError {
    /// pdflatex ran but produced no PDF.
    #[error("Diagram {index}: LaTeX compilation failed: {detail}")]
    CompileFailed { index: usize, detail: String },

    /// The PDF→SVG converter ran but produced no SVG.
    #[error("Diagram {index}: {converter} failed: {detail}")]
    ConvertFailed {
        index: usize,
        converter: String,
        detail: String,
    },

    /// No working PDF→SVG converter was found on this host.
    #[error(
        "Diagram {index}: no PDF→SVG converter found.\n\
         Install with: brew install pdf2svg (or: apt install pdf2svg dvisvgm)"
    )]
    ConverterUnavailable { index: usize },
}
