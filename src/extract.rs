//! Eager (full-document) extraction entry point.
//!
//! ## Failure contract
//!
//! Extraction is best-effort: a diagram that fails to compile or convert is
//! recorded in its [`DiagramResult`] and the run moves on to the next one.
//! Only conditions that would fail every diagram identically — unreadable
//! input, an unspawnable pdflatex, an unwritable output directory — abort
//! the run with `Err`.
//!
//! ## Intermediate artifacts
//!
//! Each diagram is compiled inside its own [`tempfile::TempDir`]; only the
//! final SVG is copied into the output directory. Dropping the temp dir
//! removes the `.tex`/`.pdf`/`.aux`/`.log` debris after every attempt,
//! success or failure, even if the process panics mid-run. With
//! `keep_intermediates` the diagram is compiled directly in the output
//! directory and nothing is removed.

use crate::config::ExtractConfig;
use crate::error::{DiagramError, DocfigsError};
use crate::output::{DiagramResult, ExtractOutput, ExtractStats};
use crate::pipeline::compile::{self, CompileError};
use crate::pipeline::vectorize::PdfConverter;
use crate::pipeline::{scan, wrap};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Extract all selected TikZ diagrams from `input` and write one SVG per
/// diagram into `config.output_dir`.
///
/// This is the primary entry point for the extraction half of the library.
///
/// # Returns
/// `Ok(ExtractOutput)` on success, even if some (or all) diagrams failed
/// (check `output.stats.failed`). A document with zero matching
/// environments is a successful run with `stats.found == 0`.
///
/// # Errors
/// Returns `Err(DocfigsError)` only for fatal errors:
/// - Input file missing, unreadable, or not UTF-8
/// - pdflatex binary cannot be spawned at all
/// - Output directory cannot be created
/// - Diagram selection matching nothing despite fragments existing
pub fn extract(
    input: impl AsRef<Path>,
    config: &ExtractConfig,
) -> Result<ExtractOutput, DocfigsError> {
    let total_start = Instant::now();
    let input = input.as_ref();
    info!("Starting extraction: {}", input.display());

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let content = read_source(input)?;

    // ── Step 2: Scan fragments ───────────────────────────────────────────
    let fragments = scan::find_fragments(&content, &config.environment)?;
    info!("Found {} {} fragments", fragments.len(), config.environment);

    // ── Step 3: Compute diagram indices ──────────────────────────────────
    let indices = config.diagrams.to_indices(fragments.len());
    if indices.is_empty() && !fragments.is_empty() {
        return Err(DocfigsError::SelectionOutOfRange {
            total: fragments.len(),
        });
    }
    debug!("Selected {} diagrams", indices.len());

    if let Some(ref cb) = config.progress_callback {
        cb.on_extract_start(indices.len());
    }

    // ── Step 4: Prepare output directory ─────────────────────────────────
    std::fs::create_dir_all(&config.output_dir).map_err(|e| DocfigsError::OutputWriteFailed {
        path: config.output_dir.clone(),
        source: e,
    })?;

    // ── Step 5: Discover the PDF→SVG converter once ──────────────────────
    let converter = PdfConverter::discover(config.converter, config.converter_path.as_deref());
    match &converter {
        Some(c) => info!("Using {} for PDF→SVG conversion", c.name()),
        None => warn!(
            "No PDF→SVG converter found — diagrams will be compiled but not converted.\n\
             Install with: brew install pdf2svg"
        ),
    }

    // ── Step 6: Process diagrams sequentially ────────────────────────────
    let total_selected = indices.len();
    let mut diagrams = Vec::with_capacity(total_selected);
    let mut compile_ms = 0u64;
    let mut convert_ms = 0u64;

    for (pos, &idx) in indices.iter().enumerate() {
        if let Some(ref cb) = config.progress_callback {
            cb.on_diagram_start(idx, total_selected);
        }
        debug!("Processing diagram {}/{}", pos + 1, total_selected);

        let started = Instant::now();
        let outcome = process_diagram(idx, &fragments[idx], converter.as_ref(), config);
        let duration_ms = started.elapsed().as_millis() as u64;

        let result = match outcome {
            Ok(done) => {
                compile_ms += done.compile_ms;
                convert_ms += done.convert_ms;
                if let Some(ref cb) = config.progress_callback {
                    cb.on_diagram_complete(idx, total_selected, done.svg_bytes);
                }
                DiagramResult {
                    index: idx,
                    svg_path: Some(done.svg_path),
                    source: fragments[idx].clone(),
                    error: None,
                    duration_ms,
                }
            }
            Err(Failure::Fatal(e)) => return Err(e),
            Err(Failure::Diagram(e)) => {
                warn!("{e}");
                if let Some(ref cb) = config.progress_callback {
                    cb.on_diagram_error(idx, total_selected, &e.to_string());
                }
                DiagramResult {
                    index: idx,
                    svg_path: None,
                    source: fragments[idx].clone(),
                    error: Some(e),
                    duration_ms,
                }
            }
        };
        diagrams.push(result);
    }

    // ── Step 7: Compute stats ────────────────────────────────────────────
    let converted = diagrams.iter().filter(|d| d.error.is_none()).count();
    let failed = diagrams.len() - converted;

    let stats = ExtractStats {
        found: fragments.len(),
        converted,
        failed,
        compile_duration_ms: compile_ms,
        convert_duration_ms: convert_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Extraction complete: {}/{} diagrams, {}ms total",
        converted, total_selected, stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_extract_complete(total_selected, converted);
    }

    Ok(ExtractOutput { diagrams, stats })
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Read and validate the LaTeX source.
fn read_source(path: &Path) -> Result<String, DocfigsError> {
    if !path.exists() {
        return Err(DocfigsError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    match std::fs::read_to_string(path) {
        Ok(s) => Ok(s),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(DocfigsError::PermissionDenied {
                path: path.to_path_buf(),
            })
        }
        Err(e) if e.kind() == std::io::ErrorKind::InvalidData => Err(DocfigsError::NotUtf8 {
            path: path.to_path_buf(),
        }),
        Err(_) => Err(DocfigsError::FileNotFound {
            path: path.to_path_buf(),
        }),
    }
}

struct Converted {
    svg_path: PathBuf,
    svg_bytes: u64,
    compile_ms: u64,
    convert_ms: u64,
}

enum Failure {
    /// Abort the whole run.
    Fatal(DocfigsError),
    /// Record and continue.
    Diagram(DiagramError),
}

/// Wrap → compile → vectorize one fragment.
fn process_diagram(
    index: usize,
    fragment: &str,
    converter: Option<&PdfConverter>,
    config: &ExtractConfig,
) -> Result<Converted, Failure> {
    // Work directory: throwaway temp dir, or the output dir when the caller
    // wants the intermediates kept for debugging.
    let temp_dir = if config.keep_intermediates {
        None
    } else {
        Some(
            tempfile::TempDir::new()
                .map_err(|e| Failure::Fatal(DocfigsError::Internal(format!("tempdir: {e}"))))?,
        )
    };
    let work_dir: &Path = temp_dir
        .as_ref()
        .map(|t| t.path())
        .unwrap_or(&config.output_dir);

    let tex_file = wrap::write_standalone(work_dir, index, fragment, config.border_pt)
        .map_err(Failure::Fatal)?;

    let compile_start = Instant::now();
    let pdf_file = compile::compile_to_pdf(&config.pdflatex, &tex_file).map_err(|e| match e {
        CompileError::CompilerMissing(path) => {
            Failure::Fatal(DocfigsError::CompilerNotFound { path })
        }
        CompileError::Failed(detail) => {
            Failure::Diagram(DiagramError::CompileFailed { index, detail })
        }
    })?;
    let compile_ms = compile_start.elapsed().as_millis() as u64;

    let converter = converter.ok_or(Failure::Diagram(DiagramError::ConverterUnavailable {
        index,
    }))?;

    let work_svg = tex_file.with_extension("svg");
    let convert_start = Instant::now();
    converter.convert(&pdf_file, &work_svg).map_err(|detail| {
        Failure::Diagram(DiagramError::ConvertFailed {
            index,
            converter: converter.name().to_string(),
            detail,
        })
    })?;
    let convert_ms = convert_start.elapsed().as_millis() as u64;

    // Move the SVG into the output directory. `fs::copy` rather than
    // `fs::rename` because the temp dir may sit on another filesystem.
    let final_svg = config.output_dir.join(format!("diagram_{index}.svg"));
    if work_svg != final_svg {
        std::fs::copy(&work_svg, &final_svg).map_err(|e| {
            Failure::Fatal(DocfigsError::OutputWriteFailed {
                path: final_svg.clone(),
                source: e,
            })
        })?;
    }
    let svg_bytes = std::fs::metadata(&final_svg).map(|m| m.len()).unwrap_or(0);

    // temp_dir drops here, removing .tex/.pdf/.aux/.log
    Ok(Converted {
        svg_path: final_svg,
        svg_bytes,
        compile_ms,
        convert_ms,
    })
}
