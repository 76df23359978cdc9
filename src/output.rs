//! Result and statistics types returned by the top-level entry points.
//!
//! Everything here derives `Serialize` so the CLIs can emit structured JSON
//! with `--json` and callers can persist run reports.

use crate::error::DiagramError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of one diagram: either an SVG on disk or a recorded error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramResult {
    /// 0-indexed position of the fragment in the source document.
    /// Also determines the output file name (`diagram_<index>.svg`).
    pub index: usize,

    /// Path of the produced SVG; `None` when the diagram failed.
    pub svg_path: Option<PathBuf>,

    /// The extracted LaTeX fragment, `\begin` through `\end` inclusive.
    pub source: String,

    /// The failure, if any. `None` means the SVG exists.
    pub error: Option<DiagramError>,

    /// Wall-clock time spent on this diagram.
    pub duration_ms: u64,
}

/// Aggregate statistics for an extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractStats {
    /// Fragments found in the document (before selection).
    pub found: usize,
    /// Diagrams with an SVG on disk.
    pub converted: usize,
    /// Diagrams that failed compilation or conversion.
    pub failed: usize,
    /// Time spent inside pdflatex, summed over diagrams.
    pub compile_duration_ms: u64,
    /// Time spent inside the PDF→SVG converter, summed over diagrams.
    pub convert_duration_ms: u64,
    /// End-to-end wall-clock time.
    pub total_duration_ms: u64,
}

/// Full result of [`crate::extract::extract`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractOutput {
    /// Per-diagram outcomes, ordered by index.
    pub diagrams: Vec<DiagramResult>,
    /// Run statistics.
    pub stats: ExtractStats,
}

impl ExtractOutput {
    /// Shorthand: true when every selected diagram produced an SVG.
    pub fn all_converted(&self) -> bool {
        self.stats.failed == 0
    }
}

/// One generated icon file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IconResult {
    /// Square edge length in pixels.
    pub size: u32,
    /// Path of the written PNG.
    pub path: PathBuf,
    /// File size in bytes.
    pub bytes: u64,
    /// Backend that produced this file (`resvg`, `rsvg-convert`, `convert`).
    pub backend: String,
}

/// Aggregate statistics for an icon generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IconStats {
    /// Icons written to disk.
    pub generated: usize,
    /// End-to-end wall-clock time.
    pub total_duration_ms: u64,
}

/// Full result of [`crate::icons::generate_icons`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IconOutput {
    /// Per-size outcomes, in the order the sizes were configured.
    pub icons: Vec<IconResult>,
    /// Run statistics.
    pub stats: IconStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_converted_reflects_failed_count() {
        let ok = ExtractOutput {
            diagrams: vec![],
            stats: ExtractStats {
                found: 2,
                converted: 2,
                failed: 0,
                compile_duration_ms: 0,
                convert_duration_ms: 0,
                total_duration_ms: 0,
            },
        };
        assert!(ok.all_converted());

        let mut bad = ok.clone();
        bad.stats.failed = 1;
        assert!(!bad.all_converted());
    }

    #[test]
    fn extract_output_serialises() {
        let out = ExtractOutput {
            diagrams: vec![DiagramResult {
                index: 0,
                svg_path: Some(PathBuf::from("docs/diagrams/diagram_0.svg")),
                source: "\\begin{tikzcd}A\\end{tikzcd}".into(),
                error: None,
                duration_ms: 12,
            }],
            stats: ExtractStats {
                found: 1,
                converted: 1,
                failed: 0,
                compile_duration_ms: 10,
                convert_duration_ms: 2,
                total_duration_ms: 12,
            },
        };
        let json = serde_json::to_string(&out).unwrap();
        assert!(json.contains("diagram_0.svg"));
        assert!(json.contains("\"found\":1"));
    }
}
