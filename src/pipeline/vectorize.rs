//! Vectorisation: PDF → SVG through an external converter.
//!
//! Two converters are supported. pdf2svg (poppler-based) is preferred: it
//! emits one tight SVG per page with embedded font outlines. dvisvgm ships
//! with TeX Live and handles PDF input via `--pdf`, making it the natural
//! fallback on machines that have LaTeX but not poppler.
//!
//! Like compilation, success is judged by the output file existing — both
//! tools have been observed exiting zero after writing nothing when the
//! PDF is damaged.

use crate::config::ConverterKind;
use crate::pipeline::probe;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Probe order for pdf2svg, matching common install locations.
pub const PDF2SVG_CANDIDATES: &[&str] = &[
    "pdf2svg",
    "/usr/local/bin/pdf2svg",
    "/opt/homebrew/bin/pdf2svg",
    "/usr/bin/pdf2svg",
];

/// Probe order for dvisvgm.
pub const DVISVGM_CANDIDATES: &[&str] = &[
    "dvisvgm",
    "/usr/local/bin/dvisvgm",
    "/opt/homebrew/bin/dvisvgm",
    "/usr/bin/dvisvgm",
];

/// A discovered, spawnable PDF→SVG converter.
#[derive(Debug, Clone)]
pub enum PdfConverter {
    Pdf2Svg(PathBuf),
    Dvisvgm(PathBuf),
}

impl PdfConverter {
    /// Tool name for logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            PdfConverter::Pdf2Svg(_) => "pdf2svg",
            PdfConverter::Dvisvgm(_) => "dvisvgm",
        }
    }

    /// Discover a converter.
    ///
    /// An explicit `override_path` is probed as-is and never falls back to
    /// the candidate lists — if the caller named a binary, substituting a
    /// different one would be surprising. Its flavour is inferred from the
    /// file name (`dvisvgm` anywhere in the name means dvisvgm flags),
    /// unless `kind` pins it.
    pub fn discover(kind: ConverterKind, override_path: Option<&Path>) -> Option<PdfConverter> {
        if let Some(path) = override_path {
            if !probe::responds(path) {
                return None;
            }
            let path = path.to_path_buf();
            return Some(match kind {
                ConverterKind::Pdf2Svg => PdfConverter::Pdf2Svg(path),
                ConverterKind::Dvisvgm => PdfConverter::Dvisvgm(path),
                ConverterKind::Auto => {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    if name.contains("dvisvgm") {
                        PdfConverter::Dvisvgm(path)
                    } else {
                        PdfConverter::Pdf2Svg(path)
                    }
                }
            });
        }

        let pdf2svg = || probe::first_available(PDF2SVG_CANDIDATES.iter().copied().map(PathBuf::from));
        let dvisvgm = || probe::first_available(DVISVGM_CANDIDATES.iter().copied().map(PathBuf::from));

        match kind {
            ConverterKind::Pdf2Svg => pdf2svg().map(PdfConverter::Pdf2Svg),
            ConverterKind::Dvisvgm => dvisvgm().map(PdfConverter::Dvisvgm),
            ConverterKind::Auto => pdf2svg()
                .map(PdfConverter::Pdf2Svg)
                .or_else(|| dvisvgm().map(PdfConverter::Dvisvgm)),
        }
    }

    /// Convert `pdf` to `svg`. Errors carry enough detail for the
    /// per-diagram report; stdout/stderr of the tool are discarded.
    pub fn convert(&self, pdf: &Path, svg: &Path) -> Result<(), String> {
        let mut cmd = match self {
            PdfConverter::Pdf2Svg(bin) => {
                let mut c = Command::new(bin);
                c.arg(pdf).arg(svg);
                c
            }
            PdfConverter::Dvisvgm(bin) => {
                let mut c = Command::new(bin);
                c.arg("--pdf").arg("-o").arg(svg).arg(pdf);
                c
            }
        };

        debug!("Converting {} → {}", pdf.display(), svg.display());

        let status = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| format!("cannot spawn {}: {e}", self.name()))?;

        if !status.success() {
            return Err(format!("{} exited with {status}", self.name()));
        }
        if !svg.exists() {
            return Err(format!("{} exited 0 but wrote no SVG", self.name()));
        }
        Ok(())
    }
}
