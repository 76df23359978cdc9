//! Icon generation: one SVG → square PNGs at several sizes.
//!
//! ## Backend chain
//!
//! Three rasterisers are known, tried in order until one produces the file:
//!
//! 1. **resvg** (in-process) — compiled into this crate, needs no external
//!    tool. Handles the overwhelming majority of hand-drawn logo SVGs.
//! 2. **rsvg-convert** (librsvg) — covers SVG features resvg lacks
//!    (notably some filter primitives).
//! 3. **ImageMagick `convert`** — the everything-else fallback; worst
//!    output quality of the three, so probed last.
//!
//! External binaries are discovered by candidate-path probing (see
//! [`crate::pipeline::probe`]). The chain is evaluated per size: a backend
//! that fails on one size falls through to the next backend for that size
//! only. Only when *every* backend fails for a size does the run abort —
//! an icon set with holes is worse than no icon set.

use crate::config::{IconBackend, IconConfig};
use crate::error::DocfigsError;
use crate::pipeline::probe;
use resvg::usvg::{self, TreeParsing};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::output::{IconOutput, IconResult, IconStats};

/// Probe order for rsvg-convert, matching common install locations.
pub const RSVG_CANDIDATES: &[&str] = &[
    "rsvg-convert",
    "/usr/local/bin/rsvg-convert",
    "/opt/homebrew/bin/rsvg-convert",
    "/usr/bin/rsvg-convert",
];

/// Probe order for ImageMagick's `convert`.
pub const MAGICK_CANDIDATES: &[&str] = &[
    "convert",
    "/usr/local/bin/convert",
    "/opt/homebrew/bin/convert",
    "/usr/bin/convert",
];

/// Rasterise `config.input` into `icon-<size>.png` files under
/// `config.output_dir`, one per configured size.
///
/// # Errors
/// Unlike diagram extraction, icon generation is all-or-nothing:
/// - Input missing or not an SVG — fatal
/// - A requested backend unavailable — fatal
/// - All backends failing for any size — fatal
pub fn generate_icons(config: &IconConfig) -> Result<IconOutput, DocfigsError> {
    let total_start = Instant::now();
    info!("Generating icons from {}", config.input.display());

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let svg_data = read_svg(&config.input)?;

    // ── Step 2: Resolve the backend chain once ───────────────────────────
    let chain = BackendChain::resolve(config, &svg_data)?;
    debug!("Backend chain: {:?}", chain.names());

    // ── Step 3: Prepare output directory ─────────────────────────────────
    std::fs::create_dir_all(&config.output_dir).map_err(|e| DocfigsError::OutputWriteFailed {
        path: config.output_dir.clone(),
        source: e,
    })?;

    // ── Step 4: Render each size ─────────────────────────────────────────
    let mut icons = Vec::with_capacity(config.sizes.len());
    for &size in &config.sizes {
        let png_path = config.output_dir.join(format!("icon-{size}.png"));
        info!("Generating {}", png_path.display());

        let backend = chain.render(&config.input, size, &png_path)?;
        let bytes = std::fs::metadata(&png_path).map(|m| m.len()).unwrap_or(0);

        icons.push(IconResult {
            size,
            path: png_path,
            bytes,
            backend: backend.to_string(),
        });
    }

    let stats = IconStats {
        generated: icons.len(),
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };
    info!(
        "Generated {} icons in {}ms",
        stats.generated, stats.total_duration_ms
    );

    Ok(IconOutput { icons, stats })
}

// ── Input validation ─────────────────────────────────────────────────────

/// Read the input file and check it looks like an SVG document.
fn read_svg(path: &Path) -> Result<Vec<u8>, DocfigsError> {
    if !path.exists() {
        return Err(DocfigsError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let data = match std::fs::read(path) {
        Ok(d) => d,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(DocfigsError::PermissionDenied {
                path: path.to_path_buf(),
            })
        }
        Err(_) => {
            return Err(DocfigsError::FileNotFound {
                path: path.to_path_buf(),
            })
        }
    };
    if !looks_like_svg(&data) {
        return Err(DocfigsError::NotAnSvg {
            path: path.to_path_buf(),
        });
    }
    Ok(data)
}

/// Magic check: an `<svg` root element somewhere in the first kilobyte
/// (after any XML prolog, DOCTYPE, or comments).
fn looks_like_svg(data: &[u8]) -> bool {
    let head = &data[..data.len().min(1024)];
    String::from_utf8_lossy(head).contains("<svg")
}

// ── Backend chain ────────────────────────────────────────────────────────

/// The rasterisers usable for this run, resolved once up front.
struct BackendChain {
    /// Parsed SVG tree — present when the in-process renderer can handle
    /// the input. Parsing once and rendering per size avoids re-parsing
    /// the same document for every icon.
    native: Option<usvg::Tree>,
    rsvg: Option<PathBuf>,
    magick: Option<PathBuf>,
}

impl BackendChain {
    fn resolve(config: &IconConfig, svg_data: &[u8]) -> Result<Self, DocfigsError> {
        let want = |b: IconBackend| config.backend == IconBackend::Auto || config.backend == b;

        let native = if want(IconBackend::Native) {
            match usvg::Tree::from_data(svg_data, &usvg::Options::default()) {
                Ok(tree) => Some(tree),
                Err(e) => {
                    warn!("In-process renderer cannot parse this SVG: {e}");
                    None
                }
            }
        } else {
            None
        };

        let rsvg = if want(IconBackend::Rsvg) {
            discover_tool(config.rsvg_path.as_deref(), RSVG_CANDIDATES)
        } else {
            None
        };

        let magick = if want(IconBackend::Magick) {
            discover_tool(config.magick_path.as_deref(), MAGICK_CANDIDATES)
        } else {
            None
        };

        // A forced backend that resolved to nothing is fatal up front —
        // better than failing on the first size with a vaguer error.
        let unavailable = match config.backend {
            IconBackend::Native if native.is_none() => Some("resvg"),
            IconBackend::Rsvg if rsvg.is_none() => Some("rsvg-convert"),
            IconBackend::Magick if magick.is_none() => Some("convert"),
            _ => None,
        };
        if let Some(backend) = unavailable {
            return Err(DocfigsError::BackendUnavailable {
                backend: backend.to_string(),
            });
        }

        Ok(Self {
            native,
            rsvg,
            magick,
        })
    }

    /// Backend names in probe order, for logs and error reports.
    fn names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.native.is_some() {
            names.push("resvg");
        }
        if self.rsvg.is_some() {
            names.push("rsvg-convert");
        }
        if self.magick.is_some() {
            names.push("convert");
        }
        names
    }

    /// Render one size, walking the chain until a backend produces the
    /// file. Returns the name of the backend that succeeded.
    fn render(
        &self,
        svg_path: &Path,
        size: u32,
        png_path: &Path,
    ) -> Result<&'static str, DocfigsError> {
        let mut tried = Vec::new();

        if let Some(ref tree) = self.native {
            match render_native(tree, size, png_path) {
                Ok(()) => return Ok("resvg"),
                Err(e) => {
                    warn!("resvg failed at {size}px: {e}");
                    tried.push("resvg".to_string());
                }
            }
        }

        if let Some(ref bin) = self.rsvg {
            match render_rsvg(bin, svg_path, size, png_path) {
                Ok(()) => return Ok("rsvg-convert"),
                Err(e) => {
                    warn!("rsvg-convert failed at {size}px: {e}");
                    tried.push("rsvg-convert".to_string());
                }
            }
        }

        if let Some(ref bin) = self.magick {
            match render_magick(bin, svg_path, size, png_path) {
                Ok(()) => return Ok("convert"),
                Err(e) => {
                    warn!("convert failed at {size}px: {e}");
                    tried.push("convert".to_string());
                }
            }
        }

        Err(DocfigsError::AllBackendsFailed {
            path: svg_path.to_path_buf(),
            size,
            tried,
        })
    }
}

/// Probe an explicit override path, or walk the candidate list.
///
/// Like the PDF→SVG converter, an explicit path never falls back to the
/// candidates: if the caller named a binary, use that binary or nothing.
fn discover_tool(override_path: Option<&Path>, candidates: &[&str]) -> Option<PathBuf> {
    match override_path {
        Some(p) => probe::responds(p).then(|| p.to_path_buf()),
        None => probe::first_available(candidates.iter().copied().map(PathBuf::from)),
    }
}

// ── Backend implementations ──────────────────────────────────────────────

/// In-process rendering via resvg, stretching the SVG to exactly
/// `size`×`size` like `rsvg-convert -w -h` does.
fn render_native(tree: &usvg::Tree, size: u32, png_path: &Path) -> Result<(), String> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size, size)
        .ok_or_else(|| format!("cannot allocate {size}x{size} pixmap"))?;

    let sx = size as f32 / tree.size.width() as f32;
    let sy = size as f32 / tree.size.height() as f32;

    let rtree = resvg::Tree::from_usvg(tree);
    rtree.render(
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    pixmap.save_png(png_path).map_err(|e| e.to_string())
}

fn render_rsvg(bin: &Path, svg: &Path, size: u32, png: &Path) -> Result<(), String> {
    run_tool(
        Command::new(bin)
            .arg("-w")
            .arg(size.to_string())
            .arg("-h")
            .arg(size.to_string())
            .arg(svg)
            .arg("-o")
            .arg(png),
        "rsvg-convert",
        png,
    )
}

fn render_magick(bin: &Path, svg: &Path, size: u32, png: &Path) -> Result<(), String> {
    run_tool(
        Command::new(bin)
            .arg("-background")
            .arg("none")
            .arg("-resize")
            .arg(format!("{size}x{size}"))
            .arg(svg)
            .arg(png),
        "convert",
        png,
    )
}

/// Spawn the external tool, then insist the output file actually exists.
fn run_tool(cmd: &mut Command, name: &str, output: &Path) -> Result<(), String> {
    let status = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| format!("cannot spawn {name}: {e}"))?;

    if !status.success() {
        return Err(format!("{name} exited with {status}"));
    }
    if !output.exists() {
        return Err(format!("{name} exited 0 but wrote no PNG"));
    }
    Ok(())
}
