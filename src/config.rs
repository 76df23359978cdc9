//! Configuration types for diagram extraction and icon generation.
//!
//! All behaviour is controlled through [`ExtractConfig`] and [`IconConfig`],
//! each built via a validating builder. Defaults reproduce the common case
//! exactly — `ExtractConfig::default()` pointed at a thesis file is a full
//! "extract everything" run — so most callers set one or two fields and
//! keep the rest.

use crate::error::DocfigsError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Configuration for a LaTeX→SVG diagram extraction run.
///
/// Built via [`ExtractConfig::builder()`] or using
/// [`ExtractConfig::default()`].
///
/// # Example
/// ```rust
/// use docfigs::ExtractConfig;
///
/// let config = ExtractConfig::builder()
///     .output_dir("docs/diagrams")
///     .environment("tikzcd")
///     .border_pt(2)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractConfig {
    /// Directory the final `.svg` files are written to. Default: `docs/diagrams`.
    ///
    /// Created on demand. Intermediate artifacts never land here unless
    /// [`keep_intermediates`](Self::keep_intermediates) is set.
    pub output_dir: PathBuf,

    /// Path or name of the LaTeX compiler. Default: `pdflatex`.
    ///
    /// A bare name is resolved through `PATH` by the OS when the process is
    /// spawned. If the binary cannot be spawned at all the whole run fails
    /// with [`DocfigsError::CompilerNotFound`] — without a compiler every
    /// diagram would fail identically.
    pub pdflatex: PathBuf,

    /// TikZ environment name to extract. Default: `tikzcd`.
    ///
    /// The scanner matches `\begin{NAME}…\end{NAME}` non-greedily across
    /// lines, so consecutive environments produce separate fragments.
    pub environment: String,

    /// Border padding in points for the standalone document class. Default: 2.
    pub border_pt: u32,

    /// Which PDF→SVG converter to use. Default: [`ConverterKind::Auto`].
    pub converter: ConverterKind,

    /// Explicit converter binary path, bypassing candidate-path probing.
    ///
    /// When set, the path is still probed with `--version`; if it does not
    /// respond, discovery yields no converter rather than silently falling
    /// back to a different binary than the one the caller named.
    pub converter_path: Option<PathBuf>,

    /// Diagram selection. Default: all diagrams.
    pub diagrams: DiagramSelection,

    /// Keep `.tex`/`.pdf`/`.aux`/`.log` next to the SVGs. Default: false.
    ///
    /// When false each diagram is compiled inside its own temp directory,
    /// so intermediates disappear after every attempt — success or failure,
    /// even on panic.
    pub keep_intermediates: bool,

    /// Optional per-diagram progress callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("docs/diagrams"),
            pdflatex: PathBuf::from("pdflatex"),
            environment: "tikzcd".to_string(),
            border_pt: 2,
            converter: ConverterKind::default(),
            converter_path: None,
            diagrams: DiagramSelection::default(),
            keep_intermediates: false,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractConfig")
            .field("output_dir", &self.output_dir)
            .field("pdflatex", &self.pdflatex)
            .field("environment", &self.environment)
            .field("border_pt", &self.border_pt)
            .field("converter", &self.converter)
            .field("converter_path", &self.converter_path)
            .field("diagrams", &self.diagrams)
            .field("keep_intermediates", &self.keep_intermediates)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl ExtractConfig {
    /// Create a new builder for `ExtractConfig`.
    pub fn builder() -> ExtractConfigBuilder {
        ExtractConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractConfig`].
#[derive(Debug)]
pub struct ExtractConfigBuilder {
    config: ExtractConfig,
}

impl ExtractConfigBuilder {
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn pdflatex(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdflatex = path.into();
        self
    }

    pub fn environment(mut self, env: impl Into<String>) -> Self {
        self.config.environment = env.into();
        self
    }

    pub fn border_pt(mut self, pt: u32) -> Self {
        self.config.border_pt = pt.min(100);
        self
    }

    pub fn converter(mut self, kind: ConverterKind) -> Self {
        self.config.converter = kind;
        self
    }

    pub fn converter_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.converter_path = Some(path.into());
        self
    }

    pub fn diagrams(mut self, selection: DiagramSelection) -> Self {
        self.config.diagrams = selection;
        self
    }

    pub fn keep_intermediates(mut self, v: bool) -> Self {
        self.config.keep_intermediates = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractConfig, DocfigsError> {
        let c = &self.config;
        if c.environment.is_empty() {
            return Err(DocfigsError::InvalidConfig(
                "Environment name must not be empty".into(),
            ));
        }
        if !c
            .environment
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '*' || ch == '-')
        {
            return Err(DocfigsError::InvalidConfig(format!(
                "Environment name '{}' contains invalid characters",
                c.environment
            )));
        }
        if c.pdflatex.as_os_str().is_empty() {
            return Err(DocfigsError::InvalidConfig(
                "pdflatex path must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Configuration for an SVG→PNG icon generation run.
///
/// # Example
/// ```rust
/// use docfigs::IconConfig;
///
/// let config = IconConfig::builder()
///     .input("docs/logo.svg")
///     .sizes([192, 512])
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct IconConfig {
    /// Source SVG. Default: `docs/infinity-7-layered.svg`.
    pub input: PathBuf,

    /// Directory `icon-<size>.png` files are written to. Default: `docs`.
    pub output_dir: PathBuf,

    /// Pixel sizes to emit, one square PNG each. Default: `[192, 512]`.
    ///
    /// 192 and 512 are the two sizes the PWA manifest spec requires for
    /// installability on Android and Chrome desktop.
    pub sizes: Vec<u32>,

    /// Rasteriser backend. Default: [`IconBackend::Auto`].
    pub backend: IconBackend,

    /// Explicit rsvg-convert binary path, bypassing candidate probing.
    pub rsvg_path: Option<PathBuf>,

    /// Explicit ImageMagick `convert` binary path, bypassing candidate probing.
    pub magick_path: Option<PathBuf>,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("docs/infinity-7-layered.svg"),
            output_dir: PathBuf::from("docs"),
            sizes: vec![192, 512],
            backend: IconBackend::default(),
            rsvg_path: None,
            magick_path: None,
        }
    }
}

impl IconConfig {
    /// Create a new builder for `IconConfig`.
    pub fn builder() -> IconConfigBuilder {
        IconConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`IconConfig`].
#[derive(Debug)]
pub struct IconConfigBuilder {
    config: IconConfig,
}

impl IconConfigBuilder {
    pub fn input(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.input = path.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn sizes(mut self, sizes: impl IntoIterator<Item = u32>) -> Self {
        self.config.sizes = sizes.into_iter().collect();
        self
    }

    pub fn backend(mut self, backend: IconBackend) -> Self {
        self.config.backend = backend;
        self
    }

    pub fn rsvg_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.rsvg_path = Some(path.into());
        self
    }

    pub fn magick_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.magick_path = Some(path.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<IconConfig, DocfigsError> {
        let c = &self.config;
        if c.sizes.is_empty() {
            return Err(DocfigsError::InvalidConfig(
                "At least one icon size is required".into(),
            ));
        }
        if let Some(&bad) = c.sizes.iter().find(|&&s| s == 0 || s > 8192) {
            return Err(DocfigsError::InvalidConfig(format!(
                "Icon size must be 1–8192 px, got {bad}"
            )));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Which external PDF→SVG converter to use for diagram extraction.
///
/// `Auto` probes pdf2svg first because its output is a single tight SVG per
/// page with no font-map configuration; dvisvgm is the fallback shipped by
/// most TeX distributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConverterKind {
    /// Probe pdf2svg, then dvisvgm. (default)
    #[default]
    Auto,
    /// pdf2svg only.
    Pdf2Svg,
    /// dvisvgm only (invoked with `--pdf`).
    Dvisvgm,
}

/// Which rasteriser renders the icon PNGs.
///
/// `Auto` walks the chain in order: the in-process renderer needs no
/// external tool at all, so it is tried first; the external tools cover
/// SVG features the in-process renderer cannot handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IconBackend {
    /// In-process resvg, then rsvg-convert, then ImageMagick. (default)
    #[default]
    Auto,
    /// In-process resvg only.
    Native,
    /// rsvg-convert only.
    Rsvg,
    /// ImageMagick `convert` only.
    Magick,
}

/// Specifies which of the found diagrams to process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum DiagramSelection {
    /// Process all diagrams (default).
    #[default]
    All,
    /// Process a single diagram (1-indexed).
    Single(usize),
    /// Process a contiguous range of diagrams (1-indexed, inclusive).
    Range(usize, usize),
    /// Process specific diagrams (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl DiagramSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed
    /// diagram numbers.
    pub fn to_indices(&self, total: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            DiagramSelection::All => (0..total).collect(),
            DiagramSelection::Single(n) => {
                if *n >= 1 && *n <= total {
                    vec![n - 1]
                } else {
                    vec![]
                }
            }
            DiagramSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total);
                (s..e).collect()
            }
            DiagramSelection::Set(items) => items
                .iter()
                .filter(|&&n| n >= 1 && n <= total)
                .map(|n| n - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_defaults() {
        let c = ExtractConfig::default();
        assert_eq!(c.output_dir, PathBuf::from("docs/diagrams"));
        assert_eq!(c.environment, "tikzcd");
        assert_eq!(c.border_pt, 2);
        assert!(!c.keep_intermediates);
    }

    #[test]
    fn builder_rejects_empty_environment() {
        let err = ExtractConfig::builder().environment("").build();
        assert!(matches!(err, Err(DocfigsError::InvalidConfig(_))));
    }

    #[test]
    fn builder_rejects_environment_with_braces() {
        let err = ExtractConfig::builder().environment("tikz}cd").build();
        assert!(matches!(err, Err(DocfigsError::InvalidConfig(_))));
    }

    #[test]
    fn builder_accepts_starred_environment() {
        let c = ExtractConfig::builder().environment("tikzcd*").build();
        assert!(c.is_ok());
    }

    #[test]
    fn icon_defaults() {
        let c = IconConfig::default();
        assert_eq!(c.sizes, vec![192, 512]);
        assert_eq!(c.output_dir, PathBuf::from("docs"));
        assert_eq!(c.backend, IconBackend::Auto);
    }

    #[test]
    fn icon_builder_rejects_empty_sizes() {
        let err = IconConfig::builder().sizes([]).build();
        assert!(matches!(err, Err(DocfigsError::InvalidConfig(_))));
    }

    #[test]
    fn icon_builder_rejects_zero_size() {
        let err = IconConfig::builder().sizes([192, 0]).build();
        assert!(matches!(err, Err(DocfigsError::InvalidConfig(_))));
    }

    #[test]
    fn selection_to_indices() {
        assert_eq!(DiagramSelection::All.to_indices(4), vec![0, 1, 2, 3]);
        assert_eq!(DiagramSelection::Single(3).to_indices(4), vec![2]);
        assert_eq!(DiagramSelection::Single(5).to_indices(4), Vec::<usize>::new());
        assert_eq!(DiagramSelection::Range(2, 3).to_indices(4), vec![1, 2]);
        assert_eq!(
            DiagramSelection::Set(vec![1, 4]).to_indices(4),
            vec![0, 3]
        );
        assert_eq!(
            DiagramSelection::Set(vec![3, 1, 3]).to_indices(4),
            vec![0, 2] // deduplicated and sorted
        );
        assert_eq!(DiagramSelection::All.to_indices(0), Vec::<usize>::new());
    }
}
