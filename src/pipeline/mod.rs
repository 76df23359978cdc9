//! Pipeline stages for LaTeX→SVG diagram extraction.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. add another PDF→SVG converter) without
//! touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! scan ──▶ wrap ──▶ compile ──▶ vectorize
//! (regex)  (standalone.tex)  (pdflatex)  (pdf2svg / dvisvgm)
//! ```
//!
//! 1. [`scan`]      — find `\begin{ENV}…\end{ENV}` fragments in the source
//! 2. [`wrap`]      — embed one fragment in a standalone LaTeX document
//! 3. [`compile`]   — run pdflatex in the work directory; success is judged
//!    by the PDF existing, not by the exit code (pdflatex returns non-zero
//!    for recoverable warnings in nonstopmode)
//! 4. [`vectorize`] — convert the PDF to SVG with the first converter that
//!    responds to `--version`
//!
//! [`probe`] holds the first-available-tool probing shared between
//! [`vectorize`] and [`crate::icons`].

pub mod compile;
pub mod probe;
pub mod scan;
pub mod vectorize;
pub mod wrap;
