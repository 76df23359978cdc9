//! LaTeX compilation: one standalone `.tex` → one PDF.
//!
//! pdflatex is run with `-interaction=nonstopmode` so a recoverable error
//! in the fragment cannot hang the run waiting for terminal input. Its
//! stdout/stderr are discarded — nonstopmode output is hundreds of lines of
//! box diagnostics that are useless outside an interactive TeX session.
//! Success is judged solely by the PDF existing afterwards: pdflatex often
//! exits non-zero for warnings while still producing a usable PDF.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::debug;

/// Failure modes of a compile attempt.
///
/// `CompilerMissing` aborts the whole extraction (every diagram would fail
/// identically); `Failed` is recorded against the one diagram and the run
/// continues.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The compiler binary itself could not be spawned.
    #[error("cannot spawn '{0}': not found")]
    CompilerMissing(PathBuf),

    /// The compiler ran but no PDF appeared.
    #[error("{0}")]
    Failed(String),
}

/// Compile `tex_file` with `pdflatex`, returning the path of the produced
/// PDF (same stem, `.pdf` extension, same directory).
pub fn compile_to_pdf(pdflatex: &Path, tex_file: &Path) -> Result<PathBuf, CompileError> {
    let work_dir = tex_file.parent().unwrap_or_else(|| Path::new("."));
    let tex_name = tex_file
        .file_name()
        .ok_or_else(|| CompileError::Failed(format!("bad tex path: {}", tex_file.display())))?;

    debug!("Compiling {} with {}", tex_file.display(), pdflatex.display());

    let status = Command::new(pdflatex)
        .arg("-interaction=nonstopmode")
        .arg(tex_name)
        .current_dir(work_dir)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .stdin(Stdio::null())
        .status()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CompileError::CompilerMissing(pdflatex.to_path_buf()),
            _ => CompileError::Failed(format!("cannot spawn {}: {e}", pdflatex.display())),
        })?;

    let pdf_file = tex_file.with_extension("pdf");
    if pdf_file.exists() {
        Ok(pdf_file)
    } else {
        Err(CompileError::Failed(format!(
            "no PDF produced (pdflatex exited with {status})"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_compiler_is_distinguished() {
        let dir = tempfile::tempdir().unwrap();
        let tex = dir.path().join("diagram_0.tex");
        std::fs::write(&tex, "x").unwrap();

        let err = compile_to_pdf(Path::new("/nonexistent/pdflatex-xyz"), &tex).unwrap_err();
        assert!(matches!(err, CompileError::CompilerMissing(_)));
    }

    #[cfg(unix)]
    #[test]
    fn compiler_without_pdf_output_fails() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let tex = dir.path().join("diagram_0.tex");
        std::fs::write(&tex, "x").unwrap();

        // a "compiler" that runs fine but writes nothing
        let fake = dir.path().join("fake-pdflatex");
        std::fs::write(&fake, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).unwrap();

        let err = compile_to_pdf(&fake, &tex).unwrap_err();
        assert!(matches!(err, CompileError::Failed(_)));
        assert!(err.to_string().contains("no PDF produced"));
    }

    #[cfg(unix)]
    #[test]
    fn pdf_existence_beats_exit_code() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let tex = dir.path().join("diagram_0.tex");
        std::fs::write(&tex, "x").unwrap();

        // nonstopmode pdflatex exits non-zero on warnings but still emits a PDF
        let fake = dir.path().join("fake-pdflatex");
        std::fs::write(
            &fake,
            "#!/bin/sh\nprintf '%%PDF-1.5' > \"${2%.tex}.pdf\"\nexit 1\n",
        )
        .unwrap();
        std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).unwrap();

        let pdf = compile_to_pdf(&fake, &tex).unwrap();
        assert_eq!(pdf, tex.with_extension("pdf"));
        assert!(pdf.exists());
    }
}
