//! Standalone document construction: one fragment → one compilable `.tex`.
//!
//! The `standalone` document class crops the page to the content plus a
//! small border, so the resulting PDF (and therefore the SVG) is exactly
//! the diagram — no A4 page around it. `tikz-cd` is always loaded; it pulls
//! in TikZ itself and is harmless for plain `tikzpicture` fragments.

use crate::error::DocfigsError;
use std::path::{Path, PathBuf};

/// Build the full standalone LaTeX source for one fragment.
pub fn standalone_document(fragment: &str, border_pt: u32) -> String {
    format!(
        "\\documentclass[tikz,border={border_pt}pt]{{standalone}}\n\
         \\usepackage{{tikz-cd}}\n\
         \\begin{{document}}\n\
         {fragment}\n\
         \\end{{document}}\n"
    )
}

/// Write the standalone document for diagram `index` into `dir` and return
/// the path of the written `.tex` file (`diagram_<index>.tex`).
pub fn write_standalone(
    dir: &Path,
    index: usize,
    fragment: &str,
    border_pt: u32,
) -> Result<PathBuf, DocfigsError> {
    let tex_path = dir.join(format!("diagram_{index}.tex"));
    std::fs::write(&tex_path, standalone_document(fragment, border_pt)).map_err(|e| {
        DocfigsError::OutputWriteFailed {
            path: tex_path.clone(),
            source: e,
        }
    })?;
    Ok(tex_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_embeds_fragment_verbatim() {
        let frag = "\\begin{tikzcd}\nA \\arrow[r] & B\n\\end{tikzcd}";
        let doc = standalone_document(frag, 2);
        assert!(doc.starts_with("\\documentclass[tikz,border=2pt]{standalone}"));
        assert!(doc.contains("\\usepackage{tikz-cd}"));
        assert!(doc.contains(frag));
        assert!(doc.trim_end().ends_with("\\end{document}"));
    }

    #[test]
    fn border_is_configurable() {
        let doc = standalone_document("x", 10);
        assert!(doc.contains("border=10pt"));
    }

    #[test]
    fn write_standalone_names_by_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_standalone(dir.path(), 7, "\\begin{tikzcd}\\end{tikzcd}", 2).unwrap();
        assert_eq!(path.file_name().unwrap(), "diagram_7.tex");
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\\begin{document}"));
    }
}
