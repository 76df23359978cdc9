//! Fragment scanning: find TikZ environments in a LaTeX document.
//!
//! The match is deliberately dumb: a non-greedy, dot-matches-newline regex
//! from `\begin{ENV}` to the next `\end{ENV}`. TikZ environments do not
//! nest in practice (a `tikzcd` inside a `tikzcd` is not valid), so the
//! non-greedy match correctly splits consecutive environments into separate
//! fragments instead of swallowing everything between the first `\begin`
//! and the last `\end`. Surrounding math-mode delimiters are intentionally
//! not captured — the standalone wrapper supplies its own context.

use crate::error::DocfigsError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Matcher for the default `tikzcd` environment, compiled once.
static RE_TIKZCD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\\begin\{tikzcd\}.*?\\end\{tikzcd\}").unwrap());

/// Find all `\begin{environment}…\end{environment}` fragments, in document
/// order. Each returned string includes the `\begin`/`\end` markers.
///
/// Returns an empty vec (not an error) when the document contains no
/// matching environment.
pub fn find_fragments(content: &str, environment: &str) -> Result<Vec<String>, DocfigsError> {
    if environment == "tikzcd" {
        return Ok(collect(&RE_TIKZCD, content));
    }

    let pattern = format!(
        r"(?s)\\begin\{{{env}\}}.*?\\end\{{{env}\}}",
        env = regex::escape(environment)
    );
    let re = Regex::new(&pattern).map_err(|e| {
        DocfigsError::InvalidConfig(format!("Cannot match environment '{environment}': {e}"))
    })?;
    Ok(collect(&re, content))
}

fn collect(re: &Regex, content: &str) -> Vec<String> {
    re.find_iter(content).map(|m| m.as_str().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r"\documentclass{article}
\begin{document}
Intro text.
\[
\begin{tikzcd}
A \arrow[r] & B
\end{tikzcd}
\]
Middle text.
$\begin{tikzcd} X \arrow[d] \\ Y \end{tikzcd}$
\end{document}
";

    #[test]
    fn zero_occurrences() {
        let frags = find_fragments("no diagrams here", "tikzcd").unwrap();
        assert!(frags.is_empty());
    }

    #[test]
    fn one_occurrence_includes_markers() {
        let src = r"before \begin{tikzcd} A & B \end{tikzcd} after";
        let frags = find_fragments(src, "tikzcd").unwrap();
        assert_eq!(frags.len(), 1);
        assert!(frags[0].starts_with(r"\begin{tikzcd}"));
        assert!(frags[0].ends_with(r"\end{tikzcd}"));
        assert!(frags[0].contains("A & B"));
    }

    #[test]
    fn many_occurrences_split_non_greedily() {
        let frags = find_fragments(DOC, "tikzcd").unwrap();
        assert_eq!(frags.len(), 2);
        // A greedy match would fold both environments into one fragment.
        assert!(frags[0].contains("A \\arrow[r]"));
        assert!(!frags[0].contains("X \\arrow[d]"));
        assert!(frags[1].contains("X \\arrow[d]"));
    }

    #[test]
    fn matches_across_newlines() {
        let frags = find_fragments(DOC, "tikzcd").unwrap();
        assert!(frags[0].contains('\n'), "multiline body must be preserved");
    }

    #[test]
    fn custom_environment() {
        let src = "\\begin{tikzpicture}\\draw (0,0);\\end{tikzpicture}";
        let frags = find_fragments(src, "tikzpicture").unwrap();
        assert_eq!(frags.len(), 1);
        // tikzcd fragments must not match a tikzpicture scan
        assert!(find_fragments(src, "tikzcd").unwrap().is_empty());
    }

    #[test]
    fn starred_environment_is_escaped() {
        let src = "\\begin{align*}x = y\\end{align*}";
        let frags = find_fragments(src, "align*").unwrap();
        assert_eq!(frags.len(), 1);
    }

    #[test]
    fn document_order_is_preserved() {
        let src = "\\begin{tikzcd}first\\end{tikzcd}\n\\begin{tikzcd}second\\end{tikzcd}";
        let frags = find_fragments(src, "tikzcd").unwrap();
        assert!(frags[0].contains("first"));
        assert!(frags[1].contains("second"));
    }
}
