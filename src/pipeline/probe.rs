//! First-available-tool probing.
//!
//! A candidate is "available" when spawning `<candidate> --version`
//! succeeds, regardless of the exit code — some converters (notably old
//! pdf2svg builds) exit non-zero for `--version` yet work fine. What we
//! are really testing is that the binary exists and is executable; the OS
//! answers that through the spawn itself.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// True when the binary at `cmd` can be spawned.
pub fn responds(cmd: &Path) -> bool {
    Command::new(cmd)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

/// Return the first candidate that can be spawned, probing in order.
///
/// Bare names (no directory component) are resolved through `PATH` by the
/// OS; absolute candidates cover Homebrew and /usr/local installs that are
/// not always on `PATH` in CI or launchd environments.
pub fn first_available<I, P>(candidates: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    for candidate in candidates {
        let candidate = candidate.into();
        if responds(&candidate) {
            debug!("Probe hit: {}", candidate.display());
            return Some(candidate);
        }
        debug!("Probe miss: {}", candidate.display());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonexistent_binary_does_not_respond() {
        assert!(!responds(Path::new("/nonexistent/tool-xyz-123")));
    }

    #[cfg(unix)]
    #[test]
    fn spawnable_binary_responds_even_with_nonzero_exit() {
        // `false` spawns fine and exits 1 — still counts as available.
        assert!(responds(Path::new("/bin/false")) || responds(Path::new("/usr/bin/false")));
    }

    #[cfg(unix)]
    #[test]
    fn first_available_respects_order() {
        let found = first_available(["/nonexistent/one", "/bin/sh", "/bin/ls"]).unwrap();
        assert_eq!(found, PathBuf::from("/bin/sh"));
    }

    #[test]
    fn empty_candidate_list_yields_none() {
        assert_eq!(first_available(Vec::<PathBuf>::new()), None);
    }
}
