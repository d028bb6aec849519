//! PhantomJS executable discovery.
//!
//! Locates a runnable engine binary without assuming any particular
//! installation method.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::warn;

use crate::error::{Error, Result};

/// Get the path to the PhantomJS executable.
///
/// Candidates are tried in order:
/// 1. `PHANTOMJS_BIN` environment variable (runtime override)
/// 2. `phantomjs` on `PATH`
/// 3. Common install locations
///
/// Every candidate is verified runnable with `--version` before being
/// returned, so a stale override falls through to the next source.
///
/// # Errors
///
/// Returns `Error::EngineNotFound` if no runnable binary is located.
pub fn get_engine_executable() -> Result<PathBuf> {
    if let Ok(bin) = std::env::var("PHANTOMJS_BIN") {
        let path = PathBuf::from(bin);
        if path.exists() && engine_is_usable(&path) {
            return Ok(path);
        }
        warn!(
            target = "phantomjs",
            bin = %path.display(),
            "PHANTOMJS_BIN is set but not runnable; falling back"
        );
    }

    if let Some(path) = find_in_path() {
        if engine_is_usable(&path) {
            return Ok(path);
        }
        warn!(
            target = "phantomjs",
            bin = %path.display(),
            "phantomjs on PATH is not runnable; falling back"
        );
    }

    for location in common_locations() {
        let path = PathBuf::from(location);
        if path.exists() && engine_is_usable(&path) {
            return Ok(path);
        }
    }

    Err(Error::EngineNotFound)
}

/// Find `phantomjs` on the PATH via `which`/`where`.
fn find_in_path() -> Option<PathBuf> {
    #[cfg(not(windows))]
    let which_cmd = "which";
    #[cfg(windows)]
    let which_cmd = "where";

    let output = Command::new(which_cmd).arg("phantomjs").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let found = String::from_utf8_lossy(&output.stdout);
    let first = found.lines().next()?.trim();
    if first.is_empty() {
        return None;
    }
    let path = PathBuf::from(first);
    path.exists().then_some(path)
}

#[cfg(not(windows))]
fn common_locations() -> &'static [&'static str] {
    &[
        "/usr/local/bin/phantomjs",
        "/usr/bin/phantomjs",
        "/opt/homebrew/bin/phantomjs",
        "/opt/local/bin/phantomjs",
    ]
}

#[cfg(windows)]
fn common_locations() -> &'static [&'static str] {
    &[
        "C:\\Program Files\\phantomjs\\bin\\phantomjs.exe",
        "C:\\Program Files (x86)\\phantomjs\\bin\\phantomjs.exe",
    ]
}

fn engine_is_usable(bin: &Path) -> bool {
    Command::new(bin)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
