//! Artifact naming and output directory handling.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Stem used when a name sanitizes to nothing.
pub const EMPTY_STEM: &str = "_";

/// Replaces every character outside `[A-Za-z0-9]` with `_`.
///
/// One underscore per character, so distinct names of equal shape can still
/// collide (`"A.B."` and `"A B "` both become `A_B_`).
///
/// # Examples
///
/// ```
/// use hcard_output::sanitize_file_stem;
///
/// assert_eq!(sanitize_file_stem("A.B."), "A_B_");
/// assert_eq!(sanitize_file_stem("Jane Doe"), "Jane_Doe");
/// ```
pub fn sanitize_file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if stem.is_empty() {
        EMPTY_STEM.to_string()
    } else {
        stem
    }
}

/// `<dir>/<stem>.<extension>`.
pub fn artifact_path(dir: &Path, stem: &str, extension: &str) -> PathBuf {
    dir.join(format!("{stem}.{extension}"))
}

/// Subdirectory of the output directory that holds the record exports.
///
/// Artifacts are `<stem>.<extension>` files directly under the output
/// directory and stems never contain a dot, so no card can land here.
pub const INTERCHANGE_DIR: &str = "interchange";

/// `<dir>/interchange/records.<extension>`.
pub fn interchange_path(dir: &Path, extension: &str) -> PathBuf {
    dir.join(INTERCHANGE_DIR).join(format!("records.{extension}"))
}

/// Creates `dir` (and parents) if needed; returns whether it was created.
pub fn ensure_output_dir(dir: &Path) -> io::Result<bool> {
    if dir.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(dir)?;
    Ok(true)
}

/// Ensure a parent directory exists for a file path.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Writes `bytes` to `path`, replacing any existing file.
pub fn write_artifact(path: &Path, bytes: &[u8]) -> io::Result<()> {
    ensure_parent_dir(path)?;
    fs::write(path, bytes)
}
