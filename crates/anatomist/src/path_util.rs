//! Path helpers shared by the classifier and the host.

use std::path::Path;

use crate::AnatomistError;

/// Normalizes a path to a canonical UTF-8 string with forward slashes.
///
/// # Errors
/// - `AnatomistError::IoError` if canonicalization fails (file not found, permissions).
/// - `AnatomistError::NonUtf8Path` if the canonical path is not UTF-8.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use anatomist::path_util::normalize_path;
///
/// let normalized = normalize_path(Path::new("./src/main/java")).unwrap();
/// // On Windows: "C:/Users/name/project/src/main/java"
/// ```
pub fn normalize_path(path: &Path) -> Result<String, AnatomistError> {
    let canonical = dunce::canonicalize(path)?;
    let s = canonical
        .to_str()
        .ok_or_else(|| AnatomistError::NonUtf8Path(canonical.display().to_string()))?;
    Ok(s.replace('\\', "/"))
}

/// Path as reported in violations: lossy UTF-8, forward slashes.
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Base name of the file, if it is valid UTF-8.
pub fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}
