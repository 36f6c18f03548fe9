//! Filesystem utilities.

use std::path::{Path, PathBuf};

/// Canonicalize a path, but don't fail if it doesn't exist yet.
/// Returns the path as-is if canonicalization fails.
///
/// On Windows the `\\?\` verbatim prefix is dropped from drive paths, since
/// CMake and most child tools do not accept it.
pub fn normalize_path(path: &Path) -> PathBuf {
    match path.canonicalize() {
        Ok(canonical) => strip_verbatim(canonical),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(windows)]
fn strip_verbatim(path: PathBuf) -> PathBuf {
    let text = path.to_string_lossy();
    match text.strip_prefix(r"\\?\") {
        Some(rest) if rest.as_bytes().get(1) == Some(&b':') => PathBuf::from(rest),
        _ => path,
    }
}

#[cfg(not(windows))]
fn strip_verbatim(path: PathBuf) -> PathBuf {
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_existing_path() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a");
        std::fs::create_dir(&nested).unwrap();

        let normalized = normalize_path(&nested.join("..").join("a"));
        assert!(normalized.is_absolute());
        assert!(normalized.ends_with("a"));
        assert!(!normalized.to_string_lossy().starts_with(r"\\?\"));
    }

    #[test]
    fn test_normalize_missing_path_is_unchanged() {
        let missing = Path::new("does/not/exist/yet");
        assert_eq!(normalize_path(missing), missing);
    }
}
