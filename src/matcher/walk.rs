//! Candidate proxy file enumeration.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively enumerate files under `root`, keeping only paths whose
/// extension appears in the allow-list. Entries in the allow-list may be
/// written with or without a leading dot.
///
/// The result is sorted so matching passes scan candidates in a stable
/// order.
pub fn find_proxy_files(root: &Path, allowed_exts: &[String]) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::configuration(format!(
            "Proxy directory does not exist: {:?}",
            root
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        if !has_allowed_ext(path, allowed_exts) {
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

fn has_allowed_ext(path: &Path, allowed: &[String]) -> bool {
    let Some(ext) = path.extension().map(|e| e.to_string_lossy().to_lowercase()) else {
        return false;
    };
    allowed
        .iter()
        .any(|a| a.trim_start_matches('.').eq_ignore_ascii_case(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_by_extension_allow_list() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("day1");
        std::fs::create_dir(&nested).unwrap();

        std::fs::write(dir.path().join("a_proxy.mxf"), b"").unwrap();
        std::fs::write(nested.join("b_proxy.MOV"), b"").unwrap();
        std::fs::write(nested.join("notes.txt"), b"").unwrap();
        std::fs::write(dir.path().join("noext"), b"").unwrap();

        let exts = vec![".mxf".to_string(), ".mov".to_string()];
        let files = find_proxy_files(dir.path(), &exts).unwrap();

        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| {
            let ext = f.extension().unwrap().to_string_lossy().to_lowercase();
            ext == "mxf" || ext == "mov"
        }));
    }

    #[test]
    fn result_order_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("c.mxf"), b"").unwrap();
        std::fs::write(dir.path().join("a.mxf"), b"").unwrap();
        std::fs::write(dir.path().join("b.mxf"), b"").unwrap();

        let exts = vec!["mxf".to_string()];
        let first = find_proxy_files(dir.path(), &exts).unwrap();
        let second = find_proxy_files(dir.path(), &exts).unwrap();
        assert_eq!(first, second);
        assert!(first.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn missing_directory_is_a_configuration_error() {
        let err = find_proxy_files(Path::new("/nonexistent/proxies"), &["mxf".to_string()])
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
