//! Discovery of source files under a data root.

use super::EtlError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Suffix of the JSON-lines source files.
pub const JSON_SUFFIX: &str = ".json";

fn is_hidden(file_name: &str) -> bool {
    file_name.starts_with('.')
}

/// Recursively collects every file under `root` whose name ends with `suffix`.
///
/// Paths are absolute. Entries are visited in file-name order within each directory, so
/// the result is stable for a given directory state. Hidden files are never matched.
pub fn find_files(root: &Path, suffix: &str) -> Result<Vec<PathBuf>, EtlError> {
    let root = match root.canonicalize() {
        Ok(path) => path,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(EtlError::NotFound(root.to_path_buf()))
        }
        Err(e) => {
            return Err(EtlError::Io {
                path: root.to_path_buf(),
                source: e,
            })
        }
    };
    if !root.is_dir() {
        return Err(EtlError::NotADirectory(root));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(&root).to_path_buf();
            EtlError::Io {
                path,
                source: e.into(),
            }
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy();
        if !is_hidden(&file_name) && file_name.ends_with(suffix) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
