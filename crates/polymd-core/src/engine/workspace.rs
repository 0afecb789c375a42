use super::error::EngineError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Script the builder setup writes for the builder proper.
pub const BUILD_SCRIPT_FILE_NAME: &str = "build.emc";

/// Extensions of files the builder leaves behind next to the data file.
const INTERMEDIATE_EXTENSIONS: [&str; 5] = ["esh", "gz", "in", "vmd", "params"];

/// Creates `dir` and any missing parents. An existing directory is not an error.
pub fn ensure_dir(dir: &Path) -> Result<(), EngineError> {
    fs::create_dir_all(dir).map_err(|e| EngineError::Workspace {
        path: dir.to_path_buf(),
        source: e,
    })
}

fn is_intermediate(path: &Path) -> bool {
    if path.file_name().and_then(|n| n.to_str()) == Some(BUILD_SCRIPT_FILE_NAME) {
        return true;
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| INTERMEDIATE_EXTENSIONS.contains(&ext))
}

/// Deletes the builder's intermediate files from `dir` and returns the ones removed.
///
/// Every removal is attempted; a file that cannot be removed is logged and skipped.
/// Must run before the MD inputs are written, since `lmp.in` matches the `in`
/// extension.
pub fn cleanup_intermediates(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot list {:?} for cleanup: {}", dir, e);
            return Vec::new();
        }
    };

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_intermediate(path))
        .collect();
    candidates.sort();

    let mut removed = Vec::with_capacity(candidates.len());
    for path in candidates {
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed {:?}", path);
                removed.push(path);
            }
            Err(e) => warn!("Problem removing {:?} during cleanup: {}", path, e),
        }
    }
    removed
}
