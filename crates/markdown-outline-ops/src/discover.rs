use std::fs;
use std::path::{Path, PathBuf};

use markdown_outline_config::ScanSettings;
use walkdir::WalkDir;

use crate::OperationError;

const MARKDOWN_EXTENSION: &str = "md";

/// Recursively list `.md` files under `root`, skipping symbolic links and
/// anything the scan settings exclude. Paths come back in walk order, sorted
/// by file name within each directory.
pub(crate) fn markdown_files(
    root: &Path,
    scan: &ScanSettings,
) -> Result<Vec<PathBuf>, OperationError> {
    let metadata = fs::metadata(root).map_err(|source| OperationError::Io {
        path: root.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(OperationError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry?;
        if entry.path_is_symlink() {
            log::debug!("skipping symlink {}", entry.path().display());
            continue;
        }
        if !entry.file_type().is_file() || !is_markdown(entry.path()) {
            continue;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if !scan.is_selected(relative) {
            log::debug!("excluded by scan settings: {}", relative.display());
            continue;
        }

        log::debug!("discovered {}", entry.path().display());
        files.push(entry.into_path());
    }

    Ok(files)
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == MARKDOWN_EXTENSION)
}
