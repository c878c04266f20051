use std::fs;
use std::path::Path;

use markdown_outline::{OutlineError, TocNotice};
use markdown_outline_format::{FileReport, FileStatus};
use markdown_outline_utils::{atomic_write, unified_diff};

/// Result of transforming one document's text.
pub(crate) struct Rewrite {
    pub text: String,
    pub notice: Option<TocNotice>,
}

/// Read, transform and (unless `dry_run`) write back a single file.
pub(crate) fn apply_to_file<F>(root: &Path, path: &Path, dry_run: bool, transform: F) -> FileReport
where
    F: Fn(&str) -> Result<Rewrite, OutlineError>,
{
    let report = |status, diff| FileReport {
        path: path.to_path_buf(),
        status,
        diff,
    };

    let original = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            log::warn!("failed to read {}: {err}", path.display());
            return report(
                FileStatus::Failed {
                    message: format!("failed to read: {err}"),
                },
                None,
            );
        }
    };

    let rewrite = match transform(&original) {
        Ok(rewrite) => rewrite,
        Err(err) => {
            log::warn!("{}: {err}", path.display());
            return report(
                FileStatus::Failed {
                    message: err.to_string(),
                },
                None,
            );
        }
    };

    if let Some(notice) = rewrite.notice {
        log::warn!("{}: {notice}, skipping", path.display());
        return report(
            FileStatus::Skipped {
                reason: notice.to_string(),
            },
            None,
        );
    }

    if rewrite.text == original {
        return report(FileStatus::Unchanged, None);
    }

    if dry_run {
        let relative = path.strip_prefix(root).unwrap_or(path);
        let diff = unified_diff(&original, &rewrite.text, &relative.to_string_lossy());
        return report(FileStatus::Updated, diff);
    }

    if let Err(err) = atomic_write(path, &rewrite.text) {
        log::warn!("failed to write {}: {err}", path.display());
        return report(
            FileStatus::Failed {
                message: format!("failed to write: {err}"),
            },
            None,
        );
    }

    log::info!("updated {}", path.display());
    report(FileStatus::Updated, None)
}
