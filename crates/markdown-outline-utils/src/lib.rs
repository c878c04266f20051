//! Shared utilities for markdown-outline crates.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use similar::TextDiff;
use tempfile::Builder;

/// Map `func` over `items` in parallel, keeping the input order in the output.
pub fn parallel_map<T, R, F>(items: Vec<T>, func: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Send + Sync,
{
    items.into_par_iter().map(func).collect()
}

/// Atomically write the provided string to `path`, ensuring readers never observe
/// partial content. The write is performed via a temporary file in the same
/// directory followed by an atomic rename.
pub fn atomic_write(path: &Path, contents: &str) -> io::Result<()> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| Path::new(".").to_path_buf());

    let mut tmp = Builder::new()
        .prefix(".markdown-outline")
        .tempfile_in(&parent)?;

    tmp.as_file_mut().write_all(contents.as_bytes())?;
    tmp.as_file_mut().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(metadata) = fs::metadata(path) {
            let perm = metadata.permissions().mode();
            let _ = fs::set_permissions(tmp.path(), fs::Permissions::from_mode(perm));
        }
    }
    #[cfg(not(unix))]
    {
        if let Ok(metadata) = fs::metadata(path) {
            let _ = fs::set_permissions(tmp.path(), metadata.permissions());
        }
    }

    tmp.persist(path).map(|_| ()).map_err(|err| err.error)
}

/// Unified diff between two versions of `path`, or `None` when they match.
pub fn unified_diff(original: &str, modified: &str, path: &str) -> Option<String> {
    if original == modified {
        return None;
    }

    let diff = TextDiff::from_lines(original, modified);
    let header_old = format!("a/{path}");
    let header_new = format!("b/{path}");

    Some(
        diff.unified_diff()
            .header(&header_old, &header_new)
            .to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn replaces_contents_in_place() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.md");
        fs::write(&path, "old").unwrap();

        atomic_write(&path, "new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name() != "doc.md")
            .collect();
        assert!(leftovers.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.md");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        atomic_write(&path, "new").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[test]
    fn parallel_map_preserves_order() {
        let doubled = parallel_map((0..100).collect(), |n: u32| n * 2);
        assert_eq!(doubled, (0..100).map(|n| n * 2).collect::<Vec<_>>());
    }

    #[test]
    fn diff_is_none_for_identical_content() {
        assert!(unified_diff("abc", "abc", "file.md").is_none());
    }

    #[test]
    fn diff_marks_changed_lines() {
        let diff = unified_diff("# A\n", "# 1 A\n", "file.md").unwrap();
        assert!(diff.contains("--- a/file.md"));
        assert!(diff.contains("-# A"));
        assert!(diff.contains("+# 1 A"));
    }
}
