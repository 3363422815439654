// src/watch/path_utils.rs

//! Utility functions for path handling in the watcher and dispatcher.

use std::path::{Component, Path, PathBuf};

use crate::fs::FileSystem;

/// Collapse `.` and `..` components without touching the filesystem.
///
/// `..` at the root stays at the root, matching how the kernel resolves it.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !path.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Resolve the real path of a file named by a change notification.
///
/// The file may already be gone (deletions, short-lived temp files), so:
/// - First we try to canonicalize the path itself.
/// - If that fails, we canonicalize its parent directory and re-attach the
///   file name.
/// - Only if both attempts fail do we fall back to a lexically normalized
///   absolute path.
pub fn real_path(fs: &dyn FileSystem, path: &Path) -> PathBuf {
    if let Ok(canon) = fs.canonicalize(path) {
        return canon;
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match fs.current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };
    let absolute = normalize_lexically(&absolute);

    if let (Some(parent), Some(name)) = (absolute.parent(), absolute.file_name()) {
        if let Ok(parent_canon) = fs.canonicalize(parent) {
            return parent_canon.join(name);
        }
    }

    absolute
}

/// Directory portion of `path` as a string, `""` when there is none.
pub fn dirname_str(path: &Path) -> String {
    path.parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// File name portion of `path` as a string, `""` when there is none.
pub fn filename_str(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    #[test]
    fn normalizes_dot_segments() {
        assert_eq!(
            normalize_lexically(Path::new("/tmp/./a/../b")),
            PathBuf::from("/tmp/b")
        );
        assert_eq!(normalize_lexically(Path::new("/../x")), PathBuf::from("/x"));
    }

    #[test]
    fn real_path_of_deleted_file_uses_parent() {
        let fs = MockFileSystem::new();
        fs.add_dir("/data/real");
        fs.add_symlink("/srv/link", "/data/real");

        let resolved = real_path(&fs, Path::new("/srv/link/gone.txt"));
        assert_eq!(resolved, PathBuf::from("/data/real/gone.txt"));
    }

    #[test]
    fn dirname_and_filename() {
        let p = Path::new("/tmp/a.txt");
        assert_eq!(dirname_str(p), "/tmp");
        assert_eq!(filename_str(p), "a.txt");
        assert_eq!(dirname_str(Path::new("/")), "");
    }
}
