use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Files created by [`populated_tree`], relative to its root
#[allow(dead_code)]
pub const TREE_FILES: &[&str] = &["top.txt", "a/one.txt", "a/b/two.txt", "a/b/c/three.txt"];

/// Temporary directory holding a small nested tree of text files
///
/// Each file contains its own relative path.
#[allow(dead_code)]
pub fn populated_tree() -> std::io::Result<(TempDir, PathBuf)> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path().join("tree");
    for relative in TREE_FILES {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, relative)?;
    }
    Ok((temp_dir, root))
}

/// Count every file and directory under `root`, including `root` itself
#[allow(dead_code)]
pub fn count_entries(root: &Path) -> usize {
    walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .count()
}
