//! Tests for the facade running on a non-host backend

#![allow(clippy::unwrap_used)]

use super::*;
use crate::encoding::{Contents, Encoding};
use crate::error::{ErrorCode, FsError, Result, Syscall};
use crate::facade::Filesystem;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::SystemTime;

#[derive(Debug, Clone)]
enum Node {
    File(Vec<u8>),
    Dir,
}

/// In-memory backend; `cross_device` makes every rename fail with `EXDEV`
#[derive(Debug, Default)]
struct MemoryFileSystem {
    nodes: Mutex<BTreeMap<PathBuf, Node>>,
    cross_device: bool,
}

struct MemoryMetadata {
    size: u64,
    dir: bool,
}

impl AsyncMetadata for MemoryMetadata {
    fn size(&self) -> u64 {
        self.size
    }
    fn is_file(&self) -> bool {
        !self.dir
    }
    fn is_dir(&self) -> bool {
        self.dir
    }
    fn is_symlink(&self) -> bool {
        false
    }
    fn permissions(&self) -> u32 {
        if self.dir {
            0o755
        } else {
            0o644
        }
    }
    fn modified(&self) -> SystemTime {
        SystemTime::UNIX_EPOCH
    }
    fn accessed(&self) -> SystemTime {
        SystemTime::UNIX_EPOCH
    }
}

impl MemoryFileSystem {
    fn with_root() -> Self {
        let fs = Self::default();
        fs.nodes.lock().unwrap().insert(PathBuf::from("/"), Node::Dir);
        fs
    }

    fn cross_device() -> Self {
        Self {
            cross_device: true,
            ..Self::with_root()
        }
    }

    fn parent_is_dir(nodes: &BTreeMap<PathBuf, Node>, path: &Path, syscall: Syscall) -> Result<()> {
        match path.parent().map(|p| nodes.get(p)) {
            Some(Some(Node::Dir)) | None => Ok(()),
            Some(Some(Node::File(_))) => Err(FsError::new(ErrorCode::NotDirectory, syscall, path)),
            Some(None) => Err(FsError::new(ErrorCode::NotFound, syscall, path)),
        }
    }

    fn store(&self, path: &Path, data: Vec<u8>, append: bool) -> Result<()> {
        let mut nodes = self.nodes.lock().unwrap();
        Self::parent_is_dir(&nodes, path, Syscall::Open)?;
        match nodes.get_mut(path) {
            Some(Node::Dir) => Err(FsError::new(ErrorCode::IsDirectory, Syscall::Open, path)),
            Some(Node::File(existing)) if append => {
                existing.extend(data);
                Ok(())
            }
            _ => {
                nodes.insert(path.to_path_buf(), Node::File(data));
                Ok(())
            }
        }
    }
}

impl AsyncFileSystem for MemoryFileSystem {
    type Metadata = MemoryMetadata;

    async fn read_dir(&self, path: &Path) -> Result<Vec<String>> {
        let nodes = self.nodes.lock().unwrap();
        match nodes.get(path) {
            Some(Node::Dir) => Ok(nodes
                .keys()
                .filter(|p| p.parent() == Some(path))
                .filter_map(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .collect()),
            Some(Node::File(_)) => Err(FsError::new(ErrorCode::NotDirectory, Syscall::Scandir, path)),
            None => Err(FsError::new(ErrorCode::NotFound, Syscall::Scandir, path)),
        }
    }

    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        let mut nodes = self.nodes.lock().unwrap();
        for ancestor in path.ancestors().collect::<Vec<_>>().into_iter().rev() {
            match nodes.get(ancestor) {
                Some(Node::Dir) => {}
                Some(Node::File(_)) => {
                    return Err(FsError::new(ErrorCode::AlreadyExists, Syscall::Mkdir, path));
                }
                None => {
                    nodes.insert(ancestor.to_path_buf(), Node::Dir);
                }
            }
        }
        Ok(())
    }

    async fn remove(&self, path: &Path) -> Result<()> {
        let mut nodes = self.nodes.lock().unwrap();
        if !nodes.contains_key(path) {
            return Err(FsError::new(ErrorCode::NotFound, Syscall::Rm, path));
        }
        nodes.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        match self.nodes.lock().unwrap().get(path) {
            Some(Node::File(data)) => Ok(data.clone()),
            Some(Node::Dir) => Err(FsError::new(ErrorCode::IsDirectory, Syscall::Read, path)),
            None => Err(FsError::new(ErrorCode::NotFound, Syscall::Open, path)),
        }
    }

    async fn write(&self, path: &Path, data: Vec<u8>) -> Result<()> {
        self.store(path, data, false)
    }

    async fn append(&self, path: &Path, data: Vec<u8>) -> Result<()> {
        self.store(path, data, true)
    }

    async fn metadata(&self, path: &Path) -> Result<MemoryMetadata> {
        match self.nodes.lock().unwrap().get(path) {
            Some(Node::File(data)) => Ok(MemoryMetadata {
                size: data.len() as u64,
                dir: false,
            }),
            Some(Node::Dir) => Ok(MemoryMetadata { size: 0, dir: true }),
            None => Err(FsError::new(ErrorCode::NotFound, Syscall::Stat, path)),
        }
    }

    async fn copy_file(&self, src: &Path, dst: &Path) -> Result<u64> {
        let data = match self.nodes.lock().unwrap().get(src) {
            Some(Node::File(data)) => data.clone(),
            Some(Node::Dir) => {
                return Err(FsError::new(ErrorCode::IsDirectory, Syscall::Copyfile, src));
            }
            None => return Err(FsError::new(ErrorCode::NotFound, Syscall::Copyfile, src)),
        };
        let len = data.len() as u64;
        self.store(dst, data, false)?;
        Ok(len)
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        if self.cross_device {
            return Err(FsError::new(ErrorCode::CrossDevice, Syscall::Rename, from));
        }
        let mut nodes = self.nodes.lock().unwrap();
        let node = nodes
            .remove(from)
            .ok_or_else(|| FsError::new(ErrorCode::NotFound, Syscall::Rename, from))?;
        nodes.insert(to.to_path_buf(), node);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[compio::test]
async fn test_facade_over_memory_backend() -> anyhow::Result<()> {
    let fs = Filesystem::with_backend(MemoryFileSystem::with_root());
    assert_eq!(fs.backend().name(), "memory");

    fs.mkdir("/data/logs").await?;
    fs.write_file("/data/a.txt", "Some contents", Encoding::Utf8)
        .await?;

    let mut names = fs.readdir("/data").await?;
    names.sort();
    assert_eq!(names, vec!["a.txt", "logs"]);

    let stat = fs.stat("/data/a.txt").await?;
    assert_eq!(stat.size, 13);
    assert!(stat.is_file());
    assert!(!stat.is_directory());

    Ok(())
}

#[compio::test]
async fn test_append_concatenates() -> anyhow::Result<()> {
    let fs = Filesystem::with_backend(MemoryFileSystem::with_root());

    fs.append_file("/log.txt", "a", Encoding::Utf8).await?;
    fs.append_file("/log.txt", "b", Encoding::Utf8).await?;

    let contents = fs.read_file("/log.txt", Encoding::Utf8).await?;
    assert_eq!(contents, Contents::Text("ab".to_string()));
    Ok(())
}

#[compio::test]
async fn test_move_falls_back_to_copy_across_devices() -> anyhow::Result<()> {
    let fs = Filesystem::with_backend(MemoryFileSystem::cross_device());
    fs.write_file("/src.txt", "payload", Encoding::Utf8).await?;

    fs.move_file("/src.txt", "/dst.txt").await?;

    assert!(!fs.exists("/src.txt").await);
    assert_eq!(
        fs.read_file("/dst.txt", Encoding::Utf8).await?.as_text(),
        Some("payload")
    );
    Ok(())
}

#[compio::test]
async fn test_move_missing_source_is_enoent() {
    let fs = Filesystem::with_backend(MemoryFileSystem::with_root());

    let err = fs.move_file("/nope", "/dst").await.unwrap_err();
    assert_eq!(err.code(), "ENOENT");
    assert_eq!(err.syscall(), Syscall::Rename);
    assert!(!fs.exists("/dst").await);
}

#[compio::test]
async fn test_cross_device_move_of_missing_source_reports_copy() {
    let fs = Filesystem::with_backend(MemoryFileSystem::cross_device());

    let err = fs.move_file("/nope", "/dst").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.syscall(), Syscall::Copyfile);
}

#[compio::test]
async fn test_unlink_removes_subtree() -> anyhow::Result<()> {
    let fs = Filesystem::with_backend(MemoryFileSystem::with_root());
    fs.mkdir("/tree/a/b").await?;
    fs.write_file("/tree/a/b/leaf.txt", "x", Encoding::Utf8)
        .await?;

    fs.unlink("/tree").await?;

    assert!(!fs.exists("/tree").await);
    assert!(!fs.exists("/tree/a/b/leaf.txt").await);
    assert!(fs.unlink("/tree").await.unwrap_err().is_not_found());
    Ok(())
}

#[compio::test]
async fn test_errors_pass_through_unchanged() {
    let fs = Filesystem::with_backend(MemoryFileSystem::with_root());

    let err = fs.read_file("/missing.txt", Encoding::Utf8).await.unwrap_err();
    assert_eq!(err.error_code(), ErrorCode::NotFound);
    assert_eq!(
        err.to_string(),
        "ENOENT: no such file or directory, open '/missing.txt'"
    );

    fs.mkdir("/dir").await.unwrap();
    let err = fs.read_file("/dir", Encoding::Utf8).await.unwrap_err();
    assert_eq!(err.code(), "EISDIR");

    let err = fs.write_file("/no/parent.txt", "x", Encoding::Utf8).await.unwrap_err();
    assert_eq!(err.code(), "ENOENT");
}
