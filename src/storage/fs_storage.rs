use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::storage::BlockStorage;

/// [`BlockStorage`] over the files of one directory.
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl BlockStorage for FsStorage {
    fn read_file(&self, name: &str, max_len: usize) -> io::Result<Vec<u8>> {
        let file = fs::File::open(self.root.join(name))?;
        let mut data = Vec::with_capacity(max_len);
        file.take(max_len as u64).read_to_end(&mut data)?;
        Ok(data)
    }

    fn write_file(&mut self, name: &str, data: &[u8]) -> io::Result<usize> {
        atomic_write(&self.root.join(name), data)?;
        Ok(data.len())
    }
}

/// temp → fsync → rename, so a failed write leaves the previous file intact.
fn atomic_write(path: &Path, data: &[u8]) -> io::Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    let temp_path = parent.join(format!(".pingate_tmp_{}", std::process::id()));

    let mut file = fs::File::create(&temp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&temp_path, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let mut storage = FsStorage::new(dir.path());

        let written = storage.write_file("pin.bin", b"hello world").unwrap();
        assert_eq!(written, 11);
        assert_eq!(storage.read_file("pin.bin", 64).unwrap(), b"hello world");
    }

    #[test]
    fn test_read_is_capped() {
        let dir = TempDir::new().unwrap();
        let mut storage = FsStorage::new(dir.path());

        storage.write_file("note.txt", b"0123456789").unwrap();
        assert_eq!(storage.read_file("note.txt", 4).unwrap(), b"0123");
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let storage = FsStorage::new(dir.path());

        let err = storage.read_file("absent.bin", 16).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_overwrite_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let mut storage = FsStorage::new(dir.path());

        storage.write_file("pin.bin", b"first").unwrap();
        storage.write_file("pin.bin", b"second").unwrap();

        assert_eq!(storage.read_file("pin.bin", 64).unwrap(), b"second");
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("pin.bin")]);
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let mut storage = FsStorage::new(dir.path().join("gone"));

        assert!(storage.write_file("pin.bin", b"data").is_err());
    }
}
