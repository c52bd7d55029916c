use std::collections::HashMap;
use std::io;

use crate::storage::BlockStorage;

/// In-memory [`BlockStorage`] with write accounting and fault injection.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: HashMap<String, Vec<u8>>,
    writes: usize,
    fail_writes: bool,
    truncate_writes_to: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, data: &[u8]) {
        self.files.insert(name.to_string(), data.to_vec());
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.files.get(name).map(Vec::as_slice)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Vec<u8>> {
        self.files.get_mut(name)
    }

    /// Number of successful or partial writes performed.
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Make every following write fail without touching stored data.
    pub fn fail_writes(&mut self) {
        self.fail_writes = true;
    }

    /// Make every following write persist only the first `len` bytes.
    pub fn truncate_writes_to(&mut self, len: usize) {
        self.truncate_writes_to = Some(len);
    }
}

impl BlockStorage for MemoryStorage {
    fn read_file(&self, name: &str, max_len: usize) -> io::Result<Vec<u8>> {
        let data = self
            .files
            .get(name)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, name.to_string()))?;
        Ok(data[..data.len().min(max_len)].to_vec())
    }

    fn write_file(&mut self, name: &str, data: &[u8]) -> io::Result<usize> {
        if self.fail_writes {
            return Err(io::Error::other("injected write failure"));
        }
        let len = self.truncate_writes_to.map_or(data.len(), |n| n.min(data.len()));
        self.files.insert(name.to_string(), data[..len].to_vec());
        self.writes += 1;
        Ok(len)
    }
}
