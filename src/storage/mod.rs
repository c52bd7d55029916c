pub mod credential_file;
pub mod format;
pub mod fs_storage;
pub mod memory;

use std::io;

/// Whole-file storage the gate persists its files through.
pub trait BlockStorage {
    /// Read at most `max_len` bytes from the start of `name`.
    fn read_file(&self, name: &str, max_len: usize) -> io::Result<Vec<u8>>;

    /// Replace `name` with `data`, returning the number of bytes written.
    fn write_file(&mut self, name: &str, data: &[u8]) -> io::Result<usize>;
}

impl<T: BlockStorage + ?Sized> BlockStorage for &mut T {
    fn read_file(&self, name: &str, max_len: usize) -> io::Result<Vec<u8>> {
        (**self).read_file(name, max_len)
    }

    fn write_file(&mut self, name: &str, data: &[u8]) -> io::Result<usize> {
        (**self).write_file(name, data)
    }
}
