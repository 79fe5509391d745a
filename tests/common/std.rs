#![allow(dead_code)]

use std::{
    fs::File,
    io::{Read, Write},
    path::PathBuf,
};
use tempfile::TempDir;

use super::PACKAGE_NAME;

pub fn create_new_clean_file(dir: &TempDir, file_name: &str) -> (File, PathBuf) {
    let out_path = dir.path().join(PACKAGE_NAME).join(file_name);
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent).unwrap_or_else(|error| {
            panic!("creating dir {:?} failed, because {:?}", parent, error);
        });
    }

    let file = File::create(&out_path).unwrap_or_else(|error| {
        panic!("creating file {:?} failed, because {:?}", &out_path, error);
    });
    (file, out_path)
}

/// Produces `size` bytes of `b'0'`.
pub struct MockReader {
    mock_size: usize,
}

impl MockReader {
    pub fn new(size: usize) -> Self {
        Self { mock_size: size }
    }
}

impl Read for MockReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let size = buf.len().min(self.mock_size);
        buf[..size].fill(b'0');
        self.mock_size -= size;
        Ok(size)
    }
}

/// A sink refusing every write.
pub struct BrokenWriter;

impl Write for BrokenWriter {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "sink closed",
        ))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Collects the bytes written, except for the `fail_at`-th call to `write` (1-based) which fails.
pub struct FailOnceWriter {
    pub data: Vec<u8>,
    calls: usize,
    fail_at: usize,
}

impl FailOnceWriter {
    pub fn new(fail_at: usize) -> Self {
        Self {
            data: Vec::new(),
            calls: 0,
            fail_at,
        }
    }
}

impl Write for FailOnceWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.calls += 1;
        if self.calls == self.fail_at {
            return Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "transient failure",
            ));
        }
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
