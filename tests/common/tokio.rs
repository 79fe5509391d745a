#![allow(dead_code)]
use std::path::PathBuf;
use std::task::Poll;
use tempfile::TempDir;
use tokio::{
    fs::File,
    io::{AsyncRead, AsyncWrite},
};

use super::PACKAGE_NAME;
const ENGINE: &str = "tokio";

pub async fn create_new_clean_file(dir: &TempDir, file_name: &str) -> (File, PathBuf) {
    let out_dir = dir.path().join(PACKAGE_NAME).join(ENGINE);
    tokio::fs::create_dir_all(&out_dir)
        .await
        .unwrap_or_else(|error| {
            panic!("creating dir {:?} failed, because {:?}", out_dir, error);
        });

    let out_path = out_dir.join(file_name);
    let file = File::create(&out_path).await.unwrap_or_else(|error| {
        panic!("creating file {:?} failed, because {:?}", &out_path, error);
    });
    (file, out_path)
}

/// Produces `size` bytes of `b'0'`.
pub struct MockAsyncReader {
    mock_size: usize,
}

impl MockAsyncReader {
    pub fn new(size: usize) -> Self {
        Self { mock_size: size }
    }
}

impl AsyncRead for MockAsyncReader {
    fn poll_read(
        mut self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
        buf: &mut tokio::io::ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        let size = buf.remaining().min(self.mock_size);
        let chunk = vec![b'0'; size];
        buf.put_slice(&chunk);
        self.mock_size -= size;

        Poll::Ready(Ok(()))
    }
}

/// A sink refusing every write.
pub struct BrokenAsyncWriter;

impl AsyncWrite for BrokenAsyncWriter {
    fn poll_write(
        self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
        _buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        Poll::Ready(Err(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "sink closed",
        )))
    }

    fn poll_flush(
        self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
    ) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(
        self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
    ) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Collects the bytes written, except for the `fail_at`-th call to `poll_write` (1-based) which fails.
pub struct FailOnceAsyncWriter {
    pub data: Vec<u8>,
    calls: usize,
    fail_at: usize,
}

impl FailOnceAsyncWriter {
    pub fn new(fail_at: usize) -> Self {
        Self {
            data: Vec::new(),
            calls: 0,
            fail_at,
        }
    }
}

impl AsyncWrite for FailOnceAsyncWriter {
    fn poll_write(
        mut self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        self.calls += 1;
        if self.calls == self.fail_at {
            return Poll::Ready(Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "transient failure",
            )));
        }
        self.data.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(
        self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
    ) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(
        self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
    ) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}
