//! Non blocking writer over [`tokio::io::AsyncWrite`].

pub mod archive;
