//! Blocking writer over [`std::io::Write`].

pub mod archive;
