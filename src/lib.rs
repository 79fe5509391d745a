//! A library for writing ZIP archives in one pass. Entries are stored (no
//! compression) and the output is never *seeked*, so the sink can be a socket,
//! stdout or any other stream.
//!
//! Each entry's payload is read in full before anything is written for it:
//! its size and CRC-32 go in the local header that precedes the data. Large
//! archives can use the ZIP64 extensions, chosen once for the whole archive.
//!
//! The current implementation is based on
//!
//! [PKWARE's APPNOTE.TXT v6.3.10](https://pkware.cachefly.net/webdocs/casestudies/APPNOTE.TXT)
//!
//!
//! ## Features
//!
//! Feature      | Description
//! -------------|------
//! tokio        | To use tokio non blocking API, namely: [tokio::io::AsyncRead] and [tokio::io::AsyncWrite]
//! std          | To use standard API, namely:  [std::io::Read] and [std::io::Write]
//! experimental | A minimal reader for stored archives, see `uncompress`
//!
//!
//! ## Examples
//! ### File system
//!
//! A simple example to create an archive file using [tokio::fs::File]
//!
//!```rust
//! use zipflow::{compress::tokio::archive::ZipArchive, error::ArchiveError};
//!
//! use tokio::fs::File;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ArchiveError> {
//! let dir = std::env::temp_dir();
//! let file = File::create(dir.join("zipflow_doc_archive.zip")).await?;
//!
//! let mut archive = ZipArchive::new(file);
//! archive.append("file1.txt", &mut b"hello\n".as_ref()).await?;
//! archive.append("file2.txt", &mut b"world\n".as_ref()).await?;
//!
//! let size = archive.finalize().await?;
//! assert_eq!(size, 222);
//!
//! Ok(())
//! }
//!```
//! ### In memory, ZIP64
//!
//! The blocking flavour writes to any [std::io::Write]:
//!
//!```rust
//! use zipflow::{
//!     compress::std::archive::ZipArchive, compress::ArchiveOptions, error::ArchiveError,
//!     types::FileDateTime,
//! };
//!
//! fn main() -> Result<(), ArchiveError> {
//!     let options = ArchiveOptions::default()
//!         .last_modified_time(FileDateTime::Zero)
//!         .zip64(true);
//!
//!     let mut archive = ZipArchive::with_options(Vec::new(), &options);
//!     archive.append("file1.txt", &mut b"hello\n".as_ref())?;
//!     archive.finalize()?;
//!
//!     let data = archive.retrieve_writer();
//!     assert_eq!(&data[..4], b"PK\x03\x04");
//!
//!     Ok(())
//! }
//!```
//!
//! ## Disclaimer
//!
//!This implementation is inspired by :
//!- <https://github.com/scotow/zipit> and
//!- <https://github.com/zip-rs/zip>

mod constants;

pub mod archive_common;
pub mod checksum;
pub mod compress;
pub mod error;
pub mod tools;
pub mod types;
#[cfg(feature = "experimental")]
pub mod uncompress;
