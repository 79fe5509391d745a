//! Archive writers.
//!
//! Every entry is laid out as:
//!
//! | Record              | Classic                 | ZIP64                           |
//! |---------------------|-------------------------|---------------------------------|
//! | Local file header   | real sizes              | sizes set to `0xFFFFFFFF`       |
//! | Extra field         | none                    | 20 bytes: both sizes            |
//! | Central header      | real sizes and offset   | sizes and offset `0xFFFFFFFF`   |
//! | Extra field         | none                    | 28 bytes: both sizes and offset |
//!
//! A ZIP64 archive ends with the ZIP64 end of central directory record and its
//! locator, followed by an end of central directory record made of sentinels.
//!
//! The mode is chosen once per archive through [`ArchiveOptions::zip64`], it is
//! not decided entry by entry from the measured sizes.

#[cfg(feature = "std")]
pub mod std;
#[cfg(feature = "tokio")]
pub mod tokio;

mod common;

use crate::types::FileDateTime;

/// Settings shared by every entry of an archive.
#[derive(Clone, Copy, Debug)]
pub struct ArchiveOptions {
    /// The entries' modified time, resolved once when the archive is created.
    pub last_modified_time: FileDateTime,

    /// Write every record with its ZIP64 layout.
    pub zip64: bool,
}

impl ArchiveOptions {
    /// Set the last modified time applied to every entry.
    ///
    /// The default is the local time at the archive creation.
    pub fn last_modified_time(mut self, mod_time: FileDateTime) -> ArchiveOptions {
        self.last_modified_time = mod_time;
        self
    }

    /// Set whether the archive uses the ZIP64 extensions.
    ///
    /// If set to `true`, readers will require ZIP64 support and each entry carries
    /// ZIP64 extra fields even when its size would fit 32 bits. If set to `false`,
    /// appending an entry whose size or offset exceeds 4 GiB fails. The default is `false`.
    pub fn zip64(mut self, zip64: bool) -> ArchiveOptions {
        self.zip64 = zip64;
        self
    }
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            last_modified_time: FileDateTime::Now,
            zip64: false,
        }
    }
}
