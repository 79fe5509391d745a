use thiserror::Error;

/// Errors raised while writing (or, with the `experimental` feature, reading) an archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Failure reported by the sink or the payload source, passed through untouched.
    #[error("Archive I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("The archive writer is already closed")]
    WriterClosed,

    /// A previous write to the sink failed, the bytes it holds no longer match the archive state.
    #[error("The archive writer failed on a previous sink write")]
    WriterFailed,

    #[error("Cannot create an empty archive")]
    EmptyArchive,

    #[error("The file name is {0} bytes long, the maximum is 65535 bytes")]
    FileNameTooLong(usize),

    /// A value does not fit the classic 16/32-bit field of a non ZIP64 archive.
    #[error("The {field} ({value}) does not fit a classic archive, ZIP64 is required")]
    Zip64Required { field: &'static str, value: u64 },

    #[error("Bad archive structure : {0}")]
    BadArchiveStructure(String),
}
