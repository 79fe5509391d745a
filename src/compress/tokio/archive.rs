use crate::archive_common::{ArchiveDescriptor, CentralDirectoryEnd};
use crate::compress::common::SubZipArchiveData;
use crate::compress::ArchiveOptions;
use crate::error::ArchiveError;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, trace};

/// A zip archive written to an [`AsyncWrite`] sink.
///
/// Create a zip archive using either:
/// * [`new`](Self::new()), or
/// * [`with_options`](Self::with_options()).
///
/// Then, append files one by one using the [`append`](Self::append()) function.
/// When finished, use the [`finalize`](Self::finalize()) function. The sink is
/// flushed but never shut down, get it back with [`retrieve_writer`](Self::retrieve_writer()).
///
/// Once a write to the sink fails, the archive is unusable: every later
/// `append` or `finalize` returns [`ArchiveError::WriterFailed`].
///
/// Each call needs `&mut self`: two operations on the same archive can't overlap.
///
/// # Features
///
/// Requires `tokio` feature
#[derive(Debug)]
pub struct ZipArchive<W: AsyncWrite + Unpin> {
    sink: W,
    data: SubZipArchiveData,
}

impl<W: AsyncWrite + Unpin> ZipArchive<W> {
    /// Create a new zip archive with the default [`ArchiveOptions`].
    pub fn new(sink: W) -> Self {
        Self::with_options(sink, &ArchiveOptions::default())
    }

    /// Create a new zip archive. The modification time of the entries is resolved here.
    pub fn with_options(sink: W, options: &ArchiveOptions) -> Self {
        Self {
            sink,
            data: SubZipArchiveData::new(options),
        }
    }

    /// Get archive current total bytes written.
    pub fn get_archive_size(&self) -> u64 {
        self.data.archive_size
    }

    /// Whether [`finalize`](Self::finalize()) already completed.
    pub fn is_closed(&self) -> bool {
        self.data.closed
    }

    /// Get back archive writer.
    pub fn retrieve_writer(self) -> W {
        self.sink
    }

    /// Append a new stored entry to the archive using the provided name and payload.
    ///
    /// The payload is read to its end and kept in memory until written: its
    /// size and CRC-32 are declared in the local header that precedes it.
    ///
    /// # Arguments
    /// * `file_name` - The name of the archive entry
    /// * `payload` -  The [`AsyncRead`] entity to be archived
    ///
    #[tracing::instrument(level = "debug", skip(self, payload))]
    pub async fn append<R>(&mut self, file_name: &str, payload: &mut R) -> Result<(), ArchiveError>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        self.data.check_writable()?;

        let mut buffer = Vec::new();
        payload.read_to_end(&mut buffer).await?;

        let (file_header, archive_file_entry) = self.data.build_file_header(file_name, &buffer)?;

        let result = Self::write_entry(&mut self.sink, file_header.buffer(), &buffer).await;
        self.data.check_sink(result)?;

        debug!(
            offset = archive_file_entry.offset,
            size = archive_file_entry.uncompressed_size,
            crc32 = archive_file_entry.crc32,
            "entry appended"
        );

        self.data.add_archive_file_entry(archive_file_entry);

        Ok(())
    }

    /// Finalize the archive by writing the central directory and the end records.
    ///
    /// Returns the archive size (bytes). Calling it again does nothing.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn finalize(&mut self) -> Result<u64, ArchiveError> {
        if self.data.closed {
            return Ok(self.data.archive_size);
        }

        let central_directory_end = self.data.start_central_directory()?;

        let result = self.write_central_directory(&central_directory_end).await;
        let end_of_central_directory = self.data.check_sink(result)?;

        self.data.close(&end_of_central_directory);

        debug!(
            entries = self.data.files_info.len(),
            central_directory_offset = self.data.central_directory_offset,
            central_directory_size = self.data.central_directory_size,
            archive_size = self.data.archive_size,
            "archive finalized"
        );

        Ok(self.data.archive_size)
    }

    async fn write_entry(sink: &mut W, file_header: &[u8], payload: &[u8]) -> std::io::Result<()> {
        sink.write_all(file_header).await?;
        sink.write_all(payload).await
    }

    async fn write_central_directory(
        &mut self,
        central_directory_end: &CentralDirectoryEnd,
    ) -> std::io::Result<ArchiveDescriptor> {
        let mut central_directory_header = ArchiveDescriptor::new(500);
        let mut written = 0u64;

        for file_info in self.data.iter() {
            file_info.write_central_header(&mut central_directory_header);
            trace!(
                file_name = %file_info.get_file_name(),
                len = central_directory_header.len(),
                "central directory record"
            );

            self.sink
                .write_all(central_directory_header.buffer())
                .await?;
            written += central_directory_header.len() as u64;
            central_directory_header.clear();
        }

        let end_of_central_directory = self
            .data
            .end_central_directory(central_directory_end, written);

        self.sink
            .write_all(end_of_central_directory.buffer())
            .await?;
        self.sink.flush().await?;

        Ok(end_of_central_directory)
    }
}
