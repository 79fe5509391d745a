use crate::archive_common::{
    ArchiveDescriptor, CentralDirectoryEnd, ExtraFieldZIP64ExtendedInformation,
};
use crate::checksum::checksum;
use crate::compress::ArchiveOptions;
use crate::constants::{
    EXTERNAL_FILE_ATTRIBUTES, FILE_HEADER_BASE_SIZE, STORE_METHOD, UTF8_NAME_FLAG,
    VERSION_MADE_BY_UNIX, VERSION_NEEDED_DEFAULT, VERSION_NEEDED_ZIP64, ZIP64_BYTES_THR,
    ZIP64_ENTRY_THR,
};
use crate::error::ArchiveError;
use crate::types::ArchiveFileEntry;

/// Writer state shared by the blocking and the async archives.
///
/// `archive_size` is the write offset: it only moves after a record has been
/// fully handed to the sink, by the exact length of that record.
#[derive(Debug)]
pub(crate) struct SubZipArchiveData {
    pub zip64: bool,
    pub last_mod_file_date: u16,
    pub last_mod_file_time: u16,
    pub archive_size: u64,
    pub central_directory_offset: u64,
    pub central_directory_size: u64,
    pub files_info: Vec<ArchiveFileEntry>,
    pub closed: bool,
    pub failed: bool,
}

impl SubZipArchiveData {
    pub fn new(options: &ArchiveOptions) -> Self {
        let (last_mod_file_date, last_mod_file_time) = options.last_modified_time.ms_dos();

        Self {
            zip64: options.zip64,
            last_mod_file_date,
            last_mod_file_time,
            archive_size: 0,
            central_directory_offset: 0,
            central_directory_size: 0,
            files_info: Vec::new(),
            closed: false,
            failed: false,
        }
    }

    /// Fails once the writer is closed or a sink write went wrong.
    pub fn check_writable(&self) -> Result<(), ArchiveError> {
        if self.failed {
            return Err(ArchiveError::WriterFailed);
        }
        if self.closed {
            return Err(ArchiveError::WriterClosed);
        }
        Ok(())
    }

    /// Marks the writer as failed on a sink error: part of a record may already be in the sink.
    pub fn check_sink<T>(&mut self, result: std::io::Result<T>) -> Result<T, ArchiveError> {
        result.map_err(|error| {
            self.failed = true;
            ArchiveError::IoError(error)
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArchiveFileEntry> {
        self.files_info.iter()
    }

    fn check_classic_limit(&self, field: &'static str, value: u64, limit: u64) -> Result<(), ArchiveError> {
        if !self.zip64 && value >= limit {
            return Err(ArchiveError::Zip64Required { field, value });
        }
        Ok(())
    }

    /// Builds the metadata of a fully buffered payload and the bytes that precede it:
    /// local file header, name and ZIP64 extra field.
    pub fn build_file_header(
        &self,
        file_name: &str,
        payload: &[u8],
    ) -> Result<(ArchiveDescriptor, ArchiveFileEntry), ArchiveError> {
        self.check_writable()?;

        let file_name_as_bytes = file_name.as_bytes().to_vec();
        let file_name_len = u16::try_from(file_name_as_bytes.len())
            .map_err(|_| ArchiveError::FileNameTooLong(file_name_as_bytes.len()))?;

        let size = payload.len() as u64;
        let offset = self.archive_size;

        self.check_classic_limit("entry size", size, ZIP64_BYTES_THR)?;
        self.check_classic_limit("local header offset", offset, ZIP64_BYTES_THR)?;
        self.check_classic_limit(
            "number of entries",
            self.files_info.len() as u64 + 1,
            ZIP64_ENTRY_THR,
        )?;

        let version = if self.zip64 {
            VERSION_NEEDED_ZIP64
        } else {
            VERSION_NEEDED_DEFAULT
        };

        let archive_file_entry = ArchiveFileEntry {
            version_made_by: VERSION_MADE_BY_UNIX | version,
            minimum_version_needed_to_extract: version,
            general_purpose_flags: UTF8_NAME_FLAG,
            compression_method: STORE_METHOD,
            last_mod_file_time: self.last_mod_file_time,
            last_mod_file_date: self.last_mod_file_date,
            crc32: checksum(payload),
            compressed_size: size,
            uncompressed_size: size,
            file_name_len,
            file_name_as_bytes,
            offset,
            internal_file_attributes: 0,
            external_file_attributes: EXTERNAL_FILE_ATTRIBUTES,
            file_disk_number: 0,
            zip64_extra_field: self
                .zip64
                .then(|| ExtraFieldZIP64ExtendedInformation::new(size, size, offset)),
        };

        let mut file_header = ArchiveDescriptor::new(
            FILE_HEADER_BASE_SIZE
                + file_name_len as u64
                + archive_file_entry.local_header_extra_field_size() as u64,
        );
        archive_file_entry.write_local_header(&mut file_header);

        Ok((file_header, archive_file_entry))
    }

    /// Registers an entry whose header and payload were written.
    pub fn add_archive_file_entry(&mut self, archive_file_entry: ArchiveFileEntry) {
        self.archive_size += archive_file_entry.local_record_size();
        self.files_info.push(archive_file_entry);
    }

    /// Checks that the central directory can be written and fixes its offset.
    pub fn start_central_directory(&mut self) -> Result<CentralDirectoryEnd, ArchiveError> {
        if self.failed {
            return Err(ArchiveError::WriterFailed);
        }
        if self.files_info.is_empty() {
            return Err(ArchiveError::EmptyArchive);
        }

        let central_directory_size = self
            .files_info
            .iter()
            .map(ArchiveFileEntry::central_record_size)
            .sum();

        self.check_classic_limit(
            "central directory offset",
            self.archive_size,
            ZIP64_BYTES_THR,
        )?;
        self.check_classic_limit(
            "central directory size",
            central_directory_size,
            ZIP64_BYTES_THR,
        )?;

        self.central_directory_offset = self.archive_size;

        Ok(CentralDirectoryEnd::new(
            self.zip64,
            self.files_info.len() as u64,
            self.central_directory_offset,
            central_directory_size,
        ))
    }

    /// Accounts for the central directory records and builds the trailing records.
    pub fn end_central_directory(
        &mut self,
        central_directory_end: &CentralDirectoryEnd,
        written: u64,
    ) -> ArchiveDescriptor {
        debug_assert_eq!(written, central_directory_end.central_directory_size);

        self.central_directory_size = written;
        self.archive_size += written;

        let mut end_of_central_directory = ArchiveDescriptor::new(100);
        central_directory_end.write_all_records(&mut end_of_central_directory);
        end_of_central_directory
    }

    pub fn close(&mut self, end_of_central_directory: &ArchiveDescriptor) {
        self.archive_size += end_of_central_directory.len() as u64;
        self.closed = true;
    }
}
