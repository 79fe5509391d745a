use crate::constants::{
    CENTRAL_DIRECTORY_END_SIGNATURE, VERSION_NEEDED_ZIP64, ZIP64_BYTES_THR,
    ZIP64_CENTRAL_DIRECTORY_END_SIGNATURE, ZIP64_CENTRAL_EXTRA_FIELD_DATA_SIZE,
    ZIP64_END_OF_CENTRAL_DIRECTORY_REMAINING_SIZE, ZIP64_END_OF_CENTRAL_DIR_LOCATOR_SIGNATURE,
    ZIP64_EXTRA_FIELD_HEADER_ID, ZIP64_LOCAL_EXTRA_FIELD_DATA_SIZE,
};

/// Growable little-endian byte buffer used to lay out the fixed size records.
#[derive(Debug)]
pub struct ArchiveDescriptor {
    buffer: Vec<u8>,
}

impl ArchiveDescriptor {
    pub fn new(capacity: u64) -> ArchiveDescriptor {
        ArchiveDescriptor {
            buffer: Vec::with_capacity(capacity as usize),
        }
    }

    pub fn write_u16(&mut self, val: u16) {
        self.buffer.extend_from_slice(&val.to_le_bytes());
    }

    pub fn write_u32(&mut self, val: u32) {
        self.buffer.extend_from_slice(&val.to_le_bytes());
    }

    pub fn write_u64(&mut self, val: u64) {
        self.buffer.extend_from_slice(&val.to_le_bytes());
    }

    pub fn write_bytes(&mut self, val: &[u8]) {
        self.buffer.extend_from_slice(val);
    }

    pub fn finish(self) -> Vec<u8> {
        self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

/// The ZIP64 extended information "extra" block.
///
/// The local header only carries the two sizes (20 bytes), the central directory
/// header carries the sizes and the local header offset (28 bytes). Every matching
/// 32-bit field of the owning header holds `0xFFFFFFFF`.
///
/// Note: all fields stored in Intel low-byte/high-byte order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtraFieldZIP64ExtendedInformation {
    pub uncompressed_size: u64,
    pub compressed_size: u64,
    pub offset: u64,
}

impl ExtraFieldZIP64ExtendedInformation {
    pub const HEADER_ID: u16 = ZIP64_EXTRA_FIELD_HEADER_ID;

    pub fn new(uncompressed_size: u64, compressed_size: u64, offset: u64) -> Self {
        Self {
            uncompressed_size,
            compressed_size,
            offset,
        }
    }

    pub fn local_header_extra_field_size(&self) -> u16 {
        4 + ZIP64_LOCAL_EXTRA_FIELD_DATA_SIZE
    }

    pub fn central_header_extra_field_size(&self) -> u16 {
        4 + ZIP64_CENTRAL_EXTRA_FIELD_DATA_SIZE
    }

    pub fn local_header_write_data(&self, archive_descriptor: &mut ArchiveDescriptor) {
        archive_descriptor.write_u16(Self::HEADER_ID);
        archive_descriptor.write_u16(ZIP64_LOCAL_EXTRA_FIELD_DATA_SIZE);
        archive_descriptor.write_u64(self.uncompressed_size);
        archive_descriptor.write_u64(self.compressed_size);
    }

    pub fn central_header_extra_write_data(&self, archive_descriptor: &mut ArchiveDescriptor) {
        archive_descriptor.write_u16(Self::HEADER_ID);
        archive_descriptor.write_u16(ZIP64_CENTRAL_EXTRA_FIELD_DATA_SIZE);
        archive_descriptor.write_u64(self.uncompressed_size);
        archive_descriptor.write_u64(self.compressed_size);
        archive_descriptor.write_u64(self.offset);
    }

    /// Reads the values announced by sentinels, in the fixed order of the format:
    /// uncompressed size, compressed size, local header offset.
    ///
    /// `data` is the field payload, without the 4 bytes header.
    #[cfg(feature = "experimental")]
    pub fn parse_extra_field(
        data: &[u8],
        uncompressed_size: u32,
        compressed_size: u32,
        offset: u32,
    ) -> Option<Self> {
        let mut values = data
            .chunks_exact(8)
            .map(|chunk| u64::from_le_bytes(chunk.try_into().unwrap_or_default()));

        let mut next = |value: u32| -> Option<u64> {
            if value as u64 == ZIP64_BYTES_THR {
                values.next()
            } else {
                Some(value as u64)
            }
        };

        let uncompressed_size = next(uncompressed_size)?;
        let compressed_size = next(compressed_size)?;
        let offset = next(offset)?;

        Some(Self::new(uncompressed_size, compressed_size, offset))
    }

    pub fn display_central(&self) -> String {
        format!(
            "- A subfield with ID 0x{:04X} (Zip64) and {} data bytes.",
            Self::HEADER_ID,
            ZIP64_CENTRAL_EXTRA_FIELD_DATA_SIZE,
        )
    }
}

/// The trailing records of an archive: the end of central directory record and,
/// for ZIP64 archives, the ZIP64 end of central directory record and its locator.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CentralDirectoryEnd {
    pub zip64: bool,
    pub total_number_of_entries_in_the_central_directory: u64,
    pub central_directory_size: u64,
    pub offset_of_start_of_central_directory: u64,
    pub z64ecdl_relative_offset_of_the_zip64_end_of_central_directory_record: u64,
}

impl CentralDirectoryEnd {
    pub fn new(
        zip64: bool,
        entries: u64,
        central_directory_offset: u64,
        central_directory_size: u64,
    ) -> Self {
        Self {
            zip64,
            total_number_of_entries_in_the_central_directory: entries,
            central_directory_size,
            offset_of_start_of_central_directory: central_directory_offset,
            // the ZIP64 record directly follows the central directory
            z64ecdl_relative_offset_of_the_zip64_end_of_central_directory_record:
                central_directory_offset + central_directory_size,
        }
    }

    pub fn create_zip64_end_of_central_directory_record(
        &self,
        end_of_central_directory: &mut ArchiveDescriptor,
    ) {
        end_of_central_directory.write_u32(ZIP64_CENTRAL_DIRECTORY_END_SIGNATURE);
        end_of_central_directory.write_u64(ZIP64_END_OF_CENTRAL_DIRECTORY_REMAINING_SIZE);
        end_of_central_directory.write_u16(VERSION_NEEDED_ZIP64); // version made by
        end_of_central_directory.write_u16(VERSION_NEEDED_ZIP64);
        end_of_central_directory.write_u32(0); // number of this disk
        end_of_central_directory.write_u32(0); // disk with the central directory
        end_of_central_directory.write_u64(self.total_number_of_entries_in_the_central_directory);
        end_of_central_directory.write_u64(self.total_number_of_entries_in_the_central_directory);
        end_of_central_directory.write_u64(self.central_directory_size);
        end_of_central_directory.write_u64(self.offset_of_start_of_central_directory);
    }

    pub fn create_end_of_central_directory_locator(
        &self,
        end_of_central_directory: &mut ArchiveDescriptor,
    ) {
        end_of_central_directory.write_u32(ZIP64_END_OF_CENTRAL_DIR_LOCATOR_SIGNATURE);
        end_of_central_directory.write_u32(0); // disk with the zip64 end of central directory
        end_of_central_directory
            .write_u64(self.z64ecdl_relative_offset_of_the_zip64_end_of_central_directory_record);
        end_of_central_directory.write_u32(1); // total number of disks
    }

    pub fn create_end_of_central_directory(&self, end_of_central_directory: &mut ArchiveDescriptor) {
        let (disk, entries, size, offset) = if self.zip64 {
            (
                u16::MAX,
                u16::MAX,
                ZIP64_BYTES_THR as u32,
                ZIP64_BYTES_THR as u32,
            )
        } else {
            (
                0,
                self.total_number_of_entries_in_the_central_directory as u16,
                self.central_directory_size as u32,
                self.offset_of_start_of_central_directory as u32,
            )
        };

        end_of_central_directory.write_u32(CENTRAL_DIRECTORY_END_SIGNATURE);
        end_of_central_directory.write_u16(disk); // number of this disk
        end_of_central_directory.write_u16(disk); // disk with the central directory
        end_of_central_directory.write_u16(entries); // entries on this disk
        end_of_central_directory.write_u16(entries); // total entries
        end_of_central_directory.write_u32(size);
        end_of_central_directory.write_u32(offset);
        end_of_central_directory.write_u16(0); // comment length
    }

    /// Every trailing record, in stream order.
    pub fn write_all_records(&self, end_of_central_directory: &mut ArchiveDescriptor) {
        if self.zip64 {
            self.create_zip64_end_of_central_directory_record(end_of_central_directory);
            self.create_end_of_central_directory_locator(end_of_central_directory);
        }
        self.create_end_of_central_directory(end_of_central_directory);
    }
}
