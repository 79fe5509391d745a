//! Minimal reader for stored archives, used to check what the writers produce.

use crate::archive_common::{CentralDirectoryEnd, ExtraFieldZIP64ExtendedInformation};
use crate::checksum::checksum;
use crate::constants::{
    CENTRAL_DIRECTORY_END_SIGNATURE, CENTRAL_DIRECTORY_ENTRY_SIGNATURE,
    END_OF_CENTRAL_DIRECTORY_SIZE, LOCAL_FILE_HEADER_SIGNATURE, STORE_METHOD, ZIP64_BYTES_THR,
    ZIP64_CENTRAL_DIRECTORY_END_SIGNATURE, ZIP64_END_OF_CENTRAL_DIR_LOCATOR_SIGNATURE,
    ZIP64_END_OF_CENTRAL_DIR_LOCATOR_SIZE, ZIP64_ENTRY_THR, ZIP64_EXTRA_FIELD_HEADER_ID,
};
use crate::error::ArchiveError;
use crate::types::ArchiveFileEntry;
use byteorder::{LittleEndian, ReadBytesExt};
use std::fmt::{self, Display};
use std::io::{Cursor, Read, Seek, SeekFrom};
use tracing::debug;

pub struct ArchiveReader<R>
where
    R: Read + Seek,
{
    reader: R,
    pub file_entries: Vec<ArchiveFileEntry>,
    pub central_directory_end: CentralDirectoryEnd,
    /// Position of the end of central directory record signature.
    pub central_directory_end_position: u64,
}

fn check_signature<R: Read>(reader: &mut R, expected: u32, record: &str) -> Result<(), ArchiveError> {
    let signature = reader.read_u32::<LittleEndian>()?;
    if signature != expected {
        return Err(ArchiveError::BadArchiveStructure(format!(
            "{record} signature expected {expected:#010x}, found {signature:#010x}"
        )));
    }
    Ok(())
}

/// Reads `len` bytes announced by the archive, failing if the input is shorter.
fn read_declared<R: Read>(reader: &mut R, len: u64, record: &str) -> Result<Vec<u8>, ArchiveError> {
    let mut buffer = Vec::new();
    reader.by_ref().take(len).read_to_end(&mut buffer)?;

    if buffer.len() as u64 != len {
        return Err(ArchiveError::BadArchiveStructure(format!(
            "{record} declares {len} bytes, only {} available",
            buffer.len()
        )));
    }
    Ok(buffer)
}

impl<R: Read + Seek> ArchiveReader<R> {
    pub fn new(mut reader: R) -> Result<ArchiveReader<R>, ArchiveError> {
        let central_directory_end_position = Self::find_central_directory_end(&mut reader)?;
        let central_directory_end =
            Self::read_central_directory_end(&mut reader, central_directory_end_position)?;
        let file_entries = Self::read_central_directory(&central_directory_end, &mut reader)?;

        Ok(ArchiveReader {
            reader,
            file_entries,
            central_directory_end,
            central_directory_end_position,
        })
    }

    /// Scans backward from the end, the record may be followed by a comment.
    fn find_central_directory_end(reader: &mut R) -> Result<u64, ArchiveError> {
        let file_length = reader.seek(SeekFrom::End(0))?;

        let mut position = file_length
            .checked_sub(END_OF_CENTRAL_DIRECTORY_SIZE)
            .ok_or_else(|| ArchiveError::BadArchiveStructure("Archive too small".to_owned()))?;

        let search_lower_bound =
            file_length.saturating_sub(END_OF_CENTRAL_DIRECTORY_SIZE + u16::MAX as u64);

        loop {
            reader.seek(SeekFrom::Start(position))?;

            if reader.read_u32::<LittleEndian>()? == CENTRAL_DIRECTORY_END_SIGNATURE {
                debug!(position, "end of central directory found");
                return Ok(position);
            }

            if position == search_lower_bound {
                return Err(ArchiveError::BadArchiveStructure(
                    "End of central directory signature not found".to_owned(),
                ));
            }
            position -= 1;
        }
    }

    fn read_central_directory_end(
        reader: &mut R,
        position: u64,
    ) -> Result<CentralDirectoryEnd, ArchiveError> {
        reader.seek(SeekFrom::Start(position))?;
        check_signature(reader, CENTRAL_DIRECTORY_END_SIGNATURE, "end of central directory")?;

        let number_of_this_disk = reader.read_u16::<LittleEndian>()?;
        let _disk_with_central_directory = reader.read_u16::<LittleEndian>()?;
        let _entries_on_this_disk = reader.read_u16::<LittleEndian>()?;
        let entries = reader.read_u16::<LittleEndian>()?;
        let size = reader.read_u32::<LittleEndian>()?;
        let offset = reader.read_u32::<LittleEndian>()?;

        let zip64 = number_of_this_disk == u16::MAX
            || entries as u64 == ZIP64_ENTRY_THR
            || size as u64 == ZIP64_BYTES_THR
            || offset as u64 == ZIP64_BYTES_THR;

        if !zip64 {
            return Ok(CentralDirectoryEnd::new(
                false,
                entries as u64,
                offset as u64,
                size as u64,
            ));
        }

        let locator_position = position
            .checked_sub(ZIP64_END_OF_CENTRAL_DIR_LOCATOR_SIZE)
            .ok_or_else(|| {
                ArchiveError::BadArchiveStructure("No room for the ZIP64 locator".to_owned())
            })?;
        reader.seek(SeekFrom::Start(locator_position))?;
        check_signature(
            reader,
            ZIP64_END_OF_CENTRAL_DIR_LOCATOR_SIGNATURE,
            "zip64 end of central directory locator",
        )?;
        let _disk_with_zip64_end = reader.read_u32::<LittleEndian>()?;
        let zip64_end_offset = reader.read_u64::<LittleEndian>()?;
        let _total_number_of_disks = reader.read_u32::<LittleEndian>()?;

        reader.seek(SeekFrom::Start(zip64_end_offset))?;
        check_signature(
            reader,
            ZIP64_CENTRAL_DIRECTORY_END_SIGNATURE,
            "zip64 end of central directory",
        )?;
        let _remaining_size = reader.read_u64::<LittleEndian>()?;
        let _version_made_by = reader.read_u16::<LittleEndian>()?;
        let _version_needed = reader.read_u16::<LittleEndian>()?;
        let _number_of_this_disk = reader.read_u32::<LittleEndian>()?;
        let _disk_with_central_directory = reader.read_u32::<LittleEndian>()?;
        let _entries_on_this_disk = reader.read_u64::<LittleEndian>()?;
        let entries = reader.read_u64::<LittleEndian>()?;
        let size = reader.read_u64::<LittleEndian>()?;
        let offset = reader.read_u64::<LittleEndian>()?;

        Ok(CentralDirectoryEnd {
            zip64: true,
            total_number_of_entries_in_the_central_directory: entries,
            central_directory_size: size,
            offset_of_start_of_central_directory: offset,
            z64ecdl_relative_offset_of_the_zip64_end_of_central_directory_record: zip64_end_offset,
        })
    }

    fn read_central_directory(
        central_directory_end: &CentralDirectoryEnd,
        reader: &mut R,
    ) -> Result<Vec<ArchiveFileEntry>, ArchiveError> {
        reader.seek(SeekFrom::Start(
            central_directory_end.offset_of_start_of_central_directory,
        ))?;

        let central_directory_buffer = read_declared(
            reader,
            central_directory_end.central_directory_size,
            "central directory",
        )?;

        let mut cursor = Cursor::new(central_directory_buffer.as_slice());

        (0..central_directory_end.total_number_of_entries_in_the_central_directory)
            .map(|_| Self::read_central_directory_entry(&mut cursor))
            .collect()
    }

    fn read_central_directory_entry(
        cursor: &mut Cursor<&[u8]>,
    ) -> Result<ArchiveFileEntry, ArchiveError> {
        check_signature(
            cursor,
            CENTRAL_DIRECTORY_ENTRY_SIGNATURE,
            "central directory file header",
        )?;

        let version_made_by = cursor.read_u16::<LittleEndian>()?;
        let minimum_version_needed_to_extract = cursor.read_u16::<LittleEndian>()?;
        let general_purpose_flags = cursor.read_u16::<LittleEndian>()?;
        let compression_method = cursor.read_u16::<LittleEndian>()?;
        let last_mod_file_time = cursor.read_u16::<LittleEndian>()?;
        let last_mod_file_date = cursor.read_u16::<LittleEndian>()?;
        let crc32 = cursor.read_u32::<LittleEndian>()?;
        let compressed_size = cursor.read_u32::<LittleEndian>()?;
        let uncompressed_size = cursor.read_u32::<LittleEndian>()?;
        let file_name_len = cursor.read_u16::<LittleEndian>()?;
        let extra_field_length = cursor.read_u16::<LittleEndian>()?;
        let file_comment_length = cursor.read_u16::<LittleEndian>()?;
        let file_disk_number = cursor.read_u16::<LittleEndian>()?;
        let internal_file_attributes = cursor.read_u16::<LittleEndian>()?;
        let external_file_attributes = cursor.read_u32::<LittleEndian>()?;
        let offset = cursor.read_u32::<LittleEndian>()?;

        let mut file_name_as_bytes = vec![0; file_name_len as usize];
        cursor.read_exact(&mut file_name_as_bytes)?;
        let mut extra_field = vec![0; extra_field_length as usize];
        cursor.read_exact(&mut extra_field)?;
        cursor.seek(SeekFrom::Current(file_comment_length as i64))?;

        let zip64_extra_field =
            Self::find_zip64_extra_field(&extra_field, uncompressed_size, compressed_size, offset)?;

        let (uncompressed_size, compressed_size, offset) = match &zip64_extra_field {
            Some(extra) => (extra.uncompressed_size, extra.compressed_size, extra.offset),
            None => (
                uncompressed_size as u64,
                compressed_size as u64,
                offset as u64,
            ),
        };

        Ok(ArchiveFileEntry {
            version_made_by,
            minimum_version_needed_to_extract,
            general_purpose_flags,
            compression_method,
            last_mod_file_time,
            last_mod_file_date,
            crc32,
            compressed_size,
            uncompressed_size,
            file_name_len,
            file_name_as_bytes,
            offset,
            internal_file_attributes,
            external_file_attributes,
            file_disk_number: file_disk_number as u32,
            zip64_extra_field,
        })
    }

    fn find_zip64_extra_field(
        extra_field: &[u8],
        uncompressed_size: u32,
        compressed_size: u32,
        offset: u32,
    ) -> Result<Option<ExtraFieldZIP64ExtendedInformation>, ArchiveError> {
        let mut cursor = Cursor::new(extra_field);

        while (cursor.position() as usize) + 4 <= extra_field.len() {
            let header_id = cursor.read_u16::<LittleEndian>()?;
            let data_size = cursor.read_u16::<LittleEndian>()? as usize;
            let start = cursor.position() as usize;
            let data = extra_field.get(start..start + data_size).ok_or_else(|| {
                ArchiveError::BadArchiveStructure("Truncated extra field".to_owned())
            })?;

            if header_id == ZIP64_EXTRA_FIELD_HEADER_ID {
                return ExtraFieldZIP64ExtendedInformation::parse_extra_field(
                    data,
                    uncompressed_size,
                    compressed_size,
                    offset,
                )
                .map(Some)
                .ok_or_else(|| {
                    ArchiveError::BadArchiveStructure("Truncated ZIP64 extra field".to_owned())
                });
            }

            cursor.set_position((start + data_size) as u64);
        }

        Ok(None)
    }

    /// Reads the content of the entry at `index`, checking its CRC-32.
    pub fn read_entry(&mut self, index: usize) -> Result<Vec<u8>, ArchiveError> {
        let entry = self.file_entries.get(index).ok_or_else(|| {
            ArchiveError::BadArchiveStructure(format!("No entry at index {index}"))
        })?;

        if entry.compression_method != STORE_METHOD {
            return Err(ArchiveError::BadArchiveStructure(format!(
                "Compression method {} is not supported",
                entry.compression_method
            )));
        }

        self.reader.seek(SeekFrom::Start(entry.offset))?;
        check_signature(&mut self.reader, LOCAL_FILE_HEADER_SIGNATURE, "local file header")?;

        // version, flags, method, time, date, crc-32 and both sizes
        self.reader.seek(SeekFrom::Current(22))?;
        let file_name_len = self.reader.read_u16::<LittleEndian>()?;
        let extra_field_length = self.reader.read_u16::<LittleEndian>()?;
        self.reader.seek(SeekFrom::Current(
            file_name_len as i64 + extra_field_length as i64,
        ))?;

        let data = read_declared(&mut self.reader, entry.compressed_size, "entry data")?;

        let crc32 = checksum(&data);
        if crc32 != entry.crc32 {
            return Err(ArchiveError::BadArchiveStructure(format!(
                "CRC-32 mismatch for {}: expected {:08x}, found {:08x}",
                entry.get_file_name(),
                entry.crc32,
                crc32
            )));
        }

        Ok(data)
    }

    /// Index of the first entry called `file_name`.
    pub fn index_of(&self, file_name: &str) -> Option<usize> {
        self.file_entries
            .iter()
            .position(|entry| entry.file_name_as_bytes == file_name.as_bytes())
    }
}

impl<R: Read + Seek> Display for ArchiveReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Archive: {} entries, central directory at {} ({} bytes){}",
            self.central_directory_end
                .total_number_of_entries_in_the_central_directory,
            self.central_directory_end
                .offset_of_start_of_central_directory,
            self.central_directory_end.central_directory_size,
            if self.central_directory_end.zip64 {
                ", ZIP64"
            } else {
                ""
            }
        )?;

        for entry in &self.file_entries {
            writeln!(f)?;
            write!(f, "{}", entry)?;
        }

        Ok(())
    }
}
