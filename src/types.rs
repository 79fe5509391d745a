use core::fmt;

use crate::archive_common::{ArchiveDescriptor, ExtraFieldZIP64ExtendedInformation};
use crate::constants::{
    CENTRAL_DIRECTORY_ENTRY_BASE_SIZE, CENTRAL_DIRECTORY_ENTRY_SIGNATURE, FILE_HEADER_BASE_SIZE,
    LOCAL_FILE_HEADER_SIGNATURE, ZIP64_BYTES_THR,
};
use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Timelike};

/// Metadata of one archived entry, captured when its local file header is
/// written and replayed as its central directory record at finalization.
#[derive(Debug, Clone, Default)]
pub struct ArchiveFileEntry {
    pub version_made_by: u16,
    pub minimum_version_needed_to_extract: u16,
    pub general_purpose_flags: u16,
    pub compression_method: u16,
    pub last_mod_file_time: u16,
    pub last_mod_file_date: u16,
    pub crc32: u32,
    pub compressed_size: u64,
    pub uncompressed_size: u64,
    pub file_name_len: u16,
    pub file_name_as_bytes: Vec<u8>,
    pub offset: u64,
    pub internal_file_attributes: u16,
    pub external_file_attributes: u32,
    pub file_disk_number: u32,
    pub zip64_extra_field: Option<ExtraFieldZIP64ExtendedInformation>,
}

impl ArchiveFileEntry {
    pub fn get_file_name(&self) -> String {
        String::from_utf8_lossy(&self.file_name_as_bytes).into_owned()
    }

    pub fn is_zip64(&self) -> bool {
        self.zip64_extra_field.is_some()
    }

    pub fn local_header_extra_field_size(&self) -> u16 {
        self.zip64_extra_field
            .as_ref()
            .map(|extra| extra.local_header_extra_field_size())
            .unwrap_or(0)
    }

    pub fn central_header_extra_field_size(&self) -> u16 {
        self.zip64_extra_field
            .as_ref()
            .map(|extra| extra.central_header_extra_field_size())
            .unwrap_or(0)
    }

    /// Bytes taken by the local header, name, extra field and payload.
    pub fn local_record_size(&self) -> u64 {
        FILE_HEADER_BASE_SIZE
            + self.file_name_len as u64
            + self.local_header_extra_field_size() as u64
            + self.compressed_size
    }

    /// Bytes taken by the central directory header, name and extra field.
    pub fn central_record_size(&self) -> u64 {
        CENTRAL_DIRECTORY_ENTRY_BASE_SIZE
            + self.file_name_len as u64
            + self.central_header_extra_field_size() as u64
    }

    fn size_field(&self, value: u64) -> u32 {
        if self.is_zip64() {
            ZIP64_BYTES_THR as u32
        } else {
            value as u32
        }
    }

    /// Local file header followed by the name and the ZIP64 extra field if any.
    pub fn write_local_header(&self, descriptor: &mut ArchiveDescriptor) {
        let start = descriptor.len();

        descriptor.write_u32(LOCAL_FILE_HEADER_SIGNATURE);
        descriptor.write_u16(self.minimum_version_needed_to_extract);
        descriptor.write_u16(self.general_purpose_flags);
        descriptor.write_u16(self.compression_method);
        descriptor.write_u16(self.last_mod_file_time);
        descriptor.write_u16(self.last_mod_file_date);
        descriptor.write_u32(self.crc32);
        descriptor.write_u32(self.size_field(self.compressed_size));
        descriptor.write_u32(self.size_field(self.uncompressed_size));
        descriptor.write_u16(self.file_name_len);
        descriptor.write_u16(self.local_header_extra_field_size());
        descriptor.write_bytes(&self.file_name_as_bytes);

        if let Some(extra) = &self.zip64_extra_field {
            extra.local_header_write_data(descriptor);
        }

        debug_assert_eq!(
            (descriptor.len() - start) as u64,
            FILE_HEADER_BASE_SIZE
                + self.file_name_len as u64
                + self.local_header_extra_field_size() as u64
        );
    }

    /// Central directory file header followed by the name and the ZIP64 extra field if any.
    pub fn write_central_header(&self, descriptor: &mut ArchiveDescriptor) {
        let start = descriptor.len();

        descriptor.write_u32(CENTRAL_DIRECTORY_ENTRY_SIGNATURE);
        descriptor.write_u16(self.version_made_by);
        descriptor.write_u16(self.minimum_version_needed_to_extract);
        descriptor.write_u16(self.general_purpose_flags);
        descriptor.write_u16(self.compression_method);
        descriptor.write_u16(self.last_mod_file_time);
        descriptor.write_u16(self.last_mod_file_date);
        descriptor.write_u32(self.crc32);
        descriptor.write_u32(self.size_field(self.compressed_size));
        descriptor.write_u32(self.size_field(self.uncompressed_size));
        descriptor.write_u16(self.file_name_len);
        descriptor.write_u16(self.central_header_extra_field_size());
        descriptor.write_u16(0); // file comment length
        descriptor.write_u16(self.file_disk_number as u16);
        descriptor.write_u16(self.internal_file_attributes);
        descriptor.write_u32(self.external_file_attributes);
        descriptor.write_u32(self.size_field(self.offset));
        descriptor.write_bytes(&self.file_name_as_bytes);

        if let Some(extra) = &self.zip64_extra_field {
            extra.central_header_extra_write_data(descriptor);
        }

        debug_assert_eq!((descriptor.len() - start) as u64, self.central_record_size());
    }

    fn pretty_version(zip_version: u16) -> (u16, u16) {
        let zip_version = zip_version & 0xFF;
        let major = zip_version / 10;
        let minor = zip_version % 10;

        (major, minor)
    }
}

impl fmt::Display for ArchiveFileEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let padding = 48;

        writeln!(f, "{: <padding$}{}", "file name:", self.get_file_name())?;

        writeln!(
            f,
            "{: <padding$}{}",
            "offset of local header from start of archive:", self.offset
        )?;

        let (major, minor) = ArchiveFileEntry::pretty_version(self.version_made_by);
        writeln!(
            f,
            "{: <padding$}{}.{}",
            "version of encoding software:", major, minor
        )?;

        let (major, minor) =
            ArchiveFileEntry::pretty_version(self.minimum_version_needed_to_extract);
        writeln!(
            f,
            "{: <padding$}{}.{}",
            "minimum software version required to extract:", major, minor
        )?;

        writeln!(
            f,
            "{: <padding$}{:#018b}",
            "general purpose bit flag:", self.general_purpose_flags
        )?;

        let label = if self.compression_method == 0 {
            "none (stored)".to_owned()
        } else {
            format!("unknown ({})", self.compression_method)
        };
        writeln!(f, "{: <padding$}{}", "compression method:", label)?;

        let date_time = DateTimeCS::from_msdos(self.last_mod_file_date, self.last_mod_file_time);
        writeln!(
            f,
            "{: <padding$}{}",
            "file last modified on (DOS date/time):", date_time
        )?;

        writeln!(
            f,
            "{: <padding$}{:08x}",
            "32-bit CRC value (hex):", self.crc32
        )?;

        writeln!(
            f,
            "{: <padding$}{} bytes",
            "compressed size:", self.compressed_size
        )?;
        writeln!(
            f,
            "{: <padding$}{} bytes",
            "uncompressed size:", self.uncompressed_size
        )?;

        writeln!(
            f,
            "{: <padding$}{} characters",
            "length of filename:", self.file_name_len
        )?;

        writeln!(
            f,
            "{: <padding$}{}",
            "Unix file attributes:",
            format_args!("{:o} octal", self.external_file_attributes >> 16)
        )?;

        if let Some(extra) = &self.zip64_extra_field {
            writeln!(f, "{}", extra.display_central())?;
        }

        Ok(())
    }
}

/// Calendar date and time with the resolution of the MS-DOS format.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct DateTimeCS {
    year: u16,
    month: u16,
    day: u16,
    hour: u16,
    minute: u16,
    second: u16,
}

impl Default for DateTimeCS {
    fn default() -> Self {
        Self {
            year: 1980,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
        }
    }
}

impl DateTimeCS {
    /// Years outside of 1980..=2107 can't be represented and are clamped.
    pub fn new(year: u16, month: u16, day: u16, hour: u16, minute: u16, second: u16) -> Self {
        Self {
            year: year.clamp(1980, 2107),
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    pub fn from_chrono_datetime<Tz: TimeZone>(datetime: DateTime<Tz>) -> Self {
        Self::new(
            datetime.year().clamp(1980, 2107) as u16,
            datetime.month() as u16,
            datetime.day() as u16,
            datetime.hour() as u16,
            datetime.minute() as u16,
            datetime.second().min(59) as u16,
        )
    }

    /// Local wall clock time.
    pub fn now() -> Self {
        Self::from_chrono_datetime(Local::now())
    }

    pub fn from_msdos(datepart: u16, timepart: u16) -> Self {
        let seconds = (timepart & 0b0000000000011111) << 1;
        let minutes = (timepart & 0b0000011111100000) >> 5;
        let hours = (timepart & 0b1111100000000000) >> 11;
        let days = datepart & 0b0000000000011111;
        let months = (datepart & 0b0000000111100000) >> 5;
        let years = (datepart & 0b1111111000000000) >> 9;

        Self {
            year: years + 1980,
            month: months,
            day: days,
            hour: hours,
            minute: minutes,
            second: seconds,
        }
    }

    /// `((year - 1980) << 9) | (month << 5) | day`
    pub fn ms_dos_date(&self) -> u16 {
        (self.year.saturating_sub(1980) << 9) | (self.month << 5) | self.day
    }

    /// `(hour << 11) | (minute << 5) | (second / 2)`
    pub fn ms_dos_time(&self) -> u16 {
        (self.hour << 11) | (self.minute << 5) | (self.second / 2)
    }

    pub fn ms_dos(&self) -> (u16, u16) {
        (self.ms_dos_date(), self.ms_dos_time())
    }

    pub fn to_time(&self) -> chrono::NaiveDateTime {
        let date = NaiveDate::from_ymd_opt(self.year as i32, self.month as u32, self.day as u32)
            .unwrap_or_default();

        date.and_hms_opt(self.hour as u32, self.minute as u32, self.second as u32)
            .unwrap_or_else(|| date.and_time(chrono::NaiveTime::default()))
    }
}

impl fmt::Display for DateTimeCS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_time())
    }
}

/// The (timezone-less) date and time written alongside every entry of an archive.
///
/// Use `FileDateTime::Zero` if the date and time are insignificant. This will set the value to 1980, January 1th, 12AM.
/// Use `FileDateTime::Custom` if you need to set a custom date and time.
/// Use `FileDateTime::Now` to use the local date and time at the archive creation.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum FileDateTime {
    /// 1980, January 1th, 12AM.
    Zero,
    Custom(DateTimeCS),
    #[default]
    Now,
}

impl FileDateTime {
    fn tuple(&self) -> DateTimeCS {
        match self {
            FileDateTime::Zero => DateTimeCS::default(),
            FileDateTime::Custom(date_time) => *date_time,
            FileDateTime::Now => DateTimeCS::now(),
        }
    }

    /// Resolves to the `(date, time)` MS-DOS pair.
    pub fn ms_dos(&self) -> (u16, u16) {
        self.tuple().ms_dos()
    }

    pub fn to_time(&self) -> chrono::NaiveDateTime {
        self.tuple().to_time()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_ms_dos_encoding() {
        let date_time = DateTimeCS::new(2000, 1, 2, 3, 4, 5);

        assert_eq!(date_time.ms_dos_date(), ((2000 - 1980) << 9) | (1 << 5) | 2);
        assert_eq!(date_time.ms_dos_time(), (3 << 11) | (4 << 5) | 2);
    }

    #[test]
    fn test_ms_dos_round_trip() {
        let date_time = DateTimeCS::new(2023, 12, 31, 23, 59, 58);
        let (date, time) = date_time.ms_dos();

        assert_eq!(DateTimeCS::from_msdos(date, time), date_time);
    }

    #[test]
    fn test_odd_second_is_truncated() {
        let (date, time) = DateTimeCS::new(2010, 6, 15, 12, 30, 59).ms_dos();

        assert_eq!(
            DateTimeCS::from_msdos(date, time),
            DateTimeCS::new(2010, 6, 15, 12, 30, 58)
        );
    }

    #[test]
    fn test_zero() {
        assert_eq!(FileDateTime::Zero.ms_dos(), ((1 << 5) | 1, 0));
        assert_eq!(
            FileDateTime::Zero.to_time().to_string(),
            "1980-01-01 00:00:00"
        );
    }

    #[test]
    fn test_year_is_clamped() {
        assert_eq!(DateTimeCS::new(1970, 1, 1, 0, 0, 0), DateTimeCS::default());
        assert_eq!(DateTimeCS::new(2200, 1, 1, 0, 0, 0).ms_dos_date() >> 9, 127);
    }

    #[test]
    fn test_from_chrono() {
        let datetime = chrono::Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap();
        let date_time = DateTimeCS::from_chrono_datetime(datetime);

        assert_eq!(date_time, DateTimeCS::new(2021, 3, 4, 5, 6, 7));
    }

    #[test]
    fn test_entry_display() {
        let entry = ArchiveFileEntry {
            file_name_as_bytes: b"file1.txt".to_vec(),
            file_name_len: 9,
            minimum_version_needed_to_extract: 10,
            version_made_by: (3 << 8) | 10,
            crc32: 0x352441C2,
            compressed_size: 3,
            uncompressed_size: 3,
            external_file_attributes: 0o777 << 16,
            ..Default::default()
        };

        let display = entry.to_string();

        assert!(display.contains("file1.txt"));
        assert!(display.contains("352441c2"));
        assert!(display.contains("777 octal"));
        assert!(display.contains("none (stored)"));
    }
}
