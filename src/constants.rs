use std::mem::size_of;

pub const FILE_HEADER_BASE_SIZE: u64 = (7 * size_of::<u16>() + 4 * size_of::<u32>()) as u64;
pub const CENTRAL_DIRECTORY_ENTRY_BASE_SIZE: u64 =
    (11 * size_of::<u16>() + 6 * size_of::<u32>()) as u64;
pub const END_OF_CENTRAL_DIRECTORY_SIZE: u64 = (5 * size_of::<u16>() + 3 * size_of::<u32>()) as u64;
pub const ZIP64_END_OF_CENTRAL_DIRECTORY_SIZE: u64 =
    (2 * size_of::<u16>() + 3 * size_of::<u32>() + 5 * size_of::<u64>()) as u64;
pub const ZIP64_END_OF_CENTRAL_DIR_LOCATOR_SIZE: u64 =
    (3 * size_of::<u32>() + size_of::<u64>()) as u64;

/// Bytes counted by the "size of zip64 end of central directory record" field:
/// everything after the signature and the field itself.
pub const ZIP64_END_OF_CENTRAL_DIRECTORY_REMAINING_SIZE: u64 = ZIP64_END_OF_CENTRAL_DIRECTORY_SIZE - 12;

pub const LOCAL_FILE_HEADER_SIGNATURE: u32 = 0x04034b50;
pub const CENTRAL_DIRECTORY_ENTRY_SIGNATURE: u32 = 0x02014b50;
pub const CENTRAL_DIRECTORY_END_SIGNATURE: u32 = 0x06054b50;
pub const ZIP64_CENTRAL_DIRECTORY_END_SIGNATURE: u32 = 0x06064b50;
pub const ZIP64_END_OF_CENTRAL_DIR_LOCATOR_SIGNATURE: u32 = 0x07064b50;

pub const ZIP64_EXTRA_FIELD_HEADER_ID: u16 = 0x0001;
pub const ZIP64_LOCAL_EXTRA_FIELD_DATA_SIZE: u16 = 2 * size_of::<u64>() as u16;
pub const ZIP64_CENTRAL_EXTRA_FIELD_DATA_SIZE: u16 = 3 * size_of::<u64>() as u16;

pub const ZIP64_BYTES_THR: u64 = u32::MAX as u64;
pub const ZIP64_ENTRY_THR: u64 = u16::MAX as u64;

pub const UTF8_NAME_FLAG: u16 = 1 << 11;
pub const STORE_METHOD: u16 = 0;

pub const VERSION_NEEDED_DEFAULT: u16 = 10;
pub const VERSION_NEEDED_ZIP64: u16 = 45;
/// Upper byte of "version made by": 3 is Unix.
pub const VERSION_MADE_BY_UNIX: u16 = 3 << 8;

/// `rwxrwxrwx` in the high half of the external attributes.
pub const EXTERNAL_FILE_ATTRIBUTES: u32 = 0o777 << 16;
