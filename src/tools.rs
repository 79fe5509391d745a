use crate::constants::{
    CENTRAL_DIRECTORY_ENTRY_BASE_SIZE, END_OF_CENTRAL_DIRECTORY_SIZE, FILE_HEADER_BASE_SIZE,
    ZIP64_CENTRAL_EXTRA_FIELD_DATA_SIZE, ZIP64_END_OF_CENTRAL_DIRECTORY_SIZE,
    ZIP64_END_OF_CENTRAL_DIR_LOCATOR_SIZE, ZIP64_LOCAL_EXTRA_FIELD_DATA_SIZE,
};

/// Calculate the exact size of an archive based on the names and sizes of its files.
///
/// ## Example
///
/// ```
/// use zipflow::tools::archive_size;
///
/// assert_eq!(
///     archive_size(
///         [
///             ("file1.txt", b"hello\n".len() as u64),
///             ("file2.txt", b"world\n".len() as u64),
///         ],
///         false,
///     ),
///     222,
/// );
/// ```
pub fn archive_size<'a, I: IntoIterator<Item = (&'a str, u64)>>(files: I, zip64: bool) -> u64 {
    let (local_extra, central_extra, trailer) = if zip64 {
        (
            4 + ZIP64_LOCAL_EXTRA_FIELD_DATA_SIZE as u64,
            4 + ZIP64_CENTRAL_EXTRA_FIELD_DATA_SIZE as u64,
            ZIP64_END_OF_CENTRAL_DIRECTORY_SIZE + ZIP64_END_OF_CENTRAL_DIR_LOCATOR_SIZE,
        )
    } else {
        (0, 0, 0)
    };

    files
        .into_iter()
        .map(|(name, size)| {
            FILE_HEADER_BASE_SIZE
                + name.len() as u64
                + local_extra
                + size
                + CENTRAL_DIRECTORY_ENTRY_BASE_SIZE
                + name.len() as u64
                + central_extra
        })
        .sum::<u64>()
        + trailer
        + END_OF_CENTRAL_DIRECTORY_SIZE
}

#[cfg(test)]
mod test {
    use super::archive_size;

    #[test]
    fn classic_size() {
        assert_eq!(archive_size([("a", 1)], false), 30 + 1 + 1 + 46 + 1 + 22);
    }

    #[test]
    fn zip64_size() {
        assert_eq!(
            archive_size([("a", 1)], true),
            30 + 1 + 20 + 1 + 46 + 1 + 28 + 56 + 20 + 22
        );
    }
}
