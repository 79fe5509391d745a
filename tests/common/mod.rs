#![allow(dead_code)]

pub mod std;
pub mod tokio;

use ::std::io::{Cursor, Read};

pub const PACKAGE_NAME: &str = "zipflow";

/// Entry names and payloads shared by the round trip tests.
pub fn sample_entries() -> Vec<(String, Vec<u8>)> {
    vec![
        ("0.bin".to_owned(), Vec::new()),
        ("1.bin".to_owned(), random_bytes(17)),
        ("2.bin".to_owned(), random_bytes(300)),
    ]
}

pub fn all_byte_values() -> Vec<u8> {
    (0..=255u8).collect()
}

pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut buffer = vec![0u8; len];
    getrandom::fill(&mut buffer).unwrap_or_else(|error| {
        panic!("filling {} random bytes failed, because {:?}", len, error);
    });
    buffer
}

/// Reads every entry back with the `zip` crate, which also checks the CRC-32.
pub fn read_back(data: Vec<u8>) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data)).unwrap_or_else(|error| {
        panic!("opening the archive failed, because {:?}", error);
    });

    (0..archive.len())
        .map(|index| {
            let mut file = archive.by_index(index).unwrap();
            assert_eq!(file.compression(), zip::CompressionMethod::Stored);
            assert_eq!(file.size(), file.compressed_size());

            let mut content = Vec::new();
            file.read_to_end(&mut content).unwrap();
            (file.name().to_owned(), content)
        })
        .collect()
}

pub fn expected_size(entries: &[(String, Vec<u8>)], zip64: bool) -> u64 {
    zipflow::tools::archive_size(
        entries
            .iter()
            .map(|(name, content)| (name.as_str(), content.len() as u64)),
        zip64,
    )
}
