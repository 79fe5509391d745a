use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

use zipflow::{compress::std::archive::ZipArchive, compress::ArchiveOptions};

mod common;
use common::{expected_size, read_back};

#[quickcheck]
fn archive_contents_survive(contents: Vec<Vec<u8>>, zip64: bool) -> TestResult {
    if contents.is_empty() {
        return TestResult::discard();
    }

    let entries: Vec<(String, Vec<u8>)> = contents
        .into_iter()
        .enumerate()
        .map(|(i, content)| (format!("{i}.bin"), content))
        .collect();

    let mut archive = ZipArchive::with_options(Vec::new(), &ArchiveOptions::default().zip64(zip64));
    for (name, content) in &entries {
        archive.append(name, &mut content.as_slice()).unwrap();
    }
    let size = archive.finalize().unwrap();
    let data = archive.retrieve_writer();

    TestResult::from_bool(
        size == data.len() as u64
            && size == expected_size(&entries, zip64)
            && read_back(data) == entries,
    )
}

#[quickcheck]
fn archive_size_matches_prediction(sizes: Vec<u16>, zip64: bool) -> TestResult {
    if sizes.is_empty() {
        return TestResult::discard();
    }

    let mut archive = ZipArchive::with_options(Vec::new(), &ArchiveOptions::default().zip64(zip64));
    let mut names = Vec::new();
    for (i, size) in sizes.iter().enumerate() {
        let name = format!("dir/{i}.dat");
        archive
            .append(&name, &mut vec![7u8; *size as usize].as_slice())
            .unwrap();
        names.push((name, *size as u64));
    }
    let size = archive.finalize().unwrap();

    TestResult::from_bool(
        size == zipflow::tools::archive_size(
            names.iter().map(|(name, size)| (name.as_str(), *size)),
            zip64,
        ),
    )
}
