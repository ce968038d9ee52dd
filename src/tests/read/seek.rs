// Copyright (c) 2022 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::base::read::{mem, seek};
use crate::error::ZipError;
use crate::name::ResolvedName;
use crate::spec::header::HeaderKind;
use crate::tests::fixture::{self, Entry, Side, ARROW_NAME, UTF8_FLAG};
use crate::tests::init_logger;

use futures_lite::io::Cursor;

#[tokio::test]
async fn empty_archive() {
    init_logger();

    let reader = seek::ZipFileReader::new(Cursor::new(fixture::archive(&[]))).await.expect("failed to open reader");
    assert!(reader.file().is_empty());
    assert!(matches!(reader.entry(0), Err(ZipError::EntryIndexOutOfBounds)));
}

#[tokio::test]
async fn zero_length_archive() {
    init_logger();

    let result = seek::ZipFileReader::new(Cursor::new(Vec::<u8>::new())).await;
    assert!(matches!(result, Err(ZipError::UnableToLocateEOCDR)));
}

#[tokio::test]
async fn archive_comment() {
    init_logger();

    let data = fixture::archive_with_comment(&[Entry::agreeing(b"a", 0, Vec::new(), b"")], b"a comment");
    let reader = seek::ZipFileReader::new(Cursor::new(data)).await.expect("failed to open reader");

    assert_eq!(reader.file().comment(), b"a comment");
    assert_eq!(reader.file().len(), 1);
}

#[tokio::test]
async fn names_come_from_the_central_directory() {
    init_logger();

    let entry = Entry::disagreeing(
        Side::new(b"local.txt", 0, Vec::new()),
        Side::new(b"central.txt", UTF8_FLAG, Vec::new()),
        b"data",
    );
    let mut reader = seek::ZipFileReader::new(Cursor::new(fixture::archive(&[entry]))).await.expect("failed to open");

    let stored = reader.entry(0).expect("failed to resolve entry");
    assert_eq!(stored.filename(), &ResolvedName::DeclaredUtf8("central.txt".to_owned()));
    assert_eq!(stored.resolved_from(), HeaderKind::Central);
    assert_eq!(stored.header_offset(), 0);
    assert_eq!(stored.last_modification_date().to_string(), "1980-01-01 00:00:00");

    // The local header only positions the data.
    let mut data = Vec::new();
    let mut entry_reader = reader.reader_with_entry(0).await.expect("failed to open entry reader");
    entry_reader.read_to_end_checked(&mut data).await.expect("failed to read entry");
    assert_eq!(data, b"data");
}

#[tokio::test]
async fn bad_name_only_affects_its_entry() {
    init_logger();

    let entries = [
        Entry::agreeing(b"first.txt", 0, Vec::new(), b"one"),
        Entry::agreeing(b"\xFF\xFE", UTF8_FLAG, Vec::new(), b"two"),
        Entry::agreeing(b"third.txt", 0, Vec::new(), b"three"),
    ];
    let mut reader = seek::ZipFileReader::new(Cursor::new(fixture::archive(&entries))).await.expect("failed to open");

    let resolved: Vec<_> = reader.file().entries().collect();
    assert_eq!(resolved.len(), 3);
    assert!(resolved[0].is_ok());
    assert!(matches!(resolved[1], Err(ZipError::MalformedDeclaredUtf8(_))));
    assert!(resolved[2].is_ok());

    let mut data = Vec::new();
    let third = reader.entry(2).expect("failed to resolve entry");
    reader.reader_without_entry(2).await.expect("failed to open").read_to_end_checked(&mut data, &third).await.unwrap();
    assert_eq!(data, b"three");

    assert!(reader.reader_without_entry(1).await.is_err());
}

#[tokio::test]
async fn corrupted_data_fails_crc_check() {
    init_logger();

    let mut data = fixture::archive(&[Entry::agreeing(ARROW_NAME, UTF8_FLAG, Vec::new(), b"ABC\n")]);
    let data_offset = 30 + ARROW_NAME.len();
    data[data_offset] = b'X';

    let mut reader = seek::ZipFileReader::new(Cursor::new(data)).await.expect("failed to open reader");
    let mut buffer = Vec::new();
    let result = reader.reader_with_entry(0).await.expect("failed to open").read_to_end_checked(&mut buffer).await;

    assert!(matches!(result, Err(ZipError::CRC32CheckError)));
}

#[tokio::test]
async fn unsupported_compression_is_reported_on_read() {
    init_logger();

    let mut data = fixture::archive(&[Entry::agreeing(b"a", 0, Vec::new(), b"a")]);

    // Method 99 (AES) in the central directory record.
    let cd_offset = 30 + 1 + 1;
    data[cd_offset + 10] = 99;

    let mut reader = seek::ZipFileReader::new(Cursor::new(data)).await.expect("failed to open reader");
    let entry = reader.entry(0).expect("compression doesn't affect name resolution");

    assert_eq!(entry.compression_method(), 99);
    assert!(matches!(reader.reader_without_entry(0).await, Err(ZipError::CompressionNotSupported(99))));
}

#[tokio::test]
async fn into_entry_owns_the_reader() {
    init_logger();

    let entries = [Entry::agreeing(b"a", 0, Vec::new(), b"one"), Entry::agreeing(b"b", 0, Vec::new(), b"two")];
    let reader = seek::ZipFileReader::new(Cursor::new(fixture::archive(&entries))).await.expect("failed to open");
    let entry = reader.entry(1).expect("failed to resolve entry");

    let mut data = Vec::new();
    let mut entry_reader = reader.into_entry(1).await.expect("failed to open entry reader");
    entry_reader.read_to_end_checked(&mut data, &entry).await.expect("failed to read entry");

    assert_eq!(data, b"two");
}

#[tokio::test]
async fn mem_reader_entries_are_independent() {
    init_logger();

    let entries = [
        Entry::agreeing(b"a.txt", 0, Vec::new(), b"alpha"),
        Entry::agreeing(ARROW_NAME, 0, fixture::matching_unicode_path(ARROW_NAME, ARROW_NAME), b"arrow"),
    ];
    let reader = mem::ZipFileReader::new(fixture::archive(&entries)).await.expect("failed to open reader");

    let mut first = reader.reader_with_entry(0).await.expect("failed to open first entry");
    let mut second = reader.reader_with_entry(1).await.expect("failed to open second entry");

    let (mut a, mut b) = (Vec::new(), Vec::new());
    second.read_to_end_checked(&mut b).await.expect("failed to read second entry");
    first.read_to_end_checked(&mut a).await.expect("failed to read first entry");

    assert_eq!(a, b"alpha");
    assert_eq!(b, b"arrow");
    assert_eq!(second.entry().filename(), &ResolvedName::ExtraFieldUtf8("ABC\u{2192}.txt".to_owned()));
}

#[tokio::test]
async fn spanned_archives_are_refused() {
    init_logger();

    let mut data = fixture::archive(&[]);
    // Number of this disk.
    data[4] = 1;

    let result = seek::ZipFileReader::new(Cursor::new(data)).await;
    assert!(matches!(result, Err(ZipError::FeatureNotSupported(_))));
}

#[tokio::test]
async fn oversized_central_directory_size_is_bounded() {
    init_logger();

    let entries = [Entry::agreeing(b"a.txt", 0, Vec::new(), b"alpha"), Entry::agreeing(b"b.txt", 0, Vec::new(), b"")];
    let mut data = fixture::archive(&entries);

    // Size of the central directory in the end record.
    let eocdr_offset = data.len() - 22;
    data[eocdr_offset + 12..eocdr_offset + 16].copy_from_slice(&0xFFFFFFF0u32.to_le_bytes());

    let mut reader = seek::ZipFileReader::new(Cursor::new(data)).await.expect("failed to open reader");
    assert_eq!(reader.file().len(), 2);
    assert_eq!(reader.entry(1).expect("failed to resolve entry").pathname(), Some(&b"b.txt"[..]));

    let mut buffer = Vec::new();
    reader.reader_with_entry(0).await.expect("failed to open").read_to_end_checked(&mut buffer).await.unwrap();
    assert_eq!(buffer, b"alpha");
}
