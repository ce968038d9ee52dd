// Copyright (c) 2023 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::archive::{ForwardOnly, ZipArchive};
use crate::base::read::seek;
use crate::entry::StoredZipEntry;
use crate::error::ZipError;
use crate::name::ResolvedName;
use crate::tests::fixture::{self, Entry, Side, UTF8_FLAG};
use crate::tests::init_logger;

use futures_lite::io::Cursor;

const LATIN1_CAFE: &[u8] = b"caf\xE9";

async fn first_entry(entry: Entry) -> StoredZipEntry {
    let reader = seek::ZipFileReader::new(Cursor::new(fixture::archive(&[entry]))).await.expect("failed to open");
    reader.entry(0).expect("failed to resolve entry")
}

#[tokio::test]
async fn flagged_comment_is_declared_utf8() {
    init_logger();

    let entry = Entry::agreeing(b"a.txt", UTF8_FLAG, Vec::new(), b"a").with_comment("café".as_bytes());
    let entry = first_entry(entry).await;

    assert_eq!(entry.comment(), Some(&ResolvedName::DeclaredUtf8("café".to_owned())));
}

#[tokio::test]
async fn current_unicode_comment_field_is_trusted() {
    init_logger();

    let extra = fixture::unicode_comment(1, crc32fast::hash(LATIN1_CAFE), "café".as_bytes());
    let entry = first_entry(Entry::agreeing(b"a.txt", 0, extra, b"a").with_comment(LATIN1_CAFE)).await;

    assert_eq!(entry.comment(), Some(&ResolvedName::ExtraFieldUtf8("café".to_owned())));
    assert_eq!(entry.filename(), &ResolvedName::Unspecified(b"a.txt".to_vec()));
}

#[tokio::test]
async fn stale_unicode_comment_field_is_ignored() {
    init_logger();

    let extra = fixture::unicode_comment(1, crc32fast::hash(b"an older comment"), "café".as_bytes());
    let entry = first_entry(Entry::agreeing(b"a.txt", 0, extra, b"a").with_comment(LATIN1_CAFE)).await;

    assert_eq!(entry.comment(), Some(&ResolvedName::Unspecified(LATIN1_CAFE.to_vec())));
}

#[tokio::test]
async fn unicode_comment_field_with_invalid_payload_keeps_header_bytes() {
    init_logger();

    let extra = fixture::unicode_comment(1, crc32fast::hash(LATIN1_CAFE), b"\xFF\xFE");
    let entry = first_entry(Entry::agreeing(b"a.txt", 0, extra, b"a").with_comment(LATIN1_CAFE)).await;

    assert_eq!(entry.comment(), Some(&ResolvedName::Unspecified(LATIN1_CAFE.to_vec())));
}

#[tokio::test]
async fn malformed_flagged_comment_keeps_its_entry() {
    init_logger();

    let data = fixture::archive(&[Entry::agreeing(b"good.txt", UTF8_FLAG, Vec::new(), b"good").with_comment(b"\xFF")]);

    let mut seeking = ZipArchive::open(Cursor::new(data.clone())).await.expect("failed to open archive");
    let seeking_entry = seeking.next_entry().await.expect("comment failed its entry").expect("no entry found").clone();

    let mut streaming = ZipArchive::open(ForwardOnly::new(Cursor::new(data))).await.expect("failed to open archive");
    let streaming_entry = streaming.next_entry().await.expect("failed to read entry").expect("no entry found");

    assert_eq!(seeking_entry.filename(), &ResolvedName::DeclaredUtf8("good.txt".to_owned()));
    assert_eq!(seeking_entry.filename(), streaming_entry.filename());
    assert_eq!(seeking_entry.comment(), Some(&ResolvedName::Unspecified(vec![0xFF])));
    assert_eq!(streaming_entry.comment(), None);

    let mut buffer = Vec::new();
    seeking.read_data(&mut buffer).await.expect("failed to read data");
    assert_eq!(buffer, b"good");
}

#[tokio::test]
async fn short_unicode_comment_field_keeps_its_entry() {
    init_logger();

    // A 0x6375 field with room for neither its version nor its checksum.
    let extra = vec![0x75, 0x63, 0x02, 0x00, 0x01, 0x00];
    let entry = first_entry(Entry::agreeing(b"a.txt", UTF8_FLAG, extra, b"a").with_comment(b"note")).await;

    assert_eq!(entry.filename(), &ResolvedName::DeclaredUtf8("a.txt".to_owned()));
    assert_eq!(entry.comment(), Some(&ResolvedName::DeclaredUtf8("note".to_owned())));
}

#[tokio::test]
async fn incomplete_zip64_field_only_fails_data_access() {
    init_logger();

    // Four bytes can't hold the compressed size the central header defers to the field.
    let zip64 = vec![0x01, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00];
    let entry = Entry::disagreeing(Side::new(b"a.txt", 0, Vec::new()), Side::new(b"a.txt", 0, zip64), b"data");
    let mut data = fixture::archive(&[entry]);

    // Compressed size of the central directory header.
    let cd_offset = 30 + 5 + 4;
    data[cd_offset + 20..cd_offset + 24].copy_from_slice(&u32::MAX.to_le_bytes());

    let mut reader = seek::ZipFileReader::new(Cursor::new(data)).await.expect("failed to open reader");
    let entry = reader.entry(0).expect("zip64 field failed the name");

    assert_eq!(entry.filename(), &ResolvedName::Unspecified(b"a.txt".to_vec()));
    assert_eq!(entry.compressed_size(), u64::from(u32::MAX));
    assert!(matches!(reader.reader_without_entry(0).await, Err(ZipError::Zip64ExtendedFieldIncomplete)));
}
