// Copyright (c) 2023 Harry [Majored] [hello@majored.pw]
// Copyright (c) 2023 Cognite AS
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::error::ZipError;
use crate::spec::extra_field::{find_unicode_path, parse_extra_fields, zip64_extended_information, Zip64Overflow};
use crate::spec::header::{ExtraField, HeaderId};
use crate::tests::fixture::{self, ARROW_NAME};

fn unknown_field(id: u16, content: &[u8]) -> Vec<u8> {
    let mut field = Vec::new();
    field.extend_from_slice(&id.to_le_bytes());
    field.extend_from_slice(&(content.len() as u16).to_le_bytes());
    field.extend_from_slice(content);
    field
}

#[test]
fn find_unicode_path_among_other_fields() {
    let data = [
        unknown_field(0x5455, &[0x03, 0x00, 0x00, 0x00, 0x00]),
        fixture::matching_unicode_path(b"A.txt", ARROW_NAME),
        unknown_field(0x000a, &[0; 8]),
    ]
    .concat();

    let field = find_unicode_path(&data).expect("failed to scan extra fields").expect("no unicode path field");

    assert_eq!(field.version, 1);
    assert_eq!(field.crc32, crc32fast::hash(b"A.txt"));
    assert_eq!(field.unicode, ARROW_NAME);
}

#[test]
fn find_unicode_path_absent() {
    let data = unknown_field(0x5455, &[0x01, 0x02]);
    assert_eq!(find_unicode_path(&data).expect("failed to scan extra fields"), None);
    assert_eq!(find_unicode_path(&[]).expect("failed to scan empty region"), None);
}

#[test]
fn find_unicode_path_first_occurrence_wins() {
    let data =
        [fixture::matching_unicode_path(b"a", b"first"), fixture::matching_unicode_path(b"a", b"second")].concat();

    let field = find_unicode_path(&data).expect("failed to scan extra fields").expect("no unicode path field");
    assert_eq!(field.unicode, b"first");
}

#[test]
fn trailing_padding_is_tolerated() {
    let mut data = fixture::matching_unicode_path(b"a", b"b");
    data.extend_from_slice(&[0, 0, 0]);

    assert!(find_unicode_path(&data).expect("failed to scan extra fields").is_some());
    assert_eq!(parse_extra_fields(&data, Zip64Overflow::default()).len(), 1);
}

#[test]
fn overlong_sub_field_is_truncated() {
    let mut data = fixture::matching_unicode_path(b"a", b"abc");
    data.truncate(data.len() - 1);

    assert!(matches!(find_unicode_path(&data), Err(ZipError::TruncatedExtraField(0x7075))));

    // The declared length of a field that isn't the one searched for is still checked.
    let mut data = unknown_field(0x5455, &[0; 9]);
    data.truncate(8);
    assert!(matches!(find_unicode_path(&data), Err(ZipError::TruncatedExtraField(0x5455))));
}

#[test]
fn unicode_field_too_short_for_its_header() {
    let data = unknown_field(0x7075, &[1, 0, 0, 0]);
    assert!(matches!(find_unicode_path(&data), Err(ZipError::TruncatedExtraField(0x7075))));
}

#[test]
fn unknown_fields_are_kept() {
    let data = unknown_field(0x5455, &[0x03, 0x01]);
    let fields = parse_extra_fields(&data, Zip64Overflow::default());

    match fields.as_slice() {
        [ExtraField::Unknown(field)] => {
            assert_eq!(field.header_id, HeaderId(0x5455));
            assert_eq!(field.content, [0x03, 0x01]);
        }
        other => panic!("unexpected fields: {other:?}"),
    }
}

#[test]
fn zip64_field_values_follow_overflowed_header_values() {
    let mut content = Vec::new();
    content.extend_from_slice(&0x1_0000_0000u64.to_le_bytes());
    content.extend_from_slice(&0x2_0000_0000u64.to_le_bytes());
    let data = unknown_field(0x0001, &content);

    let overflow = Zip64Overflow::new(0xFFFFFFFF, 0xFFFFFFFF, Some(10));
    let fields = parse_extra_fields(&data, overflow);
    let zip64 = zip64_extended_information(&fields).expect("no zip64 field");

    assert_eq!(zip64.uncompressed_size, Some(0x1_0000_0000));
    assert_eq!(zip64.compressed_size, Some(0x2_0000_0000));
    assert_eq!(zip64.relative_header_offset, None);
}

#[test]
fn incomplete_zip64_field_is_kept_as_unknown() {
    let data = unknown_field(0x0001, &0x1_0000_0000u64.to_le_bytes());

    let overflow = Zip64Overflow::new(0xFFFFFFFF, 0xFFFFFFFF, Some(0xFFFFFFFF));
    let fields = parse_extra_fields(&data, overflow);

    assert!(zip64_extended_information(&fields).is_none());
    assert!(matches!(fields.as_slice(), [ExtraField::Unknown(field)] if field.header_id == HeaderId(0x0001)));
}

#[test]
fn short_unicode_comment_field_is_kept_as_unknown() {
    let data = [unknown_field(0x6375, &[1, 0]), unknown_field(0x5455, &[0x03])].concat();
    let fields = parse_extra_fields(&data, Zip64Overflow::default());

    assert_eq!(fields.len(), 2);
    assert!(matches!(&fields[0], ExtraField::Unknown(field) if field.content == [1, 0]));
}

#[test]
fn overlong_sub_field_ends_parsing() {
    let mut data = [unknown_field(0x5455, &[0x03]), unknown_field(0x000a, &[0; 8])].concat();
    data.truncate(data.len() - 2);

    let fields = parse_extra_fields(&data, Zip64Overflow::default());
    assert!(matches!(fields.as_slice(), [ExtraField::Unknown(field)] if field.header_id == HeaderId(0x5455)));
}
