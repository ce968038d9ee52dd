// Copyright (c) 2023 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::error::ZipError;
use crate::name::resolve::{resolve_name, resolve_record_name};
use crate::name::ResolvedName;
use crate::spec::header::{GeneralPurposeFlag, InfoZipUnicodeExtraField, RawHeaderRecord};
use crate::tests::fixture::{self, Side, ARROW_NAME, UTF8_FLAG};
use crate::tests::init_logger;

const ARROW: &str = "ABC\u{2192}.txt";

fn flagged() -> GeneralPurposeFlag {
    GeneralPurposeFlag { filename_unicode: true, ..Default::default() }
}

fn field(version: u8, crc32: u32, unicode: &[u8]) -> InfoZipUnicodeExtraField {
    InfoZipUnicodeExtraField { version, crc32, unicode: unicode.to_vec() }
}

#[test]
fn declared_utf8_name() {
    init_logger();

    let name = resolve_name(ARROW_NAME.to_vec(), flagged(), None).expect("failed to resolve name");

    assert_eq!(name, ResolvedName::DeclaredUtf8(ARROW.to_owned()));
    assert_eq!(name.native(), None);
    assert_eq!(name.utf8(), Some(ARROW));
}

#[test]
fn declared_utf8_name_malformed() {
    init_logger();

    let result = resolve_name(b"ABC\xE2\x86.txt".to_vec(), flagged(), None);
    assert!(matches!(result, Err(ZipError::MalformedDeclaredUtf8(_))));

    // A trustworthy extra field doesn't rescue a name whose flag makes a false claim.
    let primary = b"\xFF.txt";
    let unicode_path = field(1, crc32fast::hash(primary), ARROW_NAME);
    let result = resolve_name(primary.to_vec(), flagged(), Some(&unicode_path));
    assert!(matches!(result, Err(ZipError::MalformedDeclaredUtf8(_))));
}

#[test]
fn extra_field_name_with_matching_checksum() {
    init_logger();

    let primary = b"ABC?.txt";
    let unicode_path = field(1, crc32fast::hash(primary), ARROW_NAME);
    let name = resolve_name(primary.to_vec(), GeneralPurposeFlag::default(), Some(&unicode_path))
        .expect("failed to resolve name");

    assert_eq!(name, ResolvedName::ExtraFieldUtf8(ARROW.to_owned()));
    assert_eq!(name.native(), None);
    assert_eq!(name.utf8(), Some(ARROW));
}

#[test]
fn extra_field_name_malformed() {
    init_logger();

    let primary = b"A.txt";
    let unicode_path = field(1, crc32fast::hash(primary), b"\xC3(");
    let result = resolve_name(primary.to_vec(), GeneralPurposeFlag::default(), Some(&unicode_path));

    assert!(matches!(result, Err(ZipError::MalformedExtraUtf8(_))));
}

#[test]
fn stale_extra_field_falls_back_to_native_bytes() {
    init_logger();

    let primary = b"caf\xE9.txt";
    let unicode_path = field(1, crc32fast::hash(b"something else"), "café.txt".as_bytes());
    let name = resolve_name(primary.to_vec(), GeneralPurposeFlag::default(), Some(&unicode_path))
        .expect("a stale extra field is not an error");

    assert_eq!(name, ResolvedName::Unspecified(primary.to_vec()));
}

#[test]
fn unsupported_extra_field_version_falls_back_to_native_bytes() {
    init_logger();

    let primary = b"A.txt";
    let unicode_path = field(2, crc32fast::hash(primary), b"B.txt");
    let name = resolve_name(primary.to_vec(), GeneralPurposeFlag::default(), Some(&unicode_path))
        .expect("an unsupported extra field is not an error");

    assert_eq!(name, ResolvedName::Unspecified(primary.to_vec()));
}

#[test]
fn unspecified_name() {
    let name = resolve_name(b"A.txt".to_vec(), GeneralPurposeFlag::default(), None).expect("failed to resolve name");

    assert_eq!(name.native(), Some(&b"A.txt"[..]));
    assert_eq!(name.utf8(), None);
    assert!(!name.is_utf8());
}

#[test]
fn extra_field_disagreeing_with_primary_name_wins() {
    init_logger();

    let primary = b"A.txt";
    let unicode_path = field(1, crc32fast::hash(primary), b"B.txt");
    let name = resolve_name(primary.to_vec(), GeneralPurposeFlag::default(), Some(&unicode_path))
        .expect("failed to resolve name");

    assert_eq!(name, ResolvedName::ExtraFieldUtf8("B.txt".to_owned()));
}

#[test]
fn declared_utf8_disagreeing_with_extra_field_wins() {
    init_logger();

    let primary = b"A.txt";
    let unicode_path = field(1, crc32fast::hash(primary), b"B.txt");
    let name = resolve_name(primary.to_vec(), flagged(), Some(&unicode_path)).expect("failed to resolve name");

    assert_eq!(name, ResolvedName::DeclaredUtf8("A.txt".to_owned()));
}

#[test]
fn resolve_from_record() {
    init_logger();

    let side = Side::new(b"ABC?.txt", 0, fixture::matching_unicode_path(b"ABC?.txt", ARROW_NAME));
    let bytes = fixture::local_header(&side, b"");
    let record = RawHeaderRecord::parse(&mut bytes.as_slice()).expect("failed to parse record");

    let name = resolve_record_name(&record).expect("failed to resolve name");
    assert_eq!(name.utf8(), Some(ARROW));

    let side = Side::new(ARROW_NAME, UTF8_FLAG, Vec::new());
    let bytes = fixture::central_header(&side, b"", 0);
    let record = RawHeaderRecord::parse(&mut bytes.as_slice()).expect("failed to parse record");

    assert_eq!(resolve_record_name(&record).expect("failed to resolve name"), ResolvedName::DeclaredUtf8(ARROW.into()));
}

#[test]
fn resolution_is_deterministic() {
    let primary = b"ABC?.txt";
    let unicode_path = field(1, crc32fast::hash(primary), ARROW_NAME);

    let first = resolve_name(primary.to_vec(), GeneralPurposeFlag::default(), Some(&unicode_path));
    let second = resolve_name(primary.to_vec(), GeneralPurposeFlag::default(), Some(&unicode_path));

    assert_eq!(first.ok(), second.ok());
}

#[test]
fn directory_names() {
    let name = resolve_name(b"dir/".to_vec(), flagged(), None).expect("failed to resolve name");
    assert!(name.is_dir());

    let name = resolve_name(b"dir/file".to_vec(), GeneralPurposeFlag::default(), None).expect("failed to resolve");
    assert!(!name.is_dir());
}
