// Copyright (c) 2023 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::error::ZipError;
use crate::spec::compression::{method_name, Compression};

#[test]
fn stored_is_always_supported() {
    assert_eq!(Compression::try_from(0).expect("stored isn't supported"), Compression::Stored);
}

#[test]
fn registered_methods_are_named_whether_or_not_enabled() {
    assert_eq!(method_name(8), Some("deflate"));
    assert_eq!(method_name(99), Some("aes"));
    assert_eq!(method_name(7), None);

    assert!(matches!(Compression::try_from(99), Err(ZipError::CompressionNotSupported(99))));
    assert!(matches!(Compression::try_from(7), Err(ZipError::CompressionNotSupported(7))));
}
