// Copyright (c) 2023 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! The interface to charset conversion for names stored in an unspecified encoding.
//!
//! This crate doesn't guess encodings. A caller that wants a UTF-8 view of a [`ResolvedName::Unspecified`] name
//! supplies a [`CharsetConverter`] for the encoding it expects the archive to use, along with how strict the
//! conversion should be. No conversion state is global.
//!
//! [`ResolvedName::Unspecified`]: crate::ResolvedName::Unspecified

use crate::error::{Result, ZipError};

use std::borrow::Cow;

use encoding_rs::Encoding;

/// How a converter should treat bytes that have no mapping in its source encoding.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ConversionMode {
    /// Fail with [`ZipError::StringNotUtf8`].
    #[default]
    Strict,
    /// Substitute U+FFFD REPLACEMENT CHARACTER.
    BestEffort,
}

/// Converts bytes of some source encoding into UTF-8.
pub trait CharsetConverter {
    fn to_utf8<'a>(&self, raw: &'a [u8], mode: ConversionMode) -> Result<Cow<'a, str>>;
}

/// Treats native bytes as UTF-8.
#[derive(Debug, Default, Clone, Copy)]
pub struct Utf8Converter;

impl CharsetConverter for Utf8Converter {
    fn to_utf8<'a>(&self, raw: &'a [u8], mode: ConversionMode) -> Result<Cow<'a, str>> {
        match mode {
            ConversionMode::Strict => std::str::from_utf8(raw).map(Cow::Borrowed).map_err(|_| ZipError::StringNotUtf8),
            ConversionMode::BestEffort => Ok(String::from_utf8_lossy(raw)),
        }
    }
}

/// Decodes native bytes with an [`encoding_rs`] encoding, eg. [`encoding_rs::SHIFT_JIS`] for archives written on a
/// Japanese Windows system.
///
/// Byte order marks are left as they are, since a name's bytes never carry one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingConverter(&'static Encoding);

impl EncodingConverter {
    pub fn new(encoding: &'static Encoding) -> Self {
        Self(encoding)
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.0
    }
}

impl From<&'static Encoding> for EncodingConverter {
    fn from(encoding: &'static Encoding) -> Self {
        Self(encoding)
    }
}

impl CharsetConverter for EncodingConverter {
    fn to_utf8<'a>(&self, raw: &'a [u8], mode: ConversionMode) -> Result<Cow<'a, str>> {
        match mode {
            ConversionMode::Strict => {
                self.0.decode_without_bom_handling_and_without_replacement(raw).ok_or(ZipError::StringNotUtf8)
            }
            ConversionMode::BestEffort => {
                let (decoded, had_errors) = self.0.decode_without_bom_handling(raw);
                if had_errors {
                    tracing::debug!(encoding = self.0.name(), "replaced unmappable bytes while converting a name");
                }
                Ok(decoded)
            }
        }
    }
}
