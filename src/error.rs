// Copyright (c) 2021 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! A module which holds relevant error reporting structures/types.

use std::str::Utf8Error;

use thiserror::Error;

/// A Result type alias over ZipError to minimise repetition.
pub type Result<V> = std::result::Result<V, ZipError>;

/// An enum of possible errors and their descriptions.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ZipError {
    #[error("fewer bytes remain than the fixed header layout requires")]
    TruncatedHeader,
    #[error("invalid header signature: {0:#x}")]
    InvalidSignature(u32),
    #[error("declared {0} length exceeds the remaining bytes")]
    TruncatedField(&'static str),
    #[error("extra field {0:#06x} declares more bytes than remain")]
    TruncatedExtraField(u16),
    #[error("name is flagged as UTF-8 but is not valid UTF-8: {0}")]
    MalformedDeclaredUtf8(#[source] Utf8Error),
    #[error("unicode extra field does not hold valid UTF-8: {0}")]
    MalformedExtraUtf8(#[source] Utf8Error),

    #[error("feature not supported: '{0}'")]
    FeatureNotSupported(&'static str),
    #[error("compression not supported: {0}")]
    CompressionNotSupported(u16),
    #[error("zip64 extended information field was incomplete")]
    Zip64ExtendedFieldIncomplete,

    #[error("unable to locate the end of central directory record")]
    UnableToLocateEOCDR,

    #[error("an upstream reader returned an error: {0}")]
    UpstreamReadError(#[from] std::io::Error),
    #[error("a computed CRC32 value did not match the expected value")]
    CRC32CheckError,
    #[error("entry index was out of bounds")]
    EntryIndexOutOfBounds,
    #[error("no entry is currently open for reading")]
    NoCurrentEntry,
    #[error("attempted to convert the reader back to its ready state before reaching the entry's EOF")]
    EOFNotReached,
    #[error("a string could not be converted to UTF-8")]
    StringNotUtf8,
    #[error("Encountered an unexpected header (actual: {0:#x}, expected: {1:#x}).")]
    UnexpectedHeaderError(u32, u32),
}

impl ZipError {
    /// Returns whether this error is fatal to the entry being read rather than to the archive as a whole.
    ///
    /// Whether reading can carry on after such an error depends on the reader: [`crate::ZipArchive`] continues past
    /// entries whose header was fully consumed (eg. a name which failed to resolve), but a truncated header leaves a
    /// single-pass reader with no known position to resume from.
    pub fn is_entry_error(&self) -> bool {
        matches!(
            self,
            ZipError::TruncatedHeader
                | ZipError::InvalidSignature(_)
                | ZipError::TruncatedField(_)
                | ZipError::TruncatedExtraField(_)
                | ZipError::MalformedDeclaredUtf8(_)
                | ZipError::MalformedExtraUtf8(_)
                | ZipError::Zip64ExtendedFieldIncomplete
                | ZipError::CompressionNotSupported(_)
                | ZipError::CRC32CheckError
        )
    }
}
