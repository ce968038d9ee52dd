// Copyright (c) 2023 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! Resolution of a single header record's name.
//!
//! The authority order, evaluated per header record:
//! 1. General purpose bit 11 set: the header's own bytes are UTF-8. Bytes that fail to decode are an error rather
//!    than something to guess at.
//! 2. An Info-ZIP Unicode extra field whose checksum matches the header's own bytes: its payload is the name, and it
//!    must be valid UTF-8. A field with a mismatching checksum is stale and skipped.
//! 3. Otherwise the header's own bytes, in an unspecified encoding.
//!
//! Bit 11 is a format-level assertion and is trusted without a checksum to corroborate it. When both bit 11 and a
//! valid extra field are present but disagree, bit 11 wins.

use crate::error::{Result, ZipError};
use crate::name::ResolvedName;
use crate::spec::consts::INFO_ZIP_UNICODE_VERSION;
use crate::spec::extra_field::find_unicode_path;
use crate::spec::header::{GeneralPurposeFlag, InfoZipUnicodeExtraField, RawHeaderRecord};

/// Resolves an entry name from a header's filename bytes, its general purpose flag, and its Unicode path extra field.
///
/// # Errors
/// - [`ZipError::MalformedDeclaredUtf8`] if bit 11 is set and `filename` isn't valid UTF-8.
/// - [`ZipError::MalformedExtraUtf8`] if the extra field is trusted but its payload isn't valid UTF-8.
pub fn resolve_name(
    filename: Vec<u8>,
    flags: GeneralPurposeFlag,
    unicode_path: Option<&InfoZipUnicodeExtraField>,
) -> Result<ResolvedName> {
    if flags.filename_unicode {
        if let Some(field) = unicode_path {
            if field.unicode != filename {
                tracing::debug!("unicode extra field disagrees with a name flagged as UTF-8, keeping the flagged name");
            }
        }

        return match String::from_utf8(filename) {
            Ok(name) => Ok(ResolvedName::DeclaredUtf8(name)),
            Err(err) => Err(ZipError::MalformedDeclaredUtf8(err.utf8_error())),
        };
    }

    if let Some(field) = unicode_path.filter(|field| is_current(field, &filename)) {
        return match std::str::from_utf8(&field.unicode) {
            Ok(name) => Ok(ResolvedName::ExtraFieldUtf8(name.to_owned())),
            Err(err) => Err(ZipError::MalformedExtraUtf8(err)),
        };
    }

    Ok(ResolvedName::Unspecified(filename))
}

/// Resolves the name held by a single header record.
///
/// The record's extra field region is scanned for a Unicode path field with [`find_unicode_path`].
pub fn resolve_record_name(record: &RawHeaderRecord) -> Result<ResolvedName> {
    let unicode_path = find_unicode_path(&record.extra_field)?;
    resolve_name(record.filename.clone(), record.flags(), unicode_path.as_ref())
}

/// Resolves a central directory comment using the same authority order, with the Unicode comment extra field.
///
/// Bit 11 covers the comment as well as the filename. A comment never fails its entry: bytes which don't decode as
/// the source claims are kept as [`ResolvedName::Unspecified`].
pub(crate) fn resolve_comment(
    comment: Vec<u8>,
    flags: GeneralPurposeFlag,
    unicode_comment: Option<&InfoZipUnicodeExtraField>,
) -> ResolvedName {
    if flags.filename_unicode {
        return match String::from_utf8(comment) {
            Ok(comment) => ResolvedName::DeclaredUtf8(comment),
            Err(err) => {
                tracing::debug!(err = %err.utf8_error(), "comment flagged as UTF-8 is not, keeping its bytes");
                ResolvedName::Unspecified(err.into_bytes())
            }
        };
    }

    if let Some(field) = unicode_comment.filter(|field| is_current(field, &comment)) {
        match std::str::from_utf8(&field.unicode) {
            Ok(unicode) => return ResolvedName::ExtraFieldUtf8(unicode.to_owned()),
            Err(err) => tracing::debug!(%err, "unicode comment extra field is not UTF-8, keeping the header's bytes"),
        }
    }

    ResolvedName::Unspecified(comment)
}

/// Returns whether a Unicode extra field still describes the primary bytes it was attached to.
fn is_current(field: &InfoZipUnicodeExtraField, primary: &[u8]) -> bool {
    if field.version != INFO_ZIP_UNICODE_VERSION {
        tracing::debug!(version = field.version, "ignoring unicode extra field of an unsupported version");
        return false;
    }

    let expected = crc32fast::hash(primary);
    if field.crc32 != expected {
        tracing::debug!(stored = field.crc32, expected, "ignoring stale unicode extra field");
        return false;
    }

    true
}
