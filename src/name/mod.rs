// Copyright (c) 2023 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! Entry names, and how a single name is chosen among the copies an archive may store.
//!
//! A ZIP entry's name can be recorded up to four times: the local file header holds a filename (flagged as UTF-8 via
//! general purpose bit 11, or in an unspecified encoding) and optionally an Info-ZIP Unicode path extra field, and
//! the central directory holds its own copy of both. These copies may disagree, both in encoding and in content.
//!
//! Which header is consulted is decided by the reading strategy (see [`crate::base::read::NamingStrategy`]). Within
//! one header, [`resolve::resolve_name`] applies a fixed authority order and produces a [`ResolvedName`].

pub mod charset;
pub mod resolve;

use crate::error::Result;
use charset::{CharsetConverter, ConversionMode};

use std::borrow::Cow;

/// The name of an entry as resolved from one header record.
///
/// Each variant records where the name came from. A name is either available as UTF-8 text, or as native bytes of
/// an unspecified encoding, never both: when an authoritative UTF-8 source exists, the native bytes it supersedes are
/// not kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolvedName {
    /// The header's own bytes, flagged as UTF-8 by general purpose bit 11.
    DeclaredUtf8(String),
    /// The payload of an Info-ZIP Unicode extra field whose checksum matched the header's own bytes.
    ExtraFieldUtf8(String),
    /// The header's own bytes in an encoding the archive doesn't declare.
    Unspecified(Vec<u8>),
}

impl ResolvedName {
    /// Returns the native bytes of this name, if no UTF-8 form was recorded.
    ///
    /// `None` signals that no separate native encoding exists for this name, not an error.
    pub fn native(&self) -> Option<&[u8]> {
        match self {
            ResolvedName::Unspecified(raw) => Some(raw),
            _ => None,
        }
    }

    /// Returns the UTF-8 form of this name, if the archive recorded one authoritatively.
    pub fn utf8(&self) -> Option<&str> {
        match self {
            ResolvedName::DeclaredUtf8(name) | ResolvedName::ExtraFieldUtf8(name) => Some(name),
            ResolvedName::Unspecified(_) => None,
        }
    }

    /// Returns the bytes of whichever form this name holds.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ResolvedName::DeclaredUtf8(name) | ResolvedName::ExtraFieldUtf8(name) => name.as_bytes(),
            ResolvedName::Unspecified(raw) => raw,
        }
    }

    /// Returns whether this name is held as UTF-8 text.
    pub fn is_utf8(&self) -> bool {
        !matches!(self, ResolvedName::Unspecified(_))
    }

    /// Returns whether this name denotes a directory (ie. ends with a forward slash).
    pub fn is_dir(&self) -> bool {
        self.as_bytes().ends_with(b"/")
    }

    /// Returns this name as UTF-8, converting native bytes with the provided converter.
    ///
    /// Names which already hold UTF-8 text are borrowed as-is and the converter isn't consulted.
    pub fn to_utf8_with<'a, C>(&'a self, converter: &C, mode: ConversionMode) -> Result<Cow<'a, str>>
    where
        C: CharsetConverter + ?Sized,
    {
        match self {
            ResolvedName::DeclaredUtf8(name) | ResolvedName::ExtraFieldUtf8(name) => Ok(Cow::Borrowed(name)),
            ResolvedName::Unspecified(raw) => converter.to_utf8(raw, mode),
        }
    }
}
