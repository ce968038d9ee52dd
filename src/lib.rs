// Copyright (c) 2021-2023 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! An asynchronous ZIP archive reader which resolves each entry's name from exactly one header record.
//!
//! ## Features
//! - A runtime-agnostic design using futures-rs's `AsyncRead`/`AsyncSeek` traits, with [`tokio`] compatibility behind
//!   the `tokio` feature.
//! - Seeking readers which name entries from the central directory, and a streaming reader which names them from
//!   their local file headers.
//! - General purpose bit 11 and Info-ZIP Unicode Path extra field (0x7075) support, with no encoding guessed.
//! - Support for Stored, Deflate, Deflate64, bzip2, LZMA, zstd, and xz compression behind respective features.
//!
//! [Read more.](https://github.com/Majored/rs-async-zip)
//!
//! ## Feature Flags
//! - `full` - Enables all below features.
//! - `full-wasm` - Enables all below features that are compatible with WASM.
//! - `chrono` - Enables support for parsing dates via `chrono`.
//! - `tokio` - Enables support for the `tokio` implementation module.
//! - `deflate` - Enables support for the Deflate compression method.
//! - `bzip2` - Enables support for the bzip2 compression method.
//! - `lzma` - Enables support for the LZMA compression method.
//! - `zstd` - Enables support for the zstd compression method.
//! - `xz` - Enables support for the xz compression method.
//! - `deflate64` - Enables support for the Deflate64 compression method.
//!
//! ## Name resolution
//! See [`name`] for how a single name is chosen among the copies an archive may store, and [`base::read`] for which
//! header each reader consults.

pub mod archive;
pub mod base;
pub mod error;
pub mod name;
pub mod spec;

#[cfg(feature = "tokio")]
pub mod tokio;

pub(crate) mod date;
pub(crate) mod entry;
pub(crate) mod file;

pub use crate::archive::{ForwardOnly, ZipArchive};
pub use crate::base::read::{NamingStrategy, Seeking, Streaming};
pub use crate::date::ZipDateTime;
pub use crate::entry::{StoredZipEntry, ZipEntry};
pub use crate::file::ZipFile;
pub use crate::name::charset::{CharsetConverter, ConversionMode, EncodingConverter, Utf8Converter};
pub use crate::name::resolve::{resolve_name, resolve_record_name};
pub use crate::name::ResolvedName;
pub use crate::spec::compression::Compression;
pub use crate::spec::header::{GeneralPurposeFlag, HeaderKind, RawHeaderRecord};

#[cfg(test)]
pub(crate) mod tests;
