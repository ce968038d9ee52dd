// Copyright (c) 2021 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! The on-disk structures of a ZIP archive and their decoding.

pub mod compression;
pub(crate) mod consts;
pub mod extra_field;
pub mod header;
pub mod parse;

pub use compression::Compression;
