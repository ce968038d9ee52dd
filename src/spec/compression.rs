// Copyright (c) 2021 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! <https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#445>

use crate::error::{Result, ZipError};

/// A compression method this build can decode.
///
/// Only [`Compression::Stored`] is always available; the others depend on the respective crate feature.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Stored,
    #[cfg(feature = "deflate")]
    Deflate,
    #[cfg(feature = "deflate64")]
    Deflate64,
    #[cfg(feature = "bzip2")]
    Bz,
    #[cfg(feature = "lzma")]
    Lzma,
    #[cfg(feature = "zstd")]
    Zstd,
    #[cfg(feature = "xz")]
    Xz,
}

/// Returns the name of a registered compression method, whether or not this build can decode it.
pub fn method_name(method: u16) -> Option<&'static str> {
    let name = match method {
        0 => "stored",
        1 => "shrunk",
        2..=5 => "reduced",
        6 => "imploded",
        8 => "deflate",
        9 => "deflate64",
        10 => "pkware dcl imploded",
        12 => "bzip2",
        14 => "lzma",
        18 => "ibm terse",
        19 => "ibm lz77 z",
        93 => "zstd",
        94 => "mp3",
        95 => "xz",
        96 => "jpeg",
        97 => "wavpack",
        98 => "ppmd",
        99 => "aes",
        _ => return None,
    };

    Some(name)
}

impl TryFrom<u16> for Compression {
    type Error = ZipError;

    fn try_from(value: u16) -> Result<Self> {
        match value {
            0 => Ok(Compression::Stored),
            #[cfg(feature = "deflate")]
            8 => Ok(Compression::Deflate),
            #[cfg(feature = "deflate64")]
            9 => Ok(Compression::Deflate64),
            #[cfg(feature = "bzip2")]
            12 => Ok(Compression::Bz),
            #[cfg(feature = "lzma")]
            14 => Ok(Compression::Lzma),
            #[cfg(feature = "zstd")]
            93 => Ok(Compression::Zstd),
            #[cfg(feature = "xz")]
            95 => Ok(Compression::Xz),
            _ => {
                match method_name(value) {
                    Some(name) => tracing::debug!(method = value, name, "compression method isn't enabled"),
                    None => tracing::debug!(method = value, "unregistered compression method"),
                }
                Err(ZipError::CompressionNotSupported(value))
            }
        }
    }
}
