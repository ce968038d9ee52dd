// Copyright (c) 2022 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! Readers over the bytes between header records.
//!
//! Lengths here come straight from header records, so nothing is allocated or drained up front on their say-so.
//! Reads are bounded with [`AsyncReadExt::take`] and buffers only grow with the bytes the source actually yields.

pub(crate) mod compressed;
pub(crate) mod entry;
pub(crate) mod hashed;
pub(crate) mod locator;

use crate::error::Result;

use std::io::{Error, ErrorKind};

use futures_lite::io::{AsyncRead, AsyncReadExt};

/// Reads exactly `length` bytes.
///
/// # Errors
/// An [`ErrorKind::UnexpectedEof`] if the reader ends first.
pub(crate) async fn read_bytes<R>(reader: R, length: u64) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = Vec::new();
    reader.take(length).read_to_end(&mut buffer).await?;

    if (buffer.len() as u64) < length {
        return Err(Error::from(ErrorKind::UnexpectedEof));
    }

    Ok(buffer)
}

/// Discards exactly `length` bytes, so that a single-pass reader lands on the next header record.
///
/// # Errors
/// An [`ErrorKind::UnexpectedEof`] upstream error if the reader ends first.
pub(crate) async fn skip_bytes<R>(reader: R, length: u64) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let skipped = futures_lite::io::copy(reader.take(length), futures_lite::io::sink()).await?;

    if skipped < length {
        return Err(Error::from(ErrorKind::UnexpectedEof).into());
    }

    tracing::trace!(skipped, "skipped entry data");
    Ok(())
}
