// Copyright (c) 2022 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! <https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#4316>
//!
//! The end of central directory record may be followed by a variable-length comment, so its position can't be
//! derived from the length of the data alone. We search for its signature in reverse from the end of the data, one
//! buffer at a time, as comments are rarely large and a match near the end is the likely one.
//!
//! Seeking invalidates any [`BufReader`] placed in front of the upstream reader, so we fill our own fixed-size
//! buffer per seek rather than reading individual u32s.

#[cfg(doc)]
use futures_lite::io::BufReader;

use crate::error::{Result as ZipResult, ZipError};
use crate::spec::consts::{EOCDR_LENGTH, EOCDR_SIGNATURE, SIGNATURE_LENGTH};

use futures_lite::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt, SeekFrom};

/// The buffer size used when locating the EOCDR, equal to 2KiB.
const BUFFER_SIZE: usize = 2048;

/// The number of trailing bytes in which the EOCDR signature cannot end.
const EOCDR_UPPER_BOUND: u64 = EOCDR_LENGTH as u64;

/// The furthest distance from the end of the data at which the EOCDR signature can start.
const EOCDR_LOWER_BOUND: u64 = EOCDR_UPPER_BOUND + SIGNATURE_LENGTH as u64 + u16::MAX as u64;

/// Locates the end of central directory record, returning the offset just past its signature.
///
/// Windows are read in reverse and overlap by the signature length, so a signature spanning two windows is still
/// found. The search stops at the furthest position a maximum-length comment allows.
#[tracing::instrument(skip(reader))]
pub async fn eocdr<R>(mut reader: R) -> ZipResult<u64>
where
    R: AsyncRead + AsyncSeek + Unpin,
{
    let length = reader.seek(SeekFrom::End(0)).await?;
    let signature = &EOCDR_SIGNATURE.to_le_bytes();
    let lower_bound = length.saturating_sub(EOCDR_LOWER_BOUND);
    let mut buffer = [0; BUFFER_SIZE];

    let mut end = length.saturating_sub(EOCDR_UPPER_BOUND);

    loop {
        let position = end.saturating_sub(BUFFER_SIZE as u64).max(lower_bound);
        let window = &mut buffer[..(end - position) as usize];

        reader.seek(SeekFrom::Start(position)).await?;
        reader.read_exact(window).await?;

        if let Some(match_index) = reverse_search_buffer(window, signature) {
            let offset = position + (match_index + 1) as u64;
            tracing::trace!(offset, "located end of central directory record");
            return Ok(offset);
        }

        if position == lower_bound {
            return Err(ZipError::UnableToLocateEOCDR);
        }

        end = position + SIGNATURE_LENGTH as u64;
    }
}

/// A reverse linear search along the buffer for the specified signature bytes.
///
/// Returns the index of the last byte of the match closest to the end of the buffer.
pub(crate) fn reverse_search_buffer(buffer: &[u8], signature: &[u8]) -> Option<usize> {
    if signature.is_empty() {
        return None;
    }

    buffer.windows(signature.len()).rposition(|window| window == signature).map(|start| start + signature.len() - 1)
}
