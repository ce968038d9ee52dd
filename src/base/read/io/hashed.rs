// Copyright (c) 2022 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::error::{Result, ZipError};

use std::pin::Pin;
use std::task::{ready, Context, Poll};

use crc32fast::Hasher;
use futures_lite::io::AsyncRead;
use pin_project::pin_project;

/// A wrapping reader which tracks the CRC32 and length of the decompressed bytes passing through it.
#[pin_project]
pub(crate) struct HashedReader<R> {
    #[pin]
    reader: R,
    hasher: Hasher,
    length: u64,
}

impl<R> HashedReader<R>
where
    R: AsyncRead + Unpin,
{
    pub(crate) fn new(reader: R) -> Self {
        Self { reader, hasher: Hasher::new(), length: 0 }
    }

    /// Returns the CRC32 of everything read so far.
    pub(crate) fn crc32(&self) -> u32 {
        self.hasher.clone().finalize()
    }

    /// Compares everything read so far against the CRC32 an entry's header record declares.
    ///
    /// Only meaningful once EOF has been reached.
    pub(crate) fn verify(&self, expected: u32) -> Result<()> {
        let actual = self.crc32();

        if actual != expected {
            tracing::debug!(expected, actual, length = self.length, "entry data failed CRC32 verification");
            return Err(ZipError::CRC32CheckError);
        }

        tracing::trace!(crc32 = actual, length = self.length, "verified entry data");
        Ok(())
    }

    pub(crate) fn get_ref(&self) -> &R {
        &self.reader
    }

    pub(crate) fn into_inner(self) -> R {
        self.reader
    }
}

impl<R> AsyncRead for HashedReader<R>
where
    R: AsyncRead + Unpin,
{
    fn poll_read(self: Pin<&mut Self>, c: &mut Context<'_>, b: &mut [u8]) -> Poll<std::io::Result<usize>> {
        let project = self.project();
        let read = ready!(project.reader.poll_read(c, b))?;

        project.hasher.update(&b[..read]);
        *project.length += read as u64;

        Poll::Ready(Ok(read))
    }
}
