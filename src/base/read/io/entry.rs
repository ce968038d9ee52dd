// Copyright (c) 2022 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::base::read::io::{compressed::CompressedReader, hashed::HashedReader, skip_bytes};
use crate::entry::ZipEntry;
use crate::error::Result;
use crate::spec::Compression;

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_lite::io::{AsyncRead, AsyncReadExt};
use pin_project::pin_project;

enum OwnedEntry<'a> {
    Owned(ZipEntry),
    Borrow(&'a ZipEntry),
}

impl<'a> OwnedEntry<'a> {
    fn entry(&self) -> &ZipEntry {
        match self {
            OwnedEntry::Owned(entry) => entry,
            OwnedEntry::Borrow(entry) => entry,
        }
    }
}

/// A type which encodes that [`ZipEntryReader`] has associated entry data.
pub struct WithEntry<'a>(OwnedEntry<'a>);

/// A type which encodes that [`ZipEntryReader`] has no associated entry data.
pub struct WithoutEntry;

/// A ZIP entry reader which may implement decompression.
///
/// Reads are bounded by the entry's compressed size, so the upstream reader is never read past the entry's data.
#[pin_project]
pub struct ZipEntryReader<'a, R, E> {
    #[pin]
    reader: HashedReader<CompressedReader<R>>,
    entry: E,
    _marker: std::marker::PhantomData<&'a ()>,
}

impl<'a, R> ZipEntryReader<'a, R, WithoutEntry>
where
    R: AsyncRead + Unpin,
{
    /// Constructs a new entry reader over the `size` compressed bytes which follow the reader's current position.
    pub(crate) fn new(reader: R, compression: Compression, size: u64) -> Self {
        let reader = HashedReader::new(CompressedReader::new(reader, compression, size));
        Self { reader, entry: WithoutEntry, _marker: std::marker::PhantomData }
    }

    pub(crate) fn into_with_entry(self, entry: &'a ZipEntry) -> ZipEntryReader<'a, R, WithEntry<'a>> {
        ZipEntryReader { reader: self.reader, entry: WithEntry(OwnedEntry::Borrow(entry)), _marker: self._marker }
    }

    pub(crate) fn into_with_entry_owned(self, entry: ZipEntry) -> ZipEntryReader<'a, R, WithEntry<'a>> {
        ZipEntryReader { reader: self.reader, entry: WithEntry(OwnedEntry::Owned(entry)), _marker: self._marker }
    }

    /// Reads all bytes until EOF has been reached, appending them to buf, and verifies the CRC32 values.
    ///
    /// This is a helper function synonymous to [`AsyncReadExt::read_to_end()`].
    pub async fn read_to_end_checked(&mut self, buf: &mut Vec<u8>, entry: &ZipEntry) -> Result<usize> {
        let read = self.read_to_end(buf).await?;
        self.reader.verify(entry.crc32())?;
        Ok(read)
    }

    /// Reads all bytes until EOF has been reached, placing them into buf, and verifies the CRC32 values.
    ///
    /// This is a helper function synonymous to [`AsyncReadExt::read_to_string()`].
    pub async fn read_to_string_checked(&mut self, buf: &mut String, entry: &ZipEntry) -> Result<usize> {
        let read = self.read_to_string(buf).await?;
        self.reader.verify(entry.crc32())?;
        Ok(read)
    }
}

impl<'a, R> ZipEntryReader<'a, R, WithEntry<'a>>
where
    R: AsyncRead + Unpin,
{
    /// Returns the entry this reader was opened for.
    pub fn entry(&self) -> &ZipEntry {
        self.entry.0.entry()
    }

    /// Reads all bytes until EOF has been reached, appending them to buf, and verifies the CRC32 values.
    pub async fn read_to_end_checked(&mut self, buf: &mut Vec<u8>) -> Result<usize> {
        let read = self.read_to_end(buf).await?;
        self.reader.verify(self.entry().crc32())?;
        Ok(read)
    }

    /// Reads all bytes until EOF has been reached, placing them into buf, and verifies the CRC32 values.
    pub async fn read_to_string_checked(&mut self, buf: &mut String) -> Result<usize> {
        let read = self.read_to_string(buf).await?;
        self.reader.verify(self.entry().crc32())?;
        Ok(read)
    }
}

impl<'a, R, E> ZipEntryReader<'a, R, E>
where
    R: AsyncRead + Unpin,
{
    /// Computes and returns the CRC32 hash of bytes read by this reader so far.
    ///
    /// This hash should only be computed once EOF has been reached.
    pub fn compute_hash(&self) -> u32 {
        self.reader.crc32()
    }

    /// Returns how many of the entry's compressed bytes remain unread in the upstream reader.
    pub(crate) fn unread_compressed(&self) -> u64 {
        self.reader.get_ref().unread_compressed()
    }

    /// Consumes this reader and returns the upstream reader, positioned wherever reading stopped.
    pub(crate) fn into_inner(self) -> R {
        self.reader.into_inner().into_inner()
    }

    /// Consumes this reader and returns the upstream reader, positioned just past the entry's compressed bytes.
    ///
    /// Compressed bytes a decoder stopped short of are discarded in bounded chunks.
    pub(crate) async fn finish(self) -> Result<R> {
        let unread = self.unread_compressed();
        let mut reader = self.into_inner();

        if unread > 0 {
            skip_bytes(&mut reader, unread).await?;
        }

        Ok(reader)
    }
}

impl<'a, R, E> AsyncRead for ZipEntryReader<'a, R, E>
where
    R: AsyncRead + Unpin,
{
    fn poll_read(self: Pin<&mut Self>, c: &mut Context<'_>, b: &mut [u8]) -> Poll<std::io::Result<usize>> {
        self.project().reader.poll_read(c, b)
    }
}
