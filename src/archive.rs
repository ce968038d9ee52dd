// Copyright (c) 2023 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! A single-pass archive session which picks its reading strategy from the source it's given.
//!
//! [`ZipArchive::open()`] tries a zero-distance seek to learn whether the source can seek. A seekable source is read
//! with the [`Seeking`] strategy (entries named from the central directory), anything else with the [`Streaming`]
//! strategy (entries named from their local file header). Wrap a seekable source in [`ForwardOnly`] to force
//! streaming.
//!
//! ### Example
//! ```no_run
//! # use async_zip_reader::archive::ZipArchive;
//! # use async_zip_reader::error::Result;
//! # use futures_lite::io::Cursor;
//! #
//! async fn run(bytes: Vec<u8>) -> Result<()> {
//!     let mut archive = ZipArchive::open(Cursor::new(bytes)).await?;
//!
//!     while let Some(entry) = archive.next_entry().await? {
//!         println!("{:?}", entry.pathname_utf8());
//!
//!         let mut data = Vec::new();
//!         archive.read_data(&mut data).await?;
//!     }
//!
//!     archive.close();
//!     Ok(())
//! }
//! ```
//!
//! An error from [`ZipArchive::next_entry()`] for which [`ZipError::is_entry_error()`] holds only concerns that
//! entry; calling [`ZipArchive::next_entry()`] again moves on to the next one where the source allows it.

use crate::base::read::io::entry::ZipEntryReader;
use crate::base::read::io::skip_bytes;
use crate::base::read::{NamingStrategy, Seeking, Streaming};
use crate::entry::{StoredZipEntry, ZipEntry};
use crate::error::{Result, ZipError};
use crate::file::ZipFile;
use crate::spec::consts::NON_ZIP64_MAX_SIZE;
use crate::spec::extra_field::{parse_extra_fields, zip64_extended_information, Zip64Overflow};
use crate::spec::header::{HeaderKind, RawHeaderRecord};

use std::io::{Error, ErrorKind};
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_lite::io::{AsyncBufRead, AsyncRead, AsyncSeek, AsyncSeekExt, SeekFrom};
use pin_project::pin_project;

#[cfg(feature = "tokio")]
use tokio_util::compat::{Compat, TokioAsyncReadCompatExt};

/// The `errno` a seek on a pipe, socket or FIFO fails with on Unix-like platforms.
const ESPIPE: i32 = 29;

/// A wrapping reader which refuses to seek, so that [`ZipArchive`] reads its source with the [`Streaming`] strategy.
#[pin_project]
#[derive(Debug)]
pub struct ForwardOnly<R>(#[pin] R);

impl<R> ForwardOnly<R> {
    pub fn new(reader: R) -> Self {
        Self(reader)
    }

    pub fn get_ref(&self) -> &R {
        &self.0
    }

    pub fn into_inner(self) -> R {
        self.0
    }
}

impl<R> AsyncRead for ForwardOnly<R>
where
    R: AsyncRead,
{
    fn poll_read(self: Pin<&mut Self>, c: &mut Context<'_>, b: &mut [u8]) -> Poll<std::io::Result<usize>> {
        self.project().0.poll_read(c, b)
    }
}

impl<R> AsyncBufRead for ForwardOnly<R>
where
    R: AsyncBufRead,
{
    fn poll_fill_buf(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<&[u8]>> {
        self.project().0.poll_fill_buf(cx)
    }

    fn consume(self: Pin<&mut Self>, amt: usize) {
        self.project().0.consume(amt)
    }
}

impl<R> AsyncSeek for ForwardOnly<R> {
    fn poll_seek(self: Pin<&mut Self>, _: &mut Context<'_>, _: SeekFrom) -> Poll<std::io::Result<u64>> {
        Poll::Ready(Err(Error::new(ErrorKind::Unsupported, "source is forward-only")))
    }
}

/// What a streaming session must do with the data following the last local file header it read.
#[derive(Debug)]
enum Pending {
    /// Nothing remains between the stream's position and the next header.
    Nothing,
    /// This many bytes of entry data remain before the next header.
    Data(u64),
    /// The data's extent can't be known up front, so the stream can't be advanced past it.
    Unreadable(&'static str),
}

enum State {
    Seeking { file: ZipFile, next: usize, current: Option<StoredZipEntry> },
    Streaming { pending: Pending, current: Option<ZipEntry>, finished: bool },
}

/// A ZIP archive session over a single source.
///
/// Entries are surfaced one at a time and borrow from the session, so none outlive it.
pub struct ZipArchive<R> {
    reader: R,
    state: State,
}

impl<R> ZipArchive<R>
where
    R: AsyncRead + AsyncSeek + Unpin,
{
    /// Opens an archive session, choosing the reading strategy from whether `reader` can seek.
    ///
    /// A seekable source has its central directory read up front, so this fails if it can't be located.
    #[tracing::instrument(skip(reader))]
    pub async fn open(mut reader: R) -> Result<ZipArchive<R>> {
        let state = match reader.seek(SeekFrom::Current(0)).await {
            Ok(_) => {
                tracing::debug!(authority = ?Seeking::AUTHORITY, "source is seekable");
                let file = crate::base::read::file(&mut reader).await?;
                State::Seeking { file, next: 0, current: None }
            }
            Err(err) if is_unseekable(&err) => {
                tracing::debug!(authority = ?Streaming::AUTHORITY, "source can't seek");
                State::Streaming { pending: Pending::Nothing, current: None, finished: false }
            }
            Err(err) => return Err(err.into()),
        };

        Ok(ZipArchive { reader, state })
    }

    /// Returns which header record kind this session names entries from.
    pub fn authority(&self) -> HeaderKind {
        match self.state {
            State::Seeking { .. } => Seeking::AUTHORITY,
            State::Streaming { .. } => Streaming::AUTHORITY,
        }
    }

    /// Returns the archive's central directory, which is only known to seeking sessions.
    pub fn file(&self) -> Option<&ZipFile> {
        match &self.state {
            State::Seeking { file, .. } => Some(file),
            State::Streaming { .. } => None,
        }
    }

    /// Advances to the next entry, returning `None` at the end of the archive.
    ///
    /// Any unread data of the previous entry is skipped.
    pub async fn next_entry(&mut self) -> Result<Option<&ZipEntry>> {
        let ZipArchive { reader, state } = self;

        match state {
            State::Seeking { file, next, current } => {
                *current = None;

                if *next >= file.len() {
                    return Ok(None);
                }

                let index = *next;
                *next += 1;

                *current = Some(file.entry(index)?);
                Ok(current.as_deref())
            }
            State::Streaming { pending, current, finished } => {
                *current = None;

                if *finished {
                    return Ok(None);
                }

                match *pending {
                    Pending::Nothing => (),
                    Pending::Data(length) => {
                        *pending = Pending::Nothing;
                        skip_bytes(&mut *reader, length).await?;
                    }
                    Pending::Unreadable(feature) => return Err(ZipError::FeatureNotSupported(feature)),
                }

                let record = match crate::base::read::lfh(&mut *reader).await? {
                    Some(record) => record,
                    None => {
                        *finished = true;
                        return Ok(None);
                    }
                };

                *pending = pending_data(&record);
                *current = Some(Streaming::describe(record)?);
                Ok(current.as_ref())
            }
        }
    }

    /// Reads the current entry's data to its end, appending it to `buf`, and verifies its CRC32 value.
    ///
    /// # Errors
    /// [`ZipError::NoCurrentEntry`] if [`ZipArchive::next_entry()`] hasn't surfaced an entry, or it did so without
    /// its data being readable from a non-seekable source (eg. it was already read, or its header was written with a
    /// data descriptor).
    pub async fn read_data(&mut self, buf: &mut Vec<u8>) -> Result<usize> {
        let ZipArchive { reader, state } = self;

        match state {
            State::Seeking { current, .. } => {
                let stored_entry = current.as_ref().ok_or(ZipError::NoCurrentEntry)?;
                let compression = stored_entry.data_compression()?;

                stored_entry.seek_to_data_offset(reader).await?;

                let entry_reader = ZipEntryReader::new(&mut *reader, compression, stored_entry.compressed_size());
                entry_reader.into_with_entry(stored_entry.entry()).read_to_end_checked(buf).await
            }
            State::Streaming { pending, current, .. } => {
                let entry = current.as_ref().ok_or(ZipError::NoCurrentEntry)?;
                let compression = entry.data_compression()?;

                let length = match *pending {
                    Pending::Data(length) => length,
                    Pending::Nothing => return Err(ZipError::NoCurrentEntry),
                    Pending::Unreadable(feature) => return Err(ZipError::FeatureNotSupported(feature)),
                };

                // The stream is left at the next header record whether or not the data decodes.
                *pending = Pending::Nothing;

                let (result, unread) = {
                    let entry_reader = ZipEntryReader::new(&mut *reader, compression, length);
                    let mut entry_reader = entry_reader.into_with_entry(entry);
                    let result = entry_reader.read_to_end_checked(buf).await;
                    (result, entry_reader.unread_compressed())
                };

                if unread > 0 {
                    skip_bytes(&mut *reader, unread).await?;
                }

                result
            }
        }
    }

    /// Ends the session, returning the source.
    pub fn close(self) -> R {
        self.reader
    }
}

#[cfg(feature = "tokio")]
impl<R> ZipArchive<Compat<R>>
where
    R: tokio::io::AsyncRead + tokio::io::AsyncSeek + Unpin,
{
    /// Opens a session over a seekable tokio source.
    pub async fn with_tokio(reader: R) -> Result<crate::tokio::ZipArchive<R>> {
        ZipArchive::open(reader.compat()).await
    }
}

#[cfg(feature = "tokio")]
impl<R> ZipArchive<ForwardOnly<Compat<R>>>
where
    R: tokio::io::AsyncRead + Unpin,
{
    /// Opens a streaming session over a tokio source which can't seek.
    pub async fn with_tokio_stream(reader: R) -> Result<crate::tokio::StreamingZipArchive<R>> {
        ZipArchive::open(ForwardOnly::new(reader.compat())).await
    }
}

fn is_unseekable(err: &Error) -> bool {
    err.kind() == ErrorKind::Unsupported || err.raw_os_error() == Some(ESPIPE)
}

/// Works out how much entry data follows a local file header, before its name is resolved.
fn pending_data(record: &RawHeaderRecord) -> Pending {
    if record.flags().data_descriptor {
        return Pending::Unreadable("stream reading entries with data descriptors");
    }

    let compressed_size = record.compressed_size();
    if compressed_size != NON_ZIP64_MAX_SIZE {
        return Pending::Data(compressed_size.into());
    }

    let overflow = Zip64Overflow::new(record.uncompressed_size(), compressed_size, None);
    let fields = parse_extra_fields(&record.extra_field, overflow);
    let widened = zip64_extended_information(&fields).and_then(|field| field.compressed_size);

    match widened {
        Some(length) => Pending::Data(length),
        None => Pending::Unreadable("entries with an unknown compressed size"),
    }
}
