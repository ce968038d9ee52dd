// Copyright (c) 2023 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! A ZIP reader which acts over a non-seekable source.
//!
//! # API Design
//! As opposed to other readers provided by this crate, it's important that the data of an entry is fully read before
//! the proceeding entry is read. This is as a result of not being able to seek forwards or backwards, so we must end
//! up at the start of the next entry.
//!
//! **We encode this invariant within Rust's type system so that it can be enforced at compile time.**
//!
//! This requires that any transition methods between these encoded types consume the reader and provide a new owned
//! reader back.
//!
//! # Considerations
//! As the central directory of a ZIP archive is stored at the end of it, a non-seekable reader doesn't have access
//! to it. Entries are named from their local file header alone (see [`Streaming`]) and reading stops at the first
//! central directory header. This results in:
//! - No file comment being available.
//! - No internal or external file attributes being available (defaults to 0).
//! - The name and extra field data potentially being inconsistent with what's stored in the central directory.
//! - Entries written with a data descriptor being unreadable, as their sizes aren't known up front.
//!
//! # Example
//! ```no_run
//! # use futures_lite::io::Cursor;
//! # use async_zip_reader::error::Result;
//! # use async_zip_reader::base::read::stream::ZipFileReader;
//! #
//! # async fn run() -> Result<()> {
//! let mut zip = ZipFileReader::new(Cursor::new([0; 0]));
//!
//! // Print the name of every file in a ZIP archive.
//! while let Some(mut entry) = zip.next_with_entry().await? {
//!     println!("File: {:?}", entry.reader().entry().filename());
//!     zip = entry.skip().await?;
//! }
//! #
//! #     Ok(())
//! # }
//! ```

use crate::base::read::io::entry::{WithEntry, WithoutEntry, ZipEntryReader};
use crate::base::read::{NamingStrategy, Streaming};
use crate::entry::ZipEntry;
use crate::error::{Result, ZipError};
use crate::spec::Compression;

#[cfg(feature = "tokio")]
use crate::tokio::read::stream::Ready as TokioReady;

use futures_lite::io::{AsyncRead, AsyncReadExt};

#[cfg(feature = "tokio")]
use tokio_util::compat::TokioAsyncReadCompatExt;

/// A type which encodes that [`ZipFileReader`] is ready to open a new entry.
pub struct Ready<R>(R);

/// A type which encodes that [`ZipFileReader`] is currently reading an entry.
pub struct Reading<'a, R, E>(ZipEntryReader<'a, R, E>);

/// A ZIP reader which acts over a non-seekable source.
///
/// See the [module-level docs](.) for more information.
#[derive(Clone)]
pub struct ZipFileReader<S>(S);

impl<'a, R> ZipFileReader<Ready<R>>
where
    R: AsyncRead + Unpin + 'a,
{
    /// Constructs a new ZIP reader from a non-seekable source.
    pub fn new(reader: R) -> Self {
        Self(Ready(reader))
    }

    /// Opens the next entry for reading if the central directory hasn't yet been reached.
    pub async fn next_without_entry(mut self) -> Result<Option<ZipFileReader<Reading<'a, R, WithoutEntry>>>> {
        let (entry, compression) = match self.next_entry().await? {
            Some(next) => next,
            None => return Ok(None),
        };

        let reader = ZipEntryReader::new(self.0 .0, compression, entry.compressed_size());
        Ok(Some(ZipFileReader(Reading(reader))))
    }

    /// Opens the next entry for reading if the central directory hasn't yet been reached.
    pub async fn next_with_entry(mut self) -> Result<Option<ZipFileReader<Reading<'a, R, WithEntry<'a>>>>> {
        let (entry, compression) = match self.next_entry().await? {
            Some(next) => next,
            None => return Ok(None),
        };

        let reader = ZipEntryReader::new(self.0 .0, compression, entry.compressed_size());
        Ok(Some(ZipFileReader(Reading(reader.into_with_entry_owned(entry)))))
    }

    /// Consumes the `ZipFileReader` returning the original `reader`
    pub fn into_inner(self) -> R {
        self.0 .0
    }

    async fn next_entry(&mut self) -> Result<Option<(ZipEntry, Compression)>> {
        let record = match crate::base::read::lfh(&mut self.0 .0).await? {
            Some(record) => record,
            None => return Ok(None),
        };

        let entry = Streaming::describe(record)?;

        if entry.flags().data_descriptor {
            return Err(ZipError::FeatureNotSupported("stream reading entries with data descriptors"));
        }

        let compression = entry.data_compression()?;
        Ok(Some((entry, compression)))
    }
}

#[cfg(feature = "tokio")]
impl<R> ZipFileReader<TokioReady<R>>
where
    R: tokio::io::AsyncRead + Unpin,
{
    /// Constructs a new tokio-specific ZIP reader from a non-seekable source.
    pub fn with_tokio(reader: R) -> ZipFileReader<TokioReady<R>> {
        Self(Ready(reader.compat()))
    }
}

impl<'a, R, E> ZipFileReader<Reading<'a, R, E>>
where
    R: AsyncRead + Unpin,
{
    /// Returns a mutable reference to the inner entry reader.
    pub fn reader(&mut self) -> &mut ZipEntryReader<'a, R, E> {
        &mut self.0 .0
    }

    /// Converts the reader back into the Ready state if EOF has been reached.
    pub async fn done(mut self) -> Result<ZipFileReader<Ready<R>>> {
        if self.0 .0.read(&mut [0; 1]).await? != 0 {
            return Err(ZipError::EOFNotReached);
        }

        Ok(ZipFileReader(Ready(self.0 .0.finish().await?)))
    }

    /// Reads until EOF and converts the reader back into the Ready state.
    pub async fn skip(mut self) -> Result<ZipFileReader<Ready<R>>> {
        while self.0 .0.read(&mut [0; 2048]).await? != 0 {}
        Ok(ZipFileReader(Ready(self.0 .0.finish().await?)))
    }
}
