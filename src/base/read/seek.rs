// Copyright (c) 2022 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! A ZIP reader which acts over a seekable source.
//!
//! Entries are named from the central directory (see [`Seeking`](crate::base::read::Seeking)).
//!
//! ### Example
//! ```no_run
//! # use async_zip_reader::base::read::seek::ZipFileReader;
//! # use async_zip_reader::error::Result;
//! # use tokio::fs::File;
//! # use tokio_util::compat::TokioAsyncReadCompatExt;
//! #
//! async fn run() -> Result<()> {
//!     let data = File::open("./foo.zip").await?;
//!     let mut reader = ZipFileReader::new(data.compat()).await?;
//!
//!     let entry = reader.entry(0)?;
//!     let mut data = Vec::new();
//!     reader.reader_without_entry(0).await?.read_to_end_checked(&mut data, &entry).await?;
//!
//!     // Use data within current scope.
//!
//!     Ok(())
//! }
//! ```

use crate::base::read::io::entry::{WithEntry, WithoutEntry, ZipEntryReader};
use crate::entry::StoredZipEntry;
use crate::error::Result;
use crate::file::ZipFile;

#[cfg(feature = "tokio")]
use crate::tokio::read::seek::ZipFileReader as TokioZipFileReader;

use futures_lite::io::{AsyncRead, AsyncSeek};

#[cfg(feature = "tokio")]
use tokio_util::compat::TokioAsyncReadCompatExt;

/// A ZIP reader which acts over a seekable source.
#[derive(Clone)]
pub struct ZipFileReader<R> {
    reader: R,
    file: ZipFile,
}

impl<R> ZipFileReader<R>
where
    R: AsyncRead + AsyncSeek + Unpin,
{
    /// Constructs a new ZIP reader from a seekable source.
    pub async fn new(mut reader: R) -> Result<ZipFileReader<R>> {
        let file = crate::base::read::file(&mut reader).await?;
        Ok(ZipFileReader::from_raw_parts(reader, file))
    }

    /// Constructs a ZIP reader from a seekable source and ZIP file information derived from that source.
    ///
    /// Providing a [`ZipFile`] that wasn't derived from that source may lead to inaccurate parsing.
    pub fn from_raw_parts(reader: R, file: ZipFile) -> ZipFileReader<R> {
        ZipFileReader { reader, file }
    }

    /// Returns this ZIP file's information.
    pub fn file(&self) -> &ZipFile {
        &self.file
    }

    /// Resolves and returns the entry at the provided index.
    pub fn entry(&self, index: usize) -> Result<StoredZipEntry> {
        self.file.entry(index)
    }

    /// Returns a mutable reference to the inner seekable source.
    ///
    /// Swapping the source (eg. via std::mem operations) may lead to inaccurate parsing.
    pub fn inner_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Returns the inner seekable source by consuming self.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Returns a new entry reader if the provided index is valid.
    pub async fn reader_without_entry(&mut self, index: usize) -> Result<ZipEntryReader<'_, &mut R, WithoutEntry>> {
        let stored_entry = self.file.entry(index)?;
        let compression = stored_entry.data_compression()?;

        stored_entry.seek_to_data_offset(&mut self.reader).await?;

        Ok(ZipEntryReader::new(&mut self.reader, compression, stored_entry.compressed_size()))
    }

    /// Returns a new entry reader if the provided index is valid.
    pub async fn reader_with_entry(&mut self, index: usize) -> Result<ZipEntryReader<'_, &mut R, WithEntry<'_>>> {
        let stored_entry = self.file.entry(index)?;
        let compression = stored_entry.data_compression()?;

        stored_entry.seek_to_data_offset(&mut self.reader).await?;

        let reader = ZipEntryReader::new(&mut self.reader, compression, stored_entry.compressed_size());
        Ok(reader.into_with_entry_owned(stored_entry.entry))
    }

    /// Returns a new entry reader if the provided index is valid.
    /// Consumes self
    pub async fn into_entry<'a>(mut self, index: usize) -> Result<ZipEntryReader<'a, R, WithoutEntry>>
    where
        R: 'a,
    {
        let stored_entry = self.file.entry(index)?;
        let compression = stored_entry.data_compression()?;

        stored_entry.seek_to_data_offset(&mut self.reader).await?;

        Ok(ZipEntryReader::new(self.reader, compression, stored_entry.compressed_size()))
    }
}

#[cfg(feature = "tokio")]
impl<R> ZipFileReader<tokio_util::compat::Compat<R>>
where
    R: tokio::io::AsyncRead + tokio::io::AsyncSeek + Unpin,
{
    /// Constructs a new tokio-specific ZIP reader from a seekable source.
    pub async fn with_tokio(reader: R) -> Result<TokioZipFileReader<R>> {
        let mut reader = reader.compat();
        let file = crate::base::read::file(&mut reader).await?;
        Ok(ZipFileReader::from_raw_parts(reader, file))
    }
}
