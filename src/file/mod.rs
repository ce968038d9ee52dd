// Copyright (c) 2022 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::base::read::{NamingStrategy, Seeking};
use crate::entry::StoredZipEntry;
use crate::error::{Result, ZipError};
use crate::spec::header::RawHeaderRecord;

/// An immutable store of data about a ZIP file.
///
/// Central directory records are kept as parsed and only resolved into entries when accessed, so an entry whose
/// name can't be resolved doesn't affect access to any other entry.
#[derive(Debug, Clone)]
pub struct ZipFile {
    pub(crate) records: Vec<RawHeaderRecord>,
    pub(crate) comment: Vec<u8>,
}

impl ZipFile {
    /// Returns the number of entries in this ZIP file.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether this ZIP file has no entries.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the raw central directory records of this ZIP file.
    pub fn records(&self) -> &[RawHeaderRecord] {
        &self.records
    }

    /// Resolves and returns the entry at the provided index.
    ///
    /// # Errors
    /// [`ZipError::EntryIndexOutOfBounds`] for an invalid index, or the error which resolving the entry's central
    /// directory record raised.
    pub fn entry(&self, index: usize) -> Result<StoredZipEntry> {
        let record = self.records.get(index).ok_or(ZipError::EntryIndexOutOfBounds)?;
        Seeking::describe(record.clone())
    }

    /// Returns an iterator which resolves each entry in central directory order.
    pub fn entries(&self) -> impl Iterator<Item = Result<StoredZipEntry>> + '_ {
        self.records.iter().map(|record| Seeking::describe(record.clone()))
    }

    /// Returns this ZIP file's trailing comment as stored.
    pub fn comment(&self) -> &[u8] {
        &self.comment
    }
}
