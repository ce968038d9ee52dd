// Copyright (c) 2022-2023 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! A module which supports reading ZIP files.
//!
//! # Reading strategies
//! An entry's name is stored in both its local file header and its central directory record, and the two copies
//! may disagree. Each reader here commits to exactly one of them via a [`NamingStrategy`]:
//! - [`Seeking`] readers ([`seek`], [`mem`]) locate the central directory first and name every entry from it. The
//!   local file header is only read to find where the entry's data starts.
//! - The [`Streaming`] reader ([`stream`]) can't see the central directory before it reaches the end of the data, so
//!   it names every entry from its local file header. Entries are surfaced as soon as their header is read and are
//!   never revised later.
//!
//! When both copies agree, both strategies produce identical names.

pub mod mem;
pub mod seek;
pub mod stream;

pub(crate) mod io;

// Re-exported as part of the public API.
pub use crate::base::read::io::entry::WithEntry;
pub use crate::base::read::io::entry::WithoutEntry;
pub use crate::base::read::io::entry::ZipEntryReader;

use crate::entry::{StoredZipEntry, ZipEntry};
use crate::error::{Result, ZipError};
use crate::file::ZipFile;
use crate::spec::consts::{
    CDH_LENGTH, CDH_SIGNATURE, EOCDR_SIGNATURE, LFH_SIGNATURE, NON_ZIP64_MAX_NUM_FILES, NON_ZIP64_MAX_SIZE,
    SIGNATURE_LENGTH,
};
use crate::spec::header::{EndOfCentralDirectoryHeader, HeaderKind, RawHeaderRecord};
use crate::spec::parse::{read_fixed, read_record};

use futures_lite::io::{AsyncRead, AsyncSeek, AsyncSeekExt, SeekFrom};

/// Decides which header record names an entry, and turns records of that kind into entries.
pub trait NamingStrategy {
    /// The header kind whose name is authoritative under this strategy.
    const AUTHORITY: HeaderKind;

    /// What this strategy surfaces for each entry.
    type Entry;

    /// Resolves one record into an entry.
    ///
    /// # Errors
    /// [`ZipError::UnexpectedHeaderError`] if the record isn't of the [`Self::AUTHORITY`] kind, otherwise any error
    /// from decoding its extra fields or resolving its name.
    fn describe(record: RawHeaderRecord) -> Result<Self::Entry>;
}

/// Names entries from their central directory record.
#[derive(Debug, Clone, Copy, Default)]
pub struct Seeking;

/// Names entries from their local file header.
#[derive(Debug, Clone, Copy, Default)]
pub struct Streaming;

impl NamingStrategy for Seeking {
    const AUTHORITY: HeaderKind = HeaderKind::Central;
    type Entry = StoredZipEntry;

    fn describe(record: RawHeaderRecord) -> Result<StoredZipEntry> {
        authorise(&record, Self::AUTHORITY)?;
        StoredZipEntry::from_central(record)
    }
}

impl NamingStrategy for Streaming {
    const AUTHORITY: HeaderKind = HeaderKind::Local;
    type Entry = ZipEntry;

    fn describe(record: RawHeaderRecord) -> Result<ZipEntry> {
        authorise(&record, Self::AUTHORITY)?;
        ZipEntry::from_record(record).map(|(entry, _)| entry)
    }
}

fn authorise(record: &RawHeaderRecord, authority: HeaderKind) -> Result<()> {
    let signature = |kind: HeaderKind| match kind {
        HeaderKind::Local => LFH_SIGNATURE,
        HeaderKind::Central => CDH_SIGNATURE,
    };

    match record.kind() {
        kind if kind == authority => Ok(()),
        kind => Err(ZipError::UnexpectedHeaderError(signature(kind), signature(authority))),
    }
}

/// Reads the central directory of a seekable source, without resolving any names.
///
/// Names are resolved per entry on access so that one undecodable name doesn't prevent the others being read.
#[tracing::instrument(skip(reader))]
pub(crate) async fn file<R>(mut reader: R) -> Result<ZipFile>
where
    R: AsyncRead + AsyncSeek + Unpin,
{
    let eocdr_offset = io::locator::eocdr(&mut reader).await?;

    reader.seek(SeekFrom::Start(eocdr_offset)).await?;
    let eocdr = EndOfCentralDirectoryHeader::from_reader(&mut reader).await?;
    let comment = io::read_bytes(&mut reader, eocdr.file_comm_length.into()).await?;

    // Outdated feature so unlikely to ever make it into this crate.
    if eocdr.disk_num != eocdr.start_cent_dir_disk || eocdr.num_of_entries != eocdr.num_of_entries_disk {
        return Err(ZipError::FeatureNotSupported("Spanned/split files"));
    }

    // Maximum values point at a Zip64 end of central directory record.
    if eocdr.num_of_entries == NON_ZIP64_MAX_NUM_FILES
        || eocdr.size_cent_dir == NON_ZIP64_MAX_SIZE
        || eocdr.cent_dir_offset == NON_ZIP64_MAX_SIZE
    {
        return Err(ZipError::FeatureNotSupported("Zip64 end of central directory records"));
    }

    // The directory can't extend past the end record, whatever size the end record claims.
    let directory_end = eocdr_offset.saturating_sub(SIGNATURE_LENGTH as u64);
    let available = directory_end.saturating_sub(eocdr.cent_dir_offset.into());
    let length = u64::from(eocdr.size_cent_dir).min(available);

    if length < eocdr.size_cent_dir.into() {
        tracing::debug!(declared = eocdr.size_cent_dir, length, "central directory overruns its end record");
    }

    reader.seek(SeekFrom::Start(eocdr.cent_dir_offset.into())).await?;
    let directory = io::read_bytes(&mut reader, length).await?;
    let records = cd(&directory, eocdr.num_of_entries)?;

    tracing::debug!(entries = records.len(), "read central directory");
    Ok(ZipFile { records, comment })
}

/// Parses `num_of_entries` consecutive central directory records from the start of `directory`.
pub(crate) fn cd(mut directory: &[u8], num_of_entries: u16) -> Result<Vec<RawHeaderRecord>> {
    let fits = directory.len() / (SIGNATURE_LENGTH + CDH_LENGTH);
    let mut records = Vec::with_capacity(usize::from(num_of_entries).min(fits));

    for _ in 0..num_of_entries {
        let record = RawHeaderRecord::parse(&mut directory)?;
        authorise(&record, HeaderKind::Central)?;
        records.push(record);
    }

    Ok(records)
}

/// Reads the next local file header record, or `None` once the central directory or its end record is reached.
#[tracing::instrument(skip(reader))]
pub(crate) async fn lfh<R>(mut reader: R) -> Result<Option<RawHeaderRecord>>
where
    R: AsyncRead + Unpin,
{
    let mut signature = [0; SIGNATURE_LENGTH];
    read_fixed(&mut reader, &mut signature).await?;

    match u32::from_le_bytes(signature) {
        LFH_SIGNATURE => Ok(Some(read_record(&mut reader, LFH_SIGNATURE).await?)),
        actual @ (CDH_SIGNATURE | EOCDR_SIGNATURE) => {
            tracing::debug!(signature = actual, "reached the end of the local file headers");
            Ok(None)
        }
        actual => Err(ZipError::InvalidSignature(actual)),
    }
}
