// Copyright (c) 2022 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::date::ZipDateTime;
use crate::error::{Result, ZipError};
use crate::name::resolve::{resolve_comment, resolve_name};
use crate::name::ResolvedName;
use crate::spec::consts::{CDH_SIGNATURE, LFH_SIGNATURE, NON_ZIP64_MAX_SIZE, SIGNATURE_LENGTH};
use crate::spec::extra_field::{
    find_unicode_path, parse_extra_fields, unicode_comment, zip64_extended_information, Zip64Overflow,
};
use crate::spec::header::{
    ExtraField, GeneralPurposeFlag, HeaderKind, RawHeaderRecord, RecordHeader, Zip64ExtendedInformationExtraField,
};
use crate::spec::parse::{read_fixed, read_record};
use crate::spec::Compression;

use std::ops::Deref;

use futures_lite::io::{AsyncRead, AsyncSeek, AsyncSeekExt, SeekFrom};

/// An immutable description of a ZIP entry, surfaced before any of its data is read.
///
/// The name is resolved from exactly one header record; [`ZipEntry::resolved_from()`] tells which kind. All buffers
/// are moved in from that record.
///
/// # Note
/// Entry names come straight from the archive. If calling this on entries retrieved from untrusted ZIP files, the
/// name should be sanitised before being used as a path to prevent [directory travesal
/// attacks](https://en.wikipedia.org/wiki/Directory_traversal_attack).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipEntry {
    pub(crate) filename: ResolvedName,
    pub(crate) comment: Option<ResolvedName>,
    pub(crate) resolved_from: HeaderKind,
    pub(crate) flags: GeneralPurposeFlag,
    pub(crate) compression: u16,
    pub(crate) crc32: u32,
    pub(crate) uncompressed_size: u64,
    pub(crate) compressed_size: u64,
    pub(crate) last_modification_date: ZipDateTime,
    pub(crate) internal_file_attribute: u16,
    pub(crate) external_file_attribute: u32,
    pub(crate) extra_fields: Vec<ExtraField>,
}

impl ZipEntry {
    /// Builds an entry from one header record, returning it alongside its local file header offset if the record
    /// carries one.
    ///
    /// Only the name can fail the entry. Other extra fields are parsed leniently and the comment never fails; an
    /// incomplete Zip64 field only surfaces once the entry's data is read.
    pub(crate) fn from_record(record: RawHeaderRecord) -> Result<(ZipEntry, Option<u64>)> {
        let resolved_from = record.kind();
        let flags = record.flags();
        let compression = record.compression();
        let crc32 = record.crc();
        let (mod_time, mod_date) = record.modified();
        let lh_offset = record.lh_offset();

        let unicode_path = find_unicode_path(&record.extra_field)?;
        let overflow = Zip64Overflow::new(record.uncompressed_size(), record.compressed_size(), lh_offset);
        let extra_fields = parse_extra_fields(&record.extra_field, overflow);

        let zip64 = zip64_extended_information(&extra_fields);
        let uncompressed_size =
            zip64.and_then(|field| field.uncompressed_size).unwrap_or(record.uncompressed_size() as u64);
        let compressed_size = zip64.and_then(|field| field.compressed_size).unwrap_or(record.compressed_size() as u64);
        let file_offset =
            lh_offset.map(|offset| zip64.and_then(|field| field.relative_header_offset).unwrap_or(offset as u64));

        let (internal_file_attribute, external_file_attribute) = match &record.header {
            RecordHeader::Local(_) => (0, 0),
            RecordHeader::Central(header) => (header.inter_attr, header.exter_attr),
        };

        let filename = resolve_name(record.filename, flags, unicode_path.as_ref())?;
        let comment = match resolved_from {
            HeaderKind::Local => None,
            HeaderKind::Central => Some(resolve_comment(record.comment, flags, unicode_comment(&extra_fields))),
        };

        let entry = ZipEntry {
            filename,
            comment,
            resolved_from,
            flags,
            compression,
            crc32,
            uncompressed_size,
            compressed_size,
            last_modification_date: ZipDateTime::from_dos(mod_date, mod_time),
            internal_file_attribute,
            external_file_attribute,
            extra_fields,
        };

        Ok((entry, file_offset))
    }

    /// Returns the entry's resolved name.
    pub fn filename(&self) -> &ResolvedName {
        &self.filename
    }

    /// Returns the entry's name in its native encoding.
    ///
    /// This is `None` when the archive recorded the name as UTF-8, in which case no separate native form exists.
    pub fn pathname(&self) -> Option<&[u8]> {
        self.filename.native()
    }

    /// Returns the entry's name as UTF-8, if the archive recorded it authoritatively as such.
    pub fn pathname_utf8(&self) -> Option<&str> {
        self.filename.utf8()
    }

    /// Returns the entry's resolved comment.
    ///
    /// Comments are only stored in the central directory, so this is `None` for entries read by a streaming reader.
    pub fn comment(&self) -> Option<&ResolvedName> {
        self.comment.as_ref()
    }

    /// Returns which header record the name was resolved from.
    pub fn resolved_from(&self) -> HeaderKind {
        self.resolved_from
    }

    /// Returns the entry's general purpose flag.
    pub fn flags(&self) -> GeneralPurposeFlag {
        self.flags
    }

    /// Returns the entry's compression method, if it's supported by this build.
    pub fn compression(&self) -> Result<Compression> {
        Compression::try_from(self.compression)
    }

    /// Returns the compression method to read this entry's data with, refusing entries this crate can't read.
    pub(crate) fn data_compression(&self) -> Result<Compression> {
        if self.flags.encrypted {
            return Err(ZipError::FeatureNotSupported("encryption"));
        }

        // The header deferred the size to a Zip64 field which didn't hold it.
        if self.compressed_size == u64::from(NON_ZIP64_MAX_SIZE) && !self.has_zip64(|field| field.compressed_size) {
            return Err(ZipError::Zip64ExtendedFieldIncomplete);
        }

        self.compression()
    }

    fn has_zip64(&self, value: impl Fn(&Zip64ExtendedInformationExtraField) -> Option<u64>) -> bool {
        zip64_extended_information(&self.extra_fields).and_then(value).is_some()
    }

    /// Returns the entry's raw compression method value.
    pub fn compression_method(&self) -> u16 {
        self.compression
    }

    /// Returns the entry's CRC32 value.
    pub fn crc32(&self) -> u32 {
        self.crc32
    }

    /// Returns the entry's uncompressed size.
    pub fn uncompressed_size(&self) -> u64 {
        self.uncompressed_size
    }

    /// Returns the entry's compressed size.
    pub fn compressed_size(&self) -> u64 {
        self.compressed_size
    }

    /// Returns the entry's last modification time & date.
    pub fn last_modification_date(&self) -> &ZipDateTime {
        &self.last_modification_date
    }

    /// Returns the entry's internal file attribute.
    pub fn internal_file_attribute(&self) -> u16 {
        self.internal_file_attribute
    }

    /// Returns the entry's external file attribute
    pub fn external_file_attribute(&self) -> u32 {
        self.external_file_attribute
    }

    /// Returns the entry's extra fields.
    pub fn extra_fields(&self) -> &[ExtraField] {
        &self.extra_fields
    }

    /// Returns whether or not the entry represents a directory.
    pub fn dir(&self) -> bool {
        self.filename.is_dir()
    }
}

/// An immutable store of data about how a ZIP entry is stored within a specific archive.
///
/// Besides storing the associated [`ZipEntry`], it also holds the offset of its local file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredZipEntry {
    pub(crate) entry: ZipEntry,
    pub(crate) file_offset: u64,
}

impl StoredZipEntry {
    /// Builds a stored entry from a central directory record.
    pub(crate) fn from_central(record: RawHeaderRecord) -> Result<StoredZipEntry> {
        match ZipEntry::from_record(record)? {
            (entry, Some(file_offset)) => Ok(StoredZipEntry { entry, file_offset }),
            (_, None) => Err(ZipError::UnexpectedHeaderError(LFH_SIGNATURE, CDH_SIGNATURE)),
        }
    }

    /// Returns the offset in bytes to where the header of the entry starts.
    pub fn header_offset(&self) -> u64 {
        self.file_offset
    }

    /// Returns the associated entry.
    pub fn entry(&self) -> &ZipEntry {
        &self.entry
    }

    /// Seeks to the offset in bytes where the data of the entry starts.
    ///
    /// The local file header is read to find where its variable-length sections end. Its name plays no part in the
    /// entry's name, which comes from the central directory; a disagreement is only logged.
    pub(crate) async fn seek_to_data_offset<R>(&self, reader: &mut R) -> Result<()>
    where
        R: AsyncRead + AsyncSeek + Unpin,
    {
        if self.file_offset == u64::from(NON_ZIP64_MAX_SIZE) && !self.has_zip64(|field| field.relative_header_offset) {
            return Err(ZipError::Zip64ExtendedFieldIncomplete);
        }

        let local = read_local_header_at(reader, self.file_offset).await?;

        let raw_name_comparable = !matches!(self.entry.filename, ResolvedName::ExtraFieldUtf8(_));
        if raw_name_comparable && local.filename != self.entry.filename.as_bytes() {
            tracing::debug!(offset = self.file_offset, "local file header name differs from the central directory's");
        }

        reader.seek(SeekFrom::Start(self.file_offset + local.record_length() as u64)).await?;
        Ok(())
    }
}

impl Deref for StoredZipEntry {
    type Target = ZipEntry;

    fn deref(&self) -> &Self::Target {
        &self.entry
    }
}

/// Reads the local file header record which starts at `offset`.
pub(crate) async fn read_local_header_at<R>(reader: &mut R, offset: u64) -> Result<RawHeaderRecord>
where
    R: AsyncRead + AsyncSeek + Unpin,
{
    reader.seek(SeekFrom::Start(offset)).await?;

    let mut signature = [0; SIGNATURE_LENGTH];
    read_fixed(reader, &mut signature).await?;

    match u32::from_le_bytes(signature) {
        LFH_SIGNATURE => read_record(reader, LFH_SIGNATURE).await,
        actual => Err(ZipError::UnexpectedHeaderError(actual, LFH_SIGNATURE)),
    }
}
