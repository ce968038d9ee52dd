// Copyright (c) 2021 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

// https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#437
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalFileHeader {
    pub version: u16,
    pub flags: GeneralPurposeFlag,
    pub compression: u16,
    pub mod_time: u16,
    pub mod_date: u16,
    pub crc: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub file_name_length: u16,
    pub extra_field_length: u16,
}

// https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#444
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct GeneralPurposeFlag {
    pub encrypted: bool,
    pub data_descriptor: bool,
    /// Bit 11: the filename and comment are stored as UTF-8.
    pub filename_unicode: bool,
}

/// 2 byte header ids
/// Ref https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#452
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HeaderId(pub u16);

impl HeaderId {
    pub const ZIP64_EXTENDED_INFORMATION_EXTRA_FIELD: HeaderId = HeaderId(0x0001);
    pub const INFO_ZIP_UNICODE_COMMENT_EXTRA_FIELD: HeaderId = HeaderId(0x6375);
    pub const INFO_ZIP_UNICODE_PATH_EXTRA_FIELD: HeaderId = HeaderId(0x7075);
}

impl From<u16> for HeaderId {
    fn from(value: u16) -> Self {
        HeaderId(value)
    }
}

impl From<HeaderId> for u16 {
    fn from(value: HeaderId) -> Self {
        value.0
    }
}

/// Represents each extra field.
/// Not a structure of the ZIP format itself, but the most useful way to represent the data.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExtraField {
    Zip64ExtendedInformation(Zip64ExtendedInformationExtraField),
    InfoZipUnicodeComment(InfoZipUnicodeExtraField),
    InfoZipUnicodePath(InfoZipUnicodeExtraField),
    Unknown(UnknownExtraField),
}

/// An extended information header for Zip64.
/// This field is used both for local file headers and central directory records.
/// https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#453
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Zip64ExtendedInformationExtraField {
    pub uncompressed_size: Option<u64>,
    pub compressed_size: Option<u64>,
    pub relative_header_offset: Option<u64>,
    pub disk_start_number: Option<u32>,
}

/// An Info-ZIP Unicode path (0x7075) or comment (0x6375) extra field.
///
/// `crc32` is the checksum of the header's primary filename (or comment) bytes at the time the archive was authored.
/// If it no longer matches those bytes, the field is stale and must not be trusted.
/// https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#468
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InfoZipUnicodeExtraField {
    pub version: u8,
    pub crc32: u32,
    pub unicode: Vec<u8>,
}

/// Represents any unparsed extra field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownExtraField {
    pub header_id: HeaderId,
    pub data_size: u16,
    pub content: Vec<u8>,
}

// https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#4312
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CentralDirectoryRecord {
    pub v_made_by: u16,
    pub v_needed: u16,
    pub flags: GeneralPurposeFlag,
    pub compression: u16,
    pub mod_time: u16,
    pub mod_date: u16,
    pub crc: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub file_name_length: u16,
    pub extra_field_length: u16,
    pub file_comment_length: u16,
    pub disk_start: u16,
    pub inter_attr: u16,
    pub exter_attr: u32,
    pub lh_offset: u32,
}

// https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#4316
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndOfCentralDirectoryHeader {
    pub(crate) disk_num: u16,
    pub(crate) start_cent_dir_disk: u16,
    pub(crate) num_of_entries_disk: u16,
    pub(crate) num_of_entries: u16,
    pub(crate) size_cent_dir: u32,
    pub(crate) cent_dir_offset: u32,
    pub(crate) file_comm_length: u16,
}

/// Where a header record was found within the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderKind {
    /// A local file header, stored immediately before the entry's data.
    Local,
    /// A central directory header, stored in the index at the end of the archive.
    Central,
}

/// The fixed-layout part of a header record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordHeader {
    Local(LocalFileHeader),
    Central(CentralDirectoryRecord),
}

/// One local file header or central directory header occurrence, together with its variable-length sections.
///
/// The filename, extra field and comment are kept exactly as stored; nothing about their encoding is assumed here.
/// Local headers never carry a comment so it is always empty for [`HeaderKind::Local`] records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHeaderRecord {
    pub header: RecordHeader,
    pub filename: Vec<u8>,
    pub extra_field: Vec<u8>,
    pub comment: Vec<u8>,
}

impl RawHeaderRecord {
    /// Returns which kind of header this record was parsed from.
    pub fn kind(&self) -> HeaderKind {
        match self.header {
            RecordHeader::Local(_) => HeaderKind::Local,
            RecordHeader::Central(_) => HeaderKind::Central,
        }
    }

    pub fn flags(&self) -> GeneralPurposeFlag {
        match &self.header {
            RecordHeader::Local(header) => header.flags,
            RecordHeader::Central(header) => header.flags,
        }
    }

    pub fn compression(&self) -> u16 {
        match &self.header {
            RecordHeader::Local(header) => header.compression,
            RecordHeader::Central(header) => header.compression,
        }
    }

    pub fn crc(&self) -> u32 {
        match &self.header {
            RecordHeader::Local(header) => header.crc,
            RecordHeader::Central(header) => header.crc,
        }
    }

    pub fn compressed_size(&self) -> u32 {
        match &self.header {
            RecordHeader::Local(header) => header.compressed_size,
            RecordHeader::Central(header) => header.compressed_size,
        }
    }

    pub fn uncompressed_size(&self) -> u32 {
        match &self.header {
            RecordHeader::Local(header) => header.uncompressed_size,
            RecordHeader::Central(header) => header.uncompressed_size,
        }
    }

    /// Returns the MS-DOS modification `(time, date)` pair.
    pub fn modified(&self) -> (u16, u16) {
        match &self.header {
            RecordHeader::Local(header) => (header.mod_time, header.mod_date),
            RecordHeader::Central(header) => (header.mod_time, header.mod_date),
        }
    }

    /// Returns the offset of the entry's local file header, only known to central directory records.
    pub fn lh_offset(&self) -> Option<u32> {
        match &self.header {
            RecordHeader::Local(_) => None,
            RecordHeader::Central(header) => Some(header.lh_offset),
        }
    }

    /// Returns the total number of bytes this record occupies, signature included.
    pub fn record_length(&self) -> usize {
        let fixed = match self.kind() {
            HeaderKind::Local => crate::spec::consts::LFH_LENGTH,
            HeaderKind::Central => crate::spec::consts::CDH_LENGTH,
        };
        let variable = self.filename.len() + self.extra_field.len() + self.comment.len();

        crate::spec::consts::SIGNATURE_LENGTH + fixed + variable
    }
}
