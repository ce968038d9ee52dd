// Copyright (c) 2021 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! Decoding of the fixed-layout headers and of whole header records.
//!
//! [`RawHeaderRecord::parse`] is the single place where a record's layout is interpreted. Readers over async streams
//! only gather a record's bytes (see [`read_record`]) and then hand them to it, so seeking and streaming reads can
//! never disagree on how a record is decoded.

use crate::error::{Result, ZipError};
use crate::spec::consts::{
    CDH_LENGTH, CDH_SIGNATURE, EOCDR_LENGTH, GPF_UTF8_BIT, LFH_LENGTH, LFH_SIGNATURE, SIGNATURE_LENGTH,
};
use crate::spec::header::{
    CentralDirectoryRecord, EndOfCentralDirectoryHeader, GeneralPurposeFlag, LocalFileHeader, RawHeaderRecord,
    RecordHeader,
};

use futures_lite::io::{AsyncRead, AsyncReadExt};

fn u16_at(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn u32_at(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

impl From<u16> for GeneralPurposeFlag {
    fn from(value: u16) -> GeneralPurposeFlag {
        let encrypted = !matches!(value & 0x1, 0);
        let data_descriptor = !matches!((value & 0x8) >> 3, 0);
        let filename_unicode = !matches!(value & GPF_UTF8_BIT, 0);

        GeneralPurposeFlag { encrypted, data_descriptor, filename_unicode }
    }
}

impl From<GeneralPurposeFlag> for u16 {
    fn from(value: GeneralPurposeFlag) -> u16 {
        let encrypted: u16 = if value.encrypted { 0x1 } else { 0x0 };
        let data_descriptor: u16 = if value.data_descriptor { 0x8 } else { 0x0 };
        let filename_unicode: u16 = if value.filename_unicode { GPF_UTF8_BIT } else { 0x0 };

        encrypted | data_descriptor | filename_unicode
    }
}

impl From<[u8; LFH_LENGTH]> for LocalFileHeader {
    fn from(value: [u8; LFH_LENGTH]) -> LocalFileHeader {
        LocalFileHeader {
            version: u16_at(&value, 0),
            flags: GeneralPurposeFlag::from(u16_at(&value, 2)),
            compression: u16_at(&value, 4),
            mod_time: u16_at(&value, 6),
            mod_date: u16_at(&value, 8),
            crc: u32_at(&value, 10),
            compressed_size: u32_at(&value, 14),
            uncompressed_size: u32_at(&value, 18),
            file_name_length: u16_at(&value, 22),
            extra_field_length: u16_at(&value, 24),
        }
    }
}

impl From<[u8; CDH_LENGTH]> for CentralDirectoryRecord {
    fn from(value: [u8; CDH_LENGTH]) -> CentralDirectoryRecord {
        CentralDirectoryRecord {
            v_made_by: u16_at(&value, 0),
            v_needed: u16_at(&value, 2),
            flags: GeneralPurposeFlag::from(u16_at(&value, 4)),
            compression: u16_at(&value, 6),
            mod_time: u16_at(&value, 8),
            mod_date: u16_at(&value, 10),
            crc: u32_at(&value, 12),
            compressed_size: u32_at(&value, 16),
            uncompressed_size: u32_at(&value, 20),
            file_name_length: u16_at(&value, 24),
            extra_field_length: u16_at(&value, 26),
            file_comment_length: u16_at(&value, 28),
            disk_start: u16_at(&value, 30),
            inter_attr: u16_at(&value, 32),
            exter_attr: u32_at(&value, 34),
            lh_offset: u32_at(&value, 38),
        }
    }
}

impl From<[u8; EOCDR_LENGTH]> for EndOfCentralDirectoryHeader {
    fn from(value: [u8; EOCDR_LENGTH]) -> EndOfCentralDirectoryHeader {
        EndOfCentralDirectoryHeader {
            disk_num: u16_at(&value, 0),
            start_cent_dir_disk: u16_at(&value, 2),
            num_of_entries_disk: u16_at(&value, 4),
            num_of_entries: u16_at(&value, 6),
            size_cent_dir: u32_at(&value, 8),
            cent_dir_offset: u32_at(&value, 12),
            file_comm_length: u16_at(&value, 16),
        }
    }
}

impl EndOfCentralDirectoryHeader {
    /// Reads the fixed part of the record which follows its signature.
    pub async fn from_reader<R: AsyncRead + Unpin>(reader: &mut R) -> Result<EndOfCentralDirectoryHeader> {
        let mut buffer: [u8; EOCDR_LENGTH] = [0; EOCDR_LENGTH];
        read_fixed(reader, &mut buffer).await?;
        Ok(EndOfCentralDirectoryHeader::from(buffer))
    }
}

impl RecordHeader {
    /// Decodes the fixed layout selected by `signature` from the bytes which follow it.
    fn from_fixed(signature: u32, fixed: &[u8]) -> Result<RecordHeader> {
        match signature {
            LFH_SIGNATURE => {
                let bytes: [u8; LFH_LENGTH] =
                    fixed.get(..LFH_LENGTH).and_then(|b| b.try_into().ok()).ok_or(ZipError::TruncatedHeader)?;
                Ok(RecordHeader::Local(LocalFileHeader::from(bytes)))
            }
            CDH_SIGNATURE => {
                let bytes: [u8; CDH_LENGTH] =
                    fixed.get(..CDH_LENGTH).and_then(|b| b.try_into().ok()).ok_or(ZipError::TruncatedHeader)?;
                Ok(RecordHeader::Central(CentralDirectoryRecord::from(bytes)))
            }
            actual => Err(ZipError::InvalidSignature(actual)),
        }
    }

    fn fixed_length(&self) -> usize {
        match self {
            RecordHeader::Local(_) => LFH_LENGTH,
            RecordHeader::Central(_) => CDH_LENGTH,
        }
    }

    /// Returns the declared filename, extra field and comment lengths.
    fn variable_lengths(&self) -> (u16, u16, u16) {
        match self {
            RecordHeader::Local(header) => (header.file_name_length, header.extra_field_length, 0),
            RecordHeader::Central(header) => {
                (header.file_name_length, header.extra_field_length, header.file_comment_length)
            }
        }
    }
}

impl RawHeaderRecord {
    /// Parses exactly one local file header or central directory header record from the start of `cursor`.
    ///
    /// The layout is selected by the record's signature. On success, `cursor` is advanced past the record's last
    /// byte; on failure it is left untouched.
    ///
    /// # Errors
    /// - [`ZipError::TruncatedHeader`] if fewer bytes remain than the fixed layout requires.
    /// - [`ZipError::InvalidSignature`] if the signature is neither a local nor a central directory header.
    /// - [`ZipError::TruncatedField`] if a declared filename, extra field or comment length exceeds what remains.
    pub fn parse(cursor: &mut &[u8]) -> Result<RawHeaderRecord> {
        let input: &[u8] = cursor;

        let signature = match input.get(..SIGNATURE_LENGTH) {
            Some(bytes) => u32_at(bytes, 0),
            None => return Err(ZipError::TruncatedHeader),
        };
        let header = RecordHeader::from_fixed(signature, &input[SIGNATURE_LENGTH..])?;

        let mut rest = &input[SIGNATURE_LENGTH + header.fixed_length()..];
        let (file_name_length, extra_field_length, comment_length) = header.variable_lengths();

        let filename = take_field(&mut rest, file_name_length, "file name")?;
        let extra_field = take_field(&mut rest, extra_field_length, "extra field")?;
        let comment = take_field(&mut rest, comment_length, "file comment")?;

        let record = RawHeaderRecord {
            header,
            filename: filename.to_vec(),
            extra_field: extra_field.to_vec(),
            comment: comment.to_vec(),
        };

        tracing::trace!(kind = ?record.kind(), length = record.record_length(), "parsed header record");

        *cursor = rest;
        Ok(record)
    }
}

fn take_field<'a>(rest: &mut &'a [u8], length: u16, field: &'static str) -> Result<&'a [u8]> {
    let length = length as usize;

    if rest.len() < length {
        return Err(ZipError::TruncatedField(field));
    }

    let (bytes, tail) = rest.split_at(length);
    *rest = tail;
    Ok(bytes)
}

/// Reads one header record from a stream whose signature has already been consumed.
///
/// The fixed part is read first so the declared variable-length counts are known, then exactly that many further
/// bytes are read. The gathered bytes are decoded with [`RawHeaderRecord::parse`]. A stream which ends within the
/// fixed part yields [`ZipError::TruncatedHeader`], and one which ends within the variable part yields
/// [`ZipError::TruncatedField`].
#[tracing::instrument(skip(reader))]
pub(crate) async fn read_record<R>(mut reader: R, signature: u32) -> Result<RawHeaderRecord>
where
    R: AsyncRead + Unpin,
{
    let fixed_length = match signature {
        LFH_SIGNATURE => LFH_LENGTH,
        CDH_SIGNATURE => CDH_LENGTH,
        actual => return Err(ZipError::InvalidSignature(actual)),
    };

    let mut buffer = Vec::with_capacity(SIGNATURE_LENGTH + fixed_length);
    buffer.extend_from_slice(&signature.to_le_bytes());

    if read_up_to(&mut reader, &mut buffer, fixed_length).await? < fixed_length {
        return Err(ZipError::TruncatedHeader);
    }

    let header = RecordHeader::from_fixed(signature, &buffer[SIGNATURE_LENGTH..])?;
    let (file_name_length, extra_field_length, comment_length) = header.variable_lengths();
    let variable_length = file_name_length as usize + extra_field_length as usize + comment_length as usize;

    read_up_to(&mut reader, &mut buffer, variable_length).await?;

    let mut cursor = buffer.as_slice();
    RawHeaderRecord::parse(&mut cursor)
}

/// Appends up to `length` bytes to `buffer`, returning how many were read before the stream ended.
async fn read_up_to<R>(reader: &mut R, buffer: &mut Vec<u8>, length: usize) -> Result<usize>
where
    R: AsyncRead + Unpin,
{
    Ok(reader.take(length as u64).read_to_end(buffer).await?)
}

/// Fills `buffer` completely, mapping an early end of the stream to [`ZipError::TruncatedHeader`].
pub(crate) async fn read_fixed<R>(reader: &mut R, buffer: &mut [u8]) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    match reader.read_exact(buffer).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => Err(ZipError::TruncatedHeader),
        Err(err) => Err(err.into()),
    }
}
