// Copyright Cognite AS, 2023

//! Scanning of a header's extra field region into typed sub-fields.

use crate::error::{Result as ZipResult, ZipError};
use crate::spec::consts::NON_ZIP64_MAX_SIZE;
use crate::spec::header::{
    ExtraField, HeaderId, InfoZipUnicodeExtraField, UnknownExtraField, Zip64ExtendedInformationExtraField,
};

/// The length of a sub-field's header id and data size.
const SUB_FIELD_HEADER_LENGTH: usize = 4;

/// Which header values overflowed into the Zip64 extended information extra field.
///
/// A Zip64 field only stores the values whose 32-bit header counterparts hold [`NON_ZIP64_MAX_SIZE`], and it stores
/// them in a fixed order, so the header is needed to know what the field's bytes mean.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Zip64Overflow {
    pub(crate) uncompressed_size: bool,
    pub(crate) compressed_size: bool,
    pub(crate) relative_header_offset: bool,
}

impl Zip64Overflow {
    pub(crate) fn new(uncompressed_size: u32, compressed_size: u32, lh_offset: Option<u32>) -> Self {
        Self {
            uncompressed_size: uncompressed_size == NON_ZIP64_MAX_SIZE,
            compressed_size: compressed_size == NON_ZIP64_MAX_SIZE,
            relative_header_offset: lh_offset == Some(NON_ZIP64_MAX_SIZE),
        }
    }
}

/// An iterator over the raw `(header id, data)` sub-fields of an extra field region.
struct SubFields<'a> {
    data: &'a [u8],
}

impl<'a> Iterator for SubFields<'a> {
    type Item = ZipResult<(HeaderId, &'a [u8])>;

    fn next(&mut self) -> Option<Self::Item> {
        // Fewer bytes than a sub-field header are padding some writers leave behind.
        if self.data.len() < SUB_FIELD_HEADER_LENGTH {
            return None;
        }

        let header_id = HeaderId(u16::from_le_bytes([self.data[0], self.data[1]]));
        let data_size = u16::from_le_bytes([self.data[2], self.data[3]]) as usize;
        let rest = &self.data[SUB_FIELD_HEADER_LENGTH..];

        if rest.len() < data_size {
            self.data = &[];
            return Some(Err(ZipError::TruncatedExtraField(header_id.into())));
        }

        let (content, tail) = rest.split_at(data_size);
        self.data = tail;
        Some(Ok((header_id, content)))
    }
}

/// Parse a zip64 extra field from bytes.
/// The content of "data" should exclude the header.
fn zip64_extended_information_field_from_bytes(
    data: &[u8],
    overflow: Zip64Overflow,
) -> ZipResult<Zip64ExtendedInformationExtraField> {
    let mut rest = data;
    let mut next_u64 = |present: bool| -> ZipResult<Option<u64>> {
        if !present {
            return Ok(None);
        }
        let (value, tail) = rest.split_first_chunk::<8>().ok_or(ZipError::Zip64ExtendedFieldIncomplete)?;
        rest = tail;
        Ok(Some(u64::from_le_bytes(*value)))
    };

    let uncompressed_size = next_u64(overflow.uncompressed_size)?;
    let compressed_size = next_u64(overflow.compressed_size)?;
    let relative_header_offset = next_u64(overflow.relative_header_offset)?;
    let disk_start_number = rest.first_chunk::<4>().map(|value| u32::from_le_bytes(*value));

    Ok(Zip64ExtendedInformationExtraField {
        uncompressed_size,
        compressed_size,
        relative_header_offset,
        disk_start_number,
    })
}

/// Parse an Info-ZIP Unicode path or comment extra field from bytes.
/// The content of "data" should exclude the header.
fn info_zip_unicode_field_from_bytes(header_id: HeaderId, data: &[u8]) -> ZipResult<InfoZipUnicodeExtraField> {
    match data {
        [version, c0, c1, c2, c3, unicode @ ..] => Ok(InfoZipUnicodeExtraField {
            version: *version,
            crc32: u32::from_le_bytes([*c0, *c1, *c2, *c3]),
            unicode: unicode.to_vec(),
        }),
        _ => Err(ZipError::TruncatedExtraField(header_id.into())),
    }
}

pub(crate) fn extra_field_from_bytes(
    header_id: HeaderId,
    data: &[u8],
    overflow: Zip64Overflow,
) -> ZipResult<ExtraField> {
    match header_id {
        HeaderId::ZIP64_EXTENDED_INFORMATION_EXTRA_FIELD => {
            Ok(ExtraField::Zip64ExtendedInformation(zip64_extended_information_field_from_bytes(data, overflow)?))
        }
        HeaderId::INFO_ZIP_UNICODE_COMMENT_EXTRA_FIELD => {
            Ok(ExtraField::InfoZipUnicodeComment(info_zip_unicode_field_from_bytes(header_id, data)?))
        }
        HeaderId::INFO_ZIP_UNICODE_PATH_EXTRA_FIELD => {
            Ok(ExtraField::InfoZipUnicodePath(info_zip_unicode_field_from_bytes(header_id, data)?))
        }
        header_id => Ok(ExtraField::Unknown(UnknownExtraField {
            header_id,
            data_size: data.len() as u16,
            content: data.to_vec(),
        })),
    }
}

/// Parses what it can of an extra field region, for entries which shouldn't fail over fields they don't depend on.
///
/// A sub-field whose content doesn't decode is kept as [`ExtraField::Unknown`], and parsing stops at a sub-field which
/// overruns the region.
pub(crate) fn parse_extra_fields(data: &[u8], overflow: Zip64Overflow) -> Vec<ExtraField> {
    let mut fields = Vec::new();

    for field in (SubFields { data }) {
        let (header_id, content) = match field {
            Ok(field) => field,
            Err(err) => {
                tracing::debug!(%err, "ignoring the rest of an extra field region");
                break;
            }
        };

        let field = extra_field_from_bytes(header_id, content, overflow).unwrap_or_else(|err| {
            tracing::debug!(%err, "keeping an undecodable extra field as unknown");
            ExtraField::Unknown(UnknownExtraField {
                header_id,
                data_size: content.len() as u16,
                content: content.to_vec(),
            })
        });
        fields.push(field);
    }

    fields
}

/// Scans an extra field region for the Info-ZIP Unicode path field (0x7075).
///
/// The first such field wins; any later duplicate is ignored. The field's payload is not checked for valid UTF-8 as
/// whether it's trusted at all depends on its checksum, which is for the name resolution to decide.
///
/// # Errors
/// [`ZipError::TruncatedExtraField`] if any sub-field declares more bytes than remain in the region, or if the Unicode
/// path field is too short to hold its version and checksum.
pub fn find_unicode_path(data: &[u8]) -> ZipResult<Option<InfoZipUnicodeExtraField>> {
    let mut found = None;

    for field in (SubFields { data }) {
        let (header_id, content) = field?;

        if header_id != HeaderId::INFO_ZIP_UNICODE_PATH_EXTRA_FIELD {
            continue;
        }
        if found.is_some() {
            tracing::debug!("ignoring duplicate unicode path extra field");
            continue;
        }

        found = Some(info_zip_unicode_field_from_bytes(header_id, content)?);
    }

    Ok(found)
}

/// Returns the first Info-ZIP Unicode path field among already parsed extra fields.
pub(crate) fn unicode_path(fields: &[ExtraField]) -> Option<&InfoZipUnicodeExtraField> {
    fields.iter().find_map(|field| match field {
        ExtraField::InfoZipUnicodePath(field) => Some(field),
        _ => None,
    })
}

/// Returns the first Info-ZIP Unicode comment field among already parsed extra fields.
pub(crate) fn unicode_comment(fields: &[ExtraField]) -> Option<&InfoZipUnicodeExtraField> {
    fields.iter().find_map(|field| match field {
        ExtraField::InfoZipUnicodeComment(field) => Some(field),
        _ => None,
    })
}

/// Returns the first Zip64 extended information field among already parsed extra fields.
pub(crate) fn zip64_extended_information(fields: &[ExtraField]) -> Option<&Zip64ExtendedInformationExtraField> {
    fields.iter().find_map(|field| match field {
        ExtraField::Zip64ExtendedInformation(field) => Some(field),
        _ => None,
    })
}
