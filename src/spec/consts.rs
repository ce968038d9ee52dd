// Copyright (c) 2022 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

pub const SIGNATURE_LENGTH: usize = 4;

// Local file header constants
//
// https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#437
pub const LFH_SIGNATURE: u32 = 0x4034b50;
pub const LFH_LENGTH: usize = 26;

// Central directory header constants
//
// https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#4312
pub const CDH_SIGNATURE: u32 = 0x2014b50;
pub const CDH_LENGTH: usize = 42;

// End of central directory record constants
//
// https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#4316
pub const EOCDR_SIGNATURE: u32 = 0x6054b50;
pub const EOCDR_LENGTH: usize = 18;

/// The general purpose flag bit which marks the filename and comment as UTF-8 (bit 11).
pub const GPF_UTF8_BIT: u16 = 0x800;

/// The value a 32-bit header field holds when the real value lives in the Zip64 extended information extra field.
pub const NON_ZIP64_MAX_SIZE: u32 = 0xFFFFFFFF;

/// The value a 16-bit entry count holds when the real count lives in the Zip64 end of central directory record.
pub const NON_ZIP64_MAX_NUM_FILES: u16 = 0xFFFF;

/// The only Info-ZIP Unicode path/comment extra field version defined.
pub const INFO_ZIP_UNICODE_VERSION: u8 = 1;
