// Copyright (c) 2021-2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! The last modification timestamp a header record carries.
//!
//! <https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#446>

use std::fmt;

#[cfg(feature = "chrono")]
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// A date and time in the packed MS-DOS layout, as stored by a header record.
///
/// Fields are decoded on access and never validated when read, as writers routinely leave them zeroed.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash)]
pub struct ZipDateTime {
    date: u16,
    time: u16,
}

impl ZipDateTime {
    pub(crate) const fn from_dos(date: u16, time: u16) -> Self {
        Self { date, time }
    }

    /// Returns the packed date and time, in the order a header record stores them.
    pub fn as_dos(&self) -> (u16, u16) {
        (self.date, self.time)
    }

    pub fn year(&self) -> i32 {
        (((self.date & 0xFE00) >> 9) + 1980).into()
    }

    pub fn month(&self) -> u32 {
        ((self.date & 0x1E0) >> 5).into()
    }

    pub fn day(&self) -> u32 {
        (self.date & 0x1F).into()
    }

    pub fn hour(&self) -> u32 {
        ((self.time & 0xF800) >> 11).into()
    }

    pub fn minute(&self) -> u32 {
        ((self.time & 0x7E0) >> 5).into()
    }

    /// Returns the second, which MS-DOS only stores with a granularity of two.
    pub fn second(&self) -> u32 {
        ((self.time & 0x1F) << 1).into()
    }

    /// Returns whether every field is within its calendar range.
    ///
    /// Days aren't checked against their month.
    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month())
            && (1..=31).contains(&self.day())
            && self.hour() < 24
            && self.minute() < 60
            && self.second() < 60
    }

    /// Converts to chrono's [`DateTime`], treating the stored value as UTC.
    ///
    /// Returns `None` if the stored value isn't a real date & time. Requires the `chrono` feature.
    #[cfg(feature = "chrono")]
    pub fn as_chrono(&self) -> Option<DateTime<Utc>> {
        let date = NaiveDate::from_ymd_opt(self.year(), self.month(), self.day())?;
        let datetime = date.and_hms_opt(self.hour(), self.minute(), self.second())?;

        Some(Utc.from_utc_datetime(&datetime))
    }
}

impl fmt::Display for ZipDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year(),
            self.month(),
            self.day(),
            self.hour(),
            self.minute(),
            self.second()
        )
    }
}
