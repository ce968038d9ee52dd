// Copyright (c) 2022 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::ZipDateTime;

/// 2000-09-08 07:05:04
const DATE: u16 = ((2000 - 1980) << 9) | (9 << 5) | 8;
const TIME: u16 = (7 << 11) | (5 << 5) | (4 >> 1);

#[test]
fn date_decoding_test() {
    let zip_dt = ZipDateTime::from_dos(DATE, TIME);

    assert_eq!(2000, zip_dt.year());
    assert_eq!(9, zip_dt.month());
    assert_eq!(8, zip_dt.day());
    assert_eq!(7, zip_dt.hour());
    assert_eq!(5, zip_dt.minute());
    assert_eq!(4, zip_dt.second());
    assert_eq!(zip_dt.as_dos(), (DATE, TIME));
    assert_eq!(zip_dt.to_string(), "2000-09-08 07:05:04");
    assert!(zip_dt.is_valid());
}

#[test]
fn zeroed_date_is_invalid() {
    let zip_dt = ZipDateTime::default();

    assert_eq!(zip_dt.year(), 1980);
    assert_eq!(zip_dt.month(), 0);
    assert!(!zip_dt.is_valid());
}

#[test]
#[cfg(feature = "chrono")]
fn date_conversion_test_chrono() {
    use chrono::{TimeZone, Utc};

    let zip_dt = ZipDateTime::from_dos(((2022 - 1980) << 9) | (10 << 5) | 23, (17 << 11) | (55 << 5) | 1);
    let expected = Utc.with_ymd_and_hms(2022, 10, 23, 17, 55, 2).unwrap();

    assert_eq!(zip_dt.as_chrono(), Some(expected));
    assert_eq!(ZipDateTime::default().as_chrono(), None);
}
