// Copyright (c) 2023 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! A set of [`tokio`]-specific type aliases and features.
//!
//! # Usage
//! With the `tokio` feature enabled, types from the [`base`] implementation and [`archive`] gain additional
//! constructors for use with [`tokio`]. These constructors internally implement conversion between the required async
//! IO traits. They are defined as:
//! - [`base::read::seek::ZipFileReader::with_tokio()`]
//! - [`base::read::stream::ZipFileReader::with_tokio()`]
//! - [`archive::ZipArchive::with_tokio()`]
//! - [`archive::ZipArchive::with_tokio_stream()`]
//!
//! The types returned by these constructors contain a wrapping compatibility type from [`tokio_util`]. The aliases
//! below name them without needing to pull in that dependency manually.

#[cfg(doc)]
use crate::{archive, base};
#[cfg(doc)]
use tokio;
#[cfg(doc)]
use tokio_util;

use tokio_util::compat::Compat;

/// A [`tokio`]-specific type alias for [`archive::ZipArchive`] over a seekable source.
pub type ZipArchive<R> = crate::archive::ZipArchive<Compat<R>>;

/// A [`tokio`]-specific type alias for [`archive::ZipArchive`] over a source which can't seek.
pub type StreamingZipArchive<R> = crate::archive::ZipArchive<crate::archive::ForwardOnly<Compat<R>>>;

pub mod read {
    //! A module which supports reading ZIP files.

    pub mod seek {
        //! A ZIP reader which acts over a seekable source.

        #[cfg(doc)]
        use crate::base;
        use tokio_util::compat::Compat;

        /// A [`tokio`]-specific type alias for [`base::read::seek::ZipFileReader`].
        pub type ZipFileReader<R> = crate::base::read::seek::ZipFileReader<Compat<R>>;
    }

    pub mod stream {
        //! A ZIP reader which acts over a non-seekable source.

        #[cfg(doc)]
        use crate::base;
        use tokio_util::compat::Compat;

        /// A [`tokio`]-specific type alias for [`base::read::stream::Ready`].
        pub type Ready<R> = crate::base::read::stream::Ready<Compat<R>>;
    }
}
