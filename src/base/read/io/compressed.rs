// Copyright (c) 2022 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::spec::Compression;

use std::pin::Pin;
use std::task::{Context, Poll};

#[cfg(any(
    feature = "deflate",
    feature = "bzip2",
    feature = "zstd",
    feature = "lzma",
    feature = "xz",
    feature = "deflate64"
))]
use async_compression::futures::bufread;
use futures_lite::io::{AsyncRead, AsyncReadExt, BufReader, Take};
use pin_project::pin_project;

/// An entry's compressed bytes: the upstream reader limited to the size its header record declares.
type Bounded<R> = BufReader<Take<R>>;

/// A decompressing reader over exactly one entry's compressed bytes.
///
/// Codecs are provided by `async-compression`; this type only selects one and bounds what it may read.
#[pin_project(project = CompressedReaderProj)]
pub(crate) enum CompressedReader<R> {
    Stored(#[pin] Bounded<R>),
    #[cfg(feature = "deflate")]
    Deflate(#[pin] bufread::DeflateDecoder<Bounded<R>>),
    #[cfg(feature = "deflate64")]
    Deflate64(#[pin] bufread::Deflate64Decoder<Bounded<R>>),
    #[cfg(feature = "bzip2")]
    Bz(#[pin] bufread::BzDecoder<Bounded<R>>),
    #[cfg(feature = "lzma")]
    Lzma(#[pin] bufread::LzmaDecoder<Bounded<R>>),
    #[cfg(feature = "zstd")]
    Zstd(#[pin] bufread::ZstdDecoder<Bounded<R>>),
    #[cfg(feature = "xz")]
    Xz(#[pin] bufread::XzDecoder<Bounded<R>>),
}

impl<R> CompressedReader<R>
where
    R: AsyncRead + Unpin,
{
    pub(crate) fn new(reader: R, compression: Compression, compressed_size: u64) -> Self {
        tracing::trace!(?compression, compressed_size, "selecting decoder");
        let bounded = BufReader::new(reader.take(compressed_size));

        match compression {
            Compression::Stored => CompressedReader::Stored(bounded),
            #[cfg(feature = "deflate")]
            Compression::Deflate => CompressedReader::Deflate(bufread::DeflateDecoder::new(bounded)),
            #[cfg(feature = "deflate64")]
            Compression::Deflate64 => CompressedReader::Deflate64(bufread::Deflate64Decoder::new(bounded)),
            #[cfg(feature = "bzip2")]
            Compression::Bz => CompressedReader::Bz(bufread::BzDecoder::new(bounded)),
            #[cfg(feature = "lzma")]
            Compression::Lzma => CompressedReader::Lzma(bufread::LzmaDecoder::new(bounded)),
            #[cfg(feature = "zstd")]
            Compression::Zstd => CompressedReader::Zstd(bufread::ZstdDecoder::new(bounded)),
            #[cfg(feature = "xz")]
            Compression::Xz => CompressedReader::Xz(bufread::XzDecoder::new(bounded)),
        }
    }

    fn bounded(&self) -> &Bounded<R> {
        match self {
            CompressedReader::Stored(inner) => inner,
            #[cfg(feature = "deflate")]
            CompressedReader::Deflate(inner) => inner.get_ref(),
            #[cfg(feature = "deflate64")]
            CompressedReader::Deflate64(inner) => inner.get_ref(),
            #[cfg(feature = "bzip2")]
            CompressedReader::Bz(inner) => inner.get_ref(),
            #[cfg(feature = "lzma")]
            CompressedReader::Lzma(inner) => inner.get_ref(),
            #[cfg(feature = "zstd")]
            CompressedReader::Zstd(inner) => inner.get_ref(),
            #[cfg(feature = "xz")]
            CompressedReader::Xz(inner) => inner.get_ref(),
        }
    }

    /// Returns how many of the entry's compressed bytes have not yet been pulled from the upstream reader.
    ///
    /// Bytes held in the internal buffer count as pulled, so this is exactly what remains before the next record.
    pub(crate) fn unread_compressed(&self) -> u64 {
        self.bounded().get_ref().limit()
    }

    /// Returns the upstream reader, positioned [`CompressedReader::unread_compressed`] bytes before the entry's end.
    pub(crate) fn into_inner(self) -> R {
        let bounded = match self {
            CompressedReader::Stored(inner) => inner,
            #[cfg(feature = "deflate")]
            CompressedReader::Deflate(inner) => inner.into_inner(),
            #[cfg(feature = "deflate64")]
            CompressedReader::Deflate64(inner) => inner.into_inner(),
            #[cfg(feature = "bzip2")]
            CompressedReader::Bz(inner) => inner.into_inner(),
            #[cfg(feature = "lzma")]
            CompressedReader::Lzma(inner) => inner.into_inner(),
            #[cfg(feature = "zstd")]
            CompressedReader::Zstd(inner) => inner.into_inner(),
            #[cfg(feature = "xz")]
            CompressedReader::Xz(inner) => inner.into_inner(),
        };

        bounded.into_inner().into_inner()
    }
}

impl<R> AsyncRead for CompressedReader<R>
where
    R: AsyncRead + Unpin,
{
    fn poll_read(self: Pin<&mut Self>, c: &mut Context<'_>, b: &mut [u8]) -> Poll<std::io::Result<usize>> {
        match self.project() {
            CompressedReaderProj::Stored(inner) => inner.poll_read(c, b),
            #[cfg(feature = "deflate")]
            CompressedReaderProj::Deflate(inner) => inner.poll_read(c, b),
            #[cfg(feature = "deflate64")]
            CompressedReaderProj::Deflate64(inner) => inner.poll_read(c, b),
            #[cfg(feature = "bzip2")]
            CompressedReaderProj::Bz(inner) => inner.poll_read(c, b),
            #[cfg(feature = "lzma")]
            CompressedReaderProj::Lzma(inner) => inner.poll_read(c, b),
            #[cfg(feature = "zstd")]
            CompressedReaderProj::Zstd(inner) => inner.poll_read(c, b),
            #[cfg(feature = "xz")]
            CompressedReaderProj::Xz(inner) => inner.poll_read(c, b),
        }
    }
}
