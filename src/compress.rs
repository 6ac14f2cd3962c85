//! Chunk compression using DEFLATE with zlib framing.
//!
//! Compression runs before encryption; for data at rest the usual
//! compress-then-encrypt caveats do not apply.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::error::{Error, Result};

/// Compression effort.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Store only, no compression.
    None,

    /// Fastest compression; what the chunk pipeline uses.
    #[default]
    Fast,

    /// zlib's balanced default (level 6).
    Default,

    /// Best ratio, slowest.
    Best,
}

impl From<Level> for Compression {
    fn from(level: Level) -> Self {
        match level {
            Level::None => Self::none(),
            Level::Fast => Self::fast(),
            Level::Default => Self::default(),
            Level::Best => Self::best(),
        }
    }
}

/// zlib compressor with a fixed level.
pub struct Compressor {
    level: Compression,
}

impl Compressor {
    /// Creates a compressor at the given level.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level: level.into() }
    }

    /// Compresses a chunk.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyPlaintext`] on empty input,
    /// [`Error::CompressionFailed`] if the encoder fails.
    pub fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        if data.is_empty() {
            return Err(Error::EmptyPlaintext);
        }

        let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2), self.level);
        encoder.write_all(data).map_err(Error::CompressionFailed)?;
        encoder.finish().map_err(Error::CompressionFailed)
    }

    /// Decompresses a chunk, surfacing any framing or checksum error.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyCiphertext`] on empty input,
    /// [`Error::DecompressionFailed`] on any zlib error.
    pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
        if data.is_empty() {
            return Err(Error::EmptyCiphertext);
        }

        let mut decoder = ZlibDecoder::new(data);
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).map_err(Error::DecompressionFailed)?;
        Ok(out)
    }
}
