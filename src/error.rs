//! Error taxonomy for the encryption core.
//!
//! Every failure mode has a distinct kind so callers can react to what
//! happened rather than parse message strings. Errors propagate upward
//! unchanged in kind; the pipeline wraps them with stage and chunk
//! context on the way out.

use std::io;

use thiserror::Error;

use crate::config::{MIN_CHUNK_SIZE, SALT_LEN};

/// Result alias used throughout the core.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// All failure kinds produced by the encryption core.
#[derive(Debug, Error)]
pub enum Error {
    // Key derivation.
    #[error("password cannot be empty")]
    EmptyPassword,

    #[error("salt must be {SALT_LEN} bytes, got {0}")]
    InvalidSalt(usize),

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("system rng failure: {0}")]
    Rng(String),

    // AEAD layers.
    #[error("cipher key must be {expected} bytes, got {actual}")]
    InvalidKeySize { expected: usize, actual: usize },

    #[error("plaintext cannot be empty")]
    EmptyPlaintext,

    #[error("ciphertext cannot be empty")]
    EmptyCiphertext,

    #[error("ciphertext too short: need at least {need} bytes, got {got}")]
    CiphertextTooShort { need: usize, got: usize },

    #[error("{layer} authentication failed")]
    AuthFailure { layer: &'static str },

    // Compression.
    #[error("compression failed: {0}")]
    CompressionFailed(#[source] io::Error),

    #[error("decompression failed: {0}")]
    DecompressionFailed(#[source] io::Error),

    // PKCS#7 padding.
    #[error("padding failed: {0}")]
    PaddingFailed(String),

    #[error("invalid padding")]
    UnpaddingFailed,

    // Reed-Solomon.
    #[error("erasure encoding failed: {0}")]
    EncodingFailed(String),

    #[error("erasure reconstruction failed: {0}")]
    ReconstructionFailed(String),

    // Header.
    #[error("not a sealbox container (bad magic)")]
    InvalidMagic,

    #[error("unsupported container version {0}")]
    UnsupportedVersion(u16),

    #[error("invalid header: {0}")]
    InvalidHeader(&'static str),

    #[error("incorrect password or corrupt file")]
    HeaderAuthFailure,

    // Driver input validation.
    #[error("cannot encrypt an empty input")]
    EmptyInput,

    // Framed chunk I/O.
    #[error("chunk size {0} below the {MIN_CHUNK_SIZE}-byte minimum")]
    ChunkSizeTooSmall(usize),

    #[error("chunk of {0} bytes exceeds the frame limit")]
    ChunkTooLarge(usize),

    #[error("unexpected end of input while reading {0}")]
    IncompleteRead(&'static str),

    // Pipeline control.
    #[error("operation cancelled")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] io::Error),

    // Stage context added at the pipeline boundary.
    #[error("chunk {index}: {source}")]
    Chunk {
        index: u64,
        #[source]
        source: Box<Error>,
    },

    #[error("reader error: {0}")]
    Reader(#[source] Box<Error>),

    #[error("writer error: {0}")]
    Writer(#[source] Box<Error>),
}

impl Error {
    /// Tags an error with the index of the chunk it occurred in.
    #[must_use]
    pub fn for_chunk(self, index: u64) -> Self {
        Self::Chunk { index, source: Box::new(self) }
    }

    /// True when the root cause is cooperative cancellation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Cancelled => true,
            Self::Chunk { source, .. } | Self::Reader(source) | Self::Writer(source) => source.is_cancelled(),
            _ => false,
        }
    }
}
