//! Shared types for the streaming engine.
//!
//! - [`Direction`]: whether the pipeline encrypts or decrypts
//! - [`Task`]: one input chunk with its sequence number
//! - [`TaskResult`]: the processed chunk, or the error that stopped it
//! - [`ProgressSink`]: the only interface the core needs for progress

use strum::Display;

use crate::error::{Error, Result};

/// Direction a pipeline runs in.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    /// Plaintext in, framed ciphertext out.
    Encrypt,

    /// Framed ciphertext in, plaintext out.
    Decrypt,
}

impl Direction {
    /// Progress-bar label for the running operation.
    #[inline]
    #[must_use]
    pub fn progress_label(self) -> &'static str {
        match self {
            Self::Encrypt => "Encrypting",
            Self::Decrypt => "Decrypting",
        }
    }
}

/// A unit of work produced by the chunk reader.
///
/// The buffer is owned by exactly one stage at a time: it is created by
/// the reader, moved into a worker, and released by the writer.
pub struct Task {
    /// Chunk payload.
    pub data: Vec<u8>,

    /// Sequence number assigned in input order, starting at 0.
    pub index: u64,
}

/// Outcome of processing one [`Task`].
pub struct TaskResult {
    /// Original task index, used by the writer to restore order.
    pub index: u64,

    /// Processed payload (empty on failure).
    pub data: Vec<u8>,

    /// Amount to report to the progress sink: the input length when
    /// encrypting, the output length when decrypting.
    pub size: usize,

    /// The error that stopped this chunk, `None` on success.
    pub error: Option<Error>,
}

impl TaskResult {
    /// Builds a successful result.
    #[inline]
    #[must_use]
    pub fn ok(index: u64, data: Vec<u8>, size: usize) -> Self {
        Self { index, data, size, error: None }
    }

    /// Builds a failed result carrying the error for the writer.
    #[inline]
    #[must_use]
    pub fn err(index: u64, error: Error) -> Self {
        Self { index, data: Vec::new(), size: 0, error: Some(error) }
    }
}

/// Receiver for completed-byte counts.
///
/// The core reports progress through this trait and nothing else; the
/// display lives with the caller.
pub trait ProgressSink: Sync {
    /// Records `delta` more bytes of completed work.
    ///
    /// # Errors
    ///
    /// Implementations may fail; the pipeline stops on the first failure.
    fn add(&self, delta: u64) -> Result<()>;
}

/// Sink that discards all progress.
pub struct NullSink;

impl ProgressSink for NullSink {
    #[inline]
    fn add(&self, _delta: u64) -> Result<()> {
        Ok(())
    }
}
