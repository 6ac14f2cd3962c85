//! Concurrent streaming engine.
//!
//! Three stages share a cancellation scope and two bounded channels:
//!
//! 1. Reader thread: splits the input into indexed tasks.
//! 2. Worker pool: transforms tasks through the chunk pipeline.
//! 3. Writer (calling thread): reorders results and writes them out.
//!
//! Channel capacity equals the worker count, so a slow writer throttles
//! the reader through the pool instead of buffering the whole file.

pub mod cancel;
pub mod order;
pub mod pool;
pub mod reader;
pub mod writer;

use std::io::{Read, Write};
use std::thread;

use tracing::debug;

use crate::chunk::ChunkProcessor;
use crate::error::{Error, Result};
use crate::kdf::MasterKey;
use crate::stream::cancel::CancelToken;
use crate::stream::pool::WorkerPool;
use crate::stream::reader::ChunkReader;
use crate::stream::writer::ChunkWriter;
use crate::types::{Direction, ProgressSink};

/// The assembled three-stage pipeline for one file operation.
pub struct StreamEngine {
    processor: ChunkProcessor,
    direction: Direction,
    chunk_size: usize,
    workers: usize,
}

impl StreamEngine {
    /// Builds an engine keyed by the master key, sized to the host.
    pub fn new(key: &MasterKey, direction: Direction, chunk_size: usize) -> Result<Self> {
        let workers = thread::available_parallelism().map(|p| p.get()).unwrap_or(4);
        Ok(Self { processor: ChunkProcessor::new(key, direction)?, direction, chunk_size, workers })
    }

    /// Overrides the worker count (mainly for tests).
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Streams `input` to `output` through the pipeline.
    ///
    /// Blocks until all three stages finish. The first real error wins:
    /// a failure in any stage trips the shared cancellation scope, the
    /// other stages drain out as `Cancelled`, and those secondary
    /// results are discarded in favor of the cause.
    pub fn run<R, W>(self, input: R, output: W, progress: &dyn ProgressSink) -> Result<()>
    where
        R: Read + Send + 'static,
        W: Write,
    {
        let cancel = CancelToken::new();
        let (task_tx, task_rx) = flume::bounded(self.workers);
        let (result_tx, result_rx) = flume::bounded(self.workers);

        let reader = ChunkReader::new(self.direction, self.chunk_size)?;
        let mut writer = ChunkWriter::new(self.direction);

        let reader_cancel = cancel.clone();
        let reader_handle = thread::spawn(move || reader.read_all(input, &task_tx, &reader_cancel));

        let pool = WorkerPool::new(self.processor, self.workers);
        let pool_cancel = cancel.clone();
        let pool_handle = thread::spawn(move || pool.run(&task_rx, result_tx, &pool_cancel));

        let write_result = writer.write_all(output, result_rx, progress, &cancel);

        let read_result = reader_handle.join().map_err(|_| Error::Reader(Box::new(Error::Io(std::io::Error::other("reader thread panicked")))))?;
        pool_handle.join().map_err(|_| Error::Writer(Box::new(Error::Io(std::io::Error::other("worker pool panicked")))))?;

        debug!(direction = %self.direction, workers = self.workers, "stream pipeline finished");

        Self::settle(write_result, read_result)
    }

    /// Picks the error to surface, ignoring secondary cancellations.
    ///
    /// Everything the writer observed wraps as a writer error, chunk
    /// failures included; reader failures wrap as reader errors.
    fn settle(write_result: Result<()>, read_result: Result<()>) -> Result<()> {
        match (write_result, read_result) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(w), _) if !w.is_cancelled() => Err(Error::Writer(Box::new(w))),
            (_, Err(r)) if !r.is_cancelled() => Err(Error::Reader(Box::new(r))),
            _ => Err(Error::Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::config::{MASTER_KEY_LEN, MIN_CHUNK_SIZE};
    use crate::kdf::MasterKey;
    use crate::types::NullSink;

    fn key() -> MasterKey {
        MasterKey::from_bytes([0x77; MASTER_KEY_LEN])
    }

    fn engine(direction: Direction) -> StreamEngine {
        StreamEngine::new(&key(), direction, MIN_CHUNK_SIZE).unwrap().with_workers(8)
    }

    fn encrypt_buf(plaintext: &[u8]) -> Vec<u8> {
        let mut sealed = Vec::new();
        engine(Direction::Encrypt).run(Cursor::new(plaintext.to_vec()), &mut sealed, &NullSink).unwrap();
        sealed
    }

    #[test]
    fn multi_chunk_roundtrip_preserves_order() {
        // Distinct per-chunk patterns: reordering would corrupt them.
        let mut plaintext = Vec::new();
        for chunk in 0u8..6 {
            plaintext.extend(std::iter::repeat_n(chunk, MIN_CHUNK_SIZE));
        }
        plaintext.extend_from_slice(b"tail");

        let sealed = encrypt_buf(&plaintext);

        let mut opened = Vec::new();
        engine(Direction::Decrypt).run(Cursor::new(sealed), &mut opened, &NullSink).unwrap();
        assert_eq!(opened, plaintext);
    }

    #[test]
    fn framed_output_counts_chunks() {
        let sealed = encrypt_buf(&vec![0xCD; MIN_CHUNK_SIZE * 3]);

        // Walk the frames: expect exactly 3.
        let mut offset = 0;
        let mut frames = 0;
        while offset < sealed.len() {
            let len = u32::from_be_bytes(sealed[offset..offset + 4].try_into().unwrap()) as usize;
            offset += 4 + len;
            frames += 1;
        }
        assert_eq!(offset, sealed.len());
        assert_eq!(frames, 3);
    }

    #[test]
    fn tampered_payload_fails_with_chunk_error() {
        let mut sealed = encrypt_buf(&vec![0xEE; MIN_CHUNK_SIZE]);
        // Flip a byte near the start of the frame body: that is data
        // shard 0, which reconstruction cannot repair when every shard
        // is present. (A flip in the parity tail would be absorbed.)
        sealed[4 + 10] ^= 0xFF;

        let err = engine(Direction::Decrypt).run(Cursor::new(sealed), &mut Vec::new(), &NullSink).unwrap_err();
        // The writer observed the failure, so it arrives writer-wrapped
        // around the chunk-tagged cause.
        assert!(matches!(err, Error::Writer(ref source) if matches!(**source, Error::Chunk { .. })));
    }

    #[test]
    fn parity_tail_corruption_is_absorbed() {
        let plaintext = vec![0xEE; MIN_CHUNK_SIZE];
        let mut sealed = encrypt_buf(&plaintext);
        // The last body byte sits in the final parity shard, which the
        // decoder never reads when all shards are present.
        let last = sealed.len() - 1;
        sealed[last] ^= 0xFF;

        let mut opened = Vec::new();
        engine(Direction::Decrypt).run(Cursor::new(sealed), &mut opened, &NullSink).unwrap();
        assert_eq!(opened, plaintext);
    }

    #[test]
    fn truncated_input_fails_as_reader_error() {
        let sealed = encrypt_buf(b"small");
        let cut = sealed.len() - 10;

        let err = engine(Direction::Decrypt).run(Cursor::new(sealed[..cut].to_vec()), &mut Vec::new(), &NullSink).unwrap_err();
        assert!(matches!(err, Error::Reader(_)));
    }

    #[test]
    fn empty_input_produces_empty_output() {
        // A valid header with zero framed chunks decrypts to nothing.
        let mut opened = Vec::new();
        engine(Direction::Decrypt).run(Cursor::new(Vec::new()), &mut opened, &NullSink).unwrap();
        assert!(opened.is_empty());
    }
}
