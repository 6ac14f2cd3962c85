//! Chunk writer: drains results in order and frames the output.
//!
//! Consumes [`TaskResult`]s, restores sequence through the reorder
//! queue, and writes each chunk. Encryption output is framed with a
//! 4-byte big-endian length prefix; decryption output is the raw bytes.
//! The writer is where chunk failures surface: the first failed result
//! trips cancellation and aborts the pipeline.

use std::io::Write;

use flume::Receiver;

use crate::error::{Error, Result};
use crate::stream::cancel::CancelToken;
use crate::stream::order::ReorderQueue;
use crate::types::{Direction, ProgressSink, TaskResult};

/// Writes processed chunks to the output stream in index order.
pub struct ChunkWriter {
    direction: Direction,
    queue: ReorderQueue,
}

impl ChunkWriter {
    #[must_use]
    pub fn new(direction: Direction) -> Self {
        Self { direction, queue: ReorderQueue::new(0) }
    }

    /// Drains the results channel until it closes, then flushes.
    ///
    /// Channel closure is the only end-of-stream signal: it means every
    /// worker has exited and nothing more can arrive. The receiver is
    /// consumed so that an early return drops it, which unblocks any
    /// worker parked on a full channel.
    pub fn write_all<W: Write>(
        &mut self,
        mut output: W,
        results: Receiver<TaskResult>,
        progress: &dyn ProgressSink,
        cancel: &CancelToken,
    ) -> Result<()> {
        while let Ok(result) = results.recv() {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            if let Some(error) = result.error {
                // Stop the other stages before surfacing the failure.
                cancel.cancel();
                return Err(error);
            }

            let ready = self.queue.push(result);
            self.write_batch(&mut output, &ready, progress).inspect_err(|_| cancel.cancel())?;
        }

        let leftover = self.queue.flush();
        self.write_batch(&mut output, &leftover, progress).inspect_err(|_| cancel.cancel())?;

        output.flush()?;
        Ok(())
    }

    fn write_batch<W: Write>(&self, output: &mut W, batch: &[TaskResult], progress: &dyn ProgressSink) -> Result<()> {
        for result in batch {
            if self.direction == Direction::Encrypt {
                let len = u32::try_from(result.data.len()).map_err(|_| Error::ChunkTooLarge(result.data.len()))?;
                output.write_all(&len.to_be_bytes())?;
            }
            output.write_all(&result.data)?;
            progress.add(result.size as u64)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;
    use crate::types::NullSink;

    struct CountingSink(AtomicU64);

    impl ProgressSink for CountingSink {
        fn add(&self, delta: u64) -> Result<()> {
            self.0.fetch_add(delta, Ordering::Relaxed);
            Ok(())
        }
    }

    fn run_writer(direction: Direction, results: Vec<TaskResult>) -> (Result<()>, Vec<u8>, CancelToken) {
        let (tx, rx) = flume::unbounded();
        for r in results {
            tx.send(r).unwrap();
        }
        drop(tx);

        let cancel = CancelToken::new();
        let mut output = Vec::new();
        let outcome = ChunkWriter::new(direction).write_all(&mut output, rx, &NullSink, &cancel);
        (outcome, output, cancel)
    }

    #[test]
    fn decrypt_mode_writes_raw_bytes() {
        let (outcome, output, _) = run_writer(
            Direction::Decrypt,
            vec![TaskResult::ok(0, b"hello ".to_vec(), 6), TaskResult::ok(1, b"world".to_vec(), 5)],
        );
        outcome.unwrap();
        assert_eq!(output, b"hello world");
    }

    #[test]
    fn encrypt_mode_frames_each_chunk() {
        let (outcome, output, _) = run_writer(Direction::Encrypt, vec![TaskResult::ok(0, b"data".to_vec(), 4)]);
        outcome.unwrap();
        assert_eq!(&output[..4], &4u32.to_be_bytes());
        assert_eq!(&output[4..], b"data");
    }

    #[test]
    fn out_of_order_results_are_reordered() {
        let (outcome, output, _) = run_writer(
            Direction::Decrypt,
            vec![
                TaskResult::ok(2, b"c".to_vec(), 1),
                TaskResult::ok(0, b"a".to_vec(), 1),
                TaskResult::ok(1, b"b".to_vec(), 1),
            ],
        );
        outcome.unwrap();
        assert_eq!(output, b"abc");
    }

    #[test]
    fn failed_result_cancels_and_surfaces() {
        let (outcome, output, cancel) = run_writer(
            Direction::Decrypt,
            vec![TaskResult::ok(0, b"a".to_vec(), 1), TaskResult::err(1, Error::UnpaddingFailed.for_chunk(1))],
        );

        assert!(matches!(outcome, Err(Error::Chunk { index: 1, .. })));
        assert!(cancel.is_cancelled());
        // Chunk 0 may already be on disk; partial output is the caller's
        // problem per the cleanup policy.
        assert_eq!(output, b"a");
    }

    #[test]
    fn progress_counts_result_sizes() {
        let sink = CountingSink(AtomicU64::new(0));
        let (tx, rx) = flume::unbounded();
        tx.send(TaskResult::ok(0, b"xyz".to_vec(), 3)).unwrap();
        tx.send(TaskResult::ok(1, b"pq".to_vec(), 2)).unwrap();
        drop(tx);

        let mut output = Vec::new();
        ChunkWriter::new(Direction::Decrypt)
            .write_all(&mut output, rx, &sink, &CancelToken::new())
            .unwrap();
        assert_eq!(sink.0.load(Ordering::Relaxed), 5);
    }
}
