//! Chunk reader: turns an input stream into a sequence of tasks.
//!
//! Encryption reads fixed-size plaintext chunks; decryption reads the
//! 4-byte big-endian length prefix and then exactly that many bytes.
//! Indices are assigned in input order starting at 0.

use std::io::Read;

use flume::Sender;

use crate::config::MIN_CHUNK_SIZE;
use crate::error::{Error, Result};
use crate::stream::cancel::CancelToken;
use crate::types::{Direction, Task};
use crate::util::{read_exact_vec, read_frame_prefix};

/// Produces [`Task`]s from an input stream.
pub struct ChunkReader {
    direction: Direction,
    chunk_size: usize,
}

impl ChunkReader {
    /// Creates a reader. `chunk_size` only applies to encryption and
    /// must be at least [`MIN_CHUNK_SIZE`].
    pub fn new(direction: Direction, chunk_size: usize) -> Result<Self> {
        if chunk_size < MIN_CHUNK_SIZE {
            return Err(Error::ChunkSizeTooSmall(chunk_size));
        }
        Ok(Self { direction, chunk_size })
    }

    /// Reads the whole input, sending each chunk as an owned task.
    ///
    /// Returns when the input is exhausted, the task channel closes
    /// (downstream gave up), or cancellation trips between chunks.
    pub fn read_all<R: Read>(&self, input: R, tasks: &Sender<Task>, cancel: &CancelToken) -> Result<()> {
        match self.direction {
            Direction::Encrypt => self.read_plain(input, tasks, cancel),
            Direction::Decrypt => Self::read_framed(input, tasks, cancel),
        }
    }

    fn read_plain<R: Read>(&self, mut input: R, tasks: &Sender<Task>, cancel: &CancelToken) -> Result<()> {
        let mut buffer = vec![0u8; self.chunk_size];
        let mut index = 0u64;

        loop {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            let n = fill_chunk(&mut input, &mut buffer)?;
            if n == 0 {
                return Ok(());
            }

            let task = Task { data: buffer[..n].to_vec(), index };
            if tasks.send(task).is_err() {
                // Downstream hung up; the writer owns the real error.
                return Ok(());
            }
            index += 1;
        }
    }

    fn read_framed<R: Read>(mut input: R, tasks: &Sender<Task>, cancel: &CancelToken) -> Result<()> {
        let mut index = 0u64;

        loop {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            // Clean EOF on the prefix boundary ends the sequence; a
            // partial prefix means the file was cut mid-frame.
            let Some(prefix) = read_frame_prefix(&mut input, "chunk length")? else {
                return Ok(());
            };
            let len = u32::from_be_bytes(prefix) as usize;
            if len == 0 {
                continue;
            }

            let data = read_exact_vec(&mut input, len, "chunk data")?;
            if tasks.send(Task { data, index }).is_err() {
                return Ok(());
            }
            index += 1;
        }
    }
}

/// Reads until `buf` is full or EOF; a short `read` is not a chunk
/// boundary.
fn fill_chunk<R: Read>(input: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match input.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn collect_tasks(reader: &ChunkReader, input: Vec<u8>) -> (Result<()>, Vec<Task>) {
        let (tx, rx) = flume::unbounded();
        let outcome = reader.read_all(Cursor::new(input), &tx, &CancelToken::new());
        drop(tx);
        (outcome, rx.into_iter().collect())
    }

    #[test]
    fn rejects_undersized_chunks() {
        assert!(ChunkReader::new(Direction::Encrypt, MIN_CHUNK_SIZE - 1).is_err());
        assert!(ChunkReader::new(Direction::Encrypt, MIN_CHUNK_SIZE).is_ok());
    }

    #[test]
    fn plain_chunks_are_fixed_size_with_short_tail() {
        let reader = ChunkReader::new(Direction::Encrypt, MIN_CHUNK_SIZE).unwrap();
        let (outcome, tasks) = collect_tasks(&reader, vec![7u8; MIN_CHUNK_SIZE + 100]);

        outcome.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].index, 0);
        assert_eq!(tasks[0].data.len(), MIN_CHUNK_SIZE);
        assert_eq!(tasks[1].index, 1);
        assert_eq!(tasks[1].data.len(), 100);
    }

    #[test]
    fn plain_exact_multiple_has_no_empty_tail() {
        let reader = ChunkReader::new(Direction::Encrypt, MIN_CHUNK_SIZE).unwrap();
        let (outcome, tasks) = collect_tasks(&reader, vec![7u8; MIN_CHUNK_SIZE]);

        outcome.unwrap();
        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn framed_chunks_follow_their_prefixes() {
        let mut input = Vec::new();
        input.extend_from_slice(&5u32.to_be_bytes());
        input.extend_from_slice(b"alpha");
        input.extend_from_slice(&4u32.to_be_bytes());
        input.extend_from_slice(b"beta");

        let reader = ChunkReader::new(Direction::Decrypt, MIN_CHUNK_SIZE).unwrap();
        let (outcome, tasks) = collect_tasks(&reader, input);

        outcome.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].data, b"alpha");
        assert_eq!(tasks[1].data, b"beta");
        assert_eq!(tasks[1].index, 1);
    }

    #[test]
    fn zero_length_frames_are_skipped() {
        let mut input = Vec::new();
        input.extend_from_slice(&0u32.to_be_bytes());
        input.extend_from_slice(&3u32.to_be_bytes());
        input.extend_from_slice(b"end");

        let reader = ChunkReader::new(Direction::Decrypt, MIN_CHUNK_SIZE).unwrap();
        let (outcome, tasks) = collect_tasks(&reader, input);

        outcome.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].data, b"end");
        assert_eq!(tasks[0].index, 0);
    }

    #[test]
    fn truncated_frame_body_is_fatal() {
        let mut input = Vec::new();
        input.extend_from_slice(&10u32.to_be_bytes());
        input.extend_from_slice(b"short");

        let reader = ChunkReader::new(Direction::Decrypt, MIN_CHUNK_SIZE).unwrap();
        let (outcome, _) = collect_tasks(&reader, input);
        assert!(matches!(outcome, Err(Error::IncompleteRead("chunk data"))));
    }

    #[test]
    fn truncated_prefix_is_fatal() {
        let reader = ChunkReader::new(Direction::Decrypt, MIN_CHUNK_SIZE).unwrap();
        let (outcome, _) = collect_tasks(&reader, vec![0u8, 0, 1]);
        assert!(matches!(outcome, Err(Error::IncompleteRead("chunk length"))));
    }

    #[test]
    fn cancellation_stops_reading() {
        let cancel = CancelToken::new();
        cancel.cancel();

        let reader = ChunkReader::new(Direction::Encrypt, MIN_CHUNK_SIZE).unwrap();
        let (tx, _rx) = flume::unbounded();
        let outcome = reader.read_all(Cursor::new(vec![1u8; MIN_CHUNK_SIZE]), &tx, &cancel);
        assert!(matches!(outcome, Err(Error::Cancelled)));
    }
}
