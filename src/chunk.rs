//! Per-chunk transformation pipeline.
//!
//! Encrypt path: compress → pad → AES-256-GCM → XChaCha20-Poly1305 →
//! Reed-Solomon. Decrypt path runs the exact inverse. The processor is
//! stateless apart from its keyed cipher contexts, so one instance is
//! shared read-only across all workers.

use crate::cipher::LayeredCipher;
use crate::compress::{Compressor, Level};
use crate::config::PAD_BLOCK;
use crate::ecc::ErasureCoder;
use crate::error::Result;
use crate::kdf::MasterKey;
use crate::padding::Pkcs7;
use crate::types::{Direction, Task, TaskResult};

/// Stateless chunk transformer for one direction.
pub struct ChunkProcessor {
    cipher: LayeredCipher,
    coder: ErasureCoder,
    compressor: Compressor,
    padding: Pkcs7,
    direction: Direction,
}

impl ChunkProcessor {
    /// Builds a processor keyed by the master key.
    pub fn new(key: &MasterKey, direction: Direction) -> Result<Self> {
        Ok(Self {
            cipher: LayeredCipher::new(key)?,
            coder: ErasureCoder::default(),
            compressor: Compressor::new(Level::Fast),
            padding: Pkcs7::new(PAD_BLOCK)?,
            direction,
        })
    }

    /// Runs one task through the pipeline for this direction.
    ///
    /// Failures are captured in the result rather than returned, so a
    /// bad chunk reaches the writer with its index intact.
    #[must_use]
    pub fn process(&self, task: &Task) -> TaskResult {
        let transformed = match self.direction {
            Direction::Encrypt => self.seal(&task.data),
            Direction::Decrypt => self.open(&task.data),
        };

        match transformed {
            Ok(data) => {
                // Progress counts input bytes when encrypting and output
                // bytes when decrypting, both measured in plaintext.
                let size = match self.direction {
                    Direction::Encrypt => task.data.len(),
                    Direction::Decrypt => data.len(),
                };
                TaskResult::ok(task.index, data, size)
            }
            Err(e) => TaskResult::err(task.index, e.for_chunk(task.index)),
        }
    }

    /// Forward pipeline: plaintext chunk to erasure-coded ciphertext.
    fn seal(&self, data: &[u8]) -> Result<Vec<u8>> {
        let compressed = self.compressor.compress(data)?;
        let padded = self.padding.pad(&compressed);
        let inner = self.cipher.encrypt_inner(&padded)?;
        let outer = self.cipher.encrypt_outer(&inner)?;
        self.coder.encode(&outer)
    }

    /// Inverse pipeline: erasure-coded ciphertext to plaintext chunk.
    ///
    /// The decode step returns the outer ciphertext zero-padded to the
    /// shard grid; the padded length always equals the true ciphertext
    /// length because every layer above keeps it divisible by the data
    /// shard count (16-byte blocks plus 68 bytes of nonce/tag overhead).
    fn open(&self, data: &[u8]) -> Result<Vec<u8>> {
        let outer = self.coder.decode(data)?;
        let inner = self.cipher.decrypt_outer(&outer)?;
        let padded = self.cipher.decrypt_inner(&inner)?;
        let compressed = self.padding.unpad(&padded)?;
        Compressor::decompress(&compressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MASTER_KEY_LEN, TOTAL_SHARDS};
    use crate::error::Error;

    fn key() -> MasterKey {
        MasterKey::from_bytes([0x33; MASTER_KEY_LEN])
    }

    fn task(data: &[u8]) -> Task {
        Task { data: data.to_vec(), index: 0 }
    }

    #[test]
    fn seal_open_roundtrip() {
        let sealer = ChunkProcessor::new(&key(), Direction::Encrypt).unwrap();
        let opener = ChunkProcessor::new(&key(), Direction::Decrypt).unwrap();

        let sealed = sealer.process(&task(b"a modest chunk of plaintext"));
        assert!(sealed.error.is_none());
        assert_eq!(sealed.size, 27);

        let opened = opener.process(&Task { data: sealed.data, index: 0 });
        assert!(opened.error.is_none());
        assert_eq!(opened.data, b"a modest chunk of plaintext");
        assert_eq!(opened.size, 27);
    }

    #[test]
    fn sealed_chunk_lands_on_shard_grid() {
        let sealer = ChunkProcessor::new(&key(), Direction::Encrypt).unwrap();
        let sealed = sealer.process(&task(&[0u8; 1000]));
        assert!(sealed.data.len().is_multiple_of(TOTAL_SHARDS));
    }

    #[test]
    fn wrong_key_fails_at_outer_layer() {
        let sealer = ChunkProcessor::new(&key(), Direction::Encrypt).unwrap();
        let opener = ChunkProcessor::new(&MasterKey::from_bytes([0x44; MASTER_KEY_LEN]), Direction::Decrypt).unwrap();

        let sealed = sealer.process(&task(b"secret"));
        let opened = opener.process(&Task { data: sealed.data, index: 5 });

        match opened.error {
            Some(Error::Chunk { index: 5, source }) => {
                assert!(matches!(*source, Error::AuthFailure { layer: "xchacha20-poly1305" }));
            }
            other => panic!("expected chunk-tagged auth failure, got {other:?}"),
        }
    }

    #[test]
    fn tampered_chunk_never_opens_silently() {
        let sealer = ChunkProcessor::new(&key(), Direction::Encrypt).unwrap();
        let opener = ChunkProcessor::new(&key(), Direction::Decrypt).unwrap();

        let mut sealed = sealer.process(&task(&[0xAA; 4096])).data;
        // Byte 5 is in data shard 0; with every shard present,
        // reconstruction cannot repair it and the outer AEAD must
        // reject the chunk. (Parity-shard flips are absorbed instead.)
        sealed[5] ^= 0x01;

        let opened = opener.process(&Task { data: sealed, index: 0 });
        assert!(opened.error.is_some());
    }

    #[test]
    fn empty_chunk_is_rejected() {
        let sealer = ChunkProcessor::new(&key(), Direction::Encrypt).unwrap();
        let result = sealer.process(&task(b""));
        assert!(result.error.is_some());
    }
}
