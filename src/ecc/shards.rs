//! Shard splitting and recombination for the erasure codec.

use crate::error::{Error, Result};

/// Geometry of a (data, parity) shard layout.
pub struct ShardLayout {
    data_shards: usize,
    parity_shards: usize,
}

impl ShardLayout {
    #[must_use]
    pub fn new(data_shards: usize, parity_shards: usize) -> Self {
        Self { data_shards, parity_shards }
    }

    #[inline]
    #[must_use]
    pub fn total(&self) -> usize {
        self.data_shards + self.parity_shards
    }

    /// Splits raw data into `total()` shards of `ceil(len / data_shards)`
    /// bytes each. The data shards are filled sequentially and
    /// zero-padded on the right; parity shards start zeroed.
    #[must_use]
    pub fn split_for_encode(&self, data: &[u8]) -> Vec<Vec<u8>> {
        let shard_size = data.len().div_ceil(self.data_shards);
        let mut shards: Vec<Vec<u8>> = (0..self.total()).map(|_| vec![0u8; shard_size]).collect();

        for (idx, piece) in data.chunks(shard_size).enumerate() {
            shards[idx][..piece.len()].copy_from_slice(piece);
        }

        shards
    }

    /// Splits an encoded buffer back into its `total()` equal shards.
    ///
    /// The caller has already checked divisibility by `total()`.
    #[must_use]
    pub fn split_encoded(&self, encoded: &[u8]) -> Vec<Vec<u8>> {
        let shard_size = encoded.len() / self.total();
        encoded.chunks(shard_size).map(<[u8]>::to_vec).collect()
    }

    /// Concatenates all shards, data then parity, in index order.
    #[must_use]
    pub fn combine(&self, shards: &[Vec<u8>]) -> Vec<u8> {
        let mut out = Vec::with_capacity(shards.iter().map(Vec::len).sum());
        for shard in shards {
            out.extend_from_slice(shard);
        }
        out
    }

    /// Concatenates only the data shards, recovering the pre-parity
    /// byte stream (still zero-padded to the shard boundary).
    pub fn extract_data(&self, shards: &[Vec<u8>]) -> Result<Vec<u8>> {
        if shards.len() < self.data_shards {
            return Err(Error::ReconstructionFailed(format!(
                "have {} shards, need at least {}",
                shards.len(),
                self.data_shards
            )));
        }

        let mut out = Vec::with_capacity(shards.iter().take(self.data_shards).map(Vec::len).sum());
        for shard in shards.iter().take(self.data_shards) {
            out.extend_from_slice(shard);
        }
        Ok(out)
    }
}
