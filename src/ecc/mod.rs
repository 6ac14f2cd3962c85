//! Reed-Solomon erasure coding over GF(2^8).
//!
//! Each chunk's outer ciphertext is split into [`DATA_SHARDS`] data
//! shards plus [`PARITY_SHARDS`] parity shards and written with every
//! shard present. The codec never trims to the pre-encode length; the
//! layers beneath it absorb the shard-boundary zero padding (the outer
//! ciphertext length is always a multiple of the data shard count).

pub mod shards;

use reed_solomon_erasure::galois_8::ReedSolomon;

use crate::config::{DATA_SHARDS, MAX_ENCODE_LEN, PARITY_SHARDS};
use crate::ecc::shards::ShardLayout;
use crate::error::{Error, Result};

/// Reed-Solomon codec with a fixed (data, parity) geometry.
pub struct ErasureCoder {
    codec: ReedSolomon,
    layout: ShardLayout,
}

impl ErasureCoder {
    /// Creates a codec. Shard counts must each be at least 1 and total
    /// at most 255 (the GF(2^8) limit).
    pub fn new(data_shards: usize, parity_shards: usize) -> Result<Self> {
        let codec = ReedSolomon::new(data_shards, parity_shards)
            .map_err(|e| Error::EncodingFailed(format!("invalid shard geometry: {e}")))?;
        Ok(Self { codec, layout: ShardLayout::new(data_shards, parity_shards) })
    }

    /// Encodes `data`, returning all shards concatenated in index order.
    ///
    /// Output length is `total_shards * ceil(len / data_shards)`.
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        if data.is_empty() {
            return Err(Error::EncodingFailed("input cannot be empty".into()));
        }
        if data.len() > MAX_ENCODE_LEN {
            return Err(Error::EncodingFailed(format!("input of {} bytes exceeds {MAX_ENCODE_LEN}", data.len())));
        }

        let mut shards = self.layout.split_for_encode(data);
        self.codec
            .encode(&mut shards)
            .map_err(|e| Error::EncodingFailed(e.to_string()))?;

        Ok(self.layout.combine(&shards))
    }

    /// Decodes an encoded buffer back to the data-shard byte stream.
    ///
    /// With every shard present reconstruction is a no-op; the value of
    /// the parity is that a reader with known-missing shards can refill
    /// them. Corrupt-but-present shards pass through and are caught by
    /// the AEAD layer above.
    pub fn decode(&self, encoded: &[u8]) -> Result<Vec<u8>> {
        if encoded.is_empty() {
            return Err(Error::ReconstructionFailed("input cannot be empty".into()));
        }
        if !encoded.len().is_multiple_of(self.layout.total()) {
            return Err(Error::ReconstructionFailed(format!(
                "length {} not divisible by {} shards",
                encoded.len(),
                self.layout.total()
            )));
        }

        let mut shards: Vec<Option<Vec<u8>>> = self.layout.split_encoded(encoded).into_iter().map(Some).collect();
        self.codec
            .reconstruct(&mut shards)
            .map_err(|e| Error::ReconstructionFailed(e.to_string()))?;

        let restored: Vec<Vec<u8>> = shards.into_iter().flatten().collect();
        self.layout.extract_data(&restored)
    }

    /// Recovers data when some shard positions are known to be missing.
    ///
    /// `shards` holds `total_shards` entries with `None` at the missing
    /// positions; at most `parity_shards` may be absent.
    pub fn reconstruct(&self, shards: &mut Vec<Option<Vec<u8>>>) -> Result<Vec<u8>> {
        self.codec
            .reconstruct(shards)
            .map_err(|e| Error::ReconstructionFailed(e.to_string()))?;

        let restored: Vec<Vec<u8>> = shards.iter().flatten().cloned().collect();
        self.layout.extract_data(&restored)
    }
}

impl Default for ErasureCoder {
    /// The chunk pipeline geometry: (4, 10), 14 shards total.
    fn default() -> Self {
        Self::new(DATA_SHARDS, PARITY_SHARDS).expect("constant geometry is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TOTAL_SHARDS;

    #[test]
    fn roundtrip_exact_multiple() {
        let rs = ErasureCoder::default();
        // 16 bytes: 4 per shard, no zero padding.
        let data: Vec<u8> = (0u8..16).collect();
        let encoded = rs.encode(&data).unwrap();
        assert_eq!(encoded.len(), TOTAL_SHARDS * 4);
        assert_eq!(rs.decode(&encoded).unwrap(), data);
    }

    #[test]
    fn roundtrip_with_tail_padding() {
        let rs = ErasureCoder::default();
        let data = vec![0x5Au8; 21];
        let decoded = rs.decode(&rs.encode(&data).unwrap()).unwrap();
        // The codec does not trim: output is padded to the shard grid.
        assert_eq!(decoded.len(), DATA_SHARDS * 21usize.div_ceil(DATA_SHARDS));
        assert_eq!(&decoded[..21], &data[..]);
        assert!(decoded[21..].iter().all(|&b| b == 0));
    }

    #[test]
    fn expansion_ratio_matches_geometry() {
        let rs = ErasureCoder::default();
        let encoded = rs.encode(&[1u8; 4000]).unwrap();
        assert_eq!(encoded.len(), 4000 * TOTAL_SHARDS / DATA_SHARDS);
    }

    #[test]
    fn recovers_missing_shards() {
        let rs = ErasureCoder::default();
        let data: Vec<u8> = (0..64u8).collect();
        let encoded = rs.encode(&data).unwrap();

        let shard_size = encoded.len() / TOTAL_SHARDS;
        let mut shards: Vec<Option<Vec<u8>>> =
            encoded.chunks(shard_size).map(|s| Some(s.to_vec())).collect();

        // Knock out as many shards as there is parity.
        for slot in shards.iter_mut().take(PARITY_SHARDS) {
            *slot = None;
        }

        let restored = rs.reconstruct(&mut shards).unwrap();
        assert_eq!(&restored[..data.len()], &data[..]);
    }

    #[test]
    fn too_many_missing_shards_fail() {
        let rs = ErasureCoder::default();
        let encoded = rs.encode(&[7u8; 64]).unwrap();

        let shard_size = encoded.len() / TOTAL_SHARDS;
        let mut shards: Vec<Option<Vec<u8>>> =
            encoded.chunks(shard_size).map(|s| Some(s.to_vec())).collect();
        for slot in shards.iter_mut().take(PARITY_SHARDS + 1) {
            *slot = None;
        }

        assert!(matches!(rs.reconstruct(&mut shards), Err(Error::ReconstructionFailed(_))));
    }

    #[test]
    fn rejects_empty_and_misaligned_input() {
        let rs = ErasureCoder::default();
        assert!(rs.encode(&[]).is_err());
        assert!(rs.decode(&[]).is_err());
        assert!(rs.decode(&[0u8; TOTAL_SHARDS + 1]).is_err());
    }

    #[test]
    fn rejects_bad_geometry() {
        assert!(ErasureCoder::new(0, 1).is_err());
        assert!(ErasureCoder::new(200, 100).is_err());
    }
}
