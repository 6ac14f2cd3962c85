//! PKCS#7 padding with constant-time removal.
//!
//! Sits between compression and the inner AEAD so ciphertext lengths
//! only reveal the compressed size rounded up to the block. Unpadding
//! happens after both AEAD layers have verified, so a bad pad means the
//! plaintext was tampered with, not merely corrupted in transit.

use subtle::ConstantTimeEq;

use crate::error::{Error, Result};

/// PKCS#7 padder for a fixed block size.
pub struct Pkcs7 {
    block: usize,
}

impl Pkcs7 {
    /// Creates a padder. Block size must be in `1..=255` because the pad
    /// length is stored in a single byte.
    pub fn new(block: usize) -> Result<Self> {
        if block == 0 || block > 255 {
            return Err(Error::PaddingFailed(format!("block size {block} out of range 1..=255")));
        }
        Ok(Self { block })
    }

    /// Appends `k` bytes of value `k`, `k` in `1..=block`.
    ///
    /// Always grows the input; a block-aligned input gains a whole block,
    /// so unpadding is never ambiguous.
    #[must_use]
    pub fn pad(&self, data: &[u8]) -> Vec<u8> {
        let k = self.block - (data.len() % self.block);
        let mut out = Vec::with_capacity(data.len() + k);
        out.extend_from_slice(data);
        out.resize(data.len() + k, k as u8);
        out
    }

    /// Validates and strips the padding.
    ///
    /// All `k` trailing bytes are compared with a single accumulated
    /// verdict; nothing branches on an individual padding byte.
    pub fn unpad(&self, data: &[u8]) -> Result<Vec<u8>> {
        if !data.len().is_multiple_of(self.block) {
            return Err(Error::UnpaddingFailed);
        }
        let Some(&last) = data.last() else {
            return Err(Error::UnpaddingFailed);
        };

        let k = last as usize;
        if k == 0 || k > self.block || k > data.len() {
            return Err(Error::UnpaddingFailed);
        }

        let (content, tail) = data.split_at(data.len() - k);
        let mut diff = 0u8;
        for &b in tail {
            diff |= b ^ (k as u8);
        }
        if !bool::from(diff.ct_eq(&0)) {
            return Err(Error::UnpaddingFailed);
        }

        Ok(content.to_vec())
    }
}
