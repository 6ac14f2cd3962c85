//! Dual AEAD layer.
//!
//! The 64-byte master key is split in half: AES-256-GCM takes the first
//! 32 bytes, XChaCha20-Poly1305 the last 32. Chunks are encrypted inner
//! (AES) then outer (XChaCha), so a break of either single algorithm
//! still leaves one independent barrier.

pub mod aes;
pub mod chacha;

pub use aes::AesLayer;
pub use chacha::ChaChaLayer;

use crate::error::Result;
use crate::kdf::MasterKey;

/// Both AEAD layers, keyed from one master key.
pub struct LayeredCipher {
    aes: AesLayer,
    chacha: ChaChaLayer,
}

impl LayeredCipher {
    /// Splits the master key into the two layer keys.
    pub fn new(key: &MasterKey) -> Result<Self> {
        Ok(Self {
            aes: AesLayer::new(key.aes_half())?,
            chacha: ChaChaLayer::new(key.chacha_half())?,
        })
    }

    /// Inner encryption layer (applied first on the encrypt path).
    #[inline]
    pub fn encrypt_inner(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        self.aes.encrypt(plaintext)
    }

    /// Inner decryption layer (applied last on the decrypt path).
    #[inline]
    pub fn decrypt_inner(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.aes.decrypt(ciphertext)
    }

    /// Outer encryption layer.
    #[inline]
    pub fn encrypt_outer(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        self.chacha.encrypt(plaintext)
    }

    /// Outer decryption layer.
    #[inline]
    pub fn decrypt_outer(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.chacha.decrypt(ciphertext)
    }
}
