//! AES-256-GCM layer.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};

use crate::config::{AES_NONCE_LEN, CIPHER_KEY_LEN};
use crate::error::{Error, Result};
use crate::kdf;

/// AES-256-GCM with a random nonce prepended to every ciphertext.
pub struct AesLayer {
    aead: Aes256Gcm,
}

impl AesLayer {
    /// Creates the layer from a 32-byte key.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidKeySize`] when the key is not 32 bytes.
    pub fn new(key: &[u8]) -> Result<Self> {
        let aead = Aes256Gcm::new_from_slice(key)
            .map_err(|_| Error::InvalidKeySize { expected: CIPHER_KEY_LEN, actual: key.len() })?;
        Ok(Self { aead })
    }

    /// Encrypts `plaintext`, returning `nonce ‖ ciphertext ‖ tag`.
    ///
    /// A fresh random 12-byte nonce is drawn per call, so identical
    /// plaintexts never repeat on the wire.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        if plaintext.is_empty() {
            return Err(Error::EmptyPlaintext);
        }

        let nonce_bytes: [u8; AES_NONCE_LEN] = kdf::random_bytes()?;
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .aead
            .encrypt(nonce, plaintext)
            .map_err(|_| Error::AuthFailure { layer: "aes-256-gcm" })?;

        let mut out = Vec::with_capacity(AES_NONCE_LEN + ciphertext.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    /// Decrypts `nonce ‖ ciphertext ‖ tag`, verifying the tag.
    pub fn decrypt(&self, input: &[u8]) -> Result<Vec<u8>> {
        if input.is_empty() {
            return Err(Error::EmptyCiphertext);
        }
        if input.len() < AES_NONCE_LEN {
            return Err(Error::CiphertextTooShort { need: AES_NONCE_LEN, got: input.len() });
        }

        let (nonce_bytes, ciphertext) = input.split_at(AES_NONCE_LEN);
        self.aead
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| Error::AuthFailure { layer: "aes-256-gcm" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer() -> AesLayer {
        AesLayer::new(&[0u8; CIPHER_KEY_LEN]).unwrap()
    }

    #[test]
    fn roundtrip() {
        let ciphertext = layer().encrypt(b"some chunk bytes").unwrap();
        assert_eq!(layer().decrypt(&ciphertext).unwrap(), b"some chunk bytes");
    }

    #[test]
    fn nonces_are_fresh() {
        let l = layer();
        assert_ne!(l.encrypt(b"same input").unwrap(), l.encrypt(b"same input").unwrap());
    }

    #[test]
    fn rejects_bad_key_size() {
        assert!(matches!(AesLayer::new(&[0u8; 16]), Err(Error::InvalidKeySize { actual: 16, .. })));
    }

    #[test]
    fn rejects_empty_plaintext() {
        assert!(matches!(layer().encrypt(b""), Err(Error::EmptyPlaintext)));
    }

    #[test]
    fn rejects_empty_and_short_ciphertext() {
        assert!(matches!(layer().decrypt(&[]), Err(Error::EmptyCiphertext)));
        assert!(matches!(layer().decrypt(&[0u8; AES_NONCE_LEN - 1]), Err(Error::CiphertextTooShort { .. })));
    }

    #[test]
    fn detects_tampering() {
        let mut ciphertext = layer().encrypt(b"some chunk bytes").unwrap();
        *ciphertext.last_mut().unwrap() ^= 0x01;
        assert!(matches!(layer().decrypt(&ciphertext), Err(Error::AuthFailure { .. })));
    }
}
