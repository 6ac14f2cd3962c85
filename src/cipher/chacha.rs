//! XChaCha20-Poly1305 layer.
//!
//! The extended 24-byte nonce makes random per-call nonces safe, which
//! keeps out-of-order chunk processing free of nonce coordination.

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};

use crate::config::{CIPHER_KEY_LEN, XCHACHA_NONCE_LEN};
use crate::error::{Error, Result};
use crate::kdf;

/// XChaCha20-Poly1305 with a random nonce prepended to every ciphertext.
pub struct ChaChaLayer {
    aead: XChaCha20Poly1305,
}

impl ChaChaLayer {
    /// Creates the layer from a 32-byte key.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidKeySize`] when the key is not 32 bytes.
    pub fn new(key: &[u8]) -> Result<Self> {
        let aead = XChaCha20Poly1305::new_from_slice(key)
            .map_err(|_| Error::InvalidKeySize { expected: CIPHER_KEY_LEN, actual: key.len() })?;
        Ok(Self { aead })
    }

    /// Encrypts `plaintext`, returning `nonce ‖ ciphertext ‖ tag`.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        if plaintext.is_empty() {
            return Err(Error::EmptyPlaintext);
        }

        let nonce_bytes: [u8; XCHACHA_NONCE_LEN] = kdf::random_bytes()?;
        let nonce = XNonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .aead
            .encrypt(nonce, plaintext)
            .map_err(|_| Error::AuthFailure { layer: "xchacha20-poly1305" })?;

        let mut out = Vec::with_capacity(XCHACHA_NONCE_LEN + ciphertext.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    /// Decrypts `nonce ‖ ciphertext ‖ tag`, verifying the tag.
    pub fn decrypt(&self, input: &[u8]) -> Result<Vec<u8>> {
        if input.is_empty() {
            return Err(Error::EmptyCiphertext);
        }
        if input.len() < XCHACHA_NONCE_LEN {
            return Err(Error::CiphertextTooShort { need: XCHACHA_NONCE_LEN, got: input.len() });
        }

        let (nonce_bytes, ciphertext) = input.split_at(XCHACHA_NONCE_LEN);
        self.aead
            .decrypt(XNonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| Error::AuthFailure { layer: "xchacha20-poly1305" })
    }
}
