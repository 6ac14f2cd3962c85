//! Password-based key derivation.
//!
//! Argon2id turns a password and a 32-byte salt into the 64-byte master
//! key that feeds both AEAD layers. Parameters are fixed per container
//! format version (see [`crate::config`]); the header does not record
//! them, so they must never change silently.

use argon2::Algorithm::Argon2id;
use argon2::Version::V0x13;
use argon2::{Argon2, Params};
use rand::TryRng;
use rand::rngs::SysRng;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::{ARGON_LANES, ARGON_MEMORY, ARGON_TIME, CIPHER_KEY_LEN, MASTER_KEY_LEN, SALT_LEN};
use crate::error::{Error, Result};

/// The derived 64-byte master key.
///
/// Lives only for the duration of a single file operation and is wiped
/// from memory on drop. The two halves key independent AEAD layers.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct MasterKey {
    bytes: [u8; MASTER_KEY_LEN],
}

impl MasterKey {
    /// Wraps raw key bytes. Exposed for tests; production keys come from
    /// [`derive`].
    #[must_use]
    pub fn from_bytes(bytes: [u8; MASTER_KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// The full 64 bytes, used to key the header MAC.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; MASTER_KEY_LEN] {
        &self.bytes
    }

    /// First half: the AES-256-GCM key.
    #[inline]
    #[must_use]
    pub fn aes_half(&self) -> &[u8] {
        &self.bytes[..CIPHER_KEY_LEN]
    }

    /// Second half: the XChaCha20-Poly1305 key.
    #[inline]
    #[must_use]
    pub fn chacha_half(&self) -> &[u8] {
        &self.bytes[CIPHER_KEY_LEN..]
    }
}

/// Derives the master key from a password and salt.
///
/// Deterministic for fixed inputs.
///
/// # Errors
///
/// [`Error::EmptyPassword`] for a zero-length password,
/// [`Error::InvalidSalt`] when the salt is not exactly 32 bytes, and
/// [`Error::KeyDerivation`] if Argon2 itself rejects the parameters or
/// fails to allocate.
pub fn derive(password: &[u8], salt: &[u8]) -> Result<MasterKey> {
    if password.is_empty() {
        return Err(Error::EmptyPassword);
    }
    if salt.len() != SALT_LEN {
        return Err(Error::InvalidSalt(salt.len()));
    }

    let params = Params::new(ARGON_MEMORY, ARGON_TIME, ARGON_LANES, Some(MASTER_KEY_LEN))
        .map_err(|e| Error::KeyDerivation(e.to_string()))?;
    let argon2 = Argon2::new(Argon2id, V0x13, params);

    let mut bytes = [0u8; MASTER_KEY_LEN];
    argon2
        .hash_password_into(password, salt, &mut bytes)
        .map_err(|e| Error::KeyDerivation(e.to_string()))?;

    Ok(MasterKey { bytes })
}

/// Fills a fixed-size array with cryptographically secure random bytes.
///
/// # Errors
///
/// Fails only if the OS random source does.
pub fn random_bytes<const N: usize>() -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    SysRng.try_fill_bytes(&mut bytes).map_err(|e| Error::Rng(e.to_string()))?;
    Ok(bytes)
}

/// Generates a fresh per-file salt.
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    random_bytes()
}
