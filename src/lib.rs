//! sealbox - password-based file encryption with error correction.
//!
//! Encrypts a single file into a self-describing `.swb` container:
//! - Argon2id key derivation into a split 64-byte master key
//! - dual AEAD per chunk (AES-256-GCM inside XChaCha20-Poly1305)
//! - zlib compression and PKCS#7 padding beneath the ciphers
//! - Reed-Solomon (4, 10) erasure coding around each chunk
//! - HMAC-SHA-256 authenticated header, verified before any payload
//!
//! The core API is [`encrypt`] and [`decrypt`] over sequential byte
//! streams; everything filesystem- or terminal-shaped lives in [`cli`]
//! and [`ui`].

pub mod chunk;
pub mod cipher;
pub mod cli;
pub mod compress;
pub mod config;
pub mod driver;
pub mod ecc;
pub mod error;
pub mod header;
pub mod kdf;
pub mod padding;
pub mod stream;
pub mod types;
pub mod ui;
pub mod util;

pub use driver::{decrypt, encrypt};
pub use error::{Error, Result};
pub use types::{Direction, NullSink, ProgressSink};
