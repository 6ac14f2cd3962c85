//! Container format and cryptographic constants.
//!
//! Everything that defines the `.swb` on-disk format lives here; changing
//! any of these values is a format break and requires a version bump.

/// Application name used in user-facing output.
pub const APP_NAME: &str = "sealbox";

/// Extension appended to encrypted containers.
pub const FILE_EXTENSION: &str = ".swb";

/// Magic number at offset 0 of every container, stored big-endian.
pub const MAGIC: u32 = 0xCAFE_BABE;

/// Size of the serialized magic number in bytes.
pub const MAGIC_LEN: usize = 4;

/// Current container format version. Readers reject anything newer.
pub const CURRENT_VERSION: u16 = 1;

/// Header flag bit 0: the payload is password-protected.
///
/// Written by every version-1 encryptor. Not consulted during decryption.
pub const FLAG_PROTECTED: u32 = 1;

/// Mask of header flag bits a version-1 reader understands.
///
/// Any other set bit means the file was not produced by a version-1
/// writer and is rejected.
pub const FLAGS_KNOWN: u32 = FLAG_PROTECTED;

/// Size of the `version ‖ flags ‖ original_size` header record in bytes.
pub const HEADER_DATA_LEN: usize = 14;

/// Size of the random per-file salt in bytes.
pub const SALT_LEN: usize = 32;

/// Size of the HMAC-SHA-256 header authentication tag in bytes.
pub const MAC_LEN: usize = 32;

/// Total fixed header length: magic + salt + header data + MAC.
pub const HEADER_LEN: usize = MAGIC_LEN + SALT_LEN + HEADER_DATA_LEN + MAC_LEN;

/// Argon2id time cost (passes over memory).
pub const ARGON_TIME: u32 = 8;

/// Argon2id memory cost in KiB (128 MiB).
///
/// Fixed for format version 1; the header does not carry KDF parameters,
/// so a decryptor must use the same value the encryptor did.
pub const ARGON_MEMORY: u32 = 128 * 1024;

/// Argon2id lane count.
pub const ARGON_LANES: u32 = 8;

/// Length of the derived master key in bytes.
///
/// The first half keys AES-256-GCM, the second half XChaCha20-Poly1305.
pub const MASTER_KEY_LEN: usize = 64;

/// Length of each per-layer cipher key in bytes.
pub const CIPHER_KEY_LEN: usize = 32;

/// AES-GCM nonce size in bytes (96 bits, per NIST SP 800-38D).
pub const AES_NONCE_LEN: usize = 12;

/// XChaCha20 extended nonce size in bytes (192 bits).
///
/// Large enough that random nonces carry no collision risk, which is what
/// lets chunks be processed out of order without nonce coordination.
pub const XCHACHA_NONCE_LEN: usize = 24;

/// Reed-Solomon data shard count (the `k` in the (k, m) code).
pub const DATA_SHARDS: usize = 4;

/// Reed-Solomon parity shard count (the `m` in the (k, m) code).
///
/// Parity is a per-chunk expansion that lets a chunk survive local
/// corruption; it is not meant to recover bytes lost at rest.
pub const PARITY_SHARDS: usize = 10;

/// Total shard count per encoded chunk.
pub const TOTAL_SHARDS: usize = DATA_SHARDS + PARITY_SHARDS;

/// Maximum input length accepted by the Reed-Solomon encoder (1 GiB).
pub const MAX_ENCODE_LEN: usize = 1 << 30;

/// PKCS#7 block size used between compression and encryption.
pub const PAD_BLOCK: usize = 16;

/// Plaintext chunk size for encryption (1 MiB).
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// Smallest chunk size the stream reader accepts (256 KiB).
pub const MIN_CHUNK_SIZE: usize = 256 * 1024;

/// Minimum required password length for interactive prompts.
pub const PASSWORD_MIN_LEN: usize = 8;
