//! Fixed container header: serialization, parsing, authentication.
//!
//! Wire layout (all integers big-endian):
//!
//! | offset | size | field |
//! |-------:|-----:|-------|
//! | 0      | 4    | magic `0xCAFEBABE` |
//! | 4      | 32   | salt |
//! | 36     | 14   | version `u16` ‖ flags `u32` ‖ original size `u64` |
//! | 50     | 32   | HMAC-SHA-256 over bytes 0..50 |
//!
//! The MAC is keyed by the full 64-byte master key and must verify
//! before a single payload byte is processed; a mismatch is reported
//! only as "incorrect password or corrupt file" so the two causes are
//! indistinguishable.

use std::io::{Read, Write};

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::config::{CURRENT_VERSION, FLAGS_KNOWN, FLAG_PROTECTED, HEADER_DATA_LEN, HEADER_LEN, MAC_LEN, MAGIC, MAGIC_LEN, SALT_LEN};
use crate::error::{Error, Result};
use crate::kdf::MasterKey;
use crate::util::ct_eq;

type HmacSha256 = Hmac<Sha256>;

/// Offset of the MAC; everything before it is the MAC preimage.
const MAC_OFFSET: usize = MAGIC_LEN + SALT_LEN + HEADER_DATA_LEN;

/// Parsed header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub version: u16,
    pub flags: u32,
    pub original_size: u64,
    pub salt: [u8; SALT_LEN],
}

impl Header {
    /// Builds the header a version-1 encryptor writes.
    #[must_use]
    pub fn new(salt: [u8; SALT_LEN], original_size: u64) -> Self {
        Self { version: CURRENT_VERSION, flags: FLAG_PROTECTED, original_size, salt }
    }

    /// Serializes and authenticates the header into `out`.
    pub fn write<W: Write>(&self, out: &mut W, key: &MasterKey) -> Result<()> {
        let mut buf = [0u8; HEADER_LEN];
        buf[..MAGIC_LEN].copy_from_slice(&MAGIC.to_be_bytes());
        buf[MAGIC_LEN..MAGIC_LEN + SALT_LEN].copy_from_slice(&self.salt);

        let data = &mut buf[MAGIC_LEN + SALT_LEN..MAC_OFFSET];
        data[0..2].copy_from_slice(&self.version.to_be_bytes());
        data[2..6].copy_from_slice(&self.flags.to_be_bytes());
        data[6..14].copy_from_slice(&self.original_size.to_be_bytes());

        let mac = compute_mac(key, &buf[..MAC_OFFSET]);
        buf[MAC_OFFSET..].copy_from_slice(&mac);

        out.write_all(&buf)?;
        Ok(())
    }
}

/// A header read from disk, awaiting MAC verification.
///
/// Holds the raw preimage bytes so verification recomputes the MAC over
/// exactly what was read, not a re-serialization.
pub struct PendingHeader {
    header: Header,
    preimage: [u8; MAC_OFFSET],
    mac: [u8; MAC_LEN],
}

impl PendingHeader {
    /// Reads and structurally validates the fixed header prefix.
    ///
    /// Checks magic, version, and reserved flag bits; does NOT check the
    /// MAC. Call [`Self::verify`] with the derived key before trusting
    /// any field beyond the salt.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buf = [0u8; HEADER_LEN];
        reader.read_exact(&mut buf).map_err(|e| match e.kind() {
            std::io::ErrorKind::UnexpectedEof => Error::IncompleteRead("container header"),
            _ => Error::Io(e),
        })?;

        let magic = u32::from_be_bytes(buf[..MAGIC_LEN].try_into().expect("fixed slice"));
        if magic != MAGIC {
            return Err(Error::InvalidMagic);
        }

        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&buf[MAGIC_LEN..MAGIC_LEN + SALT_LEN]);

        let data = &buf[MAGIC_LEN + SALT_LEN..MAC_OFFSET];
        let version = u16::from_be_bytes(data[0..2].try_into().expect("fixed slice"));
        let flags = u32::from_be_bytes(data[2..6].try_into().expect("fixed slice"));
        let original_size = u64::from_be_bytes(data[6..14].try_into().expect("fixed slice"));

        if version > CURRENT_VERSION {
            return Err(Error::UnsupportedVersion(version));
        }
        if flags & !FLAGS_KNOWN != 0 {
            return Err(Error::InvalidHeader("reserved flag bits set"));
        }

        let mut preimage = [0u8; MAC_OFFSET];
        preimage.copy_from_slice(&buf[..MAC_OFFSET]);
        let mut mac = [0u8; MAC_LEN];
        mac.copy_from_slice(&buf[MAC_OFFSET..]);

        Ok(Self { header: Header { version, flags, original_size, salt }, preimage, mac })
    }

    /// Salt is readable pre-verification; key derivation needs it.
    #[inline]
    #[must_use]
    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.header.salt
    }

    /// Recorded plaintext size, readable pre-verification.
    ///
    /// Unauthenticated at this point; fit for a progress-bar total and
    /// nothing else.
    #[inline]
    #[must_use]
    pub fn original_size(&self) -> u64 {
        self.header.original_size
    }

    /// Recomputes the MAC under `key` and compares in constant time.
    ///
    /// # Errors
    ///
    /// [`Error::HeaderAuthFailure`] on mismatch, which covers both a
    /// wrong password and a tampered header.
    pub fn verify(self, key: &MasterKey) -> Result<Header> {
        let expected = compute_mac(key, &self.preimage);
        if !ct_eq(&expected, &self.mac) {
            return Err(Error::HeaderAuthFailure);
        }
        Ok(self.header)
    }
}

/// HMAC-SHA-256 over the header preimage, keyed by the master key.
fn compute_mac(key: &MasterKey, preimage: &[u8]) -> [u8; MAC_LEN] {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes()).expect("hmac accepts any key length");
    mac.update(preimage);
    mac.finalize().into_bytes().into()
}
