//! Top-level encrypt/decrypt drivers.
//!
//! The only public entry points of the core. Both operate on sequential
//! byte streams; opening files, choosing paths, and collision policy
//! belong to the caller. Partial output on failure is likewise the
//! caller's to clean up.

use std::io::{Read, Write};

use tracing::{debug, info};

use crate::config::CHUNK_SIZE;
use crate::error::{Error, Result};
use crate::header::{Header, PendingHeader};
use crate::kdf;
use crate::stream::StreamEngine;
use crate::types::{Direction, ProgressSink};

/// Encrypts `input` into a `.swb` container on `output`.
///
/// `in_size` is the exact input length; it is recorded in the header
/// and drives the caller's progress display.
///
/// # Errors
///
/// [`Error::EmptyInput`] for a zero-length input, otherwise whatever
/// the KDF, header codec, or stream pipeline reports.
pub fn encrypt<R, W>(input: R, output: &mut W, in_size: u64, password: &[u8], progress: &dyn ProgressSink) -> Result<()>
where
    R: Read + Send + 'static,
    W: Write,
{
    if in_size == 0 {
        return Err(Error::EmptyInput);
    }

    let salt = kdf::generate_salt()?;
    debug!("deriving master key");
    let key = kdf::derive(password, &salt)?;

    Header::new(salt, in_size).write(output, &key)?;

    StreamEngine::new(&key, Direction::Encrypt, CHUNK_SIZE)?.run(input, output, progress)?;

    info!(bytes = in_size, "encryption complete");
    Ok(())
}

/// Decrypts a `.swb` container from `input` onto `output`.
///
/// The header MAC is verified before a single payload byte is read, so
/// a wrong password never touches the chunk pipeline. The payload runs
/// to input EOF; the header's recorded size is a sanity bound and
/// progress hint, not a terminator.
///
/// # Errors
///
/// [`Error::HeaderAuthFailure`] for a wrong password or tampered
/// header, [`Error::InvalidMagic`] / [`Error::UnsupportedVersion`] /
/// [`Error::InvalidHeader`] for structural problems, otherwise whatever
/// the stream pipeline reports.
pub fn decrypt<R, W>(mut input: R, output: &mut W, password: &[u8], progress: &dyn ProgressSink) -> Result<()>
where
    R: Read + Send + 'static,
    W: Write,
{
    let pending = PendingHeader::read(&mut input)?;

    debug!("deriving master key");
    let key = kdf::derive(password, pending.salt())?;
    let header = pending.verify(&key)?;

    if header.original_size == 0 {
        return Err(Error::InvalidHeader("recorded size is zero"));
    }

    StreamEngine::new(&key, Direction::Decrypt, CHUNK_SIZE)?.run(input, output, progress)?;

    info!(bytes = header.original_size, "decryption complete");
    Ok(())
}
