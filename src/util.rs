//! Small helpers: big-endian framing and constant-time comparison.

use std::io::Read;

use subtle::ConstantTimeEq;

use crate::error::{Error, Result};

/// Reads exactly `N` bytes, mapping a clean EOF at offset 0 to `None`.
///
/// Used for the 4-byte chunk length prefix, where end-of-stream between
/// frames is the normal termination condition but a partial prefix is
/// corruption.
pub fn read_frame_prefix<R: Read>(reader: &mut R, what: &'static str) -> Result<Option<[u8; 4]>> {
    let mut buf = [0u8; 4];
    let mut filled = 0;

    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => return Err(Error::IncompleteRead(what)),
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }

    Ok(Some(buf))
}

/// Reads exactly `len` bytes into a fresh buffer.
pub fn read_exact_vec<R: Read>(reader: &mut R, len: usize, what: &'static str) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf).map_err(|e| match e.kind() {
        std::io::ErrorKind::UnexpectedEof => Error::IncompleteRead(what),
        _ => Error::Io(e),
    })?;
    Ok(buf)
}

/// Constant-time equality over equal-length byte slices.
///
/// Branches only on the combined result, never on individual bytes.
#[must_use]
pub fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
