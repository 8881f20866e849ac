// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Terminal byte reader.
//
// Reads stdin one byte at a time with a raw `read(2)`. In raw mode the
// terminal is configured with VMIN=0 / VTIME=1, so each read returns after
// at most 100 ms, with or without a byte. That timeout is what lets the
// key decoder tell a lone ESC from the start of an escape sequence, and
// what keeps the main loop from blocking forever.
//
// We go straight to the file descriptor rather than through `io::stdin()`
// because std's stdin is buffered: it would happily swallow the rest of an
// escape sequence into its own buffer, and a zero-byte read looks like EOF
// to `Read` users.

use std::io;

use crate::input::ByteSource;

/// A [`ByteSource`] over the terminal's stdin file descriptor.
#[derive(Debug, Default, Clone, Copy)]
pub struct TtyReader {
    _private: (),
}

impl TtyReader {
    /// Create a reader for stdin.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

#[cfg(unix)]
impl ByteSource for TtyReader {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = 0u8;
        let n = unsafe { libc::read(libc::STDIN_FILENO, (&raw mut byte).cast(), 1) };

        match n {
            1 => Ok(Some(byte)),
            // VTIME expired with nothing to read.
            0 => Ok(None),
            _ => {
                let err = io::Error::last_os_error();
                if is_benign(&err) { Ok(None) } else { Err(err) }
            }
        }
    }
}

/// Non-unix fallback: blocking reads through std, no timeout.
#[cfg(not(unix))]
impl ByteSource for TtyReader {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        use std::io::Read;

        let mut byte = [0u8; 1];
        match io::stdin().lock().read(&mut byte) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(byte[0])),
            Err(err) if is_benign(&err) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Errors that just mean "nothing yet": a non-blocking read with no data
/// (Cygwin reports the VTIME timeout this way) or a signal interruption.
fn is_benign(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn would_block_is_a_timeout() {
        assert!(is_benign(&io::Error::from(io::ErrorKind::WouldBlock)));
    }

    #[test]
    fn interrupted_is_a_timeout() {
        assert!(is_benign(&io::Error::from(io::ErrorKind::Interrupted)));
    }

    #[test]
    fn other_errors_are_fatal() {
        assert!(!is_benign(&io::Error::from(io::ErrorKind::BrokenPipe)));
        assert!(!is_benign(&io::Error::from_raw_os_error(9))); // EBADF
    }

    #[test]
    fn reader_is_copy() {
        let a = TtyReader::new();
        let b = a;
        let _ = (a, b);
    }
}
