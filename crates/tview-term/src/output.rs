// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Output buffering.
//
// Two pieces keep a frame to one syscall:
//
//   OutputBuffer: accumulates every byte of a frame in memory so the whole
//   redraw reaches the terminal in a single write(). Incremental writes
//   during a full-screen redraw show up as flicker; one write does not.
//
//   TtyWriter: writes straight to fd 1. `io::stdout()` is line-buffered and
//   would split a frame at its last newline into two writes.

use std::io::{self, Write};

// ─── OutputBuffer ────────────────────────────────────────────────────────────

/// A byte buffer that accumulates terminal output for a single write.
///
/// Default capacity: 16 KB, enough for a typical full-screen frame
/// without reallocation.
#[derive(Debug)]
pub struct OutputBuffer {
    buf: Vec<u8>,
}

const DEFAULT_CAPACITY: usize = 16_384;

impl OutputBuffer {
    /// Create an empty buffer with default capacity (16 KB).
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes (for testing and debugging).
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append raw bytes. Row content goes through here untouched.
    #[inline]
    pub fn append(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append `n` copies of `byte` (padding).
    pub fn append_repeated(&mut self, byte: u8, n: usize) {
        self.buf.resize(self.buf.len() + n, byte);
    }

    /// Clear the buffer for reuse (keeps allocated capacity).
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Write accumulated output to an arbitrary writer and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
            self.buf.clear();
        }
        Ok(())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Intentionally a no-op. Real flushing via flush_to().
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── TtyWriter ───────────────────────────────────────────────────────────────

/// Unbuffered writer for the terminal's stdout file descriptor.
#[derive(Debug, Default, Clone, Copy)]
pub struct TtyWriter {
    _private: (),
}

impl TtyWriter {
    /// Create a writer for stdout.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

#[cfg(unix)]
impl Write for TtyWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        loop {
            let n = unsafe {
                libc::write(
                    libc::STDOUT_FILENO,
                    buf.as_ptr().cast::<libc::c_void>(),
                    buf.len(),
                )
            };
            if n >= 0 {
                #[allow(clippy::cast_sign_loss)] // n >= 0 checked above.
                return Ok(n as usize);
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        // Nothing is buffered on our side.
        Ok(())
    }
}

#[cfg(not(unix))]
impl Write for TtyWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
