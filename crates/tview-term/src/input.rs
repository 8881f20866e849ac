// SPDX-License-Identifier: MIT
//
// Key decoder.
//
// Turns raw terminal bytes into logical keys. This is a minimal recognizer
// for the VT100/xterm CSI (`ESC [`) and SS3 (`ESC O`) prefixes: enough for
// arrows, Home/End, PageUp/PageDown and Delete, without a terminfo database.
//
// # Design
//
// The decoder pulls bytes one at a time from a [`ByteSource`]. A source
// read may time out (`Ok(None)`); the raw-mode read timeout is 100 ms, so
// a lone ESC is distinguishable from the start of a sequence by whether
// the next byte shows up in time.
//
// Lookahead never exceeds three bytes after the ESC. Each rule reads only
// what it needs, and an unrecognized or truncated sequence resolves to
// `EscapeAlone` rather than being re-read as printable characters. Nothing
// is buffered across calls.

use std::io;

use crate::error::TermError;

// ─── Key Types ──────────────────────────────────────────────────────────────

/// The escape byte that starts every control sequence.
pub const ESC: u8 = 0x1b;

/// One decoded input event.
///
/// Literal bytes and navigation keys live in separate variants, so a
/// navigation key can never be confused with typed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalKey {
    /// A printable or control byte, exactly as read.
    Byte(u8),
    // ── Navigation ──────────────────────────────────────────────
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    // ── Editing ─────────────────────────────────────────────────
    Delete,
    /// A bare ESC, or any escape sequence we don't recognize.
    EscapeAlone,
}

impl LogicalKey {
    /// Whether this is the control-modified form of `letter` (e.g. Ctrl-Q).
    #[inline]
    #[must_use]
    pub const fn is_ctrl(self, letter: u8) -> bool {
        matches!(self, Self::Byte(b) if b == ctrl_key(letter))
    }
}

/// The byte a terminal sends for Ctrl + `letter`.
///
/// Ctrl strips bits 5 and 6, so `q` (0x71) becomes 0x11.
#[inline]
#[must_use]
pub const fn ctrl_key(letter: u8) -> u8 {
    letter & 0x1f
}

// ─── Byte Sources ───────────────────────────────────────────────────────────

/// Somewhere to pull raw input bytes from.
///
/// `Ok(None)` means the read timed out with nothing available. That is
/// the normal idle state, not an error.
pub trait ByteSource {
    /// Read a single byte, or `None` on timeout.
    ///
    /// # Errors
    ///
    /// Returns an error for any failure other than a timeout.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    #[inline]
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).read_byte()
    }
}

/// Scripted input: bytes are consumed from the front of the slice, and an
/// exhausted slice behaves like a terminal that stopped sending.
impl ByteSource for &[u8] {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        match self.split_first() {
            Some((&b, rest)) => {
                *self = rest;
                Ok(Some(b))
            }
            None => Ok(None),
        }
    }
}

// ─── Decoding ───────────────────────────────────────────────────────────────

/// Block until one key is available and decode it.
///
/// Timeouts on the first byte are retried indefinitely; timeouts during an
/// escape sequence end the sequence as [`LogicalKey::EscapeAlone`].
///
/// # Errors
///
/// Returns [`TermError::Read`] if the source fails with anything other
/// than a timeout.
pub fn read_key(src: &mut impl ByteSource) -> Result<LogicalKey, TermError> {
    let first = loop {
        if let Some(b) = next(src)? {
            break b;
        }
    };

    if first != ESC {
        return Ok(LogicalKey::Byte(first));
    }

    let Some(b1) = next(src)? else {
        return Ok(LogicalKey::EscapeAlone);
    };
    let Some(b2) = next(src)? else {
        return Ok(LogicalKey::EscapeAlone);
    };

    let key = match (b1, b2) {
        (b'[', d) if d.is_ascii_digit() => match next(src)? {
            Some(b'~') => tilde_key(d),
            _ => None,
        },
        (b'[', letter) => csi_letter_key(letter),
        (b'O', letter) => ss3_key(letter),
        _ => None,
    };

    Ok(key.unwrap_or_else(|| {
        log::trace!("unrecognized escape sequence: ESC {b1:#04x} {b2:#04x}");
        LogicalKey::EscapeAlone
    }))
}

#[inline]
fn next(src: &mut impl ByteSource) -> Result<Option<u8>, TermError> {
    src.read_byte().map_err(TermError::Read)
}

/// `ESC [ <digit> ~` editing and navigation keys.
const fn tilde_key(digit: u8) -> Option<LogicalKey> {
    match digit {
        b'1' | b'7' => Some(LogicalKey::Home),
        b'3' => Some(LogicalKey::Delete),
        b'4' | b'8' => Some(LogicalKey::End),
        b'5' => Some(LogicalKey::PageUp),
        b'6' => Some(LogicalKey::PageDown),
        _ => None,
    }
}

/// `ESC [ <letter>` cursor keys.
const fn csi_letter_key(letter: u8) -> Option<LogicalKey> {
    match letter {
        b'A' => Some(LogicalKey::ArrowUp),
        b'B' => Some(LogicalKey::ArrowDown),
        b'C' => Some(LogicalKey::ArrowRight),
        b'D' => Some(LogicalKey::ArrowLeft),
        b'H' => Some(LogicalKey::Home),
        b'F' => Some(LogicalKey::End),
        _ => None,
    }
}

/// `ESC O <letter>` (SS3) Home/End, sent by some terminals in
/// application cursor mode.
const fn ss3_key(letter: u8) -> Option<LogicalKey> {
    match letter {
        b'H' => Some(LogicalKey::Home),
        b'F' => Some(LogicalKey::End),
        _ => None,
    }
}

// ─── KeyDecoder ─────────────────────────────────────────────────────────────

/// A [`ByteSource`] paired with [`read_key`], for callers that want to own
/// the source.
#[derive(Debug)]
pub struct KeyDecoder<S> {
    src: S,
}

impl<S: ByteSource> KeyDecoder<S> {
    /// Wrap a byte source.
    pub const fn new(src: S) -> Self {
        Self { src }
    }

    /// Decode the next key. See [`read_key`].
    ///
    /// # Errors
    ///
    /// Returns [`TermError::Read`] on a non-timeout read failure.
    pub fn read_key(&mut self) -> Result<LogicalKey, TermError> {
        read_key(&mut self.src)
    }

    /// The underlying source, e.g. for the startup cursor-position query.
    pub const fn source_mut(&mut self) -> &mut S {
        &mut self.src
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
