// SPDX-License-Identifier: MIT
//
// tview-term: terminal layer for tview.
//
// Owns everything that touches the character terminal directly: entering
// and leaving raw mode, reading bytes with the 100 ms raw-mode timeout,
// decoding them into logical keys, and coalescing a frame's worth of
// escape sequences into one write.
//
// No TUI framework sits underneath (no crossterm, no ratatui). The
// terminal is driven through raw termios and a handful of VT100 sequences,
// which is all a read-only viewer needs.

pub mod ansi;
pub mod error;
pub mod input;
pub mod output;
pub mod reader;
pub mod terminal;

pub use error::TermError;
pub use input::{KeyDecoder, LogicalKey};
pub use output::{OutputBuffer, TtyWriter};
pub use terminal::{RawMode, Size};
