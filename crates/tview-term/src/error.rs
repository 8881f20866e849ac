// SPDX-License-Identifier: MIT
//
// Terminal-layer errors.
//
// Every variant names the operation that failed. The binary prints the
// message verbatim before exiting, so it has to read well after a
// `tview: ` prefix.

use std::io;

use thiserror::Error;

/// A fatal failure talking to the terminal.
#[derive(Debug, Error)]
pub enum TermError {
    /// `tcgetattr` could not capture the original settings.
    #[error("tcgetattr: {0}")]
    GetAttr(#[source] io::Error),

    /// `tcsetattr` could not apply or restore settings.
    #[error("tcsetattr: {0}")]
    SetAttr(#[source] io::Error),

    /// A read from the terminal failed for a reason other than a timeout.
    #[error("read: {0}")]
    Read(#[source] io::Error),

    /// Writing to the terminal failed.
    #[error("write: {0}")]
    Write(#[source] io::Error),

    /// Neither `TIOCGWINSZ` nor the cursor-position report gave a size.
    #[error("getWindowSize: {0}")]
    WindowSize(String),
}
