// SPDX-License-Identifier: MIT
//
// Terminal control: raw mode, geometry, and RAII cleanup.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr) and ioctl (TIOCGWINSZ). These are the standard POSIX
// interfaces for terminal control; there is no safe alternative. Each
// unsafe block is minimal.
#![allow(unsafe_code)]
//
// Raw mode is a scoped acquisition. `RawMode::enter` captures the original
// termios and applies the raw configuration; dropping the guard puts the
// original back. Early returns, `?` propagation and panics all go through
// that drop, so the user's shell is never left without echo.
//
// What the guard cannot cover is a process killed by a signal (SIGKILL,
// or SIGTERM with the default disposition). No destructor runs then, and
// we install no signal handlers to pretend otherwise.
//
// The panic hook mirrors the guard for the case where a panic happens while
// stdout is locked mid-frame: it writes a fixed restore sequence straight
// to fd 1 and resets termios from a process-wide backup, then hands over to
// the original hook so the message lands on a working terminal.

use std::io::{self, Write};
#[cfg(unix)]
use std::sync::Mutex;
use std::sync::Once;

use crate::ansi;
use crate::error::TermError;
use crate::input::{ByteSource, ESC};

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

// ─── Raw Mode Flags ─────────────────────────────────────────────────────────

/// Read timeout in tenths of a second (VTIME). One tick is 100 ms.
pub const VTIME_DECISECONDS: u8 = 1;

/// Minimum bytes for a read to return (VMIN). Zero lets `read` come back
/// empty-handed when the timeout expires.
pub const VMIN_BYTES: u8 = 0;

/// Derive the raw configuration from the original one.
///
/// Input: no break-to-SIGINT, no CR→NL translation, no parity check, no
/// 8th-bit stripping, no XON/XOFF flow control. Output: no post-processing
/// (so `\n` is not turned into `\r\n`). Local: no echo, no canonical line
/// buffering, no Ctrl-V literal mode, no signal keys (Ctrl-C, Ctrl-Z).
#[cfg(unix)]
#[must_use]
pub fn make_raw(original: &libc::termios) -> libc::termios {
    let mut raw = *original;
    raw.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
    raw.c_oflag &= !libc::OPOST;
    raw.c_cflag |= libc::CS8;
    raw.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);
    raw.c_cc[libc::VMIN] = VMIN_BYTES;
    raw.c_cc[libc::VTIME] = VTIME_DECISECONDS;
    raw
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Global backup of original termios for panic recovery.
///
/// The [`RawMode`] guard owns its own copy, but the panic hook can't reach
/// it. This backup, behind a [`Mutex`] rather than a `static mut`, lets the
/// hook restore the terminal without the guard.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Restore termios from the global backup. Best-effort, ignores errors.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, original);
            }
        }
    }
}

/// Clear screen, home the cursor, and make it visible again.
const EMERGENCY_RESTORE: &[u8] = b"\x1b[2J\x1b[H\x1b[?25h";

/// Panic hook guard: the hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();

            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

/// Write [`EMERGENCY_RESTORE`] directly to stdout's file descriptor,
/// bypassing the stdout lock in case the panic happened while it was held.
fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }
}

// ─── RawMode ────────────────────────────────────────────────────────────────

/// Raw-mode guard.
///
/// Holds the terminal settings captured on [`enter`](Self::enter) and puts
/// them back when dropped. Call [`leave`](Self::leave) instead of dropping
/// when you want to hear about a failed restore.
///
/// # Example
///
/// ```no_run
/// use tview_term::terminal::RawMode;
///
/// let raw = RawMode::enter()?;
/// // ... render frames, read keys ...
/// raw.leave()?;
/// # Ok::<(), tview_term::TermError>(())
/// ```
pub struct RawMode {
    /// Original termios, restored exactly once.
    #[cfg(unix)]
    original: Option<libc::termios>,
}

impl RawMode {
    /// Capture the current settings and switch the terminal to raw mode.
    ///
    /// # Errors
    ///
    /// [`TermError::GetAttr`] if the settings can't be read (stdin is not
    /// a terminal, for instance), [`TermError::SetAttr`] if the raw
    /// configuration can't be applied. Either way the terminal is left
    /// as it was.
    #[cfg(unix)]
    pub fn enter() -> Result<Self, TermError> {
        install_panic_hook();

        let original = unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(libc::STDIN_FILENO, &raw mut termios) != 0 {
                return Err(TermError::GetAttr(io::Error::last_os_error()));
            }
            termios
        };

        if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
            *guard = Some(original);
        }

        let settings = make_raw(&original);
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const settings) } != 0
        {
            let err = io::Error::last_os_error();
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = None;
            }
            return Err(TermError::SetAttr(err));
        }

        Ok(Self {
            original: Some(original),
        })
    }

    #[cfg(not(unix))]
    pub fn enter() -> Result<Self, TermError> {
        install_panic_hook();
        Ok(Self {})
    }

    /// Restore the original settings, reporting failure.
    ///
    /// # Errors
    ///
    /// [`TermError::SetAttr`] if `tcsetattr` fails.
    pub fn leave(mut self) -> Result<(), TermError> {
        self.restore()
    }

    #[cfg(unix)]
    fn restore(&mut self) -> Result<(), TermError> {
        let Some(original) = self.original.take() else {
            return Ok(());
        };

        if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
            *guard = None;
        }

        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const original) } != 0
        {
            return Err(TermError::SetAttr(io::Error::last_os_error()));
        }
        Ok(())
    }

    #[cfg(not(unix))]
    #[allow(clippy::unnecessary_wraps)]
    fn restore(&mut self) -> Result<(), TermError> {
        Ok(())
    }
}

impl std::fmt::Debug for RawMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // libc::termios has no Debug impl without libc's `extra_traits`.
        f.debug_struct("RawMode").finish_non_exhaustive()
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

// ─── Geometry ───────────────────────────────────────────────────────────────

/// Longest cursor-position report we'll read: `ESC [ 65535 ; 65535 R` is
/// 15 bytes, so 32 leaves room for junk without reading forever.
pub const CURSOR_REPORT_MAX: usize = 32;

/// Query the terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if the query fails or reports zero columns.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Determine the screen size, falling back to a cursor-position probe.
///
/// The probe writes to `out` and reads the reply from `src`, so raw mode
/// must already be active.
///
/// # Errors
///
/// [`TermError::WindowSize`] if both methods fail, [`TermError::Write`] or
/// [`TermError::Read`] if the probe can't talk to the terminal.
pub fn window_size(out: &mut impl Write, src: &mut impl ByteSource) -> Result<Size, TermError> {
    if let Some(size) = get_size() {
        return Ok(size);
    }
    log::debug!("TIOCGWINSZ unavailable, probing with a cursor-position report");
    window_size_fallback(out, src)
}

/// Measure the screen by parking the cursor in the far corner and asking
/// where it ended up.
///
/// # Errors
///
/// See [`window_size`].
pub fn window_size_fallback(
    out: &mut impl Write,
    src: &mut impl ByteSource,
) -> Result<Size, TermError> {
    ansi::cursor_to_far_corner(out).map_err(TermError::Write)?;
    ansi::request_cursor_position(out).map_err(TermError::Write)?;
    out.flush().map_err(TermError::Write)?;

    let mut report = Vec::with_capacity(CURSOR_REPORT_MAX);
    while report.len() < CURSOR_REPORT_MAX {
        match src.read_byte().map_err(TermError::Read)? {
            Some(b'R') | None => break,
            Some(b) => report.push(b),
        }
    }

    parse_cursor_report(&report).ok_or_else(|| {
        TermError::WindowSize(format!(
            "unexpected cursor report {:?}",
            String::from_utf8_lossy(&report)
        ))
    })
}

/// Parse the body of a cursor-position report, `ESC [ rows ; cols`, with
/// the trailing `R` already stripped.
#[must_use]
pub fn parse_cursor_report(report: &[u8]) -> Option<Size> {
    let body = report.strip_prefix(&[ESC, b'['])?;
    let text = std::str::from_utf8(body).ok()?;
    let (rows, cols) = text.split_once(';')?;
    let rows: u16 = rows.parse().ok()?;
    let cols: u16 = cols.parse().ok()?;

    (rows > 0 && cols > 0).then_some(Size { cols, rows })
}

// ─── Tests ───────────────────────────────────────────────────────────────────
