//! Render pipeline: document + viewport to terminal bytes.
//!
//! Each frame is composed into one [`OutputBuffer`] and written with a
//! single `write`. The frame is a full redraw:
//!
//! ```text
//! ESC[?25l  ESC[H                  hide cursor, go home
//! row 0 ........ ESC[K \r\n        each screen row, then erase-to-EOL
//! row 1 ........ ESC[K \r\n
//! ...
//! row N-1 ...... ESC[K             no line break after the last row
//! ESC[{y};{x}H  ESC[?25h           place and show the cursor
//! ```
//!
//! Rows past the end of the document show a `~`. On an empty document the
//! row a third of the way down shows a centered banner instead.
//!
//! Row content is copied byte for byte and cut at the screen width. There
//! is no wrapping and no attempt to measure multi-byte characters.

use std::io::{self, Write};

use tview_term::OutputBuffer;
use tview_term::ansi;

use crate::document::Document;
use crate::viewport::Viewport;

/// Text shown on an empty document.
pub const BANNER: &str = concat!("tview -- version ", env!("CARGO_PKG_VERSION"));

/// Filler for screen rows with no document row.
const FILLER: u8 = b'~';

/// Compose a full frame into `out`.
///
/// Reconciles the scroll offset first, so the cursor row is always on
/// screen. `out` is appended to; clear it first if reusing.
pub fn compose_frame(doc: &Document, viewport: &mut Viewport, out: &mut OutputBuffer) {
    viewport.reconcile_scroll();

    // Writes into a Vec-backed buffer cannot fail.
    let _ = ansi::cursor_hide(out);
    let _ = ansi::cursor_home(out);

    draw_rows(doc, viewport, out);

    let (row, col) = viewport.screen_cursor();
    let _ = ansi::cursor_to(out, row, col);
    let _ = ansi::cursor_show(out);
}

/// Compose a frame and write it to `w` in one go.
///
/// # Errors
///
/// Returns an error if writing to `w` fails.
pub fn render_frame(
    doc: &Document,
    viewport: &mut Viewport,
    out: &mut OutputBuffer,
    w: &mut impl Write,
) -> io::Result<()> {
    out.clear();
    compose_frame(doc, viewport, out);
    out.flush_to(w)
}

/// Clear the whole screen and home the cursor.
///
/// Used on quit and before reporting a fatal error, so the shell prompt
/// doesn't land in the middle of the last frame.
///
/// # Errors
///
/// Returns an error if writing to `w` fails.
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    let mut out = OutputBuffer::new();
    ansi::clear_screen(&mut out)?;
    ansi::cursor_home(&mut out)?;
    out.flush_to(w)
}

fn draw_rows(doc: &Document, viewport: &Viewport, out: &mut OutputBuffer) {
    let screen_rows = viewport.screen_rows();
    let screen_cols = viewport.screen_cols();

    for y in 0..screen_rows {
        let filerow = y + viewport.row_offset();

        if let Some(row) = doc.get(filerow) {
            let bytes = row.as_bytes();
            out.append(&bytes[..bytes.len().min(screen_cols)]);
        } else if doc.is_empty() && y == screen_rows / 3 {
            draw_banner(out, screen_cols);
        } else {
            out.append(&[FILLER]);
        }

        let _ = ansi::clear_line(out);
        if y + 1 < screen_rows {
            out.append(b"\r\n");
        }
    }
}

fn draw_banner(out: &mut OutputBuffer, screen_cols: usize) {
    let text = &BANNER.as_bytes()[..BANNER.len().min(screen_cols)];
    let padding = (screen_cols - text.len()) / 2;
    out.append_repeated(b' ', padding);
    out.append(text);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tview_term::Size;

    use crate::viewport::{Direction, Edge};

    const HIDE: &str = "\x1b[?25l";
    const HOME: &str = "\x1b[H";
    const SHOW: &str = "\x1b[?25h";
    const EOL: &str = "\x1b[K";

    fn viewport(rows: u16, cols: u16) -> Viewport {
        Viewport::new(Size { cols, rows })
    }

    fn frame(doc: &Document, v: &mut Viewport) -> String {
        let mut out = OutputBuffer::new();
        compose_frame(doc, v, &mut out);
        String::from_utf8(out.as_bytes().to_vec()).unwrap()
    }

    /// Strip the header and cursor trailer, then split into screen lines
    /// with their `ESC[K` removed.
    fn body_lines(frame: &str) -> Vec<String> {
        let body = frame.strip_prefix(&format!("{HIDE}{HOME}")).unwrap();
        let body = &body[..body.rfind("\x1b[").unwrap()]; // drop show
        let body = &body[..body.rfind("\x1b[").unwrap()]; // drop cursor_to
        body.split("\r\n")
            .map(|line| line.strip_suffix(EOL).unwrap().to_string())
            .collect()
    }

    // -- Frame shape ----------------------------------------------------------

    #[test]
    fn frame_header_and_trailer() {
        let doc = Document::from_bytes(b"hi\n");
        let mut v = viewport(3, 10);
        let f = frame(&doc, &mut v);

        assert!(f.starts_with(&format!("{HIDE}{HOME}")));
        assert!(f.ends_with(&format!("\x1b[1;1H{SHOW}")));
    }

    #[test]
    fn every_line_cleared_and_no_trailing_break() {
        let doc = Document::from_bytes(b"a\nb\n");
        let mut v = viewport(4, 10);
        let f = frame(&doc, &mut v);

        assert_eq!(f.matches(EOL).count(), 4);
        assert_eq!(f.matches("\r\n").count(), 3);
        assert!(!f.contains(&format!("{EOL}\r\n\x1b[1;1H")));
    }

    #[test]
    fn empty_document_24_rows() {
        let doc = Document::new();
        let mut v = viewport(24, 80);
        let lines = body_lines(&frame(&doc, &mut v));

        assert_eq!(lines.len(), 24);
        assert_eq!(lines.iter().filter(|l| *l == "~").count(), 23);

        let banner = &lines[8];
        assert!(!banner.contains('~'));
        assert_eq!(banner.trim_start(), BANNER);
        assert_eq!(banner.len() - BANNER.len(), (80 - BANNER.len()) / 2);
    }

    #[test]
    fn banner_truncated_on_narrow_screen() {
        let doc = Document::new();
        let mut v = viewport(3, 5);
        let lines = body_lines(&frame(&doc, &mut v));
        assert_eq!(lines[1], &BANNER[..5]);
    }

    #[test]
    fn no_banner_when_document_has_rows() {
        let doc = Document::from_bytes(b"only\n");
        let mut v = viewport(24, 80);
        let lines = body_lines(&frame(&doc, &mut v));

        assert_eq!(lines[0], "only");
        assert!(lines[1..].iter().all(|l| l == "~"));
    }

    // -- Content --------------------------------------------------------------

    #[test]
    fn rows_reproduced_in_order() {
        let doc = Document::from_bytes(b"first\r\nsecond\r\nthird\r\n");
        let mut v = viewport(5, 80);
        let lines = body_lines(&frame(&doc, &mut v));
        assert_eq!(lines, vec!["first", "second", "third", "~", "~"]);
    }

    #[test]
    fn long_rows_truncated_not_wrapped() {
        let doc = Document::from_bytes(b"0123456789abcdef\nxy\n");
        let mut v = viewport(3, 10);
        let lines = body_lines(&frame(&doc, &mut v));
        assert_eq!(lines, vec!["0123456789", "xy", "~"]);
    }

    #[test]
    fn raw_bytes_pass_through() {
        let doc = Document::from_bytes(b"caf\xc3\xa9\n");
        let mut v = viewport(1, 80);
        let mut out = OutputBuffer::new();
        compose_frame(&doc, &mut v, &mut out);

        let needle: &[u8] = b"caf\xc3\xa9\x1b[K";
        assert!(out.as_bytes().windows(needle.len()).any(|w| w == needle));
    }

    // -- Scrolling ------------------------------------------------------------

    #[test]
    fn frame_follows_cursor() {
        let text: String = (0..50).map(|i| format!("line {i}\n")).collect();
        let doc = Document::from_bytes(text.as_bytes());
        let mut v = viewport(10, 80);
        for _ in 0..20 {
            v.move_cursor(Direction::Down, doc.row_count());
        }
        v.apply_home_end(Edge::End);

        let f = frame(&doc, &mut v);
        let lines = body_lines(&f);

        assert_eq!(v.row_offset(), 11);
        assert_eq!(lines[0], "line 11");
        assert_eq!(lines[9], "line 20");
        assert!(f.ends_with(&format!("\x1b[10;80H{SHOW}")));
    }

    #[test]
    fn cursor_past_last_row_shows_filler() {
        let doc = Document::from_bytes(b"a\nb\n");
        let mut v = viewport(2, 10);
        for _ in 0..5 {
            v.move_cursor(Direction::Down, doc.row_count());
        }
        let lines = body_lines(&frame(&doc, &mut v));
        assert_eq!(lines, vec!["b", "~"]);
    }

    // -- Output ---------------------------------------------------------------

    #[test]
    fn render_frame_writes_once_and_clears() {
        let doc = Document::from_bytes(b"x\n");
        let mut v = viewport(2, 10);
        let mut out = OutputBuffer::new();
        let mut term = Vec::new();

        render_frame(&doc, &mut v, &mut out, &mut term).unwrap();

        assert!(out.is_empty());
        assert!(term.starts_with(HIDE.as_bytes()));
        assert!(term.ends_with(SHOW.as_bytes()));
    }

    #[test]
    fn clear_screen_sequence() {
        let mut term = Vec::new();
        clear_screen(&mut term).unwrap();
        assert_eq!(term, b"\x1b[2J\x1b[H");
    }
}
