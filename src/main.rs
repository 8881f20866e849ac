// SPDX-License-Identifier: MIT
//
// tview: a minimal raw-mode terminal text viewer.
//
// This is the binary that wires the two library crates together:
//
//   tview-term → raw mode, byte reader, key decoder, output buffering
//   tview-doc  → document rows, viewport/scroll, frame rendering
//
// The loop: render a frame, block for one key,
// apply it to the viewport, repeat. Each keypress flows through:
//
//   stdin → TtyReader → read_key → Viewer::handle_key → Viewport
//   Viewport + Document → compose_frame → OutputBuffer → one write
//
// Startup order: raw mode, then screen size (the fallback probe needs raw
// mode to read the reply), then the file.

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use thiserror::Error;

use tview_doc::render;
use tview_doc::{Direction, Document, DocumentError, Edge, PageDirection, Viewport};
use tview_term::input::{self, ByteSource};
use tview_term::reader::TtyReader;
use tview_term::terminal::{self, RawMode};
use tview_term::{LogicalKey, OutputBuffer, Size, TermError, TtyWriter};

/// Ctrl + this letter quits.
const QUIT_KEY: u8 = b'q';

// ─── Errors ─────────────────────────────────────────────────────────────────

/// Anything that ends the session with a non-zero exit.
#[derive(Debug, Error)]
enum ViewerError {
    #[error(transparent)]
    Term(#[from] TermError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Flushing a frame to the terminal failed.
    #[error("write: {0}")]
    Render(#[source] io::Error),
}

// ─── Viewer ─────────────────────────────────────────────────────────────────

/// What the loop should do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    Quit,
}

/// The viewer's whole state: the document, where we are in it, and the
/// frame buffer reused across renders.
struct Viewer {
    doc: Document,
    viewport: Viewport,
    out: OutputBuffer,
}

impl Viewer {
    fn new(doc: Document, size: Size) -> Self {
        Self {
            doc,
            viewport: Viewport::new(size),
            out: OutputBuffer::new(),
        }
    }

    /// Apply one key to the viewport.
    fn handle_key(&mut self, key: LogicalKey) -> Step {
        let rows = self.doc.row_count();
        let vp = &mut self.viewport;

        match key {
            k if k.is_ctrl(QUIT_KEY) => return Step::Quit,
            LogicalKey::ArrowUp => vp.move_cursor(Direction::Up, rows),
            LogicalKey::ArrowDown => vp.move_cursor(Direction::Down, rows),
            LogicalKey::ArrowLeft => vp.move_cursor(Direction::Left, rows),
            LogicalKey::ArrowRight => vp.move_cursor(Direction::Right, rows),
            LogicalKey::PageUp => vp.page_move(PageDirection::Up, rows),
            LogicalKey::PageDown => vp.page_move(PageDirection::Down, rows),
            LogicalKey::Home => vp.apply_home_end(Edge::Home),
            LogicalKey::End => vp.apply_home_end(Edge::End),
            // Read-only: nothing to delete, nothing to insert.
            LogicalKey::Delete | LogicalKey::EscapeAlone | LogicalKey::Byte(_) => {}
        }
        Step::Continue
    }

    fn render(&mut self, w: &mut impl Write) -> Result<(), ViewerError> {
        render::render_frame(&self.doc, &mut self.viewport, &mut self.out, w)
            .map_err(ViewerError::Render)
    }

    /// Render, read, dispatch, until the quit key. Clears the screen on the
    /// way out.
    fn run(&mut self, src: &mut impl ByteSource, w: &mut impl Write) -> Result<(), ViewerError> {
        loop {
            self.render(w)?;
            let key = input::read_key(src)?;
            if self.handle_key(key) == Step::Quit {
                render::clear_screen(w).map_err(ViewerError::Render)?;
                return Ok(());
            }
        }
    }
}

// ─── Entry point ────────────────────────────────────────────────────────────

/// One session. The raw-mode guard lives exactly as long as this call, so
/// every return path, `?` included, hands the terminal back.
fn run(path: Option<PathBuf>) -> Result<(), ViewerError> {
    let raw = RawMode::enter()?;
    let mut reader = TtyReader::new();
    let mut tty = TtyWriter::new();

    let size = terminal::window_size(&mut tty, &mut reader)?;
    let doc = match path {
        Some(path) => Document::open(path)?,
        None => Document::new(),
    };

    let mut viewer = Viewer::new(doc, size);
    viewer.run(&mut reader, &mut tty)?;

    raw.leave()?;
    Ok(())
}

fn main() {
    // Zero or one positional argument; anything after the first is ignored.
    let path = env::args_os().nth(1).map(PathBuf::from);

    if let Err(e) = run(path) {
        let _ = render::clear_screen(&mut TtyWriter::new());
        eprintln!("tview: {e}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
