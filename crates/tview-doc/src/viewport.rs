//! Viewport: cursor position, screen size, and vertical scroll.
//!
//! The cursor lives in document coordinates: `cy` is a row index, `cx` a
//! byte column. `row_offset` is the first document row on screen. The
//! render pipeline turns these into screen coordinates.
//!
//! # Bounds
//!
//! - `cy` ranges over `0..=row_count`. One past the last row is a valid
//!   position (the line after the end of the file).
//! - `cx` ranges over `0..screen_cols`. There is no per-row width and no
//!   horizontal scroll, so text past the right edge is unreachable.
//!
//! # Scroll-follow
//!
//! [`reconcile_scroll`](Viewport::reconcile_scroll) moves the window, never
//! the cursor, until `row_offset <= cy < row_offset + screen_rows`. The
//! render pipeline calls it before every frame.

use tview_term::Size;

/// One-step cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Which way a page key moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Up,
    Down,
}

/// Home/End target column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Column 0.
    Home,
    /// The last screen column.
    End,
}

/// Cursor and scroll state for one screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    cx: usize,
    cy: usize,
    screen_rows: usize,
    screen_cols: usize,
    row_offset: usize,
}

impl Viewport {
    /// A viewport at the top-left of the document, sized to `size`.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            cx: 0,
            cy: 0,
            screen_rows: usize::from(size.rows),
            screen_cols: usize::from(size.cols),
            row_offset: 0,
        }
    }

    // -- Accessors ----------------------------------------------------------

    /// Cursor column (0-indexed).
    #[inline]
    #[must_use]
    pub const fn cx(&self) -> usize {
        self.cx
    }

    /// Cursor row in the document (0-indexed).
    #[inline]
    #[must_use]
    pub const fn cy(&self) -> usize {
        self.cy
    }

    /// First visible document row.
    #[inline]
    #[must_use]
    pub const fn row_offset(&self) -> usize {
        self.row_offset
    }

    #[inline]
    #[must_use]
    pub const fn screen_rows(&self) -> usize {
        self.screen_rows
    }

    #[inline]
    #[must_use]
    pub const fn screen_cols(&self) -> usize {
        self.screen_cols
    }

    /// Cursor position on screen as `(row, col)`, 0-indexed.
    ///
    /// Only meaningful after [`reconcile_scroll`](Self::reconcile_scroll).
    #[must_use]
    pub const fn screen_cursor(&self) -> (usize, usize) {
        (self.cy.saturating_sub(self.row_offset), self.cx)
    }

    // -- Movement -----------------------------------------------------------

    /// Move one step, clamped to `0..screen_cols` and `0..=row_count`.
    pub const fn move_cursor(&mut self, direction: Direction, row_count: usize) {
        match direction {
            Direction::Left => self.cx = self.cx.saturating_sub(1),
            Direction::Right => {
                if self.cx + 1 < self.screen_cols {
                    self.cx += 1;
                }
            }
            Direction::Up => self.cy = self.cy.saturating_sub(1),
            Direction::Down => {
                if self.cy < row_count {
                    self.cy += 1;
                }
            }
        }
    }

    /// Repeat a single vertical step `screen_rows` times.
    ///
    /// This is a page's worth of ordinary steps, not a jump: each step is
    /// clamped like [`move_cursor`](Self::move_cursor).
    pub const fn page_move(&mut self, direction: PageDirection, row_count: usize) {
        let step = match direction {
            PageDirection::Up => Direction::Up,
            PageDirection::Down => Direction::Down,
        };
        let mut times = self.screen_rows;
        while times > 0 {
            self.move_cursor(step, row_count);
            times -= 1;
        }
    }

    /// Jump to the first or last screen column.
    pub const fn apply_home_end(&mut self, edge: Edge) {
        self.cx = match edge {
            Edge::Home => 0,
            Edge::End => self.screen_cols.saturating_sub(1),
        };
    }

    // -- Scrolling ----------------------------------------------------------

    /// Scroll so the cursor row is on screen.
    pub const fn reconcile_scroll(&mut self) {
        if self.cy < self.row_offset {
            self.row_offset = self.cy;
        }
        if self.screen_rows > 0 && self.cy >= self.row_offset + self.screen_rows {
            self.row_offset = self.cy + 1 - self.screen_rows;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
