//! # tview-doc: document core for tview
//!
//! The pieces between the file on disk and the bytes on screen:
//!
//! - **[`document`]**: `Document`, an ordered list of immutable byte `Row`s
//!   loaded line by line from a file
//! - **[`viewport`]**: `Viewport`, cursor position, screen size, and the
//!   vertical scroll offset that keeps the cursor on screen
//! - **[`render`]**: composes one full frame into an `OutputBuffer` and
//!   writes it in a single call
//!
//! Terminal access itself (raw mode, key decoding) lives in `tview-term`.

pub mod document;
pub mod error;
pub mod render;
pub mod viewport;

pub use document::{Document, Row};
pub use error::DocumentError;
pub use viewport::{Direction, Edge, PageDirection, Viewport};
