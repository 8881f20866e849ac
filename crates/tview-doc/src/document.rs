//! Document store: the rows of the file being viewed.
//!
//! A [`Document`] is an ordered sequence of [`Row`]s, one per line of the
//! source file, in on-disk order. Rows are raw bytes: the viewer does not
//! decode UTF-8, so any file opens, and bytes reach the terminal exactly as
//! they were stored.
//!
//! # Line splitting
//!
//! Lines end at `\n`. One trailing `\n` is stripped, then one `\r` if it sat
//! immediately before it, so both LF and CRLF files load cleanly. A final
//! line with no newline is still a row; a zero-byte file has no rows at all
//! (which is not an error, just an empty document).
//!
//! Rows are immutable once loaded. There is no editing in this crate.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::DocumentError;

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// One line of the document, without its line terminator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    bytes: Vec<u8>,
}

impl Row {
    /// Build a row from a raw line, stripping one `\n` and then one `\r`.
    #[must_use]
    pub fn from_line(mut line: Vec<u8>) -> Self {
        if line.last() == Some(&b'\n') {
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
        }
        Self { bytes: line }
    }

    /// The row's content.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// The loaded text, as an ordered list of rows.
#[derive(Debug, Clone, Default)]
pub struct Document {
    rows: Vec<Row>,
    path: Option<PathBuf>,
}

impl Document {
    /// An empty document with no backing file.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rows: Vec::new(),
            path: None,
        }
    }

    /// Open and load a file.
    ///
    /// # Errors
    ///
    /// See [`load_from_file`](Self::load_from_file).
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let mut doc = Self::new();
        doc.load_from_file(path)?;
        Ok(doc)
    }

    /// Build a document from in-memory bytes, split the same way a file is.
    #[must_use]
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut doc = Self::new();
        // Reading from a slice cannot fail.
        let _ = doc.read_rows(data);
        doc
    }

    /// Append every line of the file at `path` as a new row, in file order.
    ///
    /// # Errors
    ///
    /// [`DocumentError::Open`] if the file can't be opened,
    /// [`DocumentError::Read`] if reading fails part-way. Rows read before
    /// a read failure are kept.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DocumentError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let before = self.rows.len();
        self.read_rows(BufReader::new(file))
            .map_err(|source| DocumentError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        log::debug!(
            "loaded {} rows from {}",
            self.rows.len() - before,
            path.display()
        );
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    fn read_rows(&mut self, mut reader: impl BufRead) -> io::Result<()> {
        loop {
            let mut line = Vec::new();
            if reader.read_until(b'\n', &mut line)? == 0 {
                return Ok(());
            }
            self.rows.push(Row::from_line(line));
        }
    }

    // -- Access -------------------------------------------------------------

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The row at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= row_count()`. Callers clamp against the row
    /// count first, so an out-of-range index is a bug.
    #[inline]
    #[must_use]
    pub fn row_at(&self, index: usize) -> &Row {
        &self.rows[index]
    }

    /// The row at `index`, or `None` past the end.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Iterate over rows in document order.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// The file this document was loaded from, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn row_bytes(doc: &Document) -> Vec<&[u8]> {
        doc.rows().map(Row::as_bytes).collect()
    }

    fn temp_file(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    // -- Row -----------------------------------------------------------------

    #[test]
    fn row_strips_lf() {
        assert_eq!(Row::from_line(b"abc\n".to_vec()).as_bytes(), b"abc");
    }

    #[test]
    fn row_strips_crlf() {
        assert_eq!(Row::from_line(b"abc\r\n".to_vec()).as_bytes(), b"abc");
    }

    #[test]
    fn row_strips_only_one_cr() {
        assert_eq!(Row::from_line(b"abc\r\r\n".to_vec()).as_bytes(), b"abc\r");
    }

    #[test]
    fn row_keeps_bare_cr() {
        // A lone `\r` with no `\n` after it is content.
        assert_eq!(Row::from_line(b"abc\r".to_vec()).as_bytes(), b"abc\r");
    }

    #[test]
    fn row_len() {
        let row = Row::from_line(b"hello\n".to_vec());
        assert_eq!(row.len(), 5);
        assert!(!row.is_empty());
        assert!(Row::from_line(b"\n".to_vec()).is_empty());
    }

    // -- from_bytes ------------------------------------------------------------

    #[test]
    fn empty_bytes_no_rows() {
        let doc = Document::from_bytes(b"");
        assert_eq!(doc.row_count(), 0);
        assert!(doc.is_empty());
    }

    #[test]
    fn trailing_newline_adds_no_row() {
        let doc = Document::from_bytes(b"one\ntwo\n");
        assert_eq!(row_bytes(&doc), vec![&b"one"[..], b"two"]);
    }

    #[test]
    fn last_line_without_newline() {
        let doc = Document::from_bytes(b"one\ntwo");
        assert_eq!(row_bytes(&doc), vec![&b"one"[..], b"two"]);
    }

    #[test]
    fn blank_lines_are_rows() {
        let doc = Document::from_bytes(b"\n\nx\n");
        assert_eq!(row_bytes(&doc), vec![&b""[..], b"", b"x"]);
    }

    #[test]
    fn non_utf8_bytes_survive() {
        let doc = Document::from_bytes(b"\xff\xfe\n");
        assert_eq!(doc.row_at(0).as_bytes(), b"\xff\xfe");
    }

    #[test]
    fn get_past_end() {
        let doc = Document::from_bytes(b"a\n");
        assert!(doc.get(0).is_some());
        assert!(doc.get(1).is_none());
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn row_at_out_of_range_panics() {
        let doc = Document::from_bytes(b"a\n");
        let _ = doc.row_at(1);
    }

    // -- Files -----------------------------------------------------------------

    #[test]
    fn load_crlf_file() {
        let file = temp_file(b"alpha\r\nbeta\r\ngamma\r\n");
        let doc = Document::open(file.path()).unwrap();

        assert_eq!(row_bytes(&doc), vec![&b"alpha"[..], b"beta", b"gamma"]);
        assert_eq!(doc.path(), Some(file.path()));
    }

    #[test]
    fn load_zero_byte_file() {
        let file = temp_file(b"");
        let doc = Document::open(file.path()).unwrap();
        assert_eq!(doc.row_count(), 0);
    }

    #[test]
    fn load_mixed_endings() {
        let file = temp_file(b"unix\ndos\r\nlast");
        let doc = Document::open(file.path()).unwrap();
        assert_eq!(row_bytes(&doc), vec![&b"unix"[..], b"dos", b"last"]);
    }

    #[test]
    fn load_appends_in_order() {
        let first = temp_file(b"1\n2\n");
        let second = temp_file(b"3\n");

        let mut doc = Document::open(first.path()).unwrap();
        doc.load_from_file(second.path()).unwrap();

        assert_eq!(row_bytes(&doc), vec![&b"1"[..], b"2", b"3"]);
    }

    #[test]
    fn missing_file_is_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");

        let err = Document::open(&missing).unwrap_err();

        assert!(matches!(err, DocumentError::Open { ref path, .. } if *path == missing));
        assert!(err.to_string().starts_with("fopen "));
    }

    #[test]
    fn new_has_no_path() {
        let doc = Document::new();
        assert!(doc.path().is_none());
        assert_eq!(doc.row_count(), 0);
    }
}
