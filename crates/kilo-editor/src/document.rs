//! Document — the ordered rows of the file being edited.
//!
//! A `Document` owns its rows, a dirty counter, the bound file name, and
//! the active syntax profile. Editing operations take the [`Cursor`] and
//! leave it where the user expects: after the inserted byte, at the start
//! of the new line, or at the join point after a backspace.
//!
//! # Dirty tracking
//!
//! `dirty` counts edits since the last load or save. Every successful edit
//! increments it; saving resets it to zero. Loading produces a clean
//! document.
//!
//! # Files
//!
//! Files are split on `\n` with a trailing `\r` stripped from each line, so
//! CRLF files load cleanly. Saving always writes `\n` after every row.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::row::Row;
use crate::syntax::{self, SyntaxProfile};

/// The rows of a file plus its editing metadata.
#[derive(Debug, Clone)]
pub struct Document {
    rows: Vec<Row>,
    dirty: usize,
    filename: Option<PathBuf>,
    syntax: Option<&'static SyntaxProfile>,
    tab_stop: usize,
}

impl Document {
    /// An empty, clean, unnamed document.
    #[must_use]
    pub fn new(tab_stop: usize) -> Self {
        Self {
            rows: Vec::new(),
            dirty: 0,
            filename: None,
            syntax: None,
            tab_stop: tab_stop.max(1),
        }
    }

    /// Build a clean document from lines. Trailing `\r` and `\n` bytes are
    /// stripped from each line.
    #[must_use]
    pub fn from_lines<I, L>(lines: I, tab_stop: usize) -> Self
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let mut doc = Self::new(tab_stop);
        doc.load(lines);
        doc
    }

    /// Open `path`. A file that does not exist yet gives an empty document
    /// bound to that name, so the first save creates it.
    ///
    /// # Errors
    ///
    /// Any I/O error other than "not found".
    pub fn open(path: impl AsRef<Path>, tab_stop: usize) -> Result<Self> {
        let path = path.as_ref();
        let mut doc = Self::new(tab_stop);
        doc.set_filename(path);

        match File::open(path) {
            Ok(file) => {
                let lines = BufReader::new(file)
                    .split(b'\n')
                    .collect::<io::Result<Vec<_>>>()?;
                doc.load(lines);
                tracing::info!(path = %path.display(), rows = doc.row_count(), "opened file");
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "new file");
            }
            Err(err) => return Err(err.into()),
        }

        Ok(doc)
    }

    /// Replace the contents with `lines`. The result is clean.
    pub fn load<I, L>(&mut self, lines: I)
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        self.rows = lines
            .into_iter()
            .map(|line| Row::new(trim_line_ending(line.as_ref()), self.syntax, self.tab_stop))
            .collect();
        self.dirty = 0;
    }

    // -- Queries ------------------------------------------------------------

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

    /// The row at `index`, or `None` past the end.
    #[inline]
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Content length of row `index`; 0 for the virtual row past the end.
    #[inline]
    #[must_use]
    pub fn row_len(&self, index: usize) -> usize {
        self.rows.get(index).map_or(0, Row::len)
    }

    /// Edits since the last load or save.
    #[inline]
    #[must_use]
    pub const fn dirty(&self) -> usize {
        self.dirty
    }

    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty > 0
    }

    #[inline]
    #[must_use]
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    #[inline]
    #[must_use]
    pub const fn syntax(&self) -> Option<&'static SyntaxProfile> {
        self.syntax
    }

    #[inline]
    #[must_use]
    pub const fn tab_stop(&self) -> usize {
        self.tab_stop
    }

    /// Bind a file name and re-detect the syntax profile from it.
    pub fn set_filename(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.syntax = syntax::detect(&path);
        tracing::debug!(
            path = %path.display(),
            syntax = self.syntax.map_or("none", |s| s.name),
            "bound file name"
        );
        for row in &mut self.rows {
            row.set_syntax(self.syntax);
        }
        self.filename = Some(path);
    }

    // -- Row operations -----------------------------------------------------

    /// Insert a new row before `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > row_count()`.
    pub fn insert_row(&mut self, index: usize, content: impl Into<Vec<u8>>) {
        assert!(index <= self.rows.len(), "row index out of bounds");
        self.rows
            .insert(index, Row::new(content, self.syntax, self.tab_stop));
        self.dirty += 1;
    }

    /// Remove the row at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= row_count()`.
    pub fn remove_row(&mut self, index: usize) -> Row {
        assert!(index < self.rows.len(), "row index out of bounds");
        self.dirty += 1;
        self.rows.remove(index)
    }

    // -- Editing at the cursor ----------------------------------------------

    /// Insert `byte` at the cursor and advance it. On the virtual row a new
    /// empty row is appended first; the pair counts as one edit.
    pub fn insert_char(&mut self, cursor: &mut Cursor, byte: u8) {
        if cursor.row == self.rows.len() {
            self.rows
                .push(Row::new(Vec::new(), self.syntax, self.tab_stop));
        }
        self.row_mut(cursor.row).insert(cursor.col, &[byte]);
        cursor.col += 1;
        self.dirty += 1;
    }

    /// Split the current row at the cursor and move to the start of the
    /// new line. At column 0 an empty row is inserted above instead.
    pub fn insert_newline(&mut self, cursor: &mut Cursor) {
        if cursor.col == 0 {
            self.insert_row(cursor.row, Vec::new());
        } else {
            let tail = self.row_mut(cursor.row).split_off(cursor.col);
            self.insert_row(cursor.row + 1, tail);
        }
        cursor.row += 1;
        cursor.col = 0;
    }

    /// Delete the byte before the cursor. At column 0 the current row is
    /// joined onto the previous one. No-op at the very start of the
    /// document and on the virtual row.
    pub fn delete_char_before(&mut self, cursor: &mut Cursor) {
        if cursor.row >= self.rows.len() || (cursor.row == 0 && cursor.col == 0) {
            return;
        }

        if cursor.col > 0 {
            self.row_mut(cursor.row).erase(cursor.col - 1, 1);
            cursor.col -= 1;
            self.dirty += 1;
        } else {
            let joined = self.remove_row(cursor.row);
            let prev = self.row_mut(cursor.row - 1);
            let join_col = prev.len();
            prev.append(joined.content());
            cursor.row -= 1;
            cursor.col = join_col;
        }
    }

    // -- Search overlays ----------------------------------------------------

    /// Tag render columns of row `index` as a search match. Does not count
    /// as an edit.
    pub fn highlight_match(&mut self, index: usize, start: usize, len: usize) {
        if let Some(row) = self.rows.get_mut(index) {
            row.highlight_match(start, len);
        }
    }

    /// Restore row `index` to its syntax-derived highlight.
    pub fn clear_match(&mut self, index: usize) {
        if let Some(row) = self.rows.get_mut(index) {
            row.rehighlight();
        }
    }

    // -- Serialization ------------------------------------------------------

    /// Every row's content followed by `\n`.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let len = self.rows.iter().map(|r| r.len() + 1).sum();
        let mut out = Vec::with_capacity(len);
        for row in &self.rows {
            out.extend_from_slice(row.content());
            out.push(b'\n');
        }
        out
    }

    /// Write to the bound file name. Returns the number of bytes written
    /// and marks the document clean.
    ///
    /// # Errors
    ///
    /// [`Error::NoFileName`] if no name is bound; [`Error::Io`] if the
    /// write fails, in which case the document stays dirty.
    pub fn save(&mut self) -> Result<usize> {
        let path = self.filename.as_deref().ok_or(Error::NoFileName)?;
        let bytes = self.serialize();
        std::fs::write(path, &bytes)?;
        self.dirty = 0;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "saved file");
        Ok(bytes.len())
    }

    /// Bind `path` and save to it.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the write fails.
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<usize> {
        self.set_filename(path);
        self.save()
    }

    fn row_mut(&mut self, index: usize) -> &mut Row {
        self.rows.get_mut(index).expect("row index out of bounds")
    }
}

/// Strip trailing `\n` and `\r` bytes.
fn trim_line_ending(mut line: &[u8]) -> &[u8] {
    while let [rest @ .., b'\n' | b'\r'] = line {
        line = rest;
    }
    line
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
