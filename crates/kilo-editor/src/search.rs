//! Search — incremental, wrapping, bidirectional search.
//!
//! Matching runs over each row's *render* bytes, so a query typed with
//! spaces finds text that was entered with tabs. Matches never span rows.
//!
//! # Search flow
//!
//! 1. Ctrl-F opens the find prompt → editor calls [`SearchState::begin`],
//!    which snapshots the cursor and scroll offsets
//! 2. Every keystroke in the prompt calls [`SearchState::on_key`] with the
//!    current query and the key's [`SearchKey`]
//! 3. Enter → [`SearchState::confirm`]: the cursor stays on the match
//! 4. Escape → [`SearchState::abort`]: cursor and scroll are restored
//!
//! # Stepping
//!
//! Editing the query restarts the search from the top of the document.
//! [`SearchKey::Next`] and [`SearchKey::Previous`] continue from the last
//! match, one column past it in the current direction. Rows are scanned in
//! direction order, wrapping around the document. After a full lap the
//! start row is scanned again over the part skipped at first. A lap with no
//! match leaves the cursor where it was.
//!
//! # Highlighting
//!
//! The current match is tagged [`Highlight::Match`](crate::syntax::Highlight::Match)
//! in its row. Only one row carries a match at a time; it is restored
//! before the next step and when the session ends.

use crate::cursor::Cursor;
use crate::document::Document;
use crate::pattern::Pattern;
use crate::view::Viewport;

// ---------------------------------------------------------------------------
// Direction and keys
// ---------------------------------------------------------------------------

/// Search direction.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum SearchDirection {
    #[default]
    Forward,
    Backward,
}

/// What a prompt keystroke means to the search.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SearchKey {
    /// Continue forward from the last match (Down / Right).
    Next,
    /// Continue backward from the last match (Up / Left).
    Previous,
    /// The query changed; start over.
    Edit,
}

// ---------------------------------------------------------------------------
// SearchState
// ---------------------------------------------------------------------------

/// State of one find-prompt session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    saved_cursor: Cursor,
    saved_row_offset: usize,
    saved_col_offset: usize,
    /// `(row, render column)` of the current match.
    last_match: Option<(usize, usize)>,
    direction: SearchDirection,
    /// Row whose highlight carries the match overlay.
    highlighted_row: Option<usize>,
}

impl SearchState {
    /// Start a session, remembering where to go back to on abort.
    #[must_use]
    pub const fn begin(cursor: &Cursor, viewport: &Viewport) -> Self {
        Self {
            saved_cursor: *cursor,
            saved_row_offset: viewport.row_offset,
            saved_col_offset: viewport.col_offset,
            last_match: None,
            direction: SearchDirection::Forward,
            highlighted_row: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn direction(&self) -> SearchDirection {
        self.direction
    }

    /// `(row, render column)` of the current match, if any.
    #[inline]
    #[must_use]
    pub const fn last_match(&self) -> Option<(usize, usize)> {
        self.last_match
    }

    /// Process one prompt keystroke. Moves the cursor onto the next match
    /// and highlights it; leaves the cursor alone when nothing matches.
    pub fn on_key(
        &mut self,
        query: &[u8],
        key: SearchKey,
        doc: &mut Document,
        cursor: &mut Cursor,
    ) {
        self.clear_highlight(doc);

        match key {
            SearchKey::Edit => {
                self.last_match = None;
                self.direction = SearchDirection::Forward;
            }
            SearchKey::Next => self.direction = SearchDirection::Forward,
            SearchKey::Previous => self.direction = SearchDirection::Backward,
        }

        let row_count = doc.row_count();
        if query.is_empty() || row_count == 0 {
            return;
        }

        let pattern = Pattern::new(query);
        let Some((row, rx)) = self.scan(&pattern, doc) else {
            return;
        };

        if let Some(r) = doc.row(row) {
            cursor.row = row;
            cursor.col = r.rx_to_cx(rx);
            cursor.update_render_col(doc);
        }
        doc.highlight_match(row, rx, query.len());
        self.highlighted_row = Some(row);
        self.last_match = Some((row, rx));
    }

    /// End the session keeping the cursor on the match.
    pub fn confirm(mut self, doc: &mut Document) {
        self.clear_highlight(doc);
    }

    /// End the session, restoring cursor and scroll offsets exactly.
    pub fn abort(mut self, doc: &mut Document, cursor: &mut Cursor, viewport: &mut Viewport) {
        self.clear_highlight(doc);
        *cursor = self.saved_cursor;
        viewport.row_offset = self.saved_row_offset;
        viewport.col_offset = self.saved_col_offset;
        tracing::debug!(row = cursor.row, col = cursor.col, "search aborted");
    }

    fn clear_highlight(&mut self, doc: &mut Document) {
        if let Some(row) = self.highlighted_row.take() {
            doc.clear_match(row);
        }
    }

    /// Find the next match in the current direction, wrapping once.
    fn scan(&self, pattern: &Pattern<'_>, doc: &Document) -> Option<(usize, usize)> {
        let row_count = doc.row_count();
        let (start_row, start_col) = self.start_position(row_count);

        // The start row is scanned from `start_col` first and in full after
        // the lap; every other row is scanned in full.
        for lap in 0..=row_count {
            let row = match self.direction {
                SearchDirection::Forward => (start_row + lap) % row_count,
                SearchDirection::Backward => (start_row + row_count - lap % row_count) % row_count,
            };
            let render = doc.row(row)?.render();
            let found = match (self.direction, lap) {
                (SearchDirection::Forward, 0) => pattern.find_from(render, start_col),
                (SearchDirection::Forward, _) => pattern.find_from(render, 0),
                (SearchDirection::Backward, 0) => pattern.rfind_at_or_before(render, start_col),
                (SearchDirection::Backward, _) => pattern.rfind_at_or_before(render, usize::MAX),
            };
            if let Some(rx) = found {
                return Some((row, rx));
            }
        }
        None
    }

    /// Position one step past the last match in the current direction.
    fn start_position(&self, row_count: usize) -> (usize, usize) {
        match (self.last_match, self.direction) {
            (None, SearchDirection::Forward) => (0, 0),
            (None, SearchDirection::Backward) => (row_count - 1, usize::MAX),
            (Some((row, col)), SearchDirection::Forward) => (row.min(row_count - 1), col + 1),
            (Some((row, 0)), SearchDirection::Backward) => {
                let row = row.min(row_count - 1);
                ((row + row_count - 1) % row_count, usize::MAX)
            }
            (Some((row, col)), SearchDirection::Backward) => (row.min(row_count - 1), col - 1),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
