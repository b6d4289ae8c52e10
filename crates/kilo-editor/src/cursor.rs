//! Cursor — position within the document and the rules for moving it.
//!
//! The cursor addresses `(row, col)` where `col` is a *content* byte
//! offset. `render_col` is the matching render column and is recomputed
//! from `col` after every move, so it is never stale when drawn.
//!
//! `row` may equal the document's row count: that virtual row one past the
//! end is where typing appends a new line. Its length is 0.
//!
//! # Movement
//!
//! | Key       | Effect                                                      |
//! |-----------|-------------------------------------------------------------|
//! | Left      | col − 1; at col 0, end of the previous row                  |
//! | Right     | col + 1; at end of row, start of the next row               |
//! | Up / Down | row ∓ 1 within `[0, row_count]`, then clamp col             |
//! | Home      | col 0                                                       |
//! | End       | end of the current row                                      |
//! | Page Up   | jump to the top visible row, then one screen of Up          |
//! | Page Down | jump to the bottom visible row, then one screen of Down     |

use crate::document::Document;
use crate::view::Viewport;

/// A cursor movement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
}

/// The editing cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Row index, `0..=row_count`.
    pub row: usize,
    /// Content byte offset within the row, `0..=len(row)`.
    pub col: usize,
    /// Render column of `col`. Derived; see [`update_render_col`](Self::update_render_col).
    pub render_col: usize,
}

impl Cursor {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            render_col: 0,
        }
    }

    /// Apply one movement. `viewport` supplies the visible window for the
    /// page keys.
    pub fn apply(&mut self, movement: Movement, doc: &Document, viewport: &Viewport) {
        match movement {
            Movement::PageUp => {
                self.row = viewport.row_offset;
                for _ in 0..viewport.screen_rows {
                    self.step(Movement::Up, doc);
                }
            }
            Movement::PageDown => {
                self.row = (viewport.row_offset + viewport.screen_rows)
                    .saturating_sub(1)
                    .min(doc.row_count());
                for _ in 0..viewport.screen_rows {
                    self.step(Movement::Down, doc);
                }
            }
            other => self.step(other, doc),
        }
        self.clamp_col(doc);
        self.update_render_col(doc);
    }

    /// Recompute `render_col` from `col`.
    pub fn update_render_col(&mut self, doc: &Document) {
        self.render_col = doc.row(self.row).map_or(0, |row| row.cx_to_rx(self.col));
    }

    /// Clamp `col` to the length of the current row.
    pub fn clamp_col(&mut self, doc: &Document) {
        self.col = self.col.min(doc.row_len(self.row));
    }

    fn step(&mut self, movement: Movement, doc: &Document) {
        let row_count = doc.row_count();
        match movement {
            Movement::Left => {
                if self.col > 0 {
                    self.col -= 1;
                } else if self.row > 0 {
                    self.row -= 1;
                    self.col = doc.row_len(self.row);
                }
            }
            Movement::Right => {
                if let Some(row) = doc.row(self.row) {
                    if self.col < row.len() {
                        self.col += 1;
                    } else {
                        self.row += 1;
                        self.col = 0;
                    }
                }
            }
            Movement::Up => self.row = self.row.saturating_sub(1),
            Movement::Down => {
                if self.row < row_count {
                    self.row += 1;
                }
            }
            Movement::Home => self.col = 0,
            Movement::End => self.col = doc.row_len(self.row),
            Movement::PageUp | Movement::PageDown => {}
        }
        self.clamp_col(doc);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
