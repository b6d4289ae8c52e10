//! Row — one line of the document.
//!
//! A `Row` keeps three parallel views of a line:
//!
//! - **content** — the raw bytes, exactly as they are saved (no newline)
//! - **render** — content with each tab expanded to spaces up to the next
//!   tab stop; this is what reaches the screen and what search scans
//! - **highlight** — one [`Highlight`] per render byte
//!
//! Every mutation recomputes render and highlight before returning, so the
//! three never disagree. Columns are byte offsets throughout.

use crate::syntax::{self, Highlight, SyntaxProfile};

/// A single line: content bytes plus derived render and highlight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    content: Vec<u8>,
    render: Vec<u8>,
    highlight: Vec<Highlight>,
    syntax: Option<&'static SyntaxProfile>,
    tab_stop: usize,
}

impl Row {
    /// Build a row from raw bytes.
    ///
    /// # Panics
    ///
    /// Panics if `tab_stop` is zero.
    #[must_use]
    pub fn new(
        content: impl Into<Vec<u8>>,
        syntax: Option<&'static SyntaxProfile>,
        tab_stop: usize,
    ) -> Self {
        assert!(tab_stop > 0, "tab stop must be at least 1");
        let mut row = Self {
            content: content.into(),
            render: Vec::new(),
            highlight: Vec::new(),
            syntax,
            tab_stop,
        };
        row.update();
        row
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    #[inline]
    #[must_use]
    pub fn render(&self) -> &[u8] {
        &self.render
    }

    #[inline]
    #[must_use]
    pub fn highlight(&self) -> &[Highlight] {
        &self.highlight
    }

    /// Length of the content in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Length of the render in columns.
    #[inline]
    #[must_use]
    pub fn render_len(&self) -> usize {
        self.render.len()
    }

    #[inline]
    #[must_use]
    pub const fn syntax(&self) -> Option<&'static SyntaxProfile> {
        self.syntax
    }

    // -- Mutation -----------------------------------------------------------

    /// Replace the whole content.
    pub fn set_content(&mut self, content: impl Into<Vec<u8>>) {
        self.content = content.into();
        self.update();
    }

    /// Insert `bytes` before content offset `at`.
    ///
    /// # Panics
    ///
    /// Panics if `at > len()`.
    pub fn insert(&mut self, at: usize, bytes: &[u8]) {
        assert!(at <= self.content.len(), "row insert offset out of bounds");
        self.content.splice(at..at, bytes.iter().copied());
        self.update();
    }

    /// Remove `count` bytes starting at content offset `at`.
    ///
    /// # Panics
    ///
    /// Panics if `at + count > len()`.
    pub fn erase(&mut self, at: usize, count: usize) {
        let end = at
            .checked_add(count)
            .filter(|&end| end <= self.content.len())
            .expect("row erase range out of bounds");
        self.content.drain(at..end);
        self.update();
    }

    /// Append bytes to the end of the content.
    pub fn append(&mut self, bytes: &[u8]) {
        self.content.extend_from_slice(bytes);
        self.update();
    }

    /// Split at content offset `at`: this row keeps `[..at]`, the tail is
    /// returned.
    ///
    /// # Panics
    ///
    /// Panics if `at > len()`.
    #[must_use = "the split-off tail is usually inserted as the next row"]
    pub fn split_off(&mut self, at: usize) -> Vec<u8> {
        assert!(at <= self.content.len(), "row split offset out of bounds");
        let tail = self.content.split_off(at);
        self.update();
        tail
    }

    /// Switch to a different profile and re-highlight.
    pub fn set_syntax(&mut self, syntax: Option<&'static SyntaxProfile>) {
        self.syntax = syntax;
        self.highlight = syntax::highlight_line(&self.render, self.syntax);
    }

    // -- Highlight overlays -------------------------------------------------

    /// Tag render columns `[start, start + len)` as a search match. The span
    /// is clipped to the render length.
    pub fn highlight_match(&mut self, start: usize, len: usize) {
        let end = start.saturating_add(len).min(self.highlight.len());
        if start < end {
            self.highlight[start..end].fill(Highlight::Match);
        }
    }

    /// Drop any overlay and restore syntax-derived highlighting.
    pub fn rehighlight(&mut self) {
        self.highlight = syntax::highlight_line(&self.render, self.syntax);
    }

    // -- Column conversion --------------------------------------------------

    /// Content offset → render column.
    ///
    /// # Panics
    ///
    /// Panics if `cx > len()`.
    #[must_use]
    pub fn cx_to_rx(&self, cx: usize) -> usize {
        assert!(cx <= self.content.len(), "row column out of bounds");
        self.content[..cx].iter().fold(0, |rx, &b| {
            if b == b'\t' {
                next_tab_stop(rx, self.tab_stop)
            } else {
                rx + 1
            }
        })
    }

    /// Render column → content offset of the byte drawn there. Columns past
    /// the end map to `len()`.
    #[must_use]
    pub fn rx_to_cx(&self, rx: usize) -> usize {
        let mut cur = 0;
        for (cx, &b) in self.content.iter().enumerate() {
            cur = if b == b'\t' {
                next_tab_stop(cur, self.tab_stop)
            } else {
                cur + 1
            };
            if cur > rx {
                return cx;
            }
        }
        self.content.len()
    }

    // -- Internal -----------------------------------------------------------

    fn update(&mut self) {
        self.render.clear();
        for &b in &self.content {
            if b == b'\t' {
                let stop = next_tab_stop(self.render.len(), self.tab_stop);
                self.render.resize(stop, b' ');
            } else {
                self.render.push(b);
            }
        }
        self.highlight = syntax::highlight_line(&self.render, self.syntax);
    }
}

/// The first tab stop strictly after column `col`.
const fn next_tab_stop(col: usize, tab_stop: usize) -> usize {
    col + tab_stop - col % tab_stop
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn row(content: &[u8]) -> Row {
        Row::new(content, None, 8)
    }

    fn c_row(content: &[u8]) -> Row {
        Row::new(content, syntax::detect(Path::new("x.c")), 8)
    }

    // -- Render -------------------------------------------------------------

    #[test]
    fn render_without_tabs_is_content() {
        let r = row(b"hello");
        assert_eq!(r.render(), b"hello");
        assert_eq!(r.highlight().len(), 5);
    }

    #[test]
    fn tab_expands_to_next_stop() {
        let r = row(b"a\tb");
        assert_eq!(r.render(), b"a       b");
        assert_eq!(r.render_len(), 9);
    }

    #[test]
    fn tab_at_stop_boundary_is_full_width() {
        assert_eq!(row(b"\t").render(), b"        ");
        assert_eq!(row(b"12345678\tx").render(), b"12345678        x");
    }

    #[test]
    fn tab_just_before_stop_is_one_space() {
        assert_eq!(row(b"1234567\tx").render(), b"1234567 x");
    }

    #[test]
    fn custom_tab_stop() {
        let r = Row::new(&b"a\tb"[..], None, 4);
        assert_eq!(r.render(), b"a   b");
    }

    #[test]
    fn render_never_contains_tabs() {
        let r = row(b"\t\ta\t\tb\t");
        assert!(!r.render().contains(&b'\t'));
        assert_eq!(r.highlight().len(), r.render_len());
    }

    #[test]
    fn render_is_stable_and_never_shorter() {
        for content in ["", "\t", "a\tb", "1234567\t\tx", "\t \t \t", "no tabs"].map(str::as_bytes) {
            for tab_stop in [1, 4, 8] {
                let mut r = Row::new(content, None, tab_stop);
                assert!(r.render_len() >= r.len(), "{content:?} / {tab_stop}");
                let first = r.render().to_vec();
                r.set_content(r.content().to_vec());
                assert_eq!(r.render(), &first[..], "{content:?} / {tab_stop}");
            }
        }
    }

    // -- Column conversion --------------------------------------------------

    #[test]
    fn cx_to_rx_after_tab() {
        let r = row(b"a\tb");
        assert_eq!(r.cx_to_rx(0), 0);
        assert_eq!(r.cx_to_rx(1), 1);
        assert_eq!(r.cx_to_rx(2), 8);
        assert_eq!(r.cx_to_rx(3), 9);
    }

    #[test]
    fn rx_to_cx_inverts_cx_to_rx() {
        let r = row(b"a\tb\tc");
        for cx in 0..=r.len() {
            assert_eq!(r.rx_to_cx(r.cx_to_rx(cx)), cx);
        }
    }

    #[test]
    fn rx_inside_tab_maps_to_tab() {
        let r = row(b"a\tb");
        assert_eq!(r.rx_to_cx(4), 1);
        assert_eq!(r.rx_to_cx(100), 3);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn cx_past_end_panics() {
        let _ = row(b"ab").cx_to_rx(3);
    }

    // -- Mutation -----------------------------------------------------------

    #[test]
    fn insert_in_middle() {
        let mut r = row(b"ac");
        r.insert(1, b"b");
        assert_eq!(r.content(), b"abc");
        assert_eq!(r.render(), b"abc");
    }

    #[test]
    fn insert_at_end() {
        let mut r = row(b"ab");
        r.insert(2, b"\tc");
        assert_eq!(r.render(), b"ab      c");
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn insert_past_end_panics() {
        row(b"ab").insert(3, b"x");
    }

    #[test]
    fn erase_range() {
        let mut r = row(b"a\tbc");
        r.erase(1, 2);
        assert_eq!(r.content(), b"ac");
        assert_eq!(r.render(), b"ac");
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn erase_past_end_panics() {
        row(b"ab").erase(1, 2);
    }

    #[test]
    fn append_and_split() {
        let mut r = row(b"foo");
        r.append(b"bar");
        assert_eq!(r.content(), b"foobar");
        let tail = r.split_off(2);
        assert_eq!(tail, b"obar");
        assert_eq!(r.content(), b"fo");
        assert_eq!(r.render(), b"fo");
    }

    #[test]
    fn set_content_recomputes_everything() {
        let mut r = c_row(b"x");
        r.set_content(&b"\t1"[..]);
        assert_eq!(r.render_len(), 9);
        assert_eq!(r.highlight()[8], Highlight::Number);
    }

    // -- Highlighting -------------------------------------------------------

    #[test]
    fn highlight_follows_render_columns() {
        // The digit sits at render column 8, after the tab.
        let r = c_row(b"\t42");
        assert_eq!(&r.highlight()[..8], &[Highlight::Normal; 8]);
        assert_eq!(&r.highlight()[8..], &[Highlight::Number; 2]);
    }

    #[test]
    fn match_overlay_and_restore() {
        let mut r = c_row(b"x = 42");
        r.highlight_match(4, 2);
        assert_eq!(&r.highlight()[4..], &[Highlight::Match; 2]);
        r.rehighlight();
        assert_eq!(&r.highlight()[4..], &[Highlight::Number; 2]);
    }

    #[test]
    fn match_overlay_is_clipped() {
        let mut r = row(b"abc");
        r.highlight_match(2, 10);
        r.highlight_match(7, 1);
        assert_eq!(
            r.highlight(),
            [Highlight::Normal, Highlight::Normal, Highlight::Match]
        );
    }

    #[test]
    fn set_syntax_rehighlights() {
        let mut r = row(b"7");
        assert_eq!(r.highlight(), [Highlight::Normal]);
        r.set_syntax(syntax::detect(Path::new("a.rs")));
        assert_eq!(r.highlight(), [Highlight::Number]);
    }
}
