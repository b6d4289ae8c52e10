//! View — viewport scrolling and frame rendering.
//!
//! The [`Viewport`] is the window of the document currently on screen, in
//! rows and *render* columns. [`render_frame`] turns a document, cursor,
//! and viewport into one complete frame of ANSI output:
//!
//! ```text
//! ┌───────────────────────────────┐
//! │ text rows                     │ ← screen_rows
//! │ ~                             │
//! ├───────────────────────────────┤
//! │ status bar (inverse video)    │ ← 1 row
//! │ message bar                   │ ← 1 row
//! └───────────────────────────────┘
//! ```
//!
//! Color escapes are written only where the highlight class changes. The
//! cursor is hidden while the frame is drawn and shown again at the end.

use std::io::{self, Write};

use kilo_term::ansi::{self, Color};
use kilo_term::output::StyleWriter;
use kilo_term::terminal::Size;

use crate::cursor::Cursor;
use crate::document::Document;
use crate::row::Row;

/// Rows reserved below the text area for the status and message bars.
pub const RESERVED_ROWS: usize = 2;

/// Maximum bytes of the file name shown in the status bar.
const STATUS_NAME_MAX: usize = 20;

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// The visible window into the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// First visible row.
    pub row_offset: usize,
    /// First visible render column.
    pub col_offset: usize,
    /// Text rows on screen, excluding the two bars.
    pub screen_rows: usize,
    /// Columns on screen.
    pub screen_cols: usize,
}

impl Viewport {
    /// A viewport at the top-left with the given text area.
    #[must_use]
    pub const fn new(screen_rows: usize, screen_cols: usize) -> Self {
        Self {
            row_offset: 0,
            col_offset: 0,
            screen_rows,
            screen_cols,
        }
    }

    /// A viewport for a terminal of `size`, minus the reserved bars.
    #[must_use]
    pub fn from_size(size: Size) -> Self {
        let mut viewport = Self::default();
        viewport.resize(size);
        viewport
    }

    /// Adopt a new terminal size. Offsets are fixed up by the next
    /// [`scroll`](Self::scroll).
    pub fn resize(&mut self, size: Size) {
        self.screen_rows = usize::from(size.rows).saturating_sub(RESERVED_ROWS);
        self.screen_cols = usize::from(size.cols);
    }

    /// Refresh the cursor's render column and adjust the offsets so the
    /// cursor lies inside the window. A zero-sized dimension pins its offset
    /// to the cursor.
    pub fn scroll(&mut self, cursor: &mut Cursor, doc: &Document) {
        cursor.update_render_col(doc);
        self.row_offset = scroll_axis(self.row_offset, self.screen_rows, cursor.row);
        self.col_offset = scroll_axis(self.col_offset, self.screen_cols, cursor.render_col);
    }
}

/// New offset for one axis of a window `extent` wide so that `pos` is
/// inside `[offset, offset + extent)`.
const fn scroll_axis(offset: usize, extent: usize, pos: usize) -> usize {
    if extent == 0 || pos < offset {
        pos
    } else if pos >= offset + extent {
        pos + 1 - extent
    } else {
        offset
    }
}

// ---------------------------------------------------------------------------
// Frame rendering
// ---------------------------------------------------------------------------

/// Draw one frame: text rows, status bar, message bar, cursor.
///
/// Scrolls the viewport first. `message` is drawn as-is; the caller
/// decides whether a status message is still current.
///
/// # Errors
///
/// Propagates errors from the writer.
pub fn render_frame(
    w: &mut impl Write,
    doc: &Document,
    cursor: &mut Cursor,
    viewport: &mut Viewport,
    message: &str,
) -> io::Result<()> {
    viewport.scroll(cursor, doc);

    ansi::cursor_hide(w)?;
    ansi::cursor_home(w)?;

    draw_rows(w, doc, viewport)?;
    draw_status_bar(w, doc, cursor, viewport.screen_cols)?;
    draw_message_bar(w, message, viewport.screen_cols)?;

    let x = cursor.render_col.saturating_sub(viewport.col_offset);
    let y = cursor.row.saturating_sub(viewport.row_offset);
    ansi::cursor_to(w, clamp_u16(x), clamp_u16(y))?;
    ansi::cursor_show(w)
}

fn draw_rows(w: &mut impl Write, doc: &Document, viewport: &Viewport) -> io::Result<()> {
    for y in 0..viewport.screen_rows {
        match doc.row(viewport.row_offset + y) {
            Some(row) => draw_row(w, row, viewport.col_offset, viewport.screen_cols)?,
            None if doc.is_empty() && y == viewport.screen_rows / 2 => {
                draw_welcome(w, viewport.screen_cols)?;
            }
            None => w.write_all(b"~")?,
        }
        ansi::clear_line(w)?;
        w.write_all(b"\r\n")?;
    }
    Ok(())
}

/// One text row, clipped to `[col_offset, col_offset + cols)`.
fn draw_row(w: &mut impl Write, row: &Row, col_offset: usize, cols: usize) -> io::Result<()> {
    let start = col_offset.min(row.render_len());
    let end = col_offset.saturating_add(cols).min(row.render_len());
    let mut style = StyleWriter::new();

    for (&b, hl) in row.render()[start..end]
        .iter()
        .zip(&row.highlight()[start..end])
    {
        if b.is_ascii_control() {
            let symbol = if b <= 26 { b'@' + b } else { b'?' };
            ansi::inverse(w)?;
            w.write_all(&[symbol])?;
            ansi::reset(w)?;
            style.invalidate();
        } else {
            style.set_fg(w, hl.color())?;
            w.write_all(&[b])?;
        }
    }
    style.set_fg(w, Color::Default)
}

fn draw_welcome(w: &mut impl Write, cols: usize) -> io::Result<()> {
    let banner = welcome_banner();
    let banner = &banner.as_bytes()[..banner.len().min(cols)];
    let mut padding = (cols - banner.len()) / 2;
    if padding > 0 {
        w.write_all(b"~")?;
        padding -= 1;
    }
    for _ in 0..padding {
        w.write_all(b" ")?;
    }
    w.write_all(banner)
}

fn welcome_banner() -> String {
    format!("Kilo editor -- version {}", env!("CARGO_PKG_VERSION"))
}

fn draw_status_bar(
    w: &mut impl Write,
    doc: &Document,
    cursor: &Cursor,
    cols: usize,
) -> io::Result<()> {
    let (left, right) = status_text(doc, cursor);
    let left = &left.as_bytes()[..left.len().min(cols)];

    ansi::inverse(w)?;
    w.write_all(left)?;
    let mut len = left.len();
    while len < cols {
        if cols - len == right.len() {
            w.write_all(right.as_bytes())?;
            break;
        }
        w.write_all(b" ")?;
        len += 1;
    }
    ansi::reset(w)?;
    w.write_all(b"\r\n")
}

/// Left and right halves of the status bar.
fn status_text(doc: &Document, cursor: &Cursor) -> (String, String) {
    let name = doc.filename().map_or_else(
        || "[No Name]".to_owned(),
        |path| {
            let full = path.to_string_lossy();
            let bytes = &full.as_bytes()[..full.len().min(STATUS_NAME_MAX)];
            String::from_utf8_lossy(bytes).into_owned()
        },
    );
    let modified = if doc.is_dirty() { " (modified)" } else { "" };
    let left = format!("{name} - {} lines{modified}", doc.row_count());

    let filetype = doc.syntax().map_or("no ft", |s| s.name);
    let right = format!("{filetype} | {}:{}", cursor.row + 1, cursor.col + 1);
    (left, right)
}

fn draw_message_bar(w: &mut impl Write, message: &str, cols: usize) -> io::Result<()> {
    ansi::clear_line(w)?;
    let bytes = message.as_bytes();
    w.write_all(&bytes[..bytes.len().min(cols)])
}

fn clamp_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn doc(lines: &[&str]) -> Document {
        Document::from_lines(lines.iter().map(|l| l.as_bytes()), 8)
    }

    fn emit<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn frame(d: &Document, cursor: &mut Cursor, vp: &mut Viewport, message: &str) -> String {
        emit(|w| render_frame(w, d, cursor, vp, message))
    }

    // -- Viewport -----------------------------------------------------------

    #[test]
    fn from_size_reserves_bars() {
        let vp = Viewport::from_size(Size { cols: 80, rows: 24 });
        assert_eq!((vp.screen_rows, vp.screen_cols), (22, 80));
        let tiny = Viewport::from_size(Size { cols: 10, rows: 1 });
        assert_eq!(tiny.screen_rows, 0);
    }

    #[test]
    fn scroll_down_keeps_cursor_on_last_line() {
        let lines: Vec<String> = (0..30).map(|i| i.to_string()).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let d = doc(&refs);
        let mut vp = Viewport::new(10, 80);
        let mut c = Cursor::new(15, 0);
        vp.scroll(&mut c, &d);
        assert_eq!(vp.row_offset, 6);

        c.row = 2;
        vp.scroll(&mut c, &d);
        assert_eq!(vp.row_offset, 2);
    }

    #[test]
    fn scroll_horizontally_by_render_column() {
        let d = doc(&["\t\t\tx"]);
        let mut vp = Viewport::new(10, 10);
        let mut c = Cursor::new(0, 3);
        vp.scroll(&mut c, &d);
        assert_eq!(c.render_col, 24);
        assert_eq!(vp.col_offset, 15);

        c.col = 0;
        vp.scroll(&mut c, &d);
        assert_eq!(vp.col_offset, 0);
    }

    #[test]
    fn scroll_is_idempotent() {
        let d = doc(&["a"; 40]);
        let mut vp = Viewport::new(10, 80);
        let mut c = Cursor::new(35, 1);
        vp.scroll(&mut c, &d);
        let once = vp;
        vp.scroll(&mut c, &d);
        assert_eq!(vp, once);
    }

    #[test]
    fn scroll_with_zero_sized_screen() {
        let d = doc(&["abc"]);
        let mut vp = Viewport::new(0, 0);
        let mut c = Cursor::new(0, 2);
        vp.scroll(&mut c, &d);
        assert_eq!((vp.row_offset, vp.col_offset), (0, 2));
    }

    #[test]
    fn zero_height_screen_pins_cursor_to_origin() {
        let d = doc(&["a"; 40]);
        let mut vp = Viewport::from_size(Size { cols: 20, rows: 2 });
        let mut c = Cursor::new(30, 1);
        let out = frame(&d, &mut c, &mut vp, "");
        assert_eq!(vp.row_offset, 30);
        assert!(out.ends_with("\x1b[1;2H\x1b[?25h"), "{out:?}");

        c.row = 3;
        let out = frame(&d, &mut c, &mut vp, "");
        assert_eq!(vp.row_offset, 3);
        assert!(out.ends_with("\x1b[1;2H\x1b[?25h"), "{out:?}");
    }

    // -- Rows ---------------------------------------------------------------

    #[test]
    fn plain_row_has_no_color_escapes() {
        let d = doc(&["hello"]);
        assert_eq!(emit(|w| draw_row(w, d.row(0).unwrap(), 0, 80)), "hello");
    }

    #[test]
    fn color_switches_only_on_class_change() {
        let mut d = doc(&["x = 42;"]);
        d.set_filename("a.c");
        assert_eq!(
            emit(|w| draw_row(w, d.row(0).unwrap(), 0, 80)),
            "x = \x1b[31m42\x1b[39m;"
        );
    }

    #[test]
    fn row_ending_in_color_resets_to_default() {
        let mut d = doc(&["7"]);
        d.set_filename("a.rs");
        assert_eq!(emit(|w| draw_row(w, d.row(0).unwrap(), 0, 80)), "\x1b[31m7\x1b[39m");
    }

    #[test]
    fn row_is_clipped_to_window() {
        let d = doc(&["abcdefgh"]);
        assert_eq!(emit(|w| draw_row(w, d.row(0).unwrap(), 2, 3)), "cde");
        assert_eq!(emit(|w| draw_row(w, d.row(0).unwrap(), 20, 3)), "");
    }

    #[test]
    fn control_bytes_drawn_inverse() {
        let d = doc(&["a\x01b\x7f"]);
        assert_eq!(
            emit(|w| draw_row(w, d.row(0).unwrap(), 0, 80)),
            "a\x1b[7mA\x1b[m\x1b[39mb\x1b[7m?\x1b[m\x1b[39m"
        );
    }

    #[test]
    fn match_overlay_is_blue() {
        let mut d = doc(&["find me"]);
        d.highlight_match(0, 5, 2);
        assert_eq!(
            emit(|w| draw_row(w, d.row(0).unwrap(), 0, 80)),
            "find \x1b[34mme\x1b[39m"
        );
    }

    // -- Frame --------------------------------------------------------------

    #[test]
    fn frame_layout() {
        let d = doc(&["one", "two"]);
        let mut c = Cursor::new(1, 2);
        let mut vp = Viewport::new(4, 40);
        let out = frame(&d, &mut c, &mut vp, "hi");

        let expected = [
            "\x1b[?25l\x1b[H",
            "one\x1b[K\r\n",
            "two\x1b[K\r\n",
            "~\x1b[K\r\n",
            "~\x1b[K\r\n",
        ]
        .concat();
        assert!(out.starts_with(&expected), "{out:?}");
        assert!(out.ends_with("\x1b[Khi\x1b[2;3H\x1b[?25h"), "{out:?}");
    }

    #[test]
    fn frame_rows_end_with_clear_and_newline() {
        let d = doc(&["a", "b", "c"]);
        let mut vp = Viewport::new(5, 20);
        let out = frame(&d, &mut Cursor::default(), &mut vp, "");
        // Five text rows plus the status bar.
        assert_eq!(out.matches("\x1b[K\r\n").count(), 5);
        assert_eq!(out.matches("\r\n").count(), 6);
    }

    #[test]
    fn empty_document_shows_welcome_centered() {
        let d = Document::new(8);
        let mut vp = Viewport::new(6, 60);
        let out = frame(&d, &mut Cursor::default(), &mut vp, "");
        let lines: Vec<&str> = out.split("\r\n").collect();

        let banner = welcome_banner();
        let pad = (60 - banner.len()) / 2;
        let welcome = format!("~{}{banner}\x1b[K", " ".repeat(pad - 1));
        assert_eq!(lines[3], welcome);
        assert_eq!(lines[2], "~\x1b[K");
        assert_eq!(lines[4], "~\x1b[K");
    }

    #[test]
    fn welcome_truncated_on_narrow_screen() {
        let out = emit(|w| draw_welcome(w, 4));
        assert_eq!(out, "Kilo");
    }

    #[test]
    fn no_welcome_when_document_has_rows() {
        let d = doc(&["x"]);
        let mut vp = Viewport::new(6, 60);
        let out = frame(&d, &mut Cursor::default(), &mut vp, "");
        assert!(!out.contains("Kilo editor"));
    }

    #[test]
    fn cursor_position_accounts_for_offsets() {
        let lines: Vec<String> = (0..30).map(|_| "\tabc".to_owned()).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let d = doc(&refs);
        let mut c = Cursor::new(20, 2);
        let mut vp = Viewport::new(10, 80);
        let out = frame(&d, &mut c, &mut vp, "");
        // Row 20 is the last visible line; column 2 renders at 9.
        assert!(out.ends_with("\x1b[10;10H\x1b[?25h"), "{out:?}");
    }

    // -- Status bar ---------------------------------------------------------

    #[test]
    fn status_text_unnamed_clean() {
        let d = doc(&["a", "b"]);
        let (left, right) = status_text(&d, &Cursor::new(1, 0));
        assert_eq!(left, "[No Name] - 2 lines");
        assert_eq!(right, "no ft | 2:1");
    }

    #[test]
    fn status_text_named_dirty() {
        let mut d = doc(&["a"]);
        d.set_filename("a_very_long_file_name_indeed.rs");
        let mut c = Cursor::new(0, 1);
        d.insert_char(&mut c, b'b');
        let (left, right) = status_text(&d, &c);
        assert_eq!(left, "a_very_long_file_nam - 1 lines (modified)");
        assert_eq!(right, "rust | 1:3");
    }

    #[test]
    fn status_bar_right_aligned() {
        let d = doc(&["a"]);
        let out = emit(|w| draw_status_bar(w, &d, &Cursor::default(), 40));
        let (left, right) = status_text(&d, &Cursor::default());
        let gap = " ".repeat(40 - left.len() - right.len());
        assert_eq!(out, format!("\x1b[7m{left}{gap}{right}\x1b[m\r\n"));
    }

    #[test]
    fn status_bar_drops_right_when_it_does_not_fit() {
        let d = doc(&["a"]);
        let out = emit(|w| draw_status_bar(w, &d, &Cursor::default(), 12));
        assert_eq!(out, "\x1b[7m[No Name] - \x1b[m\r\n");
    }

    // -- Message bar --------------------------------------------------------

    #[test]
    fn message_is_truncated() {
        assert_eq!(emit(|w| draw_message_bar(w, "hello world", 5)), "\x1b[Khello");
        assert_eq!(emit(|w| draw_message_bar(w, "", 5)), "\x1b[K");
    }

    #[test]
    fn syntax_detection_reaches_status_bar() {
        assert_eq!(syntax::detect(Path::new("x.py")).map(|s| s.name), Some("python"));
        let mut d = doc(&[]);
        d.set_filename("x.py");
        let (_, right) = status_text(&d, &Cursor::default());
        assert!(right.starts_with("python |"));
    }
}
