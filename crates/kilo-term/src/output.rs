// SPDX-License-Identifier: MIT
//
// Output buffering and stateful color emission.
//
// Two components keep terminal I/O small:
//
//   OutputBuffer — accumulates every byte of a frame in memory so the whole
//   frame reaches the terminal in a single write() syscall. No partial
//   frame is ever visible.
//
//   StyleWriter — remembers the foreground color it last emitted and skips
//   the SGR sequence when the next byte has the same color. A run of ten
//   digits costs one color change, not ten.

use std::io::{self, Write};

use crate::ansi::{self, Color};

// ─── OutputBuffer ────────────────────────────────────────────────────────────

/// A byte buffer that accumulates a frame for a single `write()` syscall.
pub struct OutputBuffer {
    buf: Vec<u8>,
}

const DEFAULT_CAPACITY: usize = 16_384;

impl OutputBuffer {
    /// Create an empty buffer with default capacity (16 KB).
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Clear the buffer for reuse (keeps allocated capacity).
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Write accumulated output to stdout in one call and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub fn flush_stdout(&mut self) -> io::Result<()> {
        if !self.buf.is_empty() {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&self.buf)?;
            stdout.flush()?;
            self.buf.clear();
        }
        Ok(())
    }

    /// Write accumulated output to an arbitrary writer and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
            self.buf.clear();
        }
        Ok(())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // No-op. Real flushing goes through flush_stdout() / flush_to().
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── StyleWriter ─────────────────────────────────────────────────────────────

/// Foreground color tracker that emits SGR only on transitions.
///
/// Starts out assuming the terminal is at its default color. Call
/// [`invalidate`](Self::invalidate) after anything that resets attributes
/// behind the writer's back (an SGR reset, an inverse-video span).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleWriter {
    current: Option<Color>,
}

impl StyleWriter {
    /// A writer that believes the terminal is showing the default color.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: Some(Color::Default),
        }
    }

    /// The color the terminal is known to be using, if any.
    #[inline]
    #[must_use]
    pub const fn current(&self) -> Option<Color> {
        self.current
    }

    /// Forget the tracked color; the next [`set_fg`](Self::set_fg)
    /// always emits.
    #[inline]
    pub const fn invalidate(&mut self) {
        self.current = None;
    }

    /// Switch the foreground to `color` unless it is already active.
    ///
    /// # Errors
    ///
    /// Propagates errors from the writer.
    pub fn set_fg(&mut self, w: &mut impl Write, color: Color) -> io::Result<()> {
        if self.current != Some(color) {
            ansi::fg(w, color)?;
            self.current = Some(color);
        }
        Ok(())
    }
}

impl Default for StyleWriter {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── OutputBuffer ────────────────────────────────────────────────

    #[test]
    fn output_buffer_new_is_empty() {
        let buf = OutputBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.len(), 0);
    }

    #[test]
    fn output_buffer_write_trait() {
        let mut buf = OutputBuffer::new();
        write!(buf, "row {}", 3).unwrap();
        assert_eq!(buf.as_bytes(), b"row 3");
    }

    #[test]
    fn output_buffer_clear_keeps_capacity() {
        let mut buf = OutputBuffer::new();
        buf.write_all(&[b'x'; 100]).unwrap();
        let cap = buf.buf.capacity();
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.buf.capacity(), cap);
    }

    #[test]
    fn output_buffer_flush_to() {
        let mut buf = OutputBuffer::new();
        buf.write_all(b"\x1b[Hframe").unwrap();
        let mut sink = Vec::new();
        buf.flush_to(&mut sink).unwrap();
        assert_eq!(sink, b"\x1b[Hframe");
        assert!(buf.is_empty());
    }

    #[test]
    fn output_buffer_flush_to_empty_is_noop() {
        let mut buf = OutputBuffer::new();
        let mut sink = Vec::new();
        buf.flush_to(&mut sink).unwrap();
        assert!(sink.is_empty());
    }

    // ── StyleWriter ─────────────────────────────────────────────────

    fn styled(colors: &[Color]) -> String {
        let mut style = StyleWriter::new();
        let mut out = Vec::new();
        for &c in colors {
            style.set_fg(&mut out, c).unwrap();
            out.push(b'x');
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn default_color_not_emitted_at_start() {
        assert_eq!(styled(&[Color::Default, Color::Default]), "xx");
    }

    #[test]
    fn color_emitted_once_per_run() {
        assert_eq!(
            styled(&[Color::Red, Color::Red, Color::Red]),
            "\x1b[31mxxx"
        );
    }

    #[test]
    fn every_transition_emits() {
        assert_eq!(
            styled(&[Color::Red, Color::Default, Color::Magenta]),
            "\x1b[31mx\x1b[39mx\x1b[35mx"
        );
    }

    #[test]
    fn invalidate_forces_re_emit() {
        let mut style = StyleWriter::new();
        let mut out = Vec::new();
        style.set_fg(&mut out, Color::Blue).unwrap();
        style.invalidate();
        assert_eq!(style.current(), None);
        style.set_fg(&mut out, Color::Blue).unwrap();
        assert_eq!(out, b"\x1b[34m\x1b[34m");
    }
}
