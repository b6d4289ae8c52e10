// SPDX-License-Identifier: MIT
//
// Terminal input parser.
//
// Turns raw stdin bytes into key events. The editor works on bytes, so
// printable input is never decoded as UTF-8: every byte at or above 0x20
// (other than DEL) arrives as its own `KeyCode::Char(u8)`.
//
// Recognized sequences:
//
// - Control bytes (Ctrl+letter, Enter, Tab, Backspace)
// - Legacy CSI sequences (arrows, Home/End, editing keys) with xterm
//   modifier parameters
// - SS3 sequences (application cursor mode arrows, Home/End)
// - Alt+key (ESC followed by a printable byte)
//
// Anything else that parses as a complete escape sequence is dropped so
// it never lands in the document as literal text.
//
// # Design
//
// Escape sequences can span multiple `read()` calls, so the parser keeps
// a small byte buffer. Feed bytes with [`Parser::advance`]. After a
// timeout with no new bytes, call [`Parser::flush`] to turn a pending
// lone ESC into a real Escape keypress.

use bitflags::bitflags;

// ─── Event Types ────────────────────────────────────────────────────────────

/// A keypress: key identity plus active modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Active modifier keys.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key with no modifiers.
    #[inline]
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// Ctrl + the given lowercase letter.
    #[inline]
    #[must_use]
    pub const fn ctrl(letter: u8) -> Self {
        Self {
            code: KeyCode::Char(letter),
            modifiers: Modifiers::CTRL,
        }
    }

    /// Whether this is exactly Ctrl + `letter` (no Alt, no Shift).
    #[inline]
    #[must_use]
    pub fn is_ctrl(&self, letter: u8) -> bool {
        self.modifiers == Modifiers::CTRL && self.code == KeyCode::Char(letter)
    }
}

/// Identity of a key.
///
/// Named keys have dedicated variants; every other byte uses
/// [`Char`](KeyCode::Char).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A single input byte (printable ASCII or a raw high byte).
    Char(u8),
    // ── Named keys ──────────────────────────────────────────────
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    Insert,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

bitflags! {
    /// Keyboard modifier flags.
    ///
    /// Bit layout matches the xterm CSI modifier encoding, where
    /// `param = 1 + bitmask`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

/// The control byte produced by holding Ctrl with `c` (`c & 0x1f`).
///
/// ```
/// use kilo_term::input::ctrl_key;
///
/// assert_eq!(ctrl_key(b'q'), 0x11);
/// assert_eq!(ctrl_key(b's'), 0x13);
/// ```
#[inline]
#[must_use]
pub const fn ctrl_key(c: u8) -> u8 {
    c & 0x1f
}

// ─── Parser ─────────────────────────────────────────────────────────────────

/// Terminal input parser.
///
/// Feed raw bytes via [`advance`](Parser::advance) and collect
/// [`KeyEvent`]s. Incomplete sequences are buffered and resumed when
/// more bytes arrive.
///
/// # Escape vs escape-sequence ambiguity
///
/// A bare `ESC` byte could be the Escape key or the start of a sequence.
/// The parser holds it as pending; the caller waits a short timeout and
/// then calls [`flush`](Parser::flush) to emit it as Escape.
pub struct Parser {
    /// Accumulated raw bytes waiting to be parsed.
    buf: Vec<u8>,
}

impl Parser {
    /// Create a new parser with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(64),
        }
    }

    /// Feed raw bytes from stdin and return every key that can be parsed.
    pub fn advance(&mut self, data: &[u8]) -> Vec<KeyEvent> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match try_parse(&self.buf[pos..]) {
                Parsed::Key(event, consumed) => {
                    events.push(event);
                    pos += consumed;
                }
                Parsed::Incomplete => break,
                Parsed::Skip(n) => pos += n,
            }
        }

        if pos > 0 {
            self.buf.drain(..pos);
        }

        events
    }

    /// Are there unconsumed bytes that might complete with more data?
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Flush pending bytes as literal keys.
    ///
    /// A lone ESC becomes Escape. A truncated sequence such as `ESC [`
    /// becomes Escape followed by its remaining bytes as characters.
    pub fn flush(&mut self) -> Vec<KeyEvent> {
        let events = self
            .buf
            .iter()
            .map(|&byte| match byte {
                0x1B => press(KeyCode::Escape),
                _ => match try_parse(&[byte]) {
                    Parsed::Key(event, _) => event,
                    Parsed::Incomplete | Parsed::Skip(_) => press(KeyCode::Char(byte)),
                },
            })
            .collect();
        self.buf.clear();
        events
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Stateless Parsing Functions ────────────────────────────────────────────
//
// All parse functions are pure: they read from the front of `buf` and
// return what they found plus how many bytes to consume.

/// Result of trying to parse one key from the buffer.
enum Parsed {
    /// Successfully parsed a key, consuming `usize` bytes.
    Key(KeyEvent, usize),
    /// Sequence is incomplete; need more bytes.
    Incomplete,
    /// Unrecognized sequence, skip `usize` bytes.
    Skip(usize),
}

/// Try to parse a single key from the front of `buf`.
fn try_parse(buf: &[u8]) -> Parsed {
    let Some(&first) = buf.first() else {
        return Parsed::Skip(0);
    };

    match first {
        0x1B => parse_escape(buf),
        0x08 | 0x7F => Parsed::Key(press(KeyCode::Backspace), 1),
        0x09 => Parsed::Key(press(KeyCode::Tab), 1),
        0x0A | 0x0D => Parsed::Key(press(KeyCode::Enter), 1),
        0x00 => Parsed::Key(KeyEvent::ctrl(b'@'), 1),
        b @ 0x01..=0x1A => Parsed::Key(KeyEvent::ctrl(b + b'a' - 1), 1),
        // FS, GS, RS, US: no letter to name them by.
        0x1C..=0x1F => Parsed::Skip(1),
        b => Parsed::Key(press(KeyCode::Char(b)), 1),
    }
}

// ── Escape sequences ────────────────────────────────────────────────────────

fn parse_escape(buf: &[u8]) -> Parsed {
    debug_assert_eq!(buf[0], 0x1B);

    if buf.len() < 2 {
        return Parsed::Incomplete;
    }

    match buf[1] {
        b'[' => parse_csi(buf),
        b'O' => parse_ss3(buf),
        b @ 0x20..=0x7E => Parsed::Key(key_with(KeyCode::Char(b), Modifiers::ALT), 2),
        // Anything else after ESC: the ESC was a real keypress.
        _ => Parsed::Key(press(KeyCode::Escape), 1),
    }
}

// ── CSI (Control Sequence Introducer) ───────────────────────────────────────

fn parse_csi(buf: &[u8]) -> Parsed {
    debug_assert!(buf.len() >= 2 && buf[0] == 0x1B && buf[1] == b'[');

    // Scan for the final byte (0x40..=0x7E). Parameter bytes are
    // 0x30..=0x3F, intermediates 0x20..=0x2F.
    let mut end = 2;
    while end < buf.len() {
        let b = buf[end];
        if (0x40..=0x7E).contains(&b) {
            break;
        }
        if !(0x20..=0x3F).contains(&b) {
            return Parsed::Skip(end + 1);
        }
        end += 1;
    }

    if end >= buf.len() {
        return Parsed::Incomplete;
    }

    let final_byte = buf[end];
    let params = parse_csi_params(&buf[2..end]);
    let consumed = end + 1;

    // ── Tilde-terminated editing keys: CSI n [; mod] ~ ──────────
    if final_byte == b'~' {
        let first = params.first().copied().unwrap_or(0);
        let modifiers = params.get(1).map_or(Modifiers::empty(), |&p| decode_modifiers(p));

        let code = match first {
            1 | 7 => KeyCode::Home,
            2 => KeyCode::Insert,
            3 => KeyCode::Delete,
            4 | 8 => KeyCode::End,
            5 => KeyCode::PageUp,
            6 => KeyCode::PageDown,
            _ => return Parsed::Skip(consumed),
        };
        return Parsed::Key(key_with(code, modifiers), consumed);
    }

    // ── Letter-terminated: CSI [1; mod] X ───────────────────────
    let modifiers = params.get(1).map_or(Modifiers::empty(), |&p| decode_modifiers(p));

    let code = match final_byte {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        _ => return Parsed::Skip(consumed),
    };

    Parsed::Key(key_with(code, modifiers), consumed)
}

// ── SS3 (Single Shift 3) ───────────────────────────────────────────────────

fn parse_ss3(buf: &[u8]) -> Parsed {
    debug_assert!(buf.len() >= 2 && buf[0] == 0x1B && buf[1] == b'O');

    if buf.len() < 3 {
        return Parsed::Incomplete;
    }

    let code = match buf[2] {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        _ => return Parsed::Skip(3),
    };

    Parsed::Key(press(code), 3)
}

// ─── Helpers ────────────────────────────────────────────────────────────────

/// Create a key press with no modifiers.
const fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code)
}

/// Create a key press with specific modifiers.
const fn key_with(code: KeyCode, modifiers: Modifiers) -> KeyEvent {
    KeyEvent { code, modifiers }
}

/// Parse semicolon-separated numeric CSI parameters.
///
/// - `1;5` → `[1, 5]`
/// - `3`   → `[3]`
/// - (empty) → `[]`
fn parse_csi_params(raw: &[u8]) -> Vec<u16> {
    if raw.is_empty() {
        return Vec::new();
    }

    raw.split(|&b| b == b';')
        .map(|field| {
            field
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .fold(0u16, |acc, &b| {
                    acc.saturating_mul(10).saturating_add(u16::from(b - b'0'))
                })
        })
        .collect()
}

/// Decode a CSI modifier parameter (`1 + bitmask`) into `Modifiers`.
/// A parameter of 0 or 1 means no modifiers.
#[allow(clippy::cast_possible_truncation)]
const fn decode_modifiers(param: u16) -> Modifiers {
    let val = if param > 0 { param - 1 } else { 0 };
    Modifiers::from_bits_truncate(val as u8)
}

// ─── Tests ──────────────────────────────────────────────────────────────────
