//! Syntax highlighting — filetype profiles and line-local classification.
//!
//! Highlighting works on a row's *render* bytes (tabs already expanded) and
//! assigns every byte a [`Highlight`] class. It never looks at neighboring
//! rows: strings and comments end at the end of the line.
//!
//! # Rules
//!
//! With a profile active, scanning left to right:
//!
//! 1. Outside a string, the profile's comment token turns the rest of the
//!    line into [`Highlight::Comment`].
//! 2. With `STRINGS`, a `"` or `'` opens a string that runs to the matching
//!    quote. A backslash inside a string takes the next byte with it.
//! 3. With `NUMBERS`, a digit preceded by a separator or another number
//!    byte is a number, and so is a `.` directly after a number byte, so
//!    `3.14` is numeric all the way through.
//!
//! Everything else is [`Highlight::Normal`]. Without a profile every byte
//! is `Normal`.

use std::path::Path;

use bitflags::bitflags;
use kilo_term::ansi::Color;

// ---------------------------------------------------------------------------
// Highlight classes
// ---------------------------------------------------------------------------

/// Classification of a single render byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Highlight {
    #[default]
    Normal,
    Number,
    String,
    Comment,
    /// Current search match. Set by search, never by the highlighter.
    Match,
}

impl Highlight {
    /// Terminal foreground color for this class.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Normal => Color::Default,
            Self::Number => Color::Red,
            Self::String => Color::Magenta,
            Self::Comment => Color::Cyan,
            Self::Match => Color::Blue,
        }
    }
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

bitflags! {
    /// Which rules a profile enables.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SyntaxFlags: u8 {
        const NUMBERS = 0b01;
        const STRINGS = 0b10;
    }
}

/// A filetype's highlighting rules. Profiles live in a static table and
/// rows share references to them.
#[derive(Debug, PartialEq, Eq)]
pub struct SyntaxProfile {
    /// Shown in the status bar.
    pub name: &'static str,
    /// File name suffixes that select this profile.
    pub extensions: &'static [&'static str],
    /// Single-line comment opener; empty disables comment highlighting.
    pub comment_token: &'static str,
    pub flags: SyntaxFlags,
}

/// Built-in profiles, searched in order.
pub static PROFILES: &[SyntaxProfile] = &[
    SyntaxProfile {
        name: "c",
        extensions: &[".c", ".h", ".cpp", ".hpp", ".cc"],
        comment_token: "//",
        flags: SyntaxFlags::NUMBERS.union(SyntaxFlags::STRINGS),
    },
    SyntaxProfile {
        name: "rust",
        extensions: &[".rs"],
        comment_token: "//",
        flags: SyntaxFlags::NUMBERS.union(SyntaxFlags::STRINGS),
    },
    SyntaxProfile {
        name: "python",
        extensions: &[".py"],
        comment_token: "#",
        flags: SyntaxFlags::NUMBERS.union(SyntaxFlags::STRINGS),
    },
];

/// Pick the first profile with an extension that is a suffix of the file
/// name. Returns `None` for unrecognized files.
#[must_use]
pub fn detect(path: &Path) -> Option<&'static SyntaxProfile> {
    let name = path.file_name()?.to_string_lossy();
    PROFILES
        .iter()
        .find(|profile| profile.extensions.iter().any(|ext| name.ends_with(ext)))
}

// ---------------------------------------------------------------------------
// Highlighting
// ---------------------------------------------------------------------------

/// Whether `b` ends a word for number detection.
#[must_use]
pub const fn is_separator(b: u8) -> bool {
    b.is_ascii_whitespace()
        || b == 0
        || matches!(
            b,
            b',' | b'.'
                | b'('
                | b')'
                | b'+'
                | b'-'
                | b'/'
                | b'*'
                | b'='
                | b'~'
                | b'%'
                | b'<'
                | b'>'
                | b'['
                | b']'
                | b';'
                | b'\''
                | b'"'
        )
}

/// Classify every byte of `render`. The result has the same length.
#[must_use]
pub fn highlight_line(render: &[u8], profile: Option<&SyntaxProfile>) -> Vec<Highlight> {
    let mut hl = vec![Highlight::Normal; render.len()];
    let Some(profile) = profile else {
        return hl;
    };

    let comment = profile.comment_token.as_bytes();
    let numbers = profile.flags.contains(SyntaxFlags::NUMBERS);
    let strings = profile.flags.contains(SyntaxFlags::STRINGS);

    let mut prev_sep = true;
    let mut in_string: Option<u8> = None;
    let mut i = 0;

    while i < render.len() {
        let b = render[i];
        let prev_hl = if i > 0 { hl[i - 1] } else { Highlight::Normal };

        if in_string.is_none() && !comment.is_empty() && render[i..].starts_with(comment) {
            hl[i..].fill(Highlight::Comment);
            break;
        }

        if strings {
            if let Some(quote) = in_string {
                hl[i] = Highlight::String;
                if b == b'\\' && i + 1 < render.len() {
                    hl[i + 1] = Highlight::String;
                    i += 2;
                    continue;
                }
                if b == quote {
                    in_string = None;
                }
                prev_sep = true;
                i += 1;
                continue;
            } else if b == b'"' || b == b'\'' {
                in_string = Some(b);
                hl[i] = Highlight::String;
                i += 1;
                continue;
            }
        }

        if numbers
            && ((b.is_ascii_digit() && (prev_sep || prev_hl == Highlight::Number))
                || (b == b'.' && prev_hl == Highlight::Number))
        {
            hl[i] = Highlight::Number;
            prev_sep = false;
            i += 1;
            continue;
        }

        prev_sep = is_separator(b);
        i += 1;
    }

    hl
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use super::Highlight::{Comment as C, Normal as N, Number as D, String as S};

    fn c_profile() -> Option<&'static SyntaxProfile> {
        detect(Path::new("main.c"))
    }

    // -- Detection ----------------------------------------------------------

    #[test]
    fn detect_by_suffix() {
        assert_eq!(detect(Path::new("main.c")).map(|p| p.name), Some("c"));
        assert_eq!(detect(Path::new("src/lib.rs")).map(|p| p.name), Some("rust"));
        assert_eq!(detect(Path::new("tool.py")).map(|p| p.name), Some("python"));
        assert_eq!(detect(Path::new("x.hpp")).map(|p| p.name), Some("c"));
    }

    #[test]
    fn detect_unknown_is_none() {
        assert!(detect(Path::new("notes.txt")).is_none());
        assert!(detect(Path::new("Makefile")).is_none());
        assert!(detect(Path::new("")).is_none());
    }

    // -- Classes ------------------------------------------------------------

    #[test]
    fn class_colors() {
        assert_eq!(Highlight::Normal.color(), Color::Default);
        assert_eq!(Highlight::Number.color(), Color::Red);
        assert_eq!(Highlight::Match.color(), Color::Blue);
    }

    #[test]
    fn separators() {
        for b in b" \t,.()+-/*=~%<>[];'\"\0" {
            assert!(is_separator(*b), "{:?}", *b as char);
        }
        for b in b"az_09{}" {
            assert!(!is_separator(*b), "{:?}", *b as char);
        }
    }

    // -- Highlighting -------------------------------------------------------

    #[test]
    fn no_profile_is_all_normal() {
        assert_eq!(highlight_line(b"x = 42", None), vec![N; 6]);
    }

    #[test]
    fn numbers_after_separator() {
        assert_eq!(highlight_line(b"x = 42;", c_profile()), vec![N, N, N, N, D, D, N]);
    }

    #[test]
    fn decimal_is_fully_numeric() {
        assert_eq!(highlight_line(b"3.14", c_profile()), vec![D; 4]);
    }

    #[test]
    fn digits_inside_identifier_are_normal() {
        assert_eq!(highlight_line(b"x1", c_profile()), vec![N, N]);
    }

    #[test]
    fn strings_run_to_matching_quote() {
        assert_eq!(
            highlight_line(b"a\"b'c\"d", c_profile()),
            vec![N, S, S, S, S, S, N]
        );
    }

    #[test]
    fn escaped_quote_stays_in_string() {
        assert_eq!(highlight_line(br#""\"" 1"#, c_profile()), vec![S, S, S, S, N, D]);
    }

    #[test]
    fn unterminated_string_runs_to_end_of_line() {
        assert_eq!(highlight_line(b"'ab", c_profile()), vec![S; 3]);
    }

    #[test]
    fn comment_runs_to_end_of_line() {
        assert_eq!(highlight_line(b"1 // 2", c_profile()), vec![D, N, C, C, C, C]);
    }

    #[test]
    fn comment_token_inside_string_is_text() {
        assert_eq!(highlight_line(b"\"//\"", c_profile()), vec![S; 4]);
    }

    #[test]
    fn python_hash_comment() {
        let py = detect(Path::new("a.py"));
        assert_eq!(highlight_line(b"x # 1", py), vec![N, N, C, C, C]);
    }

    #[test]
    fn output_length_matches_input() {
        let line = b"int main(void) { return 0; } // done";
        assert_eq!(highlight_line(line, c_profile()).len(), line.len());
    }
}
