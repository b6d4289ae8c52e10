//! Pattern — linear-time substring search over bytes.
//!
//! A [`Pattern`] precomputes the Knuth–Morris–Pratt prefix table for its
//! needle once, then scans any number of haystacks in
//! `O(haystack + needle)` time. Matching is exact and case-sensitive.
//!
//! An empty needle never matches. Search treats an empty query as "nothing
//! to find" rather than "matches everywhere".

/// A compiled needle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern<'a> {
    needle: &'a [u8],
    /// `lps[i]` = length of the longest proper prefix of `needle[..=i]`
    /// that is also a suffix of it.
    lps: Vec<usize>,
}

impl<'a> Pattern<'a> {
    #[must_use]
    pub fn new(needle: &'a [u8]) -> Self {
        Self {
            needle,
            lps: prefix_table(needle),
        }
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.needle.len()
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// First match starting at or after `from`.
    #[must_use]
    pub fn find_from(&self, haystack: &[u8], from: usize) -> Option<usize> {
        if from > haystack.len() {
            return None;
        }
        self.find_iter(&haystack[from..]).next().map(|at| at + from)
    }

    /// Last match starting at or before `limit`. `usize::MAX` searches the
    /// whole haystack.
    #[must_use]
    pub fn rfind_at_or_before(&self, haystack: &[u8], limit: usize) -> Option<usize> {
        let end = limit.saturating_add(self.len()).min(haystack.len());
        self.find_iter(&haystack[..end]).last()
    }

    /// All match start offsets, overlapping, in increasing order.
    #[must_use]
    pub fn find_iter<'h>(&'h self, haystack: &'h [u8]) -> Matches<'h> {
        Matches {
            needle: self.needle,
            lps: &self.lps,
            haystack,
            pos: 0,
            matched: 0,
        }
    }
}

/// Iterator over match offsets. See [`Pattern::find_iter`].
#[derive(Debug, Clone)]
pub struct Matches<'h> {
    needle: &'h [u8],
    lps: &'h [usize],
    haystack: &'h [u8],
    pos: usize,
    matched: usize,
}

impl Iterator for Matches<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.needle.is_empty() {
            return None;
        }
        while self.pos < self.haystack.len() {
            let b = self.haystack[self.pos];
            while self.matched > 0 && self.needle[self.matched] != b {
                self.matched = self.lps[self.matched - 1];
            }
            if self.needle[self.matched] == b {
                self.matched += 1;
            }
            self.pos += 1;
            if self.matched == self.needle.len() {
                self.matched = self.lps[self.matched - 1];
                return Some(self.pos - self.needle.len());
            }
        }
        None
    }
}

fn prefix_table(needle: &[u8]) -> Vec<usize> {
    let mut lps = vec![0; needle.len()];
    let mut len = 0;
    for i in 1..needle.len() {
        while len > 0 && needle[i] != needle[len] {
            len = lps[len - 1];
        }
        if needle[i] == needle[len] {
            len += 1;
        }
        lps[i] = len;
    }
    lps
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn all(needle: &str, haystack: &str) -> Vec<usize> {
        Pattern::new(needle.as_bytes())
            .find_iter(haystack.as_bytes())
            .collect()
    }

    // -- Prefix table -------------------------------------------------------

    #[test]
    fn prefix_table_examples() {
        assert_eq!(prefix_table(b"aabaaab"), vec![0, 1, 0, 1, 2, 2, 3]);
        assert_eq!(prefix_table(b"abcd"), vec![0, 0, 0, 0]);
        assert_eq!(prefix_table(b"aaaa"), vec![0, 1, 2, 3]);
        assert!(prefix_table(b"").is_empty());
    }

    // -- Forward ------------------------------------------------------------

    #[test]
    fn finds_all_matches() {
        assert_eq!(all("ba", "foo bar baz"), vec![4, 8]);
    }

    #[test]
    fn overlapping_matches() {
        assert_eq!(all("aa", "aaaa"), vec![0, 1, 2]);
        assert_eq!(all("abab", "abababab"), vec![0, 2, 4]);
    }

    #[test]
    fn fallback_through_prefix_table() {
        assert_eq!(all("aab", "aaab"), vec![1]);
        assert_eq!(all("abcabd", "abcabcabd"), vec![3]);
    }

    #[test]
    fn no_match() {
        assert!(all("xyz", "foo bar").is_empty());
        assert!(all("longer", "short").is_empty());
        assert!(all("a", "").is_empty());
    }

    #[test]
    fn empty_needle_never_matches() {
        let p = Pattern::new(b"");
        assert!(p.is_empty());
        assert_eq!(p.find_iter(b"abc").next(), None);
        assert_eq!(p.find_from(b"abc", 0), None);
        assert_eq!(p.rfind_at_or_before(b"abc", usize::MAX), None);
    }

    #[test]
    fn case_sensitive() {
        assert!(all("Foo", "foo").is_empty());
    }

    #[test]
    fn find_from_offset() {
        let p = Pattern::new(b"ab");
        assert_eq!(p.find_from(b"ab ab ab", 0), Some(0));
        assert_eq!(p.find_from(b"ab ab ab", 1), Some(3));
        assert_eq!(p.find_from(b"ab ab ab", 6), Some(6));
        assert_eq!(p.find_from(b"ab ab ab", 7), None);
        assert_eq!(p.find_from(b"ab", 99), None);
    }

    // -- Backward -----------------------------------------------------------

    #[test]
    fn rfind_at_or_before_limit() {
        let p = Pattern::new(b"ab");
        let hay = b"ab ab ab";
        assert_eq!(p.rfind_at_or_before(hay, usize::MAX), Some(6));
        assert_eq!(p.rfind_at_or_before(hay, 6), Some(6));
        assert_eq!(p.rfind_at_or_before(hay, 5), Some(3));
        assert_eq!(p.rfind_at_or_before(hay, 2), Some(0));
        assert_eq!(p.rfind_at_or_before(hay, 0), Some(0));
    }

    #[test]
    fn rfind_with_no_room_for_match() {
        let p = Pattern::new(b"bc");
        assert_eq!(p.rfind_at_or_before(b"abc", 0), None);
        assert_eq!(p.rfind_at_or_before(b"abc", 1), Some(1));
    }

    #[test]
    fn agrees_with_naive_search() {
        let hay = b"abracadabra abracadabra";
        for needle in ["a", "abra", "cad", "ra a", "bra", "zz"].map(str::as_bytes) {
            let naive: Vec<usize> = hay
                .windows(needle.len())
                .enumerate()
                .filter(|(_, w)| *w == needle)
                .map(|(i, _)| i)
                .collect();
            let kmp: Vec<usize> = Pattern::new(needle).find_iter(hay).collect();
            assert_eq!(kmp, naive, "{:?}", String::from_utf8_lossy(needle));
        }
    }
}
