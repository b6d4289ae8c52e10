//! Timed status message shown in the message bar.

use std::time::{Duration, Instant};

/// Message text plus the instant it was posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    text: String,
    set_at: Instant,
}

impl StatusMessage {
    #[must_use]
    pub fn new(text: impl Into<String>, now: Instant) -> Self {
        Self {
            text: text.into(),
            set_at: now,
        }
    }

    /// Replace the text and restart the display window.
    pub fn set(&mut self, text: impl Into<String>, now: Instant) {
        self.text = text.into();
        self.set_at = now;
    }

    /// Empty the message. An empty message is never visible.
    pub fn clear(&mut self) {
        self.text.clear();
    }

    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the message is still inside its display window at `now`.
    #[must_use]
    pub fn is_visible(&self, now: Instant, timeout: Duration) -> bool {
        !self.text.is_empty() && now.saturating_duration_since(self.set_at) < timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(2);

    #[test]
    fn visible_within_window() {
        let t0 = Instant::now();
        let msg = StatusMessage::new("hello", t0);
        assert!(msg.is_visible(t0, TIMEOUT));
        assert!(msg.is_visible(t0 + Duration::from_millis(1999), TIMEOUT));
        assert!(!msg.is_visible(t0 + TIMEOUT, TIMEOUT));
    }

    #[test]
    fn set_restarts_window() {
        let t0 = Instant::now();
        let mut msg = StatusMessage::new("a", t0);
        let t1 = t0 + Duration::from_secs(3);
        msg.set("b", t1);
        assert_eq!(msg.text(), "b");
        assert!(msg.is_visible(t1, TIMEOUT));
    }

    #[test]
    fn cleared_message_is_hidden() {
        let t0 = Instant::now();
        let mut msg = StatusMessage::new("a", t0);
        msg.clear();
        assert!(!msg.is_visible(t0, TIMEOUT));
    }
}
