//! Editor configuration.
//!
//! There is no config file. Values come from the defaults below, optionally
//! overridden by command-line flags.
//!
//! | Setting           | Default | Meaning                                         |
//! |-------------------|---------|-------------------------------------------------|
//! | `tab_stop`        | 8       | Tab expansion width in render columns           |
//! | `quit_times`      | 1       | Extra Ctrl-Q presses needed with unsaved edits  |
//! | `message_timeout` | 2 s     | How long a status message stays visible         |

use std::time::Duration;

/// Default tab stop.
pub const TAB_STOP: usize = 8;

/// Default number of extra Ctrl-Q presses required to discard changes.
pub const QUIT_TIMES: u8 = 1;

/// Default status message lifetime.
pub const MESSAGE_TIMEOUT: Duration = Duration::from_secs(2);

/// Runtime editor settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Tab expansion width. Always at least 1.
    pub tab_stop: usize,
    /// Extra Ctrl-Q presses needed to quit with unsaved changes.
    pub quit_times: u8,
    /// How long a status message stays on screen.
    pub message_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tab_stop: TAB_STOP,
            quit_times: QUIT_TIMES,
            message_timeout: MESSAGE_TIMEOUT,
        }
    }
}

impl Config {
    /// Override the tab stop. Zero is clamped to 1.
    #[must_use]
    pub fn with_tab_stop(mut self, tab_stop: usize) -> Self {
        self.tab_stop = tab_stop.max(1);
        self
    }

    /// Override the quit confirmation count.
    #[must_use]
    pub const fn with_quit_times(mut self, quit_times: u8) -> Self {
        self.quit_times = quit_times;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.tab_stop, 8);
        assert_eq!(config.quit_times, 1);
        assert_eq!(config.message_timeout, Duration::from_secs(2));
    }

    #[test]
    fn zero_tab_stop_clamps_to_one() {
        assert_eq!(Config::default().with_tab_stop(0).tab_stop, 1);
        assert_eq!(Config::default().with_tab_stop(4).tab_stop, 4);
    }

    #[test]
    fn quit_times_override() {
        assert_eq!(Config::default().with_quit_times(3).quit_times, 3);
    }
}
