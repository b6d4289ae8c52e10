// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop — read, dispatch, render.
//
// Stdin bytes arrive from the background reader, get decoded into keys,
// the application handles them, and when anything changed the application
// paints a complete frame into an `OutputBuffer` that goes out in one
// write. The editor state is only ever touched from this thread.
//
// # Timing
//
// The loop blocks on the reader channel with a timeout. Keys are handled
// the moment they arrive; with nothing to do the thread sleeps. The
// timeout is short (10 ms) while a partial escape sequence is pending, so
// a lone Escape resolves quickly, and longer otherwise. Each timeout
// gives the application a tick.
//
// # Signals
//
// SIGWINCH sets a flag that triggers a size re-query and a redraw.
// SIGTERM and SIGHUP set a flag that ends the loop like a quit, so the
// terminal is restored through the normal path instead of being left in
// raw mode. The handlers only store to atomics.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use crate::input::{KeyEvent, Parser};
use crate::output::OutputBuffer;
use crate::reader::StdinReader;
use crate::terminal::{Size, Terminal};

// ─── Signals ─────────────────────────────────────────────────────────────────

/// Set by the SIGWINCH handler. Checked each loop iteration.
static SIGWINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Set by the SIGTERM / SIGHUP handler. Checked each loop iteration.
static TERMINATE_RECEIVED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
fn install_signal_handlers() {
    install_handler(libc::SIGWINCH, sigwinch_handler as *const () as usize);
    install_handler(libc::SIGTERM, terminate_handler as *const () as usize);
    install_handler(libc::SIGHUP, terminate_handler as *const () as usize);
}

#[cfg(unix)]
fn install_handler(signal: libc::c_int, handler: usize) {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = handler;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(signal, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
}

#[cfg(unix)]
extern "C" fn terminate_handler(_sig: libc::c_int) {
    TERMINATE_RECEIVED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_signal_handlers() {}

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the event loop to do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep running.
    Continue,
    /// Exit the event loop cleanly.
    Quit,
}

/// Application interface for the event loop.
///
/// Each iteration the loop calls, in order:
///
/// 1. [`on_key`](App::on_key) for each decoded key
/// 2. [`on_resize`](App::on_resize) when the terminal size changed
/// 3. [`on_tick`](App::on_tick) on every wake-up
/// 4. [`paint`](App::paint) when anything asked for a redraw
///
/// Only [`paint`](App::paint) is required.
pub trait App {
    /// Handle one keypress. Return [`Action::Quit`] to exit the loop.
    fn on_key(&mut self, _key: &KeyEvent) -> Action {
        Action::Continue
    }

    /// Handle a terminal resize.
    fn on_resize(&mut self, _size: Size) {}

    /// Called every wake-up, even when no input arrived. Return `true` if
    /// time-based state changed and a repaint is needed.
    fn on_tick(&mut self) -> bool {
        false
    }

    /// Write one complete frame into `out`.
    ///
    /// The buffer is empty on entry and is flushed to the terminal in a
    /// single write afterwards.
    ///
    /// # Errors
    ///
    /// Propagates formatting errors from the buffer.
    fn paint(&mut self, out: &mut OutputBuffer) -> io::Result<()>;
}

// ─── Loop Config ─────────────────────────────────────────────────────────────

/// Event loop timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    /// Channel wait while idle (milliseconds). Also the tick period.
    pub tick_interval_ms: u64,
    /// Channel wait while a partial escape sequence is pending
    /// (milliseconds). Bounds the latency of a lone Escape.
    pub escape_timeout_ms: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            escape_timeout_ms: 10,
        }
    }
}

impl LoopConfig {
    /// How long to wait for input given whether a sequence is pending.
    #[must_use]
    pub const fn timeout(&self, pending: bool) -> Duration {
        if pending {
            Duration::from_millis(self.escape_timeout_ms)
        } else {
            Duration::from_millis(self.tick_interval_ms)
        }
    }
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// Why [`EventLoop::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// The application returned [`Action::Quit`].
    Quit,
    /// SIGTERM or SIGHUP arrived.
    Terminated,
    /// Stdin closed.
    InputClosed,
}

/// The terminal event loop.
///
/// # Example
///
/// ```no_run
/// use std::io::{self, Write};
///
/// use kilo_term::event_loop::{Action, App, EventLoop};
/// use kilo_term::input::KeyEvent;
/// use kilo_term::output::OutputBuffer;
///
/// struct Hello;
///
/// impl App for Hello {
///     fn on_key(&mut self, key: &KeyEvent) -> Action {
///         if key.is_ctrl(b'q') { Action::Quit } else { Action::Continue }
///     }
///
///     fn paint(&mut self, out: &mut OutputBuffer) -> io::Result<()> {
///         out.write_all(b"\x1b[Hhello")
///     }
/// }
///
/// let mut event_loop = EventLoop::new()?;
/// event_loop.run(&mut Hello)?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct EventLoop {
    terminal: Terminal,
    parser: Parser,
    out: OutputBuffer,
    config: LoopConfig,
}

impl EventLoop {
    /// Create an event loop with default timing.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal size cannot be determined.
    pub fn new() -> io::Result<Self> {
        Self::with_config(LoopConfig::default())
    }

    /// Create an event loop with custom timing.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal size cannot be determined.
    pub fn with_config(config: LoopConfig) -> io::Result<Self> {
        Ok(Self {
            terminal: Terminal::new()?,
            parser: Parser::new(),
            out: OutputBuffer::new(),
            config,
        })
    }

    /// The current terminal size.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Run until the application quits, a termination signal arrives, or
    /// stdin closes. The terminal is restored before returning, on the
    /// error path too.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup, painting, or output fails.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<Exit> {
        self.terminal.enter()?;
        install_signal_handlers();

        let result = match StdinReader::spawn() {
            Ok((mut reader, rx)) => {
                let result = self.run_inner(app, &rx);
                reader.stop();
                result
            }
            Err(err) => Err(err),
        };

        self.terminal.leave()?;
        tracing::info!(?result, "event loop finished");
        result
    }

    fn run_inner(&mut self, app: &mut impl App, rx: &Receiver<Vec<u8>>) -> io::Result<Exit> {
        let mut dirty = true;

        loop {
            // ── Render if dirty ──────────────────────────────────
            if dirty {
                self.out.clear();
                app.paint(&mut self.out)?;
                self.out.flush_stdout()?;
                dirty = false;
            }

            // ── Receive stdin bytes ──────────────────────────────
            let timeout = self.config.timeout(self.parser.has_pending());
            let keys = match rx.recv_timeout(timeout) {
                Ok(bytes) => self.parser.advance(&bytes),
                Err(RecvTimeoutError::Timeout) if self.parser.has_pending() => self.parser.flush(),
                Err(RecvTimeoutError::Timeout) => Vec::new(),
                Err(RecvTimeoutError::Disconnected) => return Ok(Exit::InputClosed),
            };

            for key in &keys {
                if app.on_key(key) == Action::Quit {
                    return Ok(Exit::Quit);
                }
            }
            dirty |= !keys.is_empty();

            // ── Signals ──────────────────────────────────────────
            if TERMINATE_RECEIVED.swap(false, Ordering::Relaxed) {
                tracing::info!("termination signal received");
                return Ok(Exit::Terminated);
            }

            if SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed) {
                let size = self.terminal.refresh_size();
                tracing::debug!(cols = size.cols, rows = size.rows, "terminal resized");
                app.on_resize(size);
                dirty = true;
            }

            // ── Tick ─────────────────────────────────────────────
            dirty |= app.on_tick();
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
