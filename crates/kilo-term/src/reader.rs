// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Background stdin reader.
//
// One thread polls stdin and forwards raw byte chunks over a channel. The
// event loop waits on the channel with `recv_timeout`, which gives it a
// blocking read with a short timeout: zero CPU while idle, and a timeout
// tick to resolve a pending lone ESC or expire the status message.
//
// The thread never touches editor state. It owns nothing but the fd.
//
// Shutdown: the thread polls with a short timeout and checks a stop flag
// between polls, so `stop()` never waits on a blocked `read()`.

#[cfg(unix)]
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

/// Largest chunk read in one go. A keypress is 1–6 bytes; a paste can be
/// kilobytes.
const READ_BUF_SIZE: usize = 4096;

/// How often the thread checks the stop flag (milliseconds).
const POLL_TIMEOUT_MS: i32 = 50;

/// Background stdin reader thread.
///
/// # Example
///
/// ```no_run
/// use kilo_term::reader::StdinReader;
///
/// let (reader, rx) = StdinReader::spawn()?;
/// while let Ok(bytes) = rx.recv() {
///     println!("got {} bytes", bytes.len());
/// }
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct StdinReader {
    /// `None` after `stop()` joins it.
    handle: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
}

impl StdinReader {
    /// Spawn the reader thread.
    ///
    /// Each received `Vec<u8>` is a non-empty chunk of raw stdin data.
    /// The channel closes when the reader stops or stdin hits EOF.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to spawn the thread.
    pub fn spawn() -> std::io::Result<(Self, Receiver<Vec<u8>>)> {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("stdin-reader".into())
            .spawn(move || Self::reader_loop(&tx, &stop_flag))?;

        Ok((
            Self {
                handle: Some(handle),
                stop,
            },
            rx,
        ))
    }

    /// Signal the thread to stop and wait for it. Idempotent.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    #[cfg(unix)]
    fn reader_loop(tx: &mpsc::Sender<Vec<u8>>, stop: &AtomicBool) {
        use std::os::unix::io::AsRawFd;

        let stdin_fd = io::stdin().as_raw_fd();
        let mut buf = [0u8; READ_BUF_SIZE];

        while !stop.load(Ordering::Relaxed) {
            let ready = unsafe {
                let mut pfd = libc::pollfd {
                    fd: stdin_fd,
                    events: libc::POLLIN,
                    revents: 0,
                };
                libc::poll(&raw mut pfd, 1, POLL_TIMEOUT_MS)
            };

            if ready <= 0 {
                continue;
            }

            let n = unsafe { libc::read(stdin_fd, buf.as_mut_ptr().cast(), buf.len()) };

            if n <= 0 {
                tracing::debug!(result = n, "stdin closed");
                break;
            }

            #[allow(clippy::cast_sign_loss)] // n > 0 checked above.
            let chunk = buf[..n as usize].to_vec();

            if tx.send(chunk).is_err() {
                break;
            }
        }
    }

    /// Non-unix fallback: blocking reads, so `stop()` may wait for a key.
    #[cfg(not(unix))]
    fn reader_loop(tx: &mpsc::Sender<Vec<u8>>, stop: &AtomicBool) {
        use std::io::Read;

        let stdin = std::io::stdin();
        let mut buf = [0u8; READ_BUF_SIZE];

        while !stop.load(Ordering::Relaxed) {
            match stdin.lock().read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if tx.send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                }
            }
        }
    }
}

impl Drop for StdinReader {
    fn drop(&mut self) {
        self.stop();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
