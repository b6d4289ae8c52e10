//! Editor — key dispatch, prompts, and the event loop hook-up.
//!
//! [`Editor`] owns the document, cursor, viewport, and status message, and
//! implements [`App`] so the terminal event loop can drive it. Each key
//! goes either to the active prompt or to the normal dispatcher:
//!
//! | Key                        | Action                                   |
//! |----------------------------|------------------------------------------|
//! | Ctrl-Q                     | quit (repeat to discard unsaved changes) |
//! | Ctrl-S                     | save, asking for a name if there is none |
//! | Ctrl-F                     | incremental search                       |
//! | arrows, Home/End, PgUp/Dn  | cursor movement                          |
//! | Backspace / Ctrl-H         | delete the byte before the cursor        |
//! | Delete                     | delete the byte under the cursor         |
//! | Enter                      | split the line                           |
//! | Tab and printable bytes    | insert                                   |
//!
//! Ctrl-L, a bare Escape, and any other Ctrl or Alt chord are ignored.

use std::path::PathBuf;
use std::time::Instant;

use kilo_term::event_loop::{Action, App};
use kilo_term::input::{KeyCode, KeyEvent};
use kilo_term::output::OutputBuffer;
use kilo_term::terminal::Size;

use crate::config::Config;
use crate::cursor::{Cursor, Movement};
use crate::document::Document;
use crate::message::StatusMessage;
use crate::search::{SearchKey, SearchState};
use crate::view::{self, Viewport};

/// Shown in the message bar at startup.
pub const HELP_MESSAGE: &str = "HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find";

// ---------------------------------------------------------------------------
// Prompts
// ---------------------------------------------------------------------------

/// A line of input being collected in the message bar.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Prompt {
    Search { query: Vec<u8>, state: SearchState },
    SaveAs { input: Vec<u8> },
}

impl Prompt {
    fn line(&self) -> String {
        match self {
            Self::Search { query, .. } => {
                format!("Search: {} (Use ESC/Arrows/Enter)", String::from_utf8_lossy(query))
            }
            Self::SaveAs { input } => {
                format!("Save as: {} (ESC to cancel)", String::from_utf8_lossy(input))
            }
        }
    }
}

/// How a key edits a prompt's input.
enum PromptEdit {
    Push(u8),
    Pop,
    Submit,
    Cancel,
    Other,
}

impl PromptEdit {
    fn from_key(key: &KeyEvent) -> Self {
        match key.code {
            KeyCode::Escape => Self::Cancel,
            KeyCode::Enter => Self::Submit,
            KeyCode::Backspace | KeyCode::Delete => Self::Pop,
            KeyCode::Char(b) if key.modifiers.is_empty() && b >= 0x20 && b != 0x7f => {
                Self::Push(b)
            }
            _ => Self::Other,
        }
    }
}

// ---------------------------------------------------------------------------
// Editor
// ---------------------------------------------------------------------------

/// The editor: one document, its cursor and viewport, and the UI state
/// around them.
#[derive(Debug)]
pub struct Editor {
    document: Document,
    cursor: Cursor,
    viewport: Viewport,
    message: StatusMessage,
    config: Config,
    prompt: Option<Prompt>,
    /// Ctrl-Q presses still needed before a dirty document is discarded.
    quit_times_left: u8,
    /// Whether the status message was visible at the last check.
    message_visible: bool,
}

impl Editor {
    /// An editor on `document` for a terminal of `size`.
    #[must_use]
    pub fn new(document: Document, config: Config, size: Size) -> Self {
        Self {
            document,
            cursor: Cursor::default(),
            viewport: Viewport::from_size(size),
            message: StatusMessage::new(HELP_MESSAGE, Instant::now()),
            config,
            prompt: None,
            quit_times_left: config.quit_times,
            message_visible: true,
        }
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    #[inline]
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Whether a search or save-as prompt is collecting input.
    #[inline]
    #[must_use]
    pub const fn is_prompting(&self) -> bool {
        self.prompt.is_some()
    }

    /// What the message bar shows at `now`: the active prompt, else the
    /// status message while it is current.
    #[must_use]
    pub fn message_line(&self, now: Instant) -> String {
        if let Some(prompt) = &self.prompt {
            prompt.line()
        } else if self.message.is_visible(now, self.config.message_timeout) {
            self.message.text().to_owned()
        } else {
            String::new()
        }
    }

    // -- Dispatch -----------------------------------------------------------

    /// Handle one key.
    pub fn process_key(&mut self, key: &KeyEvent) -> Action {
        if self.prompt.is_some() {
            self.handle_prompt(key);
            return Action::Continue;
        }

        if key.is_ctrl(b'q') {
            return self.handle_quit();
        }
        self.quit_times_left = self.config.quit_times;

        if key.is_ctrl(b's') {
            self.save();
        } else if key.is_ctrl(b'f') {
            self.start_search();
        } else if key.modifiers.is_empty() {
            self.handle_edit_key(key.code);
        }

        Action::Continue
    }

    fn handle_edit_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => self.move_cursor(Movement::Up),
            KeyCode::Down => self.move_cursor(Movement::Down),
            KeyCode::Left => self.move_cursor(Movement::Left),
            KeyCode::Right => self.move_cursor(Movement::Right),
            KeyCode::Home => self.move_cursor(Movement::Home),
            KeyCode::End => self.move_cursor(Movement::End),
            KeyCode::PageUp => self.move_cursor(Movement::PageUp),
            KeyCode::PageDown => self.move_cursor(Movement::PageDown),
            KeyCode::Delete => {
                self.move_cursor(Movement::Right);
                self.document.delete_char_before(&mut self.cursor);
            }
            KeyCode::Backspace => self.document.delete_char_before(&mut self.cursor),
            KeyCode::Enter => self.document.insert_newline(&mut self.cursor),
            KeyCode::Tab => self.document.insert_char(&mut self.cursor, b'\t'),
            KeyCode::Char(b) => self.document.insert_char(&mut self.cursor, b),
            KeyCode::Escape | KeyCode::Insert => {}
        }
    }

    fn move_cursor(&mut self, movement: Movement) {
        self.cursor.apply(movement, &self.document, &self.viewport);
    }

    fn handle_quit(&mut self) -> Action {
        if self.document.is_dirty() && self.quit_times_left > 0 {
            let n = self.quit_times_left;
            self.set_message(format!(
                "WARNING!!! File has unsaved changes. Press Ctrl-Q {n} more times to quit."
            ));
            self.quit_times_left -= 1;
            return Action::Continue;
        }
        tracing::info!(dirty = self.document.dirty(), "quit");
        Action::Quit
    }

    // -- Saving -------------------------------------------------------------

    fn save(&mut self) {
        if self.document.filename().is_none() {
            self.prompt = Some(Prompt::SaveAs { input: Vec::new() });
            return;
        }
        let result = self.document.save();
        self.report_save(result);
    }

    fn save_as(&mut self, path: PathBuf) {
        let result = self.document.save_as(path);
        self.report_save(result);
    }

    fn report_save(&mut self, result: crate::Result<usize>) {
        match result {
            Ok(bytes) => self.set_message(format!("{bytes} bytes written to disk")),
            Err(err) => {
                tracing::warn!(error = %err, "save failed");
                self.set_message(format!("Can't save! I/O error: {err}"));
            }
        }
    }

    // -- Prompts ------------------------------------------------------------

    fn start_search(&mut self) {
        let state = SearchState::begin(&self.cursor, &self.viewport);
        self.prompt = Some(Prompt::Search {
            query: Vec::new(),
            state,
        });
    }

    fn handle_prompt(&mut self, key: &KeyEvent) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };
        match prompt {
            Prompt::Search { query, state } => self.handle_search_key(key, query, state),
            Prompt::SaveAs { input } => self.handle_save_as_key(key, input),
        }
    }

    fn handle_search_key(&mut self, key: &KeyEvent, mut query: Vec<u8>, mut state: SearchState) {
        let search_key = match (PromptEdit::from_key(key), key.code) {
            (PromptEdit::Submit, _) if !query.is_empty() => {
                state.confirm(&mut self.document);
                self.message.clear();
                return;
            }
            // An empty submit cancels like Escape.
            (PromptEdit::Cancel | PromptEdit::Submit, _) => {
                state.abort(&mut self.document, &mut self.cursor, &mut self.viewport);
                self.set_message("Search aborted");
                return;
            }
            (PromptEdit::Push(b), _) => {
                query.push(b);
                SearchKey::Edit
            }
            (PromptEdit::Pop, _) => {
                query.pop();
                SearchKey::Edit
            }
            (PromptEdit::Other, KeyCode::Down | KeyCode::Right) => SearchKey::Next,
            (PromptEdit::Other, KeyCode::Up | KeyCode::Left) => SearchKey::Previous,
            (PromptEdit::Other, _) => SearchKey::Edit,
        };

        state.on_key(&query, search_key, &mut self.document, &mut self.cursor);
        self.prompt = Some(Prompt::Search { query, state });
    }

    fn handle_save_as_key(&mut self, key: &KeyEvent, mut input: Vec<u8>) {
        match PromptEdit::from_key(key) {
            PromptEdit::Submit if !input.is_empty() => {
                let path = PathBuf::from(String::from_utf8_lossy(&input).into_owned());
                self.save_as(path);
                return;
            }
            PromptEdit::Cancel | PromptEdit::Submit => {
                self.set_message("Save aborted");
                return;
            }
            PromptEdit::Push(b) => input.push(b),
            PromptEdit::Pop => {
                input.pop();
            }
            PromptEdit::Other => {}
        }
        self.prompt = Some(Prompt::SaveAs { input });
    }

    // -- Messages -----------------------------------------------------------

    fn set_message(&mut self, text: impl Into<String>) {
        self.message.set(text, Instant::now());
        self.message_visible = true;
    }

    /// Re-check message visibility at `now`. Returns `true` when it just
    /// changed and the message bar needs a repaint.
    fn refresh_message(&mut self, now: Instant) -> bool {
        let visible = self.message.is_visible(now, self.config.message_timeout);
        let changed = visible != self.message_visible;
        self.message_visible = visible;
        changed
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

impl App for Editor {
    fn on_key(&mut self, key: &KeyEvent) -> Action {
        self.process_key(key)
    }

    fn on_resize(&mut self, size: Size) {
        self.viewport.resize(size);
        tracing::debug!(
            rows = self.viewport.screen_rows,
            cols = self.viewport.screen_cols,
            "resized"
        );
    }

    fn on_tick(&mut self) -> bool {
        self.refresh_message(Instant::now())
    }

    fn paint(&mut self, out: &mut OutputBuffer) -> std::io::Result<()> {
        let message = self.message_line(Instant::now());
        view::render_frame(
            out,
            &self.document,
            &mut self.cursor,
            &mut self.viewport,
            &message,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
