//! # kilo-editor — Editor core for kilo
//!
//! The building blocks of a small byte-oriented text editor:
//!
//! - **[`row`]** — `Row`: one line of bytes with its tab-expanded render
//!   and per-byte highlight
//! - **[`syntax`]** — highlight classes, filetype profiles, line-local
//!   highlighting
//! - **[`document`]** — `Document`: rows, dirty counter, file name, edits,
//!   load and save
//! - **[`cursor`]** — `Cursor` and its movement rules
//! - **[`view`]** — `Viewport` scrolling and the frame renderer
//! - **[`pattern`]** — KMP substring matching over bytes
//! - **[`search`]** — incremental, wrapping, bidirectional search session
//! - **[`message`]** — the timed status message
//! - **[`editor`]** — `Editor`: key dispatch, prompts, and the
//!   [`App`](kilo_term::event_loop::App) implementation

pub mod config;
pub mod cursor;
pub mod document;
pub mod editor;
pub mod error;
pub mod message;
pub mod pattern;
pub mod row;
pub mod search;
pub mod syntax;
pub mod view;

pub use error::{Error, Result};
