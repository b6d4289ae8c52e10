// SPDX-License-Identifier: MIT
//
// kilo-term — Terminal plumbing for the kilo editor.
//
// Everything the editor needs to own a terminal: raw mode with a
// panic-safe restore, ANSI escape encoding, a byte-level key decoder,
// a background stdin reader, a single-write frame buffer, and the
// read-dispatch-render loop that ties them together.
//
// No TUI framework sits underneath. Escape sequences are written by
// hand and the whole frame goes out in one `write()`.

pub mod ansi;
pub mod event_loop;
pub mod input;
pub mod output;
pub mod reader;
pub mod terminal;
