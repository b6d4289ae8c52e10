//! Error type for document I/O.

use std::io;

/// Errors surfaced by [`Document`](crate::document::Document) file
/// operations. Editing itself never fails; out-of-range edits are bugs
/// and panic.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `save()` was called before a file name was bound.
    #[error("no file name")]
    NoFileName,

    /// Reading or writing the file failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
