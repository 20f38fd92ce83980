use std::io;

use thiserror::Error;

/// Failures of the page cache or its backing file. All of these are fatal
/// for the session.
#[derive(Debug, Error)]
pub enum PagerError {
    #[error("page {page} is out of bounds (max {max})")]
    OutOfBounds { page: usize, max: usize },

    #[error("page {0} is not loaded and cannot be flushed")]
    NotLoaded(usize),

    #[error("corrupt db file: unexpected length of {len} bytes")]
    Corrupt { len: u64 },

    #[error("db file I/O failed")]
    Io(#[from] io::Error),
}

/// Rejections raised while turning an input line into a statement.
/// The messages are the lines shown to the user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PrepareError {
    #[error("Syntax error. Could not parse statement.")]
    Syntax,

    #[error("ID must be positive.")]
    NegativeId,

    #[error("String is too long.")]
    StringTooLong,

    #[error("Unrecognized keyword at start of '{0}'.")]
    UnrecognizedStatement(String),
}

#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("Error: Table full.")]
    TableFull,

    #[error(transparent)]
    Storage(#[from] PagerError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetaCommandError {
    #[error("Unrecognized command '{0}'.")]
    Unrecognized(String),
}

/// Failures that end an interactive session early.
#[derive(Debug, Error)]
pub enum ReplError {
    #[error("console I/O failed")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Storage(#[from] PagerError),
}
