// src/common.rs
//
// common imports, type aliases, and other globals (avoids circular imports)

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// file-handling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub use std::fs::File;

/// `F`ake `Path` or `F`ile `Path`.
///
/// A stream-backed [`LogFile`] uses a descriptive label here instead of a
/// filesystem path.
///
/// [`LogFile`]: crate::readers::logfile::LogFile
pub type FPath = String;
pub type FPaths = Vec<FPath>;
pub type FileMetadata = std::fs::Metadata;
/// Size of a file in bytes.
pub type FileSz = u64;

/// A general-purpose counting type, used for statistics.
pub type Count = u64;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// custom Results enum for various *Reader functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

// XXX: ripped from '\.rustup\toolchains\beta-x86_64-pc-windows-msvc\lib\rustlib\src\rust\library\core\src\result.rs'
//      https://doc.rust-lang.org/src/core/result.rs.html#481-495

/// `Result` Extended
/// for line reading and entry advancing functions
#[derive(Debug, PartialEq)]
pub enum ResultS3<T, E> {
    /// Contains the success data
    Found(T),
    /// End of file or stream, nothing to return, but no bad errors happened
    Done,
    /// Contains the error value, something bad happened
    Err(E),
}

impl<T, E> ResultS3<T, E> {
    /// Returns `true` if the result is [`Done`](ResultS3::Done).
    #[inline(always)]
    pub const fn is_done(&self) -> bool {
        matches!(*self, ResultS3::Done)
    }
}

impl<T, E> std::fmt::Display for ResultS3<T, E>
where
    E: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultS3::Found(_) => { write!(f, "ResultS3::Found") },
            ResultS3::Done => { write!(f, "ResultS3::Done") },
            ResultS3::Err(err) => { write!(f, "ResultS3::Err({})", err) },
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// errors
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Errors from building [`Entry`s], reading [`LogFile`s], and using
/// cursors.
///
/// Reaching the end of a file is not an error; that is [`ResultS3::Done`].
///
/// Per-line errors (`MalformedTimestamp`, `UnparsableTimestamp`) spoil only
/// the one line. File errors (`OpenFailure`, `UnreadableFile`,
/// `ReadFailure`) spoil the one file. Cursor errors are caller mistakes.
///
/// [`Entry`s]: crate::data::entry::Entry
/// [`LogFile`s]: crate::readers::logfile::LogFile
#[derive(Debug, thiserror::Error)]
pub enum LogFileError {
    /// Path is missing, not a regular file, or could not be opened or
    /// `stat`ed.
    #[error("failed to open {path:?}: {source}")]
    OpenFailure {
        path: FPath,
        #[source]
        source: std::io::Error,
    },
    /// File opened but not readable as gzip, bzip2, or plain text.
    #[error("unreadable as gzip, bzip2, or text: {path:?}")]
    UnreadableFile { path: FPath },
    /// An I/O error after the file was successfully opened.
    #[error("failed reading {path:?}: {source}")]
    ReadFailure {
        path: FPath,
        #[source]
        source: std::io::Error,
    },
    /// Line does not split into month, day, time, and remainder.
    #[error("error splitting log line: {line:?}")]
    MalformedTimestamp { line: String },
    /// Month, day, and time tokens do not form a valid date and time.
    #[error("error parsing entry time from line: {line:?}")]
    UnparsableTimestamp { line: String },
    #[error("cursor name already registered: {0:?}")]
    DuplicateCursor(String),
    #[error("cursor name not registered: {0:?}")]
    UnknownCursor(String),
    /// Cursor set to an index beyond the cached entries.
    #[error("cursor {name:?} index {index} is beyond {count} cached entries")]
    CursorOutOfRange {
        name: String,
        index: usize,
        count: usize,
    },
}

impl LogFileError {
    /// Is this error limited to one line of a file?
    pub const fn is_line_error(&self) -> bool {
        matches!(
            self,
            LogFileError::MalformedTimestamp { .. } | LogFileError::UnparsableTimestamp { .. }
        )
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Lines
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// NewLine as char
#[allow(non_upper_case_globals)]
pub const NLc: char = '\n';
/// Single-byte newLine char as u8
#[allow(non_upper_case_globals)]
pub const NLu8: u8 = 10;

/// `panic!` in debug builds, print an error in release builds.
#[macro_export]
macro_rules! debug_panic {
    (
        $($args:tt)*
    ) => {
        {
            if cfg!(debug_assertions) {
                panic!($($args)*);
            } else {
                $crate::e_err!($($args)*);
            }
        }
    }
}
pub use debug_panic;
