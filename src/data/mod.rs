// src/data/mod.rs

//! The `data` module is specialized data containers for syslog
//! [`Entry`]s and the functions that build them.
//!
//! ## Definitions of data
//!
//! ### Line
//!
//! A "line" is a sequence of bytes in a file that:
//!
//! * begin after a prior "line" or the beginning of a file.
//! * end with a newline character `'\n'` or the end of a file.
//!
//! ### Entry
//!
//! An "entry" is one syslog message. It is one "line" that:
//!
//! * begins with a syslog datetime stamp, e.g. `Jan  5 10:22:31`.
//! * may have a "source" substring after the datetime stamp, ended by the
//!   first `':'`.
//! * has a "message", the remaining text.
//!
//! followed by zero or more "continuation lines".
//!
//! An "entry" is represented by an [`Entry`].
//!
//! ### Continuation line
//!
//! A "continuation line" is a "line" that begins with a space or tab. It is
//! appended to the message of the prior "entry".
//!
//! ### Source
//!
//! The "source" substring is classified by [`classify_source`] into a host,
//! program, pid, and other optional fields.
//!
//! [`Entry`]: crate::data::entry::Entry
//! [`classify_source`]: crate::data::source::classify_source

pub mod datetime;
pub mod entry;
pub mod source;
