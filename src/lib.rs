// src/lib.rs

//! _sltlib_ is the library of the _slt_ (syslog tailer) program.
//!
//! It turns plain text, gzip, or bzip2 syslog files, or already-open
//! streams, into parsed [`Entry`s]. Each file is read by a [`LogFile`] with
//! any number of named cursors. Several files are read as one stream by a
//! [`LogFileCollection`].
//!
//! [`Entry`s]: crate::data::entry::Entry
//! [`LogFile`]: crate::readers::logfile::LogFile
//! [`LogFileCollection`]: crate::readers::logfilecollection::LogFileCollection

pub mod common;
pub mod data;
pub mod debug;
pub mod readers;
#[cfg(test)]
pub mod tests;
