// src/readers/mod.rs

//! "Readers" for _sltlib_.
//!
//! ## Overview of readers
//!
//! * A [`LogFileCollection`] drives several [`LogFile`]s as one stream.
//! * A `LogFile` drives a [`FileReader`] to derive [`Entry`s], served to
//!   named [`Cursors`].
//! * A `FileReader` reads lines from a plain text, gzip, or bzip2 file, or
//!   from an already-open stream.
//!
//! <br/>
//!
//! _These are not rust "Readers"; these structs do not implement the trait
//! [`Read`]. These are "readers" in an informal sense._
//!
//! [`Read`]: std::io::Read
//! [`Entry`s]: crate::data::entry::Entry
//! [`Cursors`]: crate::readers::cursors::Cursors
//! [`FileReader`]: crate::readers::filereader::FileReader
//! [`LogFile`]: crate::readers::logfile::LogFile
//! [`LogFileCollection`]: crate::readers::logfilecollection::LogFileCollection

pub mod cursors;
pub mod filereader;
pub mod helpers;
pub mod logfile;
pub mod logfilecollection;
