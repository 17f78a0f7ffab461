// src/debug/helpers.rs

//! Miscellaneous helper functions for testing.

use crate::common::FPath;

use std::io::Write; // for `NamedTempFile.write_all`

use ::filetime::{set_file_mtime, FileTime};
use ::flate2::write::GzEncoder;
use ::flate2::Compression;
use ::lazy_static::lazy_static;
#[allow(unused_imports)]
use ::si_trace_print::{dpfo, dpfñ};

#[doc(hidden)]
pub use ::tempfile::NamedTempFile;
#[doc(hidden)]
pub use ::tempfile::TempDir;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// temporary file helper functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// NamedTempFile instances default to this file name prefix.
pub const STR_TEMPFILE_PREFIX: &str = "tmp-slt-test-";

lazy_static! {
    pub static ref STRING_TEMPFILE_PREFIX: String = String::from(STR_TEMPFILE_PREFIX);
}

/// Small helper function for copying `NamedTempFile` path to a `FPath`.
pub fn ntf_fpath(ntf: &NamedTempFile) -> FPath {
    FPath::from(ntf.path().to_str().unwrap())
}

/// Testing helper function to write a `[u8]` to a temporary file.
pub fn create_temp_file_bytes(data: &[u8]) -> NamedTempFile {
    let mut ntf = match ::tempfile::Builder::new()
        // use known prefix for easier cleanup
        .prefix::<str>(&STRING_TEMPFILE_PREFIX)
        .tempfile()
    {
        Ok(val) => val,
        Err(err) => {
            panic!("tempfile::Builder::new().tempfile() return Err {}", err);
        }
    };
    match ntf.write_all(data) {
        Ok(_) => {}
        Err(err) => {
            panic!("NamedTempFile::write_all() return Err {}", err);
        }
    }
    match ntf.flush() {
        Ok(_) => {}
        Err(err) => {
            panic!("NamedTempFile::flush() return Err {}", err);
        }
    }
    dpfñ!("created {:?}", ntf.path());

    ntf
}

/// Testing helper function to write a `str` to a temporary file.
pub fn create_temp_file(data: &str) -> NamedTempFile {
    create_temp_file_bytes(data.as_bytes())
}

/// Testing helper function to gzip-compress a `str` into a temporary file.
pub fn create_temp_file_gz(data: &str) -> NamedTempFile {
    create_temp_file_gz_members(&[data])
}

/// Testing helper function to gzip-compress each of `members` and write them
/// one after another into a temporary file, like `gzip >> file` does.
pub fn create_temp_file_gz_members(members: &[&str]) -> NamedTempFile {
    let mut compressed: Vec<u8> = Vec::<u8>::new();
    for data in members.iter() {
        let mut encoder = GzEncoder::new(Vec::<u8>::new(), Compression::default());
        encoder.write_all(data.as_bytes()).unwrap();
        let member: Vec<u8> = encoder.finish().unwrap();
        dpfo!("compressed {} bytes to {} bytes", data.len(), member.len());
        compressed.extend_from_slice(&member);
    }

    create_temp_file_bytes(&compressed)
}

/// Append `data` to the file at `path`, like a logging process would.
pub fn append_to_file(path: &FPath, data: &str) {
    let mut file = match ::std::fs::OpenOptions::new()
        .append(true)
        .open(path)
    {
        Ok(val) => val,
        Err(err) => {
            panic!("OpenOptions::open({:?}) return Err {}", path, err);
        }
    };
    file.write_all(data.as_bytes()).unwrap();
    file.flush().unwrap();
}

/// Set the modification time of the file at `path` to `secs` since the
/// Unix epoch.
pub fn set_mtime(path: &FPath, secs: i64) {
    match set_file_mtime(path, FileTime::from_unix_time(secs, 0)) {
        Ok(_) => {}
        Err(err) => {
            panic!("set_file_mtime({:?}, {}) return Err {}", path, secs, err);
        }
    }
}

/// Create a temporary directory
pub fn create_temp_dir() -> TempDir {
    dpfñ!();
    ::tempfile::tempdir().unwrap()
}
