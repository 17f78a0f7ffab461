// src/readers/helpers.rs

//! Miscellaneous helper functions for _Readers_.

use crate::common::{FPath, FileMetadata, FileSz};

use std::io::Result;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Helper function for a slightly annoying set of calls.
pub fn path_to_fpath(path: &std::path::Path) -> FPath {
    (*(path.to_string_lossy())).to_string()
}

/// Helper function for completeness.
pub fn fpath_to_path(path: &FPath) -> &std::path::Path {
    std::path::Path::new(path)
}

/// Return the `Metadata` of a regular file.
///
/// A directory or other non-regular file is an
/// [`ErrorKind::InvalidInput`] error.
///
/// [`ErrorKind::InvalidInput`]: std::io::ErrorKind::InvalidInput
pub fn path_metadata_file(path: &std::path::Path) -> Result<FileMetadata> {
    defn!("({:?})", path);
    let metadata: FileMetadata = std::fs::metadata(path)?;
    if !metadata.is_file() {
        defx!("not a file, return Err");
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("not a regular file {:?}", path),
        ));
    }
    defx!("return Ok");

    Ok(metadata)
}

/// Return the size of the file.
pub fn path_filesz(path: &std::path::Path) -> Option<FileSz> {
    defn!("({:?})", path);
    let metadata = match std::fs::metadata(path) {
        Ok(val) => val,
        Err(_err) => {
            defx!("error {}, return None", _err);
            return None;
        }
    };
    let len: FileSz = metadata.len();
    defx!("return {}", len);

    Some(len)
}
