// src/readers/filereader.rs

//! Implements a [`FileReader`], the line-at-a-time reader of a plain text,
//! gzip, or bzip2 file, or of an already-open stream.
//!
//! The file format is found by probing the file content, not by the file
//! name extension. See [`detect_format`].

use crate::common::{Count, FPath, File, FileSz, LogFileError, NLu8, ResultS3};
use crate::readers::helpers::{fpath_to_path, path_metadata_file};

use std::fmt;
use std::io::{BufRead, BufReader, Read};

use ::bzip2_rs::DecoderReader as Bz2DecoderReader;
use ::flate2::read::MultiGzDecoder;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Gzip magic bytes, [RFC 1952].
///
/// [RFC 1952]: https://datatracker.ietf.org/doc/html/rfc1952#page-5
pub const GZ_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Bzip2 magic bytes, `"BZh"`.
pub const BZ2_MAGIC: [u8; 3] = [0x42, 0x5A, 0x68];

/// UTF-8 byte order mark, skipped at the start of the first line.
pub const BOM_UTF8: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Size of the buffer of the `BufReader` around a `File`.
pub const READER_CAPACITY: usize = 0x4000;

/// The format of the data read by a [`FileReader`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FileFormat {
    /// gzip compressed file
    Gz,
    /// bzip2 compressed file
    Bz2,
    /// plain text file
    #[default]
    Text,
    /// already-open stream passed by the caller; format unknown
    Stream,
}

impl FileFormat {
    /// Does this format read a file from a path?
    pub const fn is_file(&self) -> bool {
        !matches!(self, FileFormat::Stream)
    }

    pub const fn is_compressed(&self) -> bool {
        matches!(self, FileFormat::Gz | FileFormat::Bz2)
    }

    /// Do the `magic` leading bytes of a file allow this format?
    ///
    /// `Text` allows any bytes.
    pub fn magic_allows(
        &self,
        magic: &[u8],
    ) -> bool {
        match self {
            FileFormat::Gz => magic.starts_with(&GZ_MAGIC),
            FileFormat::Bz2 => magic.starts_with(&BZ2_MAGIC),
            FileFormat::Text => true,
            FileFormat::Stream => false,
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s: &str = match self {
            FileFormat::Gz => "gzip",
            FileFormat::Bz2 => "bzip2",
            FileFormat::Text => "text",
            FileFormat::Stream => "stream",
        };
        write!(f, "{}", s)
    }
}

/// File formats tried by [`detect_format`], in order.
pub const FILE_FORMATS_PROBE: [FileFormat; 3] = [FileFormat::Gz, FileFormat::Bz2, FileFormat::Text];

/// The boxed reader of a [`FileReader`].
pub type BoxBufRead = Box<dyn BufRead + Send>;

/// Open the file at `path` and wrap it in a decoder for `file_format`.
fn open_decoder(
    path: &FPath,
    file_format: FileFormat,
) -> std::io::Result<BoxBufRead> {
    defñ!("({:?}, {:?})", path, file_format);
    let file: File = File::open(fpath_to_path(path))?;
    let reader: BoxBufRead = match file_format {
        // a gzip file may be several concatenated members
        FileFormat::Gz => Box::new(BufReader::new(MultiGzDecoder::new(file))),
        FileFormat::Bz2 => Box::new(BufReader::new(Bz2DecoderReader::new(file))),
        FileFormat::Text | FileFormat::Stream => Box::new(BufReader::with_capacity(READER_CAPACITY, file)),
    };

    Ok(reader)
}

/// Read the leading bytes of the file at `path`, at most enough for any
/// magic bytes. A short file returns fewer bytes.
fn read_magic(path: &FPath) -> std::io::Result<Vec<u8>> {
    let file: File = File::open(fpath_to_path(path))?;
    let mut magic: Vec<u8> = Vec::with_capacity(BZ2_MAGIC.len());
    file.take(BZ2_MAGIC.len() as u64).read_to_end(&mut magic)?;
    defñ!("({:?}) return {:?}", path, magic);

    Ok(magic)
}

/// Can the file at `path` be read as `file_format`?
///
/// The leading bytes must allow the format and one line must be read from a
/// decoder without error. The first line of a `Text` file must not have a
/// NUL byte; the file is presumed binary.
fn probe_format(
    path: &FPath,
    magic: &[u8],
    file_format: FileFormat,
) -> bool {
    defn!("({:?}, {:?})", path, file_format);
    if !file_format.magic_allows(magic) {
        defx!("magic bytes do not allow {:?}, return false", file_format);
        return false;
    }
    let mut reader: BoxBufRead = match open_decoder(path, file_format) {
        Ok(val) => val,
        Err(_err) => {
            defx!("open_decoder error {}, return false", _err);
            return false;
        }
    };
    let mut buffer: Vec<u8> = Vec::<u8>::new();
    match reader.read_until(NLu8, &mut buffer) {
        Ok(_count) => {
            defo!("read {} bytes", _count);
        }
        Err(_err) => {
            defx!("read_until error {}, return false", _err);
            return false;
        }
    }
    if file_format == FileFormat::Text && buffer.contains(&0) {
        defx!("first line has a NUL byte, return false");
        return false;
    }
    defx!("return true");

    true
}

/// Find the [`FileFormat`] of the file at `path` by probing in order gzip,
/// bzip2, then plain text. An empty file is plain text.
///
/// Returns [`LogFileError::OpenFailure`] if `path` is not an existing
/// regular file or cannot be opened.
/// Returns [`LogFileError::UnreadableFile`] if no format fits.
pub fn detect_format(path: &FPath) -> Result<FileFormat, LogFileError> {
    defn!("({:?})", path);
    if let Err(err) = path_metadata_file(fpath_to_path(path)) {
        defx!("path_metadata_file error, return OpenFailure");
        return Err(LogFileError::OpenFailure { path: path.clone(), source: err });
    }
    let magic: Vec<u8> = match read_magic(path) {
        Ok(val) => val,
        Err(err) => {
            defx!("read_magic error, return OpenFailure");
            return Err(LogFileError::OpenFailure { path: path.clone(), source: err });
        }
    };
    for file_format in FILE_FORMATS_PROBE.iter() {
        if probe_format(path, &magic, *file_format) {
            defx!("return {:?}", file_format);
            return Ok(*file_format);
        }
    }
    defx!("no format fits, return UnreadableFile");

    Err(LogFileError::UnreadableFile { path: path.clone() })
}

/// A `FileReader` reads lines from a plain text, gzip or bzip2 file, or from
/// an already-open stream.
///
/// Bytes are converted to UTF-8 lossily; invalid sequences become
/// `U+FFFD`.
pub struct FileReader {
    /// Path of the file, or a descriptive label for a stream.
    path: FPath,
    format: FileFormat,
    reader: BoxBufRead,
    /// Reused buffer for `read_until`.
    buffer: Vec<u8>,
    /// Count of lines returned by `read_line`.
    count_lines: Count,
    /// Count of (decompressed) bytes returned by `read_line`, including
    /// newlines.
    count_bytes: FileSz,
}

impl fmt::Debug for FileReader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FileReader")
            .field("path", &self.path)
            .field("format", &self.format)
            .field("count_lines", &self.count_lines)
            .field("count_bytes", &self.count_bytes)
            .finish()
    }
}

impl FileReader {
    /// Open the file at `path`, detecting its format with
    /// [`detect_format`]. The returned reader starts at the beginning of the
    /// file.
    pub fn open(path: &FPath) -> Result<FileReader, LogFileError> {
        defn!("({:?})", path);
        let format: FileFormat = detect_format(path)?;
        let reader: BoxBufRead = match open_decoder(path, format) {
            Ok(val) => val,
            Err(err) => {
                defx!("open_decoder error, return OpenFailure");
                return Err(LogFileError::OpenFailure { path: path.clone(), source: err });
            }
        };
        defx!("{:?}", format);

        Ok(FileReader {
            path: path.clone(),
            format,
            reader,
            buffer: Vec::<u8>::with_capacity(1024),
            count_lines: 0,
            count_bytes: 0,
        })
    }

    /// Wrap an already-open stream. The `label` is used in place of a path.
    pub fn from_stream(
        label: FPath,
        reader: BoxBufRead,
    ) -> FileReader {
        defñ!("({:?})", label);
        FileReader {
            path: label,
            format: FileFormat::Stream,
            reader,
            buffer: Vec::<u8>::with_capacity(1024),
            count_lines: 0,
            count_bytes: 0,
        }
    }

    /// Read the next line, without the trailing `"\n"` or `"\r\n"`.
    /// A UTF-8 byte order mark at the start of the first line is removed.
    ///
    /// Returns `Done` at the end of the file or stream. A later call may
    /// return `Found` if the file or stream has grown.
    pub fn read_line(&mut self) -> ResultS3<String, std::io::Error> {
        self.buffer.clear();
        let count: usize = match self.reader.read_until(NLu8, &mut self.buffer) {
            Ok(val) => val,
            Err(err) => {
                defñ!("{:?} read_until error {}", self.path, err);
                return ResultS3::Err(err);
            }
        };
        if count == 0 {
            defñ!("{:?} return Done", self.path);
            return ResultS3::Done;
        }
        let first: bool = self.count_lines == 0;
        self.count_lines += 1;
        self.count_bytes += count as FileSz;

        let mut line: &[u8] = self.buffer.as_slice();
        if first {
            if let Some(line_) = line.strip_prefix(&BOM_UTF8) {
                defo!("{:?} skip byte order mark", self.path);
                line = line_;
            }
        }
        if let Some(line_) = line.strip_suffix(&[NLu8]) {
            line = line_;
        }
        if let Some(line_) = line.strip_suffix(b"\r") {
            line = line_;
        }

        ResultS3::Found(String::from_utf8_lossy(line).into_owned())
    }

    pub fn path(&self) -> &FPath {
        &self.path
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    pub fn count_lines(&self) -> Count {
        self.count_lines
    }

    pub fn count_bytes(&self) -> FileSz {
        self.count_bytes
    }
}
