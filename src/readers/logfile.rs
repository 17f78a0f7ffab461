// src/readers/logfile.rs

//! Implements a [`LogFile`], the driver that turns the lines of one file
//! into cached [`Entry`s], served to any number of named cursors.
//!
//! A `LogFile` is in one of three [`LogFileState`s]:
//!
//! 1. `Fresh`: the file has not been opened.
//! 2. `Streaming`: the file is open and lines are read on demand.
//! 3. `Exhausted`: the end of the file was reached; all entries are cached.
//!
//! Calling [`reload`] returns to `Streaming` with an empty cache.
//! A growing plain text file returns from `Exhausted` to `Streaming` when
//! [`check_growth`] finds new data.
//!
//! Each cursor independently walks the entry cache. A cursor that reaches
//! the end of the cache while the file is `Exhausted` gets `Done` and is
//! reset, so the next [`advance`] starts again from the first entry.
//!
//! [`Entry`s]: crate::data::entry::Entry
//! [`LogFileState`s]: LogFileState
//! [`reload`]: LogFile::reload
//! [`check_growth`]: LogFile::check_growth
//! [`advance`]: LogFile::advance

use crate::common::{debug_panic, Count, FPath, FileSz, LogFileError, ResultS3};
use crate::data::datetime::{systemtime_to_year, SystemTime, Year};
use crate::data::entry::{is_continuation_line, Entries, Entry, EntryIndex, MessageFields};
use crate::data::source::{SourceFormat, SourceFormats};
#[allow(unused_imports)]
use crate::debug::printers::{de_err, de_wrn, e_err, e_wrn, str_to_String_noraw};
use crate::readers::cursors::{cursor_next_index, CursorPos, Cursors};
use crate::readers::filereader::{BoxBufRead, FileFormat, FileReader};
use crate::readers::helpers::{fpath_to_path, path_filesz, path_metadata_file};

use std::fmt;

use ::more_asserts::debug_assert_le;
use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Optional filter passed to [`LogFile::advance`]; entries for which it
/// returns `false` are skipped.
pub type EntryPredicate<'a> = Option<&'a dyn Fn(&Entry) -> bool>;

/// Processing state of a [`LogFile`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogFileState {
    /// Not yet opened.
    Fresh,
    /// Open, more lines may be read.
    Streaming,
    /// End of file or stream reached, all entries are cached.
    Exhausted,
}

impl fmt::Display for LogFileState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Result of [`LogFile::check_growth`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FileGrowth {
    /// The file is larger than the bytes read so far.
    Grown,
    /// The file size equals the bytes read so far.
    Unchanged,
    /// The file is smaller than the bytes read so far; it was truncated or
    /// replaced.
    Shrunk,
    /// Growth cannot be known: a compressed file, a stream, or a file not
    /// yet opened.
    NotApplicable,
}

/// A `LogFile` reads syslog [`Entry`s] from one file or stream.
///
/// Entries are parsed once and cached in order. Named cursors are indexes
/// into the cache; every `LogFile` has the cursor [`CURSOR_DEFAULT`].
///
/// [`Entry`s]: crate::data::entry::Entry
/// [`CURSOR_DEFAULT`]: crate::readers::cursors::CURSOR_DEFAULT
pub struct LogFile {
    /// Path of the file, or a descriptive label of a stream.
    path: FPath,
    /// Is this `LogFile` reading a caller-supplied stream?
    stream: bool,
    /// `None` until opened.
    reader: Option<FileReader>,
    /// Append-only cache of entries.
    entries: Entries,
    cursors: Cursors,
    /// End of file or stream was reached in this session.
    loaded: bool,
    /// Modification time at construction; construction time for a stream.
    mtime: SystemTime,
    /// Year given to entries.
    year: Year,
    source_formats: SourceFormats,
    /// Count of physical lines read.
    count_lines: Count,
    /// Count of physical lines folded into a prior entry.
    count_continuations: Count,
    /// Count of lines that could not be built into an entry.
    count_line_errors: Count,
    count_reloads: Count,
    /// First error, if any, as a `String`.
    error_first: Option<String>,
}

impl fmt::Debug for LogFile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("LogFile")
            .field("path", &self.path)
            .field("stream", &self.stream)
            .field("state", &self.state())
            .field("entries", &self.entries.len())
            .field("cursors", &self.cursors)
            .field("year", &self.year)
            .finish()
    }
}

impl LogFile {
    /// Create a `LogFile` for the regular file at `path`.
    ///
    /// The file modification time is read now; the file itself is opened
    /// on the first read or call to [`open`](LogFile::open).
    pub fn new(
        path: FPath,
        source_formats: &[SourceFormat],
    ) -> Result<LogFile, LogFileError> {
        defn!("({:?})", path);
        let mtime: SystemTime = match path_metadata_file(fpath_to_path(&path)).and_then(|m| m.modified()) {
            Ok(val) => val,
            Err(err) => {
                defx!("return OpenFailure {}", err);
                return Err(LogFileError::OpenFailure { path, source: err });
            }
        };
        let year: Year = systemtime_to_year(&mtime);
        defx!("mtime {:?}, year {}", mtime, year);

        Ok(LogFile::new_(path, false, None, mtime, year, source_formats))
    }

    /// Create a `LogFile` for an already-open `reader`. The `label` is used
    /// in place of a path.
    ///
    /// The modification time is now. A stream cannot be re-opened so
    /// [`reload`](LogFile::reload) only clears the cache.
    pub fn from_stream(
        label: FPath,
        reader: BoxBufRead,
        source_formats: &[SourceFormat],
    ) -> LogFile {
        defñ!("({:?})", label);
        let mtime: SystemTime = SystemTime::now();
        let year: Year = systemtime_to_year(&mtime);
        let filereader = FileReader::from_stream(label.clone(), reader);

        LogFile::new_(label, true, Some(filereader), mtime, year, source_formats)
    }

    fn new_(
        path: FPath,
        stream: bool,
        reader: Option<FileReader>,
        mtime: SystemTime,
        year: Year,
        source_formats: &[SourceFormat],
    ) -> LogFile {
        LogFile {
            path,
            stream,
            reader,
            entries: Entries::new(),
            cursors: Cursors::new(),
            loaded: false,
            mtime,
            year,
            source_formats: source_formats.to_vec(),
            count_lines: 0,
            count_continuations: 0,
            count_line_errors: 0,
            count_reloads: 0,
            error_first: None,
        }
    }

    /// Use `year` for all entries instead of the year of the modification
    /// time.
    pub fn with_year(
        mut self,
        year: Year,
    ) -> LogFile {
        self.year = year;

        self
    }

    pub fn path(&self) -> &FPath {
        &self.path
    }

    pub fn mtime(&self) -> SystemTime {
        self.mtime
    }

    pub fn year(&self) -> Year {
        self.year
    }

    pub fn is_stream(&self) -> bool {
        self.stream
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// `None` until opened.
    pub fn format(&self) -> Option<FileFormat> {
        self.reader.as_ref().map(|r| r.format())
    }

    pub fn state(&self) -> LogFileState {
        if self.loaded {
            LogFileState::Exhausted
        } else if self.reader.is_some() {
            LogFileState::Streaming
        } else {
            LogFileState::Fresh
        }
    }

    /// The cached entries, in file order.
    pub fn entries(&self) -> &[Entry] {
        self.entries.as_slice()
    }

    pub fn entry(
        &self,
        index: EntryIndex,
    ) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Count of cached entries.
    pub fn count_entries(&self) -> usize {
        self.entries.len()
    }

    /// Merge `data` into the [`MessageFields`] of the cached entry at
    /// `index`. Returns `false` if there is no such entry.
    pub fn update_entry_fields(
        &mut self,
        index: EntryIndex,
        data: MessageFields,
    ) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.update_fields(data);
                true
            }
            None => false,
        }
    }

    // cursors

    /// Add a new cursor, positioned before the first entry.
    pub fn register_cursor(
        &mut self,
        name: &str,
    ) -> Result<(), LogFileError> {
        self.cursors.register(name)
    }

    /// Index of the last entry served to cursor `name`, `None` if unset.
    pub fn cursor_position(
        &self,
        name: &str,
    ) -> Result<CursorPos, LogFileError> {
        self.cursors.get(name)
    }

    /// Set the cursor `name` to `pos`, the index of the last entry served.
    /// The next [`advance`](LogFile::advance) serves the entry after `pos`.
    pub fn set_cursor(
        &mut self,
        name: &str,
        pos: CursorPos,
    ) -> Result<(), LogFileError> {
        if let Some(index) = pos {
            if index >= self.entries.len() {
                // check the name first so an unknown name is reported as such
                self.cursors.get(name)?;
                return Err(LogFileError::CursorOutOfRange {
                    name: name.to_string(),
                    index,
                    count: self.entries.len(),
                });
            }
        }
        self.cursors.set(name, pos)
    }

    pub fn reset_cursor(
        &mut self,
        name: &str,
    ) -> Result<(), LogFileError> {
        self.cursors.reset(name)
    }

    pub fn cursor_names(&self) -> Vec<&str> {
        self.cursors.names()
    }

    // reading

    /// Open the file if it is `Fresh`. Otherwise do nothing.
    ///
    /// Reading opens the file as needed; call this to learn of
    /// [`OpenFailure`] or [`UnreadableFile`] early.
    ///
    /// [`OpenFailure`]: LogFileError::OpenFailure
    /// [`UnreadableFile`]: LogFileError::UnreadableFile
    pub fn open(&mut self) -> Result<(), LogFileError> {
        if self.reader.is_some() {
            return Ok(());
        }
        defn!("{:?}", self.path);
        let reader: FileReader = match FileReader::open(&self.path) {
            Ok(val) => val,
            Err(err) => {
                self.note_error(&err);
                defx!("return {}", err);
                return Err(err);
            }
        };
        defx!("opened as {:?}", reader.format());
        self.reader = Some(reader);

        Ok(())
    }

    fn note_error(
        &mut self,
        error: &LogFileError,
    ) {
        if self.error_first.is_none() {
            self.error_first = Some(error.to_string());
        }
    }

    /// Read physical lines until one new entry is appended to the cache.
    ///
    /// Continuation lines are folded into the last cached entry. A line
    /// that cannot be built into an entry is consumed, counted, and
    /// returned as `Err`. At the end of the file `loaded` is set.
    fn read_entry(&mut self) -> ResultS3<EntryIndex, LogFileError> {
        defn!();
        if let Err(err) = self.open() {
            defx!("open failed");
            return ResultS3::Err(err);
        }
        loop {
            let reader: &mut FileReader = match self.reader.as_mut() {
                Some(val) => val,
                None => {
                    defx!("no reader, return Done");
                    return ResultS3::Done;
                }
            };
            let line: String = match reader.read_line() {
                ResultS3::Found(val) => val,
                ResultS3::Done => {
                    self.loaded = true;
                    defx!("read_line Done; loaded, return Done");
                    return ResultS3::Done;
                }
                ResultS3::Err(err) => {
                    let err = LogFileError::ReadFailure { path: self.path.clone(), source: err };
                    self.note_error(&err);
                    defx!("read_line error, return {}", err);
                    return ResultS3::Err(err);
                }
            };
            self.count_lines += 1;
            if is_continuation_line(&line) {
                if let Some(entry) = self.entries.last_mut() {
                    defo!("continuation {:?}", str_to_String_noraw(&line));
                    entry.append_continuation(&line);
                    self.count_continuations += 1;
                    continue;
                }
            }
            match Entry::build(&line, self.year, &self.source_formats) {
                Ok(entry) => {
                    self.entries.push(entry);
                    let index: EntryIndex = self.entries.len() - 1;
                    defx!("return Found({})", index);
                    return ResultS3::Found(index);
                }
                Err(err) => {
                    self.count_line_errors += 1;
                    self.note_error(&err);
                    defx!("return {}", err);
                    return ResultS3::Err(err);
                }
            }
        }
    }

    /// Advance cursor `name` to the next entry, optionally skipping entries
    /// for which `predicate` returns `false`. Return the cache index of the
    /// entry.
    ///
    /// Returns `Done` at the end of the file, and resets the cursor.
    /// A line that cannot be built is returned as `Err`; the cursor does not
    /// move and the next call continues after that line.
    pub fn advance_index(
        &mut self,
        name: &str,
        predicate: EntryPredicate,
    ) -> ResultS3<EntryIndex, LogFileError> {
        defn!("({:?})", name);
        let mut pos: CursorPos = match self.cursors.get(name) {
            Ok(val) => val,
            Err(err) => {
                defx!("return {}", err);
                return ResultS3::Err(err);
            }
        };
        loop {
            let index: EntryIndex = cursor_next_index(pos);
            debug_assert_le!(index, self.entries.len(), "cursor {:?} beyond cache", name);
            if index < self.entries.len() {
                pos = Some(index);
                if let Err(err) = self.cursors.set(name, pos) {
                    return ResultS3::Err(err);
                }
                match predicate {
                    Some(predicate_) if !predicate_(&self.entries[index]) => {
                        defo!("predicate skipped {}", index);
                        continue;
                    }
                    _ => {}
                }
                defx!("return Found({})", index);
                return ResultS3::Found(index);
            }
            if self.loaded {
                defx!("loaded, cursor at end; reset cursor, return Done");
                return self.cursor_done(name);
            }
            match self.read_entry() {
                ResultS3::Found(index_) => {
                    if index_ != index {
                        debug_panic!("read_entry index {} expected {} for cursor {:?}", index_, index, name);
                    }
                }
                ResultS3::Done => {
                    defx!("read_entry Done; reset cursor, return Done");
                    return self.cursor_done(name);
                }
                ResultS3::Err(err) => {
                    defx!("return {}", err);
                    return ResultS3::Err(err);
                }
            }
        }
    }

    fn cursor_done(
        &mut self,
        name: &str,
    ) -> ResultS3<EntryIndex, LogFileError> {
        match self.cursors.reset(name) {
            Ok(_) => ResultS3::Done,
            Err(err) => ResultS3::Err(err),
        }
    }

    /// Advance cursor `name` to the next entry and return it.
    ///
    /// See [`advance_index`](LogFile::advance_index).
    pub fn advance(
        &mut self,
        name: &str,
        predicate: EntryPredicate,
    ) -> ResultS3<&Entry, LogFileError> {
        match self.advance_index(name, predicate) {
            ResultS3::Found(index) => ResultS3::Found(&self.entries[index]),
            ResultS3::Done => ResultS3::Done,
            ResultS3::Err(err) => ResultS3::Err(err),
        }
    }

    /// Read the remainder of the file into the cache. Cursors are not
    /// moved.
    ///
    /// Lines that cannot be built into entries are counted and skipped.
    /// Return the count of cached entries.
    pub fn load(&mut self) -> Result<usize, LogFileError> {
        defn!("{:?}", self.path);
        while !self.loaded {
            match self.read_entry() {
                ResultS3::Found(_) | ResultS3::Done => {}
                ResultS3::Err(err) if err.is_line_error() => {
                    de_wrn!("{:?}: {}", self.path, err);
                }
                ResultS3::Err(err) => {
                    defx!("return {}", err);
                    return Err(err);
                }
            }
        }
        defx!("return {}", self.entries.len());

        Ok(self.entries.len())
    }

    /// Drop all cached entries, reset all cursors, and re-open the file
    /// from the start.
    ///
    /// A stream is not re-opened; reading continues from the current
    /// position of the stream.
    pub fn reload(&mut self) -> Result<(), LogFileError> {
        defn!("{:?}", self.path);
        self.entries.clear();
        self.cursors.reset_all();
        self.loaded = false;
        self.count_reloads += 1;
        if self.stream {
            defx!("stream; not re-opened");
            return Ok(());
        }
        self.reader = None;
        let result = self.open();
        defx!();

        result
    }

    /// Compare the size of the file to the bytes read so far.
    ///
    /// Only a plain text file that has been opened can be checked. If the
    /// file has `Grown` and is `Exhausted` then it returns to `Streaming`
    /// so later reads get the new lines. If the file has `Shrunk` the caller
    /// should [`reload`](LogFile::reload).
    pub fn check_growth(&mut self) -> Result<FileGrowth, LogFileError> {
        let reader: &FileReader = match self.reader.as_ref() {
            Some(val) if val.format() == FileFormat::Text => val,
            _ => {
                defñ!("{:?} return NotApplicable", self.path);
                return Ok(FileGrowth::NotApplicable);
            }
        };
        let consumed: FileSz = reader.count_bytes();
        let filesz: FileSz = match path_filesz(fpath_to_path(&self.path)) {
            Some(val) => val,
            None => {
                let err = LogFileError::OpenFailure {
                    path: self.path.clone(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "file size unavailable"),
                };
                defñ!("{:?} return {}", self.path, err);
                return Err(err);
            }
        };
        let growth: FileGrowth = match filesz.cmp(&consumed) {
            std::cmp::Ordering::Greater => {
                self.loaded = false;
                FileGrowth::Grown
            }
            std::cmp::Ordering::Equal => FileGrowth::Unchanged,
            std::cmp::Ordering::Less => FileGrowth::Shrunk,
        };
        defñ!("{:?} filesz {} consumed {} return {:?}", self.path, filesz, consumed, growth);

        Ok(growth)
    }

    // filters

    /// Load the whole file, then return entries with host `host`.
    pub fn filter_host(
        &mut self,
        host: &str,
    ) -> Result<Vec<&Entry>, LogFileError> {
        self.load()?;

        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.host() == Some(host))
            .collect())
    }

    /// Load the whole file, then return entries with program `program`.
    pub fn filter_program(
        &mut self,
        program: &str,
    ) -> Result<Vec<&Entry>, LogFileError> {
        self.load()?;

        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.program() == Some(program))
            .collect())
    }

    /// Load the whole file, then return entries with a message matching
    /// `regex` starting at the first character of the message.
    pub fn filter_message(
        &mut self,
        regex: &Regex,
    ) -> Result<Vec<&Entry>, LogFileError> {
        self.load()?;

        Ok(self
            .entries
            .iter()
            .filter(|entry| message_is_match(regex, entry.message()))
            .collect())
    }

    /// Load the whole file, then return the named capture groups of each
    /// message matching `regex` starting at the first character of the
    /// message.
    ///
    /// Capture groups that did not participate in a match are absent.
    pub fn match_message(
        &mut self,
        regex: &Regex,
    ) -> Result<Vec<MessageFields>, LogFileError> {
        self.load()?;

        Ok(self
            .entries
            .iter()
            .filter_map(|entry| message_captures(regex, entry.message()))
            .collect())
    }

    // statistics

    pub fn summary(&self) -> SummaryLogFile {
        SummaryLogFile {
            path: self.path.clone(),
            format: self.format(),
            state: self.state(),
            year: self.year,
            entries: self.entries.len() as Count,
            lines: self.count_lines,
            continuations: self.count_continuations,
            line_errors: self.count_line_errors,
            reloads: self.count_reloads,
            bytes: self
                .reader
                .as_ref()
                .map_or(0, |r| r.count_bytes()),
            error: self.error_first.clone(),
        }
    }
}

/// Does `regex` match `message` at offset 0?
///
/// A leftmost match starts at offset 0 if any match does.
pub fn message_is_match(
    regex: &Regex,
    message: &str,
) -> bool {
    match regex.find(message) {
        Some(m) => m.start() == 0,
        None => false,
    }
}

/// The named capture groups of `regex` matching `message` at offset 0.
pub fn message_captures(
    regex: &Regex,
    message: &str,
) -> Option<MessageFields> {
    let captures = regex.captures(message)?;
    if captures.get(0)?.start() != 0 {
        return None;
    }
    let fields: MessageFields = regex
        .capture_names()
        .flatten()
        .filter_map(|name| {
            captures
                .name(name)
                .map(|m| (name.to_string(), m.as_str().to_string()))
        })
        .collect();

    Some(fields)
}

/// Accumulated statistics about one [`LogFile`].
///
/// For CLI option `--summary`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryLogFile {
    pub path: FPath,
    /// `None` if never opened.
    pub format: Option<FileFormat>,
    pub state: LogFileState,
    pub year: Year,
    pub entries: Count,
    pub lines: Count,
    pub continuations: Count,
    pub line_errors: Count,
    pub reloads: Count,
    /// (Decompressed) bytes read.
    pub bytes: FileSz,
    /// The first error, if any.
    pub error: Option<String>,
}

impl fmt::Display for SummaryLogFile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "File: {:?}", self.path)?;
        match self.format {
            Some(format) => writeln!(f, "  format        : {}", format)?,
            None => writeln!(f, "  format        : (not opened)")?,
        }
        writeln!(f, "  state         : {}", self.state)?;
        writeln!(f, "  year          : {}", self.year)?;
        writeln!(f, "  bytes         : {}", self.bytes)?;
        writeln!(f, "  lines         : {}", self.lines)?;
        writeln!(f, "  entries       : {}", self.entries)?;
        writeln!(f, "  continuations : {}", self.continuations)?;
        writeln!(f, "  line errors   : {}", self.line_errors)?;
        writeln!(f, "  reloads       : {}", self.reloads)?;
        match &self.error {
            Some(error) => write!(f, "  first error   : {}", error),
            None => write!(f, "  first error   : (none)"),
        }
    }
}
