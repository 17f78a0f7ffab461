// src/readers/logfilecollection.rs

//! Implements a [`LogFileCollection`], an ordered set of [`LogFile`s] read
//! as one stream of [`Entry`s].
//!
//! Files are ordered by modification time (whole seconds), then by path.
//! The merged stream is every entry of the first file, then every entry of
//! the second file, and so on. Entries are not interleaved by datetime.
//!
//! [`LogFile`s]: crate::readers::logfile::LogFile
//! [`Entry`s]: crate::data::entry::Entry

use crate::common::{FPath, LogFileError, ResultS3};
use crate::data::datetime::systemtime_to_secs;
use crate::data::entry::{Entry, EntryIndex, MessageFields};
use crate::data::source::SourceFormat;
use crate::readers::cursors::CURSOR_DEFAULT;
use crate::readers::logfile::{
    message_captures,
    message_is_match,
    EntryPredicate,
    LogFile,
    SummaryLogFile,
};

use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Index of an [`Entry`] within a [`LogFileCollection`]: the index of the
/// `LogFile`, then the index of the entry in that file.
pub type CollectionIndex = (usize, EntryIndex);

/// Sort key of a [`LogFile`] within a [`LogFileCollection`].
pub type LogFileSortKey = (u64, FPath);

/// The sort key of `logfile`: modification time in whole seconds since the
/// Unix epoch, then path.
pub fn logfile_sort_key(logfile: &LogFile) -> LogFileSortKey {
    (systemtime_to_secs(&logfile.mtime()), logfile.path().clone())
}

/// An ordered set of [`LogFile`]s. Membership is fixed at construction.
#[derive(Debug)]
pub struct LogFileCollection {
    logfiles: Vec<LogFile>,
    /// Index into `logfiles` of the file being read by [`advance`].
    ///
    /// [`advance`]: LogFileCollection::advance
    cursor_pos: Option<usize>,
}

impl LogFileCollection {
    /// Create a `LogFile` for each of `paths` and order them.
    ///
    /// Any path that is not a readable regular file fails the whole
    /// collection with [`LogFileError::OpenFailure`]. Use
    /// [`from_logfiles`](LogFileCollection::from_logfiles) to skip bad paths.
    pub fn new(
        paths: &[FPath],
        source_formats: &[SourceFormat],
    ) -> Result<LogFileCollection, LogFileError> {
        defn!("({:?})", paths);
        let mut logfiles: Vec<LogFile> = Vec::with_capacity(paths.len());
        for path in paths.iter() {
            logfiles.push(LogFile::new(path.clone(), source_formats)?);
        }
        defx!();

        Ok(LogFileCollection::from_logfiles(logfiles))
    }

    /// Order `logfiles` into a new `LogFileCollection`.
    pub fn from_logfiles(mut logfiles: Vec<LogFile>) -> LogFileCollection {
        logfiles.sort_by_cached_key(logfile_sort_key);
        defñ!(
            "{:?}",
            logfiles
                .iter()
                .map(|lf| lf.path().as_str())
                .collect::<Vec<&str>>()
        );

        LogFileCollection {
            logfiles,
            cursor_pos: None,
        }
    }

    pub fn len(&self) -> usize {
        self.logfiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logfiles.is_empty()
    }

    /// The `LogFile`s in order.
    pub fn logfiles(&self) -> &[LogFile] {
        self.logfiles.as_slice()
    }

    pub fn logfiles_mut(&mut self) -> &mut [LogFile] {
        self.logfiles.as_mut_slice()
    }

    /// Index of the `LogFile` being read by
    /// [`advance`](LogFileCollection::advance); `None` before the first
    /// call and after `Done`.
    pub fn cursor_position(&self) -> Option<usize> {
        self.cursor_pos
    }

    /// The next entry of the merged stream.
    ///
    /// Reads the default cursor of the current file. When that file is
    /// done, moves to the next file. Returns `Done` after the last entry of
    /// the last file; the following call starts again with the first file.
    ///
    /// An error is returned for this call only; the current file is kept.
    pub fn advance(&mut self) -> ResultS3<&Entry, LogFileError> {
        self.advance_matching(None)
    }

    /// Like [`advance`](LogFileCollection::advance) but skip entries for
    /// which `predicate` returns `false`.
    pub fn advance_matching(
        &mut self,
        predicate: EntryPredicate,
    ) -> ResultS3<&Entry, LogFileError> {
        match self.advance_index(predicate) {
            ResultS3::Found((file_index, index)) => ResultS3::Found(&self.logfiles[file_index].entries()[index]),
            ResultS3::Done => ResultS3::Done,
            ResultS3::Err(err) => ResultS3::Err(err),
        }
    }

    /// Like [`advance_matching`](LogFileCollection::advance_matching) but
    /// return the [`CollectionIndex`] of the entry.
    ///
    /// The entry at the returned index may still gain continuation lines;
    /// they are read by the following call.
    pub fn advance_index(
        &mut self,
        predicate: EntryPredicate,
    ) -> ResultS3<CollectionIndex, LogFileError> {
        let mut file_index: usize = self.cursor_pos.unwrap_or(0);
        defn!("file_index {}", file_index);
        loop {
            if file_index >= self.logfiles.len() {
                self.cursor_pos = None;
                defx!("all files done, return Done");
                return ResultS3::Done;
            }
            self.cursor_pos = Some(file_index);
            match self.logfiles[file_index].advance_index(CURSOR_DEFAULT, predicate) {
                ResultS3::Found(index) => {
                    defx!("file {} return Found({})", file_index, index);
                    return ResultS3::Found((file_index, index));
                }
                ResultS3::Done => {
                    defo!("file {} done", file_index);
                    file_index += 1;
                }
                ResultS3::Err(err) => {
                    defx!("file {} return {}", file_index, err);
                    return ResultS3::Err(err);
                }
            }
        }
    }

    /// The cached entry at `index`.
    pub fn entry(
        &self,
        index: CollectionIndex,
    ) -> Option<&Entry> {
        let (file_index, entry_index) = index;

        self.logfiles.get(file_index)?.entry(entry_index)
    }

    /// Load every file. Return the count of cached entries.
    pub fn load(&mut self) -> Result<usize, LogFileError> {
        let mut count: usize = 0;
        for logfile in self.logfiles.iter_mut() {
            count += logfile.load()?;
        }

        Ok(count)
    }

    /// Reload every file. See [`LogFile::reload`].
    pub fn reload(&mut self) -> Result<(), LogFileError> {
        self.cursor_pos = None;
        for logfile in self.logfiles.iter_mut() {
            logfile.reload()?;
        }

        Ok(())
    }

    /// Load every file, then return the cached entries of every file for
    /// which `filter` returns `true`, in collection order.
    fn filter_entries<F>(
        &mut self,
        filter: F,
    ) -> Result<Vec<&Entry>, LogFileError>
    where
        F: Fn(&Entry) -> bool,
    {
        self.load()?;

        Ok(self
            .logfiles
            .iter()
            .flat_map(|logfile| logfile.entries().iter())
            .filter(|entry| filter(*entry))
            .collect())
    }

    /// See [`LogFile::filter_host`].
    pub fn filter_host(
        &mut self,
        host: &str,
    ) -> Result<Vec<&Entry>, LogFileError> {
        self.filter_entries(|entry| entry.host() == Some(host))
    }

    /// See [`LogFile::filter_program`].
    pub fn filter_program(
        &mut self,
        program: &str,
    ) -> Result<Vec<&Entry>, LogFileError> {
        self.filter_entries(|entry| entry.program() == Some(program))
    }

    /// See [`LogFile::filter_message`].
    pub fn filter_message(
        &mut self,
        regex: &Regex,
    ) -> Result<Vec<&Entry>, LogFileError> {
        self.filter_entries(|entry| message_is_match(regex, entry.message()))
    }

    /// See [`LogFile::match_message`].
    pub fn match_message(
        &mut self,
        regex: &Regex,
    ) -> Result<Vec<MessageFields>, LogFileError> {
        self.load()?;

        Ok(self
            .logfiles
            .iter()
            .flat_map(|logfile| logfile.entries().iter())
            .filter_map(|entry| message_captures(regex, entry.message()))
            .collect())
    }

    pub fn summaries(&self) -> Vec<SummaryLogFile> {
        self.logfiles
            .iter()
            .map(LogFile::summary)
            .collect()
    }
}
