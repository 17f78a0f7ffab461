// src/data/entry.rs

//! Implements an [`Entry`] struct, one parsed syslog message.
//!
//! [`Entry`]: crate::data::entry::Entry

use crate::common::{Count, LogFileError, NLc};
use crate::data::datetime::{
    datetime_parse_syslog,
    DateTimeN,
    Year,
    DTP_DISPLAY,
};
use crate::data::source::{classify_source, SourceFields, SourceFormat};
#[allow(unused_imports)]
use crate::debug::printers::{de_err, de_wrn, str_to_String_noraw};

use std::collections::BTreeMap;
use std::fmt;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Extra structured data attached to an [`Entry`] by a downstream consumer,
/// e.g. a program-specific message parser.
pub type MessageFields = BTreeMap<String, String>;

/// Index of an `Entry` within the entry cache of a [`LogFile`].
///
/// [`LogFile`]: crate::readers::logfile::LogFile
pub type EntryIndex = usize;

/// Sequence of `Entry`.
pub type Entries = Vec<Entry>;

/// Separator between the source substring and the message of a syslog line.
pub const SOURCE_SEP: char = ':';

/// A first character of a physical line that marks it a continuation of the
/// prior `Entry`.
pub const CONTINUATION_CHARS: [char; 2] = [' ', '\t'];

/// Is this physical line a continuation of the prior `Entry`?
#[inline(always)]
pub fn is_continuation_line(line: &str) -> bool {
    line.starts_with(CONTINUATION_CHARS)
}

/// An `Entry` is one syslog message parsed from one physical line, plus any
/// continuation lines that followed it.
///
/// The syslog line
///
/// ```text
/// Jan  5 10:22:31 host1 sshd[1234]: Accepted password for bob
/// ```
///
/// has datetime `Jan  5 10:22:31`, source `host1 sshd[1234]` and message
/// `Accepted password for bob`. The source is further classified into host
/// `host1`, program `sshd` and pid `1234`.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    /// Parsed datetime, with an externally supplied year.
    dt: DateTimeN,
    /// The original physical line, trailing whitespace removed.
    line: String,
    /// The substring between the datetime and the message.
    source: Option<String>,
    /// Fields classified from `source`.
    fields_source: SourceFields,
    /// Text after the source separator, plus continuation lines.
    message: String,
    /// Extra data from downstream consumers.
    fields: MessageFields,
    /// Count of continuation lines appended to `message`.
    continuations: Count,
}

/// Split `line` into (month, day, time, remainder) by consuming exactly
/// three whitespace-delimited tokens.
///
/// Leading whitespace is skipped and a run of whitespace is one delimiter.
/// The remainder must be non-empty.
fn split_datetime_tokens(line: &str) -> Option<(&str, &str, &str, &str)> {
    let mut rest: &str = line.trim_start();
    let mut tokens: [&str; 3] = [""; 3];
    for token in tokens.iter_mut() {
        let end: usize = rest.find(char::is_whitespace)?;
        *token = &rest[..end];
        rest = rest[end..].trim_start();
    }
    if rest.is_empty() {
        return None;
    }

    Some((tokens[0], tokens[1], tokens[2], rest))
}

impl Entry {
    /// Build an `Entry` from one physical `line`.
    ///
    /// Syslog datetime stamps have no year so the `year` is passed.
    /// The source substring is classified with `source_formats`.
    ///
    /// Returns [`LogFileError::MalformedTimestamp`] if the line does not
    /// have month, day, time and remainder tokens.
    /// Returns [`LogFileError::UnparsableTimestamp`] if those tokens are not
    /// a valid datetime.
    pub fn build(
        line: &str,
        year: Year,
        source_formats: &[SourceFormat],
    ) -> Result<Entry, LogFileError> {
        defn!("({:?}, {})", str_to_String_noraw(line), year);
        let line: &str = line.trim_end();

        let (month, day, time, remainder) = match split_datetime_tokens(line) {
            Some(val) => val,
            None => {
                defx!("split_datetime_tokens failed, return MalformedTimestamp");
                return Err(LogFileError::MalformedTimestamp { line: line.to_string() });
            }
        };
        let dt: DateTimeN = match datetime_parse_syslog(month, day, time, year) {
            Some(val) => val,
            None => {
                defx!("datetime_parse_syslog failed, return UnparsableTimestamp");
                return Err(LogFileError::UnparsableTimestamp { line: line.to_string() });
            }
        };

        let (source, message) = match remainder.split_once(SOURCE_SEP) {
            Some((source, message)) => (Some(source.trim()), message.trim()),
            // lines like "--- last message repeated 2 times ---"
            None => (None, remainder),
        };
        let fields_source: SourceFields = match source {
            Some(source) => classify_source(source, source_formats).unwrap_or_default(),
            None => SourceFields::default(),
        };

        let entry = Entry {
            dt,
            line: line.to_string(),
            source: source.map(String::from),
            fields_source,
            message: message.to_string(),
            fields: MessageFields::new(),
            continuations: 0,
        };
        defx!("return {:?}", entry);

        Ok(entry)
    }

    /// Append a continuation line to the message, separated by a newline.
    ///
    /// Trailing whitespace of `text` is removed, leading indentation is kept.
    pub fn append_continuation(
        &mut self,
        text: &str,
    ) {
        self.message.push(NLc);
        self.message.push_str(text.trim_end());
        self.continuations += 1;
        defñ!("continuations {}", self.continuations);
    }

    /// Merge `data` into the downstream consumer [`MessageFields`].
    pub fn update_fields(
        &mut self,
        data: MessageFields,
    ) {
        self.fields.extend(data);
    }

    pub fn dt(&self) -> &DateTimeN {
        &self.dt
    }

    /// The first physical line of this `Entry`, trailing whitespace removed.
    pub fn line(&self) -> &str {
        self.line.as_str()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn source_fields(&self) -> &SourceFields {
        &self.fields_source
    }

    pub fn version(&self) -> Option<&str> {
        self.fields_source.version.as_deref()
    }

    pub fn facility(&self) -> Option<&str> {
        self.fields_source.facility.as_deref()
    }

    pub fn level(&self) -> Option<&str> {
        self.fields_source.level.as_deref()
    }

    pub fn host(&self) -> Option<&str> {
        self.fields_source.host.as_deref()
    }

    pub fn program(&self) -> Option<&str> {
        self.fields_source.program.as_deref()
    }

    pub fn pid(&self) -> Option<&str> {
        self.fields_source.pid.as_deref()
    }

    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    pub fn fields(&self) -> &MessageFields {
        &self.fields
    }

    /// Count of physical lines that make up this `Entry`.
    pub fn count_lines(&self) -> Count {
        self.continuations + 1
    }

    /// The continuation lines folded into the message, in order.
    pub fn continuation_lines(&self) -> impl Iterator<Item = &str> {
        self.message.split(NLc).skip(1)
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.dt.format(DTP_DISPLAY))?;
        if let Some(program) = self.program() {
            write!(f, " {}", program)?;
        }
        if let Some(pid) = self.pid() {
            write!(f, " ({})", pid)?;
        }

        write!(f, " {}", self.message)
    }
}
