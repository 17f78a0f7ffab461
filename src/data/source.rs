// src/data/source.rs

//! Classify the "source" substring of a syslog line.
//!
//! The source substring is the part of a syslog line between the datetime
//! stamp and the message, e.g. `host1 sshd[1234]` in line
//! `Jan  5 10:22:31 host1 sshd[1234]: Accepted password for bob`.
//!
//! A [`SourceFormat`] is a regular expression with named capture groups.
//! [`SourceFormats`] are tried in order and the first match wins; there is no
//! scoring of which match is "best". The caller orders the list
//! most-specific first.

use std::fmt;

use ::lazy_static::lazy_static;
use ::regex::{Captures, Regex};
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Capture group name for a syslog protocol version, e.g. `<1>`.
pub const CGN_VERSION: &str = "version";
/// Capture group name for a numeric syslog facility, e.g. `<3.6>`.
pub const CGN_FACILITY: &str = "facility";
/// Capture group name for a numeric syslog level, e.g. `<3.6>`.
pub const CGN_LEVEL: &str = "level";
pub const CGN_HOST: &str = "host";
pub const CGN_PROGRAM: &str = "program";
pub const CGN_PID: &str = "pid";

/// One named regular expression for matching a source substring.
///
/// Recognized capture group names are [`CGN_VERSION`], [`CGN_FACILITY`],
/// [`CGN_LEVEL`], [`CGN_HOST`], [`CGN_PROGRAM`], and [`CGN_PID`]. Other
/// capture group names are ignored.
#[derive(Clone)]
pub struct SourceFormat {
    name: &'static str,
    regex: Regex,
}

impl fmt::Debug for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SourceFormat")
            .field("name", &self.name)
            .field("regex", &self.regex.as_str())
            .finish()
    }
}

impl SourceFormat {
    pub fn new(name: &'static str, regex: Regex) -> SourceFormat {
        SourceFormat { name, regex }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

/// Ordered list of [`SourceFormat`], tried first to last.
pub type SourceFormats = Vec<SourceFormat>;

/// Regular expression patterns for the default [`SOURCE_FORMATS`], in
/// priority order.
///
/// Each is anchored at both ends.
pub const SOURCE_FORMAT_PATTERNS: [(&str, &str); 6] = [
    (
        "version host program[pid]",
        r"^<(?P<version>[^>]+)>\s+(?P<host>\S+)\s+(?P<program>[^\[]+)\[(?P<pid>\d+)\]$",
    ),
    (
        "version host program",
        r"^<(?P<version>[^>]+)>\s+(?P<host>\S+)\s+(?P<program>[^\[]+)$",
    ),
    (
        "facility.level host program[pid]",
        r"^<(?P<facility>\d+)\.(?P<level>\d+)>\s+(?P<host>\S+)\s+(?P<program>[^\[]+)\[(?P<pid>\d+)\]$",
    ),
    (
        "facility.level host program",
        r"^<(?P<facility>\d+)\.(?P<level>\d+)>\s+(?P<host>\S+)\s+(?P<program>[^\[]+)$",
    ),
    (
        "host program[pid]",
        r"^(?P<host>\S+)\s+(?P<program>[^\[]+)\[(?P<pid>\d+)\]$",
    ),
    (
        "host program",
        r"^(?P<host>\S+)\s+(?P<program>[^\[]+)$",
    ),
];

lazy_static! {
    /// Default source formats, built from [`SOURCE_FORMAT_PATTERNS`].
    pub static ref SOURCE_FORMATS: SourceFormats = {
        SOURCE_FORMAT_PATTERNS
            .iter()
            .map(|&(name, pattern)| {
                SourceFormat::new(
                    name,
                    Regex::new(pattern).unwrap_or_else(|err|
                        panic!("bad SOURCE_FORMAT_PATTERNS {:?}: {}", name, err)
                    ),
                )
            })
            .collect()
    };
}

/// Structured fields recovered from a source substring.
///
/// Each field is `Some` only if the matching [`SourceFormat`] has that
/// capture group.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SourceFields {
    pub version: Option<String>,
    pub facility: Option<String>,
    pub level: Option<String>,
    pub host: Option<String>,
    pub program: Option<String>,
    pub pid: Option<String>,
}

impl SourceFields {
    fn from_captures(captures: &Captures) -> SourceFields {
        let get = |name: &str| -> Option<String> {
            captures
                .name(name)
                .map(|m| m.as_str().to_string())
        };

        SourceFields {
            version: get(CGN_VERSION),
            facility: get(CGN_FACILITY),
            level: get(CGN_LEVEL),
            host: get(CGN_HOST),
            program: get(CGN_PROGRAM),
            pid: get(CGN_PID),
        }
    }
}

/// Try each of `source_formats` in order against `source`, return the fields
/// of the first match.
///
/// No match is not an error; returns `None`.
pub fn classify_source(
    source: &str,
    source_formats: &[SourceFormat],
) -> Option<SourceFields> {
    defn!("({:?})", source);
    for source_format in source_formats.iter() {
        if let Some(captures) = source_format.regex.captures(source) {
            let fields = SourceFields::from_captures(&captures);
            defx!("matched {:?}, return {:?}", source_format.name, fields);
            return Some(fields);
        }
    }
    defx!("no match, return None");

    None
}
