// src/bin/slt.rs

//! Driver program _slt_ drives the [_sltlib_].
//!
//! Processes user-passed command-line arguments.
//! Then each path passed is made into a [`LogFile`]; paths that cannot be
//! opened are reported and skipped. The `LogFile`s are read as one
//! [`LogFileCollection`], oldest file first, and each [`Entry`] passing the
//! user filters is printed.
//!
//! If passed CLI option `--follow`, after all files are printed the newest
//! file is polled for appended lines until the process is interrupted.
//!
//! If passed CLI option `--summary`, a [`SummaryLogFile`] about each file is
//! printed to STDERR.
//!
//! `slt.rs` is the only place that prints to STDOUT.
//!
//! [_sltlib_]: sltlib
//! [`Entry`]: sltlib::data::entry::Entry
//! [`LogFile`]: sltlib::readers::logfile::LogFile
//! [`LogFileCollection`]: sltlib::readers::logfilecollection::LogFileCollection
//! [`SummaryLogFile`]: sltlib::readers::logfile::SummaryLogFile

#![allow(non_camel_case_types)]

use std::io::{StdoutLock, Write};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use ::anyhow::Context;
use ::clap::Parser;
use ::const_format::concatcp;
use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

use ::sltlib::common::{Count, FPath, LogFileError, ResultS3};
use ::sltlib::data::datetime::Year;
use ::sltlib::data::entry::{Entry, EntryIndex, MessageFields};
use ::sltlib::data::source::SOURCE_FORMATS;
#[allow(unused_imports)]
use ::sltlib::debug::printers::{de_err, de_wrn, e_err, e_wrn};
use ::sltlib::readers::logfile::{message_captures, message_is_match, FileGrowth, LogFile};
use ::sltlib::readers::logfilecollection::{CollectionIndex, LogFileCollection};

// --------------------
// command-line parsing

/// Name of the cursor used by `--follow`.
const CURSOR_FOLLOW: &str = "follow";

/// Default `--follow-interval` in milliseconds.
const CLI_FOLLOW_INTERVAL_DEFAULT: u64 = 1000;

const CLI_HELP_AFTER: &str = concatcp!(
    "\
Files may be plain text, gzip, or bzip2; the format is found from the file
content. Files are printed oldest first by modification time.

Syslog datetime stamps have no year. The year of each file modification time
is used unless --year is passed.

Filters --host, --program, and --message must all pass for an entry to be
printed. A --message or --match REGEX must match at the start of the message.

With --follow, the newest file is polled every FOLLOW_INTERVAL milliseconds
(default ", CLI_FOLLOW_INTERVAL_DEFAULT, ") and new entries are printed.
Press Ctrl+C to stop."
);

#[derive(Parser, Debug)]
#[clap(
    about = env!("CARGO_PKG_DESCRIPTION"),
    name = "slt",
    // write expanded information for the `--version` output
    version = concatcp!(
        "(syslog tailer)\n",
        "Version: ",
        env!("CARGO_PKG_VERSION_MAJOR"), ".",
        env!("CARGO_PKG_VERSION_MINOR"), ".",
        env!("CARGO_PKG_VERSION_PATCH"), "\n",
        "MSRV: ", env!("CARGO_PKG_RUST_VERSION"), "\n",
        "License: ", env!("CARGO_PKG_LICENSE"), "\n",
    ),
    after_help = CLI_HELP_AFTER,
    verbatim_doc_comment,
)]
struct CLI_Args {
    /// Path(s) of syslog files.
    #[clap(
        required = true,
        verbatim_doc_comment,
    )]
    paths: Vec<String>,

    /// Print only entries with this host.
    #[clap(
        short = 'o',
        long,
        verbatim_doc_comment,
    )]
    host: Option<String>,

    /// Print only entries with this program.
    #[clap(
        short = 'p',
        long,
        verbatim_doc_comment,
    )]
    program: Option<String>,

    /// Print only entries with a message matching this regular expression.
    #[clap(
        short = 'm',
        long,
        verbatim_doc_comment,
        value_parser = cli_parser_regex,
    )]
    message: Option<Regex>,

    /// For entries with a message matching this regular expression, print
    /// the named capture groups instead of the entry.
    /// For example, "Accepted (?P<method>\w+) for (?P<user>\S+)".
    #[clap(
        short = 'M',
        long = "match",
        verbatim_doc_comment,
        value_parser = cli_parser_regex,
    )]
    match_regex: Option<Regex>,

    /// Year of every syslog datetime stamp.
    #[clap(
        short = 'y',
        long,
        verbatim_doc_comment,
    )]
    year: Option<Year>,

    /// Print the original lines instead of the parsed entries.
    #[clap(
        short = 'r',
        long,
        verbatim_doc_comment,
    )]
    raw: bool,

    /// After printing, wait for new lines appended to the newest file.
    #[clap(
        short = 'f',
        long,
        verbatim_doc_comment,
    )]
    follow: bool,

    /// Milliseconds between checks of the followed file.
    #[clap(
        long,
        verbatim_doc_comment,
        default_value_t = CLI_FOLLOW_INTERVAL_DEFAULT,
    )]
    follow_interval: u64,

    /// Print a summary of each file to STDERR.
    #[clap(
        short = 's',
        long,
        verbatim_doc_comment,
    )]
    summary: bool,
}

/// `clap` argument parser for regular expressions.
fn cli_parser_regex(pattern: &str) -> Result<Regex, String> {
    Regex::new(pattern).map_err(|err| err.to_string())
}

// --------------------
// signal handling

/// flag to signal to main thread should return ASAP.
/// Polled by function `follow_loop`.
static EXIT_EARLY: AtomicBool = AtomicBool::new(false);

/// set a process signal handler
fn set_signal_handler() -> anyhow::Result<()> {
    defn!();
    ctrlc::set_handler(move || {
        EXIT_EARLY.store(true, Ordering::SeqCst);
    })
    .context("failed to set the Ctrl+C handler")?;
    defx!();

    Ok(())
}

// --------------------
// printing

/// Does `entry` pass the user filters?
fn entry_passes(
    args: &CLI_Args,
    entry: &Entry,
) -> bool {
    if let Some(host) = &args.host {
        if entry.host() != Some(host.as_str()) {
            return false;
        }
    }
    if let Some(program) = &args.program {
        if entry.program() != Some(program.as_str()) {
            return false;
        }
    }
    if let Some(regex) = &args.message {
        if !message_is_match(regex, entry.message()) {
            return false;
        }
    }
    if let Some(regex) = &args.match_regex {
        if !message_is_match(regex, entry.message()) {
            return false;
        }
    }

    true
}

/// `name=value` pairs separated by a space.
fn fields_to_string(fields: &MessageFields) -> String {
    fields
        .iter()
        .map(|(name, value)| format!("{}={:?}", name, value))
        .collect::<Vec<String>>()
        .join(" ")
}

/// Print one `entry` passing the user filters.
fn print_entry<W: Write>(
    out: &mut W,
    args: &CLI_Args,
    entry: &Entry,
) -> std::io::Result<()> {
    if let Some(regex) = &args.match_regex {
        if let Some(fields) = message_captures(regex, entry.message()) {
            writeln!(out, "{}", fields_to_string(&fields))?;
        }
        return Ok(());
    }
    if args.raw {
        writeln!(out, "{}", entry.line())?;
        for line in entry.continuation_lines() {
            writeln!(out, "{}", line)?;
        }
        return Ok(());
    }

    writeln!(out, "{}", entry)
}

/// Print the entry at `index` of `collection` if it passes the user filters.
fn print_held<W: Write>(
    collection: &LogFileCollection,
    args: &CLI_Args,
    out: &mut W,
    index: CollectionIndex,
) -> std::io::Result<()> {
    match collection.entry(index) {
        Some(entry) if entry_passes(args, entry) => print_entry(out, args, entry),
        _ => Ok(()),
    }
}

/// An entry printed by `print_follow`. Continuation lines of the entry
/// read by later polls are printed after it.
#[derive(Clone, Copy, Debug)]
struct PrintedEntry {
    index: EntryIndex,
    /// lines of the entry printed so far
    lines: Count,
    /// the entry passed the user filters
    passed: bool,
}

impl PrintedEntry {
    fn new(
        args: &CLI_Args,
        index: EntryIndex,
        entry: &Entry,
    ) -> PrintedEntry {
        PrintedEntry {
            index,
            lines: entry.count_lines(),
            passed: entry_passes(args, entry),
        }
    }
}

/// Print the continuation lines of `entry` not yet printed.
fn print_continuations<W: Write>(
    out: &mut W,
    args: &CLI_Args,
    entry: &Entry,
    printed: &mut PrintedEntry,
) -> std::io::Result<()> {
    let lines: Count = entry.count_lines();
    if lines <= printed.lines {
        return Ok(());
    }
    defñ!("entry {} lines {} printed {}", printed.index, lines, printed.lines);
    // captures of `--match` are printed once
    if printed.passed && args.match_regex.is_none() {
        for line in entry.continuation_lines().skip((printed.lines - 1) as usize) {
            writeln!(out, "{}", line)?;
        }
    }
    printed.lines = lines;

    Ok(())
}

// --------------------
// processing

/// Create a `LogFile` for each path and open it. Paths that fail are
/// reported and skipped. Also return `false` if any path failed.
fn open_logfiles(args: &CLI_Args) -> (Vec<LogFile>, bool) {
    defn!("{:?}", args.paths);
    let mut ok: bool = true;
    let mut logfiles: Vec<LogFile> = Vec::with_capacity(args.paths.len());
    for path in args.paths.iter() {
        let mut logfile: LogFile = match LogFile::new(FPath::from(path), &SOURCE_FORMATS) {
            Ok(val) => val,
            Err(err) => {
                e_err!("{}", err);
                ok = false;
                continue;
            }
        };
        if let Some(year) = args.year {
            logfile = logfile.with_year(year);
        }
        if let Err(err) = logfile.open() {
            e_err!("{}", err);
            ok = false;
            continue;
        }
        logfiles.push(logfile);
    }
    defx!("{} logfiles, ok {}", logfiles.len(), ok);

    (logfiles, ok)
}

/// Print every entry of the `collection` passing the user filters.
/// Return the count of lines that could not be parsed.
///
/// An entry is held until the next entry is found or the collection is
/// done, so it is printed with all of its continuation lines.
fn print_collection<W: Write>(
    collection: &mut LogFileCollection,
    args: &CLI_Args,
    out: &mut W,
) -> anyhow::Result<Count> {
    defn!();
    let mut held: Option<CollectionIndex> = None;
    let mut line_errors: Count = 0;
    loop {
        match collection.advance_index(None) {
            ResultS3::Found(index) => {
                if let Some(held_) = held.replace(index) {
                    print_held(collection, args, out, held_)?;
                }
            }
            ResultS3::Done => break,
            ResultS3::Err(err) if err.is_line_error() => {
                de_wrn!("{}", err);
                line_errors += 1;
            }
            ResultS3::Err(err) => {
                if let Some(held_) = held {
                    print_held(collection, args, out, held_)?;
                }
                defx!("return Err {}", err);
                return Err(err.into());
            }
        }
    }
    if let Some(held_) = held {
        print_held(collection, args, out, held_)?;
    }
    out.flush()?;
    defx!("line_errors {}", line_errors);

    Ok(line_errors)
}

/// Register cursor `CURSOR_FOLLOW` of `logfile` at the last cached entry.
/// Return that entry, already printed by `print_collection`.
fn follow_start(
    logfile: &mut LogFile,
    args: &CLI_Args,
) -> anyhow::Result<Option<PrintedEntry>> {
    match logfile.register_cursor(CURSOR_FOLLOW) {
        Ok(_) | Err(LogFileError::DuplicateCursor(_)) => {}
        Err(err) => return Err(err.into()),
    }
    let tail: Option<EntryIndex> = logfile.count_entries().checked_sub(1);
    logfile.set_cursor(CURSOR_FOLLOW, tail)?;

    Ok(tail.and_then(|index|
        logfile
            .entry(index)
            .map(|entry| PrintedEntry::new(args, index, entry))
    ))
}

/// Print new lines of `logfile` from cursor `CURSOR_FOLLOW`, then leave
/// the cursor at the last cached entry.
///
/// New continuation lines of the `printed` entry are printed first.
fn print_follow<W: Write>(
    logfile: &mut LogFile,
    args: &CLI_Args,
    out: &mut W,
    printed: &mut Option<PrintedEntry>,
) -> anyhow::Result<()> {
    loop {
        let result = logfile.advance_index(CURSOR_FOLLOW, None);
        // lines read by `advance_index` may continue the printed entry
        if let Some(printed_) = printed.as_mut() {
            if let Some(entry) = logfile.entry(printed_.index) {
                print_continuations(out, args, entry, printed_)?;
            }
        }
        match result {
            ResultS3::Found(index) => {
                if let Some(entry) = logfile.entry(index) {
                    let printed_ = PrintedEntry::new(args, index, entry);
                    if printed_.passed {
                        print_entry(out, args, entry)?;
                    }
                    *printed = Some(printed_);
                }
            }
            ResultS3::Done => break,
            ResultS3::Err(err) if err.is_line_error() => {
                de_wrn!("{}", err);
            }
            ResultS3::Err(err) => return Err(err.into()),
        }
    }
    // `Done` resets the cursor; park it at the tail for the next poll
    let tail = logfile.count_entries().checked_sub(1);
    logfile.set_cursor(CURSOR_FOLLOW, tail)?;
    out.flush()?;

    Ok(())
}

/// Poll `logfile` for growth until interrupted, printing new entries.
fn follow_loop<W: Write>(
    logfile: &mut LogFile,
    args: &CLI_Args,
    out: &mut W,
) -> anyhow::Result<()> {
    defn!("{:?}", logfile.path());
    set_signal_handler()?;
    let mut printed: Option<PrintedEntry> = follow_start(logfile, args)?;
    let interval = Duration::from_millis(args.follow_interval);

    while !EXIT_EARLY.load(Ordering::SeqCst) {
        thread::sleep(interval);
        match logfile.check_growth()? {
            FileGrowth::Grown => print_follow(logfile, args, out, &mut printed)?,
            FileGrowth::Unchanged => {}
            FileGrowth::Shrunk => {
                e_wrn!("file {:?} shrunk; reading it again from the start", logfile.path());
                logfile.reload()?;
                printed = None;
                print_follow(logfile, args, out, &mut printed)?;
            }
            FileGrowth::NotApplicable => {
                e_wrn!("cannot follow file {:?}; only plain text files can be followed", logfile.path());
                break;
            }
        }
    }
    defx!();

    Ok(())
}

fn run(args: &CLI_Args) -> anyhow::Result<bool> {
    let (logfiles, mut ok) = open_logfiles(args);
    let mut collection = LogFileCollection::from_logfiles(logfiles);
    let stdout = std::io::stdout();
    let mut out: StdoutLock = stdout.lock();

    match print_collection(&mut collection, args, &mut out) {
        Ok(line_errors) => {
            if line_errors != 0 {
                e_wrn!("{} lines could not be parsed", line_errors);
            }
            if args.follow {
                // the collection is ordered oldest to newest
                if let Some(logfile) = collection.logfiles_mut().last_mut() {
                    follow_loop(logfile, args, &mut out)?;
                }
            }
        }
        Err(err) => {
            e_err!("{:#}", err);
            ok = false;
        }
    }

    if args.summary {
        for summary in collection.summaries().iter() {
            eprintln!("{}", summary);
        }
    }

    Ok(ok)
}

/// Process the user-passed command-line arguments.
/// Determine a process return code.
pub fn main() -> ExitCode {
    defn!();
    let args = CLI_Args::parse();
    defo!("{:?}", args);

    let exitcode = match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            e_err!("{:#}", err);
            ExitCode::FAILURE
        }
    };
    defx!("exitcode {:?}", exitcode);

    exitcode
}
