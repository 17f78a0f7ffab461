// src/data/datetime.rs

//! Functions to parse the datetime stamp of a syslog line.
//!
//! A traditional syslog datetime stamp (e.g. `Jan  5 10:22:31`) has no year
//! and no timezone. The year must be supplied by the caller, usually taken
//! from the modification time of the file; see [`systemtime_to_year`].

#![allow(non_upper_case_globals)]

#[doc(hidden)]
pub use std::time::SystemTime;

#[doc(hidden)]
pub use ::chrono::{
    DateTime,
    Datelike, // adds method `.year()` onto `DateTime`
    Local,
    NaiveDate,
    NaiveDateTime,
};
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// A _Year_ in a date
pub type Year = i32;

/// The datetime of an [`Entry`]. Syslog datetime stamps carry no timezone so
/// this is a chrono [`NaiveDateTime`].
///
/// [`Entry`]: crate::data::entry::Entry
/// [`NaiveDateTime`]: https://docs.rs/chrono/0.4.40/chrono/naive/struct.NaiveDateTime.html
pub type DateTimeN = NaiveDateTime;
pub type DateTimeNOpt = Option<DateTimeN>;

/// Crate `chrono` [`strftime`] pattern for a syslog datetime stamp with a
/// prepended year, e.g. `"2021 Jan 5 10:22:31"`.
///
/// [`strftime`]: https://docs.rs/chrono/0.4.40/chrono/format/strftime/index.html
pub const DTP_YbdHMS: &str = "%Y %b %d %H:%M:%S";

/// Crate `chrono` [`strftime`] pattern for printing an `Entry` datetime.
///
/// [`strftime`]: https://docs.rs/chrono/0.4.40/chrono/format/strftime/index.html
pub const DTP_DISPLAY: &str = "%Y-%m-%d %H:%M:%S";

/// Parse the month, day, and time tokens of a syslog line, using the passed
/// `year`.
///
/// The month is an abbreviated English month name (case-insensitive), the day
/// may lack a leading zero. Returns `None` for any invalid date or time,
/// e.g. `Feb 29` in a non-leap year.
pub fn datetime_parse_syslog(
    month: &str,
    day: &str,
    time: &str,
    year: Year,
) -> DateTimeNOpt {
    let data: String = format!("{} {} {} {}", year, month, day, time);
    match NaiveDateTime::parse_from_str(data.as_str(), DTP_YbdHMS) {
        Ok(val) => {
            defñ!("NaiveDateTime::parse_from_str({:?}, {:?}) returned {:?}", data, DTP_YbdHMS, val);

            Some(val)
        }
        Err(_err) => {
            defñ!("NaiveDateTime::parse_from_str({:?}, {:?}) failed ParseError: {}", data, DTP_YbdHMS, _err);

            None
        }
    }
}

/// Convert a [`SystemTime`] to the [`Year`] in the local timezone.
///
/// [`SystemTime`]: std::time::SystemTime
pub fn systemtime_to_year(systemtime: &SystemTime) -> Year {
    let dtl: DateTime<Local> = (*systemtime).into();

    dtl.year()
}

/// Seconds since the Unix epoch of a [`SystemTime`]. Times before the epoch
/// are `0`.
///
/// [`SystemTime`]: std::time::SystemTime
pub fn systemtime_to_secs(systemtime: &SystemTime) -> u64 {
    match systemtime.duration_since(SystemTime::UNIX_EPOCH) {
        Ok(val) => val.as_secs(),
        Err(_) => 0,
    }
}
