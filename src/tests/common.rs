// src/tests/common.rs

//! Common data for tests.

#![allow(non_upper_case_globals)]

use crate::data::datetime::{DateTimeN, NaiveDate, Year};

/// Year used for fixture data unless a test says otherwise.
pub const YEAR_TEST: Year = 2021;

/// Helper to create a `DateTimeN`.
pub fn ymdhms(
    year: Year,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
) -> DateTimeN {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, min, sec)
        .unwrap()
}

pub const LINE_SSHD: &str = "Jan  5 10:22:31 host1 sshd[1234]: Accepted password for bob";
pub const LINE_REPEATED: &str = "Jan  5 10:22:32 --- last message repeated 2 times ---";

/// Ten entries, three from program `sshd`, two hosts.
pub const DATA_10: &str = "\
Jan  5 10:00:00 host1 sshd[100]: Server listening on 0.0.0.0 port 22.
Jan  5 10:00:01 host1 kernel: Linux version 5.10.0
Jan  5 10:00:02 host2 cron[200]: (root) CMD (run-parts /etc/cron.hourly)
Jan  5 10:00:03 host1 sshd[101]: Accepted password for alice from 10.0.0.1 port 50000 ssh2
Jan  5 10:00:04 host2 systemd[1]: Started Session 5 of user alice.
Jan  5 10:00:05 host1 kernel: eth0: link up
Jan  5 10:00:06 host2 postfix/smtpd[300]: connect from unknown[10.0.0.9]
Jan  5 10:00:07 host1 sshd[102]: Failed password for root from 10.0.0.2 port 50001 ssh2
Jan  5 10:00:08 host2 cron[201]: (bob) CMD (backup.sh)
Jan  5 10:00:09 host1 systemd[1]: Stopped Session 5 of user alice.
";

/// Three entries, the second with two continuation lines.
pub const DATA_CONTINUATION: &str = "\
Feb 10 08:00:00 host1 app[9]: first
Feb 10 08:00:01 host1 app[9]: Traceback (most recent call last):
  File \"app.py\", line 3, in <module>
\tValueError: bad value
Feb 10 08:00:02 host1 app[9]: third
";

/// Three lines, the second does not start with a datetime stamp.
pub const DATA_BAD_LINE: &str = "\
Mar  1 00:00:00 host1 app: one
this line has no datetime stamp
Mar  1 00:00:02 host1 app: three
";

/// Uncompressed content of [`BZ2_DATA`].
pub const BZ2_TEXT: &str = "\
Mar  3 09:00:01 bzhost cron[77]: (root) CMD (run-parts /etc/cron.hourly)
Mar  3 09:00:02 bzhost kernel: eth0 link up
";

/// [`BZ2_TEXT`] compressed by `bzip2`.
pub const BZ2_DATA: [u8; 133] = [
    0x42, 0x5A, 0x68, 0x39, 0x31, 0x41, 0x59, 0x26, 0x53, 0x59, 0x57, 0x83, 0x8C, 0xD6, 0x00, 0x00,
    0x1A, 0xDF, 0x80, 0x00, 0x10, 0x40, 0x63, 0xF8, 0xB0, 0x0C, 0x02, 0x00, 0x0A, 0x3A, 0x6D, 0xDE,
    0x30, 0x20, 0x00, 0x6A, 0x12, 0xA9, 0xA6, 0x4D, 0x3D, 0x40, 0x68, 0x00, 0xD3, 0x43, 0x40, 0x35,
    0x4F, 0x4C, 0xA6, 0x80, 0xD3, 0x40, 0x1A, 0x1A, 0x06, 0xD4, 0xE5, 0x9D, 0x0E, 0xBF, 0xB7, 0x08,
    0x36, 0xD7, 0x45, 0x15, 0x77, 0x33, 0x9E, 0xB2, 0x24, 0x19, 0xD2, 0x04, 0xA2, 0x02, 0x87, 0xEA,
    0xB3, 0x88, 0xBC, 0x58, 0xD8, 0x46, 0x01, 0xD5, 0x20, 0x83, 0x43, 0xE2, 0xC6, 0xE2, 0x66, 0x8A,
    0x3A, 0xBA, 0x89, 0xFD, 0x28, 0xAA, 0x86, 0x29, 0x4D, 0xB0, 0x32, 0x4F, 0xA4, 0x19, 0x4F, 0x02,
    0x48, 0x4F, 0x43, 0xC1, 0x4D, 0x29, 0x2B, 0x5D, 0xBF, 0x1F, 0x8B, 0xB9, 0x22, 0x9C, 0x28, 0x48,
    0x2B, 0xC1, 0xC6, 0x6B, 0x00,
];
