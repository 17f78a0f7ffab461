// bench_entry_build.rs
//
// benchmark functions of `sltlib::data::entry::Entry::build` and
// `sltlib::data::source::classify_source`
//

extern crate sltlib;

use sltlib::data::entry::Entry;
use sltlib::data::source::{classify_source, SOURCE_FORMATS};

extern crate criterion;
use criterion::{
    black_box,
    criterion_group,
    criterion_main,
    Criterion,
};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

const YEAR: i32 = 2021;

const LINES: [&str; 4] = [
    "Jan  5 10:22:31 host1 sshd[1234]: Accepted password for bob from 10.0.0.1 port 50000 ssh2",
    "Jan  5 10:22:32 <3.6> host1 kernel: eth0: link up",
    "Jan  5 10:22:33 --- last message repeated 2 times ---",
    "Jan  5 10:22:34 host2 postfix/smtpd[300]: connect from unknown[10.0.0.9]",
];

#[inline(never)]
fn entry_build_lines() {
    for line in LINES.iter() {
        let entry = Entry::build(black_box(line), YEAR, &SOURCE_FORMATS);
        _ = black_box(entry);
    }
}

#[inline(never)]
fn classify_source_worst_case() {
    // matches only the last default source format
    let fields = classify_source(black_box("host1 kernel"), &SOURCE_FORMATS);
    black_box(fields);
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut bg = c.benchmark_group("Entry");
    bg.bench_function("entry_build_lines", |b| b.iter(entry_build_lines));
    bg.bench_function("classify_source_worst_case", |b| b.iter(classify_source_worst_case));
    bg.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
