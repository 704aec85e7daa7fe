use criterion::{Criterion, black_box, criterion_group, criterion_main};
use year_splitter::DateParser;

const SAMPLES: &[&str] = &[
    "2004",
    "2023-01-01T10:00:00Z",
    "2020-05-01",
    "Jan 5, 2004",
    "January 5 2004",
    "03/04/2020",
    "15/08/2020",
    "15-08-2020",
    "not-a-date",
];

fn bench_parse(c: &mut Criterion) {
    let parser = DateParser::new();

    let mut group = c.benchmark_group("date_parser");
    for sample in SAMPLES {
        group.bench_function(*sample, |b| {
            b.iter(|| parser.parse_quiet(black_box(sample)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
