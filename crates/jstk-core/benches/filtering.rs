use criterion::{black_box, criterion_group, criterion_main, Criterion};

use jstk_core::adapter::derive;
use jstk_core::window::{reduce, ScrollMetrics, WindowConfig, WindowEvent, WindowState};
use jstk_core::{FilterState, RawRecord, SearchCase, Selection};

fn capture(count: usize) -> Vec<RawRecord> {
    (0..count)
        .map(|i| {
            RawRecord::new(
                &format!("https://api{}.example.com/v{}/resource/{}", i % 7, i % 3, i),
                &format!("https://cdn.example.com/bundle.{}.js", i % 40),
                &format!("https://site{}.example.org/", i % 12),
            )
        })
        .collect()
}

fn bench_derive(c: &mut Criterion) {
    let raw = capture(20_000);
    let unfiltered = FilterState::default();
    let narrow = FilterState::new(
        Selection::from("https://cdn.example.com/bundle.3.js"),
        Selection::All,
        "resource/1",
    );

    c.bench_function("derive_unfiltered_20k", |b| {
        b.iter(|| derive(black_box(raw.clone()), &unfiltered, SearchCase::Sensitive))
    });
    c.bench_function("derive_narrow_insensitive_20k", |b| {
        b.iter(|| derive(black_box(raw.clone()), &narrow, SearchCase::Insensitive))
    });
}

fn bench_scroll(c: &mut Criterion) {
    let config = WindowConfig::default();
    let down = WindowEvent::Scrolled(ScrollMetrics::new(2000.0, 2800.0, 760.0));
    c.bench_function("scroll_down_1000", |b| {
        b.iter(|| {
            let mut state = WindowState::default();
            for _ in 0..1000 {
                state = reduce(state, down, black_box(20_000), &config);
            }
            state
        })
    });
}

criterion_group!(benches, bench_derive, bench_scroll);
criterion_main!(benches);
