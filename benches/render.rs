// benches/render.rs
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use chrono::NaiveDate;

use chartpost::render::{layout, rasterize};
use chartpost::series::{normalize, ChartSpec, ColorRule, Ranking};

fn sample(rule: ColorRule) -> ChartSpec {
    // Synthetic G20-sized series with a sign flip halfway.
    let rows = (0..19).map(|i| (format!("Country {i:02}"), Some((i as f64 - 9.0) * 1234.5)));
    let series = normalize(rows, Ranking::Descending, 12).unwrap_or_else(|e| panic!("sample series: {e}"));
    ChartSpec::new(series, "GDP (current US$, billions)", "World Bank WDI", rule)
}

fn bench_render(c: &mut Criterion) {
    let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap_or_default();
    let gradient = sample(ColorRule::Gradient);
    let signed = sample(ColorRule::Signed);

    c.bench_function("layout", |b| {
        b.iter(|| black_box(layout(black_box(&gradient), date).bars.len()))
    });

    c.bench_function("layout+rasterize_gradient", |b| {
        b.iter(|| {
            let l = layout(black_box(&gradient), date);
            black_box(rasterize(&l).len())
        })
    });

    c.bench_function("layout+rasterize_signed", |b| {
        b.iter(|| {
            let l = layout(black_box(&signed), date);
            black_box(rasterize(&l).len())
        })
    });
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
