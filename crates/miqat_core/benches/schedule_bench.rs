use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use miqat_core::{get_times, CalculationMethod, Coordinates, PolarCircleResolution, PrayerTimes};
use std::hint::black_box;

fn benchmark_single_day(c: &mut Criterion) {
    let date = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
    let coords = Coordinates::new(21.4225, 39.8262).unwrap();
    let params = CalculationMethod::MuslimWorldLeague.parameters();

    c.bench_function("prayer_times_single_day", |b| {
        b.iter(|| PrayerTimes::new(black_box(date), black_box(coords), black_box(&params)).unwrap())
    });
}

fn benchmark_schedule(c: &mut Criterion) {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let coords = Coordinates::new(24.8607, 67.0011).unwrap();
    let params = CalculationMethod::Karachi.parameters();

    let mut group = c.benchmark_group("schedule");
    for days in [1u32, 30, 100, 365] {
        group.throughput(Throughput::Elements(u64::from(days)));
        group.bench_with_input(BenchmarkId::from_parameter(days), &days, |b, &days| {
            b.iter(|| get_times(black_box(coords), black_box(start), days, 300, black_box(&params)))
        });
    }
    group.finish();
}

fn benchmark_polar_resolution(c: &mut Criterion) {
    // Midsummer at 85°N forces the nearest-day search for every day.
    let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let coords = Coordinates::new(85.0, 0.0).unwrap();
    let params = CalculationMethod::MuslimWorldLeague
        .parameters()
        .polar_circle_resolution(PolarCircleResolution::AqrabYaum);

    c.bench_function("schedule_polar_30_days", |b| {
        b.iter(|| get_times(black_box(coords), black_box(start), 30, 0, black_box(&params)))
    });
}

criterion_group!(benches, benchmark_single_day, benchmark_schedule, benchmark_polar_resolution);
criterion_main!(benches);
