use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use vitals_coach::config::AggregationThresholds;
use vitals_coach::models::{MetricKind, MetricReading, MetricValue};
use vitals_coach::services::MetricAggregator;
use vitals_coach::time_utils::user_offset;

/// Synthesize a month of dense logging: five kinds, several readings a day.
fn synthetic_readings() -> Vec<MetricReading> {
    let as_of = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
    let mut readings = Vec::new();

    for day in 0..30i64 {
        for slot in 0..4i64 {
            let observed = as_of - Duration::days(day) - Duration::hours(slot * 3);
            let base = 100.0 + (day * 7 + slot) as f64 % 60.0;

            readings.push(MetricReading {
                user_id: "bench-user".to_string(),
                kind: MetricKind::Glucose,
                value: MetricValue::Single(base),
                observed_at: observed,
                created_at: observed,
            });
            readings.push(MetricReading {
                user_id: "bench-user".to_string(),
                kind: MetricKind::BloodPressure,
                value: MetricValue::BloodPressure {
                    systolic: base + 20.0,
                    diastolic: base - 25.0,
                },
                observed_at: observed,
                created_at: observed,
            });
        }
        let observed = as_of - Duration::days(day);
        readings.push(MetricReading {
            user_id: "bench-user".to_string(),
            kind: MetricKind::Weight,
            value: MetricValue::Single(82.0 - day as f64 * 0.05),
            observed_at: observed,
            created_at: observed,
        });
        readings.push(MetricReading {
            user_id: "bench-user".to_string(),
            kind: MetricKind::Ketones,
            value: MetricValue::Single(1.1),
            observed_at: observed,
            created_at: observed,
        });
    }

    readings
}

fn benchmark_summaries(c: &mut Criterion) {
    let aggregator = MetricAggregator::new(AggregationThresholds::default());
    let readings = synthetic_readings();
    let as_of = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
    let offset = user_offset(-480);

    let mut group = c.benchmark_group("aggregation");

    group.bench_function("metric_summary_dense_month", |b| {
        b.iter(|| aggregator.metric_summary(black_box(&readings), as_of, offset))
    });

    group.bench_function("activity_summary_dense_month", |b| {
        b.iter(|| aggregator.activity_summary(black_box(&readings), as_of, offset))
    });

    group.finish();
}

criterion_group!(benches, benchmark_summaries);
criterion_main!(benches);
