// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Metric aggregation service.
//!
//! Converts a user's raw timestamped readings into the derived summaries the
//! rule engine consumes:
//! 1. `MetricSummary`: latest values, rolling averages, threshold-day counts
//! 2. `ActivitySummary`: last-log date, logging streak, adherence score
//!
//! All computation is pure: the caller fetches readings once (30-day
//! lookback) and everything here derives from that slice, the as-of instant,
//! and the user's timezone offset. Day-based counts bucket by the *local*
//! calendar day of the observation timestamp.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use std::collections::{BTreeMap, HashSet};

use crate::config::AggregationThresholds;
use crate::models::{ActivitySummary, BpPair, MetricKind, MetricReading, MetricSummary};
use crate::time_utils::local_date;

/// Lookback window the engine uses when fetching readings for aggregation.
/// Wide enough for every derived signal (30-day weight change, 30-day streak
/// cap).
pub const READING_LOOKBACK_DAYS: i64 = 30;

/// Rolling window for the glucose average.
const GLUCOSE_AVG_WINDOW_DAYS: i64 = 7;
/// Rolling window for glucose high-day counting.
const GLUCOSE_HIGH_WINDOW_DAYS: i64 = 3;
/// Rolling window for blood pressure elevated-day counting.
const BP_ELEVATED_WINDOW_DAYS: i64 = 7;
/// Rolling window for the weight change signal.
const WEIGHT_CHANGE_WINDOW_DAYS: i64 = 30;
/// Streak lookback cap.
const STREAK_CAP_DAYS: u32 = 30;
/// Most recent days-with-data feeding the adherence score.
const ADHERENCE_MAX_DAYS: usize = 7;

/// Computes derived summaries from raw readings.
pub struct MetricAggregator {
    thresholds: AggregationThresholds,
}

impl MetricAggregator {
    pub fn new(thresholds: AggregationThresholds) -> Self {
        Self { thresholds }
    }

    /// Derive the metric signals for one user at `as_of`.
    ///
    /// Readings observed after `as_of` are ignored; backfilled readings are
    /// real history and count like any other.
    pub fn metric_summary(
        &self,
        readings: &[MetricReading],
        as_of: DateTime<Utc>,
        offset: FixedOffset,
    ) -> MetricSummary {
        let readings: Vec<&MetricReading> =
            readings.iter().filter(|r| r.observed_at <= as_of).collect();
        let today = local_date(as_of, offset);

        MetricSummary {
            glucose_latest: latest_single(&readings, MetricKind::Glucose),
            glucose_avg_7d: glucose_average(&readings, as_of),
            glucose_high_days: self.glucose_high_days(&readings, today, offset),
            bp_latest: latest_bp(&readings),
            bp_elevated_days: self.bp_elevated_days(&readings, today, offset),
            weight_latest: latest_single(&readings, MetricKind::Weight),
            weight_change_30d: weight_change(&readings, as_of),
            waist_latest: latest_single(&readings, MetricKind::Waist),
            ketones_latest: latest_single(&readings, MetricKind::Ketones),
        }
    }

    /// Derive the logging-behavior signals for one user at `as_of`.
    pub fn activity_summary(
        &self,
        readings: &[MetricReading],
        as_of: DateTime<Utc>,
        offset: FixedOffset,
    ) -> ActivitySummary {
        let today = local_date(as_of, offset);

        // Kinds logged per local day, deduplicated.
        let mut kinds_by_day: BTreeMap<NaiveDate, HashSet<MetricKind>> = BTreeMap::new();
        for reading in readings.iter().filter(|r| r.observed_at <= as_of) {
            kinds_by_day
                .entry(local_date(reading.observed_at, offset))
                .or_default()
                .insert(reading.kind);
        }

        let last_log_date = kinds_by_day.keys().max().copied();
        let days_since_last_log = last_log_date.map(|last| (today - last).num_days());

        // Streak: walk backward from today, stop at the first gap. Today
        // with no reading yields 0 even if yesterday had one.
        let mut streak_days = 0u32;
        for day_offset in 0..STREAK_CAP_DAYS {
            let day = today - Duration::days(i64::from(day_offset));
            if kinds_by_day.contains_key(&day) {
                streak_days += 1;
            } else {
                break;
            }
        }

        // Adherence: mean of distinct-kinds/5 over the most recent days with
        // any data, at most 7 of them.
        let mut days_with_data: Vec<&NaiveDate> = kinds_by_day.keys().collect();
        days_with_data.sort_unstable_by(|a, b| b.cmp(a));
        let recent = &days_with_data[..days_with_data.len().min(ADHERENCE_MAX_DAYS)];
        let adherence_score = if recent.is_empty() {
            0
        } else {
            let ratio_sum: f64 = recent
                .iter()
                .map(|day| kinds_by_day[*day].len() as f64 / MetricKind::COUNT as f64)
                .sum();
            (ratio_sum / recent.len() as f64 * 100.0).round() as u32
        };

        ActivitySummary {
            last_log_date,
            days_since_last_log,
            streak_days,
            adherence_score,
        }
    }

    /// Distinct local days in the trailing window whose max glucose met the
    /// high threshold. "Consecutive-day" glucose conditions consult this
    /// count, not the instantaneous latest value.
    fn glucose_high_days(
        &self,
        readings: &[&MetricReading],
        today: NaiveDate,
        offset: FixedOffset,
    ) -> u32 {
        let mut max_by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for reading in readings {
            if reading.kind != MetricKind::Glucose {
                continue;
            }
            let Some(value) = reading.value.single() else {
                continue;
            };
            let day = local_date(reading.observed_at, offset);
            if !day_in_window(day, today, GLUCOSE_HIGH_WINDOW_DAYS) {
                continue;
            }
            let entry = max_by_day.entry(day).or_insert(value);
            if value > *entry {
                *entry = value;
            }
        }

        max_by_day
            .values()
            .filter(|max| **max >= self.thresholds.glucose_high_mgdl)
            .count() as u32
    }

    /// Distinct local days in the trailing window where the day's max
    /// systolic or max diastolic met its threshold (either bound suffices).
    fn bp_elevated_days(
        &self,
        readings: &[&MetricReading],
        today: NaiveDate,
        offset: FixedOffset,
    ) -> u32 {
        let mut max_by_day: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
        for reading in readings {
            if reading.kind != MetricKind::BloodPressure {
                continue;
            }
            let Some((systolic, diastolic)) = reading.value.blood_pressure() else {
                continue;
            };
            let day = local_date(reading.observed_at, offset);
            if !day_in_window(day, today, BP_ELEVATED_WINDOW_DAYS) {
                continue;
            }
            let entry = max_by_day.entry(day).or_insert((systolic, diastolic));
            entry.0 = entry.0.max(systolic);
            entry.1 = entry.1.max(diastolic);
        }

        max_by_day
            .values()
            .filter(|(systolic, diastolic)| {
                *systolic >= self.thresholds.bp_elevated_systolic
                    || *diastolic >= self.thresholds.bp_elevated_diastolic
            })
            .count() as u32
    }
}

/// True when `day` falls within the trailing `window_days` ending today
/// (today inclusive).
fn day_in_window(day: NaiveDate, today: NaiveDate, window_days: i64) -> bool {
    let diff = (today - day).num_days();
    diff >= 0 && diff < window_days
}

/// Latest single-valued reading of a kind, by observation time.
fn latest_single(readings: &[&MetricReading], kind: MetricKind) -> Option<f64> {
    readings
        .iter()
        .filter(|r| r.kind == kind)
        .max_by_key(|r| r.observed_at)
        .and_then(|r| r.value.single())
}

/// Latest blood pressure pair, by observation time.
fn latest_bp(readings: &[&MetricReading]) -> Option<BpPair> {
    readings
        .iter()
        .filter(|r| r.kind == MetricKind::BloodPressure)
        .max_by_key(|r| r.observed_at)
        .and_then(|r| r.value.blood_pressure())
        .map(|(systolic, diastolic)| BpPair {
            systolic,
            diastolic,
        })
}

/// Mean of glucose readings observed within the trailing 7 days.
fn glucose_average(readings: &[&MetricReading], as_of: DateTime<Utc>) -> Option<f64> {
    let window_start = as_of - Duration::days(GLUCOSE_AVG_WINDOW_DAYS);
    let values: Vec<f64> = readings
        .iter()
        .filter(|r| r.kind == MetricKind::Glucose && r.observed_at >= window_start)
        .filter_map(|r| r.value.single())
        .collect();

    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Latest minus earliest weight in the trailing 30 days.
///
/// Presence-based: a reading of exactly 0.0 is a value. None with fewer than
/// two readings in the window.
fn weight_change(readings: &[&MetricReading], as_of: DateTime<Utc>) -> Option<f64> {
    let window_start = as_of - Duration::days(WEIGHT_CHANGE_WINDOW_DAYS);
    let mut weights: Vec<(DateTime<Utc>, f64)> = readings
        .iter()
        .filter(|r| r.kind == MetricKind::Weight && r.observed_at >= window_start)
        .filter_map(|r| r.value.single().map(|v| (r.observed_at, v)))
        .collect();

    if weights.len() < 2 {
        return None;
    }
    weights.sort_by_key(|(observed_at, _)| *observed_at);

    let earliest = weights.first().map(|(_, v)| *v)?;
    let latest = weights.last().map(|(_, v)| *v)?;
    Some(latest - earliest)
}
