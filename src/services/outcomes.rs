// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cohort outcome analysis.
//!
//! Computes before/after drift for a metric across a cohort over a time
//! window, using only each user's earliest and latest reading in the window.
//! Users with fewer than two readings contribute nothing. The earliest/latest
//! checks are presence-based: a reading of exactly zero is a value, never
//! "missing".

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::Result;
use crate::models::{MetricKind, MetricReading};
use crate::store::CoachStore;

/// Result of a cohort outcome analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeChange {
    /// Mean of per-user (latest - earliest), rounded to one decimal; None
    /// when no user had two readings in the window.
    pub mean_change: Option<f64>,
    /// Users that actually contributed (>= 2 readings in the window).
    pub users_counted: usize,
}

/// Cohort-level outcome analyzer.
pub struct OutcomeAnalyzer {
    store: Arc<dyn CoachStore>,
}

impl OutcomeAnalyzer {
    pub fn new(store: Arc<dyn CoachStore>) -> Self {
        Self { store }
    }

    /// Fetch the cohort's readings for `kind` in `[from, to]` and compute the
    /// mean per-user change.
    pub async fn cohort_change(
        &self,
        user_ids: &[String],
        kind: MetricKind,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<OutcomeChange> {
        let readings = self
            .store
            .get_readings_for_cohort(user_ids, kind, from, to)
            .await?;
        Ok(compute_cohort_change(&readings))
    }
}

/// Pure computation over an already-fetched cohort slice.
pub fn compute_cohort_change(readings: &[MetricReading]) -> OutcomeChange {
    let mut by_user: BTreeMap<&str, Vec<(DateTime<Utc>, f64)>> = BTreeMap::new();
    for reading in readings {
        // BP drift is tracked on the systolic number
        let value = match reading.value.single() {
            Some(v) => v,
            None => match reading.value.blood_pressure() {
                Some((systolic, _)) => systolic,
                None => continue,
            },
        };
        by_user
            .entry(reading.user_id.as_str())
            .or_default()
            .push((reading.observed_at, value));
    }

    let mut changes = Vec::new();
    for series in by_user.values_mut() {
        if series.len() < 2 {
            continue;
        }
        series.sort_by_key(|(observed_at, _)| *observed_at);

        // Presence-based: first()/last() yield Options that are Some here;
        // the values themselves may legitimately be 0.0.
        let earliest = series.first().map(|(_, v)| *v);
        let latest = series.last().map(|(_, v)| *v);
        if let (Some(earliest), Some(latest)) = (earliest, latest) {
            changes.push(latest - earliest);
        }
    }

    if changes.is_empty() {
        return OutcomeChange {
            mean_change: None,
            users_counted: 0,
        };
    }

    let mean = changes.iter().sum::<f64>() / changes.len() as f64;
    OutcomeChange {
        mean_change: Some((mean * 10.0).round() / 10.0),
        users_counted: changes.len(),
    }
}
