// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Logged health reading model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Gap between creation and observation beyond which a reading is treated as
/// backfilled history rather than a live event.
const BACKFILL_GAP_HOURS: i64 = 1;

/// The closed set of metric kinds participants can log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Glucose,
    BloodPressure,
    Weight,
    Waist,
    Ketones,
}

impl MetricKind {
    /// Number of distinct kinds, the denominator of the adherence score.
    pub const COUNT: usize = 5;

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Glucose => "glucose",
            MetricKind::BloodPressure => "blood_pressure",
            MetricKind::Weight => "weight",
            MetricKind::Waist => "waist",
            MetricKind::Ketones => "ketones",
        }
    }
}

/// Typed value payload of a reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// Single numeric value (glucose mg/dL, weight kg, waist cm, ketones mmol/L).
    Single(f64),
    /// Systolic/diastolic pair (mmHg).
    BloodPressure { systolic: f64, diastolic: f64 },
}

impl MetricValue {
    /// The single numeric value, if this is not a blood-pressure pair.
    pub fn single(&self) -> Option<f64> {
        match self {
            MetricValue::Single(v) => Some(*v),
            MetricValue::BloodPressure { .. } => None,
        }
    }

    /// The systolic/diastolic pair, if this is a blood-pressure value.
    pub fn blood_pressure(&self) -> Option<(f64, f64)> {
        match self {
            MetricValue::BloodPressure {
                systolic,
                diastolic,
            } => Some((*systolic, *diastolic)),
            MetricValue::Single(_) => None,
        }
    }
}

/// One logged health observation.
///
/// `observed_at` is when the measurement occurred (user-supplied, may be in
/// the past); `created_at` is when the system recorded it. The gap between
/// them classifies backfilled entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricReading {
    /// Owning user ID
    pub user_id: String,
    /// Metric kind
    pub kind: MetricKind,
    /// Typed value payload
    pub value: MetricValue,
    /// When the measurement occurred (UTC)
    pub observed_at: DateTime<Utc>,
    /// When the system recorded it (UTC)
    pub created_at: DateTime<Utc>,
}

impl MetricReading {
    /// A reading is backfilled when it was recorded more than an hour after
    /// it was observed. Backfilled readings still count toward historical
    /// aggregates but are excluded from real-time event-trigger evaluation.
    pub fn is_backfilled(&self) -> bool {
        self.created_at - self.observed_at > Duration::hours(BACKFILL_GAP_HOURS)
    }
}
