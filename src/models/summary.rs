//! Derived per-user summaries produced by the aggregator.
//!
//! Neither summary is persisted; both are computed per evaluation instant
//! and snapshotted into delivery records. Every field is `Option` where no
//! qualifying reading may exist, and that absence propagates to rendering as
//! the `"--"` placeholder, never as a numeric artifact.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A systolic/diastolic pair as surfaced in summaries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BpPair {
    pub systolic: f64,
    pub diastolic: f64,
}

/// Derived metric signals for one user at one evaluation instant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricSummary {
    /// Latest glucose reading (mg/dL)
    pub glucose_latest: Option<f64>,
    /// Mean of glucose readings over the trailing 7 days
    pub glucose_avg_7d: Option<f64>,
    /// Distinct local days in the trailing 3-day window whose max glucose
    /// met the configured high threshold
    pub glucose_high_days: u32,
    /// Latest blood pressure reading
    pub bp_latest: Option<BpPair>,
    /// Distinct local days in the trailing 7-day window whose max systolic
    /// or diastolic met the configured elevated thresholds
    pub bp_elevated_days: u32,
    /// Latest weight reading (kg)
    pub weight_latest: Option<f64>,
    /// Latest minus earliest weight over the trailing 30 days; None with
    /// fewer than two readings
    pub weight_change_30d: Option<f64>,
    /// Latest waist reading (cm)
    pub waist_latest: Option<f64>,
    /// Latest ketones reading (mmol/L)
    pub ketones_latest: Option<f64>,
}

/// Derived logging-behavior signals for one user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivitySummary {
    /// Local date of the most recent reading of any kind
    pub last_log_date: Option<NaiveDate>,
    /// Whole days since the last log; None if the user never logged.
    /// "Never logged" is a distinct state from "severely overdue".
    pub days_since_last_log: Option<i64>,
    /// Consecutive local days with at least one reading, counting backward
    /// from today inclusive; capped at 30
    pub streak_days: u32,
    /// 0-100 score: mean of distinct-kinds-per-day / 5 over the most recent
    /// days with data (at most 7), rounded to the nearest integer
    pub adherence_score: u32,
}
