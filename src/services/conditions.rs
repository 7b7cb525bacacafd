// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trigger condition evaluation.
//!
//! Stateless pure functions testing one rule's trigger definition against
//! derived summaries. No side effects, no I/O. Every ambiguous input
//! evaluates to false: comparisons fail closed, never open.

use chrono::{DateTime, Datelike, FixedOffset, Timelike};

use crate::models::{
    ActivitySummary, CompareOp, EventCondition, MetricSummary, MissedCondition, ScheduleSpec,
};

/// Test a schedule spec against the user's current local time.
///
/// Every *specified* field must equal the corresponding component; an empty
/// spec matches any instant; a null spec never matches. Weekday numbering is
/// 0 = Sunday.
pub fn evaluate_schedule(spec: Option<&ScheduleSpec>, now_local: &DateTime<FixedOffset>) -> bool {
    let Some(spec) = spec else {
        return false;
    };

    if let Some(hour) = spec.hour {
        if now_local.hour() != hour {
            return false;
        }
    }
    if let Some(day_of_week) = spec.day_of_week {
        if now_local.weekday().num_days_from_sunday() != day_of_week {
            return false;
        }
    }
    if let Some(day_of_month) = spec.day_of_month {
        if now_local.day() != day_of_month {
            return false;
        }
    }
    true
}

/// Test a missed-activity condition.
///
/// True iff the user has logged before and the gap has reached the threshold
/// (inclusive). A user who never logged evaluates false: that state belongs
/// to onboarding flows, not to message copy referencing metrics the user has
/// never produced.
pub fn evaluate_missed(cond: Option<&MissedCondition>, activity: &ActivitySummary) -> bool {
    let Some(cond) = cond else {
        return false;
    };
    match activity.days_since_last_log {
        Some(days) => days >= i64::from(cond.inactive_days),
        None => false,
    }
}

/// Test a glucose event condition.
///
/// With a consecutive-day requirement the test consults the rolling
/// high-days count only, ignoring the instantaneous latest value. Otherwise
/// the latest reading is compared against the threshold; a missing latest,
/// operator, or threshold evaluates false.
pub fn evaluate_glucose(cond: &EventCondition, summary: &MetricSummary) -> bool {
    if let Some(required_days) = cond.consecutive_days {
        return summary.glucose_high_days >= required_days;
    }

    match (summary.glucose_latest, cond.op, cond.value) {
        (Some(latest), Some(op), Some(threshold)) => op.compare(latest, threshold),
        _ => false,
    }
}

/// Test a blood pressure event condition.
///
/// Consecutive-day requirements consult the rolling elevated-days count.
/// Otherwise: with both thresholds present the condition is satisfied when
/// *either* is met (exceeding either number is clinically concerning); with
/// one threshold only that bound is checked; no latest reading, no operator,
/// or no thresholds at all evaluates false.
pub fn evaluate_bp(cond: &EventCondition, summary: &MetricSummary) -> bool {
    if let Some(required_days) = cond.consecutive_days {
        return summary.bp_elevated_days >= required_days;
    }

    let Some(latest) = summary.bp_latest else {
        return false;
    };
    let Some(op) = cond.op else {
        return false;
    };

    match (cond.systolic, cond.diastolic) {
        (Some(systolic), Some(diastolic)) => {
            op.compare(latest.systolic, systolic) || op.compare(latest.diastolic, diastolic)
        }
        (Some(systolic), None) => op.compare(latest.systolic, systolic),
        (None, Some(diastolic)) => op.compare(latest.diastolic, diastolic),
        (None, None) => false,
    }
}

/// Comparison through an optional operator; an absent operator is false.
pub fn compare(op: Option<CompareOp>, lhs: f64, rhs: f64) -> bool {
    match op {
        Some(op) => op.compare(lhs, rhs),
        None => false,
    }
}
