// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Prompt and prompt-rule models.
//!
//! Rules are persisted by the admin subsystem as a trigger type plus raw
//! JSON blobs (`schedule_json` / `conditions_json`). The engine parses each
//! record into the validated [`TriggerConfig`] tagged union at load time;
//! malformed records are rejected there and never reach the evaluator.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;
use crate::models::MetricKind;

/// Prompt category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptCategory {
    Reminder,
    Intervention,
    Education,
}

/// Delivery channel the external dispatcher uses for this prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    InApp,
    Email,
    Sms,
}

/// A message template authored by an admin, read-only to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prompt {
    /// Unique key (document ID)
    pub key: String,
    /// Display name for the admin UI
    pub name: String,
    pub category: PromptCategory,
    pub channel: Channel,
    /// Template string with `{{token}}` placeholders
    pub template: String,
    /// Deactivation immediately stops rule firing for referencing rules
    pub active: bool,
}

/// Comparison operator for event conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareOp {
    Gt,
    Gte,
    Lt,
    Lte,
    Eq,
}

impl CompareOp {
    /// Apply the operator. Comparison through a missing operator is handled
    /// by callers (fail closed), not here.
    pub fn compare(self, lhs: f64, rhs: f64) -> bool {
        match self {
            CompareOp::Gt => lhs > rhs,
            CompareOp::Gte => lhs >= rhs,
            CompareOp::Lt => lhs < rhs,
            CompareOp::Lte => lhs <= rhs,
            CompareOp::Eq => lhs == rhs,
        }
    }
}

/// Schedule trigger: matches when every *specified* field equals the
/// corresponding component of the user's current local time. An empty spec
/// matches any instant.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ScheduleSpec {
    /// Hour of day, 0-23
    #[validate(range(min = 0, max = 23))]
    pub hour: Option<u32>,
    /// Day of week, 0 = Sunday .. 6 = Saturday
    #[validate(range(min = 0, max = 6))]
    pub day_of_week: Option<u32>,
    /// Day of month, 1-31
    #[validate(range(min = 1, max = 31))]
    pub day_of_month: Option<u32>,
}

/// Event trigger condition against a metric summary.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EventCondition {
    /// Metric kind the condition targets (glucose or blood pressure)
    pub metric: MetricKind,
    /// Comparison operator for instantaneous checks
    pub op: Option<CompareOp>,
    /// Threshold for single-valued metrics
    pub value: Option<f64>,
    /// Systolic threshold (blood pressure)
    pub systolic: Option<f64>,
    /// Diastolic threshold (blood pressure)
    pub diastolic: Option<f64>,
    /// When set, the condition consults the rolling day counts instead of
    /// the instantaneous latest value
    #[validate(range(min = 1, max = 30))]
    pub consecutive_days: Option<u32>,
}

impl EventCondition {
    /// Structural checks beyond field ranges: the condition must be
    /// satisfiable for its metric kind.
    fn check_shape(&self) -> Result<(), AppError> {
        match self.metric {
            MetricKind::Glucose => {
                if self.consecutive_days.is_none() && (self.op.is_none() || self.value.is_none()) {
                    return Err(AppError::Configuration(
                        "glucose event condition requires op and value, or consecutive_days"
                            .to_string(),
                    ));
                }
            }
            MetricKind::BloodPressure => {
                if self.consecutive_days.is_none()
                    && (self.op.is_none()
                        || (self.systolic.is_none() && self.diastolic.is_none()))
                {
                    return Err(AppError::Configuration(
                        "blood pressure event condition requires op and a systolic or \
                         diastolic threshold, or consecutive_days"
                            .to_string(),
                    ));
                }
            }
            other => {
                return Err(AppError::Configuration(format!(
                    "event conditions are not supported for metric kind '{}'",
                    other.as_str()
                )));
            }
        }
        Ok(())
    }
}

/// Missed-activity trigger condition.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MissedCondition {
    /// Inactivity threshold in days (inclusive boundary)
    #[validate(range(min = 1, max = 365))]
    pub inactive_days: u32,
}

/// Validated trigger definition, keyed by the rule's trigger type.
#[derive(Debug, Clone)]
pub enum TriggerConfig {
    /// `None` when the record carried a null schedule blob; such a rule
    /// never matches but is not malformed.
    Schedule(Option<ScheduleSpec>),
    Event(EventCondition),
    Missed(MissedCondition),
}

/// A prompt rule as persisted: trigger type plus raw JSON blobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptRuleRecord {
    /// Unique key (document ID)
    pub key: String,
    /// Prompt this rule fires
    pub prompt_key: String,
    /// "schedule" | "event" | "missed"
    pub trigger_type: String,
    /// Schedule blob, relevant for schedule triggers
    pub schedule_json: Option<serde_json::Value>,
    /// Condition blob, relevant for event and missed triggers
    pub conditions_json: Option<serde_json::Value>,
    /// Minimum hours between successive firings per user
    pub cooldown_hours: i64,
    /// Higher priority evaluates first
    pub priority: i32,
    pub active: bool,
}

impl PromptRuleRecord {
    /// Parse and validate the raw blobs into a [`TriggerConfig`].
    ///
    /// This is the fail-fast boundary: any shape or range problem comes back
    /// as [`AppError::Configuration`] and the caller skips the rule.
    pub fn parse_trigger(&self, default_inactive_days: u32) -> Result<TriggerConfig, AppError> {
        match self.trigger_type.as_str() {
            "schedule" => match &self.schedule_json {
                None => Ok(TriggerConfig::Schedule(None)),
                Some(raw) => {
                    let spec: ScheduleSpec = serde_json::from_value(raw.clone())
                        .map_err(|e| config_err(&self.key, "schedule_json", &e.to_string()))?;
                    spec.validate()
                        .map_err(|e| config_err(&self.key, "schedule_json", &e.to_string()))?;
                    Ok(TriggerConfig::Schedule(Some(spec)))
                }
            },
            "event" => {
                let raw = self.conditions_json.as_ref().ok_or_else(|| {
                    config_err(&self.key, "conditions_json", "missing for event trigger")
                })?;
                let cond: EventCondition = serde_json::from_value(raw.clone())
                    .map_err(|e| config_err(&self.key, "conditions_json", &e.to_string()))?;
                cond.validate()
                    .map_err(|e| config_err(&self.key, "conditions_json", &e.to_string()))?;
                cond.check_shape()?;
                Ok(TriggerConfig::Event(cond))
            }
            "missed" => {
                let cond = match &self.conditions_json {
                    None => MissedCondition {
                        inactive_days: default_inactive_days,
                    },
                    Some(raw) => serde_json::from_value(raw.clone())
                        .map_err(|e| config_err(&self.key, "conditions_json", &e.to_string()))?,
                };
                cond.validate()
                    .map_err(|e| config_err(&self.key, "conditions_json", &e.to_string()))?;
                Ok(TriggerConfig::Missed(cond))
            }
            other => Err(config_err(
                &self.key,
                "trigger_type",
                &format!("unknown trigger type '{}'", other),
            )),
        }
    }
}

fn config_err(rule_key: &str, field: &str, detail: &str) -> AppError {
    AppError::Configuration(format!("rule '{}': {}: {}", rule_key, field, detail))
}
