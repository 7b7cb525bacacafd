// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use std::sync::Arc;

use vitals_coach::config::Config;
use vitals_coach::models::{
    Channel, MetricKind, MetricReading, MetricValue, Prompt, PromptCategory, PromptRuleRecord,
    User,
};
use vitals_coach::services::RuleEngine;
use vitals_coach::store::MemoryStore;

/// Fixed evaluation instant used across the integration suite:
/// 2024-06-15 12:00 UTC (a Saturday).
#[allow(dead_code)]
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

/// Engine over a fresh in-memory store with default config.
#[allow(dead_code)]
pub fn test_engine() -> (RuleEngine, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let engine = RuleEngine::new(Config::default(), store.clone());
    (engine, store)
}

/// UTC user with sane defaults.
#[allow(dead_code)]
pub fn make_user(user_id: &str) -> User {
    User {
        user_id: user_id.to_string(),
        first_name: "Ada".to_string(),
        email: Some("ada@example.com".to_string()),
        utc_offset_minutes: 0,
        active: true,
        created_at: "2024-01-01T00:00:00Z".to_string(),
    }
}

#[allow(dead_code)]
pub fn make_prompt(key: &str, template: &str) -> Prompt {
    Prompt {
        key: key.to_string(),
        name: format!("Prompt {}", key),
        category: PromptCategory::Intervention,
        channel: Channel::InApp,
        template: template.to_string(),
        active: true,
    }
}

/// Event rule: glucose >= 140, 24h cooldown.
#[allow(dead_code)]
pub fn make_glucose_rule(key: &str, prompt_key: &str) -> PromptRuleRecord {
    PromptRuleRecord {
        key: key.to_string(),
        prompt_key: prompt_key.to_string(),
        trigger_type: "event".to_string(),
        schedule_json: None,
        conditions_json: Some(json!({ "metric": "glucose", "op": "gte", "value": 140.0 })),
        cooldown_hours: 24,
        priority: 10,
        active: true,
    }
}

/// A glucose reading observed and created at the same instant (not backfill).
#[allow(dead_code)]
pub fn make_glucose_reading(
    user_id: &str,
    value: f64,
    observed_at: DateTime<Utc>,
) -> MetricReading {
    MetricReading {
        user_id: user_id.to_string(),
        kind: MetricKind::Glucose,
        value: MetricValue::Single(value),
        observed_at,
        created_at: observed_at,
    }
}
