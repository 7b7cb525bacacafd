//! In-memory store backed by concurrent maps.
//!
//! Serves the batch runner binary, local development, and the test suite.
//! Write visibility is immediate; a delivery inserted by one task is seen by
//! the next `get_recent_deliveries` call from any other task.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{AppError, Result};
use crate::models::{
    MacroTargets, MetricKind, MetricReading, Prompt, PromptDelivery, PromptRuleRecord, User,
};
use crate::store::CoachStore;

/// Concurrent in-memory store.
#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<String, User>,
    /// Readings per user, unordered; reads sort by observation time.
    readings: DashMap<String, Vec<MetricReading>>,
    rules: DashMap<String, PromptRuleRecord>,
    prompts: DashMap<String, Prompt>,
    /// Deliveries per user.
    deliveries: DashMap<String, Vec<PromptDelivery>>,
    macro_targets: DashMap<String, MacroTargets>,
    /// Test hook: when set, delivery writes fail with a storage error.
    fail_delivery_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Seeding ─────────────────────────────────────────────────

    pub fn add_user(&self, user: User) {
        self.users.insert(user.user_id.clone(), user);
    }

    pub fn add_reading(&self, reading: MetricReading) {
        self.readings
            .entry(reading.user_id.clone())
            .or_default()
            .push(reading);
    }

    pub fn add_rule(&self, rule: PromptRuleRecord) {
        self.rules.insert(rule.key.clone(), rule);
    }

    pub fn add_prompt(&self, prompt: Prompt) {
        self.prompts.insert(prompt.key.clone(), prompt);
    }

    pub fn set_macro_targets(&self, user_id: &str, targets: MacroTargets) {
        self.macro_targets.insert(user_id.to_string(), targets);
    }

    /// Make subsequent delivery writes fail (persistence-failure testing).
    pub fn set_fail_delivery_writes(&self, fail: bool) {
        self.fail_delivery_writes.store(fail, Ordering::SeqCst);
    }

    /// All deliveries recorded for a user, in insertion order.
    pub fn deliveries_for_user(&self, user_id: &str) -> Vec<PromptDelivery> {
        self.deliveries
            .get(user_id)
            .map(|d| d.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CoachStore for MemoryStore {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        Ok(self.users.get(user_id).map(|u| u.clone()))
    }

    async fn get_active_users(&self) -> Result<Vec<User>> {
        let mut users: Vec<User> = self
            .users
            .iter()
            .filter(|entry| entry.active)
            .map(|entry| entry.clone())
            .collect();
        users.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(users)
    }

    async fn get_readings_for_user(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<MetricReading>> {
        let mut readings: Vec<MetricReading> = self
            .readings
            .get(user_id)
            .map(|r| {
                r.iter()
                    .filter(|reading| reading.observed_at >= since)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        readings.sort_by_key(|r| r.observed_at);
        Ok(readings)
    }

    async fn get_readings_for_cohort(
        &self,
        user_ids: &[String],
        kind: MetricKind,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<MetricReading>> {
        let mut readings = Vec::new();
        for user_id in user_ids {
            if let Some(user_readings) = self.readings.get(user_id) {
                readings.extend(
                    user_readings
                        .iter()
                        .filter(|r| r.kind == kind && r.observed_at >= from && r.observed_at <= to)
                        .cloned(),
                );
            }
        }
        readings.sort_by_key(|r| r.observed_at);
        Ok(readings)
    }

    async fn get_active_rules(&self) -> Result<Vec<PromptRuleRecord>> {
        Ok(self
            .rules
            .iter()
            .filter(|entry| entry.active)
            .map(|entry| entry.clone())
            .collect())
    }

    async fn get_prompt(&self, prompt_key: &str) -> Result<Option<Prompt>> {
        Ok(self.prompts.get(prompt_key).map(|p| p.clone()))
    }

    async fn get_recent_deliveries(
        &self,
        user_id: &str,
        prompt_key: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<PromptDelivery>> {
        Ok(self
            .deliveries
            .get(user_id)
            .map(|user_deliveries| {
                user_deliveries
                    .iter()
                    .filter(|d| d.prompt_key == prompt_key && d.fired_at >= since)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get_macro_targets(&self, user_id: &str) -> Result<Option<MacroTargets>> {
        Ok(self.macro_targets.get(user_id).map(|t| *t))
    }

    async fn insert_delivery(&self, delivery: PromptDelivery) -> Result<PromptDelivery> {
        if self.fail_delivery_writes.load(Ordering::SeqCst) {
            return Err(AppError::Storage(
                "delivery write failed (injected)".to_string(),
            ));
        }
        self.deliveries
            .entry(delivery.user_id.clone())
            .or_default()
            .push(delivery.clone());
        Ok(delivery)
    }
}
