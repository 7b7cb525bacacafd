// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Rule engine orchestration.
//!
//! Handles the core workflow for one user:
//! 1. Fetch readings (30-day lookback) and derive summaries
//! 2. Evaluate each active rule, highest priority first
//! 3. Gate passing rules against delivery history
//! 4. Render and record gate-approved prompts
//!
//! One malformed rule is skipped with a logged reason, never thrown; one
//! failing user never aborts a batch.

use chrono::{DateTime, Duration, Utc};
use futures_util::{stream, StreamExt};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{Config, MultiFirePolicy};
use crate::error::{AppError, Result};
use crate::models::{
    ActivitySummary, DeliverySnapshot, MacroTargets, MetricKind, MetricReading, MetricSummary,
    PromptRuleRecord, TriggerConfig, User,
};
use crate::services::aggregator::{MetricAggregator, READING_LOOKBACK_DAYS};
use crate::services::conditions::{
    evaluate_bp, evaluate_glucose, evaluate_missed, evaluate_schedule,
};
use crate::services::gate::DeliveryGate;
use crate::services::template::{RenderContext, TemplateRenderer};
use crate::store::CoachStore;
use crate::time_utils::{local_time, user_offset};

/// Terminal outcome of one rule for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FireOutcome {
    /// Condition passed, gate approved, delivery recorded
    Fired,
    /// Condition not met, rule malformed, or delivery write failed
    Skipped,
    /// Condition passed but cooldown (or a concurrent claim) blocked it
    Gated,
}

/// Per-rule evaluation result.
#[derive(Debug, Clone, Serialize)]
pub struct FireResult {
    pub rule_key: String,
    pub outcome: FireOutcome,
    pub reason: String,
    pub rendered_message: Option<String>,
}

impl FireResult {
    fn skipped(rule_key: &str, reason: impl Into<String>) -> Self {
        Self {
            rule_key: rule_key.to_string(),
            outcome: FireOutcome::Skipped,
            reason: reason.into(),
            rendered_message: None,
        }
    }

    fn gated(rule_key: &str, reason: impl Into<String>) -> Self {
        Self {
            rule_key: rule_key.to_string(),
            outcome: FireOutcome::Gated,
            reason: reason.into(),
            rendered_message: None,
        }
    }

    fn fired(rule_key: &str, rendered_message: String) -> Self {
        Self {
            rule_key: rule_key.to_string(),
            outcome: FireOutcome::Fired,
            reason: "fired".to_string(),
            rendered_message: Some(rendered_message),
        }
    }
}

/// Result of a scheduled batch pass.
///
/// Users whose whole evaluation failed or timed out appear in `failed`, not
/// in `results`; partial failures inside one user's pass surface as skipped
/// results instead.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub results: HashMap<String, Vec<FireResult>>,
    /// (user_id, reason) for users that could not be evaluated.
    pub failed: Vec<(String, String)>,
}

impl BatchOutcome {
    /// Total prompts fired across the batch.
    pub fn fired_count(&self) -> usize {
        self.results
            .values()
            .flatten()
            .filter(|r| r.outcome == FireOutcome::Fired)
            .count()
    }

    /// Returns true if every user was evaluated.
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Orchestrates rule evaluation and prompt firing.
pub struct RuleEngine {
    config: Config,
    store: Arc<dyn CoachStore>,
    aggregator: MetricAggregator,
    renderer: TemplateRenderer,
    gate: DeliveryGate,
}

impl RuleEngine {
    pub fn new(config: Config, store: Arc<dyn CoachStore>) -> Self {
        let aggregator = MetricAggregator::new(config.thresholds);
        let gate = DeliveryGate::new(store.clone());
        Self {
            config,
            store,
            aggregator,
            renderer: TemplateRenderer::new(),
            gate,
        }
    }

    /// Run one user through all active rules once.
    pub async fn evaluate_and_fire(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<FireResult>> {
        self.evaluate_user(user_id, now, None).await
    }

    /// Reading-triggered path: re-evaluates only event rules targeting the
    /// logged kind, immediately after a new reading is persisted.
    ///
    /// Backfilled readings never trigger here (they are history, not
    /// events) but they still count inside the aggregates the next
    /// evaluation computes.
    pub async fn on_metric_logged(
        &self,
        user_id: &str,
        kind: MetricKind,
        reading: &MetricReading,
        now: DateTime<Utc>,
    ) -> Result<Vec<FireResult>> {
        if reading.is_backfilled() {
            tracing::debug!(
                user_id,
                kind = kind.as_str(),
                "Backfilled reading, skipping event evaluation"
            );
            return Ok(Vec::new());
        }
        self.evaluate_user(user_id, now, Some(kind)).await
    }

    /// Run every active user through `evaluate_and_fire` with bounded
    /// concurrency. Per-user failures and timeouts are isolated; the batch
    /// always completes.
    pub async fn process_scheduled_batch(&self, now: DateTime<Utc>) -> Result<BatchOutcome> {
        let users = self.store.get_active_users().await?;
        tracing::info!(users = users.len(), "Starting scheduled batch pass");

        let evaluations = stream::iter(users)
            .map(|user| {
                let user_id = user.user_id.clone();
                async move {
                    let result = tokio::time::timeout(
                        self.config.user_eval_timeout,
                        self.evaluate_and_fire(&user_id, now),
                    )
                    .await;
                    (user_id, result)
                }
            })
            .buffer_unordered(self.config.max_concurrent_evaluations)
            .collect::<Vec<_>>()
            .await;

        let mut outcome = BatchOutcome::default();
        for (user_id, result) in evaluations {
            match result {
                Ok(Ok(results)) => {
                    outcome.results.insert(user_id, results);
                }
                Ok(Err(e)) => {
                    tracing::warn!(user_id = %user_id, error = %e, "User evaluation failed");
                    outcome.failed.push((user_id, e.to_string()));
                }
                Err(_) => {
                    tracing::warn!(user_id = %user_id, "User evaluation timed out");
                    outcome.failed.push((user_id, "evaluation timed out".to_string()));
                }
            }
        }

        tracing::info!(
            evaluated = outcome.results.len(),
            failed = outcome.failed.len(),
            fired = outcome.fired_count(),
            "Scheduled batch pass complete"
        );
        Ok(outcome)
    }

    /// Shared evaluation pass. `only_kind` narrows to event rules for that
    /// metric (the real-time path).
    async fn evaluate_user(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        only_kind: Option<MetricKind>,
    ) -> Result<Vec<FireResult>> {
        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", user_id)))?;
        let offset = user_offset(user.utc_offset_minutes);

        let since = now - Duration::days(READING_LOOKBACK_DAYS);
        let readings = self.store.get_readings_for_user(user_id, since).await?;
        let metrics = self.aggregator.metric_summary(&readings, now, offset);
        let activity = self.aggregator.activity_summary(&readings, now, offset);
        let macros = self.store.get_macro_targets(user_id).await?;

        let mut rules = self.store.get_active_rules().await?;
        // Higher priority first; key breaks ties for deterministic passes
        rules.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.key.cmp(&b.key)));

        let mut results = Vec::with_capacity(rules.len());
        let mut fired_any = false;

        for rule in &rules {
            if fired_any && self.config.multi_fire_policy == MultiFirePolicy::HighestPriorityOnly {
                results.push(FireResult::skipped(
                    &rule.key,
                    "higher_priority_rule_already_fired",
                ));
                continue;
            }

            let result = self
                .evaluate_rule(&user, rule, &metrics, &activity, macros.as_ref(), now, only_kind)
                .await;
            fired_any = fired_any || result.outcome == FireOutcome::Fired;
            results.push(result);
        }

        Ok(results)
    }

    #[allow(clippy::too_many_arguments)]
    async fn evaluate_rule(
        &self,
        user: &User,
        rule: &PromptRuleRecord,
        metrics: &MetricSummary,
        activity: &ActivitySummary,
        macros: Option<&MacroTargets>,
        now: DateTime<Utc>,
        only_kind: Option<MetricKind>,
    ) -> FireResult {
        // Fail-fast boundary: malformed configs never reach the evaluator
        let trigger = match rule.parse_trigger(self.config.default_inactive_days) {
            Ok(trigger) => trigger,
            Err(e) => {
                tracing::warn!(rule_key = %rule.key, error = %e, "Skipping malformed rule");
                return FireResult::skipped(&rule.key, format!("malformed_rule: {}", e));
            }
        };

        // Real-time path only re-evaluates event rules for the logged kind
        if let Some(kind) = only_kind {
            match &trigger {
                TriggerConfig::Event(cond) if cond.metric == kind => {}
                _ => {
                    return FireResult::skipped(&rule.key, "not_an_event_rule_for_logged_kind");
                }
            }
        }

        let offset = user_offset(user.utc_offset_minutes);
        let matched = match &trigger {
            TriggerConfig::Schedule(spec) => {
                evaluate_schedule(spec.as_ref(), &local_time(now, offset))
            }
            TriggerConfig::Event(cond) => match cond.metric {
                MetricKind::Glucose => evaluate_glucose(cond, metrics),
                MetricKind::BloodPressure => evaluate_bp(cond, metrics),
                // parse_trigger rejects other kinds
                _ => false,
            },
            TriggerConfig::Missed(cond) => evaluate_missed(Some(cond), activity),
        };

        if !matched {
            return FireResult::skipped(&rule.key, "condition_not_met");
        }

        // Prompt deactivation stops firing immediately, whatever the rule says
        let prompt = match self.store.get_prompt(&rule.prompt_key).await {
            Ok(Some(prompt)) if prompt.active => prompt,
            Ok(_) => {
                tracing::debug!(
                    rule_key = %rule.key,
                    prompt_key = %rule.prompt_key,
                    "Prompt missing or inactive"
                );
                return FireResult::skipped(&rule.key, "prompt_missing_or_inactive");
            }
            Err(e) => {
                return FireResult::skipped(&rule.key, format!("prompt_load_failed: {}", e));
            }
        };

        // Cheap pre-check before rendering; the authoritative claim re-checks
        match self
            .gate
            .should_fire(&user.user_id, &prompt.key, rule.cooldown_hours, now)
            .await
        {
            Ok(true) => {}
            Ok(false) => return FireResult::gated(&rule.key, "cooldown_active"),
            Err(e) => return FireResult::skipped(&rule.key, format!("gate_check_failed: {}", e)),
        }

        let rendered = self.renderer.render(
            &prompt.template,
            &RenderContext {
                first_name: &user.first_name,
                metrics,
                activity,
                macros,
            },
        );

        let snapshot = DeliverySnapshot {
            metrics: metrics.clone(),
            activity: activity.clone(),
        };
        match self
            .gate
            .record_delivery(
                &user.user_id,
                &prompt.key,
                &rule.key,
                rule.cooldown_hours,
                snapshot,
                now,
            )
            .await
        {
            Ok(Some(_)) => {
                tracing::info!(
                    user_id = %user.user_id,
                    rule_key = %rule.key,
                    prompt_key = %prompt.key,
                    "Prompt fired"
                );
                FireResult::fired(&rule.key, rendered)
            }
            Ok(None) => FireResult::gated(&rule.key, "cooldown_claimed_concurrently"),
            Err(e) => {
                // Not delivered: never report success downstream
                tracing::error!(
                    user_id = %user.user_id,
                    rule_key = %rule.key,
                    error = %e,
                    "Delivery record write failed"
                );
                FireResult::skipped(&rule.key, format!("delivery_write_failed: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Channel, MetricValue, Prompt, PromptCategory};
    use crate::store::MemoryStore;
    use chrono::TimeZone;
    use serde_json::json;

    fn test_user(user_id: &str) -> User {
        User {
            user_id: user_id.to_string(),
            first_name: "Ada".to_string(),
            email: None,
            utc_offset_minutes: 0,
            active: true,
            created_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    fn test_prompt(key: &str, template: &str) -> Prompt {
        Prompt {
            key: key.to_string(),
            name: key.to_string(),
            category: PromptCategory::Intervention,
            channel: Channel::InApp,
            template: template.to_string(),
            active: true,
        }
    }

    fn glucose_rule(key: &str, prompt_key: &str, priority: i32) -> PromptRuleRecord {
        PromptRuleRecord {
            key: key.to_string(),
            prompt_key: prompt_key.to_string(),
            trigger_type: "event".to_string(),
            schedule_json: None,
            conditions_json: Some(json!({ "metric": "glucose", "op": "gte", "value": 140.0 })),
            cooldown_hours: 24,
            priority,
            active: true,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn glucose_reading(user_id: &str, value: f64, observed_at: DateTime<Utc>) -> MetricReading {
        MetricReading {
            user_id: user_id.to_string(),
            kind: MetricKind::Glucose,
            value: MetricValue::Single(value),
            observed_at,
            created_at: observed_at,
        }
    }

    fn engine_with_store() -> (RuleEngine, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let engine = RuleEngine::new(Config::default(), store.clone());
        (engine, store)
    }

    #[tokio::test]
    async fn test_event_rule_fires_and_renders() {
        let (engine, store) = engine_with_store();
        store.add_user(test_user("u1"));
        store.add_prompt(test_prompt("p1", "Hi {{firstName}}, glucose {{glucose.latest}}"));
        store.add_rule(glucose_rule("r1", "p1", 10));
        store.add_reading(glucose_reading("u1", 150.0, now() - Duration::hours(1)));

        let results = engine.evaluate_and_fire("u1", now()).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].outcome, FireOutcome::Fired);
        assert_eq!(
            results[0].rendered_message.as_deref(),
            Some("Hi Ada, glucose 150")
        );
        assert_eq!(store.deliveries_for_user("u1").len(), 1);
    }

    #[tokio::test]
    async fn test_condition_not_met_is_skipped() {
        let (engine, store) = engine_with_store();
        store.add_user(test_user("u1"));
        store.add_prompt(test_prompt("p1", "x"));
        store.add_rule(glucose_rule("r1", "p1", 10));
        store.add_reading(glucose_reading("u1", 100.0, now() - Duration::hours(1)));

        let results = engine.evaluate_and_fire("u1", now()).await.unwrap();

        assert_eq!(results[0].outcome, FireOutcome::Skipped);
        assert_eq!(results[0].reason, "condition_not_met");
        assert!(store.deliveries_for_user("u1").is_empty());
    }

    #[tokio::test]
    async fn test_malformed_rule_skipped_others_still_evaluated() {
        let (engine, store) = engine_with_store();
        store.add_user(test_user("u1"));
        store.add_prompt(test_prompt("p1", "x"));

        let mut bad = glucose_rule("r-bad", "p1", 99);
        bad.conditions_json = Some(json!({ "metric": "glucose", "op": "between" }));
        store.add_rule(bad);
        store.add_rule(glucose_rule("r-good", "p1", 1));
        store.add_reading(glucose_reading("u1", 150.0, now() - Duration::hours(1)));

        let results = engine.evaluate_and_fire("u1", now()).await.unwrap();

        assert_eq!(results.len(), 2);
        let bad_result = results.iter().find(|r| r.rule_key == "r-bad").unwrap();
        assert_eq!(bad_result.outcome, FireOutcome::Skipped);
        assert!(bad_result.reason.starts_with("malformed_rule"));
        let good_result = results.iter().find(|r| r.rule_key == "r-good").unwrap();
        assert_eq!(good_result.outcome, FireOutcome::Fired);
    }

    #[tokio::test]
    async fn test_inactive_prompt_stops_firing() {
        let (engine, store) = engine_with_store();
        store.add_user(test_user("u1"));
        let mut prompt = test_prompt("p1", "x");
        prompt.active = false;
        store.add_prompt(prompt);
        store.add_rule(glucose_rule("r1", "p1", 10));
        store.add_reading(glucose_reading("u1", 150.0, now() - Duration::hours(1)));

        let results = engine.evaluate_and_fire("u1", now()).await.unwrap();

        assert_eq!(results[0].outcome, FireOutcome::Skipped);
        assert_eq!(results[0].reason, "prompt_missing_or_inactive");
    }

    #[tokio::test]
    async fn test_second_pass_within_cooldown_is_gated() {
        let (engine, store) = engine_with_store();
        store.add_user(test_user("u1"));
        store.add_prompt(test_prompt("p1", "x"));
        store.add_rule(glucose_rule("r1", "p1", 10));
        store.add_reading(glucose_reading("u1", 150.0, now() - Duration::hours(1)));

        let first = engine.evaluate_and_fire("u1", now()).await.unwrap();
        assert_eq!(first[0].outcome, FireOutcome::Fired);

        let second = engine
            .evaluate_and_fire("u1", now() + Duration::hours(2))
            .await
            .unwrap();
        assert_eq!(second[0].outcome, FireOutcome::Gated);
        assert_eq!(second[0].reason, "cooldown_active");
        assert_eq!(store.deliveries_for_user("u1").len(), 1);
    }

    #[tokio::test]
    async fn test_priority_order_and_multi_fire_default() {
        let (engine, store) = engine_with_store();
        store.add_user(test_user("u1"));
        store.add_prompt(test_prompt("p1", "one"));
        store.add_prompt(test_prompt("p2", "two"));
        store.add_rule(glucose_rule("r-low", "p1", 1));
        store.add_rule(glucose_rule("r-high", "p2", 100));
        store.add_reading(glucose_reading("u1", 150.0, now() - Duration::hours(1)));

        let results = engine.evaluate_and_fire("u1", now()).await.unwrap();

        // Priority order in the result list, both fired under AllEligible
        assert_eq!(results[0].rule_key, "r-high");
        assert_eq!(results[1].rule_key, "r-low");
        assert!(results.iter().all(|r| r.outcome == FireOutcome::Fired));
        assert_eq!(store.deliveries_for_user("u1").len(), 2);
    }

    #[tokio::test]
    async fn test_highest_priority_only_policy() {
        let store = Arc::new(MemoryStore::new());
        let config = Config {
            multi_fire_policy: MultiFirePolicy::HighestPriorityOnly,
            ..Default::default()
        };
        let engine = RuleEngine::new(config, store.clone());

        store.add_user(test_user("u1"));
        store.add_prompt(test_prompt("p1", "one"));
        store.add_prompt(test_prompt("p2", "two"));
        store.add_rule(glucose_rule("r-low", "p1", 1));
        store.add_rule(glucose_rule("r-high", "p2", 100));
        store.add_reading(glucose_reading("u1", 150.0, now() - Duration::hours(1)));

        let results = engine.evaluate_and_fire("u1", now()).await.unwrap();

        assert_eq!(results[0].outcome, FireOutcome::Fired);
        assert_eq!(results[1].outcome, FireOutcome::Skipped);
        assert_eq!(results[1].reason, "higher_priority_rule_already_fired");
        assert_eq!(store.deliveries_for_user("u1").len(), 1);
    }

    #[tokio::test]
    async fn test_skipped_rule_does_not_consume_priority_slot() {
        let store = Arc::new(MemoryStore::new());
        let config = Config {
            multi_fire_policy: MultiFirePolicy::HighestPriorityOnly,
            ..Default::default()
        };
        let engine = RuleEngine::new(config, store.clone());

        store.add_user(test_user("u1"));
        store.add_prompt(test_prompt("p1", "one"));
        store.add_prompt(test_prompt("p2", "two"));
        // High-priority rule whose condition fails
        let mut miss = glucose_rule("r-miss", "p1", 100);
        miss.conditions_json = Some(json!({ "metric": "glucose", "op": "gte", "value": 400.0 }));
        store.add_rule(miss);
        store.add_rule(glucose_rule("r-hit", "p2", 1));
        store.add_reading(glucose_reading("u1", 150.0, now() - Duration::hours(1)));

        let results = engine.evaluate_and_fire("u1", now()).await.unwrap();

        assert_eq!(results[0].outcome, FireOutcome::Skipped);
        assert_eq!(results[1].outcome, FireOutcome::Fired);
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let (engine, _store) = engine_with_store();

        let result = engine.evaluate_and_fire("ghost", now()).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delivery_write_failure_reports_skip_not_success() {
        let (engine, store) = engine_with_store();
        store.add_user(test_user("u1"));
        store.add_prompt(test_prompt("p1", "x"));
        store.add_rule(glucose_rule("r1", "p1", 10));
        store.add_reading(glucose_reading("u1", 150.0, now() - Duration::hours(1)));
        store.set_fail_delivery_writes(true);

        let results = engine.evaluate_and_fire("u1", now()).await.unwrap();

        assert_eq!(results[0].outcome, FireOutcome::Skipped);
        assert!(results[0].reason.starts_with("delivery_write_failed"));
        assert!(results[0].rendered_message.is_none());
        assert!(store.deliveries_for_user("u1").is_empty());
    }

    #[tokio::test]
    async fn test_on_metric_logged_backfilled_reading_suppressed() {
        let (engine, store) = engine_with_store();
        store.add_user(test_user("u1"));
        store.add_prompt(test_prompt("p1", "x"));
        store.add_rule(glucose_rule("r1", "p1", 10));

        // Observed two days ago, recorded now: backfill
        let mut reading = glucose_reading("u1", 150.0, now() - Duration::days(2));
        reading.created_at = now();
        store.add_reading(reading.clone());

        let results = engine
            .on_metric_logged("u1", MetricKind::Glucose, &reading, now())
            .await
            .unwrap();

        assert!(results.is_empty());
        assert!(store.deliveries_for_user("u1").is_empty());
    }

    #[tokio::test]
    async fn test_on_metric_logged_filters_to_matching_event_rules() {
        let (engine, store) = engine_with_store();
        store.add_user(test_user("u1"));
        store.add_prompt(test_prompt("p1", "x"));
        store.add_prompt(test_prompt("p2", "y"));
        store.add_rule(glucose_rule("r-glucose", "p1", 10));

        let mut missed = glucose_rule("r-missed", "p2", 5);
        missed.trigger_type = "missed".to_string();
        missed.conditions_json = Some(json!({ "inactive_days": 1 }));
        store.add_rule(missed);

        let reading = glucose_reading("u1", 150.0, now());
        store.add_reading(reading.clone());

        let results = engine
            .on_metric_logged("u1", MetricKind::Glucose, &reading, now())
            .await
            .unwrap();

        let glucose_result = results.iter().find(|r| r.rule_key == "r-glucose").unwrap();
        assert_eq!(glucose_result.outcome, FireOutcome::Fired);
        let missed_result = results.iter().find(|r| r.rule_key == "r-missed").unwrap();
        assert_eq!(missed_result.outcome, FireOutcome::Skipped);
        assert_eq!(missed_result.reason, "not_an_event_rule_for_logged_kind");
    }

    #[tokio::test]
    async fn test_batch_covers_active_users_only() {
        let (engine, store) = engine_with_store();
        store.add_user(test_user("u1"));
        store.add_user(test_user("u2"));
        let mut inactive = test_user("u3");
        inactive.active = false;
        store.add_user(inactive);

        store.add_prompt(test_prompt("p1", "glucose {{glucose.latest}}"));
        store.add_rule(glucose_rule("r1", "p1", 10));
        store.add_reading(glucose_reading("u1", 150.0, now() - Duration::hours(1)));
        store.add_reading(glucose_reading("u2", 100.0, now() - Duration::hours(1)));

        let outcome = engine.process_scheduled_batch(now()).await.unwrap();

        assert!(outcome.is_complete_success());
        assert_eq!(outcome.results.len(), 2);
        assert!(!outcome.results.contains_key("u3"));
        assert_eq!(outcome.fired_count(), 1);
        assert_eq!(
            outcome.results["u1"][0].outcome,
            FireOutcome::Fired
        );
        assert_eq!(
            outcome.results["u2"][0].outcome,
            FireOutcome::Skipped
        );
    }
}
