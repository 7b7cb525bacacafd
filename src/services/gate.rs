// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Delivery gating.
//!
//! Enforces per-rule cooldowns against the delivery history and records new
//! deliveries. The cooldown check is the engine's *sole* deduplication
//! mechanism, so the check-then-write sequence must be atomic: a scheduled
//! batch pass and a real-time metric-logged trigger landing together for the
//! same (user, prompt) must produce exactly one record. A per-(user, prompt)
//! mutex serializes the claim; the cooldown is re-checked under the lock
//! before writing.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::models::{DeliverySnapshot, DeliveryStatus, PromptDelivery};
use crate::store::CoachStore;

/// Per-(user, prompt) claim locks, shared across all gate handles.
type DeliveryLocks = Arc<DashMap<(String, String), Arc<Mutex<()>>>>;

/// Gates prompt firings against delivery history.
#[derive(Clone)]
pub struct DeliveryGate {
    store: Arc<dyn CoachStore>,
    locks: DeliveryLocks,
}

impl DeliveryGate {
    pub fn new(store: Arc<dyn CoachStore>) -> Self {
        Self {
            store,
            locks: Arc::new(DashMap::new()),
        }
    }

    /// Whether a rule may fire: true iff no delivery exists for this
    /// (user, prompt) within the cooldown window ending at `now`. A delivery
    /// exactly at the window edge still blocks.
    ///
    /// This is the cheap pre-check; the authoritative check happens again
    /// under the claim lock in [`DeliveryGate::record_delivery`].
    pub async fn should_fire(
        &self,
        user_id: &str,
        prompt_key: &str,
        cooldown_hours: i64,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let since = now - Duration::hours(cooldown_hours);
        let recent = self
            .store
            .get_recent_deliveries(user_id, prompt_key, since)
            .await?;
        Ok(recent.is_empty())
    }

    /// Atomically claim the cooldown window and persist the delivery record.
    ///
    /// Returns `Ok(None)` when another trigger won the window between the
    /// caller's pre-check and this claim (the caller reports `gated`, not an
    /// error). A storage failure propagates: the prompt was NOT delivered and
    /// must not be reported as such.
    pub async fn record_delivery(
        &self,
        user_id: &str,
        prompt_key: &str,
        rule_key: &str,
        cooldown_hours: i64,
        context: DeliverySnapshot,
        now: DateTime<Utc>,
    ) -> Result<Option<PromptDelivery>> {
        let lock = self
            .locks
            .entry((user_id.to_string(), prompt_key.to_string()))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let _guard = lock.lock().await;

        // Re-check under the lock: a concurrent claim may have written while
        // we were waiting.
        if !self
            .should_fire(user_id, prompt_key, cooldown_hours, now)
            .await?
        {
            tracing::debug!(
                user_id,
                prompt_key,
                "Delivery suppressed by concurrent claim"
            );
            return Ok(None);
        }

        let delivery = PromptDelivery {
            user_id: user_id.to_string(),
            prompt_key: prompt_key.to_string(),
            rule_key: rule_key.to_string(),
            fired_at: now,
            context,
            status: DeliveryStatus::Sent,
        };

        let stored = self.store.insert_delivery(delivery).await?;
        tracing::info!(user_id, prompt_key, rule_key, "Prompt delivery recorded");
        Ok(Some(stored))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    fn snapshot() -> DeliverySnapshot {
        DeliverySnapshot {
            metrics: Default::default(),
            activity: Default::default(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_first_delivery_fires_and_second_is_gated() {
        let store = Arc::new(MemoryStore::new());
        let gate = DeliveryGate::new(store.clone());

        assert!(gate.should_fire("u1", "p1", 24, now()).await.unwrap());

        let first = gate
            .record_delivery("u1", "p1", "r1", 24, snapshot(), now())
            .await
            .unwrap();
        assert!(first.is_some());

        // Within cooldown: pre-check refuses and claim returns None
        let later = now() + Duration::hours(2);
        assert!(!gate.should_fire("u1", "p1", 24, later).await.unwrap());
        let second = gate
            .record_delivery("u1", "p1", "r1", 24, snapshot(), later)
            .await
            .unwrap();
        assert!(second.is_none());

        assert_eq!(store.deliveries_for_user("u1").len(), 1);
    }

    #[tokio::test]
    async fn test_cooldown_expiry_allows_refire() {
        let store = Arc::new(MemoryStore::new());
        let gate = DeliveryGate::new(store.clone());

        gate.record_delivery("u1", "p1", "r1", 24, snapshot(), now())
            .await
            .unwrap();

        // Exactly at the edge the earlier delivery still blocks
        let at_edge = now() + Duration::hours(24);
        assert!(!gate.should_fire("u1", "p1", 24, at_edge).await.unwrap());

        let past_edge = at_edge + Duration::seconds(1);
        assert!(gate.should_fire("u1", "p1", 24, past_edge).await.unwrap());
        let refire = gate
            .record_delivery("u1", "p1", "r1", 24, snapshot(), past_edge)
            .await
            .unwrap();
        assert!(refire.is_some());
        assert_eq!(store.deliveries_for_user("u1").len(), 2);
    }

    #[tokio::test]
    async fn test_cooldowns_are_per_prompt_and_per_user() {
        let store = Arc::new(MemoryStore::new());
        let gate = DeliveryGate::new(store.clone());

        gate.record_delivery("u1", "p1", "r1", 24, snapshot(), now())
            .await
            .unwrap();

        // Different prompt, same user
        assert!(gate.should_fire("u1", "p2", 24, now()).await.unwrap());
        // Same prompt, different user
        assert!(gate.should_fire("u2", "p1", 24, now()).await.unwrap());
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let store = Arc::new(MemoryStore::new());
        let gate = DeliveryGate::new(store.clone());
        store.set_fail_delivery_writes(true);

        let result = gate
            .record_delivery("u1", "p1", "r1", 24, snapshot(), now())
            .await;

        assert!(result.is_err());
        assert!(store.deliveries_for_user("u1").is_empty());
    }
}
