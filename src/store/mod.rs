// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Storage abstraction consumed by the engine.
//!
//! Persistence itself belongs to an external collaborator; the engine is
//! written against this narrow trait. [`MemoryStore`] is the bundled
//! implementation used by the batch runner, the test suite, and local
//! development.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{
    MacroTargets, MetricKind, MetricReading, Prompt, PromptDelivery, PromptRuleRecord, User,
};

/// Read/write operations the engine needs from the backing store.
///
/// All calls are expected to be short, bounded operations; the batch
/// orchestrator wraps whole per-user evaluations in a timeout rather than
/// each call individually.
#[async_trait]
pub trait CoachStore: Send + Sync {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>>;

    /// Users eligible for scheduled batch evaluation.
    async fn get_active_users(&self) -> Result<Vec<User>>;

    /// A user's readings observed at or after `since`, ordered by
    /// observation time ascending.
    async fn get_readings_for_user(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<MetricReading>>;

    /// Readings of one kind for a cohort of users within a window, for the
    /// outcome analyzer.
    async fn get_readings_for_cohort(
        &self,
        user_ids: &[String],
        kind: MetricKind,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<MetricReading>>;

    /// Active rules only; ordering is the engine's concern.
    async fn get_active_rules(&self) -> Result<Vec<PromptRuleRecord>>;

    async fn get_prompt(&self, prompt_key: &str) -> Result<Option<Prompt>>;

    /// Deliveries for (user, prompt) fired at or after `since`.
    async fn get_recent_deliveries(
        &self,
        user_id: &str,
        prompt_key: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<PromptDelivery>>;

    async fn get_macro_targets(&self, user_id: &str) -> Result<Option<MacroTargets>>;

    /// Persist a delivery record. Failure here means the prompt was NOT
    /// delivered; callers must not report success downstream.
    async fn insert_delivery(&self, delivery: PromptDelivery) -> Result<PromptDelivery>;
}
