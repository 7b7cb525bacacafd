//! Prompt delivery audit records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ActivitySummary, MetricSummary};

/// Delivery status. `Sent` is written by the gate; the external delivery
/// channel owns the transitions to `Failed`/`Opened`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Sent,
    Failed,
    Opened,
}

/// Snapshot of the signals that justified a firing, stored with the record
/// so coaches can audit why a participant was messaged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliverySnapshot {
    pub metrics: MetricSummary,
    pub activity: ActivitySummary,
}

/// Immutable audit record of one prompt firing.
///
/// Created exactly once per successful firing by the delivery gate; the
/// cooldown check reads these records back, so they are the engine's sole
/// deduplication mechanism.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDelivery {
    pub user_id: String,
    pub prompt_key: String,
    /// Rule that triggered the firing
    pub rule_key: String,
    /// When the prompt fired (UTC)
    pub fired_at: DateTime<Utc>,
    /// Signal snapshot at firing time
    pub context: DeliverySnapshot,
    pub status: DeliveryStatus,
}
