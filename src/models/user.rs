//! User model as seen by the engine.

use serde::{Deserialize, Serialize};

/// Participant profile view consumed by the engine.
///
/// Owned by the (external) profile subsystem; the engine reads it for the
/// display name, the explicit per-user timezone, and the active flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User ID (document key in the profile store)
    pub user_id: String,
    /// First name, used by the renderer ("there" when empty)
    pub first_name: String,
    /// Email address (may be None if not shared)
    pub email: Option<String>,
    /// Minutes east of UTC for the user's local timezone. All day-bucketing
    /// for this user happens in this offset, never in server time.
    pub utc_offset_minutes: i32,
    /// Inactive users are excluded from scheduled batch passes
    pub active: bool,
    /// When the user enrolled (ISO 8601)
    pub created_at: String,
}

/// Daily macro targets from the user's coaching plan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacroTargets {
    pub protein_g: f64,
    pub carbs_g: f64,
    pub calories_kcal: f64,
}
