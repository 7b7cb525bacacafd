//! Engine configuration loaded from environment variables.
//!
//! Every tunable has a default so the engine runs with an empty environment;
//! deployments override through env vars (or a `.env` file in development).

use std::env;
use std::time::Duration;

/// Policy for how many rules may fire for one user in a single pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiFirePolicy {
    /// Every eligible rule fires (e.g. one intervention plus one reminder).
    AllEligible,
    /// Stop after the first rule that actually fires. Gated or skipped rules
    /// do not consume the slot.
    HighestPriorityOnly,
}

impl MultiFirePolicy {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "all" => Some(Self::AllEligible),
            "highest_priority" => Some(Self::HighestPriorityOnly),
            _ => None,
        }
    }
}

/// Clinical thresholds used by the aggregator's day-count signals.
///
/// These belong to the engine, not to individual rules: summaries are
/// computed once per evaluation pass, before any rule is consulted. Rules
/// express day-count requirements against the precomputed counts.
#[derive(Debug, Clone, Copy)]
pub struct AggregationThresholds {
    /// A day counts as a glucose "high day" when its max reading (mg/dL)
    /// meets or exceeds this.
    pub glucose_high_mgdl: f64,
    /// A day counts as BP "elevated" when max systolic meets this...
    pub bp_elevated_systolic: f64,
    /// ...or max diastolic meets this (either bound suffices).
    pub bp_elevated_diastolic: f64,
}

impl Default for AggregationThresholds {
    fn default() -> Self {
        Self {
            glucose_high_mgdl: 140.0,
            bp_elevated_systolic: 130.0,
            bp_elevated_diastolic: 85.0,
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Thresholds feeding high-days / elevated-days counts.
    pub thresholds: AggregationThresholds,
    /// Default inactivity threshold (days) for missed-activity rules that
    /// don't specify their own.
    pub default_inactive_days: u32,
    /// How many rules may fire per user per pass.
    pub multi_fire_policy: MultiFirePolicy,
    /// Concurrent per-user evaluations during a scheduled batch.
    pub max_concurrent_evaluations: usize,
    /// Upper bound on one user's evaluation inside a batch; a timed-out user
    /// is skipped-with-error, not fatal to the batch.
    pub user_eval_timeout: Duration,
    /// Seed fixture path for the batch runner binary.
    pub seed_path: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            thresholds: AggregationThresholds::default(),
            default_inactive_days: 3,
            multi_fire_policy: MultiFirePolicy::AllEligible,
            max_concurrent_evaluations: 16,
            user_eval_timeout: Duration::from_secs(10),
            seed_path: "data/seed.json".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Self::default();

        Ok(Self {
            thresholds: AggregationThresholds {
                glucose_high_mgdl: parse_env(
                    "GLUCOSE_HIGH_MGDL",
                    defaults.thresholds.glucose_high_mgdl,
                )?,
                bp_elevated_systolic: parse_env(
                    "BP_ELEVATED_SYSTOLIC",
                    defaults.thresholds.bp_elevated_systolic,
                )?,
                bp_elevated_diastolic: parse_env(
                    "BP_ELEVATED_DIASTOLIC",
                    defaults.thresholds.bp_elevated_diastolic,
                )?,
            },
            default_inactive_days: parse_env("DEFAULT_INACTIVE_DAYS", 3u32)?,
            multi_fire_policy: match env::var("MULTI_FIRE_POLICY") {
                Ok(raw) => MultiFirePolicy::parse(&raw)
                    .ok_or(ConfigError::Invalid("MULTI_FIRE_POLICY"))?,
                Err(_) => MultiFirePolicy::AllEligible,
            },
            max_concurrent_evaluations: parse_env("MAX_CONCURRENT_EVALUATIONS", 16usize)?,
            user_eval_timeout: Duration::from_secs(parse_env("USER_EVAL_TIMEOUT_SECS", 10u64)?),
            seed_path: env::var("SEED_PATH").unwrap_or(defaults.seed_path),
        })
    }
}

/// Parse an env var, falling back to a default when unset.
fn parse_env<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid(name)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
