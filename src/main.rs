// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Vitals-Coach batch runner
//!
//! Runs one scheduled evaluation pass over every active user and logs the
//! outcome. An external scheduler (cron, Cloud Scheduler) invokes this
//! periodically; real persistence lives behind the store trait, so this
//! binary seeds an in-memory store from a JSON fixture file.

use serde::Deserialize;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vitals_coach::{
    config::Config,
    models::{MacroTargets, MetricReading, Prompt, PromptRuleRecord, User},
    store::MemoryStore,
    AppState,
};

/// Fixture file shape for seeding the in-memory store.
#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    readings: Vec<MetricReading>,
    #[serde(default)]
    prompts: Vec<Prompt>,
    #[serde(default)]
    rules: Vec<PromptRuleRecord>,
    #[serde(default)]
    macro_targets: std::collections::HashMap<String, MacroTargets>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(seed_path = %config.seed_path, "Starting Vitals-Coach batch runner");

    // Seed the in-memory store
    let store = Arc::new(MemoryStore::new());
    let seed_raw = std::fs::read_to_string(&config.seed_path)?;
    let seed: SeedFile = serde_json::from_str(&seed_raw)?;
    tracing::info!(
        users = seed.users.len(),
        readings = seed.readings.len(),
        rules = seed.rules.len(),
        prompts = seed.prompts.len(),
        "Seed fixture loaded"
    );

    for user in seed.users {
        store.add_user(user);
    }
    for reading in seed.readings {
        store.add_reading(reading);
    }
    for prompt in seed.prompts {
        store.add_prompt(prompt);
    }
    for rule in seed.rules {
        store.add_rule(rule);
    }
    for (user_id, targets) in seed.macro_targets {
        store.set_macro_targets(&user_id, targets);
    }

    // Build shared state and run one pass
    let state = AppState::new(config, store);
    let now = chrono::Utc::now();
    tracing::info!(as_of = %vitals_coach::time_utils::format_utc_rfc3339(now), "Evaluating");
    let outcome = state.engine.process_scheduled_batch(now).await?;

    for (user_id, results) in &outcome.results {
        for result in results {
            tracing::info!(
                user_id = %user_id,
                rule_key = %result.rule_key,
                outcome = ?result.outcome,
                reason = %result.reason,
                "Rule outcome"
            );
        }
    }
    for (user_id, reason) in &outcome.failed {
        tracing::warn!(user_id = %user_id, reason = %reason, "User evaluation failed");
    }
    tracing::info!(
        fired = outcome.fired_count(),
        failed = outcome.failed.len(),
        "Batch runner finished"
    );

    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vitals_coach=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
