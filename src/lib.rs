// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Vitals-Coach: decision engine for a metabolic-health coaching program
//!
//! This crate decides, per participant, whether to send a personalized
//! coaching prompt based on recent health metrics, logging behavior, and
//! time-of-day schedules. Cooldowns and historical-backfill suppression
//! prevent over-messaging.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod time_utils;

use std::sync::Arc;

use config::Config;
use services::{OutcomeAnalyzer, RuleEngine};
use store::CoachStore;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub engine: RuleEngine,
    pub outcomes: OutcomeAnalyzer,
}

impl AppState {
    /// Assemble the engine and analyzers over one store.
    pub fn new(config: Config, store: Arc<dyn CoachStore>) -> Self {
        let engine = RuleEngine::new(config.clone(), store.clone());
        let outcomes = OutcomeAnalyzer::new(store);
        Self {
            config,
            engine,
            outcomes,
        }
    }
}
