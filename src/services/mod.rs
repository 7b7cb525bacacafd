// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod aggregator;
pub mod conditions;
pub mod engine;
pub mod gate;
pub mod outcomes;
pub mod template;

pub use aggregator::MetricAggregator;
pub use engine::{BatchOutcome, FireOutcome, FireResult, RuleEngine};
pub use gate::DeliveryGate;
pub use outcomes::{OutcomeAnalyzer, OutcomeChange};
pub use template::{RenderContext, TemplateRenderer};
