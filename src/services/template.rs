// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Message personalization.
//!
//! Substitutes `{{token}}` placeholders in prompt templates from a user's
//! summaries. The hard guarantee: rendered output never contains the literal
//! substrings "NaN", "null", or "undefined". Every absent or non-finite
//! value becomes the `--` placeholder, and a final catch-all pass consumes
//! any token the renderer does not recognize.

use regex::Regex;

use crate::models::{ActivitySummary, MacroTargets, MetricSummary};

/// Placeholder for absent values.
const PLACEHOLDER: &str = "--";
/// Placeholder for an absent blood pressure pair.
const BP_PLACEHOLDER: &str = "--/--";
/// Fallback when the user has no usable first name.
const NAME_FALLBACK: &str = "there";

/// Everything the renderer may reference for one user.
pub struct RenderContext<'a> {
    pub first_name: &'a str,
    pub metrics: &'a MetricSummary,
    pub activity: &'a ActivitySummary,
    pub macros: Option<&'a MacroTargets>,
}

/// Renders prompt templates against a user's summaries.
pub struct TemplateRenderer {
    catch_all: Regex,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    pub fn new() -> Self {
        // Brace-free interior, so adjacent tokens are consumed separately;
        // runs after all specific substitutions.
        let catch_all = Regex::new(r"\{\{[^{}]*\}\}").expect("catch-all token pattern");
        Self { catch_all }
    }

    /// Substitute all recognized tokens, then sweep leftovers to `--`.
    pub fn render(&self, template: &str, ctx: &RenderContext) -> String {
        let name = if ctx.first_name.trim().is_empty() {
            NAME_FALLBACK.to_string()
        } else {
            ctx.first_name.trim().to_string()
        };

        let m = ctx.metrics;
        let a = ctx.activity;

        let substitutions: Vec<(&str, String)> = vec![
            ("{{firstName}}", name),
            ("{{glucose.latest}}", fmt_opt(m.glucose_latest, 0)),
            ("{{glucose.avg7d}}", fmt_opt(m.glucose_avg_7d, 0)),
            ("{{glucose.highDays}}", m.glucose_high_days.to_string()),
            ("{{bp.latest}}", fmt_bp(m)),
            ("{{bp.elevatedDays}}", m.bp_elevated_days.to_string()),
            ("{{weight.latest}}", fmt_opt(m.weight_latest, 1)),
            ("{{weight.change30d}}", fmt_signed(m.weight_change_30d)),
            ("{{waist.latest}}", fmt_opt(m.waist_latest, 1)),
            ("{{ketones.latest}}", fmt_opt(m.ketones_latest, 1)),
            ("{{streak}}", a.streak_days.to_string()),
            (
                "{{daysSinceLastLog}}",
                a.days_since_last_log
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| PLACEHOLDER.to_string()),
            ),
            ("{{adherence}}", a.adherence_score.to_string()),
            (
                "{{macros.proteinG}}",
                fmt_opt(ctx.macros.map(|t| t.protein_g), 0),
            ),
            (
                "{{macros.carbsG}}",
                fmt_opt(ctx.macros.map(|t| t.carbs_g), 0),
            ),
            (
                "{{macros.caloriesKcal}}",
                fmt_opt(ctx.macros.map(|t| t.calories_kcal), 0),
            ),
        ];

        let mut rendered = template.to_string();
        for (token, value) in &substitutions {
            rendered = rendered.replace(token, value);
        }

        // Unknown tokens are consumed, not left as literals
        self.catch_all
            .replace_all(&rendered, PLACEHOLDER)
            .into_owned()
    }
}

/// Fixed-precision formatting; absent or non-finite values render as `--`.
fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.*}", decimals, v),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Signed delta: positive values carry an explicit `+`.
fn fmt_signed(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:+.1}", v),
        _ => PLACEHOLDER.to_string(),
    }
}

fn fmt_bp(metrics: &MetricSummary) -> String {
    match metrics.bp_latest {
        Some(bp) if bp.systolic.is_finite() && bp.diastolic.is_finite() => {
            format!("{:.0}/{:.0}", bp.systolic, bp.diastolic)
        }
        _ => BP_PLACEHOLDER.to_string(),
    }
}
