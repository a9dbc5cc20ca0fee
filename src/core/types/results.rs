//! Correlated results of a two-round comparison

use super::{ChatResponse, CostAndStats, Model};
use crate::utils::error::Error;
use serde_json::{Map, Value, json};
use std::collections::HashMap;

/// Outcome of one round for one model
#[derive(Debug)]
pub enum RoundOutcome<'a, T> {
    Succeeded(&'a T),
    Failed(&'a Error),
    /// The round never ran for this model, e.g. no stats lookup after a
    /// failed completion
    NotAttempted,
}

impl<T> RoundOutcome<'_, T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }
}

/// Both rounds as seen from one model
#[derive(Debug)]
pub struct ModelOutcome<'a> {
    pub model: &'a Model,
    pub completion: RoundOutcome<'a, ChatResponse>,
    pub cost_and_stats: RoundOutcome<'a, CostAndStats>,
}

/// Completion and telemetry results joined on the originating model.
///
/// A model that completed but whose telemetry lookup failed is present in
/// `responses` and in `stats_failures`, never in `cost_and_stats`.
#[derive(Debug, Default)]
pub struct CorrelatedResults {
    pub responses: HashMap<Model, ChatResponse>,
    pub cost_and_stats: HashMap<Model, CostAndStats>,
    pub completion_failures: HashMap<Model, Error>,
    pub stats_failures: HashMap<Model, Error>,
}

impl CorrelatedResults {
    /// Every model that took part, sorted by display name
    pub fn models(&self) -> Vec<&Model> {
        let mut models: Vec<&Model> = self
            .responses
            .keys()
            .chain(self.completion_failures.keys())
            .collect();
        models.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        models.dedup_by(|a, b| a.id == b.id);
        models
    }

    pub fn outcome<'a>(&'a self, model: &Model) -> Option<ModelOutcome<'a>> {
        let (model, completion) = if let Some((key, response)) = self.responses.get_key_value(model)
        {
            (key, RoundOutcome::Succeeded(response))
        } else if let Some((key, error)) = self.completion_failures.get_key_value(model) {
            (key, RoundOutcome::Failed(error))
        } else {
            return None;
        };

        let cost_and_stats = if let Some(stats) = self.cost_and_stats.get(model) {
            RoundOutcome::Succeeded(stats)
        } else if let Some(error) = self.stats_failures.get(model) {
            RoundOutcome::Failed(error)
        } else {
            RoundOutcome::NotAttempted
        };

        Some(ModelOutcome {
            model,
            completion,
            cost_and_stats,
        })
    }

    /// Per-model outcomes in display order
    pub fn outcomes(&self) -> Vec<ModelOutcome<'_>> {
        self.models()
            .into_iter()
            .filter_map(|model| self.outcome(model))
            .collect()
    }

    /// True when every model completed and every completion has telemetry
    pub fn is_complete(&self) -> bool {
        self.completion_failures.is_empty()
            && self.stats_failures.is_empty()
            && self.responses.len() == self.cost_and_stats.len()
            && self
                .responses
                .keys()
                .all(|model| self.cost_and_stats.contains_key(model))
    }

    /// Sum of the reported costs, in USD
    pub fn total_cost(&self) -> f64 {
        self.cost_and_stats.values().map(|stats| stats.cost).sum()
    }

    /// Export document keyed by model name.
    ///
    /// Two models sharing a display name are disambiguated with their id.
    pub fn to_export_json(&self) -> Result<Value, Error> {
        let mut document = Map::new();

        for outcome in self.outcomes() {
            let mut key = outcome.model.name.clone();
            if document.contains_key(&key) {
                key = outcome.model.to_string();
            }

            let response = match outcome.completion {
                RoundOutcome::Succeeded(response) => serde_json::to_value(response)?,
                RoundOutcome::Failed(error) => export_error(error),
                RoundOutcome::NotAttempted => Value::Null,
            };
            let cost_and_stats = match outcome.cost_and_stats {
                RoundOutcome::Succeeded(stats) => serde_json::to_value(stats)?,
                RoundOutcome::Failed(error) => export_error(error),
                RoundOutcome::NotAttempted => Value::Null,
            };

            document.insert(
                key,
                json!({
                    "model_id": outcome.model.id,
                    "response": response,
                    "cost_and_stats": cost_and_stats,
                }),
            );
        }

        Ok(Value::Object(document))
    }
}

fn export_error(error: &Error) -> Value {
    json!({
        "error": {
            "type": error.error_type(),
            "message": error.to_string(),
        }
    })
}
