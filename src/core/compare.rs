//! Two-round model comparison
//!
//! Round one sends the same prompt to every selected model. Round two looks
//! up the cost and token counts of each successful completion by its
//! request id. Both rounds go through the same `FanOutCoordinator`, so the
//! failure policy applies to them alike.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::info;

use crate::core::batch::{Dispatched, FanOutCoordinator};
use crate::core::traits::ChatBackend;
use crate::core::types::{ChatResponse, CompletionParams, CorrelatedResults, CostAndStats, Model};
use crate::utils::error::{Error, Result};

/// Models plus the prompt they all receive
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRequest {
    pub models: Vec<Model>,
    pub params: CompletionParams,
}

impl ComparisonRequest {
    pub fn new(models: Vec<Model>, params: CompletionParams) -> Self {
        Self { models, params }
    }

    /// Select models from a fetched catalog by id, keeping the given order.
    ///
    /// Unknown ids fail with `Error::InvalidRequest` listing all of them.
    pub fn from_catalog<S: AsRef<str>>(
        catalog: &[Model],
        ids: &[S],
        params: CompletionParams,
    ) -> Result<Self> {
        let by_id: HashMap<&str, &Model> = catalog.iter().map(|m| (m.id.as_str(), m)).collect();

        let mut seen = HashSet::new();
        let mut models = Vec::with_capacity(ids.len());
        let mut unknown = Vec::new();

        for id in ids {
            let id = id.as_ref();
            match by_id.get(id) {
                Some(model) => {
                    if seen.insert(id) {
                        models.push((*model).clone());
                    }
                }
                None => unknown.push(id),
            }
        }

        if !unknown.is_empty() {
            return Err(Error::invalid_request(format!(
                "Unknown model id(s): {}",
                unknown.join(", ")
            )));
        }

        Ok(Self::new(models, params))
    }

    pub fn validate(&self) -> Result<()> {
        if self.models.is_empty() {
            return Err(Error::invalid_request("Select at least one model"));
        }

        if self.params.user_input.trim().is_empty() {
            return Err(Error::invalid_request("User input must not be empty"));
        }

        if !(0.0..=2.0).contains(&self.params.temperature) {
            return Err(Error::invalid_request(format!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.params.temperature
            )));
        }

        if self.params.max_tokens == Some(0) {
            return Err(Error::invalid_request("Max tokens must be at least 1"));
        }

        Ok(())
    }
}

/// Runs comparisons against one backend
#[derive(Debug, Clone)]
pub struct Comparison {
    backend: Arc<dyn ChatBackend>,
    coordinator: FanOutCoordinator,
}

impl Comparison {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend,
            coordinator: FanOutCoordinator::default(),
        }
    }

    pub fn with_coordinator(mut self, coordinator: FanOutCoordinator) -> Self {
        self.coordinator = coordinator;
        self
    }

    pub fn coordinator(&self) -> &FanOutCoordinator {
        &self.coordinator
    }

    /// First round: one completion per model
    pub async fn complete_all(
        &self,
        models: &[Model],
        params: &CompletionParams,
    ) -> Result<Dispatched<Model, ChatResponse>> {
        let backend = Arc::clone(&self.backend);
        let params = Arc::new(params.clone());

        self.coordinator
            .dispatch_all(models.iter().cloned(), move |model| {
                let backend = Arc::clone(&backend);
                let params = Arc::clone(&params);
                async move { backend.complete(&model, &params).await }
            })
            .await
    }

    /// Second round: telemetry for every completion, keyed by the model
    /// that produced it
    pub async fn cost_and_stats_all(
        &self,
        responses: &HashMap<Model, ChatResponse>,
    ) -> Result<Dispatched<Model, CostAndStats>> {
        let backend = Arc::clone(&self.backend);
        let request_ids: Arc<HashMap<Model, String>> = Arc::new(
            responses
                .iter()
                .map(|(model, response)| (model.clone(), response.id.clone()))
                .collect(),
        );
        let models: Vec<Model> = request_ids.keys().cloned().collect();

        self.coordinator
            .dispatch_all(models, move |model| {
                let backend = Arc::clone(&backend);
                let request_ids = Arc::clone(&request_ids);
                async move {
                    let request_id = request_ids.get(&model).ok_or_else(|| {
                        Error::Internal(format!("No request id recorded for '{}'", model.id))
                    })?;

                    let stats = backend.fetch_cost_and_stats(request_id).await?;
                    if stats.id != *request_id {
                        return Err(Error::Internal(format!(
                            "Stats for request '{}' came back as '{}'",
                            request_id, stats.id
                        )));
                    }
                    Ok(stats)
                }
            })
            .await
    }

    /// Both rounds, joined per model.
    ///
    /// Models whose completion failed get no telemetry lookup.
    pub async fn run(&self, request: &ComparisonRequest) -> Result<CorrelatedResults> {
        request.validate()?;

        info!(
            models = request.models.len(),
            policy = %self.coordinator.failure_policy(),
            "Starting comparison"
        );

        let completions = self.complete_all(&request.models, &request.params).await?;
        let stats = self.cost_and_stats_all(&completions.succeeded).await?;

        info!(
            completed = completions.succeeded.len(),
            completion_failures = completions.failed.len(),
            with_stats = stats.succeeded.len(),
            stats_failures = stats.failed.len(),
            elapsed_ms = (completions.elapsed + stats.elapsed).as_millis() as u64,
            "Comparison finished"
        );

        Ok(CorrelatedResults {
            responses: completions.succeeded,
            cost_and_stats: stats.succeeded,
            completion_failures: completions.failed,
            stats_failures: stats.failed,
        })
    }
}
