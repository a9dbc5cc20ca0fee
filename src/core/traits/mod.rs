//! Backend trait definitions
//!
//! The coordinator only ever talks to these traits, so any gateway (or an
//! in-memory fake) can sit behind a comparison.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::core::types::{ChatResponse, CompletionParams, CostAndStats, Model};
use crate::utils::error::Result;

/// Source of the model directory
#[async_trait]
pub trait ModelCatalog: Send + Sync + Debug {
    /// Fetch the current directory.
    ///
    /// Fails with `Error::CatalogUnavailable` on network or parse failure.
    async fn fetch_models(&self) -> Result<Vec<Model>>;
}

/// Single-request executor.
///
/// Each call is an isolated unit of work: implementations must not share
/// mutable state between invocations, since the coordinator runs many of
/// them at once.
#[async_trait]
pub trait ChatBackend: Send + Sync + Debug {
    /// One completion for one model.
    ///
    /// Fails with `Error::RequestFailed` naming the model.
    async fn complete(&self, model: &Model, params: &CompletionParams) -> Result<ChatResponse>;

    /// Telemetry for a previously completed request.
    ///
    /// Fails with `Error::StatsUnavailable` naming the request.
    async fn fetch_cost_and_stats(&self, request_id: &str) -> Result<CostAndStats>;
}
