//! # llm-fanout
//!
//! Sends one prompt to several LLMs through an OpenRouter-compatible gateway
//! at the same time, then looks up the cost and token counts of every answer
//! and joins both rounds per model.
//!
//! ## Features
//!
//! - **Concurrent fan-out**: one tokio task per model, results keyed by model
//!   whatever order they finish in
//! - **Failure policy**: fail-soft (default) keeps partial results, fail-fast
//!   returns the first error
//! - **Cost correlation**: the gateway request id links each answer to its
//!   telemetry
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use llm_fanout::{
//!     Comparison, ComparisonRequest, CompletionParams, Config, ModelCatalog, OpenRouterClient,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let client = Arc::new(OpenRouterClient::from_config(&config)?);
//!
//!     let catalog = client.fetch_models().await?;
//!     let request = ComparisonRequest::from_catalog(
//!         &catalog,
//!         &["openai/gpt-4o", "anthropic/claude-3.5-sonnet"],
//!         CompletionParams::new("You are a helpful assistant.", "What is a monad?"),
//!     )?;
//!
//!     let results = Comparison::new(client).run(&request).await?;
//!     for outcome in results.outcomes() {
//!         println!("{}: completed = {}", outcome.model, outcome.completion.is_success());
//!     }
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod utils;

// Re-export main types
pub use config::{Config, CredentialProvider, CredentialsConfig, EnvCredentials, StaticCredentials};
pub use utils::error::{CallError, Error, Result};

pub use core::batch::{Dispatched, FailurePolicy, FanOutConfig, FanOutCoordinator};
pub use core::compare::{Comparison, ComparisonRequest};
pub use core::providers::openrouter::{OpenRouterClient, OpenRouterConfig};
pub use core::traits::{ChatBackend, ModelCatalog};
pub use core::types::{
    ChatResponse, CompletionParams, CorrelatedResults, CostAndStats, Model, ModelOutcome,
    RoundOutcome, sort_by_name,
};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Version line for `--version` in long form
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (git ",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_TIME"),
    ")"
);

/// Build information, stamped by `build.rs`
#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: &'static str,
    /// Seconds since the Unix epoch
    pub build_time: &'static str,
    pub git_hash: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
        }
    }
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (git {}, built {})", self.version, self.git_hash, self.build_time)
    }
}

pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
