//! Core type definition module
//!
//! Records produced by the executor and joined by the coordinator. All of
//! them are read-only once created.

pub mod chat;
pub mod cost;
pub mod model;
pub mod results;
pub(crate) mod serde_helpers;

pub use chat::{ChatResponse, CompletionParams};
pub use cost::CostAndStats;
pub use model::{Model, sort_by_name};
pub use results::{CorrelatedResults, ModelOutcome, RoundOutcome};
