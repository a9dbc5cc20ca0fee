//! Gateway implementations of the backend traits

pub mod openrouter;

pub use openrouter::{OpenRouterClient, OpenRouterConfig};
