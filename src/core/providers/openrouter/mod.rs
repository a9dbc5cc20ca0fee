//! OpenRouter gateway
//!
//! One client covers the three endpoints a comparison touches:
//! `GET /models`, `POST /chat/completions` and `GET /generation`.

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod transformer;

pub use client::OpenRouterClient;
pub use config::{DEFAULT_BASE_URL, DEFAULT_REFERER, OpenRouterConfig};
pub use error::OpenRouterErrorMapper;
