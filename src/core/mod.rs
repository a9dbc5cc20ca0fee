//! Core functionality
//!
//! Records, backend traits, the fan-out coordinator and the comparison
//! built on top of it.

pub mod batch;
pub mod compare;
pub mod providers;
pub mod traits;
pub mod types;

pub use compare::{Comparison, ComparisonRequest};
