//! Error handling
//!
//! Executor failures carry the identity of the model or request they
//! belong to, so they can be reported per key after a fan-out round.

mod types;

pub use types::{CallError, Error, Result};
