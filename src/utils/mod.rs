//! Utility modules
//!
//! - **error**: error taxonomy shared by every layer
//! - **logging**: subscriber setup and duration formatting

pub mod error;
pub mod logging;

pub use error::{CallError, Error, Result};
pub use logging::{LogLevel, LoggingUtils};
