//! Concurrent fan-out/fan-in
//!
//! One coordinator implementation serves both the completion round and the
//! cost/stats round; only the operation and the key/value types differ.

mod fan_out;


pub use fan_out::{Dispatched, FailurePolicy, FanOutConfig, FanOutCoordinator};
