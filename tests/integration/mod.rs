//! Integration tests for llm-fanout
//!
//! Every test runs the real client against a local `wiremock` gateway;
//! nothing leaves the machine.

pub mod executor_tests;
