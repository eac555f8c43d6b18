//! regwatch configuration library
//!
//! This module exports the configuration resolver and its error types for
//! the binary and for integration tests.

pub mod cli;
pub mod config;
pub mod error;
