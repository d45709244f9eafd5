//! Configuration module for sweeps
//!
//! This module provides the `SweepConfig` struct and its type-safe builder
//! with validation and defaults.

pub mod builder;
pub mod getters;
pub mod types;

pub use builder::{SweepConfigBuilder, WithIdRange, WithOutputPath};
pub use types::SweepConfig;
