//! CLI utilities for dialogcast.
//!
//! This crate provides configuration profiles and output helpers shared by
//! the `dialogcast` command.

pub mod config;
pub mod output;

pub use config::{Config, ConfigError, Profile};
pub use output::{Output, OutputFormat, print_verbose};
