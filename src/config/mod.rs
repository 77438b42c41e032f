//! Configuration module for FoamSweep
//!
//! Provides configuration management including CLI arguments,
//! TOML case files, and runtime settings.

mod settings;

pub use settings::*;
