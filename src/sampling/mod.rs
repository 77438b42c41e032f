//! Sampling dictionary module
//!
//! Generates the dictionaries that sample wake profiles behind the turbine.

mod profiles;

pub use profiles::*;
