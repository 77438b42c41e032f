//! Sweep module
//!
//! Turns a parameter and a numeric range into an ordered plan of solver runs
//! and executes it against a case, logging one result row per value.

mod plan;
mod range;
mod runner;

pub use plan::*;
pub use range::*;
pub use runner::*;
