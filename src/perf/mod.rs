//! Performance module
//!
//! Reduces the turbine time series written by the solver to mean
//! coefficients and keeps the per-parameter CSV result logs.

mod results;
mod turbine;

pub use results::*;
pub use turbine::*;
