//! Progress reporting module
//!
//! Shows which value and pipeline step a sweep is on, and how many runs are
//! left.

mod reporter;

pub use reporter::*;
