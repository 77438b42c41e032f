//! External pipeline module
//!
//! Runs the mesh/solve toolchain as blocking subprocesses inside a case
//! directory and performs the file shuffling between runs.

mod case;
mod runner;

pub use case::*;
pub use runner::*;
