//! # FoamSweep - Parameter Sweeps for OpenFOAM Turbine Cases
//!
//! FoamSweep runs an actuator-line turbine case once per value of a single
//! parameter, edits the case dictionaries before every run, drives the
//! external mesh/solve toolchain, and logs the mean power and drag
//! coefficients of each run to a CSV file.
//!
//! ## Features
//!
//! - **Four sweepable parameters**: tip speed ratio, mesh resolution,
//!   time step and the dynamic stall time constant
//! - **Layout-preserving dictionary edits**: only the value changes
//! - **Minimal re-meshing**: full setup on the first run, solver-only after,
//!   unless the parameter changes the mesh
//! - **Serial or MPI** solver runs
//! - **Checked subprocesses**: a failing tool stops the sweep and the case
//!   defaults are restored
//! - **Append-only result logs**, one per parameter
//!
//! ## Quick Start
//!
//! ```no_run
//! use foamsweep::config::{Parameter, SweepConfig};
//! use foamsweep::pipeline::ProcessRunner;
//! use foamsweep::sweep::{SweepPlan, SweepRange, SweepRunner};
//!
//! let config = SweepConfig::default();
//! let range = SweepRange::new(0.5, 5.0, 0.5).unwrap();
//! let plan = SweepPlan::new(Parameter::TipSpeedRatio, &range, config.serial).unwrap();
//!
//! let runner = SweepRunner::new(config, ProcessRunner::new());
//! let summary = runner.execute(&plan).unwrap();
//! summary.print_summary();
//! ```
//!
//! ## Editing Dictionaries
//!
//! ```no_run
//! use foamsweep::dictionary::{read_number, replace_value};
//! use std::path::Path;
//!
//! let control = Path::new("system/controlDict");
//! replace_value(control, "deltaT", 0.005).unwrap();
//! let dt: f64 = read_number(control, "deltaT").unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod dictionary;
pub mod error;
pub mod perf;
pub mod pipeline;
pub mod progress;
pub mod sampling;
pub mod sweep;

// Re-export commonly used types
pub use config::{Parameter, SweepConfig};
pub use error::{Result, SweepError};
pub use progress::ProgressReporter;
pub use sweep::{SweepPlan, SweepRange, SweepRunner, SweepSummary};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use foamsweep::prelude::*;
    //! ```

    pub use crate::config::{Parameter, SweepConfig};
    pub use crate::dictionary::{read_number, read_value, replace_value};
    pub use crate::error::{Result, SweepError};
    pub use crate::perf::{Performance, ResultLog, ResultRecord};
    pub use crate::pipeline::{Case, Invocation, PipelineStep, ProcessRunner, ToolRunner};
    pub use crate::progress::ProgressReporter;
    pub use crate::sampling::ProfileSpec;
    pub use crate::sweep::{SweepPlan, SweepRange, SweepRunner, SweepSummary, SweepValue};
}
