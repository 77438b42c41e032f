//! Sweep plans
//!
//! The first run of a sweep always rebuilds the case. Later runs only call
//! the solver, unless the parameter changes the mesh, in which case every run
//! starts from scratch.

use crate::config::Parameter;
use crate::error::Result;
use crate::pipeline::{Case, PipelineStep, ToolRunner};
use crate::sweep::{SweepRange, SweepValue};
use serde::Serialize;
use std::fmt::Write as _;

/// One solver run of a sweep
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Iteration {
    /// Position in execution order
    pub index: usize,
    /// Parameter value for this run
    pub value: SweepValue,
    /// Pipeline steps after the dictionary edit
    pub steps: Vec<PipelineStep>,
}

impl Iteration {
    /// Whether this run rebuilds the mesh
    pub fn is_full_setup(&self) -> bool {
        self.steps.contains(&PipelineStep::BlockMesh)
    }
}

/// Ordered list of runs for one parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepPlan {
    /// Swept parameter
    pub parameter: Parameter,
    /// Runs in execution order
    pub iterations: Vec<Iteration>,
}

impl SweepPlan {
    /// Build the plan for a parameter and range
    pub fn new(parameter: Parameter, range: &SweepRange, serial: bool) -> Result<Self> {
        let iterations = range
            .values(parameter.kind())?
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                let mut steps = Vec::new();
                if index == 0 || parameter.requires_remesh() {
                    steps.extend(PipelineStep::setup(serial));
                }
                steps.push(PipelineStep::Solve);
                Iteration { index, value, steps }
            })
            .collect();

        Ok(Self {
            parameter,
            iterations,
        })
    }

    /// Number of runs
    pub fn len(&self) -> usize {
        self.iterations.len()
    }

    /// True when there is nothing to run
    pub fn is_empty(&self) -> bool {
        self.iterations.is_empty()
    }

    /// Values in execution order
    pub fn values(&self) -> Vec<SweepValue> {
        self.iterations.iter().map(|it| it.value).collect()
    }

    /// Commands each run would execute, as shown by a dry run
    pub fn render<R: ToolRunner>(&self, case: &Case<R>) -> String {
        let config = case.config();
        let (dict, key) = config.target(self.parameter);
        let mut txt = String::new();

        let _ = writeln!(txt, "=== Sweep Plan ===");
        let _ = writeln!(txt, "Parameter:  {} ({} in {})", self.parameter.name(), key, dict.display());
        let _ = writeln!(txt, "Case:       {}", case.dir().display());
        let _ = writeln!(txt, "Runs:       {}", self.len());
        let _ = writeln!(txt, "Result log: {}\n", config.log_path(self.parameter).display());

        for it in &self.iterations {
            let _ = writeln!(txt, "[{}] {} = {}", it.index + 1, self.parameter.name(), it.value);
            for step in &it.steps {
                let _ = writeln!(txt, "    {}", case.describe(*step));
            }
        }
        txt
    }

    /// Print the commands each run would execute
    pub fn print<R: ToolRunner>(&self, case: &Case<R>) {
        println!("{}", self.render(case));
    }
}
