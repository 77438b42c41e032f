//! Case directory operations
//!
//! Maps pipeline steps onto invocations and does the filesystem work between
//! runs (initial conditions, log archiving).

use crate::config::SweepConfig;
use crate::dictionary;
use crate::error::{IoResultExt, Result, SweepError};
use crate::pipeline::{log_name, Invocation, ToolRunner};
use crate::sweep::SweepValue;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One stage of the mesh/solve pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStep {
    /// Remove previous mesh and results
    Clean,
    /// Background mesh
    BlockMesh,
    /// Refined mesh, written over the background mesh
    SnappyHexMesh,
    /// Cell and face sets
    TopoSet,
    /// Fresh `0` directory from the pristine copy
    CopyInitialConditions,
    /// Split the case for MPI
    Decompose,
    /// Flow solver run
    Solve,
}

impl PipelineStep {
    /// Steps that rebuild the case from scratch
    pub fn setup(serial: bool) -> Vec<Self> {
        let mut steps = vec![
            Self::Clean,
            Self::BlockMesh,
            Self::SnappyHexMesh,
            Self::TopoSet,
            Self::CopyInitialConditions,
        ];
        if !serial {
            steps.push(Self::Decompose);
        }
        steps
    }
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Clean => "clean",
            Self::BlockMesh => "blockMesh",
            Self::SnappyHexMesh => "snappyHexMesh",
            Self::TopoSet => "topoSet",
            Self::CopyInitialConditions => "copy initial conditions",
            Self::Decompose => "decompose",
            Self::Solve => "solve",
        };
        f.write_str(name)
    }
}

/// An OpenFOAM case driven by a tool runner
pub struct Case<R> {
    config: SweepConfig,
    runner: R,
}

impl<R: ToolRunner> Case<R> {
    /// Wrap a case directory described by `config`
    pub fn new(config: SweepConfig, runner: R) -> Self {
        Self { config, runner }
    }

    /// Configuration in use
    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Case directory
    pub fn dir(&self) -> &Path {
        &self.config.case_dir
    }

    /// Number of MPI ranks from the decomposition dictionary
    pub fn subdomains(&self) -> Result<u32> {
        let path = self.config.case_path(&self.config.layout.decompose_par_dict);
        dictionary::read_number(&path, &self.config.keys.subdomains)
    }

    /// Invocation for a tool step; `None` for steps done in-process
    pub fn invocation(&self, step: PipelineStep) -> Result<Option<Invocation>> {
        let tools = &self.config.tools;
        let inv = match step {
            PipelineStep::Clean => return Ok(self.clean_invocation()),
            PipelineStep::BlockMesh => Invocation::new(&tools.block_mesh).logged(),
            PipelineStep::SnappyHexMesh => Invocation::new(&tools.snappy_hex_mesh)
                .arg("-overwrite")
                .logged(),
            PipelineStep::TopoSet => Invocation::new(&tools.topo_set).logged(),
            PipelineStep::CopyInitialConditions => return Ok(None),
            PipelineStep::Decompose => Invocation::new(&tools.decompose).arg("-force").logged(),
            PipelineStep::Solve if self.config.serial => Invocation::new(&tools.solver).logged(),
            PipelineStep::Solve => Invocation::new(&tools.mpi_launcher)
                .arg("-np")
                .arg(self.subdomains()?.to_string())
                .arg(&tools.solver)
                .arg("-parallel")
                .log_to(log_name(&tools.solver)),
        };
        Ok(Some(inv))
    }

    /// Human-readable description of a step, for plans
    pub fn describe(&self, step: PipelineStep) -> String {
        match step {
            PipelineStep::CopyInitialConditions => format!(
                "cp -r {} 0",
                self.config.layout.initial_conditions.display()
            ),
            PipelineStep::Solve if !self.config.serial && self.subdomains().is_err() => format!(
                "{} -np <N> {} -parallel > {}",
                self.config.tools.mpi_launcher,
                self.config.tools.solver,
                log_name(&self.config.tools.solver)
            ),
            _ => match self.invocation(step) {
                Ok(Some(inv)) => inv.command_line(),
                _ => step.to_string(),
            },
        }
    }

    /// Execute one pipeline step
    pub fn run_step(&self, step: PipelineStep) -> Result<()> {
        match step {
            PipelineStep::Clean => self.clean(),
            PipelineStep::CopyInitialConditions => self.copy_initial_conditions(),
            _ => match self.invocation(step)? {
                Some(inv) => self.runner.run(&inv, self.dir()),
                None => Ok(()),
            },
        }
    }

    /// Clean scripts given as a path live in the case and are launched by
    /// absolute path; bare names come from PATH
    fn clean_invocation(&self) -> Option<Invocation> {
        let clean = &self.config.tools.clean;
        if !clean.contains('/') {
            return Some(Invocation::new(clean).logged());
        }
        let script = std::fs::canonicalize(self.config.case_path(clean)).ok()?;
        Some(Invocation::new(script.to_string_lossy()).logged())
    }

    fn clean(&self) -> Result<()> {
        match self.clean_invocation() {
            Some(inv) => {
                tracing::info!("Cleaning case");
                self.runner.run(&inv, self.dir())
            }
            None => {
                tracing::warn!(
                    "No clean script '{}' in {:?}, reusing the existing case state",
                    self.config.tools.clean,
                    self.dir()
                );
                Ok(())
            }
        }
    }

    /// Replace `0` with a copy of the pristine initial conditions
    pub fn copy_initial_conditions(&self) -> Result<()> {
        let source = self.config.case_path(&self.config.layout.initial_conditions);
        let target = self.config.case_path("0");

        if !source.is_dir() {
            return Err(SweepError::NotFound(source));
        }
        if target.exists() {
            std::fs::remove_dir_all(&target).with_path(&target)?;
        }
        copy_dir_recursive(&source, &target)?;
        tracing::info!("Copied {:?} to {:?}", source, target);
        Ok(())
    }

    /// Rename the solver log so the next run does not overwrite it
    pub fn archive_solver_log(&self, value: &SweepValue) -> Result<PathBuf> {
        let log = self.config.case_path(log_name(&self.config.tools.solver));
        let archived = self
            .config
            .case_path(format!("{}.{}", log_name(&self.config.tools.solver), value));

        std::fs::rename(&log, &archived).with_path(&log)?;
        tracing::debug!("Archived solver log as {:?}", archived);
        Ok(archived)
    }
}

fn copy_dir_recursive(source: &Path, target: &Path) -> Result<()> {
    for entry in WalkDir::new(source) {
        let entry = entry.map_err(std::io::Error::from).with_path(source)?;
        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        let to = target.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&to).with_path(&to)?;
        } else {
            std::fs::copy(entry.path(), &to).with_path(entry.path())?;
        }
    }

    Ok(())
}
