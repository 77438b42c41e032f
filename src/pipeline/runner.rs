//! Tool invocation
//!
//! Every pipeline step boils down to an [`Invocation`]: a program, its
//! arguments, and the `log.<tool>` file that receives its output. The
//! [`ToolRunner`] trait is the seam between the sweep logic and the real
//! executables.

use crate::error::{IoResultExt, Result, SweepError};
use std::fs::File;
use std::path::Path;
use std::process::{Command, Stdio};

/// A single external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program name or path
    pub program: String,
    /// Arguments
    pub args: Vec<String>,
    /// Log file name (relative to the case) receiving stdout and stderr
    pub log: Option<String>,
}

impl Invocation {
    /// Create an invocation without arguments or log
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            log: None,
        }
    }

    /// Append an argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Send output to `log.<tool>`
    pub fn logged(self) -> Self {
        let name = log_name(&self.program);
        self.log_to(name)
    }

    /// Send output to a specific log file
    pub fn log_to(mut self, log: impl Into<String>) -> Self {
        self.log = Some(log.into());
        self
    }

    /// Program name without directories
    pub fn tool_name(&self) -> &str {
        tool_name(&self.program)
    }

    /// Shell-like rendering for plans and messages
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        if let Some(log) = &self.log {
            line.push_str(" > ");
            line.push_str(log);
        }
        line
    }
}

/// Program name without directories
pub fn tool_name(program: &str) -> &str {
    Path::new(program)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(program)
}

/// Conventional log file name for a program
pub fn log_name(program: &str) -> String {
    format!("log.{}", tool_name(program))
}

/// Executes invocations inside a case directory
pub trait ToolRunner {
    /// Run to completion; a non-zero exit is an error
    fn run(&self, invocation: &Invocation, case_dir: &Path) -> Result<()>;
}

impl<T: ToolRunner + ?Sized> ToolRunner for &T {
    fn run(&self, invocation: &Invocation, case_dir: &Path) -> Result<()> {
        (**self).run(invocation, case_dir)
    }
}

/// Runs real subprocesses
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    /// Create a process runner
    pub fn new() -> Self {
        Self
    }
}

impl ToolRunner for ProcessRunner {
    fn run(&self, invocation: &Invocation, case_dir: &Path) -> Result<()> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .current_dir(case_dir)
            .stdin(Stdio::null());

        match &invocation.log {
            Some(log) => {
                let log_path = case_dir.join(log);
                let stdout = File::create(&log_path).with_path(&log_path)?;
                let stderr = stdout.try_clone().with_path(&log_path)?;
                cmd.stdout(stdout).stderr(stderr);
            }
            None => {
                cmd.stdout(Stdio::null()).stderr(Stdio::piped());
            }
        }

        tracing::info!("Running {}", invocation.command_line());

        let output = cmd.output().map_err(|e| SweepError::ToolLaunch {
            tool: invocation.tool_name().to_string(),
            source: e,
        })?;

        if !output.status.success() {
            let log = match &invocation.log {
                Some(log) => case_dir.join(log).display().to_string(),
                None => {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    format!("stderr: {}", stderr.trim())
                }
            };
            return Err(SweepError::ToolFailed {
                tool: invocation.tool_name().to_string(),
                status: output.status.to_string(),
                log,
            });
        }

        Ok(())
    }
}
