//! Sweep execution
//!
//! For each value: edit the dictionary, run the planned pipeline steps,
//! archive the solver log, reduce the turbine output and append a row to the
//! result log. Whatever happens, the dictionary entries touched by the sweep
//! are put back to the values they had before it started.

use crate::config::{Parameter, SweepConfig};
use crate::dictionary;
use crate::error::{Result, SweepError};
use crate::perf::{Performance, ResultLog, ResultRecord};
use crate::pipeline::{Case, ToolRunner};
use crate::progress::ProgressReporter;
use crate::sweep::{Iteration, SweepPlan, SweepValue};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// A dictionary entry as it was before the sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedEntry {
    /// Dictionary file
    pub path: PathBuf,
    /// Key
    pub key: String,
    /// Raw value text
    pub value: String,
}

impl SavedEntry {
    /// Record the current value of `key`
    pub fn capture(path: &Path, key: &str) -> Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            key: key.to_string(),
            value: dictionary::read_value(path, key)?,
        })
    }

    /// Write the recorded value back
    pub fn restore(&self) -> Result<()> {
        dictionary::replace_value(&self.path, &self.key, &self.value).map(|_| ())
    }

    fn parse_i64(&self) -> Result<i64> {
        self.value.parse().map_err(|_| SweepError::InvalidValue {
            path: self.path.clone(),
            key: self.key.clone(),
            value: self.value.clone(),
        })
    }
}

/// Outcome of a single run
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    /// Parameter value
    pub value: SweepValue,
    /// Logged row
    #[serde(flatten)]
    pub record: ResultRecord,
    /// Samples averaged for the coefficients
    pub samples: usize,
    /// Archived solver log
    pub solver_log: PathBuf,
}

/// Result of a complete sweep
#[derive(Debug, Clone, Serialize)]
pub struct SweepSummary {
    /// Swept parameter
    pub parameter: Parameter,
    /// Result log the rows were appended to
    pub log_path: PathBuf,
    /// Wall-clock start
    pub started_at: DateTime<Local>,
    /// Total duration
    #[serde(skip)]
    pub duration: Duration,
    /// Total duration in seconds
    pub duration_secs: f64,
    /// Mean wall time of one run in seconds
    pub per_run_secs: Option<f64>,
    /// Value the parameter was restored to
    pub restored: String,
    /// Per-run results in execution order
    pub runs: Vec<RunResult>,
}

impl SweepSummary {
    /// Print summary to console
    pub fn print_summary(&self) {
        let whole_secs = Duration::from_secs(self.duration.as_secs());

        println!("\n=== Sweep Summary ===");
        println!("Parameter:   {}", self.parameter.name());
        println!("Runs:        {}", self.runs.len());
        println!("Started:     {}", self.started_at.format("%Y-%m-%d %H:%M:%S"));
        println!("Duration:    {}", humantime::format_duration(whole_secs));
        if let Some(per_run) = self.per_run_secs {
            let per_run = Duration::from_secs(per_run.round() as u64);
            println!("Per run:     {}", humantime::format_duration(per_run));
        }
        println!("Result log:  {}", self.log_path.display());
        println!("Restored:    {} = {}", self.parameter.name(), self.restored);

        if !self.runs.is_empty() {
            println!("\n{:>10}  {:>10}  {:>10}  {:>10}", self.parameter.name(), "tsr", "cp", "cd");
            for run in &self.runs {
                println!(
                    "{:>10}  {:>10.4}  {:>10.4}  {:>10.4}",
                    run.value.to_string(),
                    run.record.tsr,
                    run.record.cp,
                    run.record.cd
                );
            }
        }
    }
}

/// Parameter state captured before the first run
struct Prepared {
    saved: Vec<SavedEntry>,
    /// Background mesh (nx, ny, nz) when ny and nz follow nx
    mesh_baseline: Option<[i64; 3]>,
}

/// Executes sweep plans against a case
pub struct SweepRunner<R> {
    case: Case<R>,
    progress: ProgressReporter,
}

impl<R: ToolRunner> SweepRunner<R> {
    /// Create a runner for the case described by `config`
    pub fn new(config: SweepConfig, runner: R) -> Self {
        Self {
            case: Case::new(config, runner),
            progress: ProgressReporter::disabled(),
        }
    }

    /// Set progress reporter
    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    fn config(&self) -> &SweepConfig {
        self.case.config()
    }

    /// Run every iteration of `plan`, then restore the parameter defaults
    pub fn execute(&self, plan: &SweepPlan) -> Result<SweepSummary> {
        let started_at = Local::now();
        let start = Instant::now();
        let parameter = plan.parameter;

        let log = ResultLog::open(
            self.config().log_path(parameter),
            parameter,
            self.config().append,
        )?;
        if self.config().append {
            tracing::info!(
                "Appending to {:?} ({} existing rows)",
                log.path(),
                log.row_count()?
            );
        }
        let prepared = self.prepare(parameter)?;

        tracing::info!(
            "Sweeping {} over {} values, logging to {:?}",
            parameter.name(),
            plan.len(),
            log.path()
        );
        self.progress.set_total_runs(plan.len() as u64);

        let outcome = self.run_all(plan, &log, &prepared);
        let restored = self.restore(&prepared.saved);

        match (outcome, restored) {
            (Ok(runs), Ok(())) => {
                self.progress.finish_success(&format!(
                    "{} runs of {} complete",
                    runs.len(),
                    parameter.name()
                ));
                let duration = start.elapsed();
                Ok(SweepSummary {
                    parameter,
                    log_path: log.path().to_path_buf(),
                    started_at,
                    duration,
                    duration_secs: duration.as_secs_f64(),
                    per_run_secs: self
                        .progress
                        .summary()
                        .time_per_run()
                        .map(|d| d.as_secs_f64()),
                    restored: prepared.saved[0].value.clone(),
                    runs,
                })
            }
            (Err(e), restored) => {
                if let Err(restore_err) = restored {
                    tracing::error!("Could not restore defaults: {}", restore_err);
                }
                let progress = self.progress.summary();
                self.progress.finish_error(&format!(
                    "stopped after {}/{} runs ({:.0}%): {}",
                    progress.runs_done,
                    progress.total_runs,
                    progress.percentage(),
                    e
                ));
                Err(e)
            }
            (Ok(_), Err(e)) => {
                self.progress.finish_error(&e.to_string());
                Err(e.with_context("restoring defaults"))
            }
        }
    }

    /// Capture defaults, zero TSR fluctuations and check the case can be logged
    fn prepare(&self, parameter: Parameter) -> Result<Prepared> {
        let config = self.config();
        let (path, key) = config.target(parameter);
        let mut saved = vec![SavedEntry::capture(&path, key)?];
        let mut mesh_baseline = None;

        match parameter {
            Parameter::TipSpeedRatio => {
                let fv_options = config.case_path(&config.layout.fv_options);
                let amplitude_key = config.keys.tsr_amplitude.as_str();
                match SavedEntry::capture(&fv_options, amplitude_key) {
                    Ok(entry) => {
                        dictionary::replace_value(&fv_options, amplitude_key, "0.0")?;
                        saved.push(entry);
                    }
                    Err(SweepError::KeyNotFound { .. }) => {
                        tracing::warn!("No {} entry, TSR fluctuations left as they are", amplitude_key);
                    }
                    Err(e) => return Err(e),
                }
            }
            Parameter::MeshResolution if config.scale_transverse => {
                let ny = SavedEntry::capture(&path, &config.keys.ny)?;
                let nz = SavedEntry::capture(&path, &config.keys.nz)?;
                let nx0 = saved[0].parse_i64()?;
                if nx0 <= 0 {
                    return Err(SweepError::InvalidValue {
                        path: path.clone(),
                        key: key.to_string(),
                        value: saved[0].value.clone(),
                    });
                }
                mesh_baseline = Some([nx0, ny.parse_i64()?, nz.parse_i64()?]);
                saved.push(ny);
                saved.push(nz);
            }
            _ => {}
        }

        let prepared = Prepared {
            saved,
            mesh_baseline,
        };

        // Every row needs these; fail now rather than after the first solve
        if let Err(e) = self.case_state() {
            if let Err(restore_err) = self.restore(&prepared.saved) {
                tracing::error!("Could not restore defaults: {}", restore_err);
            }
            return Err(e);
        }

        Ok(prepared)
    }

    fn run_all(
        &self,
        plan: &SweepPlan,
        log: &ResultLog,
        prepared: &Prepared,
    ) -> Result<Vec<RunResult>> {
        let mut runs = Vec::with_capacity(plan.len());
        for it in &plan.iterations {
            let run = self
                .run_iteration(plan.parameter, it, log, prepared)
                .map_err(|e| e.with_context(format!("{} = {}", plan.parameter.name(), it.value)))?;
            runs.push(run);
            self.progress.increment_runs(1);
        }
        Ok(runs)
    }

    fn run_iteration(
        &self,
        parameter: Parameter,
        it: &Iteration,
        log: &ResultLog,
        prepared: &Prepared,
    ) -> Result<RunResult> {
        let name = parameter.name();
        self.progress
            .println(format!("[{}] {} = {}", it.index + 1, name, it.value));

        self.apply_value(parameter, &it.value, prepared.mesh_baseline)?;

        for step in &it.steps {
            self.progress
                .set_status(format!("{} = {}: {}", name, it.value, step));
            self.case.run_step(*step)?;
        }

        let solver_log = self.case.archive_solver_log(&it.value)?;

        let config = self.config();
        let perf = Performance::from_file(&config.case_path(&config.layout.turbine_output), config.t1)?;
        let (mesh, dt) = self.case_state()?;
        let talpha = (parameter == Parameter::StallCoefficient).then(|| it.value.as_f64());
        let record = ResultRecord::new(mesh, dt, talpha, &perf);

        log.append(&record)?;
        tracing::info!(
            "{} = {}: tsr = {:.3}, cp = {:.4}, cd = {:.4}",
            name,
            it.value,
            record.tsr,
            record.cp,
            record.cd
        );

        Ok(RunResult {
            value: it.value,
            record,
            samples: perf.samples,
            solver_log,
        })
    }

    /// Write a sweep value (and the scaled transverse resolution) to the case
    fn apply_value(
        &self,
        parameter: Parameter,
        value: &SweepValue,
        mesh_baseline: Option<[i64; 3]>,
    ) -> Result<()> {
        let config = self.config();
        let (path, key) = config.target(parameter);
        tracing::info!("Setting {} to {}", parameter.name(), value);
        dictionary::replace_value(&path, key, value)?;

        if let (Parameter::MeshResolution, Some(base)) = (parameter, mesh_baseline) {
            let [ny, nz] = scaled_transverse(value.as_f64() as i64, base);
            dictionary::replace_value(&path, &config.keys.ny, ny)?;
            dictionary::replace_value(&path, &config.keys.nz, nz)?;
        }
        Ok(())
    }

    /// Background mesh dimensions and time step currently in the case
    fn case_state(&self) -> Result<([i64; 3], f64)> {
        let config = self.config();
        let block_mesh = config.case_path(&config.layout.block_mesh_dict);
        let mesh = [
            dictionary::read_number(&block_mesh, &config.keys.nx)?,
            dictionary::read_number(&block_mesh, &config.keys.ny)?,
            dictionary::read_number(&block_mesh, &config.keys.nz)?,
        ];
        let control = config.case_path(&config.layout.control_dict);
        let dt = dictionary::read_number(&control, &config.keys.delta_t)?;
        Ok((mesh, dt))
    }

    fn restore(&self, saved: &[SavedEntry]) -> Result<()> {
        for entry in saved {
            entry.restore()?;
            tracing::info!("Restored {} = {}", entry.key, entry.value);
        }
        Ok(())
    }
}

/// ny and nz for a new nx, keeping the baseline aspect ratios
pub fn scaled_transverse(nx: i64, base: [i64; 3]) -> [i64; 2] {
    let scale = nx as f64 / base[0] as f64;
    [
        ((base[1] as f64 * scale).round() as i64).max(1),
        ((base[2] as f64 * scale).round() as i64).max(1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Invocation;
    use crate::sweep::SweepRange;
    use std::cell::RefCell;
    use tempfile::TempDir;

    const FV_OPTIONS: &str = "\
turbine
{
    crossFlowTurbineALSourceCoeffs
    {
        tipSpeedRatio   3.1;
        tsrAmplitude    0.19;
        dynamicStall
        {
            TAlpha      6.25;
        }
    }
}
";

    /// Stands in for OpenFOAM: records commands and writes the files a
    /// solver run would leave behind
    #[derive(Default)]
    struct FakeFoam {
        calls: RefCell<Vec<String>>,
        fail_on: Option<&'static str>,
    }

    impl ToolRunner for FakeFoam {
        fn run(&self, invocation: &Invocation, case_dir: &Path) -> Result<()> {
            self.calls.borrow_mut().push(invocation.command_line());

            if self.fail_on == Some(invocation.tool_name()) {
                return Err(SweepError::ToolFailed {
                    tool: invocation.tool_name().to_string(),
                    status: "exit status: 1".to_string(),
                    log: "log".to_string(),
                });
            }

            if let Some(log) = &invocation.log {
                std::fs::write(case_dir.join(log), "End\n").unwrap();
            }

            if invocation.args.iter().any(|a| a == "pimpleFoam") || invocation.program == "pimpleFoam" {
                let fv = std::fs::read_to_string(case_dir.join("system/fvOptions")).unwrap();
                let tsr: f64 = dictionary::read_value_str(&fv, "tipSpeedRatio")
                    .unwrap()
                    .parse()
                    .unwrap();
                let out = case_dir.join("postProcessing/turbines/0");
                std::fs::create_dir_all(&out).unwrap();
                std::fs::write(
                    out.join("turbine.csv"),
                    format!(
                        "time,angle_deg,tsr,cp,cd,ct\n2.0,0,{tsr},0.0,0.0,0\n3.0,0,{tsr},{cp},1.0,0\n4.0,0,{tsr},{cp},1.2,0\n",
                        tsr = tsr,
                        cp = tsr / 10.0
                    ),
                )
                .unwrap();
            }
            Ok(())
        }
    }

    fn make_case(dir: &Path) {
        std::fs::create_dir_all(dir.join("system")).unwrap();
        std::fs::create_dir_all(dir.join("0.org")).unwrap();
        std::fs::write(dir.join("0.org/U"), "internalField uniform (1 0 0);\n").unwrap();
        std::fs::write(dir.join("system/fvOptions"), FV_OPTIONS).unwrap();
        std::fs::write(dir.join("system/controlDict"), "deltaT 0.01;\nendTime 4;\n").unwrap();
        std::fs::write(dir.join("system/blockMeshDict"), "nx 32;\nny 24;\nnz 16;\n").unwrap();
        std::fs::write(dir.join("system/decomposeParDict"), "numberOfSubdomains 2;\n").unwrap();
    }

    fn config(dir: &Path) -> SweepConfig {
        SweepConfig {
            case_dir: dir.to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_tsr_sweep_end_to_end() {
        let dir = TempDir::new().unwrap();
        make_case(dir.path());
        let fake = FakeFoam::default();
        let runner = SweepRunner::new(config(dir.path()), &fake);

        let range = SweepRange::new(1.0, 2.0, 0.5).unwrap();
        let plan = SweepPlan::new(Parameter::TipSpeedRatio, &range, false).unwrap();
        let summary = runner.execute(&plan).unwrap();

        // One row per value, in execution order
        let csv = std::fs::read_to_string(dir.path().join("processed/tsr_sweep.csv")).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "nx,ny,nz,dt,tsr,cp,cd");
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("32,24,16,0.01,1.0,0.1,"));
        assert!(lines[3].starts_with("32,24,16,0.01,2.0,0.2,"));

        // Mesh only on the first run; solver every run
        let calls = fake.calls.borrow();
        assert_eq!(calls.iter().filter(|c| c.starts_with("blockMesh")).count(), 1);
        assert_eq!(calls.iter().filter(|c| c.starts_with("decomposePar")).count(), 1);
        assert_eq!(
            calls.iter().filter(|c| c.starts_with("mpirun -np 2 pimpleFoam")).count(),
            3
        );

        // Logs archived per value
        for value in ["1.0", "1.5", "2.0"] {
            assert!(dir.path().join(format!("log.pimpleFoam.{}", value)).exists());
        }

        // Defaults restored
        let fv = std::fs::read_to_string(dir.path().join("system/fvOptions")).unwrap();
        assert_eq!(dictionary::read_value_str(&fv, "tipSpeedRatio").as_deref(), Some("3.1"));
        assert_eq!(dictionary::read_value_str(&fv, "tsrAmplitude").as_deref(), Some("0.19"));
        assert_eq!(summary.restored, "3.1");
        assert_eq!(summary.runs.len(), 3);
        assert_eq!(summary.runs[1].record.cp, 0.15);
        assert!(summary.per_run_secs.is_some());
    }

    #[test]
    fn test_append_keeps_previous_rows() {
        let dir = TempDir::new().unwrap();
        make_case(dir.path());
        let fake = FakeFoam::default();
        let plan = SweepPlan::new(
            Parameter::TipSpeedRatio,
            &SweepRange::new(1.0, 2.0, 1.0).unwrap(),
            false,
        )
        .unwrap();

        SweepRunner::new(config(dir.path()), &fake).execute(&plan).unwrap();
        let mut cfg = config(dir.path());
        cfg.append = true;
        SweepRunner::new(cfg, &fake).execute(&plan).unwrap();

        let csv = std::fs::read_to_string(dir.path().join("processed/tsr_sweep.csv")).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines.iter().filter(|l| l.starts_with("nx,")).count(), 1);
        assert_eq!(lines[1], lines[3]);
        assert_eq!(lines[2], lines[4]);

        // Without append the log starts over
        SweepRunner::new(config(dir.path()), &fake).execute(&plan).unwrap();
        let csv = std::fs::read_to_string(dir.path().join("processed/tsr_sweep.csv")).unwrap();
        assert_eq!(csv.lines().count(), 3);
    }

    #[test]
    fn test_amplitude_zeroed_during_runs() {
        let dir = TempDir::new().unwrap();
        make_case(dir.path());

        struct AmplitudeProbe<'a> {
            inner: FakeFoam,
            seen: RefCell<Vec<String>>,
            dir: &'a Path,
        }
        impl ToolRunner for AmplitudeProbe<'_> {
            fn run(&self, invocation: &Invocation, case_dir: &Path) -> Result<()> {
                let fv = std::fs::read_to_string(self.dir.join("system/fvOptions")).unwrap();
                self.seen
                    .borrow_mut()
                    .push(dictionary::read_value_str(&fv, "tsrAmplitude").unwrap());
                self.inner.run(invocation, case_dir)
            }
        }

        let probe = AmplitudeProbe {
            inner: FakeFoam::default(),
            seen: RefCell::new(Vec::new()),
            dir: dir.path(),
        };
        let mut cfg = config(dir.path());
        cfg.serial = true;
        let runner = SweepRunner::new(cfg, &probe);
        let plan = SweepPlan::new(
            Parameter::TipSpeedRatio,
            &SweepRange::new(1.0, 1.0, 0.5).unwrap(),
            true,
        )
        .unwrap();
        runner.execute(&plan).unwrap();

        assert!(probe.seen.borrow().iter().all(|v| v == "0.0"));
    }

    #[test]
    fn test_mesh_sweep_scales_transverse() {
        let dir = TempDir::new().unwrap();
        make_case(dir.path());
        let fake = FakeFoam::default();
        let mut cfg = config(dir.path());
        cfg.serial = true;
        let runner = SweepRunner::new(cfg, &fake);

        let plan = SweepPlan::new(
            Parameter::MeshResolution,
            &SweepRange::new(16.0, 48.0, 16.0).unwrap(),
            true,
        )
        .unwrap();
        runner.execute(&plan).unwrap();

        let csv = std::fs::read_to_string(dir.path().join("processed/nx_sweep.csv")).unwrap();
        let rows: Vec<&str> = csv.lines().skip(1).collect();
        assert!(rows[0].starts_with("16,12,8,"));
        assert!(rows[1].starts_with("32,24,16,"));
        assert!(rows[2].starts_with("48,36,24,"));

        // Remeshed on every run
        let calls = fake.calls.borrow();
        assert_eq!(calls.iter().filter(|c| c.starts_with("blockMesh")).count(), 3);

        let mesh = std::fs::read_to_string(dir.path().join("system/blockMeshDict")).unwrap();
        assert_eq!(mesh, "nx 32;\nny 24;\nnz 16;\n");
    }

    #[test]
    fn test_stall_coefficient_column() {
        let dir = TempDir::new().unwrap();
        make_case(dir.path());
        let fake = FakeFoam::default();
        let runner = SweepRunner::new(config(dir.path()), &fake);

        let plan = SweepPlan::new(
            Parameter::StallCoefficient,
            &SweepRange::new(2.0, 4.0, 2.0).unwrap(),
            false,
        )
        .unwrap();
        runner.execute(&plan).unwrap();

        let csv = std::fs::read_to_string(dir.path().join("processed/talpha_sweep.csv")).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "nx,ny,nz,dt,talpha,tsr,cp,cd");
        assert!(lines[1].starts_with("32,24,16,0.01,2.0,3.1,"));
        assert!(lines[2].starts_with("32,24,16,0.01,4.0,3.1,"));
    }

    #[test]
    fn test_failure_restores_defaults() {
        let dir = TempDir::new().unwrap();
        make_case(dir.path());
        let fake = FakeFoam {
            fail_on: Some("topoSet"),
            ..Default::default()
        };
        let runner = SweepRunner::new(config(dir.path()), &fake);

        let plan = SweepPlan::new(
            Parameter::TimeStep,
            &SweepRange::new(0.005, 0.02, 0.005).unwrap(),
            false,
        )
        .unwrap();
        let err = runner.execute(&plan).unwrap_err();

        assert!(matches!(
            err,
            SweepError::WithContext { ref source, .. } if matches!(**source, SweepError::ToolFailed { .. })
        ));
        assert!(err.to_string().starts_with("dt = 0.005"));
        let control = std::fs::read_to_string(dir.path().join("system/controlDict")).unwrap();
        assert_eq!(control, "deltaT 0.01;\nendTime 4;\n");
        assert!(!dir.path().join("processed/dt_sweep.csv").exists());
    }

    #[test]
    fn test_missing_mesh_keys_fail_before_running() {
        let dir = TempDir::new().unwrap();
        make_case(dir.path());
        std::fs::write(dir.path().join("system/blockMeshDict"), "convertToMeters 1;\n").unwrap();
        let fake = FakeFoam::default();
        let runner = SweepRunner::new(config(dir.path()), &fake);

        let plan = SweepPlan::new(
            Parameter::TipSpeedRatio,
            &SweepRange::new(1.0, 2.0, 1.0).unwrap(),
            false,
        )
        .unwrap();
        let err = runner.execute(&plan).unwrap_err();

        assert!(matches!(err, SweepError::KeyNotFound { .. }));
        assert!(fake.calls.borrow().is_empty());
        let fv = std::fs::read_to_string(dir.path().join("system/fvOptions")).unwrap();
        assert_eq!(fv, FV_OPTIONS);
    }

    #[test]
    fn test_missing_time_step_restores_amplitude() {
        let dir = TempDir::new().unwrap();
        make_case(dir.path());
        std::fs::write(dir.path().join("system/controlDict"), "endTime 4;\n").unwrap();
        let fake = FakeFoam::default();
        let runner = SweepRunner::new(config(dir.path()), &fake);

        let plan = SweepPlan::new(
            Parameter::TipSpeedRatio,
            &SweepRange::new(1.0, 2.0, 1.0).unwrap(),
            false,
        )
        .unwrap();
        let err = runner.execute(&plan).unwrap_err();

        assert!(matches!(err, SweepError::KeyNotFound { ref key, .. } if key == "deltaT"));
        assert!(fake.calls.borrow().is_empty());
        let fv = std::fs::read_to_string(dir.path().join("system/fvOptions")).unwrap();
        assert_eq!(dictionary::read_value_str(&fv, "tsrAmplitude").as_deref(), Some("0.19"));
        assert_eq!(fv, FV_OPTIONS);
    }

    #[test]
    fn test_scaled_transverse() {
        assert_eq!(scaled_transverse(16, [32, 24, 16]), [12, 8]);
        assert_eq!(scaled_transverse(1, [32, 24, 16]), [1, 1]);
    }
}
