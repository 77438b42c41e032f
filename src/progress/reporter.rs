//! Progress reporter implementation
//!
//! Uses indicatif for a status spinner (current value and pipeline step)
//! above a bar counting finished runs. Solver runs are long, so the bar
//! shows elapsed time and an ETA rather than throughput.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Progress reporter for sweeps
pub struct ProgressReporter {
    /// Multi-progress container
    multi: MultiProgress,
    /// Finished runs
    runs_bar: ProgressBar,
    /// Current status message
    status: ProgressBar,
    /// Start time
    start_time: Instant,
    /// Total runs in the sweep
    total_runs: AtomicU64,
    /// Runs finished so far
    runs_done: AtomicU64,
    /// Is progress enabled
    enabled: AtomicBool,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        let multi = MultiProgress::new();

        let status = multi.add(ProgressBar::new_spinner());
        status.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        status.enable_steady_tick(Duration::from_millis(200));

        let runs_bar = multi.add(ProgressBar::new(0));
        runs_bar.set_style(
            ProgressStyle::default_bar()
                .template("{prefix:.bold.dim} [{bar:40.cyan/blue}] {pos}/{len} runs ({elapsed_precise}, ETA {eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        runs_bar.set_prefix("Sweep");

        Self {
            multi,
            runs_bar,
            status,
            start_time: Instant::now(),
            total_runs: AtomicU64::new(0),
            runs_done: AtomicU64::new(0),
            enabled: AtomicBool::new(true),
        }
    }

    /// Create a disabled progress reporter (for quiet mode and tests)
    pub fn disabled() -> Self {
        let reporter = Self::new();
        reporter.enabled.store(false, Ordering::SeqCst);
        reporter.multi.set_draw_target(ProgressDrawTarget::hidden());
        reporter.status.disable_steady_tick();
        reporter
    }

    /// Set the number of runs
    pub fn set_total_runs(&self, total: u64) {
        self.total_runs.store(total, Ordering::Relaxed);
        self.runs_bar.set_length(total);
    }

    /// Mark runs as finished
    pub fn increment_runs(&self, count: u64) {
        self.runs_done.fetch_add(count, Ordering::Relaxed);
        self.runs_bar.inc(count);
    }

    /// Set current status message
    pub fn set_status(&self, msg: impl Into<String>) {
        self.status.set_message(msg.into());
    }

    /// Print a line above the bars without garbling them
    pub fn println(&self, line: impl AsRef<str>) {
        if self.is_enabled() {
            let _ = self.multi.println(line);
        }
    }

    /// Get elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Finish progress with success message
    pub fn finish_success(&self, message: &str) {
        self.status.finish_with_message(format!("✓ {}", message));
        self.runs_bar.finish();
    }

    /// Finish progress with error message
    pub fn finish_error(&self, message: &str) {
        self.status.finish_with_message(format!("✗ {}", message));
        self.runs_bar.abandon();
    }

    /// Check if progress is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Get progress summary
    pub fn summary(&self) -> ProgressSummary {
        ProgressSummary {
            total_runs: self.total_runs.load(Ordering::Relaxed),
            runs_done: self.runs_done.load(Ordering::Relaxed),
            elapsed: self.elapsed(),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Progress summary
#[derive(Debug, Clone)]
pub struct ProgressSummary {
    /// Total runs in the sweep
    pub total_runs: u64,
    /// Runs finished so far
    pub runs_done: u64,
    /// Elapsed time
    pub elapsed: Duration,
}

impl ProgressSummary {
    /// Get completion percentage
    pub fn percentage(&self) -> f64 {
        if self.total_runs == 0 {
            0.0
        } else {
            (self.runs_done as f64 / self.total_runs as f64) * 100.0
        }
    }

    /// Mean wall time per finished run
    pub fn time_per_run(&self) -> Option<Duration> {
        (self.runs_done > 0).then(|| self.elapsed / self.runs_done as u32)
    }
}
