//! Turbine performance time series
//!
//! The actuator-line model writes one CSV row per time step with (among
//! others) `time`, `tsr`, `cp` and `cd` columns. Performance is the mean of
//! each column over rows at or after `t1`, which skips the start-up
//! transient.

use crate::error::{IoResultExt, Result, SweepError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Columns read from each row; any others are ignored
const COLUMNS: [&str; 4] = ["time", "tsr", "cp", "cd"];

#[derive(Debug, Deserialize)]
struct TurbineRow {
    time: f64,
    tsr: f64,
    cp: f64,
    cd: f64,
}

/// Mean turbine performance over the averaging window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    /// Mean tip speed ratio
    pub tsr: f64,
    /// Mean power coefficient
    pub cp: f64,
    /// Mean drag coefficient
    pub cd: f64,
    /// Number of samples averaged
    pub samples: usize,
}

impl Performance {
    /// Read and reduce a turbine CSV file
    pub fn from_file(path: &Path, t1: f64) -> Result<Self> {
        let text = std::fs::read_to_string(path).with_path(path)?;
        Self::from_csv(&text, t1).map_err(|message| SweepError::perf(path, message))
    }

    /// Reduce turbine CSV text; errors are plain messages for the caller to wrap
    pub fn from_csv(text: &str, t1: f64) -> std::result::Result<Self, String> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| format!("failed to read header: {}", e))?
            .clone();
        if headers.is_empty() {
            return Err("file is empty".to_string());
        }
        if let Some(missing) = COLUMNS.iter().find(|c| !headers.iter().any(|h| h == **c)) {
            return Err(format!("missing column '{}'", missing));
        }

        let mut sums = [0.0f64; 3];
        let mut samples = 0usize;

        for result in reader.records() {
            let record = result.map_err(|e| format!("invalid row: {}", e))?;
            let line = record.position().map_or(0, |p| p.line());
            let row: TurbineRow = record
                .deserialize(Some(&headers))
                .map_err(|e| format!("line {}: {}", line, e))?;

            if row.time < t1 {
                continue;
            }
            sums[0] += row.tsr;
            sums[1] += row.cp;
            sums[2] += row.cd;
            samples += 1;
        }

        if samples == 0 {
            return Err(format!("no samples at or after t1 = {}", t1));
        }

        let n = samples as f64;
        Ok(Self {
            tsr: sums[0] / n,
            cp: sums[1] / n,
            cd: sums[2] / n,
            samples,
        })
    }
}
