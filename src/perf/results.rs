//! Per-parameter result logs
//!
//! One CSV file per swept parameter, one row per solver run, in execution
//! order. The header is written once; appending to a log that was produced
//! with different columns is refused.

use crate::config::Parameter;
use crate::error::{IoResultExt, Result, SweepError};
use crate::perf::Performance;
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// One row of a result log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRecord {
    /// Background mesh cells along x
    pub nx: i64,
    /// Background mesh cells along y
    pub ny: i64,
    /// Background mesh cells along z
    pub nz: i64,
    /// Solver time step
    pub dt: f64,
    /// Stall model coefficient, only logged when it is the swept parameter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub talpha: Option<f64>,
    /// Measured mean tip speed ratio
    pub tsr: f64,
    /// Mean power coefficient
    pub cp: f64,
    /// Mean drag coefficient
    pub cd: f64,
}

impl ResultRecord {
    /// Column names of the log for a parameter
    pub fn columns(parameter: Parameter) -> Vec<&'static str> {
        let mut columns = vec!["nx", "ny", "nz", "dt"];
        if parameter == Parameter::StallCoefficient {
            columns.push("talpha");
        }
        columns.extend(["tsr", "cp", "cd"]);
        columns
    }

    /// Build a record from the case state and a run's performance
    pub fn new(mesh: [i64; 3], dt: f64, talpha: Option<f64>, perf: &Performance) -> Self {
        Self {
            nx: mesh[0],
            ny: mesh[1],
            nz: mesh[2],
            dt,
            talpha,
            tsr: perf.tsr,
            cp: perf.cp,
            cd: perf.cd,
        }
    }
}

/// Append-only CSV log for one parameter
#[derive(Debug, Clone)]
pub struct ResultLog {
    path: PathBuf,
    columns: Vec<&'static str>,
}

impl ResultLog {
    /// Open a log, creating its directory; without `append` any existing
    /// file is removed first
    pub fn open(path: impl Into<PathBuf>, parameter: Parameter, append: bool) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_path(parent)?;
        }

        if !append && path.exists() {
            std::fs::remove_file(&path).with_path(&path)?;
            tracing::info!("Removed previous result log {:?}", path);
        }

        let log = Self {
            path,
            columns: ResultRecord::columns(parameter),
        };
        log.check_header()?;
        Ok(log)
    }

    /// Log file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn csv_error(&self, source: csv::Error) -> SweepError {
        SweepError::Csv {
            path: self.path.clone(),
            source,
        }
    }

    fn reader(&self, has_headers: bool) -> Result<csv::Reader<std::fs::File>> {
        let file = std::fs::File::open(&self.path).with_path(&self.path)?;
        Ok(csv::ReaderBuilder::new()
            .has_headers(has_headers)
            .trim(csv::Trim::All)
            .from_reader(file))
    }

    /// Existing header row, if the file has one
    fn existing_header(&self) -> Result<Option<csv::StringRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }
        match self.reader(false)?.records().next() {
            Some(record) => record.map(Some).map_err(|e| self.csv_error(e)),
            None => Ok(None),
        }
    }

    fn check_header(&self) -> Result<()> {
        match self.existing_header()? {
            Some(found) if !found.iter().eq(self.columns.iter().copied()) => {
                Err(SweepError::HeaderMismatch {
                    path: self.path.clone(),
                    expected: self.columns.join(","),
                    found: found.iter().collect::<Vec<_>>().join(","),
                })
            }
            _ => Ok(()),
        }
    }

    /// Append one row, writing the header first if the file is new
    pub fn append(&self, record: &ResultRecord) -> Result<()> {
        let needs_header = self.existing_header()?.is_none();

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_path(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            writer
                .write_record(&self.columns)
                .map_err(|e| self.csv_error(e))?;
        }
        writer.serialize(record).map_err(|e| self.csv_error(e))?;
        writer.flush().with_path(&self.path)?;

        tracing::debug!("Logged {:?} to {:?}", record, self.path);
        Ok(())
    }

    /// Number of data rows currently in the log
    pub fn row_count(&self) -> Result<usize> {
        if !self.path.exists() {
            return Ok(0);
        }
        let mut count = 0;
        for record in self.reader(true)?.records() {
            record.map_err(|e| self.csv_error(e))?;
            count += 1;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn perf(cp: f64) -> Performance {
        Performance {
            tsr: 3.1,
            cp,
            cd: 0.9,
            samples: 10,
        }
    }

    #[test]
    fn test_columns() {
        assert_eq!(
            ResultRecord::columns(Parameter::TipSpeedRatio).join(","),
            "nx,ny,nz,dt,tsr,cp,cd"
        );
        assert_eq!(
            ResultRecord::columns(Parameter::StallCoefficient).join(","),
            "nx,ny,nz,dt,talpha,tsr,cp,cd"
        );
    }

    #[test]
    fn test_header_written_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("processed/tsr_sweep.csv");
        let log = ResultLog::open(&path, Parameter::TipSpeedRatio, false).unwrap();

        log.append(&ResultRecord::new([32, 24, 16], 0.01, None, &perf(0.25)))
            .unwrap();
        log.append(&ResultRecord::new([32, 24, 16], 0.01, None, &perf(0.3)))
            .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "nx,ny,nz,dt,tsr,cp,cd\n32,24,16,0.01,3.1,0.25,0.9\n32,24,16,0.01,3.1,0.3,0.9\n"
        );
        assert_eq!(log.row_count().unwrap(), 2);
    }

    #[test]
    fn test_overwrite_vs_append() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dt_sweep.csv");
        let record = ResultRecord::new([32, 24, 16], 0.01, None, &perf(0.25));

        ResultLog::open(&path, Parameter::TimeStep, false)
            .unwrap()
            .append(&record)
            .unwrap();

        let log = ResultLog::open(&path, Parameter::TimeStep, true).unwrap();
        log.append(&record).unwrap();
        assert_eq!(log.row_count().unwrap(), 2);

        let log = ResultLog::open(&path, Parameter::TimeStep, false).unwrap();
        assert_eq!(log.row_count().unwrap(), 0);
    }

    #[test]
    fn test_append_rejects_other_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sweep.csv");
        std::fs::write(&path, "tsr,cp,cd\n1.0,0.1,0.5\n").unwrap();

        let err = ResultLog::open(&path, Parameter::TipSpeedRatio, true).unwrap_err();
        assert!(matches!(err, SweepError::HeaderMismatch { .. }));
    }

    #[test]
    fn test_stall_coefficient_row() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("talpha_sweep.csv");
        let log = ResultLog::open(&path, Parameter::StallCoefficient, false).unwrap();
        log.append(&ResultRecord::new([32, 24, 16], 0.01, Some(6.25), &perf(0.25)))
            .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "nx,ny,nz,dt,talpha,tsr,cp,cd\n32,24,16,0.01,6.25,3.1,0.25,0.9\n");
    }

    #[test]
    fn test_append_accepts_padded_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tsr_sweep.csv");
        std::fs::write(&path, "nx, ny, nz, dt, tsr, cp, cd\n32,24,16,0.01,3.1,0.2,0.9\n").unwrap();

        let log = ResultLog::open(&path, Parameter::TipSpeedRatio, true).unwrap();
        log.append(&ResultRecord::new([32, 24, 16], 0.01, None, &perf(0.3)))
            .unwrap();
        assert_eq!(log.row_count().unwrap(), 2);
    }
}
