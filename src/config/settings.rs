//! Configuration settings for FoamSweep
//!
//! Defines CLI arguments, the TOML case configuration and the defaults that
//! match a standard turbine case layout.

use crate::error::{IoResultExt, Result, SweepError};
use crate::sweep::ValueKind;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// FoamSweep - parameter sweeps for OpenFOAM turbine cases
#[derive(Parser, Debug, Clone)]
#[command(name = "foamsweep")]
#[command(author = "FoamSweep Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run a case repeatedly while sweeping one parameter")]
#[command(long_about = r#"
FoamSweep runs an OpenFOAM turbine case once per value of a swept parameter
and logs the mean power and drag coefficients of every run to CSV.

Parameters:
  tsr     mean tip speed ratio          (system/fvOptions: tipSpeedRatio)
  nx      mesh resolution, remeshes     (system/blockMeshDict: nx)
  dt      solver time step              (system/controlDict: deltaT)
  talpha  dynamic stall time constant   (system/fvOptions: TAlpha)

Examples:
  foamsweep tsr 0.5 5.0 0.5                 # TSR sweep, parallel solver
  foamsweep nx 16 48 8 --serial --append    # mesh study, keep old rows
  foamsweep dt 0.005 0.02 0.005 --dry-run   # print the plan only
  foamsweep perf --t1 3.0                   # performance of the current case
  foamsweep sets                            # write system/sets
"#)]
pub struct CliArgs {
    /// Parameter to sweep
    #[arg(value_enum, value_name = "PARAMETER")]
    pub parameter: Option<Parameter>,

    /// First value of the sweep
    #[arg(value_name = "START")]
    pub start: Option<f64>,

    /// Last value of the sweep (inclusive)
    #[arg(value_name = "STOP")]
    pub stop: Option<f64>,

    /// Increment between values
    #[arg(value_name = "STEP")]
    pub step: Option<f64>,

    /// Run the solver in serial instead of through MPI
    #[arg(short = 's', long)]
    pub serial: bool,

    /// Append to an existing result log instead of overwriting it
    #[arg(short = 'a', long)]
    pub append: bool,

    /// Print the sweep plan without editing or running anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Case directory
    #[arg(short = 'C', long, value_name = "DIR", global = true)]
    pub case_dir: Option<PathBuf>,

    /// TOML file overriding tools, dictionary paths and keys
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Start of the averaging window for performance coefficients
    #[arg(long, value_name = "TIME", global = true)]
    pub t1: Option<f64>,

    /// Directory for result logs (relative to the case)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output format for the final summary
    #[arg(long, value_enum, default_value = "text")]
    pub output_format: OutputFormat,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Compute performance coefficients of the current case
    #[command(name = "perf")]
    Perf,

    /// Generate a sampling dictionary with cross-stream profiles
    #[command(name = "sets")]
    Sets(SetsArgs),
}

/// Arguments of the `sets` subcommand
#[derive(Args, Debug, Clone)]
pub struct SetsArgs {
    /// Dictionary flavour to write
    #[arg(long, value_enum, default_value = "sets")]
    pub format: SetsFormat,

    /// Output path (defaults to system/sets or system/sampleDict)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Streamwise position of the profiles
    #[arg(long, default_value = "1.0")]
    pub x: f64,

    /// Lower cross-stream bound
    #[arg(long, default_value = "-1.5", allow_negative_numbers = true)]
    pub y_min: f64,

    /// Upper cross-stream bound
    #[arg(long, default_value = "1.5", allow_negative_numbers = true)]
    pub y_max: f64,

    /// Points per profile
    #[arg(long, default_value = "51")]
    pub ny: usize,

    /// Lowest profile height as a fraction of the turbine height
    #[arg(long, default_value = "-1.25", allow_negative_numbers = true)]
    pub z_h_min: f64,

    /// Highest profile height as a fraction of the turbine height
    #[arg(long, default_value = "1.25", allow_negative_numbers = true)]
    pub z_h_max: f64,

    /// Number of profiles
    #[arg(long, default_value = "19")]
    pub nz: usize,

    /// Turbine height
    #[arg(long, default_value = "0.807")]
    pub height: f64,

    /// Fields to sample
    #[arg(long, value_delimiter = ',', default_values = ["UMean", "UPrime2Mean", "kMean"])]
    pub fields: Vec<String>,
}

impl SetsArgs {
    /// `--output` when given, otherwise the format's default inside the case
    pub fn output_path(&self, config: &SweepConfig) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => config.case_path(self.format.default_path()),
        }
    }
}

/// Sampling dictionary flavour
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetsFormat {
    /// `sets` function object included from controlDict
    #[default]
    Sets,
    /// Standalone `sampleDict` with the FoamFile banner
    #[value(name = "sample-dict")]
    SampleDict,
}

impl SetsFormat {
    /// Default output path relative to the case
    pub fn default_path(&self) -> &'static str {
        match self {
            Self::Sets => "system/sets",
            Self::SampleDict => "system/sampleDict",
        }
    }
}

/// Output format for summaries
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON format
    Json,
}

/// Sweepable case parameter
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Parameter {
    /// Mean tip speed ratio
    #[value(name = "tsr")]
    #[serde(rename = "tsr")]
    TipSpeedRatio,
    /// Mesh resolution (cells along x)
    #[value(name = "nx")]
    #[serde(rename = "nx")]
    MeshResolution,
    /// Solver time step
    #[value(name = "dt")]
    #[serde(rename = "dt")]
    TimeStep,
    /// Dynamic stall model time constant
    #[value(name = "talpha")]
    #[serde(rename = "talpha")]
    StallCoefficient,
}

impl Parameter {
    /// Short name, used for CSV columns and log file names
    pub fn name(&self) -> &'static str {
        match self {
            Self::TipSpeedRatio => "tsr",
            Self::MeshResolution => "nx",
            Self::TimeStep => "dt",
            Self::StallCoefficient => "talpha",
        }
    }

    /// Numeric type of the parameter
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::MeshResolution => ValueKind::Integer,
            _ => ValueKind::Float,
        }
    }

    /// Whether a new value invalidates the existing mesh
    pub fn requires_remesh(&self) -> bool {
        matches!(self, Self::MeshResolution)
    }

    /// Result log file name
    pub fn log_file_name(&self) -> String {
        format!("{}_sweep.csv", self.name())
    }
}

/// External executables of the mesh/solve pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolSet {
    /// Case cleaning script
    pub clean: String,
    /// Background mesh generator
    pub block_mesh: String,
    /// Mesh refinement tool (run with -overwrite)
    pub snappy_hex_mesh: String,
    /// Cell/face set tool
    pub topo_set: String,
    /// Domain decomposer
    pub decompose: String,
    /// Flow solver
    pub solver: String,
    /// MPI launcher for parallel runs
    pub mpi_launcher: String,
}

impl Default for ToolSet {
    fn default() -> Self {
        Self {
            clean: "./Allclean".to_string(),
            block_mesh: "blockMesh".to_string(),
            snappy_hex_mesh: "snappyHexMesh".to_string(),
            topo_set: "topoSet".to_string(),
            decompose: "decomposePar".to_string(),
            solver: "pimpleFoam".to_string(),
            mpi_launcher: "mpirun".to_string(),
        }
    }
}

/// Case-relative locations of the files a sweep reads and writes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaseLayout {
    /// Turbine model options
    pub fv_options: PathBuf,
    /// Run control
    pub control_dict: PathBuf,
    /// Background mesh definition
    pub block_mesh_dict: PathBuf,
    /// Decomposition settings
    pub decompose_par_dict: PathBuf,
    /// Pristine initial conditions copied to `0` before each fresh run
    pub initial_conditions: PathBuf,
    /// Turbine performance time series written by the solver
    pub turbine_output: PathBuf,
}

impl Default for CaseLayout {
    fn default() -> Self {
        Self {
            fv_options: PathBuf::from("system/fvOptions"),
            control_dict: PathBuf::from("system/controlDict"),
            block_mesh_dict: PathBuf::from("system/blockMeshDict"),
            decompose_par_dict: PathBuf::from("system/decomposeParDict"),
            initial_conditions: PathBuf::from("0.org"),
            turbine_output: PathBuf::from("postProcessing/turbines/0/turbine.csv"),
        }
    }
}

/// Dictionary keys touched by a sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DictionaryKeys {
    /// Mean tip speed ratio (fvOptions)
    pub tip_speed_ratio: String,
    /// TSR fluctuation amplitude (fvOptions)
    pub tsr_amplitude: String,
    /// Dynamic stall time constant (fvOptions)
    pub stall_coefficient: String,
    /// Time step (controlDict)
    pub delta_t: String,
    /// Background mesh cells along x (blockMeshDict)
    pub nx: String,
    /// Background mesh cells along y (blockMeshDict)
    pub ny: String,
    /// Background mesh cells along z (blockMeshDict)
    pub nz: String,
    /// MPI ranks (decomposeParDict)
    pub subdomains: String,
}

impl Default for DictionaryKeys {
    fn default() -> Self {
        Self {
            tip_speed_ratio: "tipSpeedRatio".to_string(),
            tsr_amplitude: "tsrAmplitude".to_string(),
            stall_coefficient: "TAlpha".to_string(),
            delta_t: "deltaT".to_string(),
            nx: "nx".to_string(),
            ny: "ny".to_string(),
            nz: "nz".to_string(),
            subdomains: "numberOfSubdomains".to_string(),
        }
    }
}

/// Runtime configuration derived from the config file and CLI args
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    /// Case directory
    pub case_dir: PathBuf,
    /// Result log directory, relative to the case unless absolute
    pub output_dir: PathBuf,
    /// Run the solver without MPI
    pub serial: bool,
    /// Keep existing result rows
    pub append: bool,
    /// Plan only
    pub dry_run: bool,
    /// Start of the averaging window
    pub t1: f64,
    /// Scale ny and nz with nx during a mesh sweep
    pub scale_transverse: bool,
    /// External tools
    pub tools: ToolSet,
    /// File locations
    pub layout: CaseLayout,
    /// Dictionary keys
    pub keys: DictionaryKeys,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            case_dir: PathBuf::from("."),
            output_dir: PathBuf::from("processed"),
            serial: false,
            append: false,
            dry_run: false,
            t1: 3.0,
            scale_transverse: true,
            tools: ToolSet::default(),
            layout: CaseLayout::default(),
            keys: DictionaryKeys::default(),
        }
    }
}

impl SweepConfig {
    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).with_path(path)?;
        Self::from_toml(&text).map_err(|e| e.with_context(format!("{}", path.display())))
    }

    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Create config from CLI arguments; CLI flags win over the config file
    pub fn from_cli(args: &CliArgs) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(dir) = &args.case_dir {
            config.case_dir = dir.clone();
        }
        if let Some(dir) = &args.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(t1) = args.t1 {
            config.t1 = t1;
        }
        config.serial |= args.serial;
        config.append |= args.append;
        config.dry_run |= args.dry_run;

        config.validate()?;
        Ok(config)
    }

    /// Check values that would only fail halfway through a sweep
    pub fn validate(&self) -> Result<()> {
        if !self.t1.is_finite() || self.t1 < 0.0 {
            return Err(SweepError::config(format!(
                "averaging start t1 must be a non-negative time, got {}",
                self.t1
            )));
        }
        if self.tools.solver.trim().is_empty() {
            return Err(SweepError::config("solver name is empty"));
        }
        if !self.serial && self.tools.mpi_launcher.trim().is_empty() {
            return Err(SweepError::config("parallel runs need an MPI launcher"));
        }
        Ok(())
    }

    /// Resolve a case-relative path
    pub fn case_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.case_dir.join(relative)
    }

    /// Result log path for a parameter
    pub fn log_path(&self, parameter: Parameter) -> PathBuf {
        self.case_dir
            .join(&self.output_dir)
            .join(parameter.log_file_name())
    }

    /// Dictionary file and key holding a parameter
    pub fn target(&self, parameter: Parameter) -> (PathBuf, &str) {
        match parameter {
            Parameter::TipSpeedRatio => (
                self.case_path(&self.layout.fv_options),
                self.keys.tip_speed_ratio.as_str(),
            ),
            Parameter::MeshResolution => (
                self.case_path(&self.layout.block_mesh_dict),
                self.keys.nx.as_str(),
            ),
            Parameter::TimeStep => (
                self.case_path(&self.layout.control_dict),
                self.keys.delta_t.as_str(),
            ),
            Parameter::StallCoefficient => (
                self.case_path(&self.layout.fv_options),
                self.keys.stall_coefficient.as_str(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sweep_args() {
        let args = CliArgs::try_parse_from([
            "foamsweep", "tsr", "0.5", "5.0", "0.5", "--serial", "--append",
        ])
        .unwrap();
        assert_eq!(args.parameter, Some(Parameter::TipSpeedRatio));
        assert_eq!(args.start, Some(0.5));
        assert_eq!(args.stop, Some(5.0));
        assert_eq!(args.step, Some(0.5));
        assert!(args.serial);
        assert!(args.append);
        assert!(args.command.is_none());
    }

    #[test]
    fn test_parameter_restricted_to_fixed_set() {
        assert!(CliArgs::try_parse_from(["foamsweep", "viscosity", "1", "2", "1"]).is_err());
    }

    #[test]
    fn test_parse_subcommand_with_global_flag() {
        let args = CliArgs::try_parse_from(["foamsweep", "perf", "--t1", "2.5"]).unwrap();
        assert!(matches!(args.command, Some(Commands::Perf)));
        assert_eq!(args.t1, Some(2.5));

        let args = CliArgs::try_parse_from(["foamsweep", "sets", "--format", "sample-dict"]).unwrap();
        match args.command {
            Some(Commands::Sets(sets)) => {
                assert_eq!(sets.format, SetsFormat::SampleDict);
                assert_eq!(sets.fields, vec!["UMean", "UPrime2Mean", "kMean"]);
                assert_eq!(sets.nz, 19);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_overrides_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sweep.toml");
        std::fs::write(
            &path,
            "t1 = 1.0\noutput_dir = \"results\"\n[tools]\nsolver = \"simpleFoam\"\n",
        )
        .unwrap();

        let args = CliArgs::try_parse_from([
            "foamsweep",
            "dt",
            "0.001",
            "0.004",
            "0.001",
            "--config",
            path.to_str().unwrap(),
            "--t1",
            "2.0",
        ])
        .unwrap();
        let config = SweepConfig::from_cli(&args).unwrap();
        assert_eq!(config.t1, 2.0);
        assert_eq!(config.output_dir, PathBuf::from("results"));
        assert_eq!(config.tools.solver, "simpleFoam");
        assert_eq!(config.tools.block_mesh, "blockMesh");
    }

    #[test]
    fn test_unknown_config_key_rejected() {
        assert!(SweepConfig::from_toml("solvr = \"x\"\n").is_err());
        assert!(SweepConfig::from_toml("t1 = -1.0\n").is_err());
    }

    #[test]
    fn test_targets() {
        let config = SweepConfig {
            case_dir: PathBuf::from("/case"),
            ..Default::default()
        };
        let (path, key) = config.target(Parameter::StallCoefficient);
        assert_eq!(path, PathBuf::from("/case/system/fvOptions"));
        assert_eq!(key, "TAlpha");
        assert_eq!(
            config.log_path(Parameter::MeshResolution),
            PathBuf::from("/case/processed/nx_sweep.csv")
        );
        assert!(Parameter::MeshResolution.requires_remesh());
        assert!(!Parameter::TimeStep.requires_remesh());
    }
}
