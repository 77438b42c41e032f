//! FoamSweep CLI - parameter sweeps for OpenFOAM turbine cases

use anyhow::{bail, Context};
use clap::Parser;
use foamsweep::config::{CliArgs, Commands, OutputFormat, SetsArgs, SweepConfig};
use foamsweep::perf::Performance;
use foamsweep::pipeline::{Case, ProcessRunner};
use foamsweep::progress::ProgressReporter;
use foamsweep::sampling::ProfileSpec;
use foamsweep::sweep::{SweepPlan, SweepRange, SweepRunner};
use tracing_subscriber::EnvFilter;

fn main() {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Initialize logging; RUST_LOG wins over -v
    let default_level = match (args.quiet, args.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Handle result
    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: CliArgs) -> anyhow::Result<()> {
    let config = SweepConfig::from_cli(&args).context("invalid configuration")?;

    // Handle subcommands
    if let Some(command) = &args.command {
        return match command {
            Commands::Perf => cmd_perf(&config, args.output_format),
            Commands::Sets(sets) => cmd_sets(&config, sets, args.quiet),
        };
    }

    let (parameter, start, stop, step) = match (args.parameter, args.start, args.stop, args.step) {
        (Some(p), Some(start), Some(stop), Some(step)) => (p, start, stop, step),
        _ => {
            eprintln!("Usage: foamsweep <PARAMETER> <START> <STOP> <STEP> [OPTIONS]");
            eprintln!("       foamsweep --help for more information");
            eprintln!("       foamsweep perf    - Performance of the current case");
            eprintln!("       foamsweep sets    - Write a sampling dictionary");
            std::process::exit(1);
        }
    };

    let range = SweepRange::new(start, stop, step)?;
    let plan = SweepPlan::new(parameter, &range, config.serial)?;

    if config.dry_run {
        let case = Case::new(config, ProcessRunner::new());
        match args.output_format {
            OutputFormat::Text => plan.print(&case),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
        }
        return Ok(());
    }

    if !config.case_dir.is_dir() {
        bail!("case directory {:?} does not exist", config.case_dir);
    }

    // Create progress reporter
    let progress = if args.quiet || args.output_format == OutputFormat::Json {
        ProgressReporter::disabled()
    } else {
        ProgressReporter::new()
    };

    let runner = SweepRunner::new(config, ProcessRunner::new()).with_progress(progress);
    let summary = runner
        .execute(&plan)
        .with_context(|| format!("{} sweep failed", parameter.name()))?;

    match args.output_format {
        OutputFormat::Text if !args.quiet => summary.print_summary(),
        OutputFormat::Text => {}
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }

    Ok(())
}

fn cmd_perf(config: &SweepConfig, format: OutputFormat) -> anyhow::Result<()> {
    let path = config.case_path(&config.layout.turbine_output);
    let perf = Performance::from_file(&path, config.t1)?;

    match format {
        OutputFormat::Text => {
            println!("=== Turbine Performance (t >= {}) ===", config.t1);
            println!("Samples: {}", perf.samples);
            println!("TSR:     {:.4}", perf.tsr);
            println!("C_P:     {:.4}", perf.cp);
            println!("C_D:     {:.4}", perf.cd);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&perf)?),
    }

    Ok(())
}

fn cmd_sets(config: &SweepConfig, args: &SetsArgs, quiet: bool) -> anyhow::Result<()> {
    let path = args.output_path(config);

    ProfileSpec::from(args).write(args.format, &path)?;

    if !quiet {
        println!("Wrote {} profiles to {}", args.nz, path.display());
    }
    Ok(())
}
