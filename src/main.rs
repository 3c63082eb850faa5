use crate::check::check_tree;
use crate::config::{DEFAULT_SEED, Directories, SweepConfig};
use crate::sweep::run_sweep;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub mod check;
pub mod config;
pub mod core;
pub mod generate;
pub mod ingest;
pub mod sweep;

/// Generates Routing and Spectrum Assignment benchmark instances from a
/// directory of fiber topologies.
#[derive(Debug, Parser)]
#[command(name = "rsagen", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write one instance per percentage, topology and slot budget
    Generate(GenerateArgs),
    /// Verify a generated instance tree against its topologies
    Check(DirArgs),
}

#[derive(Debug, Args)]
struct DirArgs {
    /// Main directory holding `topologies/` and `instances/` [default: working directory]
    #[arg(long)]
    mdir: Option<PathBuf>,

    /// Topology directory [default: <mdir>/topologies]
    #[arg(long)]
    tdir: Option<PathBuf>,

    /// Instance output directory [default: <mdir>/instances]
    #[arg(long)]
    idir: Option<PathBuf>,
}

impl DirArgs {
    fn resolve(&self) -> Result<Directories, config::ConfigError> {
        Directories::resolve(
            self.mdir.as_deref(),
            self.tdir.as_deref(),
            self.idir.as_deref(),
        )
    }
}

#[derive(Debug, Args)]
struct GenerateArgs {
    #[command(flatten)]
    dirs: DirArgs,

    /// Random seed shared by the whole sweep
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Slots available per link [default: 10 15 20 30 40 60 80 100 150 200 300 400 600 800 1000]
    #[arg(short = 'S', long, num_args = 1.., allow_negative_numbers = true)]
    slots: Vec<i64>,

    /// Largest share of the slots a single demand may use, in (0, 1] [default: 0.1 to 0.8]
    #[arg(short, long, num_args = 1.., allow_negative_numbers = true)]
    percents: Vec<f64>,

    /// Name written to the `Created by` header line
    #[arg(long)]
    creator: Option<String>,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn generate(args: GenerateArgs) -> anyhow::Result<ExitCode> {
    let directories = args.dirs.resolve()?;
    let config = SweepConfig::new(directories, args.seed, &args.slots, &args.percents)?
        .with_creator(args.creator);
    info!(
        seed = config.seed,
        topologies = %config.directories.topologies.display(),
        instances = %config.directories.instances.display(),
        "starting sweep"
    );

    run_sweep(&config)?;
    Ok(ExitCode::SUCCESS)
}

fn check(args: DirArgs) -> anyhow::Result<ExitCode> {
    let directories = args.resolve()?;
    let report = check_tree(&directories.instances, &directories.topologies)?;

    info!(
        checked = report.checked,
        invalid = report.findings.len(),
        "check finished"
    );
    if report.is_clean() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Generate(args) => generate(args),
        Command::Check(args) => check(args),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_flags() {
        let cli = Cli::try_parse_from([
            "rsagen", "generate", "--tdir", "tops", "-s", "7", "-S", "10", "-5", "20", "-p",
            "0.25", "0.5",
        ])
        .unwrap();
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(7, args.seed);
        assert_eq!(vec![10, -5, 20], args.slots);
        assert_eq!(vec![0.25, 0.5], args.percents);
        assert_eq!(Some(PathBuf::from("tops")), args.dirs.tdir);
        assert_eq!(None, args.dirs.mdir);
    }

    #[test]
    fn test_generate_defaults() {
        let cli = Cli::try_parse_from(["rsagen", "-v", "generate"]).unwrap();
        assert!(cli.verbose);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(DEFAULT_SEED, args.seed);
        assert!(args.slots.is_empty());
        assert!(args.percents.is_empty());
        assert_eq!(None, args.creator);
    }

    #[test]
    fn test_check_reports_missing_directory() {
        let main = tempfile::tempdir().unwrap();
        let args = DirArgs {
            mdir: Some(main.path().to_path_buf()),
            tdir: None,
            idir: None,
        };
        assert!(check(args).is_err());
    }
}
