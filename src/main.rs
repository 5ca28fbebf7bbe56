use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use automail::config::SimConfig;
use automail::error::{ConfigError, SimError};
use automail::{logging, sim};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "automail", version, about = "Mail delivery robot simulation")]
struct Cli {
    /// TOML file with simulation settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v, -vv, -vvv). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one simulation and print its summary (default).
    Run,
    /// Sweep robot counts and seeds, printing CSV.
    Bench {
        #[arg(long, value_delimiter = ',', default_values_t = [1usize, 2, 3, 4, 6])]
        robot_sets: Vec<usize>,
        #[arg(long, value_delimiter = ',', default_values_t = [30006u64])]
        seeds: Vec<u64>,
    },
}

/// Overrides applied on top of the config file.
#[derive(Args, Debug, Default, Clone)]
struct RunArgs {
    #[arg(long, global = true)]
    seed: Option<u64>,
    #[arg(long, global = true)]
    robots: Option<usize>,
    #[arg(long, global = true)]
    floors: Option<u32>,
    /// Number of mail items to generate.
    #[arg(long, global = true)]
    mail: Option<usize>,
}

impl RunArgs {
    fn apply(&self, config: &mut SimConfig) {
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(robots) = self.robots {
            config.robots = robots;
        }
        if let Some(floors) = self.floors {
            config.floors = floors;
        }
        if let Some(mail) = self.mail {
            config.mail_to_create = mail;
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<SimConfig, ConfigError> {
    match path {
        Some(path) => SimConfig::load(path),
        None => Ok(SimConfig::default()),
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_ref()).context("loading configuration")?;
    cli.run.apply(&mut config);
    match cli.command.unwrap_or(Command::Run) {
        Command::Bench { robot_sets, seeds } => {
            sim::run_bench(&config, &robot_sets, &seeds).context("benchmark run failed")?;
        }
        Command::Run => {
            let report = sim::run(&config).context("simulation failed")?;
            sim::print_summary(&report);
        }
    }
    Ok(())
}

fn is_config_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause.is::<ConfigError>() || matches!(cause.downcast_ref::<SimError>(), Some(SimError::Config(_)))
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            if is_config_error(&err) {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
