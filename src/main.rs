use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use colsum::cli;
use colsum::config::ColsumConfig;
use colsum::logging;

#[derive(Parser)]
#[command(name = "colsum")]
#[command(about = "Inject per-column sum footers into HTML data tables")]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "colsum.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process an HTML page once
    Run {
        /// Input HTML file
        input: PathBuf,

        /// Output file (defaults to <input>_summed.html)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Toggle the persisted auto-run preference
    Autorun {
        #[arg(value_enum)]
        state: Toggle,
    },
    /// Show current configuration
    Status,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Toggle {
    On,
    Off,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ColsumConfig::load_or_default(&cli.config)?;
    config.apply_env_overrides();
    logging::init_logging(&config.log_level)?;

    match cli.command {
        Commands::Run { input, output } => cli::run_command(input, output, &config),
        Commands::Autorun { state } => cli::autorun_command(state == Toggle::On, &cli.config),
        Commands::Status => cli::status_command(&config, &cli.config),
    }
}
