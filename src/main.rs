use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use cutoff::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for cutoff::AppCommand {
    fn from(cmd: Commands) -> cutoff::AppCommand {
        match cmd {
            Commands::Serve => cutoff::AppCommand::Serve,
            Commands::Lookup {
                currency_a,
                currency_b,
                date,
            } => cutoff::AppCommand::Lookup {
                currency_a,
                currency_b,
                date,
            },
            Commands::List => cutoff::AppCommand::List,
            Commands::Setup { .. } => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup {
        /// Replace an existing configuration, keeping it as `.bak`
        #[arg(long)]
        force: bool,
    },
    /// Serve the cut-off HTTP API
    Serve,
    /// Resolve the cut-off time for a currency pair
    Lookup {
        /// First currency, e.g. EUR
        currency_a: String,
        /// Second currency, e.g. USD
        currency_b: String,
        /// Date as YYYY-MM-DD, defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// List every currency with its cut-off readings
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup { force }) => cutoff::cli::setup::setup(force),
        Some(cmd) => cutoff::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
