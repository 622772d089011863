use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use xcr::core::log::init_logging;

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

impl From<Commands> for xcr::AppCommand {
    fn from(cmd: Commands) -> xcr::AppCommand {
        match cmd {
            Commands::Assets => xcr::AppCommand::Assets,
            Commands::Convert { amount, from, to } => xcr::AppCommand::Convert { amount, from, to },
            Commands::Compare { from, to, days } => xcr::AppCommand::Compare { from, to, days },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List supported assets with current spot prices
    Assets,
    /// Convert an amount between two assets at spot prices
    Convert {
        /// Amount of the source asset to convert
        #[arg(value_parser = parse_amount)]
        amount: f64,
        /// Source asset id, e.g. "bitcoin"
        from: String,
        /// Target asset id, e.g. "ethereum"
        to: String,
    },
    /// Compare two assets over a historical window
    Compare {
        /// Source asset id, e.g. "bitcoin"
        from: String,
        /// Target asset id, e.g. "ethereum"
        to: String,
        /// Days of history to fetch (defaults to the configured window)
        #[arg(short, long)]
        days: Option<u32>,
    },
}

/// The analytics core does not validate amounts; malformed input is
/// rejected here with a user-facing message instead.
fn parse_amount(s: &str) -> Result<f64, String> {
    let amount: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid amount"))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err("amount must be a non-negative number".to_string());
    }
    Ok(amount)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => xcr::cli::setup::setup(),
        Some(cmd) => xcr::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
