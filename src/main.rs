use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use crypticker::cli::terminal::render_message;
use crypticker::core::StatusMessage;
use crypticker::core::log::init_logging;
use std::process::ExitCode;

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

impl From<Commands> for crypticker::AppCommand {
    fn from(cmd: Commands) -> crypticker::AppCommand {
        match cmd {
            Commands::Watch { coins, interval } => crypticker::AppCommand::Watch { coins, interval },
            Commands::List => crypticker::AppCommand::List,
            Commands::Console => crypticker::AppCommand::Console,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Track coins until Ctrl-C
    Watch {
        /// Comma-separated coins, e.g. LTC,BTC,SOL
        #[arg(long)]
        coins: Option<String>,
        /// Seconds between updates
        #[arg(short, long)]
        interval: Option<u64>,
    },
    /// List all available coins
    List,
    /// Interactive start/stop/list prompt
    Console,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result: Result<()> = match cli.command {
        Some(Commands::Setup) => crypticker::cli::setup::setup(),
        Some(cmd) => crypticker::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => Cli::command().print_help().map_err(Into::into),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Application failed");
            if let Some(message) = crypticker::failure_message(&e) {
                let line = render_message(&StatusMessage::error(message));
                let _ = console::Term::stderr().write_line(&line);
            }
            ExitCode::FAILURE
        }
    }
}
