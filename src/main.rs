use clap::Parser;
use dotenvy::dotenv;
use expense_tracker::{
    config,
    db::ExpenseStore,
    errors::Result,
    shell::{
        App,
        cli::{Cli, Command},
        session::{run_action, run_interactive},
    },
};
use std::{io, process::ExitCode};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<ExitCode> {
    // 1. Load .env file first so RUST_LOG from it reaches the filter
    dotenv().ok();

    // 2. Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    // 3. Load the application configuration
    let mut app_config = match &cli.config {
        Some(path) => config::load_config(path),
        None => config::load_app_configuration(),
    }
    .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    config::apply_overrides(&mut app_config, cli.database);

    // 4. Open the store (creates the table and runs migrations)
    let store = ExpenseStore::open(&app_config.database_path)
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    let mut app = App::new(store, app_config);
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    // 5. One command, or an interactive session
    match cli.command {
        None | Some(Command::Shell) => {
            run_interactive(&mut app, &mut input, &mut out)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(command) => {
            if run_action(&mut app, command, &mut input, &mut out) {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
