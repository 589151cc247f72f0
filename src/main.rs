//! medrec-dash: a terminal dashboard for the medical records database.

use medrec_dash::app::Dashboard;
use medrec_dash::cli::Cli;
use medrec_dash::config::Config;
use medrec_dash::error::Result;
use medrec_dash::{logging, tui};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Before logging starts, so RUST_LOG may come from .env.
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse_args();

    if cli.is_headless() {
        logging::init_stderr_logging();
    } else {
        logging::init_file_logging();
    }

    match dotenv {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Ignoring .env file: {}", e),
    }

    match run(&cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{}: {}", e.category(), e);
            eprintln!("{}: {}", e.category(), e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: &Cli) -> Result<i32> {
    if cli.is_headless() {
        return tui::headless::run_headless(cli).await;
    }

    let dashboard = if cli.mock_db {
        Dashboard::mock()
    } else {
        let config_path = cli.config_path();
        info!("Loading config from: {}", config_path.display());
        let config = Config::load_from_file(&config_path)?;
        let connection = cli.resolve_connection(&config)?;
        Dashboard::connect(&connection, &config.pool).await?
    };

    tui::run(&dashboard, cli.page).await?;
    Ok(0)
}
