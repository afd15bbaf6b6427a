mod budget;
mod categorize;
mod db;
mod error;
mod export;
mod invoice;
mod models;
mod money;
mod reports;
mod run;
mod schedule;
mod settings;
mod validate;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    init_logging();
    let cli = run::Cli::parse();
    if let Err(e) = start(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

/// Log to stderr, filtered by `CASAFIN_LOG` (default `warn`).
fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("CASAFIN_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn start(cli: run::Cli) -> Result<()> {
    let paths = settings::Paths::from_platform()?;
    let settings = settings::Settings::load(&paths)?;
    if !paths.settings_file().exists() {
        settings.save(&paths)?;
    }
    let db_path = settings.resolve_db_path(&paths, cli.db)?;
    let mut db = db::Database::open(&db_path)?;
    run::execute(cli.command, &mut db, &settings)
}
