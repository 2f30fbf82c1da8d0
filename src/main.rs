// src/main.rs
mod cli;
mod clipboard;
mod config;
mod error;
mod export;
mod generator;
mod menu;
mod models;
mod store;
mod strength;
mod tui;

use clap::Parser;
use cli::Frontend;
use store::RecordStore;

fn run(cli_args: cli::Cli) -> error::AppResult<()> {
    let config = config::load_config();
    let db_path = config.resolve_database_path(cli_args.db.as_deref());
    let store = RecordStore::open(&db_path)?;

    match cli::handle_cli_command(cli_args.command, &store, &config)? {
        Some(Frontend::Menu) => menu::run_menu(&store, &config),
        Some(Frontend::Tui) => tui::run_tui(store, config),
        None => {
            log::info!("CLI command processed.");
            Ok(())
        }
    }
}

fn main() -> Result<(), error::AppError> {
    env_logger::init();
    log::info!("Starting PassGen-RS application");

    let cli_args = cli::Cli::parse();

    if let Err(e) = run(cli_args) {
        log::error!("Application failed: {:#?}", e);
        eprintln!("Error: {}", e);
        return Err(e);
    }

    log::info!("PassGen-RS application finished successfully.");
    Ok(())
}
