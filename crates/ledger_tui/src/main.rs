use std::{fs::OpenOptions, sync::Mutex};

use ledger_tui::{
    app::App,
    config::{self, AppConfig},
    error::Result,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    init_tracing(&config)?;
    tracing::info!(base_url = %config.base_url, "starting ledger dashboard");

    let mut app = App::new(config)?;
    app.run().await?;
    Ok(())
}

/// Logs go to a file: the terminal belongs to the UI.
fn init_tracing(config: &AppConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "ledger_tui={level},ledger_view={level}",
            level = config.log_level
        ))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
