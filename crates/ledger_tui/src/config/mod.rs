use std::path::PathBuf;

use chrono_tz::Tz;
use clap::{Parser, ValueEnum};
use serde::Deserialize;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "config/ledger.toml";

/// Presentation adapter drawn over the record view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// A plain paginated table.
    Plain,
    /// Summary cards and charts next to the table.
    #[default]
    Dashboard,
}

impl Layout {
    pub fn toggled(self) -> Self {
        match self {
            Self::Plain => Self::Dashboard,
            Self::Dashboard => Self::Plain,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Dashboard => "dashboard",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub timezone: String,
    pub page_size: usize,
    pub layout: Layout,
    pub export_dir: PathBuf,
    pub log_file: PathBuf,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            timezone: "Europe/Moscow".to_string(),
            page_size: 25,
            layout: Layout::default(),
            export_dir: PathBuf::from("."),
            log_file: PathBuf::from("ledger_tui.log"),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// The configured IANA time zone.
    pub fn time_zone(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|err| AppError::Setting {
                key: "timezone",
                message: err.to_string(),
            })
    }

    fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(AppError::Setting {
                key: "page_size",
                message: "must be at least 1".to_string(),
            });
        }
        self.time_zone()?;
        Ok(())
    }
}

#[derive(Debug, Parser)]
#[command(name = "ledger_tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL of the ledger backend (e.g. http://127.0.0.1:8080).
    #[arg(long)]
    base_url: Option<String>,
    /// Override timezone (IANA name).
    #[arg(long)]
    timezone: Option<String>,
    /// Override rows per page.
    #[arg(long)]
    page_size: Option<usize>,
    /// Override the start-up layout.
    #[arg(long, value_enum)]
    layout: Option<Layout>,
    /// Override the directory CSV exports are written to.
    #[arg(long)]
    export_dir: Option<PathBuf>,
    /// Override the log file path.
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Override the log level (tracing filter directive).
    #[arg(long)]
    log_level: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("LEDGER_TUI"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(timezone) = args.timezone {
        settings.timezone = timezone;
    }
    if let Some(page_size) = args.page_size {
        settings.page_size = page_size;
    }
    if let Some(layout) = args.layout {
        settings.layout = layout;
    }
    if let Some(export_dir) = args.export_dir {
        settings.export_dir = export_dir;
    }
    if let Some(log_file) = args.log_file {
        settings.log_file = log_file;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }

    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.page_size, 25);
        assert_eq!(config.time_zone().unwrap(), chrono_tz::Europe::Moscow);
    }

    #[test]
    fn rejects_unknown_zone_and_empty_pages() {
        let config = AppConfig {
            timezone: "Mars/Olympus".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AppError::Setting { key: "timezone", .. })
        ));

        let config = AppConfig {
            page_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AppError::Setting { key: "page_size", .. })
        ));
    }

    #[test]
    fn file_values_override_defaults() {
        let settings: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "page_size = 10\nlayout = \"plain\"",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.page_size, 10);
        assert_eq!(settings.layout, Layout::Plain);
        assert_eq!(settings.timezone, "Europe/Moscow");
    }
}
