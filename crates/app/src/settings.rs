//! Settings for the application.
//!
//! Values come from `settings.toml` (or the file given with `--config`),
//! then from `POCKETBOOK__*` environment variables, e.g.
//! `POCKETBOOK__SERVER__PORT=8080`.
use chrono_tz::Tz;
use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use engine::{DEFAULT_TIMEZONE, InvalidDatePolicy};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "settings";

#[derive(Debug, Parser)]
#[command(name = "pocketbook", version)]
struct Args {
    /// Config file path, with or without the `.toml` extension.
    #[arg(long, env = "POCKETBOOK_CONFIG")]
    config: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
    pub timezone: Tz,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            timezone: DEFAULT_TIMEZONE,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Import {
    pub invalid_date: InvalidDatePolicy,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Server,
    #[serde(default)]
    pub import: Import,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let args = Args::parse();
        let path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);

        Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("POCKETBOOK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn from_toml(text: &str) -> Result<Settings, ConfigError> {
        Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn full_file() {
        let settings = from_toml(
            r#"
            [app]
            level = "debug"
            timezone = "Asia/Bangkok"

            [server]
            bind = "0.0.0.0"
            port = 8080
            database = { sqlite = "pocketbook.db" }

            [import]
            invalid_date = "reject"
            "#,
        )
        .unwrap();

        assert_eq!(settings.app.level, "debug");
        assert_eq!(settings.app.timezone, chrono_tz::Asia::Bangkok);
        assert_eq!(settings.server.port, 8080);
        assert!(matches!(settings.server.database, Database::Sqlite(ref p) if p == "pocketbook.db"));
        assert_eq!(settings.import.invalid_date, InvalidDatePolicy::Reject);
    }

    #[test]
    fn defaults_fill_optional_sections() {
        let settings = from_toml(
            r#"
            [server]
            port = 3000
            database = "memory"
            "#,
        )
        .unwrap();

        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.app.timezone, DEFAULT_TIMEZONE);
        assert!(settings.server.bind.is_none());
        assert!(matches!(settings.server.database, Database::Memory));
        assert_eq!(settings.import.invalid_date, InvalidDatePolicy::Today);
    }
}
