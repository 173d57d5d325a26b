mod file_config;

pub use file_config::FileConfig;

use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

/// Environment variable consulted for the admin secret when neither the CLI
/// nor the config file provides one.
pub const ADMIN_PASSWORD_ENV: &str = "ADMIN_PASSWORD";

/// CLI arguments that take part in config resolution. Mirrors the subset of
/// CLI flags that a TOML config file can override.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub admin_password: Option<String>,
    pub enforce_admin_auth: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path to the sqlite content database. `None` selects the in-memory
    /// store, which lives and dies with the process.
    pub db_path: Option<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub admin_password: String,
    pub enforce_admin_auth: bool,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file
    /// config. TOML values override CLI values where present; the admin
    /// password additionally falls back to the `ADMIN_PASSWORD` environment
    /// variable and is required from one of the three sources.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone());

        // The store creates a missing database file, but a missing parent
        // directory at startup is a configuration mistake.
        if let Some(parent) = db_path.as_deref().and_then(|p| p.parent()) {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                bail!("Database directory does not exist: {:?}", parent);
            }
        }

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());

        let admin_password = match file
            .admin_password
            .or_else(|| cli.admin_password.clone())
            .or_else(|| std::env::var(ADMIN_PASSWORD_ENV).ok())
            .filter(|p| !p.is_empty())
        {
            Some(password) => password,
            None => bail!(
                "Admin password must be set via --admin-password, the config file, or {}",
                ADMIN_PASSWORD_ENV
            ),
        };

        let enforce_admin_auth = file.enforce_admin_auth.unwrap_or(cli.enforce_admin_auth);

        Ok(Self {
            db_path,
            port,
            logging_level,
            frontend_dir_path,
            admin_password,
            enforce_admin_auth,
        })
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
