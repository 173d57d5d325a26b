use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use parish_site_server::config::{AppConfig, CliConfig, FileConfig};
use parish_site_server::content::{ContentService, ContentStore, MemoryContentStore, SqliteContentStore};
use parish_site_server::server::{run_server, RequestsLoggingLevel, ServerConfig};
use parish_site_server::AdminGate;

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML config file. Values set there override CLI flags.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Path to the SQLite content database file. Omit to keep all content
    /// in memory for the life of the process.
    #[clap(long, value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3000)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,

    /// The admin password. Falls back to the ADMIN_PASSWORD environment
    /// variable when not set here or in the config file.
    #[clap(long)]
    pub admin_password: Option<String>,

    /// Require a session token on content-mutating endpoints.
    #[clap(long, default_value_t = false)]
    pub enforce_admin_auth: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };

    let cli_config = CliConfig {
        db_path: cli_args.db_path,
        port: cli_args.port,
        logging_level: cli_args.logging_level,
        frontend_dir_path: cli_args.frontend_dir_path,
        admin_password: cli_args.admin_password,
        enforce_admin_auth: cli_args.enforce_admin_auth,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    let store: Arc<dyn ContentStore> = match &config.db_path {
        Some(path) => {
            info!("Using content database at {:?}", path);
            Arc::new(SqliteContentStore::new(path)?)
        }
        None => {
            info!("No database path given, content will not survive a restart");
            Arc::new(MemoryContentStore::new())
        }
    };

    let content = Arc::new(ContentService::new(store));
    let admin_gate = Arc::new(AdminGate::new(
        config.admin_password.clone(),
        config.enforce_admin_auth,
    ));

    let server_config = ServerConfig {
        requests_logging_level: config.logging_level.clone(),
        port: config.port,
        frontend_dir_path: config.frontend_dir_path.clone(),
    };

    run_server(content, admin_gate, server_config).await
}
