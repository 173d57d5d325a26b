pub mod admin;
pub mod config;
pub mod content;
pub mod server;
pub mod sqlite_persistence;

pub use admin::AdminGate;
pub use config::{AppConfig, CliConfig, FileConfig};
pub use content::{ContentService, ContentStore, MemoryContentStore, SqliteContentStore};
pub use server::{run_server, RequestsLoggingLevel, ServerConfig};
