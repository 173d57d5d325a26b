use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub db_path: Option<String>,
    pub port: Option<u16>,
    pub logging_level: Option<String>,
    pub frontend_dir_path: Option<String>,
    pub admin_password: Option<String>,
    pub enforce_admin_auth: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_partial_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 4000\nenforce_admin_auth = true").unwrap();

        let config = FileConfig::load(file.path()).unwrap();
        assert_eq!(config.port, Some(4000));
        assert_eq!(config.enforce_admin_auth, Some(true));
        assert!(config.db_path.is_none());
    }

    #[test]
    fn rejects_malformed_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = = 4000").unwrap();
        assert!(FileConfig::load(file.path()).is_err());
    }
}
