use crate::storage::FileStore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read or write the configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration file: {0}")]
    InvalidConfig(#[from] serde_yml::Error),
}

/// Settings for keeping ledgers on disk.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LedgerConfig {
    /// Directory holding one `<channel>.ron` file per ledger.
    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig { store_dir: default_store_dir() }
    }
}

impl LedgerConfig {
    /// Loads the configuration from `path`, or from [`default_config_path`] if no path is given.
    pub fn try_load<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ConfigError> {
        load_config_file(path)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        save_config_file(path, self)
    }

    /// Opens the file store in the configured directory, creating it if needed.
    pub fn file_store(&self) -> Result<FileStore, ConfigError> {
        Ok(FileStore::new(self.store_dir.clone())?)
    }
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."))
}

pub fn default_config_path() -> PathBuf {
    let mut home = home_dir();
    home.push(".libhtlc");
    home.push("config.yml");
    home
}

pub fn default_store_dir() -> PathBuf {
    let mut home = home_dir();
    home.push(".libhtlc");
    home.push("ledgers");
    home
}

pub fn load_config_file<P: AsRef<Path>>(path: Option<P>) -> Result<LedgerConfig, ConfigError> {
    let path = path.map(|p| p.as_ref().to_path_buf()).unwrap_or_else(default_config_path);
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let config = serde_yml::from_reader(reader)?;
    Ok(config)
}

pub fn save_config_file<P: AsRef<Path>>(path: P, config: &LedgerConfig) -> Result<(), ConfigError> {
    // Create directory path if required
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);
    serde_yml::to_writer(writer, config)?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn save_and_load() {
        let dir = std::env::temp_dir().join(format!("libhtlc-config-{}", std::process::id()));
        let path = dir.join("config.yml");
        let config = LedgerConfig { store_dir: dir.join("ledgers") };
        config.save(&path).unwrap();
        let loaded = LedgerConfig::try_load(Some(&path)).unwrap();
        assert_eq!(loaded, config);
        let store = loaded.file_store().unwrap();
        assert!(store.path().exists());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config: LedgerConfig = serde_yml::from_str("{}").unwrap();
        assert_eq!(config, LedgerConfig::default());
        assert!(config.store_dir.ends_with(".libhtlc/ledgers"));
    }

    #[test]
    fn invalid_file_is_reported() {
        let dir = std::env::temp_dir().join(format!("libhtlc-bad-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.yml");
        std::fs::write(&path, "store_dir: [1, 2").unwrap();
        let err = LedgerConfig::try_load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfig(_)));
        let missing = LedgerConfig::try_load(Some(dir.join("nope.yml"))).unwrap_err();
        assert!(matches!(missing, ConfigError::Io(_)));
        let _ = std::fs::remove_dir_all(dir);
    }
}
