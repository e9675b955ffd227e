use crate::ledger::BalanceProof;
use crate::storage::traits::LedgerStore;
use log::*;
use ron::ser::PrettyConfig;
use std::fs;
use std::path::PathBuf;

/// A file-based store for balance proofs.
///
/// Each ledger is saved in a file named after its channel, e.g. `channel-0x3f21.ron`
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a new file store with the given path.
    ///
    /// # Arguments
    /// * `path` - The path to the directory where the ledger files will be stored.
    pub fn new(path: PathBuf) -> Result<Self, std::io::Error> {
        if !path.exists() {
            fs::create_dir_all(&path)?;
        }
        Ok(Self { path })
    }

    /// Returns the path to the directory where the ledger files are stored.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.path.join(format!("{name}.ron"))
    }
}

impl LedgerStore for FileStore {
    fn write_ledger(&mut self, name: &str, ledger: &BalanceProof) -> Result<(), anyhow::Error> {
        let file_path = self.file_path(name);
        let config = PrettyConfig::new().compact_arrays(true).compact_maps(true);
        let val = ron::ser::to_string_pretty(ledger, config)?;
        fs::write(&file_path, &val)?;
        debug!("Ledger {name} saved to {}", file_path.display());
        Ok(())
    }

    fn load_ledger(&self, name: &str) -> Result<BalanceProof, anyhow::Error> {
        let val = fs::read_to_string(self.file_path(name))?;
        let ledger: BalanceProof = ron::de::from_str(&val)?;
        Ok(ledger)
    }
}
