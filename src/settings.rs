use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const SETTINGS_FILE: &str = "settings.json";
const DB_FILE: &str = "casafin.db";

/// Where casafin keeps its files.
#[derive(Debug, Clone)]
pub(crate) struct Paths {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl Paths {
    /// Platform config/data directories (XDG on Linux).
    pub(crate) fn from_platform() -> Result<Self> {
        let proj_dirs = directories::ProjectDirs::from("com", "casafin", "casafin")
            .context("Could not determine config and data directories")?;
        Ok(Self {
            config_dir: proj_dirs.config_dir().to_path_buf(),
            data_dir: proj_dirs.data_dir().to_path_buf(),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_base_dir(base: &Path) -> Self {
        Self {
            config_dir: base.join("config"),
            data_dir: base.join("data"),
        }
    }

    pub(crate) fn settings_file(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE)
    }

    pub(crate) fn default_db_file(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Settings {
    #[serde(default = "default_currency_symbol")]
    pub(crate) currency_symbol: String,

    #[serde(default = "default_currency")]
    pub(crate) currency: String,

    /// Overrides the database location in the data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) db_path: Option<PathBuf>,

    /// Invoices due within this many days show up as upcoming bills.
    #[serde(default = "default_bill_warning_days")]
    pub(crate) bill_warning_days: i64,

    /// Account used by `txn add` when none is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) default_account: Option<String>,
}

fn default_currency_symbol() -> String {
    "R$".to_string()
}

fn default_currency() -> String {
    "BRL".to_string()
}

fn default_bill_warning_days() -> i64 {
    7
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            currency: default_currency(),
            db_path: None,
            bill_warning_days: default_bill_warning_days(),
            default_account: None,
        }
    }
}

impl Settings {
    /// Read the settings file, falling back to defaults when it does not exist.
    pub(crate) fn load(paths: &Paths) -> Result<Self> {
        let path = paths.settings_file();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    pub(crate) fn save(&self, paths: &Paths) -> Result<()> {
        let path = paths.settings_file();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        }
        let contents = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write settings file: {}", path.display()))
    }

    /// Database file: explicit override (flag or `CASAFIN_DB`), then the
    /// settings file, then the data directory. Creates the parent directory.
    pub(crate) fn resolve_db_path(
        &self,
        paths: &Paths,
        override_path: Option<PathBuf>,
    ) -> Result<PathBuf> {
        let path = override_path
            .or_else(|| self.db_path.clone())
            .unwrap_or_else(|| paths.default_db_file());
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
        }
        Ok(path)
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
