//! Configuration file handling.
//!
//! The configuration file is stored at `$MONEY_HOME/config.json`. It names the ledger file,
//! says how many backups of it to keep, and remembers the spending goal between runs.

use crate::backup::Backup;
use crate::error::{ErrorType, IntoResult, Res, Result};
use crate::goal::Goal;
use crate::model::Amount;
use crate::store::LedgerStore;
use crate::utils;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "money";
const CONFIG_VERSION: u8 = 1;
const BACKUP_COPIES: u32 = 5;
const BACKUPS: &str = ".backups";
const CONFIG_JSON: &str = "config.json";
const LEDGER_CSV: &str = "ledger.csv";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$MONEY_HOME` and from there it loads `$MONEY_HOME/config.json`. It provides
/// paths to the ledger file and the backups directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    backups: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    ledger_path: PathBuf,
}

impl Config {
    /// Creates the data directory, its backups subdirectory and an initial `config.json`.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of data directory, e.g. `$HOME/money`
    /// - `ledger_path` - Where the ledger file lives. Relative paths are resolved against `dir`.
    ///   Defaults to `ledger.csv` inside `dir`.
    ///
    /// # Errors
    /// - Returns an error if `config.json` already exists.
    /// - Returns an error if any file operations fail.
    pub(crate) async fn create(dir: impl Into<PathBuf>, ledger_path: Option<PathBuf>) -> Res<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the money home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            bail!(
                "The config file already exists '{}'",
                config_path.display()
            )
        }

        let backups = root.join(BACKUPS);
        utils::make_dir(&backups).await?;

        let config_file = ConfigFile {
            ledger_path,
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        let ledger_path = resolve(&root, config_file.ledger_path());
        Ok(Self {
            root,
            backups,
            config_path,
            config_file,
            ledger_path,
        })
    }

    /// This will
    /// - validate that `money_home` exists and that the config file exists
    /// - load the config file
    /// - validate that the backups directory exists
    /// - return the loaded configuration object
    ///
    /// # Errors
    /// - `ErrorType::Config` if any of the above fails.
    pub async fn load(money_home: impl Into<PathBuf>) -> Result<Self> {
        Self::load_home(money_home.into())
            .await
            .pub_result(ErrorType::Config)
    }

    async fn load_home(maybe_relative: PathBuf) -> Res<Self> {
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("Money home is missing, run 'money init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let config = Self {
            ledger_path: resolve(&root, config_file.ledger_path()),
            backups: root.join(BACKUPS),
            root,
            config_path,
            config_file,
        };
        if !config.backups.is_dir() {
            bail!(
                "The backups directory is missing '{}'",
                config.backups.display()
            )
        }
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backups(&self) -> &Path {
        &self.backups
    }

    pub fn ledger_path(&self) -> &Path {
        &self.ledger_path
    }

    pub fn backup_copies(&self) -> u32 {
        self.config_file.backup_copies
    }

    pub fn goal(&self) -> Goal {
        // A hand-edited negative goal is treated as no goal.
        Goal::new(self.config_file.target_goal).unwrap_or_default()
    }

    /// Records a new spending goal and writes `config.json`.
    pub(crate) async fn save_goal(&mut self, goal: Goal) -> Res<()> {
        let mut config_file = self.config_file.clone();
        config_file.target_goal = goal.target();
        config_file.save(&self.config_path).await?;
        self.config_file = config_file;
        Ok(())
    }

    /// Creates a new `Backup` instance for managing backup files.
    pub(crate) fn backup(&self) -> Backup {
        Backup::new(self)
    }

    /// Creates a `LedgerStore` for the configured ledger file.
    pub fn store(&self) -> LedgerStore {
        LedgerStore::new(&self.ledger_path)
    }
}

/// Returns `p` unchanged if it is absolute, otherwise joins it onto `root`.
fn resolve(root: &Path, p: PathBuf) -> PathBuf {
    if p.is_absolute() {
        return p;
    }
    root.join(p)
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "money",
///   "config_version": 1,
///   "ledger_path": "ledger.csv",
///   "backup_copies": 5,
///   "target_goal": "1500"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "money"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Path to the ledger file (optional, relative to `$MONEY_HOME` or absolute)
    /// Defaults to $MONEY_HOME/ledger.csv if not specified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ledger_path: Option<PathBuf>,

    /// Number of ledger backups to keep
    backup_copies: u32,

    /// The spending limit, zero when unset
    #[serde(default)]
    target_goal: Amount,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            ledger_path: None,
            backup_copies: BACKUP_COPIES,
            target_goal: Amount::ZERO,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        let content = utils::read(path).await?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    pub async fn save(&self, path: impl AsRef<Path>) -> Res<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }

    /// Gets the ledger path. If None, defaults to `ledger.csv`.
    pub fn ledger_path(&self) -> PathBuf {
        self.ledger_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(LEDGER_CSV))
    }
}
