//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::{utils, Config};
use chrono::NaiveDate;
use tempfile::TempDir;

/// Test environment that sets up a money home directory with a Config.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a test environment with a Config and no ledger file.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("money");
        let config = Config::create(&root, None).await.unwrap();
        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    /// Overwrites the ledger file with `contents`.
    pub async fn write_ledger(&self, contents: &str) {
        utils::write(self.config.ledger_path(), contents)
            .await
            .unwrap();
    }

    /// Reads the ledger file.
    pub async fn read_ledger(&self) -> String {
        utils::read(self.config.ledger_path()).await.unwrap()
    }

    /// The number of files in the backups directory.
    pub async fn backup_count(&self) -> usize {
        let mut dir = utils::read_dir(self.config.backups()).await.unwrap();
        let mut count = 0;
        while dir.next_entry().await.unwrap().is_some() {
            count += 1;
        }
        count
    }
}

/// A date in May 2025.
pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
}
