//! Rotating copies of the ledger file, taken before it is overwritten.

use crate::error::Res;
use crate::{utils, Config};
use anyhow::Context;
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Manages backup file creation and rotation.
///
/// Backups are named `{stem}.YYYY-MM-DD-NNN.{ext}` after the ledger file, e.g.
/// `ledger.2025-03-14-002.csv`, where NNN is a sequence number within the day.
#[derive(Debug, Clone)]
pub struct Backup {
    backups_dir: PathBuf,
    backup_copies: u32,
    ledger_path: PathBuf,
}

impl Backup {
    /// Creates a new `Backup` instance from a `Config`.
    pub fn new(config: &Config) -> Self {
        Self {
            backups_dir: config.backups().to_path_buf(),
            backup_copies: config.backup_copies(),
            ledger_path: config.ledger_path().to_path_buf(),
        }
    }

    /// Copies the ledger file to the backups directory, then deletes the oldest backups so that
    /// at most `backup_copies` remain. Returns `None` when there is no ledger file yet or when
    /// backups are disabled.
    pub async fn copy_ledger(&self) -> Res<Option<PathBuf>> {
        if self.backup_copies == 0 || !self.ledger_path.is_file() {
            return Ok(None);
        }
        let (stem, ext) = stem_and_ext(&self.ledger_path);
        let date = today();

        let existing = self.list(&stem, &ext).await?;
        let seq = existing
            .iter()
            .filter_map(|name| parse_sequence_number(name, &stem, &date, &ext))
            .max()
            .unwrap_or(0)
            + 1;

        let filename = backup_name(&stem, &date, seq, &ext);
        let path = self.backups_dir.join(&filename);
        utils::copy(&self.ledger_path, &path).await?;
        debug!("Saved backup to {}", path.display());

        let mut all = existing;
        all.push(filename);
        self.rotate(all).await?;
        Ok(Some(path))
    }

    /// Names of the backup files for this ledger, sorted oldest first.
    async fn list(&self, stem: &str, ext: &str) -> Res<Vec<String>> {
        let mut names = Vec::new();
        let mut dir = utils::read_dir(&self.backups_dir).await?;
        while let Some(entry) = dir
            .next_entry()
            .await
            .context("Failed to read directory entry")?
        {
            let name = entry.file_name().to_string_lossy().to_string();
            if is_backup_file(&name, stem, ext) {
                names.push(name);
            }
        }
        // The name format sorts by date and then sequence number.
        names.sort();
        Ok(names)
    }

    async fn rotate(&self, mut names: Vec<String>) -> Res<()> {
        names.sort();
        let to_delete = names.len().saturating_sub(self.backup_copies as usize);
        for name in names.into_iter().take(to_delete) {
            utils::remove(self.backups_dir.join(name)).await?;
        }
        Ok(())
    }
}

fn stem_and_ext(path: &Path) -> (String, String) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| String::from("ledger"));
    let ext = path
        .extension()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    (stem, ext)
}

/// Returns today's date in YYYY-MM-DD format.
fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

fn backup_name(stem: &str, date: &str, seq: u32, ext: &str) -> String {
    if ext.is_empty() {
        format!("{stem}.{date}-{seq:03}")
    } else {
        format!("{stem}.{date}-{seq:03}.{ext}")
    }
}

/// Strips `{stem}.` and `.{ext}` from a file name, leaving `YYYY-MM-DD-NNN`.
fn date_and_seq<'a>(filename: &'a str, stem: &str, ext: &str) -> Option<&'a str> {
    let rest = filename.strip_prefix(stem)?.strip_prefix('.')?;
    if ext.is_empty() {
        Some(rest)
    } else {
        rest.strip_suffix(ext)?.strip_suffix('.')
    }
}

/// Parses the sequence number from a backup filename for the given date.
fn parse_sequence_number(filename: &str, stem: &str, date: &str, ext: &str) -> Option<u32> {
    date_and_seq(filename, stem, ext)?
        .strip_prefix(date)?
        .strip_prefix('-')?
        .parse()
        .ok()
}

/// Checks if a filename is a backup of the ledger named `{stem}.{ext}`.
fn is_backup_file(filename: &str, stem: &str, ext: &str) -> bool {
    match date_and_seq(filename, stem, ext) {
        // YYYY-MM-DD-NNN
        Some(middle) => {
            middle.len() == 14
                && middle
                    .chars()
                    .all(|c| c.is_ascii_digit() || c == '-')
        }
        None => false,
    }
}
