use crate::args::InitArgs;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::model::Ledger;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;
use tracing::debug;

/// Creates the data directory, its backups subdirectory and:
/// - Creates an initial `config.json` file with default settings
/// - Writes an empty ledger file (header row only) unless the ledger file already exists
///
/// # Arguments
/// - `money_home` - The directory that will be the root of data directory, e.g. `$HOME/money`
/// - `args` - Optionally names the ledger file, relative to `money_home` or absolute.
///
/// # Errors
/// - Returns an error if `config.json` already exists.
/// - Returns an error if any file operations fail.
pub async fn init(money_home: &Path, args: &InitArgs) -> Result<Out<()>> {
    let config = Config::create(money_home, args.ledger().map(Path::to_path_buf))
        .await
        .context("Unable to create the data directory and configs")
        .pub_result(ErrorType::Config)?;

    let ledger_path = config.ledger_path();
    if ledger_path.is_file() {
        debug!("Using the existing ledger file {}", ledger_path.display());
    } else {
        config.store().save(&Ledger::new()).await?;
    }

    Ok(format!(
        "Successfully created the money directory and config. The ledger is {}",
        ledger_path.display()
    )
    .into())
}
