//! CLI subcommands.

pub mod config;
pub mod extract;
pub mod output;
pub mod parse;
pub mod process;

use std::path::{Path, PathBuf};

use ledgerline_core::LedgerConfig;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ledgerline")
        .join("config.json")
}

/// Load the configuration from `-c`, else the default file if present, else
/// built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<LedgerConfig> {
    if let Some(path) = config_path {
        return Ok(LedgerConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        Ok(LedgerConfig::from_file(&default_path)?)
    } else {
        Ok(LedgerConfig::default())
    }
}
