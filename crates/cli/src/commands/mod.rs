//! CLI command definitions.
//!
//! Each subcommand maps to one direction of the template sync: a template
//! directory into the store, or the store out to a directory.

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use thiserror::Error;

use template_store::{FileRecordStore, SettingsManager, SyncSettings};

pub mod export;
pub mod import;

/// template-sync - Import and export document templates
#[derive(Parser)]
#[command(name = "template-sync")]
#[command(version, about = "template-sync - Import and export document templates")]
#[command(long_about = r#"
template-sync moves Word (.docx) and Excel (.xlsx) document templates between a
directory and a template store. On import, Word templates bound to an entity
have their embedded object type code rewritten to the code the target
environment uses for that entity.

COMMANDS:
  import  → Create or update stored templates from a directory
  export  → Write every stored template to a directory

EXIT CODES:
  0 - Success
  1 - At least one template failed, or the run was aborted
  2 - Invalid arguments or configuration
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import a template directory into the store
    Import(import::ImportArgs),

    /// Export stored templates to a directory
    Export(export::ExportArgs),
}

/// Outcome of a command that ran to the end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every template was processed
    Completed,
    /// Some templates failed or the run was cancelled
    Incomplete,
}

/// Bad arguments or configuration
#[derive(Debug, Error)]
#[error("{0}")]
pub struct UsageError(pub String);

/// Load sync settings from `config`, or defaults when no file is given
pub fn load_settings(config: Option<&Path>) -> Result<SyncSettings> {
    let Some(path) = config else {
        return Ok(SyncSettings::default());
    };

    if !path.is_file() {
        return Err(UsageError(format!("Config file not found: {}", path.display())).into());
    }

    let mut manager = SettingsManager::new(path);
    let settings = manager
        .load_sync()
        .map_err(|e| UsageError(format!("Cannot read config file {}: {}", path.display(), e)))?;
    Ok(settings.clone())
}

/// Open the file-backed template store
pub fn open_store(directory: &Path) -> Result<FileRecordStore> {
    FileRecordStore::new(directory)
        .with_context(|| format!("Cannot open template store at {}", directory.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::TempDir;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_import() {
        let cli = Cli::try_parse_from([
            "template-sync",
            "import",
            "store",
            "templates",
            "--fail-fast",
            "--verbose",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Import(_)));
    }

    #[test]
    fn test_import_requires_both_directories() {
        assert!(Cli::try_parse_from(["template-sync", "import", "store"]).is_err());
    }

    #[test]
    fn test_missing_config_is_a_usage_error() {
        let dir = TempDir::new().unwrap();
        let err = load_settings(Some(&dir.path().join("missing.json"))).unwrap_err();
        assert!(err.is::<UsageError>());
    }

    #[test]
    fn test_settings_file_is_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sync.json");
        std::fs::write(&path, r#"{"export": {"overwrite": false}}"#).unwrap();

        let settings = load_settings(Some(&path)).unwrap();
        assert!(!settings.export.overwrite);
        assert_eq!(load_settings(None).unwrap(), SyncSettings::default());
    }
}
