// src/config.rs
use crate::error::AppError;
use clap::Parser;
use std::default::Default;
use std::path::{Path, PathBuf};

/// Default vault directory, relative to the working directory.
const DEFAULT_VAULT_DIR: &str = "vault";

/// Attachment directory name next to the index file.
const DEFAULT_FILES_DIR: &str = "files";

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Record-map export (JSON index of blocks, collections, discussions...)
    pub index: PathBuf,

    /// Tree snapshot listing the top-level pages to convert
    pub tree: PathBuf,

    /// Directory the vault is written to
    #[arg(short = 'o', long)]
    pub vault_dir: Option<PathBuf>,

    /// Directory holding attachments as <attachment id>/<filename> (defaults to <INDEX dir>/files)
    #[arg(short = 'f', long)]
    pub files_dir: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Compute the output plan without writing anything
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Print a feature report of the export and exit
    #[arg(long, default_value_t = false)]
    pub report: bool,
}

/// Resolved conversion configuration, validated and ready to drive all three stages.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionConfig {
    pub index_path: PathBuf,
    pub tree_path: PathBuf,
    pub vault_dir: PathBuf,
    pub files_dir: PathBuf,
    pub verbose: bool,
    pub dry_run: bool,
    pub report: bool,
}

impl ConversionConfig {
    /// Resolves a complete configuration from CLI input.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        require_file(&cli.index, "index")?;
        if !cli.report {
            require_file(&cli.tree, "tree snapshot")?;
        }

        let files_dir = cli.files_dir.unwrap_or_else(|| {
            cli.index
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(DEFAULT_FILES_DIR)
        });
        if !files_dir.is_dir() {
            log::warn!(
                "Attachment directory {} does not exist; attachments will fail to copy",
                files_dir.display()
            );
        }

        Ok(ConversionConfig {
            index_path: cli.index,
            tree_path: cli.tree,
            vault_dir: cli
                .vault_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_VAULT_DIR)),
            files_dir,
            verbose: cli.verbose,
            dry_run: cli.dry_run,
            report: cli.report,
        })
    }
}

fn require_file(path: &Path, what: &str) -> Result<(), AppError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(AppError::MissingConfiguration(format!(
            "{} file not found: {}",
            what,
            path.display()
        )))
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            index_path: PathBuf::from("index.json"),
            tree_path: PathBuf::from("tree.json"),
            vault_dir: PathBuf::from(DEFAULT_VAULT_DIR),
            files_dir: PathBuf::from(DEFAULT_FILES_DIR),
            verbose: false,
            dry_run: false,
            report: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cli(dir: &Path, extra: &[&str]) -> CommandLineInput {
        let index = dir.join("index.json");
        let tree = dir.join("tree.json");
        let mut args = vec![
            "notion2obsidian".to_string(),
            index.display().to_string(),
            tree.display().to_string(),
        ];
        args.extend(extra.iter().map(|a| a.to_string()));
        CommandLineInput::parse_from(args)
    }

    #[test]
    fn test_defaults_follow_index_location() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("index.json"), "{}").unwrap();
        std::fs::write(dir.path().join("tree.json"), "{}").unwrap();

        let config = ConversionConfig::resolve(cli(dir.path(), &[])).unwrap();
        assert_eq!(config.files_dir, dir.path().join("files"));
        assert_eq!(config.vault_dir, PathBuf::from("vault"));
        assert!(!config.dry_run);

        let config =
            ConversionConfig::resolve(cli(dir.path(), &["-o", "out", "--dry-run", "-v"])).unwrap();
        assert_eq!(config.vault_dir, PathBuf::from("out"));
        assert!(config.dry_run && config.verbose);
    }

    #[test]
    fn test_missing_inputs() {
        let dir = TempDir::new().unwrap();
        let err = ConversionConfig::resolve(cli(dir.path(), &[])).unwrap_err();
        assert!(matches!(err, AppError::MissingConfiguration(_)));

        // The report only needs the index
        std::fs::write(dir.path().join("index.json"), "{}").unwrap();
        assert!(ConversionConfig::resolve(cli(dir.path(), &["--report"])).is_ok());
    }
}
