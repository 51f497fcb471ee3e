//! Configuration initialization for remove-glob
//!
//! Writes a commented config template for `remove --init-config`.

use crate::config::Config;
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Default config template mirroring the built-in behavior
const CONFIG_TEMPLATE: &str = r#"# remove-glob configuration
# Location: ~/.config/remove-glob/config.toml
#
# Settings here apply when the matching command line flag is not given.

# Patterns never matched by --glob. Replaces the built-in list below.
# Set to [] to disable protection entirely.
exclude = ["**/.git/**", "**/.git", "**/node_modules/**", "**/node_modules"]

# Let wildcards match dotfiles (same as --all, undone by --no-all)
all = false

# Always print the number of items and duration (same as --stat, undone by --no-stat)
stat = false
"#;

/// Result of writing the template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    Created(PathBuf),
    /// An existing file is never overwritten
    AlreadyExists(PathBuf),
}

/// Write the config template to `path`, creating parent directories
pub fn write_template(path: &Path) -> Result<InitOutcome> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create directory {}", dir.display()))?;
    }

    let file = OpenOptions::new().write(true).create_new(true).open(path);
    let mut file = match file {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Ok(InitOutcome::AlreadyExists(path.to_path_buf()));
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Cannot create config file {}", path.display()));
        }
    };
    file.write_all(CONFIG_TEMPLATE.as_bytes())
        .with_context(|| format!("Cannot write config file {}", path.display()))?;

    Ok(InitOutcome::Created(path.to_path_buf()))
}

/// Handle `--init-config`: write the template at the configured location
pub fn run_init() -> Result<InitOutcome> {
    let path = Config::config_path().context("Cannot determine config directory")?;
    let outcome = write_template(&path)?;
    match &outcome {
        InitOutcome::Created(path) => {
            println!("Created config file: {}", path.display());
        }
        InitOutcome::AlreadyExists(path) => {
            eprintln!(
                "Config file already exists: {} (delete it to regenerate)",
                path.display()
            );
        }
    }
    Ok(outcome)
}

/// Get the config path for display purposes
pub fn config_path_display() -> String {
    Config::config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "~/.config/remove-glob/config.toml".to_string())
}
