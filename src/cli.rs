//! CLI argument parser for remove-glob
//!
//! Provides type-safe argument parsing using clap derive.

use crate::config::FlagOverrides;
use crate::options::RemoveOptions;
use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for remove-glob
#[derive(Parser, Debug)]
#[command(
    name = "remove",
    about = "Remove all items recursively",
    long_about = "Remove files and directories given as paths or matched by glob patterns.\n\
                  Glob matching never enters .git or node_modules unless --exclude or\n\
                  --no-exclude overrides the protective defaults.",
    after_help = "Examples:\n  \
                  remove foo bar                          Remove \"foo\" and \"bar\"\n  \
                  remove --glob \"dist/**/*.js\"            Remove every .js file under dist\n  \
                  remove -g \"src/*.js\" -g \"!src/*.spec.js\"  Keep the spec files",
    disable_version_flag = true
)]
pub struct CliArgs {
    /// Directory or file paths to remove
    #[arg(value_name = "PATH")]
    pub paths: Vec<String>,

    /// Glob pattern(s) to find which files/dirs to remove (prefix with ! to negate)
    #[arg(short = 'g', long = "glob", value_name = "PATTERN")]
    pub glob: Vec<String>,

    /// Directory to resolve from (default ".")
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Show which files/dirs would be deleted but without actually removing them
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Log each file or directory being removed
    #[arg(short = 'V', long)]
    pub verbose: bool,

    /// Show the stats of the items being removed
    #[arg(short = 's', long, overrides_with = "no_stat")]
    pub stat: bool,

    /// Do not show stats, even if the config file enables them
    #[arg(long, overrides_with = "stat")]
    pub no_stat: bool,

    /// Glob pattern(s) to exclude from deletion (overrides the default patterns)
    #[arg(short = 'e', long, value_name = "PATTERN", conflicts_with = "no_exclude")]
    pub exclude: Vec<String>,

    /// Disable the default exclusions (.git, node_modules)
    #[arg(long)]
    pub no_exclude: bool,

    /// Include dotfiles when matching glob patterns
    #[arg(short = 'a', long, overrides_with = "no_all")]
    pub all: bool,

    /// Leave dotfiles out of glob matches, even if the config file includes them
    #[arg(long, overrides_with = "all")]
    pub no_all: bool,

    /// Write a commented config file (~/.config/remove-glob/config.toml) and exit
    #[arg(long, conflicts_with_all = ["paths", "glob"])]
    pub init_config: bool,

    /// Print version
    #[arg(long)]
    pub version: bool,
}

impl CliArgs {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Normalize into the options record
    pub fn to_options(&self) -> RemoveOptions {
        let mut opts = RemoveOptions::default()
            .paths(self.paths.iter().cloned())
            .dry_run(self.dry_run)
            .verbose(self.verbose)
            .stat(self.stat)
            .include_dotfiles(self.all);

        if !self.glob.is_empty() {
            opts = opts.glob(self.glob.iter().cloned());
        }
        if let Some(cwd) = &self.cwd {
            opts = opts.cwd(cwd);
        }
        if self.no_exclude {
            opts = opts.exclude(Vec::<String>::new());
        } else if !self.exclude.is_empty() {
            opts = opts.exclude(self.exclude.iter().cloned());
        }
        opts
    }

    /// Flags given explicitly on the command line, `None` when left to the config file
    pub fn flag_overrides(&self) -> FlagOverrides {
        FlagOverrides {
            all: explicit(self.all, self.no_all),
            stat: explicit(self.stat, self.no_stat),
        }
    }
}

fn explicit(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}
