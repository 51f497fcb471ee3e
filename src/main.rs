//! remove-glob: remove files and directories by path or glob pattern
//!
//! Thin binary around the library: parses arguments, merges the user
//! config, runs the removal and maps errors to exit codes.

use std::process::ExitCode;

use remove_glob::cli::CliArgs;
use remove_glob::config::Config;
use remove_glob::error::RemoveError;
use remove_glob::init;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_logging();

    let args = CliArgs::parse_args();

    if args.version {
        println!("remove {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    if args.init_config {
        return match init::run_init() {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("remove: {:#}", e);
                ExitCode::FAILURE
            }
        };
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("remove: {}", e);
            e.exit_code().into()
        }
    }
}

/// Diagnostics go to stderr, filtered by REMOVE_GLOB_LOG (default: warn)
fn init_logging() {
    let filter = EnvFilter::try_from_env("REMOVE_GLOB_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main execution logic
fn run(args: &CliArgs) -> Result<(), RemoveError> {
    let config = Config::load();
    debug!(
        event = "config.loaded",
        path = %init::config_path_display(),
        exclude = ?config.exclude_patterns()
    );

    let mut opts = args.to_options();
    config.apply_defaults(&mut opts, args.flag_overrides());

    let existed = remove_glob::remove(&opts)?;
    debug!(event = "remove.completed", any_existed = existed);

    Ok(())
}
