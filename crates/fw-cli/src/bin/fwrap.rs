//! fwrap CLI Binary
//!
//! Generates C-ABI trampolines and a host extension module for a set of
//! Fortran procedures.
//!
//! # Usage
//!
//! ```bash
//! # Resolve kinds with the local compiler and write every artifact
//! fwrap gen interface.json --name mylib --outdir build
//!
//! # Resolve kinds once, then reuse the type spec
//! fwrap probe interface.json --out fwrap_type_specs.json
//! fwrap gen interface.json --name mylib --type-spec fwrap_type_specs.json
//!
//! # Show the names a bound expression depends on
//! fwrap names "size(a, 1) + n"
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use fw_cli::{
    commands::{self, gen::GenArgs, names::NamesArgs, probe::ProbeArgs},
    config::FwrapConfig,
    Result,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "fwrap",
    version = env!("CARGO_PKG_VERSION"),
    about = "fwrap: wrap Fortran procedures for a host language through the C ABI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (use multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Set log level (overrides --verbose/--quiet)
    #[arg(long, global = true, value_enum)]
    log: Option<LogLevel>,

    /// Set log output format
    #[arg(long, global = true, value_enum, default_value = "pretty")]
    log_format: LogFormat,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    directory: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve kinds and generate all wrapper sources
    Gen(GenArgs),

    /// Resolve kinds and write the type spec
    Probe(ProbeArgs),

    /// Print the variable and function names of an expression
    Names(NamesArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(log_filter(cli.verbose, cli.quiet, cli.log), cli.log_format);

    if let Some(dir) = &cli.directory {
        std::env::set_current_dir(dir)?;
    }

    let result = FwrapConfig::load(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Gen(args) => commands::gen_command(args, &config),
        Commands::Probe(args) => commands::probe_command(args, &config),
        Commands::Names(args) => commands::names_command(args, &config),
    });

    match result {
        Ok(()) => {
            if cli.verbose > 0 {
                info!("Command completed successfully");
            }
            Ok(())
        }
        Err(e) => {
            if !fw_cli::diagnostics::render_cli_error(&e) {
                error!("{}", e);
            }
            if cli.verbose > 0 {
                error!(?e, "detailed error context");
            }
            std::process::exit(1);
        }
    }
}

impl LogLevel {
    fn directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// `--log` wins over `--quiet`, which wins over `-v`. With none of them
/// given, `RUST_LOG` is honoured before falling back to `info`.
fn log_filter(verbose: u8, quiet: bool, log_level: Option<LogLevel>) -> EnvFilter {
    let level = match (log_level, quiet, verbose) {
        (Some(level), _, _) => level,
        (None, true, _) => LogLevel::Error,
        (None, false, 0) => {
            return EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(LogLevel::Info.directive()))
        }
        (None, false, 1) => LogLevel::Debug,
        (None, false, _) => LogLevel::Trace,
    };
    EnvFilter::new(level.directive())
}

/// Diagnostics go to stderr so generated text on stdout stays clean.
fn setup_logging(filter: EnvFilter, log_format: LogFormat) {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(fmt::time::uptime());
    let registry = tracing_subscriber::registry().with(filter);
    match log_format {
        LogFormat::Pretty => registry.with(layer).init(),
        LogFormat::Json => registry.with(layer.json()).init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_level_beats_quiet_and_verbose() {
        let filter = log_filter(2, true, Some(LogLevel::Warn));
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn quiet_and_verbose_levels() {
        assert_eq!(log_filter(3, true, None).to_string(), "error");
        assert_eq!(log_filter(1, false, None).to_string(), "debug");
        assert_eq!(log_filter(4, false, None).to_string(), "trace");
    }
}
