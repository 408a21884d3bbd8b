// scorematch CLI - fill portal result templates from manual score sheets

mod exit_codes;
mod run;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use scorematch_recon::ReconError;

use exit_codes::{recon_exit_code, EXIT_CONFIG, EXIT_ERROR, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};
use run::{InputArgs, RunArgs};

#[derive(Parser)]
#[command(name = "scorematch")]
#[command(about = "Fill a result-upload template with CA/Exam scores from a manual score sheet")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Log verbosity: -v info, -vv debug (RUST_LOG overrides)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Match the template against the manual sheet and write the reports
    #[command(after_help = "\
Examples:
  scorematch run --manual scores.csv --template portal.csv
  scorematch run --manual scores.csv --template portal.csv --out-dir out --prefix BIO111
  scorematch run --manual scores.csv --template portal.csv --no-fuzzy --fail-on-unmatched
  scorematch run --manual scores.csv --template portal.csv --json > stats.json")]
    Run {
        #[command(flatten)]
        inputs: InputArgs,

        #[command(flatten)]
        args: RunArgs,
    },

    /// Decode both inputs and check their columns without matching
    #[command(after_help = "\
Examples:
  scorematch check --manual scores.csv --template portal.csv
  scorematch check --manual scores.tsv --template portal.tsv --delimiter '\\t'")]
    Check {
        #[command(flatten)]
        inputs: InputArgs,
    },

    /// Inspect configuration files
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Parse and validate a .toml config without running
    #[command(after_help = "\
Examples:
  scorematch config validate bio111.toml")]
    Validate {
        /// Path to the config file
        config: PathBuf,
    },
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  scorematch-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  scorematch-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: scorematch <command> [options]");
            eprintln!("       scorematch --help for more information");
            Ok(())
        }
        Some(Commands::Run { inputs, args }) => run::cmd_run(inputs, args),
        Some(Commands::Check { inputs }) => run::cmd_check(inputs),
        Some(Commands::Config(ConfigCommands::Validate { config })) => run::cmd_config_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG, message: msg.into(), hint: None }
    }

    /// Create error from an engine error with the matching exit code.
    pub fn recon(err: ReconError) -> Self {
        let code = recon_exit_code(&err);
        let hint = match &err {
            ReconError::Schema { .. } => {
                Some("map your header names under [columns.manual] / [columns.template] in a --config file".to_string())
            }
            ReconError::Parse { .. } => {
                Some("inputs must be UTF-8 delimited text; check --delimiter".to_string())
            }
            ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
