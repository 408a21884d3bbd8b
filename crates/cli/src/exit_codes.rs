//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract. Scripts rely on them.
//!
//! | Code | Meaning                                            |
//! |------|----------------------------------------------------|
//! | 0    | Success                                            |
//! | 1    | General error (unspecified)                        |
//! | 2    | CLI usage error (bad args)                         |
//! | 3    | Schema error: a required column is missing         |
//! | 4    | Parse error: an input is not a delimited table     |
//! | 5    | I/O error reading inputs or writing outputs        |
//! | 6    | Config error: TOML parse or validation failure     |
//! | 7    | Unmatched rows present (`--fail-on-unmatched`)     |

use scorematch_recon::ReconError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// A required column is absent from the manual sheet or template.
pub const EXIT_SCHEMA: u8 = 3;

/// An input could not be decoded as a delimited table.
pub const EXIT_PARSE: u8 = 4;

/// Reading an input or writing an output failed.
pub const EXIT_IO: u8 = 5;

/// Config file could not be parsed or failed validation.
pub const EXIT_CONFIG: u8 = 6;

/// Run completed but some template rows found no counterpart.
/// Only returned with `--fail-on-unmatched`.
pub const EXIT_UNMATCHED: u8 = 7;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::Schema { .. } => EXIT_SCHEMA,
        ReconError::Parse { .. } => EXIT_PARSE,
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_CONFIG,
    }
}
