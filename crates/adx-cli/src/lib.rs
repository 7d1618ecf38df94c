//! Command-line driver for the adx-query snapshot query engine.
//!
//! Kept as a library as well as a binary so exit-code selection can be
//! exercised directly in tests without spawning the compiled process.

pub mod cli;
pub mod dump_header;
pub mod query;

use std::process::ExitCode;

pub use cli::{Cli, Commands};

/// The outcome of a run, independent of the opaque [`ExitCode`] the process
/// ultimately reports. `std::process::ExitCode` carries no public accessor,
/// so this is what tests assert against.
///
/// `0` match-with-results, `1` no-matches, `2` filter syntax error, `3`
/// snapshot I/O or corruption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    NoMatches,
    FilterError,
    SnapshotError,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::NoMatches => 1,
            ExitStatus::FilterError => 2,
            ExitStatus::SnapshotError => 3,
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}

/// Runs a parsed invocation and returns the outcome.
pub fn run_status(cli: &Cli) -> ExitStatus {
    let result = match &cli.command {
        Commands::Query(cmd) => query::run(cmd),
        Commands::DumpHeader(cmd) => dump_header::run(cmd),
    };

    match result {
        Ok(status) => status,
        Err(err) => {
            log::error!("{err}");
            match err {
                adx_query::Error::Filter(_) => ExitStatus::FilterError,
                adx_query::Error::Codec(_) => ExitStatus::SnapshotError,
            }
        }
    }
}

/// Runs a parsed invocation and returns the process exit code.
pub fn run(cli: &Cli) -> ExitCode {
    run_status(cli).into()
}
