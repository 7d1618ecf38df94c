use clap::{Parser, Subcommand};

use crate::dump_header::DumpHeaderCmd;
use crate::query::QueryCmd;

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Runs an RFC 4515 filter against a snapshot and prints matching objects.
    Query(QueryCmd),
    /// Prints the parsed header of a snapshot.
    DumpHeader(DumpHeaderCmd),
}
