use std::path::PathBuf;

use adx_query::{Result, open_snapshot};
use clap::Parser;

use crate::ExitStatus;

/// Prints the parsed header fields of a snapshot without running a query.
#[derive(Parser, Debug)]
pub struct DumpHeaderCmd {
    /// Path to the ADExplorer snapshot file.
    pub snapshot: PathBuf,
}

pub fn run(cmd: &DumpHeaderCmd) -> Result<ExitStatus> {
    let snapshot = open_snapshot(&cmd.snapshot)?;
    let header = snapshot.header_metadata();

    println!("version: {}", header.version);
    println!("created: {}", header.created);
    println!("server_dn: {}", header.server_dn);
    println!("object_count: {}", header.object_count);

    Ok(ExitStatus::Success)
}
