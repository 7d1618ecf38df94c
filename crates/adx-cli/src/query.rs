use std::path::PathBuf;

use adx_query::{Result, open_snapshot};
use clap::Parser;

use crate::ExitStatus;

/// Runs a filter against a snapshot and prints one line per matched object.
#[derive(Parser, Debug)]
pub struct QueryCmd {
    /// Path to the ADExplorer snapshot file.
    pub snapshot: PathBuf,

    /// RFC 4515 filter string, e.g. "(&(objectClass=user)(mail=*))".
    pub filter: String,

    /// Attribute to include in the output; may be repeated. Omit to print
    /// every attribute present on the matched object.
    #[arg(long = "attr")]
    pub attrs: Vec<String>,

    /// Caps the number of matched objects returned.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Prints scan statistics to stderr once the run completes.
    #[arg(long)]
    pub stats: bool,

    /// Matches string values case-sensitively; the LDAP default is
    /// case-insensitive.
    #[arg(long = "case-sensitive")]
    pub case_sensitive: bool,
}

pub fn run(cmd: &QueryCmd) -> Result<ExitStatus> {
    let mut snapshot = open_snapshot(&cmd.snapshot)?;

    let projection = (!cmd.attrs.is_empty()).then(|| cmd.attrs.clone());
    let mut matches = snapshot.query(
        &cmd.filter,
        projection.as_deref(),
        cmd.limit,
        !cmd.case_sensitive,
    )?;

    let mut matched = 0u64;
    for object in &mut matches {
        println!("{}", object.dn);
        for (name, values) in &object.attributes {
            for value in values {
                println!("  {name}: {value}");
            }
        }
        matched += 1;
    }

    if let Some(err) = matches.error() {
        log::error!("snapshot reading stopped early: {err}");
        return Ok(ExitStatus::SnapshotError);
    }

    if cmd.stats {
        let stats = matches.stats();
        eprintln!(
            "scanned={} matched={} decode_errors={} elapsed={:?}",
            stats.objects_scanned, stats.objects_matched, stats.decode_errors, stats.elapsed
        );
    }

    Ok(if matched > 0 {
        ExitStatus::Success
    } else {
        ExitStatus::NoMatches
    })
}
