//! The open-snapshot handle: the entry point the CLI (and any other
//! driver) uses to inspect a snapshot's header and run queries against it.

use std::path::Path;

use adx_codec::{HeaderRecord, SnapshotReader};
use adx_schema::Schema;

use crate::engine::{QueryEngine, QueryRun};
use crate::error::Result;

/// An opened, fully header-and-schema-parsed snapshot. Object records are
/// not read until a query runs.
pub struct Snapshot {
    reader: SnapshotReader,
}

impl Snapshot {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Snapshot {
            reader: SnapshotReader::open(path)?,
        })
    }

    pub fn header_metadata(&self) -> HeaderRecord {
        self.reader.dump_header()
    }

    pub fn schema(&self) -> &Schema {
        self.reader.schema()
    }

    /// Parses `filter_text` and returns a lazy sequence of matching,
    /// projected objects. `projection` selects which attributes are
    /// emitted per match (by name, matched case-insensitively); `None`
    /// emits every attribute present on the object. `limit` caps the
    /// number of *matches* returned, applied after filtering.
    pub fn query(
        &mut self,
        filter_text: &str,
        projection: Option<&[String]>,
        limit: Option<usize>,
        case_insensitive: bool,
    ) -> Result<QueryRun<'_>> {
        QueryEngine::run(&mut self.reader, filter_text, projection, limit, case_insensitive)
    }
}

/// Opens and fully parses the header and schema sections of the snapshot at
/// `path`.
pub fn open_snapshot(path: impl AsRef<Path>) -> Result<Snapshot> {
    Snapshot::open(path)
}
