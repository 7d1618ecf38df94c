//! Offline query engine over ADExplorer-style directory snapshots: opens a
//! snapshot file, parses an RFC 4515 filter, and streams matching,
//! optionally-projected objects.

mod engine;
mod error;
mod snapshot;

pub use adx_codec::HeaderRecord;
pub use adx_schema::Schema;

pub use engine::{ProjectedObject, QueryEngine, QueryRun, Stats};
pub use error::{Error, Result};
pub use snapshot::{Snapshot, open_snapshot};
