//! Binary decoding of ADExplorer-style directory snapshot files: the
//! bounds-checked cursor, header and schema-section parsing, and the
//! streaming object-record reader.

mod cursor;
mod decode;
mod error;
mod header;
mod object;
mod reader;

pub use cursor::ByteCursor;
pub use error::{CodecError, Result};
pub use header::{Header, HeaderRecord, SIGNATURE, SUPPORTED_VERSIONS};
pub use object::Object;
pub use reader::{DecodeWarning, ObjectIter, SnapshotReader};
