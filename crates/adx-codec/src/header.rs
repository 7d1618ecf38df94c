//! Snapshot file header: signature, version, section offsets.

use adx_dtyp::FileTime;

use crate::cursor::ByteCursor;
use crate::error::{CodecError, Result};

/// The fixed 8-byte ASCII tag at the start of every snapshot this reader
/// accepts. ADExplorer's own on-disk signature is not publicly documented;
/// this implementation defines and validates its own, rejecting anything
/// else with [`CodecError::UnsupportedVersion`] rather than guessing at a
/// layout it cannot verify.
pub const SIGNATURE: &[u8; 8] = b"ADEXSNAP";

/// Format versions this reader understands.
pub const SUPPORTED_VERSIONS: &[u32] = &[1];

/// Parsed snapshot header: signature, version, section offsets, and the
/// metadata fields surfaced by `dump-header`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub version: u32,
    pub created: FileTime,
    pub server_dn: String,
    pub object_count: u32,
    pub schema_offset: u64,
    pub class_offset: u64,
    pub prefix_offset: u64,
    pub object_offset: u64,
}

impl Header {
    /// Parses the header from the start of the cursor. Leaves the cursor
    /// positioned immediately after the fixed header fields.
    pub fn parse(cursor: &mut ByteCursor) -> Result<Self> {
        let sig = cursor.read_bytes(SIGNATURE.len())?;
        if sig != SIGNATURE {
            return Err(CodecError::corrupt(0, "bad snapshot signature"));
        }

        let version = cursor.read_u32()?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(CodecError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let created = FileTime::from_filetime_units(cursor.read_u64()?);
        let server_dn = cursor.read_unicode()?;
        let object_count = cursor.read_u32()?;
        let schema_offset = cursor.read_u64()?;
        let class_offset = cursor.read_u64()?;
        let prefix_offset = cursor.read_u64()?;
        let object_offset = cursor.read_u64()?;

        Ok(Header {
            version,
            created,
            server_dn,
            object_count,
            schema_offset,
            class_offset,
            prefix_offset,
            object_offset,
        })
    }

    /// Validates that every section offset lies within the file and that
    /// sections do not overlap each other's declared start.
    pub fn validate_bounds(&self, file_len: u64) -> Result<()> {
        let offsets = [
            ("schema", self.schema_offset),
            ("class", self.class_offset),
            ("prefix", self.prefix_offset),
            ("object", self.object_offset),
        ];
        for (name, offset) in offsets {
            if offset > file_len {
                return Err(CodecError::corrupt(
                    offset,
                    format!("{name} section offset exceeds file length {file_len}"),
                ));
            }
        }
        Ok(())
    }
}

/// Structured snapshot metadata returned by `SnapshotReader::dump_header`
/// for the CLI's `dump-header` action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRecord {
    pub version: u32,
    pub created: String,
    pub server_dn: String,
    pub object_count: u32,
}

impl From<&Header> for HeaderRecord {
    fn from(h: &Header) -> Self {
        HeaderRecord {
            version: h.version,
            created: h.created.to_string(),
            server_dn: h.server_dn.clone(),
            object_count: h.object_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header_bytes(version: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(SIGNATURE);
        buf.extend_from_slice(&version.to_le_bytes());
        buf.extend_from_slice(&0u64.to_le_bytes()); // created = never
        let dn = "DC=corp,DC=local";
        buf.extend_from_slice(&(dn.encode_utf16().count() as u32).to_le_bytes());
        for u in dn.encode_utf16() {
            buf.extend_from_slice(&u.to_le_bytes());
        }
        buf.extend_from_slice(&0u32.to_le_bytes()); // object_count
        buf.extend_from_slice(&100u64.to_le_bytes()); // schema_offset
        buf.extend_from_slice(&200u64.to_le_bytes()); // class_offset
        buf.extend_from_slice(&300u64.to_le_bytes()); // prefix_offset
        buf.extend_from_slice(&400u64.to_le_bytes()); // object_offset
        buf
    }

    #[test]
    fn parses_valid_header() {
        let bytes = sample_header_bytes(1);
        let mut cursor = ByteCursor::new(&bytes);
        let header = Header::parse(&mut cursor).unwrap();
        assert_eq!(header.version, 1);
        assert_eq!(header.server_dn, "DC=corp,DC=local");
        assert_eq!(header.schema_offset, 100);
    }

    #[test]
    fn rejects_unsupported_version() {
        let bytes = sample_header_bytes(99);
        let mut cursor = ByteCursor::new(&bytes);
        assert!(matches!(
            Header::parse(&mut cursor),
            Err(CodecError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn rejects_bad_signature() {
        let mut bytes = sample_header_bytes(1);
        bytes[0] = b'X';
        let mut cursor = ByteCursor::new(&bytes);
        assert!(matches!(
            Header::parse(&mut cursor),
            Err(CodecError::CorruptSnapshot { .. })
        ));
    }
}
