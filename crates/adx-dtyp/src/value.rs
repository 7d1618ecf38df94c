//! The decoded [`Value`] union and the pure decoders that produce it.

use crate::filetime::FileTime;
use crate::guid::Guid;
use crate::sid::Sid;
use std::fmt::Display;

/// A single decoded attribute value. The tag matches the attribute's
/// declared [`crate::syntax::SyntaxCode`], except for `Unknown`, which a
/// decoder produces when it fails to interpret the bytes as the declared
/// syntax without aborting the whole object.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Boolean(bool),
    Guid(Guid),
    Sid(Sid),
    Timestamp(FileTime),
    Dn(String),
    Binary(Vec<u8>),
    Unknown(Vec<u8>),
}

impl Value {
    /// Renders the value the way it is surfaced to a query caller: GUIDs and
    /// SIDs in canonical textual form, timestamps as RFC3339 (or `"never"`),
    /// and any binary payload as lowercase hex.
    pub fn render(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Boolean(b) => b.to_string().to_uppercase(),
            Value::Guid(g) => g.to_string(),
            Value::Sid(s) => s.to_string(),
            Value::Timestamp(t) => t.to_string(),
            Value::Dn(dn) => dn.clone(),
            Value::Binary(b) | Value::Unknown(b) => hex::encode(b),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Dn(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Decodes a little-endian UTF-16 byte sequence, substituting `U+FFFD` for
/// any code unit that does not form a valid scalar value or surrogate pair.
/// Never fails.
pub fn decode_utf16le(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();
    char::decode_utf16(units)
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// Decodes a 16-byte GUID blob. Pure and infallible given exactly 16 bytes;
/// callers are responsible for validating the length beforehand.
pub fn decode_guid(bytes: &[u8; 16]) -> Guid {
    Guid::from_bytes(bytes)
}

/// Decodes a Windows binary SID. Returns `None` if the declared
/// sub-authority count does not fit within the supplied bytes.
pub fn decode_sid(bytes: &[u8]) -> Option<Sid> {
    use binrw::BinRead;
    let mut cursor = std::io::Cursor::new(bytes);
    Sid::read_le(&mut cursor).ok()
}

/// Decodes an 8-byte little-endian FILETIME value.
pub fn decode_filetime(bytes: &[u8; 8]) -> FileTime {
    FileTime::from_filetime_units(u64::from_le_bytes(*bytes))
}
