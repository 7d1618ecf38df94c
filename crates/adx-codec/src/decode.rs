//! Type-dependent decoding of a single attribute value blob, given the
//! attribute's declared syntax. Never fails outright: a blob that cannot be
//! decoded as its declared syntax is demoted to [`Value::Unknown`] and
//! logged, per the snapshot reader's non-fatal failure policy for
//! individual values.

use adx_dtyp::{SyntaxCode, Value, decode_filetime, decode_guid, decode_sid, decode_utf16le};
use adx_schema::{AttributeDef, Schema};

use crate::cursor::ByteCursor;

/// A per-value decode failure. Not part of [`crate::error::CodecError`]:
/// the reader logs this and continues, demoting the value to
/// [`Value::Unknown`] and counting it rather than aborting the object.
#[derive(Debug, Clone)]
pub struct DecodeWarning {
    pub attribute: String,
    pub reason: String,
}

pub(crate) fn decode_value(
    attr: &AttributeDef,
    bytes: &[u8],
    schema: &Schema,
    warnings: &mut u64,
) -> Value {
    match try_decode(attr, bytes, schema) {
        Ok(value) => value,
        Err(reason) => {
            log::warn!(
                "failed to decode value for attribute '{}' as {:?}: {}",
                attr.name,
                attr.syntax,
                reason
            );
            *warnings += 1;
            Value::Unknown(bytes.to_vec())
        }
    }
}

fn try_decode(attr: &AttributeDef, bytes: &[u8], schema: &Schema) -> Result<Value, String> {
    match attr.syntax {
        SyntaxCode::String => Ok(Value::String(decode_utf16le(bytes))),
        SyntaxCode::Integer => {
            let arr: [u8; 8] = bytes
                .try_into()
                .map_err(|_| format!("expected 8 bytes for integer, got {}", bytes.len()))?;
            Ok(Value::Integer(i64::from_le_bytes(arr)))
        }
        SyntaxCode::Boolean => {
            let byte = bytes
                .first()
                .copied()
                .ok_or_else(|| "expected at least 1 byte for boolean".to_string())?;
            Ok(Value::Boolean(byte != 0))
        }
        SyntaxCode::Guid => {
            let arr: [u8; 16] = bytes
                .try_into()
                .map_err(|_| format!("expected 16 bytes for GUID, got {}", bytes.len()))?;
            Ok(Value::Guid(decode_guid(&arr)))
        }
        SyntaxCode::Sid => {
            decode_sid(bytes).map(Value::Sid).ok_or_else(|| "malformed SID bytes".to_string())
        }
        SyntaxCode::FileTime => {
            let arr: [u8; 8] = bytes
                .try_into()
                .map_err(|_| format!("expected 8 bytes for FILETIME, got {}", bytes.len()))?;
            Ok(Value::Timestamp(decode_filetime(&arr)))
        }
        SyntaxCode::OctetString | SyntaxCode::SecurityDescriptor => Ok(Value::Binary(bytes.to_vec())),
        SyntaxCode::Dn => {
            let mut cursor = ByteCursor::new(bytes);
            let prefix_id = cursor
                .read_u32()
                .map_err(|e| format!("malformed DN prefix id: {e}"))?;
            let suffix = cursor
                .read_unicode()
                .map_err(|e| format!("malformed DN suffix: {e}"))?;
            let dn = schema
                .resolve_dn(prefix_id, &suffix)
                .map_err(|e| format!("unresolvable DN: {e}"))?;
            Ok(Value::Dn(dn))
        }
        SyntaxCode::OtherBinary => Ok(Value::Unknown(bytes.to_vec())),
    }
}

/// Maps the raw wire syntax code to its [`SyntaxCode`] tag. Values this
/// reader does not recognize fall back to [`SyntaxCode::OtherBinary`],
/// which always decodes to [`Value::Unknown`] rather than failing the
/// whole object.
pub(crate) fn syntax_code_from_wire(code: u32) -> SyntaxCode {
    match code {
        0 => SyntaxCode::String,
        1 => SyntaxCode::Integer,
        2 => SyntaxCode::Boolean,
        3 => SyntaxCode::Guid,
        4 => SyntaxCode::Sid,
        5 => SyntaxCode::FileTime,
        6 => SyntaxCode::OctetString,
        7 => SyntaxCode::Dn,
        8 => SyntaxCode::SecurityDescriptor,
        _ => SyntaxCode::OtherBinary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adx_schema::PrefixTable;

    fn schema_with(attr: AttributeDef) -> Schema {
        Schema::build(vec![attr], vec![], PrefixTable::new(vec!["DC=corp,".into()]))
    }

    #[test]
    fn demotes_wrong_length_integer_to_unknown() {
        let attr = AttributeDef::new(0, "badInt", SyntaxCode::Integer, true);
        let schema = schema_with(attr.clone());
        let mut warnings = 0;
        let value = decode_value(&attr, &[1, 2, 3], &schema, &mut warnings);
        assert_eq!(value, Value::Unknown(vec![1, 2, 3]));
        assert_eq!(warnings, 1);
    }

    #[test]
    fn decodes_valid_boolean() {
        let attr = AttributeDef::new(0, "isCritical", SyntaxCode::Boolean, true);
        let schema = schema_with(attr.clone());
        let mut warnings = 0;
        let value = decode_value(&attr, &[1], &schema, &mut warnings);
        assert_eq!(value, Value::Boolean(true));
        assert_eq!(warnings, 0);
    }

    #[test]
    fn unrecognized_syntax_code_maps_to_other_binary() {
        assert_eq!(syntax_code_from_wire(99), SyntaxCode::OtherBinary);
    }
}
