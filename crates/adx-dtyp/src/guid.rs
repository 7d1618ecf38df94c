//! 128-bit GUID with the mixed-endian textual form used throughout MS-DTYP.

use std::fmt::Display;
use std::io::Cursor;
use std::str::FromStr;

use binrw::prelude::*;

/// A 16-byte GUID, stored as four little-endian fields on the wire but
/// rendered with the last two fields in big-endian order (the Windows
/// `{xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx}` convention).
#[derive(BinRead, BinWrite, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[brw(little)]
pub struct Guid(u32, u16, u16, [u8; 8]);

#[derive(Debug, thiserror::Error)]
pub enum GuidParseError {
    #[error("GUID must have 5 hyphen-separated components")]
    WrongComponentCount,
    #[error("invalid hex digit in GUID component")]
    InvalidHex,
}

impl Guid {
    /// Decodes a GUID from its 16-byte wire representation.
    pub fn from_bytes(bytes: &[u8; 16]) -> Self {
        let mut cursor = Cursor::new(bytes);
        Guid::read(&mut cursor).expect("reading 16 bytes into a fixed-size struct cannot fail")
    }
}

impl From<[u8; 16]> for Guid {
    fn from(value: [u8; 16]) -> Self {
        Guid::from_bytes(&value)
    }
}

impl FromStr for Guid {
    type Err = GuidParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() != 5 {
            return Err(GuidParseError::WrongComponentCount);
        }

        let field0 = u32::from_str_radix(parts[0], 16).map_err(|_| GuidParseError::InvalidHex)?;
        let field1 = u16::from_str_radix(parts[1], 16).map_err(|_| GuidParseError::InvalidHex)?;
        let field2 = u16::from_str_radix(parts[2], 16).map_err(|_| GuidParseError::InvalidHex)?;

        if parts[3].len() != 4 || parts[4].len() != 12 {
            return Err(GuidParseError::InvalidHex);
        }
        let mut tail = [0u8; 8];
        tail[0] = u8::from_str_radix(&parts[3][0..2], 16).map_err(|_| GuidParseError::InvalidHex)?;
        tail[1] = u8::from_str_radix(&parts[3][2..4], 16).map_err(|_| GuidParseError::InvalidHex)?;
        for i in 0..6 {
            tail[i + 2] = u8::from_str_radix(&parts[4][i * 2..i * 2 + 2], 16)
                .map_err(|_| GuidParseError::InvalidHex)?;
        }

        Ok(Guid(field0, field1, field2, tail))
    }
}

impl Display for Guid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            self.0,
            self.1,
            self.2,
            self.3[0],
            self.3[1],
            self.3[2],
            self.3[3],
            self.3[4],
            self.3[5],
            self.3[6],
            self.3[7],
        )
    }
}

impl std::fmt::Debug for Guid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_GUID_STR: &str = "065eadf1-6daf-1543-b04f-10e69084c9ae";
    const TEST_GUID_BYTES: [u8; 16] = [
        0xf1, 0xad, 0x5e, 0x06, 0xaf, 0x6d, 0x43, 0x15, 0xb0, 0x4f, 0x10, 0xe6, 0x90, 0x84, 0xc9,
        0xae,
    ];

    #[test]
    fn parses_and_renders_canonical_form() {
        let guid = TEST_GUID_STR.parse::<Guid>().unwrap();
        assert_eq!(guid.to_string(), TEST_GUID_STR);
    }

    #[test]
    fn decodes_from_wire_bytes() {
        let guid = Guid::from_bytes(&TEST_GUID_BYTES);
        assert_eq!(guid.to_string(), TEST_GUID_STR);
    }

    #[test]
    fn rejects_malformed_strings() {
        assert!("not-a-guid".parse::<Guid>().is_err());
        assert!("065eadf16daf1543b04f10e69084c9ae".parse::<Guid>().is_err());
    }
}
