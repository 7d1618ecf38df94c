//! MS-DTYP 2.4.2: Windows security identifier (SID), `S-1-...` textual form.

use std::fmt::Display;
use std::io::{Read, Seek, Write};
use std::str::FromStr;

use binrw::{BinRead, BinResult, BinWrite, Endian, prelude::*};

/// A security identifier: a revision, an identifier authority, and a chain
/// of sub-authorities. On the wire the authority is 6 bytes big-endian and
/// the sub-authorities are 4 bytes little-endian each (MS-DTYP 2.4.2.2).
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Sid {
    pub revision: u8,
    pub identifier_authority: u64,
    pub sub_authority: Vec<u32>,
}

#[derive(Debug, thiserror::Error)]
pub enum SidParseError {
    #[error("SID string must start with \"S-\"")]
    MissingPrefix,
    #[error("SID string has a malformed revision or authority field")]
    MalformedField,
    #[error("SID string has a malformed sub-authority field")]
    MalformedSubAuthority,
}

impl Sid {
    pub const PREFIX: &'static str = "S-";

    fn read_u48<R: Read + Seek>(reader: &mut R, endian: Endian, _: ()) -> BinResult<u64> {
        let mut buf = [0u8; 8];
        reader.read_exact(&mut buf[2..8])?;
        if endian == Endian::Big {
            Ok(u64::from_be_bytes(buf))
        } else {
            buf[2..8].reverse();
            Ok(u64::from_le_bytes(buf))
        }
    }

    fn write_u48<W: Write + Seek>(
        value: &u64,
        writer: &mut W,
        endian: Endian,
        _: (),
    ) -> BinResult<()> {
        let bytes = if endian == Endian::Big {
            value.to_be_bytes()
        } else {
            value.to_le_bytes()
        };
        writer.write_all(&bytes[2..8])?;
        Ok(())
    }
}

impl BinRead for Sid {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        _: Self::Args<'_>,
    ) -> BinResult<Self> {
        let revision = u8::read_options(reader, endian, ())?;
        let sub_authority_count = u8::read_options(reader, endian, ())?;
        let identifier_authority = Self::read_u48(reader, Endian::Big, ())?;
        let mut sub_authority = Vec::with_capacity(sub_authority_count as usize);
        for _ in 0..sub_authority_count {
            sub_authority.push(u32::read_options(reader, Endian::Little, ())?);
        }
        Ok(Sid {
            revision,
            identifier_authority,
            sub_authority,
        })
    }
}

impl BinWrite for Sid {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: Endian,
        _: Self::Args<'_>,
    ) -> BinResult<()> {
        self.revision.write_options(writer, endian, ())?;
        (self.sub_authority.len() as u8).write_options(writer, endian, ())?;
        Self::write_u48(&self.identifier_authority, writer, Endian::Big, ())?;
        for sub in &self.sub_authority {
            sub.write_options(writer, Endian::Little, ())?;
        }
        Ok(())
    }
}

impl FromStr for Sid {
    type Err = SidParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s.strip_prefix(Self::PREFIX).ok_or(SidParseError::MissingPrefix)?;
        let mut parts = rest.split('-');

        let revision: u8 = parts
            .next()
            .ok_or(SidParseError::MalformedField)?
            .parse()
            .map_err(|_| SidParseError::MalformedField)?;

        let authority_str = parts.next().ok_or(SidParseError::MalformedField)?;
        let identifier_authority = if let Some(hex) = authority_str.strip_prefix("0x") {
            u64::from_str_radix(hex, 16).map_err(|_| SidParseError::MalformedField)?
        } else {
            authority_str
                .parse()
                .map_err(|_| SidParseError::MalformedField)?
        };

        let sub_authority = parts
            .map(|p| p.parse::<u32>().map_err(|_| SidParseError::MalformedSubAuthority))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Sid {
            revision,
            identifier_authority,
            sub_authority,
        })
    }
}

impl Display for Sid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "S-{}-", self.revision)?;
        if self.identifier_authority >> 32 == 0 {
            write!(f, "{}", self.identifier_authority)?;
        } else {
            write!(f, "0x{:x}", self.identifier_authority)?;
        }
        for sub in &self.sub_authority {
            write!(f, "-{sub}")?;
        }
        Ok(())
    }
}
