//! Positional reader over a borrowed byte buffer. Never allocates per read;
//! string-returning methods allocate only because their callers need an
//! owned `String`.

use adx_dtyp::decode_utf16le;

use crate::error::{CodecError, Result};

/// A safe, bounds-checked cursor over an in-memory snapshot buffer.
///
/// The cursor borrows its backing bytes rather than owning a file handle;
/// [`crate::reader::SnapshotReader::open`] is responsible for reading (or
/// mapping) the file into a buffer the cursor borrows from for its entire
/// lifetime.
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        ByteCursor { data, pos: 0 }
    }

    pub fn position(&self) -> u64 {
        self.pos as u64
    }

    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Seeks to an absolute offset. Fails with [`CodecError::Truncated`] if
    /// the offset is beyond the end of the buffer.
    pub fn seek(&mut self, offset: u64) -> Result<()> {
        let offset = offset as usize;
        if offset > self.data.len() {
            return Err(CodecError::Truncated {
                offset: self.pos as u64,
                needed: offset - self.data.len(),
                available: 0,
            });
        }
        self.pos = offset;
        Ok(())
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.seek(self.pos as u64 + n as u64)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(CodecError::Truncated {
                offset: self.pos as u64,
                needed: n,
                available: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Returns a borrowed, bounds-checked slice of `n` raw bytes without
    /// copying.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let b = self.take(8)?;
        Ok(u64::from_le_bytes(b.try_into().unwrap()))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(self.read_u64()? as i64)
    }

    /// Reads a NUL-terminated single-byte (Latin-1/ASCII) string. The
    /// terminator is consumed but not included in the result.
    pub fn read_cstr(&mut self) -> Result<String> {
        let start = self.pos;
        loop {
            if self.remaining() == 0 {
                return Err(CodecError::Truncated {
                    offset: start as u64,
                    needed: 1,
                    available: 0,
                });
            }
            if self.data[self.pos] == 0 {
                break;
            }
            self.pos += 1;
        }
        let bytes = &self.data[start..self.pos];
        self.pos += 1; // consume the NUL terminator
        Ok(bytes.iter().map(|&b| b as char).collect())
    }

    /// Reads a 32-bit little-endian character count followed by that many
    /// UTF-16LE code units (no trailing NUL), per the header/schema string
    /// encoding described in the snapshot format.
    pub fn read_unicode(&mut self) -> Result<String> {
        let char_count = self.read_u32()? as usize;
        let byte_len = char_count
            .checked_mul(2)
            .ok_or_else(|| CodecError::corrupt(self.pos as u64, "unicode length overflow"))?;
        let bytes = self.take(byte_len)?;
        Ok(decode_utf16le(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_primitives_little_endian() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
        let mut c = ByteCursor::new(&data);
        assert_eq!(c.read_u8().unwrap(), 0x01);
        assert_eq!(c.read_u16().unwrap(), 0x0403);
        assert_eq!(c.read_u32().unwrap(), 0x0807_0605);
    }

    #[test]
    fn fails_with_truncated_on_insufficient_bytes() {
        let data = [0x01];
        let mut c = ByteCursor::new(&data);
        assert!(matches!(c.read_u32(), Err(CodecError::Truncated { .. })));
    }

    #[test]
    fn reads_length_prefixed_unicode_strings() {
        let mut data = vec![3, 0, 0, 0]; // char count = 3
        for ch in "cn=".encode_utf16() {
            data.extend_from_slice(&ch.to_le_bytes());
        }
        let mut c = ByteCursor::new(&data);
        assert_eq!(c.read_unicode().unwrap(), "cn=");
    }

    #[test]
    fn reads_nul_terminated_cstr() {
        let data = b"hello\0world";
        let mut c = ByteCursor::new(data);
        assert_eq!(c.read_cstr().unwrap(), "hello");
        assert_eq!(c.read_bytes(5).unwrap(), b"world");
    }

    #[test]
    fn seek_and_skip_move_position() {
        let data = [0u8; 16];
        let mut c = ByteCursor::new(&data);
        c.seek(4).unwrap();
        assert_eq!(c.position(), 4);
        c.skip(4).unwrap();
        assert_eq!(c.position(), 8);
        assert!(c.seek(100).is_err());
    }
}
