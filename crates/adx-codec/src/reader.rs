//! Streaming reader over a complete snapshot file: eagerly parses the
//! header and schema sections, then lazily iterates object records.

use std::collections::BTreeMap;
use std::path::Path;

use adx_schema::{AttributeDef, ClassDef, PrefixTable, Schema};

pub use crate::decode::DecodeWarning;
use crate::cursor::ByteCursor;
use crate::decode::{decode_value, syntax_code_from_wire};
use crate::error::{CodecError, Result};
use crate::header::{Header, HeaderRecord};
use crate::object::Object;

/// Parses a complete snapshot held in memory and exposes its objects as a
/// lazy, one-pass iterator.
///
/// A malformed record length or an out-of-bounds offset while iterating
/// objects is fatal: iteration stops immediately and the failure is
/// recorded as a sticky error, observable afterwards via [`Self::error`].
/// A malformed individual *value* within an otherwise well-framed object is
/// not fatal: it is demoted to [`adx_dtyp::Value::Unknown`] and counted
/// (see [`Self::decode_warnings`]).
pub struct SnapshotReader {
    buffer: Vec<u8>,
    header: Header,
    schema: Schema,
    next_object_pos: u64,
    objects_yielded: u32,
    error: Option<CodecError>,
    decode_warnings: u64,
}

impl SnapshotReader {
    /// Reads the file at `path` into memory and parses its header and
    /// schema/class/prefix sections. Object records are not parsed until
    /// [`Self::objects`] is iterated.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let buffer = std::fs::read(path)?;
        Self::from_bytes(buffer)
    }

    /// Parses an already-loaded snapshot buffer. Exposed separately from
    /// [`Self::open`] so callers (and tests) that already hold the bytes in
    /// memory can avoid a redundant read.
    pub fn from_bytes(buffer: Vec<u8>) -> Result<Self> {
        let mut cursor = ByteCursor::new(&buffer);
        let header = Header::parse(&mut cursor)?;
        header.validate_bounds(buffer.len() as u64)?;

        let attributes = read_attribute_section(&buffer, header.schema_offset)?;
        let classes = read_class_section(&buffer, header.class_offset)?;
        let prefixes = read_prefix_section(&buffer, header.prefix_offset)?;
        let schema = Schema::build(attributes, classes, prefixes);

        let next_object_pos = header.object_offset;
        Ok(SnapshotReader {
            buffer,
            header,
            schema,
            next_object_pos,
            objects_yielded: 0,
            error: None,
            decode_warnings: 0,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Structured metadata for the CLI's `dump-header` action.
    pub fn dump_header(&self) -> HeaderRecord {
        HeaderRecord::from(&self.header)
    }

    /// The sticky fatal error, if iteration over [`Self::objects`] was cut
    /// short by a framing violation. `None` means either iteration has not
    /// happened yet or it ran to completion cleanly.
    pub fn error(&self) -> Option<&CodecError> {
        self.error.as_ref()
    }

    /// Count of individual attribute values demoted to `Unknown` across all
    /// objects read so far.
    pub fn decode_warnings(&self) -> u64 {
        self.decode_warnings
    }

    /// Returns a lazy iterator over this snapshot's objects. Each call
    /// resumes from wherever the previous iterator (if any) left off;
    /// exhausting the declared `object_count` or hitting a fatal framing
    /// error both end iteration.
    pub fn objects(&mut self) -> ObjectIter<'_> {
        ObjectIter { reader: self }
    }
}

/// Iterator returned by [`SnapshotReader::objects`]. Borrows the reader for
/// its lifetime; yields plain [`Object`] values rather than `Result`, per
/// the reader's sticky-error design — check [`SnapshotReader::error`] after
/// the iterator is exhausted to distinguish a clean end from an abort.
pub struct ObjectIter<'r> {
    reader: &'r mut SnapshotReader,
}

impl ObjectIter<'_> {
    /// The sticky fatal error, forwarded from the borrowed reader so
    /// callers holding only the iterator can still observe it.
    pub fn error(&self) -> Option<&CodecError> {
        self.reader.error()
    }

    /// Count of per-value decode failures seen so far, forwarded from the
    /// borrowed reader.
    pub fn decode_warnings(&self) -> u64 {
        self.reader.decode_warnings()
    }
}

impl Iterator for ObjectIter<'_> {
    type Item = Object;

    fn next(&mut self) -> Option<Self::Item> {
        if self.reader.error.is_some() {
            return None;
        }
        if self.reader.objects_yielded >= self.reader.header.object_count {
            return None;
        }

        match read_object_record(self.reader) {
            Ok(object) => {
                self.reader.objects_yielded += 1;
                Some(object)
            }
            Err(e) => {
                self.reader.error = Some(e);
                None
            }
        }
    }
}

fn read_object_record(reader: &mut SnapshotReader) -> Result<Object> {
    let mut cursor = ByteCursor::new(&reader.buffer);
    cursor.seek(reader.next_object_pos)?;

    let record_len = cursor.read_u32()? as u64;
    let record_start = cursor.position();
    let record_end = record_start
        .checked_add(record_len)
        .ok_or_else(|| CodecError::corrupt(record_start, "record length overflow"))?;
    if record_end > cursor.len() {
        return Err(CodecError::corrupt(
            record_start,
            format!("record of length {record_len} exceeds end of file"),
        ));
    }

    let prefix_id = cursor.read_u32()?;
    let suffix = cursor.read_unicode()?;

    let attr_count = cursor.read_u32()?;
    let mut attributes: BTreeMap<u32, Vec<adx_dtyp::Value>> = BTreeMap::new();
    for _ in 0..attr_count {
        let attribute_id = cursor.read_u32()?;
        let value_count = cursor.read_u32()?;
        let mut values = Vec::with_capacity(value_count as usize);
        for _ in 0..value_count {
            let blob_len = cursor.read_u32()? as usize;
            let blob = cursor.read_bytes(blob_len)?;
            let value = match reader.schema.attribute_by_id(attribute_id) {
                Some(attr) => decode_value(attr, blob, &reader.schema, &mut reader.decode_warnings),
                None => {
                    log::warn!("object attribute id {attribute_id} not present in schema; storing as unknown");
                    reader.decode_warnings += 1;
                    adx_dtyp::Value::Unknown(blob.to_vec())
                }
            };
            values.push(value);
        }
        attributes.insert(attribute_id, values);
    }

    if cursor.position() > record_end {
        return Err(CodecError::corrupt(
            record_start,
            format!(
                "object record overran its declared length ({} > {})",
                cursor.position(),
                record_end
            ),
        ));
    }

    reader.next_object_pos = record_end;
    Ok(Object::new(prefix_id, suffix, attributes))
}

fn read_attribute_section(buffer: &[u8], offset: u64) -> Result<Vec<AttributeDef>> {
    let mut cursor = ByteCursor::new(buffer);
    cursor.seek(offset)?;
    let count = cursor.read_u32()?;
    let mut attributes = Vec::with_capacity(count as usize);
    for id in 0..count {
        let name = cursor.read_unicode()?;
        let syntax_code = cursor.read_u32()?;
        let single_valued = cursor.read_u8()? != 0;
        attributes.push(AttributeDef::new(id, name, syntax_code_from_wire(syntax_code), single_valued));
    }
    Ok(attributes)
}

fn read_class_section(buffer: &[u8], offset: u64) -> Result<Vec<ClassDef>> {
    let mut cursor = ByteCursor::new(buffer);
    cursor.seek(offset)?;
    let count = cursor.read_u32()?;
    let mut classes = Vec::with_capacity(count as usize);
    for id in 0..count {
        let name = cursor.read_unicode()?;
        classes.push(ClassDef { id, name });
    }
    Ok(classes)
}

fn read_prefix_section(buffer: &[u8], offset: u64) -> Result<PrefixTable> {
    let mut cursor = ByteCursor::new(buffer);
    cursor.seek(offset)?;
    let count = cursor.read_u32()?;
    let mut prefixes = Vec::with_capacity(count as usize);
    for _ in 0..count {
        prefixes.push(cursor.read_unicode()?);
    }
    Ok(PrefixTable::new(prefixes))
}
