//! A single decoded directory object.

use std::collections::BTreeMap;

use adx_dtyp::Value;
use adx_schema::{AttributeId, PrefixOutOfBounds, Schema};

/// One directory object: a DN (stored as a resolvable prefix reference) and
/// an ordered mapping from attribute id to its non-empty value sequence.
///
/// An attribute absent from the map is absent, not an empty sequence —
/// callers rely on this to distinguish "no `company` attribute" from
/// "`company` present with zero values" (the latter never legitimately
/// occurs but is not conflated with the former either way).
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    prefix_id: u32,
    suffix: String,
    attributes: BTreeMap<AttributeId, Vec<Value>>,
}

impl Object {
    pub fn new(prefix_id: u32, suffix: String, attributes: BTreeMap<AttributeId, Vec<Value>>) -> Self {
        Object {
            prefix_id,
            suffix,
            attributes,
        }
    }

    /// Materializes the full distinguished name by resolving this object's
    /// prefix reference against `schema`.
    pub fn distinguished_name(&self, schema: &Schema) -> Result<String, PrefixOutOfBounds> {
        schema.resolve_dn(self.prefix_id, &self.suffix)
    }

    pub fn values(&self, attr: AttributeId) -> Option<&[Value]> {
        self.attributes.get(&attr).map(|v| v.as_slice())
    }

    pub fn has_attribute(&self, attr: AttributeId) -> bool {
        self.attributes.contains_key(&attr)
    }

    pub fn attribute_ids(&self) -> impl Iterator<Item = AttributeId> + '_ {
        self.attributes.keys().copied()
    }
}
