//! Attribute catalog entries.

use adx_dtyp::SyntaxCode;

/// A stable, dense, zero-based id into the snapshot's attribute schema table.
pub type AttributeId = u32;

/// One entry from the snapshot's attribute-schema section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDef {
    pub id: AttributeId,
    pub name: String,
    pub syntax: SyntaxCode,
    pub single_valued: bool,
}

impl AttributeDef {
    pub fn new(id: AttributeId, name: impl Into<String>, syntax: SyntaxCode, single_valued: bool) -> Self {
        AttributeDef {
            id,
            name: name.into(),
            syntax,
            single_valued,
        }
    }
}
