//! In-memory attribute/class catalog built once when a snapshot is opened.

use std::collections::HashMap;

use crate::attribute::{AttributeDef, AttributeId};
use crate::class::{ClassDef, ClassId};
use crate::prefix::{PrefixOutOfBounds, PrefixTable};

/// The snapshot's attribute catalog, class catalog, and DN prefix table.
///
/// Immutable after construction and freely shareable by read-only
/// consumers: nothing in [`Schema`] is mutated once [`Schema::build`]
/// returns.
#[derive(Debug, Clone)]
pub struct Schema {
    attributes: Vec<AttributeDef>,
    classes: Vec<ClassDef>,
    prefixes: PrefixTable,
    name_to_id: HashMap<String, AttributeId>,
}

impl Schema {
    /// Builds a schema from the decoded attribute/class/prefix sections.
    ///
    /// On a duplicate attribute name, the first-seen definition wins the
    /// name lookup; the collision is logged, not treated as fatal.
    pub fn build(attributes: Vec<AttributeDef>, classes: Vec<ClassDef>, prefixes: PrefixTable) -> Self {
        let mut name_to_id = HashMap::with_capacity(attributes.len());
        for attr in &attributes {
            let key = attr.name.to_ascii_lowercase();
            if let Some(&existing_id) = name_to_id.get(&key) {
                log::warn!(
                    "duplicate attribute name '{}': id {} shadowed by first-seen id {}",
                    attr.name,
                    attr.id,
                    existing_id
                );
                continue;
            }
            name_to_id.insert(key, attr.id);
        }

        Schema {
            attributes,
            classes,
            prefixes,
            name_to_id,
        }
    }

    pub fn attribute_by_id(&self, id: AttributeId) -> Option<&AttributeDef> {
        self.attributes.get(id as usize)
    }

    /// Looks up an attribute by name. LDAP attribute descriptions are
    /// ASCII-only (RFC 4512), so case folding is plain ASCII lower-casing.
    pub fn attribute_by_name(&self, name: &str) -> Option<&AttributeDef> {
        let id = *self.name_to_id.get(&name.to_ascii_lowercase())?;
        self.attribute_by_id(id)
    }

    pub fn class_by_id(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.get(id as usize)
    }

    pub fn resolve_dn(&self, prefix_id: u32, suffix: &str) -> Result<String, PrefixOutOfBounds> {
        self.prefixes.resolve(prefix_id, suffix)
    }

    pub fn attributes(&self) -> &[AttributeDef] {
        &self.attributes
    }

    pub fn classes(&self) -> &[ClassDef] {
        &self.classes
    }
}
