//! DN prefix dictionary: interns the common ancestor portion of distinguished names.

/// Ordered table of prefix strings. A DN in the snapshot is stored as
/// `(prefix_id, suffix)`; the full DN is `prefix_table[prefix_id] + suffix`.
///
/// Immutable after construction: the snapshot never rewrites a loaded
/// prefix table, only appends to it while it is being built from the
/// snapshot's prefix section.
#[derive(Debug, Clone, Default)]
pub struct PrefixTable {
    prefixes: Vec<String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("prefix id {0} is out of bounds for a table of {1} entries")]
pub struct PrefixOutOfBounds(pub u32, pub usize);

impl PrefixTable {
    pub fn new(prefixes: Vec<String>) -> Self {
        PrefixTable { prefixes }
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Resolves `(prefix_id, suffix)` into the full distinguished name.
    pub fn resolve(&self, prefix_id: u32, suffix: &str) -> Result<String, PrefixOutOfBounds> {
        let prefix = self
            .prefixes
            .get(prefix_id as usize)
            .ok_or(PrefixOutOfBounds(prefix_id, self.prefixes.len()))?;
        let mut dn = String::with_capacity(prefix.len() + suffix.len());
        dn.push_str(prefix);
        dn.push_str(suffix);
        Ok(dn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_prefix_plus_suffix() {
        let table = PrefixTable::new(vec!["DC=corp,DC=local".to_string()]);
        assert_eq!(
            table.resolve(0, "CN=Administrator,CN=Users,").unwrap(),
            "DC=corp,DC=localCN=Administrator,CN=Users,"
        );
    }

    #[test]
    fn rejects_out_of_bounds_prefix_id() {
        let table = PrefixTable::new(vec!["DC=corp,DC=local".to_string()]);
        assert!(table.resolve(5, "x").is_err());
    }
}
