//! Attribute syntax codes: how an attribute's raw value bytes should be decoded.

/// Identifies the shape of an attribute's stored values, as declared in the
/// snapshot's schema section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxCode {
    String,
    Integer,
    Boolean,
    Guid,
    Sid,
    FileTime,
    OctetString,
    Dn,
    SecurityDescriptor,
    OtherBinary,
}

impl SyntaxCode {
    /// Whether this syntax is eligible for substring matching. Per RFC 4515,
    /// substring filters apply to string-valued attributes only; DN is a
    /// distinct syntax (compared by canonicalized equality, not substring)
    /// and every other syntax yields UNDEFINED for a substring filter.
    pub fn is_string_like(self) -> bool {
        matches!(self, SyntaxCode::String)
    }

    /// Whether this syntax is a distinguished name, compared via
    /// canonicalized equality rather than raw text.
    pub fn is_dn(self) -> bool {
        matches!(self, SyntaxCode::Dn)
    }
}
