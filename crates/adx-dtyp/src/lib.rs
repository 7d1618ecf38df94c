//! Common scalar data types shared by the `adx-query` workspace: the
//! binary-to-text decoders for GUID, SID, and FILETIME values, the
//! [`Value`] union they produce, and the [`SyntaxCode`] tags that select
//! among them.

pub mod filetime;
pub mod guid;
pub mod sid;
pub mod syntax;
pub mod value;

pub use filetime::FileTime;
pub use guid::Guid;
pub use sid::Sid;
pub use syntax::SyntaxCode;
pub use value::{Value, decode_filetime, decode_guid, decode_sid, decode_utf16le};
