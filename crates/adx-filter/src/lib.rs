//! RFC 4515 filter parsing and RFC 4511 §4.5.1.7 three-valued evaluation
//! against decoded snapshot objects.

mod error;
mod eval;
mod node;
mod parser;
mod render;

pub use error::{FilterError, Result};
pub use eval::{FilterEvaluator, Match};
pub use node::FilterNode;
pub use parser::parse;
pub use render::render;
