//! Filter syntax errors, each anchored to a byte position in the input.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("unbalanced parentheses at position {position}")]
    UnbalancedParen { position: usize },

    #[error("unexpected character '{found}' at position {position}")]
    UnexpectedChar { position: usize, found: char },

    #[error("invalid \\XX escape at position {position}")]
    InvalidEscape { position: usize },

    #[error("empty attribute description at position {position}")]
    EmptyAttribute { position: usize },
}

pub type Result<T> = std::result::Result<T, FilterError>;
