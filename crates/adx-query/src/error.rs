//! Top-level error type: the union of what snapshot decoding and filter
//! parsing can fail with.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Codec(#[from] adx_codec::CodecError),

    #[error(transparent)]
    Filter(#[from] adx_filter::FilterError),
}

pub type Result<T> = std::result::Result<T, Error>;
