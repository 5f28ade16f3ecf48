use thiserror::Error;

use crate::codec::CodecError;
use crate::remote::TransportError;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Remote fetch failed: {0}")]
    Transport(#[from] TransportError),

    /// The published catalog itself could not be decoded.
    #[error("Published catalog is corrupt: {0}")]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
