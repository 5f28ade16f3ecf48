//! Remote object-store access for the published catalog.
//!
//! The publisher keeps two objects side by side: an 8-byte big-endian
//! dataset version and the encoded catalog blob. `RemoteSource` is the seam
//! the sync engine reads both through; `HttpRemote` is the real transport.

pub mod client;
pub mod error;

use std::future::Future;

pub use client::{encode_version, HttpRemote};
pub use error::TransportError;

/// Read-only view of the authoritative catalog.
pub trait RemoteSource {
    /// Current dataset version. Must never be served from a transport cache.
    fn fetch_version(&self) -> impl Future<Output = Result<u64, TransportError>> + Send;

    /// Latest encoded catalog blob.
    fn fetch_catalog(&self) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send;
}
