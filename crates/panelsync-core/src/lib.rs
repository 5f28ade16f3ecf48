//! Offline replica of the published panel catalog.
//!
//! The catalog is published as two objects: an 8-byte dataset version and
//! a binary catalog blob. `PanelSync` keeps a local copy in a `LocalStore`,
//! refetching only when the published version moves ahead, and `search`
//! ranks panels against a partial query with per-attribute weights.

pub mod codec;
pub mod config;
pub mod error;
pub mod models;
pub mod remote;
pub mod search;
pub mod store;
pub mod sync;

pub use codec::CodecError;
pub use config::Config;
pub use error::SyncError;
pub use models::{Attribute, AttributeValue, Catalog, Panel, PanelId};
pub use remote::{HttpRemote, RemoteSource, TransportError};
pub use search::{rank, Query, Ranked, Weights};
pub use store::LocalStore;
pub use sync::{PanelSync, SyncStatus};
