//! Version-checked synchronization of the local catalog replica.
//!
//! `PanelSync` answers catalog and single-panel reads from the local store
//! whenever its cached dataset version is at least the published one, and
//! otherwise pulls the whole catalog again. `SyncStatus` reports what is
//! cached without touching the network.

pub mod engine;
pub mod status;

pub use engine::PanelSync;
pub use status::SyncStatus;
