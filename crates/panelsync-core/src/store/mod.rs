//! Local persistent cache for offline catalog access.
//!
//! This module provides the `LocalStore` for keeping the last synced
//! catalog on disk. Data lives in two partitions:
//! - `meta`: the dataset version of the cached catalog and when it was synced
//! - `records`: the bulk encoded catalog plus individually cached panels
//!
//! Entries are never evicted; a resync overwrites the bulk blob wholesale.

pub mod manager;

pub use manager::{LocalStore, PanelEntry, Partition};
