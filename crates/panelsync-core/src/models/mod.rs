//! Data models for the panel catalog.
//!
//! - `Panel`: one solar kit offering with its numeric specs and structure material
//! - `Catalog`: every published panel keyed by its small integer id
//! - `Attribute`: names a single panel field, used by search queries and weights

pub mod panel;

pub use panel::{Attribute, AttributeValue, Catalog, Panel, PanelId};
