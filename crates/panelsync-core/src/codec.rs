//! Binary encoding for panels and the catalog.
//!
//! A panel travels as a fixed 13-slot tuple; slot order, not field name, is
//! the wire identity. The catalog is a sequence of `(id, tuple)` pairs.
//! Both forms are bincode (standard config) over serde.

use bincode::config::{self, Configuration, Limit, LittleEndian, Varint};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Catalog, Panel, PanelId};

/// Upper bound on bytes a single decode may claim.
/// The published catalog is a few kilobytes; anything near this is corrupt.
const MAX_DECODE_BYTES: usize = 16 * 1024 * 1024;

type WireConfig = Configuration<LittleEndian, Varint, Limit<MAX_DECODE_BYTES>>;

fn wire_config() -> WireConfig {
    config::standard().with_limit::<MAX_DECODE_BYTES>()
}

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Failed to encode: {0}")]
    Encode(String),

    #[error("Malformed bytes: {0}")]
    Decode(String),

    #[error("{extra} trailing bytes after a complete value")]
    TrailingBytes { extra: usize },

    #[error("Panel id {0} appears more than once")]
    DuplicateId(PanelId),
}

/// Positional form of a [`Panel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PanelWire(
    f64,    // watt
    f64,    // battery
    f64,    // panel_cable
    f64,    // wiring_cable
    f64,    // light
    f64,    // charger
    String, // structure
    f64,    // hour
    f64,    // extra_hour
    f64,    // dc_fan_small
    f64,    // dc_fan_table
    f64,    // dc_fan_stand
    f64,    // price
);

impl From<&Panel> for PanelWire {
    fn from(p: &Panel) -> Self {
        PanelWire(
            p.watt,
            p.battery,
            p.panel_cable,
            p.wiring_cable,
            p.light,
            p.charger,
            p.structure.clone(),
            p.hour,
            p.extra_hour,
            p.dc_fan_small,
            p.dc_fan_table,
            p.dc_fan_stand,
            p.price,
        )
    }
}

impl From<PanelWire> for Panel {
    fn from(w: PanelWire) -> Self {
        Panel {
            watt: w.0,
            battery: w.1,
            panel_cable: w.2,
            wiring_cable: w.3,
            light: w.4,
            charger: w.5,
            structure: w.6,
            hour: w.7,
            extra_hour: w.8,
            dc_fan_small: w.9,
            dc_fan_table: w.10,
            dc_fan_stand: w.11,
            price: w.12,
        }
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    bincode::serde::encode_to_vec(value, wire_config()).map_err(|e| CodecError::Encode(e.to_string()))
}

/// Decode a complete value; leftover input means the shape was wrong.
fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    let (value, read) = bincode::serde::decode_from_slice(bytes, wire_config())
        .map_err(|e| CodecError::Decode(e.to_string()))?;
    if read != bytes.len() {
        return Err(CodecError::TrailingBytes {
            extra: bytes.len() - read,
        });
    }
    Ok(value)
}

pub fn encode_panel(panel: &Panel) -> Result<Vec<u8>, CodecError> {
    encode(&PanelWire::from(panel))
}

pub fn decode_panel(bytes: &[u8]) -> Result<Panel, CodecError> {
    decode::<PanelWire>(bytes).map(Panel::from)
}

pub fn encode_catalog(catalog: &Catalog) -> Result<Vec<u8>, CodecError> {
    let pairs: Vec<(PanelId, PanelWire)> = catalog
        .iter()
        .map(|(id, panel)| (*id, PanelWire::from(panel)))
        .collect();
    encode(&pairs)
}

pub fn decode_catalog(bytes: &[u8]) -> Result<Catalog, CodecError> {
    let pairs: Vec<(PanelId, PanelWire)> = decode(bytes)?;
    let mut catalog = Catalog::new();
    for (id, wire) in pairs {
        if catalog.insert(id, wire.into()).is_some() {
            return Err(CodecError::DuplicateId(id));
        }
    }
    Ok(catalog)
}
