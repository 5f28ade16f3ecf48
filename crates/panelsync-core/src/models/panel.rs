use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a panel within the published catalog.
pub type PanelId = u32;

/// Every published panel, keyed by id.
pub type Catalog = BTreeMap<PanelId, Panel>;

/// A solar panel kit as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Panel {
    pub watt: f64,
    pub battery: f64,
    pub panel_cable: f64,
    pub wiring_cable: f64,
    pub light: f64,
    pub charger: f64,
    pub structure: String,
    pub hour: f64,
    pub extra_hour: f64,
    pub dc_fan_small: f64,
    pub dc_fan_table: f64,
    pub dc_fan_stand: f64,
    pub price: f64,
}

impl Panel {
    /// Numeric value of an attribute, or `None` for the text-valued `structure`.
    pub fn number(&self, attribute: Attribute) -> Option<f64> {
        let value = match attribute {
            Attribute::Watt => self.watt,
            Attribute::Battery => self.battery,
            Attribute::PanelCable => self.panel_cable,
            Attribute::WiringCable => self.wiring_cable,
            Attribute::Light => self.light,
            Attribute::Charger => self.charger,
            Attribute::Structure => return None,
            Attribute::Hour => self.hour,
            Attribute::ExtraHour => self.extra_hour,
            Attribute::DcFanSmall => self.dc_fan_small,
            Attribute::DcFanTable => self.dc_fan_table,
            Attribute::DcFanStand => self.dc_fan_stand,
            Attribute::Price => self.price,
        };
        Some(value)
    }
}

impl AsRef<Panel> for Panel {
    fn as_ref(&self) -> &Panel {
        self
    }
}

/// A single panel field.
///
/// Declaration order matches the slot order of the binary encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Watt,
    Battery,
    PanelCable,
    WiringCable,
    Light,
    Charger,
    Structure,
    Hour,
    ExtraHour,
    DcFanSmall,
    DcFanTable,
    DcFanStand,
    Price,
}

impl Attribute {
    pub const ALL: [Attribute; 13] = [
        Attribute::Watt,
        Attribute::Battery,
        Attribute::PanelCable,
        Attribute::WiringCable,
        Attribute::Light,
        Attribute::Charger,
        Attribute::Structure,
        Attribute::Hour,
        Attribute::ExtraHour,
        Attribute::DcFanSmall,
        Attribute::DcFanTable,
        Attribute::DcFanStand,
        Attribute::Price,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Watt => "watt",
            Attribute::Battery => "battery",
            Attribute::PanelCable => "panel_cable",
            Attribute::WiringCable => "wiring_cable",
            Attribute::Light => "light",
            Attribute::Charger => "charger",
            Attribute::Structure => "structure",
            Attribute::Hour => "hour",
            Attribute::ExtraHour => "extra_hour",
            Attribute::DcFanSmall => "dc_fan_small",
            Attribute::DcFanTable => "dc_fan_table",
            Attribute::DcFanStand => "dc_fan_stand",
            Attribute::Price => "price",
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Attribute::Structure)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value an attribute can be compared against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Number(f64),
    Text(String),
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Number(value as f64)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}
