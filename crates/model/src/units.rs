//! Display units and the conversions applied to incoming raw values.
//!
//! Raw temperatures are Celsius and raw capacities are liters. Converted values
//! are truncated toward zero, never rounded.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{value} is not a valid {unit} index")]
pub struct InvalidUnitIndex {
    pub unit: &'static str,
    pub value: i32,
}

macro_rules! indexed_unit {
    ($name:ident, $label:literal, { $($variant:ident = $idx:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
        pub enum $name {
            #[default]
            $($variant),+
        }

        impl $name {
            /// Position of the unit in its selection list, as persisted by the preference store.
            pub fn index(self) -> i32 {
                match self {
                    $($name::$variant => $idx),+
                }
            }
        }

        impl TryFrom<i32> for $name {
            type Error = InvalidUnitIndex;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                match value {
                    $($idx => Ok($name::$variant),)+
                    _ => Err(InvalidUnitIndex { unit: $label, value }),
                }
            }
        }
    };
}

indexed_unit!(TemperatureUnit, "temperature unit", { Celsius = 0, Fahrenheit = 1 });
indexed_unit!(SpeedUnit, "speed unit", { Kph = 0, Mph = 1 });
indexed_unit!(CapacityUnit, "capacity unit", { Liters = 0, Gallons = 1 });

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Units {
    pub temperature: TemperatureUnit,
    /// Carried for the settings surface, no channel is converted with it yet.
    pub speed: SpeedUnit,
    pub capacity: CapacityUnit,
}

pub fn process_temperature(raw: i32, unit: TemperatureUnit) -> i32 {
    match unit {
        TemperatureUnit::Celsius => raw,
        TemperatureUnit::Fahrenheit => ((raw as f64 * 1.8) as i32).saturating_add(32),
    }
}

pub fn process_capacity(raw: i32, unit: CapacityUnit) -> i32 {
    match unit {
        CapacityUnit::Liters => raw,
        CapacityUnit::Gallons => (raw as f64 * 0.26417) as i32,
    }
}
