//! Core telemetry types and traits used by dashinfo

use serde::{Serialize, Deserialize};
use std::sync::Arc;

pub mod protocol;

pub use protocol::{decode, decode_datagram, encode, DecodeError};

/// Wheel position a corner temperature belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    LF,
    LR,
    RF,
    RR,
}

impl Corner {
    pub const ALL: [Corner; 4] = [Corner::LF, Corner::LR, Corner::RF, Corner::RR];
}

/// Physical source of a corner temperature reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CornerOrigin {
    Tire,
    Brake,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Int,
    Text,
}

/// Telemetry channel carried by a datagram, identified on the wire by its first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TelemetryTag {
    Rpm,
    OilTemp,
    WaterTemp,
    Fuel,
    MaxRpm,
    Gear,
    LapNumber,
    MaxLaps,
    /// Reserved by the sender, never applied to the dashboard.
    LapTime,
    LfTireTemp,
    LrTireTemp,
    RfTireTemp,
    RrTireTemp,
    LfBrakeTemp,
    LrBrakeTemp,
    RfBrakeTemp,
    RrBrakeTemp,
}

impl TelemetryTag {
    pub const ALL: [TelemetryTag; 17] = [
        TelemetryTag::Rpm,
        TelemetryTag::OilTemp,
        TelemetryTag::WaterTemp,
        TelemetryTag::Fuel,
        TelemetryTag::MaxRpm,
        TelemetryTag::Gear,
        TelemetryTag::LapNumber,
        TelemetryTag::MaxLaps,
        TelemetryTag::LapTime,
        TelemetryTag::LfTireTemp,
        TelemetryTag::LrTireTemp,
        TelemetryTag::RfTireTemp,
        TelemetryTag::RrTireTemp,
        TelemetryTag::LfBrakeTemp,
        TelemetryTag::LrBrakeTemp,
        TelemetryTag::RfBrakeTemp,
        TelemetryTag::RrBrakeTemp,
    ];

    pub fn from_char(c: char) -> Option<Self> {
        use TelemetryTag::*;
        Some(match c {
            '1' => Rpm,
            '2' => OilTemp,
            '3' => WaterTemp,
            '4' => Fuel,
            '5' => MaxRpm,
            '6' => Gear,
            '7' => LapNumber,
            '8' => MaxLaps,
            '9' => LapTime,
            'a' => LfTireTemp,
            'b' => LrTireTemp,
            'c' => RfTireTemp,
            'd' => RrTireTemp,
            'e' => LfBrakeTemp,
            'f' => LrBrakeTemp,
            'g' => RfBrakeTemp,
            'h' => RrBrakeTemp,
            _ => return None,
        })
    }

    pub fn as_char(self) -> char {
        use TelemetryTag::*;
        match self {
            Rpm => '1',
            OilTemp => '2',
            WaterTemp => '3',
            Fuel => '4',
            MaxRpm => '5',
            Gear => '6',
            LapNumber => '7',
            MaxLaps => '8',
            LapTime => '9',
            LfTireTemp => 'a',
            LrTireTemp => 'b',
            RfTireTemp => 'c',
            RrTireTemp => 'd',
            LfBrakeTemp => 'e',
            LrBrakeTemp => 'f',
            RfBrakeTemp => 'g',
            RrBrakeTemp => 'h',
        }
    }

    /// Gear is a free-form label; lap time is reserved and left unparsed.
    pub fn payload_kind(self) -> PayloadKind {
        match self {
            TelemetryTag::Gear | TelemetryTag::LapTime => PayloadKind::Text,
            _ => PayloadKind::Int,
        }
    }

    /// Corner and origin for tire/brake temperature tags, `None` for everything else.
    pub fn corner(self) -> Option<(Corner, CornerOrigin)> {
        use TelemetryTag::*;
        match self {
            LfTireTemp => Some((Corner::LF, CornerOrigin::Tire)),
            LrTireTemp => Some((Corner::LR, CornerOrigin::Tire)),
            RfTireTemp => Some((Corner::RF, CornerOrigin::Tire)),
            RrTireTemp => Some((Corner::RR, CornerOrigin::Tire)),
            LfBrakeTemp => Some((Corner::LF, CornerOrigin::Brake)),
            LrBrakeTemp => Some((Corner::LR, CornerOrigin::Brake)),
            RfBrakeTemp => Some((Corner::RF, CornerOrigin::Brake)),
            RrBrakeTemp => Some((Corner::RR, CornerOrigin::Brake)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    Int(i32),
    Text(String),
}

impl Payload {
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Payload::Int(v) => Some(*v),
            Payload::Text(_) => None,
        }
    }
}

impl std::fmt::Display for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Payload::Int(v) => write!(f, "{}", v),
            Payload::Text(s) => f.write_str(s),
        }
    }
}

/// One decoded datagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryMessage {
    pub tag: TelemetryTag,
    pub payload: Payload,
}

impl TelemetryMessage {
    pub fn int(tag: TelemetryTag, value: i32) -> Self {
        Self { tag, payload: Payload::Int(value) }
    }

    pub fn text(tag: TelemetryTag, value: impl Into<String>) -> Self {
        Self { tag, payload: Payload::Text(value.into()) }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Consumer of decoded messages. Called synchronously from the receive loop,
/// so the next datagram is not read until `accept` returns.
pub trait TelemetrySink: Send + Sync {
    fn accept(&self, msg: TelemetryMessage);
}

/// Trait for any live source connector
#[async_trait::async_trait]
pub trait TelemetrySource: Send + Sync {
    async fn run(&self, sink: Arc<dyn TelemetrySink>) -> Result<(), IngestError>;
}
