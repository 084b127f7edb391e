use serde::{Deserialize, Serialize};
use dash_ingest_core::{Corner, CornerOrigin};

pub mod units;

pub use units::*;

/// Raw MaxLaps value the game sends for a race without a lap limit.
pub const UNLIMITED_LAPS: i32 = i32::MAX;

const KELVIN_OFFSET: i32 = 273;

/// Which reading the four corner temperature slots currently show.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    ShowingTireTemps,
    ShowingBrakeTemps,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::ShowingTireTemps => DisplayMode::ShowingBrakeTemps,
            DisplayMode::ShowingBrakeTemps => DisplayMode::ShowingTireTemps,
        }
    }

    pub fn shows(self, origin: CornerOrigin) -> bool {
        matches!(
            (self, origin),
            (DisplayMode::ShowingTireTemps, CornerOrigin::Tire)
                | (DisplayMode::ShowingBrakeTemps, CornerOrigin::Brake)
        )
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct CornerTemps {
    pub lf: i32,
    pub lr: i32,
    pub rf: i32,
    pub rr: i32,
}

impl CornerTemps {
    pub fn get(&self, corner: Corner) -> i32 {
        match corner {
            Corner::LF => self.lf,
            Corner::LR => self.lr,
            Corner::RF => self.rf,
            Corner::RR => self.rr,
        }
    }

    fn slot_mut(&mut self, corner: Corner) -> &mut i32 {
        match corner {
            Corner::LF => &mut self.lf,
            Corner::LR => &mut self.lr,
            Corner::RF => &mut self.rf,
            Corner::RR => &mut self.rr,
        }
    }
}

/// Display-ready vehicle state. Every value except `max_rpm` and `current_rpm`
/// is already converted into the selected units.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct DashboardState {
    pub oil_temp: i32,
    pub water_temp: i32,
    pub fuel: i32,
    pub gear: String,
    pub lap_number: i32,
    /// 0 means no lap limit.
    pub max_laps: i32,
    /// 0 until the game has reported it.
    pub max_rpm: i32,
    pub current_rpm: i32,
    pub corners: CornerTemps,
    pub units: Units,
    pub display_mode: DisplayMode,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            oil_temp: 0,
            water_temp: 0,
            fuel: 0,
            gear: gear_label("0"),
            lap_number: 0,
            max_laps: 0,
            max_rpm: 0,
            current_rpm: 0,
            corners: CornerTemps::default(),
            units: Units::default(),
            display_mode: DisplayMode::default(),
        }
    }
}

impl DashboardState {
    pub fn with_units(units: Units) -> Self {
        Self { units, ..Self::default() }
    }

    pub fn set_oil_temp(&mut self, raw: i32) {
        self.oil_temp = process_temperature(raw, self.units.temperature);
    }

    pub fn set_water_temp(&mut self, raw: i32) {
        self.water_temp = process_temperature(raw, self.units.temperature);
    }

    pub fn set_fuel(&mut self, raw: i32) {
        self.fuel = process_capacity(raw, self.units.capacity);
    }

    pub fn set_gear(&mut self, raw: &str) {
        self.gear = gear_label(raw);
    }

    pub fn set_max_laps(&mut self, raw: i32) {
        self.max_laps = if raw == UNLIMITED_LAPS { 0 } else { raw };
    }

    /// Stores a Kelvin reading into the corner slot when `origin` is the one
    /// currently displayed. Returns whether the slot was written.
    pub fn record_corner_temp(&mut self, corner: Corner, origin: CornerOrigin, kelvin: i32) -> bool {
        if !self.display_mode.shows(origin) {
            return false;
        }
        let celsius = kelvin.saturating_sub(KELVIN_OFFSET);
        *self.corners.slot_mut(corner) = process_temperature(celsius, self.units.temperature);
        true
    }

    /// Flips between tire and brake temperatures. Slot values are kept until the
    /// next reading of the newly selected origin arrives.
    pub fn toggle_display_mode(&mut self) -> DisplayMode {
        self.display_mode = self.display_mode.toggled();
        self.display_mode
    }
}

/// "0" is neutral and "-1" reverse; every other gear label passes through.
pub fn gear_label(raw: &str) -> String {
    match raw {
        "0" => "n".into(),
        "-1" => "r".into(),
        other => other.into(),
    }
}
