// Operations the display surface calls on the session.
use serde::{Deserialize, Serialize};

use model::*;
use crate::session::{DashSession, Snapshot};

/// Unit selection as the settings dialog exchanges it: list indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct SettingsInput {
    pub temperature: i32,
    pub speed: i32,
    pub capacity: i32,
}

impl From<Units> for SettingsInput {
    fn from(u: Units) -> Self {
        Self {
            temperature: u.temperature.index(),
            speed: u.speed.index(),
            capacity: u.capacity.index(),
        }
    }
}

impl TryFrom<SettingsInput> for Units {
    type Error = InvalidUnitIndex;

    fn try_from(s: SettingsInput) -> Result<Self, Self::Error> {
        Ok(Units {
            temperature: s.temperature.try_into()?,
            speed: s.speed.try_into()?,
            capacity: s.capacity.try_into()?,
        })
    }
}

pub fn dashboard_snapshot(sess: &DashSession) -> serde_json::Value {
    serde_json::to_value(sess.snapshot()).unwrap_or_default()
}

pub fn current_settings(sess: &DashSession) -> SettingsInput {
    sess.snapshot().state.units.into()
}

/// Called when the user confirms the settings dialog.
pub fn confirm_settings(sess: &DashSession, input: SettingsInput) -> Result<(), String> {
    let units = Units::try_from(input).map_err(|e| e.to_string())?;
    sess.apply_settings(units).map_err(|e| format!("{:#}", e))
}

/// Called on a click on the dashboard.
pub fn toggle_corner_temps(sess: &DashSession) -> DisplayMode {
    sess.toggle_display_mode()
}

/// One-line text rendering used by the headless display.
pub fn summary_line(snap: &Snapshot) -> String {
    let st = &snap.state;
    let temp = match st.units.temperature {
        TemperatureUnit::Celsius => "C",
        TemperatureUnit::Fahrenheit => "F",
    };
    let fuel = match st.units.capacity {
        CapacityUnit::Liters => "l",
        CapacityUnit::Gallons => "gal",
    };
    let laps = if st.max_laps == 0 {
        format!("{}", st.lap_number)
    } else {
        format!("{}/{}", st.lap_number, st.max_laps)
    };
    let corners = match st.display_mode {
        DisplayMode::ShowingTireTemps => "tire",
        DisplayMode::ShowingBrakeTemps => "brake",
    };
    let bar: String = snap
        .rpm_gauge
        .segments
        .iter()
        .map(|s| match s {
            gauge::SegmentColor::Off => '.',
            gauge::SegmentColor::Green => 'g',
            gauge::SegmentColor::Red => 'r',
            gauge::SegmentColor::Aqua => 'a',
        })
        .collect();
    let c = &st.corners;
    format!(
        "gear {} rpm {} [{}] lap {} oil {}{t} water {}{t} fuel {}{} {} {}/{}/{}/{}{t}",
        st.gear, st.current_rpm, bar, laps, st.oil_temp, st.water_temp, st.fuel, fuel,
        corners, c.lf, c.rf, c.lr, c.rr,
        t = temp,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use dash_ingest_core::{TelemetryMessage, TelemetrySink, TelemetryTag};
    use dash_prefs::MemoryStore;

    fn session() -> DashSession {
        DashSession::new(Box::new(MemoryStore::new())).unwrap()
    }

    #[test]
    fn settings_round_trip_through_indices() {
        let sess = session();
        assert_eq!(current_settings(&sess), SettingsInput { temperature: 0, speed: 0, capacity: 0 });
        let input = SettingsInput { temperature: 1, speed: 1, capacity: 0 };
        confirm_settings(&sess, input).unwrap();
        assert_eq!(current_settings(&sess), input);
    }

    #[test]
    fn invalid_settings_are_rejected_without_change() {
        let sess = session();
        let err = confirm_settings(&sess, SettingsInput { temperature: 0, speed: 0, capacity: 4 }).unwrap_err();
        assert!(err.contains("capacity"), "{}", err);
        assert_eq!(sess.snapshot().state.units, Units::default());
    }

    #[test]
    fn toggle_flips_back_and_forth() {
        let sess = session();
        assert_eq!(toggle_corner_temps(&sess), DisplayMode::ShowingBrakeTemps);
        assert_eq!(toggle_corner_temps(&sess), DisplayMode::ShowingTireTemps);
    }

    #[test]
    fn snapshot_json_has_gauge_and_state() {
        let sess = session();
        sess.accept(TelemetryMessage::int(TelemetryTag::MaxRpm, 8000));
        sess.accept(TelemetryMessage::int(TelemetryTag::Rpm, 8000));
        let v = dashboard_snapshot(&sess);
        assert_eq!(v["state"]["max_rpm"], 8000);
        assert_eq!(v["rpm_gauge"]["segments"][15], "Aqua");
    }

    #[test]
    fn summary_line_renders_gauge_and_units() {
        let sess = session();
        sess.accept(TelemetryMessage::int(TelemetryTag::MaxRpm, 8000));
        sess.accept(TelemetryMessage::int(TelemetryTag::Rpm, 6000));
        sess.accept(TelemetryMessage::text(TelemetryTag::Gear, "4"));
        sess.accept(TelemetryMessage::int(TelemetryTag::LapNumber, 2));
        sess.accept(TelemetryMessage::int(TelemetryTag::MaxLaps, 10));
        let line = summary_line(&sess.snapshot());
        assert!(line.starts_with("gear 4 rpm 6000 [gggggrrr........] lap 2/10 oil 0C"), "{}", line);
        assert!(line.ends_with("tire 0/0/0/0C"), "{}", line);
    }
}
