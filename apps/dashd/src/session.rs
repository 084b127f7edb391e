use std::sync::Arc;
use anyhow::Result;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{info, warn};

use model::*;
use gauge::RpmGauge;
use dash_prefs::{restore_units, save_units, PreferenceStore};
use dash_ingest_core::{IngestError, Payload, TelemetryMessage, TelemetrySink, TelemetrySource, TelemetryTag};

/// What the display layer reads: the dashboard values plus the RPM gauge.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub state: DashboardState,
    pub rpm_gauge: RpmGauge,
}

/// Owner of the live dashboard. All writes go through `inner` and are published
/// to subscribers.
pub struct DashSession {
    inner: Mutex<Inner>,
    updates: watch::Sender<Snapshot>,
}

struct Inner {
    state: DashboardState,
    gauge: RpmGauge,
    prefs: Box<dyn PreferenceStore>,
}

impl DashSession {
    /// Restores units from `prefs` and starts from an empty dashboard.
    pub fn new(mut prefs: Box<dyn PreferenceStore>) -> Result<Self> {
        let units = restore_units(prefs.as_mut())?;
        let inner = Inner {
            state: DashboardState::with_units(units),
            gauge: RpmGauge::default(),
            prefs,
        };
        let (updates, _) = watch::channel(inner.snapshot());
        Ok(Self { inner: Mutex::new(inner), updates })
    }

    pub fn snapshot(&self) -> Snapshot {
        self.inner.lock().snapshot()
    }

    /// Receiver that sees a fresh snapshot after every change.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.updates.subscribe()
    }

    /// Persists `units` and switches to them. Values already on the dashboard keep
    /// their old units until the next reading for each channel. If the store
    /// rejects the write the dashboard stays on the previous units.
    pub fn apply_settings(&self, units: Units) -> Result<()> {
        let mut inner = self.inner.lock();
        let previous = inner.state.units;
        if let Err(e) = save_units(inner.prefs.as_mut(), &units) {
            // the failed save may have written some keys already
            if let Err(undo) = save_units(inner.prefs.as_mut(), &previous) {
                warn!(error = %undo, "could not put back previous units");
            }
            return Err(e);
        }
        inner.state.units = units;
        info!(?units, "units changed");
        self.publish(&inner);
        Ok(())
    }

    pub fn toggle_display_mode(&self) -> DisplayMode {
        let mut inner = self.inner.lock();
        let mode = inner.state.toggle_display_mode();
        self.publish(&inner);
        mode
    }

    fn publish(&self, inner: &Inner) {
        self.updates.send_replace(inner.snapshot());
    }
}

impl TelemetrySink for DashSession {
    fn accept(&self, msg: TelemetryMessage) {
        let mut inner = self.inner.lock();
        if inner.feed_message(&msg) {
            self.publish(&inner);
        }
    }
}

impl Inner {
    fn snapshot(&self) -> Snapshot {
        Snapshot { state: self.state.clone(), rpm_gauge: self.gauge }
    }

    /// Applies one decoded message. Returns false when the message left the
    /// dashboard untouched (reserved tag, or a corner reading for the hidden origin).
    fn feed_message(&mut self, msg: &TelemetryMessage) -> bool {
        let st = &mut self.state;
        if let Some((corner, origin)) = msg.tag.corner() {
            return match msg.payload.as_int() {
                Some(kelvin) => st.record_corner_temp(corner, origin, kelvin),
                None => false,
            };
        }

        match (msg.tag, &msg.payload) {
            (TelemetryTag::Gear, Payload::Text(g)) => st.set_gear(g),
            (TelemetryTag::Rpm, Payload::Int(rpm)) => {
                st.current_rpm = *rpm;
                self.gauge = gauge::update(*rpm, st.max_rpm, &self.gauge);
            }
            (TelemetryTag::OilTemp, Payload::Int(v)) => st.set_oil_temp(*v),
            (TelemetryTag::WaterTemp, Payload::Int(v)) => st.set_water_temp(*v),
            (TelemetryTag::Fuel, Payload::Int(v)) => st.set_fuel(*v),
            (TelemetryTag::MaxRpm, Payload::Int(v)) => st.max_rpm = *v,
            (TelemetryTag::LapNumber, Payload::Int(v)) => st.lap_number = *v,
            (TelemetryTag::MaxLaps, Payload::Int(v)) => st.set_max_laps(*v),
            // lap time is reserved; mismatched payload kinds never leave the decoder
            _ => return false,
        }
        true
    }
}

/// Runs `src` with the session as its sink until the source fails.
pub async fn run_source<S: TelemetrySource>(src: S, sess: Arc<DashSession>) -> Result<(), IngestError> {
    src.run(sess).await
}
