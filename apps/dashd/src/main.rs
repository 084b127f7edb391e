use std::{sync::Arc, time::Duration};
use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dash_ingest_udp::UdpSource;
use dash_prefs::{JsonFileStore, MemoryStore, PreferenceStore};
use dashd::{commands, config::DashConfig, session::{run_source, DashSession}};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = DashConfig::from_env()?;
    let prefs: Box<dyn PreferenceStore> = match &cfg.prefs_path {
        Some(path) => {
            info!(path = %path.display(), "loading settings");
            Box::new(JsonFileStore::open(path)?)
        }
        None => {
            warn!("no config directory, settings will not be saved");
            Box::new(MemoryStore::new())
        }
    };
    let sess = Arc::new(DashSession::new(prefs)?);

    let display = tokio::spawn(headless_display(sess.clone(), cfg.snapshot_interval));

    // dropping the listener future on ctrl-c closes the socket
    let result = tokio::select! {
        r = run_source(UdpSource::new(cfg.listener.clone()), sess.clone()) => {
            r.context("telemetry listener stopped")
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down");
            Ok(())
        }
    };
    display.abort();
    result
}

async fn headless_display(sess: Arc<DashSession>, every: Duration) {
    let mut tick = tokio::time::interval(every);
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        tick.tick().await;
        info!("{}", commands::summary_line(&sess.snapshot()));
    }
}
