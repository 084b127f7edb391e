use anyhow::{Context, Result};
use std::{path::PathBuf, time::Duration};
use dash_ingest_udp::UdpConfig;
use dash_prefs::JsonFileStore;

pub const BIND_VAR: &str = "DASHINFO_BIND";
pub const PREFS_VAR: &str = "DASHINFO_PREFS";
pub const SNAPSHOT_MS_VAR: &str = "DASHINFO_SNAPSHOT_MS";

#[derive(Clone, Debug)]
pub struct DashConfig {
    pub listener: UdpConfig,
    /// `None` when the platform has no config directory; settings then live in memory only.
    pub prefs_path: Option<PathBuf>,
    /// How often the headless display logs the dashboard.
    pub snapshot_interval: Duration,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            listener: UdpConfig::default(),
            prefs_path: JsonFileStore::default_path(),
            snapshot_interval: Duration::from_millis(1000),
        }
    }
}

impl DashConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::default();
        if let Some(addr) = lookup(BIND_VAR) {
            addr.parse::<std::net::SocketAddr>()
                .with_context(|| format!("{}={:?} is not a socket address", BIND_VAR, addr))?;
            cfg.listener.bind_addr = addr;
        }
        if let Some(path) = lookup(PREFS_VAR) {
            cfg.prefs_path = Some(PathBuf::from(path));
        }
        if let Some(ms) = lookup(SNAPSHOT_MS_VAR) {
            let ms: u64 = ms.parse()
                .with_context(|| format!("{}={:?} is not a number of milliseconds", SNAPSHOT_MS_VAR, ms))?;
            anyhow::ensure!(ms > 0, "{} must be positive", SNAPSHOT_MS_VAR);
            cfg.snapshot_interval = Duration::from_millis(ms);
        }
        Ok(cfg)
    }
}
