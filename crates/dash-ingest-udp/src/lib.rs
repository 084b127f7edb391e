use anyhow::Context;
use tokio::net::UdpSocket;
use serde::{Serialize, Deserialize};
use std::{io, sync::Arc};
use tracing::{info, trace, warn};
use dash_ingest_core::*;

pub const DEFAULT_PORT: u16 = 1337;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UdpConfig {
    pub bind_addr: String,       // e.g. "0.0.0.0:1337"
}

impl Default for UdpConfig {
    fn default() -> Self {
        Self { bind_addr: format!("0.0.0.0:{}", DEFAULT_PORT) }
    }
}

pub struct UdpSource {
    cfg: UdpConfig
}

impl UdpSource {
    pub fn new(cfg: UdpConfig) -> Self { Self { cfg } }
}

#[async_trait::async_trait]
impl TelemetrySource for UdpSource {
    async fn run(&self, sink: Arc<dyn TelemetrySink>) -> Result<(), IngestError> {
        let socket = UdpSocket::bind(&self.cfg.bind_addr).await
            .with_context(|| format!("bind {}", self.cfg.bind_addr))?;
        info!(addr = %self.cfg.bind_addr, "listening for telemetry");
        listen(socket, sink).await
    }
}

// Largest UDP payload, so no datagram is ever cut short.
const RECV_BUF_LEN: usize = 65536;

// Winsock error for a datagram larger than the receive buffer.
const WSAEMSGSIZE: i32 = 10040;

/// Receive loop on an already bound socket. Each datagram is decoded and handed
/// to `sink` before the next receive is issued. Returns only on a socket error
/// that is not tied to a single datagram. Dropping the future closes the socket
/// and ends the pending receive quietly.
pub async fn listen(socket: UdpSocket, sink: Arc<dyn TelemetrySink>) -> Result<(), IngestError> {
    let mut buf = vec![0u8; RECV_BUF_LEN];
    loop {
        let (len, peer) = match socket.recv_from(&mut buf).await {
            Ok(r) => r,
            Err(e) if is_transient(&e) => {
                warn!(error = %e, "udp receive failed, continuing");
                continue;
            }
            Err(e) => return Err(anyhow::Error::from(e).context("udp receive").into()),
        };
        match decode_datagram(&buf[..len]) {
            Ok(msg) => sink.accept(msg),
            Err(e) => trace!(%peer, error = %e, "dropped datagram"),
        }
    }
}

// Errors that concern one datagram rather than the socket. Windows reports an ICMP
// port-unreachable from an earlier send as a reset on the next receive, and fails
// the receive outright for an oversized datagram.
fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionRefused | io::ErrorKind::Interrupted
    ) || e.raw_os_error() == Some(WSAEMSGSIZE)
}
