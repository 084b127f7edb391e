//! Live dashboard session: applies decoded telemetry to the dashboard state and
//! exposes it to a display surface.

pub mod commands;
pub mod config;
pub mod session;
