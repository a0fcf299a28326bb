use std::net::{Ipv4Addr, SocketAddr, TcpListener};

use anyhow::Context;
use tracing::{debug, info};

use crate::error::CallbackError;

/// Baseline for automatic port selection.
pub const DEFAULT_PORT: u16 = 8090;

/// Checks which loopback ports are free without keeping any of them.
pub trait PortProbe {
    fn is_available(&self, port: u16) -> bool;

    /// First free port at or after `baseline`.
    fn first_available_from(&self, baseline: u16) -> Result<u16, CallbackError>;
}

/// Probes by binding a throwaway listener on `127.0.0.1` and dropping it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoopbackProbe;

impl LoopbackProbe {
    fn ephemeral_port(&self) -> Result<u16, CallbackError> {
        let listener = TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
            .context("Failed to obtain an ephemeral port from the OS")?;
        let port = listener
            .local_addr()
            .context("Failed to read the ephemeral port")?
            .port();
        Ok(port)
    }
}

impl PortProbe for LoopbackProbe {
    fn is_available(&self, port: u16) -> bool {
        TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, port))).is_ok()
    }

    fn first_available_from(&self, baseline: u16) -> Result<u16, CallbackError> {
        if let Some(port) = (baseline.max(1)..=u16::MAX).find(|port| self.is_available(*port)) {
            return Ok(port);
        }
        debug!("No free port at or after {}, asking the OS", baseline);
        self.ephemeral_port()
    }
}

/// Picks the port the listener will bind.
///
/// A requested port is used exactly or not at all; without one the first free
/// port from [`DEFAULT_PORT`] upward is taken.
pub fn resolve_port<P>(requested: Option<u16>, probe: &P) -> Result<u16, CallbackError>
where
    P: PortProbe + ?Sized,
{
    match requested {
        Some(0) => Err(CallbackError::invalid_port()),
        Some(port) => {
            if probe.is_available(port) {
                Ok(port)
            } else {
                Err(CallbackError::PortUnavailable(port))
            }
        }
        None => {
            let port = probe.first_available_from(DEFAULT_PORT)?;
            if port != DEFAULT_PORT {
                info!("Port {} is busy, using {} instead", DEFAULT_PORT, port);
            }
            Ok(port)
        }
    }
}
