//! Connection manager
//!
//! Opens and closes the link through a [`PortOpener`] and keeps the shared
//! [`LinkStatus`] in step. Opening failures are never fatal:
//! [`ConnectionManager::open_with_retry`] keeps trying with a fixed back-off
//! until it succeeds or the stop signal is raised.

use super::stop::StopSignal;
use super::{ConnectionState, LinkPort, LinkStatus, PortOpener};
use bmshv_core::config::LinkSettings;
use bmshv_core::ConnectionError;
use std::io;

pub struct ConnectionManager {
    port_name: String,
    settings: LinkSettings,
    opener: Box<dyn PortOpener>,
    status: LinkStatus,
    /// Available ports are listed once, after the first failed attempt
    hinted: bool,
}

impl ConnectionManager {
    pub fn new(
        port_name: impl Into<String>,
        settings: LinkSettings,
        opener: Box<dyn PortOpener>,
        status: LinkStatus,
    ) -> Self {
        Self {
            port_name: port_name.into(),
            settings,
            opener,
            status,
            hinted: false,
        }
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    pub fn status(&self) -> &LinkStatus {
        &self.status
    }

    /// Make a single attempt to open the port
    pub fn open(&mut self) -> Result<Box<dyn LinkPort>, ConnectionError> {
        self.status.set_state(ConnectionState::Opening);

        match self.opener.open(&self.port_name, &self.settings) {
            Ok(port) => {
                self.status.set_state(ConnectionState::Open);
                tracing::info!(
                    port = %self.port_name,
                    baud = self.settings.baud_rate,
                    "Connected to BMS"
                );
                Ok(port)
            }
            Err(e) => {
                self.status.set_state(ConnectionState::Closed);
                tracing::error!(port = %self.port_name, error = %e, "Port not available");
                if !self.hinted {
                    self.hinted = true;
                    let available = self.opener.available_ports();
                    if available.is_empty() {
                        tracing::info!("No serial ports detected");
                    } else {
                        tracing::info!(ports = %available.join("; "), "Available serial ports");
                    }
                }
                Err(ConnectionError::OpenFailed {
                    port: self.port_name.clone(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Open the port, retrying after each failure until `stop` is raised
    pub fn open_with_retry(
        &mut self,
        stop: &StopSignal,
    ) -> Result<Box<dyn LinkPort>, ConnectionError> {
        let backoff = self.settings.reconnect_backoff();
        let mut attempt: u64 = 0;

        loop {
            if stop.is_raised() {
                return Err(ConnectionError::Cancelled);
            }

            attempt += 1;
            match self.open() {
                Ok(port) => return Ok(port),
                Err(e) => {
                    tracing::debug!(attempt, error = %e, "Retrying in {:?}", backoff);
                    if stop.wait_timeout(backoff) {
                        return Err(ConnectionError::Cancelled);
                    }
                }
            }
        }
    }

    /// Release a handle and mark the link closed
    pub fn close(&mut self, mut port: Box<dyn LinkPort>) {
        if let Err(e) = port.close() {
            tracing::warn!(port = %port.name(), error = %e, "Error while closing port");
        }
        self.status.set_state(ConnectionState::Closed);
    }

    /// Record an I/O fault on the open link
    pub fn mark_degraded(&self, err: &io::Error) -> ConnectionError {
        self.status.set_state(ConnectionState::Degraded);
        ConnectionError::Transient {
            port: self.port_name.clone(),
            reason: err.to_string(),
        }
    }
}
