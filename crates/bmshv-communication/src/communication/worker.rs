//! Link worker
//!
//! Owns the port handle on a dedicated thread. While connected it runs one
//! exchange per cycle: keep-alive, at most one queued command, input flush,
//! then one telemetry line into the inbound queue. An I/O fault drops the
//! handle and sends the worker back to reconnecting.

use super::connection::ConnectionManager;
use super::queue::BoundedQueue;
use super::stop::StopSignal;
use super::{LinkPort, LinkStatus, PortOpener};
use bmshv_core::config::{LinkSettings, MonitorConfig, QueueSettings};
use bmshv_core::{ConnectionError, OutboundCommand, ProtocolError, QueueError};
use std::io;
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// Name of the worker thread
pub const THREAD_NAME: &str = "bms-link";

/// Link worker lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    AwaitingPort,
    Connected,
    Reconnecting,
    Stopped,
}

/// Result of one connected cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A line was queued for the control loop
    Received,
    /// A line was read but the inbound queue overflowed
    Overflowed(QueueError),
    /// Nothing arrived before the read timeout
    NoData,
}

/// Queues shared by the link worker and the control loop
#[derive(Debug, Clone)]
pub struct LinkChannels {
    /// Raw telemetry lines, worker to control loop
    pub inbound: BoundedQueue<String>,
    /// Command tokens, control loop to worker
    pub outbound: BoundedQueue<OutboundCommand>,
}

impl LinkChannels {
    pub fn new(settings: &QueueSettings) -> Self {
        Self {
            inbound: BoundedQueue::new(
                "inbound",
                settings.inbound_capacity,
                settings.inbound_policy,
            ),
            outbound: BoundedQueue::new(
                "outbound",
                settings.outbound_capacity,
                settings.outbound_policy,
            ),
        }
    }
}

impl Default for LinkChannels {
    fn default() -> Self {
        Self::new(&QueueSettings::default())
    }
}

pub struct LinkWorker {
    connection: ConnectionManager,
    channels: LinkChannels,
    settings: LinkSettings,
    keep_alive: Option<OutboundCommand>,
    stop: StopSignal,
    state: WorkerState,
}

impl LinkWorker {
    pub fn new(
        connection: ConnectionManager,
        channels: LinkChannels,
        settings: LinkSettings,
        keep_alive: Option<OutboundCommand>,
        stop: StopSignal,
    ) -> Self {
        Self {
            connection,
            channels,
            settings,
            keep_alive,
            stop,
            state: WorkerState::AwaitingPort,
        }
    }

    /// Build a worker for `port_name` from the monitor configuration
    pub fn from_config(
        port_name: impl Into<String>,
        config: &MonitorConfig,
        opener: Box<dyn PortOpener>,
        channels: LinkChannels,
        status: LinkStatus,
        stop: StopSignal,
    ) -> Result<Self, ProtocolError> {
        let keep_alive = if config.link.keep_alive {
            Some(config.commands.keep_alive_command()?)
        } else {
            None
        };
        let connection = ConnectionManager::new(port_name, config.link, opener, status);

        Ok(Self::new(connection, channels, config.link, keep_alive, stop))
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn status(&self) -> &LinkStatus {
        self.connection.status()
    }

    /// Run until the stop signal is raised
    pub fn run(&mut self) {
        let mut port: Option<Box<dyn LinkPort>> = None;
        tracing::info!(port = %self.connection.port_name(), "Link worker started");

        loop {
            if self.stop.is_raised() {
                if let Some(active) = port.take() {
                    self.connection.close(active);
                }
                self.state = WorkerState::Stopped;
            }

            match self.state {
                WorkerState::AwaitingPort | WorkerState::Reconnecting => {
                    match self.connection.open_with_retry(&self.stop) {
                        Ok(opened) => {
                            port = Some(opened);
                            self.state = WorkerState::Connected;
                        }
                        Err(ConnectionError::Cancelled) => {}
                        Err(e) => tracing::warn!(error = %e, "Unexpected connection error"),
                    }
                }
                WorkerState::Connected => {
                    let Some(active) = port.as_mut() else {
                        self.state = WorkerState::Reconnecting;
                        continue;
                    };

                    let started = Instant::now();
                    match self.run_cycle(active.as_mut()) {
                        Ok(_) => {
                            if let Some(rest) =
                                self.settings.cycle_period().checked_sub(started.elapsed())
                            {
                                self.stop.wait_timeout(rest);
                            }
                        }
                        Err(e) => {
                            let fault = self.connection.mark_degraded(&e);
                            tracing::error!(error = %fault, "Link lost, reconnecting");
                            if let Some(active) = port.take() {
                                self.connection.close(active);
                            }
                            self.state = WorkerState::Reconnecting;
                        }
                    }
                }
                WorkerState::Stopped => break,
            }
        }

        tracing::info!("Link worker stopped");
    }

    /// One exchange on an open port
    ///
    /// Errors are I/O faults only; a missing line or a full queue is an
    /// outcome, not an error.
    pub fn run_cycle(&mut self, port: &mut dyn LinkPort) -> io::Result<CycleOutcome> {
        if let Some(keep_alive) = &self.keep_alive {
            port.write_all(keep_alive.as_bytes())?;
        }

        match self.channels.outbound.try_pop() {
            Some(command) => {
                port.write_all(command.as_bytes())?;
                tracing::info!(command = %command, "Command sent");
            }
            None => tracing::trace!("No command to send"),
        }

        port.clear_input()?;
        let timeout = self.settings.read_timeout();
        if self.settings.resync_after_flush {
            // The flush usually lands mid-line; drop the remainder.
            port.read_line(timeout)?;
        }

        let raw = port.read_line(timeout)?;
        let line = String::from_utf8_lossy(&raw)
            .trim_end_matches(['\r', '\n'])
            .to_string();
        if line.is_empty() {
            tracing::warn!("No telemetry received this cycle");
            return Ok(CycleOutcome::NoData);
        }

        match self.channels.inbound.try_push(line) {
            Ok(()) => Ok(CycleOutcome::Received),
            Err(e) => {
                tracing::warn!(error = %e, "Telemetry queue overflow");
                Ok(CycleOutcome::Overflowed(e))
            }
        }
    }

    /// Start the worker on its own named thread
    pub fn spawn(mut self) -> io::Result<LinkWorkerHandle> {
        let stop = self.stop.clone();
        let status = self.connection.status().clone();
        let thread = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || self.run())?;

        Ok(LinkWorkerHandle {
            stop,
            status,
            thread: Some(thread),
        })
    }
}

/// Control side of a running link worker
///
/// Dropping the handle raises the stop signal without waiting.
pub struct LinkWorkerHandle {
    stop: StopSignal,
    status: LinkStatus,
    thread: Option<JoinHandle<()>>,
}

impl LinkWorkerHandle {
    pub fn status(&self) -> &LinkStatus {
        &self.status
    }

    /// Ask the worker to stop
    pub fn stop(&self) {
        self.stop.raise();
    }

    /// Wait for the worker thread to exit
    pub fn join(mut self) -> thread::Result<()> {
        match self.thread.take() {
            Some(thread) => thread.join(),
            None => Ok(()),
        }
    }

    /// Stop the worker and wait for it
    ///
    /// Returns within one read timeout plus one cycle.
    pub fn shutdown(self) -> thread::Result<()> {
        self.stop();
        self.join()
    }
}

impl Drop for LinkWorkerHandle {
    fn drop(&mut self) {
        self.stop.raise();
    }
}
