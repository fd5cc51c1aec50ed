//! Link abstractions
//!
//! [`LinkPort`] is the byte-level view of an open link and [`PortOpener`]
//! produces one from a port name. The physical implementation lives in
//! [`serial`]; tests substitute simulated ports.

pub mod connection;
pub mod queue;
pub mod serial;
pub mod stop;
pub mod worker;

use bmshv_core::config::LinkSettings;
use parking_lot::RwLock;
use std::fmt;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// An open, line-oriented link to the BMS
pub trait LinkPort: Send {
    /// Write all bytes and flush
    fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Discard everything received but not yet read
    fn clear_input(&mut self) -> io::Result<()>;

    /// Read up to and including the next `\n`
    ///
    /// Returns whatever arrived before `timeout` expired, which is empty when
    /// nothing did. Only I/O faults are errors.
    fn read_line(&mut self, timeout: Duration) -> io::Result<Vec<u8>>;

    /// Port identifier for log messages
    fn name(&self) -> String;

    /// Release the port
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Factory for [`LinkPort`]s
pub trait PortOpener: Send {
    /// Open `port` with the link settings
    fn open(&mut self, port: &str, settings: &LinkSettings) -> io::Result<Box<dyn LinkPort>>;

    /// One line per port that could be opened, logged when opening fails
    fn available_ports(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Connection state of the link
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Closed,
    Opening,
    Open,
    /// An I/O fault was seen; the handle is about to be closed
    Degraded,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "Closed"),
            Self::Opening => write!(f, "Opening"),
            Self::Open => write!(f, "Open"),
            Self::Degraded => write!(f, "Degraded"),
        }
    }
}

#[derive(Debug, Default)]
struct LinkStatusInner {
    connected: AtomicBool,
    state: RwLock<ConnectionState>,
}

/// Connection indicator shared between the link worker and the control loop
///
/// The worker is the only writer. `connected` is true exactly while the
/// state is [`ConnectionState::Open`].
#[derive(Debug, Clone, Default)]
pub struct LinkStatus {
    inner: Arc<LinkStatusInner>,
}

impl LinkStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.inner.connected.load(Ordering::Acquire)
    }

    pub fn state(&self) -> ConnectionState {
        *self.inner.state.read()
    }

    /// Move to `state`, updating the connected flag with it
    pub fn set_state(&self, state: ConnectionState) {
        let mut current = self.inner.state.write();
        *current = state;
        self.inner
            .connected
            .store(state == ConnectionState::Open, Ordering::Release);
    }
}
