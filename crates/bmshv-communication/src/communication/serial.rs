//! Serial port implementation
//!
//! Provides the physical link to the BMS over USB or RS-232 through the
//! `serialport` crate:
//! - Port enumeration and discovery
//! - Line reads with a deadline on top of short blocking reads
//! - Input flushing

use super::{LinkPort, PortOpener};
use bmshv_core::config::LinkSettings;
use bmshv_core::{Error, Result};
use std::fmt;
use std::io::{self, Read, Write};
use std::time::{Duration, Instant};

/// Blocking slice used for each underlying read while waiting for a line
const READ_SLICE: Duration = Duration::from_millis(20);

/// A serial port the BMS could be attached to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialPortInfo {
    /// Port name (e.g., "/dev/ttyUSB0", "COM3")
    pub port_name: String,
    /// Adapter description (e.g., "USB FTDI FT232R")
    pub description: String,
    /// USB vendor and product ID when the port is a USB adapter
    pub usb_ids: Option<(u16, u16)>,
}

impl SerialPortInfo {
    fn from_system(port: &serialport::SerialPortInfo) -> Self {
        let (description, usb_ids) = match &port.port_type {
            serialport::SerialPortType::UsbPort(usb) => (
                format!(
                    "USB {} {}",
                    usb.manufacturer.as_deref().unwrap_or("Device"),
                    usb.product.as_deref().unwrap_or("Serial Port")
                ),
                Some((usb.vid, usb.pid)),
            ),
            serialport::SerialPortType::BluetoothPort => ("Bluetooth Serial".to_string(), None),
            serialport::SerialPortType::PciPort => ("PCI Serial".to_string(), None),
            _ => ("Serial Port".to_string(), None),
        };

        Self {
            port_name: port.port_name.clone(),
            description,
            usb_ids,
        }
    }
}

impl fmt::Display for SerialPortInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.port_name, self.description)?;
        if let Some((vid, pid)) = self.usb_ids {
            write!(f, " ({:04x}:{:04x})", vid, pid)?;
        }
        Ok(())
    }
}

/// List serial ports the BMS could be attached to
///
/// Only USB and COM style ports are returned:
/// - Windows: COM* (e.g., COM1, COM3)
/// - Linux: /dev/ttyUSB*, /dev/ttyACM*
/// - macOS: /dev/cu.usbserial-*, /dev/cu.usbmodem*
pub fn list_ports() -> Result<Vec<SerialPortInfo>> {
    let ports = serialport::available_ports().map_err(|e| {
        tracing::error!("Failed to enumerate serial ports: {}", e);
        Error::other(format!("Failed to enumerate ports: {}", e))
    })?;

    Ok(ports
        .iter()
        .filter(|port| is_candidate_port(&port.port_name))
        .map(SerialPortInfo::from_system)
        .collect())
}

fn is_candidate_port(port_name: &str) -> bool {
    if let Some(number) = port_name.strip_prefix("COM") {
        return !number.is_empty() && number.chars().all(|c| c.is_ascii_digit());
    }

    port_name.starts_with("/dev/ttyUSB")
        || port_name.starts_with("/dev/ttyACM")
        || port_name.starts_with("/dev/cu.usbserial-")
        || port_name.starts_with("/dev/cu.usbmodem")
}

/// Physical serial port
pub struct RealSerialPort {
    port: Box<dyn serialport::SerialPort>,
    name: String,
    /// Bytes read past the last returned line
    pending: Vec<u8>,
}

impl RealSerialPort {
    /// Open `name` at the configured baud rate, 8N1, no flow control
    pub fn open(name: &str, settings: &LinkSettings) -> io::Result<Self> {
        let port = serialport::new(name, settings.baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .stop_bits(serialport::StopBits::One)
            .parity(serialport::Parity::None)
            .flow_control(serialport::FlowControl::None)
            .timeout(READ_SLICE)
            .open()?;

        Ok(Self {
            port,
            name: name.to_string(),
            pending: Vec::new(),
        })
    }

    fn take_line(&mut self) -> Option<Vec<u8>> {
        let end = self.pending.iter().position(|b| *b == b'\n')?;
        Some(self.pending.drain(..=end).collect())
    }
}

impl LinkPort for RealSerialPort {
    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.port.write_all(data)?;
        self.port.flush()
    }

    fn clear_input(&mut self) -> io::Result<()> {
        self.pending.clear();
        self.port.clear(serialport::ClearBuffer::Input)?;
        Ok(())
    }

    fn read_line(&mut self, timeout: Duration) -> io::Result<Vec<u8>> {
        let deadline = Instant::now() + timeout;
        let mut chunk = [0u8; 256];

        loop {
            if let Some(line) = self.take_line() {
                return Ok(line);
            }
            if Instant::now() >= deadline {
                return Ok(std::mem::take(&mut self.pending));
            }

            match self.port.read(&mut chunk) {
                Ok(n) => self.pending.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == io::ErrorKind::TimedOut => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

/// Opens [`RealSerialPort`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialOpener;

impl PortOpener for SerialOpener {
    fn open(&mut self, port: &str, settings: &LinkSettings) -> io::Result<Box<dyn LinkPort>> {
        Ok(Box::new(RealSerialPort::open(port, settings)?))
    }

    fn available_ports(&self) -> Vec<String> {
        match list_ports() {
            Ok(ports) => ports.iter().map(ToString::to_string).collect(),
            Err(_) => Vec::new(),
        }
    }
}
