//! # BMS HV Communication
//!
//! Serial link to the BMS: the link worker thread, its connection manager and
//! reconnect cycle, and the bounded queues it shares with the control loop.

pub mod communication;

pub use communication::{
    connection::ConnectionManager,
    queue::BoundedQueue,
    serial::{list_ports, RealSerialPort, SerialOpener, SerialPortInfo},
    stop::StopSignal,
    worker::{CycleOutcome, LinkChannels, LinkWorker, LinkWorkerHandle, WorkerState},
    ConnectionState, LinkPort, LinkStatus, PortOpener,
};
