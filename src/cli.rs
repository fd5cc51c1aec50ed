//! Command line arguments

use clap::Parser;

/// Monitor and control a BMS HV unit over a serial link
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "bmshv", version, about)]
pub struct Args {
    /// Serial port the BMS is attached to (e.g. /dev/ttyUSB0 or COM3)
    pub port: String,
}
