//! # BMS HV UI
//!
//! Control loop and console front-end for the BMS HV utility. The control
//! loop drains telemetry from the link worker, renders it into a
//! [`bmshv_core::DisplaySink`] and turns user actions into queued commands.

pub mod console_app;
pub mod dashboard;

pub use console_app::{run_dashboard, run_dashboard_with, spawn_stdin_reader};
pub use dashboard::{
    console_sink::ConsoleSink,
    control::{ControlLoop, LoopStats, TickOutcome},
    input::{help_text, parse_input, ConsoleInput},
};
