//! BMS wire protocol
//!
//! Outbound command tokens and the user actions that produce them.

mod commands;

pub use commands::{ChargeCurrent, CommandTokens, OutboundCommand, UserAction};
