//! Control loop
//!
//! Runs on the control context. Each tick refreshes the connection status,
//! takes at most one telemetry line from the inbound queue and renders it;
//! it never waits for data. User actions become command tokens on the
//! outbound queue.

use bmshv_communication::{LinkChannels, LinkStatus};
use bmshv_core::config::MonitorConfig;
use bmshv_core::display::{DisplaySink, FieldId};
use bmshv_core::telemetry::{TelemetryDecoder, TelemetrySchema};
use bmshv_core::view::{build_view, render};
use bmshv_core::{AggregationError, DecodeError, Error, OutboundCommand, UserAction};

const CONNECTED: &str = "Connected";
const DISCONNECTED: &str = "Disconnected";

/// What a single tick did
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// No telemetry was waiting
    Idle,
    /// A snapshot was rendered
    Rendered,
    /// The line was skipped because it did not decode
    DecodeFailed(DecodeError),
    /// The snapshot was skipped because it does not fit the pack layout
    LayoutFailed(AggregationError),
}

/// Counters kept across ticks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub ticks: u64,
    pub rendered: u64,
    pub decode_failures: u64,
    pub layout_failures: u64,
    pub commands_queued: u64,
    pub commands_rejected: u64,
}

pub struct ControlLoop<S: DisplaySink> {
    config: MonitorConfig,
    decoder: TelemetryDecoder,
    channels: LinkChannels,
    status: LinkStatus,
    sink: S,
    last_connection: Option<bool>,
    stats: LoopStats,
}

impl<S: DisplaySink> ControlLoop<S> {
    pub fn new(config: MonitorConfig, channels: LinkChannels, status: LinkStatus, sink: S) -> Self {
        let decoder = TelemetryDecoder::new(TelemetrySchema::from_features(&config.features));
        Self {
            config,
            decoder,
            channels,
            status,
            sink,
            last_connection: None,
            stats: LoopStats::default(),
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Run one poll of the render cycle
    pub fn tick(&mut self) -> TickOutcome {
        self.stats.ticks += 1;

        let connected = self.status.is_connected();
        let changed = self.last_connection != Some(connected);
        self.last_connection = Some(connected);
        self.sink.set_status(
            FieldId::ConnectionStatus,
            if connected { CONNECTED } else { DISCONNECTED },
        );

        let Some(line) = self.channels.inbound.try_pop() else {
            if changed {
                self.sink.refresh();
            }
            return TickOutcome::Idle;
        };

        let snapshot = match self.decoder.decode(&line) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.stats.decode_failures += 1;
                tracing::warn!(error = %e, "Skipping undecodable telemetry");
                return TickOutcome::DecodeFailed(e);
            }
        };

        let view = match build_view(&snapshot, &self.config) {
            Ok(view) => view,
            Err(e) => {
                self.stats.layout_failures += 1;
                tracing::error!(error = %e, "Telemetry does not match the pack layout");
                return TickOutcome::LayoutFailed(e);
            }
        };

        if let Some(faults) = &snapshot.faults {
            let active: Vec<&str> = faults.active().map(|kind| kind.field_name()).collect();
            if !active.is_empty() {
                tracing::debug!(faults = ?active, "BMS reports active faults");
            }
        }

        render(&view, &mut self.sink);
        self.stats.rendered += 1;
        tracing::debug!(timestamp = ?snapshot.timestamp_secs(), "Telemetry rendered");
        TickOutcome::Rendered
    }

    /// Queue the command token for a user action
    ///
    /// Fails with a queue overflow while an earlier command is still pending;
    /// the pending command is kept.
    pub fn dispatch(&mut self, action: UserAction) -> Result<OutboundCommand, Error> {
        let command = self.config.commands.command(action)?;

        match self.channels.outbound.try_push(command.clone()) {
            Ok(()) => {
                self.stats.commands_queued += 1;
                tracing::info!(action = %action, command = %command, "Command queued");
                Ok(command)
            }
            Err(e) => {
                self.stats.commands_rejected += 1;
                Err(e.into())
            }
        }
    }
}
