use bmshv_communication::{ConnectionState, LinkChannels, LinkStatus};
use bmshv_core::config::{FillOrder, MonitorConfig, TableGeometry};
use bmshv_core::display::{DisplaySink, FieldId, TableId};
use bmshv_core::{ChargeCurrent, Error, Matrix, UserAction};
use bmshv_ui::{ControlLoop, TickOutcome};
use std::collections::BTreeMap;

const BASE_LINE: &str = r#"{"current":1.0,"acc_voltage":2.0,"car_voltage":3.0,"soc":[0.5,0.6],"cell_voltage":[1.0,2.0,3.0,4.0],"temperature":[10.0,20.0]}"#;

#[derive(Default)]
struct RecordingSink {
    fields: BTreeMap<FieldId, String>,
    tables: BTreeMap<TableId, Matrix<String>>,
    refreshes: usize,
}

impl DisplaySink for RecordingSink {
    fn set_status(&mut self, field: FieldId, text: &str) {
        self.fields.insert(field, text.to_string());
    }

    fn set_table(&mut self, table: TableId, rows: &Matrix<String>) {
        self.tables.insert(table, rows.clone());
    }

    fn refresh(&mut self) {
        self.refreshes += 1;
    }
}

fn small_pack() -> MonitorConfig {
    let mut config = MonitorConfig::default();
    config.pack.cells = TableGeometry::new(2, 2);
    config.pack.temperatures = TableGeometry::new(1, 2);
    config.pack.order = FillOrder::RowMajor;
    config.features.has_discharge_marking = false;
    config.features.has_fault_table = false;
    config
}

fn control_loop() -> (ControlLoop<RecordingSink>, LinkChannels, LinkStatus) {
    let config = small_pack();
    let channels = LinkChannels::new(&config.queues);
    let status = LinkStatus::new();
    let control = ControlLoop::new(
        config,
        channels.clone(),
        status.clone(),
        RecordingSink::default(),
    );
    (control, channels, status)
}

#[test]
fn test_idle_tick_shows_connection_status() {
    let (mut control, _channels, status) = control_loop();

    assert_eq!(control.tick(), TickOutcome::Idle);
    assert_eq!(
        control.sink().fields.get(&FieldId::ConnectionStatus).map(String::as_str),
        Some("Disconnected")
    );
    assert_eq!(control.sink().refreshes, 1);

    // Unchanged status does not redraw
    control.tick();
    assert_eq!(control.sink().refreshes, 1);

    status.set_state(ConnectionState::Open);
    control.tick();
    assert_eq!(
        control.sink().fields.get(&FieldId::ConnectionStatus).map(String::as_str),
        Some("Connected")
    );
    assert_eq!(control.sink().refreshes, 2);
}

#[test]
fn test_tick_renders_queued_line() {
    let (mut control, channels, _status) = control_loop();
    channels.inbound.try_push(BASE_LINE.to_string()).unwrap();

    assert_eq!(control.tick(), TickOutcome::Rendered);
    assert!(channels.inbound.is_empty());

    let sink = control.sink();
    assert_eq!(
        sink.tables.get(&TableId::CellVoltage),
        Some(&vec![
            vec!["1.0000".to_string(), "2.0000".to_string()],
            vec!["3.0000".to_string(), "4.0000".to_string()],
        ])
    );
    assert_eq!(
        sink.tables.get(&TableId::Soc),
        Some(&vec![vec![
            "50.0000".to_string(),
            "60.0000".to_string(),
            "55.0000".to_string(),
            "55.0000".to_string(),
        ]])
    );
    assert_eq!(control.stats().rendered, 1);
}

#[test]
fn test_missing_field_leaves_display_untouched() {
    let (mut control, channels, _status) = control_loop();
    control.tick();
    let before = control.sink().fields.clone();

    channels
        .inbound
        .try_push(r#"{"current":1.0,"acc_voltage":2.0}"#.to_string())
        .unwrap();

    assert!(matches!(control.tick(), TickOutcome::DecodeFailed(_)));
    assert_eq!(control.sink().fields, before);
    assert!(control.sink().tables.is_empty());
    assert_eq!(control.stats().decode_failures, 1);
}

#[test]
fn test_layout_mismatch_is_skipped() {
    let (mut control, channels, _status) = control_loop();
    let line = BASE_LINE.replace("[1.0,2.0,3.0,4.0]", "[1.0,2.0,3.0]");
    channels.inbound.try_push(line).unwrap();

    assert!(matches!(control.tick(), TickOutcome::LayoutFailed(_)));
    assert!(control.sink().tables.is_empty());
    assert_eq!(control.stats().layout_failures, 1);
}

#[test]
fn test_start_charging_enqueues_token_once() {
    let (mut control, channels, _status) = control_loop();

    let command = control.dispatch(UserAction::StartCharging).unwrap();
    assert_eq!(command.as_str(), "!C-ON@");
    assert_eq!(channels.outbound.len(), 1);
    assert_eq!(
        channels.outbound.try_pop().map(|c| c.as_str().to_string()),
        Some("!C-ON@".to_string())
    );
    assert!(channels.outbound.try_pop().is_none());
}

#[test]
fn test_second_command_while_pending_is_rejected() {
    let (mut control, channels, _status) = control_loop();

    control.dispatch(UserAction::StartBalance).unwrap();
    let err = control
        .dispatch(UserAction::SetChargeCurrent(ChargeCurrent::TwoAmps))
        .unwrap_err();

    assert!(err.is_queue_overflow());
    assert!(matches!(err, Error::Queue(_)));
    assert_eq!(
        channels.outbound.try_pop().map(|c| c.as_str().to_string()),
        Some("!B-ON@".to_string())
    );
    assert_eq!(control.stats().commands_queued, 1);
    assert_eq!(control.stats().commands_rejected, 1);
}
