use bmshv_core::config::{FillOrder, MonitorConfig, OverflowPolicy};
use bmshv_core::ConfigError;
use std::time::Duration;

#[test]
fn test_defaults() {
    let config = MonitorConfig::default();
    assert_eq!(config.pack.cells.rows, 9);
    assert_eq!(config.pack.cells.columns, 15);
    assert_eq!(config.pack.temperatures.rows, 3);
    assert_eq!(config.pack.order, FillOrder::ColumnMajor);
    assert_eq!(config.link.baud_rate, 9600);
    assert_eq!(config.link.read_timeout(), Duration::from_millis(450));
    assert_eq!(config.link.reconnect_backoff(), Duration::from_secs(1));
    assert_eq!(config.display.poll_interval(), Duration::from_millis(500));
    assert_eq!(config.display.float_precision, 4);
    assert_eq!(config.queues.inbound_capacity, 1);
    assert_eq!(config.queues.outbound_capacity, 1);
    assert_eq!(config.queues.inbound_policy, OverflowPolicy::DisplaceOldest);
    assert_eq!(config.queues.outbound_policy, OverflowPolicy::DropNewest);
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let config = MonitorConfig::from_toml_str(
        r#"
        [pack.cells]
        rows = 12
        columns = 10

        [link]
        baud_rate = 115200
        "#,
    )
    .unwrap();

    assert_eq!(config.pack.cells.len(), 120);
    assert_eq!(config.pack.temperatures.len(), 45);
    assert_eq!(config.link.baud_rate, 115200);
    assert_eq!(config.link.read_timeout_ms, 450);
    assert_eq!(config.commands.keep_alive, "!C-CC@");
}

#[test]
fn test_toml_round_trip() {
    let mut config = MonitorConfig::default();
    config.pack.order = FillOrder::RowMajor;
    config.display.float_precision = 2;

    let text = config.to_toml_string().unwrap();
    let parsed = MonitorConfig::from_toml_str(&text).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_invalid_geometry() {
    let result = MonitorConfig::from_toml_str("[pack.temperatures]\nrows = 0\ncolumns = 15\n");
    assert!(matches!(
        result,
        Err(ConfigError::InvalidGeometry {
            table: "temperature",
            ..
        })
    ));
}

#[test]
fn test_invalid_capacity() {
    let mut config = MonitorConfig::default();
    config.queues.outbound_capacity = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidCapacity {
            queue: "outbound",
            capacity: 0
        })
    ));
}

#[test]
fn test_invalid_command_token() {
    let mut config = MonitorConfig::default();
    config.commands.start_charging = "C-ON".to_string();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidCommandToken { .. })
    ));
}

#[test]
fn test_parse_error() {
    assert!(matches!(
        MonitorConfig::from_toml_str("[link\nbaud_rate = 1"),
        Err(ConfigError::Parse(_))
    ));
}
