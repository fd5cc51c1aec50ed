use bmshv_core::config::FeatureSettings;
use bmshv_core::telemetry::{decode, TelemetryDecoder, TelemetrySchema};
use bmshv_core::{DecodeError, FaultDetail, FaultKind};

const BASE_LINE: &str = r#"{"current":1.0,"acc_voltage":2.0,"car_voltage":3.0,"soc":[0.5,0.6],"cell_voltage":[1.0,2.0,3.0,4.0],"temperature":[10.0,20.0]}"#;

fn full_line() -> String {
    concat!(
        r#"{"current":-12.5,"acc_voltage":540.2,"car_voltage":538.9,"#,
        r#""soc":[0.8,0.81],"cell_voltage":[3.9,3.95,4.01,3.88],"#,
        r#""temperature":[24.5,26.0],"discharge":[0,1,0,0],"#,
        r#""balance":1,"charging":0,"#,
        r#""under_voltage":[0,0],"over_voltage":[1,3],"#,
        r#""under_temperature":[0,0],"over_temperature":[0,0],"#,
        r#""over_current":[1,250.5],"current_sensor_disconnected":[1,0],"#,
        r#""timestamp":123456}"#
    )
    .to_string()
}

#[test]
fn test_decode_base_line() {
    let snapshot = decode(BASE_LINE).unwrap();
    assert_eq!(snapshot.current, 1.0);
    assert_eq!(snapshot.acc_voltage, 2.0);
    assert_eq!(snapshot.car_voltage, 3.0);
    assert_eq!(snapshot.soc, vec![0.5, 0.6]);
    assert_eq!(snapshot.cell_voltage, vec![1.0, 2.0, 3.0, 4.0]);
    assert_eq!(snapshot.temperature, vec![10.0, 20.0]);
    assert_eq!(snapshot.discharge, None);
    assert_eq!(snapshot.faults, None);
    assert_eq!(snapshot.timestamp_secs(), None);
}

#[test]
fn test_decode_ignores_line_terminator() {
    let line = format!("{}\r\n", BASE_LINE);
    assert!(decode(&line).is_ok());
}

#[test]
fn test_decode_full_line() {
    let schema = TelemetrySchema::from_features(&FeatureSettings::default());
    let snapshot = TelemetryDecoder::new(schema).decode(&full_line()).unwrap();

    assert_eq!(snapshot.discharge, Some(vec![false, true, false, false]));
    assert!(snapshot.is_discharging(1));
    assert!(!snapshot.is_discharging(0));
    assert!(!snapshot.is_discharging(99));
    assert_eq!(snapshot.balance, Some(true));
    assert_eq!(snapshot.charging, Some(false));
    assert_eq!(snapshot.timestamp_secs(), Some(123.456));

    let faults = snapshot.faults.unwrap();
    assert_eq!(faults.over_voltage.detail, FaultDetail::Index(3));
    assert_eq!(faults.over_current.detail, FaultDetail::Value(250.5));
    let active: Vec<FaultKind> = faults.active().collect();
    assert_eq!(
        active,
        vec![
            FaultKind::OverVoltage,
            FaultKind::OverCurrent,
            FaultKind::CurrentSensorDisconnected
        ]
    );
}

#[test]
fn test_malformed_syntax() {
    for line in ["", "not json", r#"{"current":1.0,"#, "[1,2"] {
        assert!(
            matches!(decode(line), Err(DecodeError::MalformedSyntax { .. })),
            "expected syntax error for {:?}",
            line
        );
    }
}

#[test]
fn test_missing_field_is_schema_mismatch() {
    let line = r#"{"current":1.0,"acc_voltage":2.0,"car_voltage":3.0,"soc":[0.5],"cell_voltage":[1.0]}"#;
    let err = decode(line).unwrap_err();
    assert!(matches!(err, DecodeError::SchemaMismatch { .. }));
    assert!(err.to_string().contains("temperature"));
}

#[test]
fn test_wrong_type_is_schema_mismatch() {
    let line = r#"{"current":"1.0","acc_voltage":2.0,"car_voltage":3.0,"soc":[0.5],"cell_voltage":[1.0],"temperature":[1.0]}"#;
    assert!(matches!(
        decode(line),
        Err(DecodeError::SchemaMismatch { .. })
    ));
}

#[test]
fn test_unknown_field_is_schema_mismatch() {
    let line = BASE_LINE.replace('}', r#","humidity":40}"#);
    assert!(matches!(
        decode(&line),
        Err(DecodeError::SchemaMismatch { .. })
    ));
}

#[test]
fn test_non_binary_flag_rejected() {
    let line = BASE_LINE.replace('}', r#","charging":2}"#);
    let err = decode(&line).unwrap_err();
    assert!(err.to_string().contains("charging"));
}

#[test]
fn test_schema_requires_optional_groups() {
    let decoder = TelemetryDecoder::new(TelemetrySchema {
        require_discharge: true,
        require_faults: false,
    });
    let err = decoder.decode(BASE_LINE).unwrap_err();
    assert!(err.to_string().contains("discharge"));

    let decoder = TelemetryDecoder::new(TelemetrySchema {
        require_discharge: false,
        require_faults: true,
    });
    assert!(matches!(
        decoder.decode(BASE_LINE),
        Err(DecodeError::SchemaMismatch { .. })
    ));
}

#[test]
fn test_partial_fault_set_rejected() {
    let line = BASE_LINE.replace('}', r#","over_current":[1,12.0]}"#);
    let err = decode(&line).unwrap_err();
    assert!(err.to_string().contains("under_voltage"));
}

#[test]
fn test_fault_pair_length_is_schema_mismatch() {
    for pair in ["[0]", "[0,0,9]", "[]"] {
        let field = format!(r#""under_voltage":{}"#, pair);
        let line = full_line().replace(r#""under_voltage":[0,0]"#, &field);
        let err = decode(&line).unwrap_err();
        assert!(
            matches!(err, DecodeError::SchemaMismatch { .. }),
            "expected schema mismatch for {}, got {:?}",
            pair,
            err
        );
        assert!(err.to_string().contains("under_voltage"));
    }
}

#[test]
fn test_fault_flag_must_be_integer() {
    let line = full_line().replace(r#""over_voltage":[1,3]"#, r#""over_voltage":["1",3]"#);
    assert!(matches!(
        decode(&line),
        Err(DecodeError::SchemaMismatch { .. })
    ));
}
