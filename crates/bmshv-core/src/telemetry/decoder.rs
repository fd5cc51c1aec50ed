//! Telemetry Decoder
//!
//! Parses a telemetry line with `serde_json` into a wire record that names
//! every accepted field, then validates flags, fault pairs and numeric ranges
//! before building the snapshot. Unknown fields, missing required fields and
//! wrong types are rejected; nothing is coerced.

use crate::config::FeatureSettings;
use crate::data::{FaultDetail, FaultKind, FaultPair, FaultReport, TelemetrySnapshot};
use crate::error::DecodeError;
use serde::Deserialize;
use serde_json::Value;

/// Which optional field groups a line must carry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TelemetrySchema {
    /// Per-cell `discharge` flags are required
    pub require_discharge: bool,
    /// All six fault pairs are required
    pub require_faults: bool,
}

impl TelemetrySchema {
    /// Schema matching a front-end feature set
    pub fn from_features(features: &FeatureSettings) -> Self {
        Self {
            require_discharge: features.has_discharge_marking,
            require_faults: features.has_fault_table,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WireRecord {
    current: f64,
    acc_voltage: f64,
    car_voltage: f64,
    soc: Vec<f64>,
    cell_voltage: Vec<f64>,
    temperature: Vec<f64>,
    discharge: Option<Vec<i64>>,
    balance: Option<i64>,
    charging: Option<i64>,
    under_voltage: Option<WireFaultPair>,
    over_voltage: Option<WireFaultPair>,
    under_temperature: Option<WireFaultPair>,
    over_temperature: Option<WireFaultPair>,
    over_current: Option<WireFaultPair>,
    current_sensor_disconnected: Option<WireFaultPair>,
    timestamp: Option<f64>,
}

/// `[flag, detail]`, checked for length after parsing
type WireFaultPair = Vec<Value>;

/// Telemetry decoder bound to a schema
#[derive(Debug, Clone, Default)]
pub struct TelemetryDecoder {
    schema: TelemetrySchema,
}

impl TelemetryDecoder {
    /// Create a decoder for the given schema
    pub fn new(schema: TelemetrySchema) -> Self {
        Self { schema }
    }

    /// The schema this decoder enforces
    pub fn schema(&self) -> TelemetrySchema {
        self.schema
    }

    /// Decode one raw line
    ///
    /// Trailing line terminators are ignored. Either a complete snapshot is
    /// returned or nothing is.
    pub fn decode(&self, raw_line: &str) -> Result<TelemetrySnapshot, DecodeError> {
        let record: WireRecord = serde_json::from_str(raw_line.trim())?;
        let snapshot = self.validate(record)?;
        tracing::trace!(
            cells = snapshot.cell_voltage.len(),
            temperatures = snapshot.temperature.len(),
            "Decoded telemetry line"
        );
        Ok(snapshot)
    }

    fn validate(&self, record: WireRecord) -> Result<TelemetrySnapshot, DecodeError> {
        ensure_finite("current", record.current)?;
        ensure_finite("acc_voltage", record.acc_voltage)?;
        ensure_finite("car_voltage", record.car_voltage)?;
        ensure_all_finite("soc", &record.soc)?;
        ensure_all_finite("cell_voltage", &record.cell_voltage)?;
        ensure_all_finite("temperature", &record.temperature)?;
        if let Some(ms) = record.timestamp {
            ensure_finite("timestamp", ms)?;
        }

        let discharge = record
            .discharge
            .map(|flags| {
                flags
                    .into_iter()
                    .map(|flag| to_flag("discharge", flag))
                    .collect::<Result<Vec<bool>, _>>()
            })
            .transpose()?;
        if self.schema.require_discharge && discharge.is_none() {
            return Err(DecodeError::schema("missing field `discharge`"));
        }

        let faults = fault_report([
            record.under_voltage,
            record.over_voltage,
            record.under_temperature,
            record.over_temperature,
            record.over_current,
            record.current_sensor_disconnected,
        ])?;
        if self.schema.require_faults && faults.is_none() {
            return Err(DecodeError::schema("missing fault fields"));
        }

        Ok(TelemetrySnapshot {
            current: record.current,
            acc_voltage: record.acc_voltage,
            car_voltage: record.car_voltage,
            soc: record.soc,
            cell_voltage: record.cell_voltage,
            temperature: record.temperature,
            discharge,
            balance: record.balance.map(|v| to_flag("balance", v)).transpose()?,
            charging: record.charging.map(|v| to_flag("charging", v)).transpose()?,
            faults,
            timestamp_ms: record.timestamp,
        })
    }
}

/// Decode one raw line with the base schema
///
/// Only the six core fields are required; status flags, discharge flags,
/// fault pairs and the timestamp are accepted when present.
pub fn decode(raw_line: &str) -> Result<TelemetrySnapshot, DecodeError> {
    TelemetryDecoder::default().decode(raw_line)
}

fn ensure_finite(field: &str, value: f64) -> Result<(), DecodeError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(DecodeError::schema(format!(
            "field `{}` is not a finite number",
            field
        )))
    }
}

fn ensure_all_finite(field: &str, values: &[f64]) -> Result<(), DecodeError> {
    values.iter().try_for_each(|v| ensure_finite(field, *v))
}

fn to_flag(field: &str, value: i64) -> Result<bool, DecodeError> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(DecodeError::schema(format!(
            "field `{}` must be 0 or 1, got {}",
            field, other
        ))),
    }
}

fn fault_pair(kind: FaultKind, wire: WireFaultPair) -> Result<FaultPair, DecodeError> {
    let [flag, detail]: [Value; 2] = wire.try_into().map_err(|wire: Vec<Value>| {
        DecodeError::schema(format!(
            "field `{}` must be a [flag, detail] pair, got {} elements",
            kind.field_name(),
            wire.len()
        ))
    })?;
    let flag = flag.as_i64().ok_or_else(|| {
        DecodeError::schema(format!(
            "field `{}` flag must be an integer, got {}",
            kind.field_name(),
            flag
        ))
    })?;
    let triggered = to_flag(kind.field_name(), flag)?;

    let detail = match detail {
        Value::Number(n) => match n.as_i64() {
            Some(index) => FaultDetail::Index(index),
            None => {
                let value = n.as_f64().unwrap_or(f64::NAN);
                ensure_finite(kind.field_name(), value)?;
                FaultDetail::Value(value)
            }
        },
        Value::String(text) => FaultDetail::Text(text),
        other => {
            return Err(DecodeError::schema(format!(
                "field `{}` has an unsupported detail value {}",
                kind.field_name(),
                other
            )))
        }
    };

    Ok(FaultPair { triggered, detail })
}

fn fault_report(pairs: [Option<WireFaultPair>; 6]) -> Result<Option<FaultReport>, DecodeError> {
    match pairs {
        [None, None, None, None, None, None] => Ok(None),
        [Some(uv), Some(ov), Some(ut), Some(ot), Some(oc), Some(csd)] => Ok(Some(FaultReport {
            under_voltage: fault_pair(FaultKind::UnderVoltage, uv)?,
            over_voltage: fault_pair(FaultKind::OverVoltage, ov)?,
            under_temperature: fault_pair(FaultKind::UnderTemperature, ut)?,
            over_temperature: fault_pair(FaultKind::OverTemperature, ot)?,
            over_current: fault_pair(FaultKind::OverCurrent, oc)?,
            current_sensor_disconnected: fault_pair(
                FaultKind::CurrentSensorDisconnected,
                csd,
            )?,
        })),
        partial => {
            let missing: Vec<&str> = FaultKind::ALL
                .iter()
                .zip(partial.iter())
                .filter(|(_, pair)| pair.is_none())
                .map(|(kind, _)| kind.field_name())
                .collect();
            Err(DecodeError::schema(format!(
                "incomplete fault set, missing {}",
                missing.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_values() {
        assert_eq!(to_flag("balance", 0), Ok(false));
        assert_eq!(to_flag("balance", 1), Ok(true));
        assert!(to_flag("balance", 2).is_err());
    }

    #[test]
    fn test_partial_fault_set_rejected() {
        let pairs = [
            Some(vec![Value::from(0), Value::from(0)]),
            None,
            None,
            None,
            None,
            None,
        ];
        let err = fault_report(pairs).unwrap_err();
        assert!(err.to_string().contains("over_voltage"));
    }
}
