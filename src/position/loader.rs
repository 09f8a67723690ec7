//! Load liquidity position snapshots from the ledger API envelope or CSV exports

use chrono::{DateTime, Utc};
use csv::Reader;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

use super::data::LiquidityPosition;
use super::normalize::{normalize_record, parse_created_at, parse_loose_f64};

/// Failures while loading a snapshot
///
/// Field-level malformedness is never an error: individual loose values are
/// coerced during normalization. These variants cover payloads that cannot
/// be read at all, plus envelopes the ledger itself rejected.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid CSV payload: {0}")]
    Csv(#[from] csv::Error),

    #[error("ledger rejected the request: {0}")]
    Rejected(String),

    #[error("unexpected payload shape: expected an envelope object or a record array")]
    UnexpectedShape,
}

/// The ledger API's uniform response envelope
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Vec<Value>,
}

/// Parse positions from a JSON string
///
/// Accepts either the full `{success, message, data}` API envelope or a bare
/// record array (offline dumps). `now` is the reference time substituted for
/// records missing a creation timestamp.
pub fn positions_from_json_str(
    text: &str,
    now: DateTime<Utc>,
) -> Result<Vec<LiquidityPosition>, LoadError> {
    let payload: Value = serde_json::from_str(text)?;

    let records: Vec<Value> = match payload {
        Value::Array(records) => records,
        Value::Object(_) => {
            let envelope: ApiEnvelope = serde_json::from_value(payload)?;
            if !envelope.success {
                let message = envelope
                    .message
                    .unwrap_or_else(|| "no message provided".to_owned());
                return Err(LoadError::Rejected(message));
            }
            envelope.data
        }
        _ => return Err(LoadError::UnexpectedShape),
    };

    let positions = records
        .iter()
        .map(|record| normalize_record(record, now))
        .collect::<Vec<_>>();

    log::info!("loaded {} liquidity positions from JSON", positions.len());
    Ok(positions)
}

/// Load positions from a JSON snapshot file
pub fn load_positions_json<P: AsRef<Path>>(
    path: P,
    now: DateTime<Utc>,
) -> Result<Vec<LiquidityPosition>, LoadError> {
    let text = std::fs::read_to_string(path)?;
    positions_from_json_str(&text, now)
}

/// Raw CSV row matching the snapshot export columns
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Amount", default)]
    amount: String,
    #[serde(rename = "Interest", default)]
    interest: String,
    #[serde(rename = "Duration", default)]
    duration: String,
    #[serde(rename = "CreatedAt", default)]
    created_at: String,
    #[serde(rename = "Status", default)]
    status: String,
}

impl CsvRow {
    fn to_position(&self, now: DateTime<Utc>) -> LiquidityPosition {
        let created_raw = if self.created_at.trim().is_empty() {
            None
        } else {
            Some(self.created_at.as_str())
        };

        let mut position = LiquidityPosition::new(
            parse_loose_f64(&self.amount),
            parse_loose_f64(&self.interest),
            parse_loose_f64(&self.duration).trunc().max(0.0) as u32,
            parse_created_at(created_raw, now),
        );
        if !self.status.trim().is_empty() {
            position.status = Some(self.status.trim().to_owned());
        }
        position
    }
}

/// Parse positions from any CSV reader (e.g. string buffer, file)
pub fn positions_from_csv_reader<R: std::io::Read>(
    reader: R,
    now: DateTime<Utc>,
) -> Result<Vec<LiquidityPosition>, LoadError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut positions = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        positions.push(row.to_position(now));
    }

    log::info!("loaded {} liquidity positions from CSV", positions.len());
    Ok(positions)
}

/// Load positions from a CSV snapshot file
pub fn load_positions_csv<P: AsRef<Path>>(
    path: P,
    now: DateTime<Utc>,
) -> Result<Vec<LiquidityPosition>, LoadError> {
    let file = std::fs::File::open(path)?;
    positions_from_csv_reader(file, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_envelope_success() {
        let payload = r#"{
            "success": true,
            "message": "ok",
            "data": [
                {"_id": "a", "amount": 12000, "interest": 12, "duration": 12,
                 "createdAt": "2025-01-01T00:00:00Z"},
                {"_id": "b", "amount": "5000", "interest": "14", "duration": "6"}
            ]
        }"#;

        let positions = positions_from_json_str(payload, now()).unwrap();
        assert_eq!(positions.len(), 2);
        assert_relative_eq!(positions[0].amount, 12_000.0);
        assert_eq!(positions[0].duration_months, 12);

        // String-encoded fields parse; missing createdAt defaults to `now`
        assert_relative_eq!(positions[1].amount, 5_000.0);
        assert_relative_eq!(positions[1].interest_rate, 14.0);
        assert_eq!(positions[1].created_at, now());
    }

    #[test]
    fn test_envelope_rejected() {
        let payload = r#"{"success": false, "message": "session expired", "data": []}"#;
        let err = positions_from_json_str(payload, now()).unwrap_err();
        match err {
            LoadError::Rejected(message) => assert_eq!(message, "session expired"),
            other => panic!("expected Rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_bare_array() {
        let payload = r#"[{"amount": 1000, "interest": 12, "duration": 3,
                           "createdAt": "2025-02-01T00:00:00Z"}]"#;
        let positions = positions_from_json_str(payload, now()).unwrap();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].duration_months, 3);
    }

    #[test]
    fn test_scalar_payload_is_an_error() {
        assert!(matches!(
            positions_from_json_str("42", now()),
            Err(LoadError::UnexpectedShape)
        ));
    }

    #[test]
    fn test_csv_reader() {
        let data = "\
Amount,Interest,Duration,CreatedAt,Status
12000,12,12,2025-01-01T00:00:00Z,active
garbage,,,,
";
        let positions = positions_from_csv_reader(data.as_bytes(), now()).unwrap();
        assert_eq!(positions.len(), 2);
        assert_relative_eq!(positions[0].amount, 12_000.0);
        assert_eq!(positions[0].status.as_deref(), Some("active"));

        // Junk row coerces to zeros rather than failing the load
        assert_relative_eq!(positions[1].amount, 0.0);
        assert_eq!(positions[1].duration_months, 0);
        assert_eq!(positions[1].created_at, now());
    }
}
