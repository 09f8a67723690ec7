//! Boundary coercion of loosely-typed ledger values
//!
//! The backend contract is not statically enforced from this side: numeric
//! fields arrive as JSON numbers, string-encoded numbers, null, or are
//! absent entirely. Everything is normalized here, once, so the projection
//! math can assume clean finite values.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::data::{clamp_non_negative, LiquidityPosition};

/// Coerce a loosely-typed JSON value to a non-negative finite f64
///
/// Numbers pass through, string-encoded numbers are parsed, everything else
/// (null, bool, objects, junk strings) resolves to 0. Negative and
/// non-finite results also resolve to 0.
pub fn coerce_f64(value: &Value) -> f64 {
    let raw = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_loose_f64(s),
        _ => 0.0,
    };
    clamp_non_negative(raw)
}

/// Coerce a loosely-typed JSON value to a whole month count
pub fn coerce_months(value: &Value) -> u32 {
    coerce_f64(value).trunc() as u32
}

/// Parse a string-encoded number, defaulting to 0 on junk
pub fn parse_loose_f64(text: &str) -> f64 {
    text.trim().parse::<f64>().unwrap_or(0.0)
}

/// Resolve an optional RFC 3339 creation timestamp
///
/// Missing or unparseable values default to the supplied reference time,
/// matching the ledger dashboard's display behavior, but the default is
/// logged so upstream data-quality problems stay visible.
pub fn parse_created_at(raw: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    match raw {
        Some(text) => match DateTime::parse_from_rfc3339(text.trim()) {
            Ok(parsed) => parsed.with_timezone(&Utc),
            Err(err) => {
                log::warn!(
                    "unparseable createdAt {:?} ({}); defaulting to reference time",
                    text,
                    err
                );
                now
            }
        },
        None => {
            log::warn!("position missing createdAt; defaulting to reference time");
            now
        }
    }
}

/// Normalize one raw ledger record (a JSON object) into a position
///
/// `now` is the reference time used when the record carries no usable
/// creation timestamp.
pub fn normalize_record(record: &Value, now: DateTime<Utc>) -> LiquidityPosition {
    let field = |name: &str| record.get(name).unwrap_or(&Value::Null);

    let created_raw = field("createdAt").as_str();

    LiquidityPosition {
        id: field("_id").as_str().map(str::to_owned),
        amount: coerce_f64(field("amount")),
        interest_rate: coerce_f64(field("interest")),
        duration_months: coerce_months(field("duration")),
        created_at: parse_created_at(created_raw, now),
        status: field("status").as_str().map(str::to_owned),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_coerce_f64_shapes() {
        assert_relative_eq!(coerce_f64(&json!(12000)), 12_000.0);
        assert_relative_eq!(coerce_f64(&json!(12000.5)), 12_000.5);
        assert_relative_eq!(coerce_f64(&json!("12000")), 12_000.0);
        assert_relative_eq!(coerce_f64(&json!(" 42.5 ")), 42.5);
        assert_relative_eq!(coerce_f64(&json!("not a number")), 0.0);
        assert_relative_eq!(coerce_f64(&json!(null)), 0.0);
        assert_relative_eq!(coerce_f64(&json!(true)), 0.0);
        assert_relative_eq!(coerce_f64(&json!(-250.0)), 0.0);
        assert_relative_eq!(coerce_f64(&json!({"nested": 1})), 0.0);
    }

    #[test]
    fn test_coerce_months() {
        assert_eq!(coerce_months(&json!(12)), 12);
        assert_eq!(coerce_months(&json!("6")), 6);
        assert_eq!(coerce_months(&json!(6.9)), 6);
        assert_eq!(coerce_months(&json!(-3)), 0);
        assert_eq!(coerce_months(&json!(null)), 0);
    }

    #[test]
    fn test_parse_created_at() {
        let parsed = parse_created_at(Some("2025-03-10T12:30:00Z"), now());
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 3, 10, 12, 30, 0).unwrap());

        // Missing and junk both fall back to the reference time
        assert_eq!(parse_created_at(None, now()), now());
        assert_eq!(parse_created_at(Some("last tuesday"), now()), now());
    }

    #[test]
    fn test_normalize_record_loose_fields() {
        let record = json!({
            "_id": "pos-1",
            "amount": "50000",
            "interest": 14,
            "duration": "12",
            "createdAt": "2025-01-01T00:00:00Z",
            "status": "active"
        });

        let p = normalize_record(&record, now());
        assert_eq!(p.id.as_deref(), Some("pos-1"));
        assert_relative_eq!(p.amount, 50_000.0);
        assert_relative_eq!(p.interest_rate, 14.0);
        assert_eq!(p.duration_months, 12);
        assert_eq!(p.created_at, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(p.status.as_deref(), Some("active"));
    }

    #[test]
    fn test_normalize_record_missing_fields() {
        let p = normalize_record(&json!({}), now());
        assert_relative_eq!(p.amount, 0.0);
        assert_relative_eq!(p.interest_rate, 0.0);
        assert_eq!(p.duration_months, 0);
        assert_eq!(p.created_at, now());
        assert!(p.id.is_none());
    }
}
