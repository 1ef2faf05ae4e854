//! Status checks, timestamps and raw element helpers

use betdaqsoap::{elem2dict, parse_raw_element};
use chrono::{DateTime, NaiveDateTime};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

/// `ReturnStatus.Code` of a successful call
pub const SUCCESS: i64 = 0;

/// `ReturnStatus` missing or not in the accepted codes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("return status {code:?}: {}", .description.as_deref().unwrap_or("no description"))]
pub struct StatusFailure {
    pub code: Option<i64>,
    pub description: Option<String>,
}

fn code_of(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reads `ReturnStatus.Code`, as a number or a numeric string
pub fn return_status_code(data: &Value) -> Option<i64> {
    data.get("ReturnStatus")
        .and_then(|status| status.get("Code"))
        .and_then(code_of)
}

/// Checks that `ReturnStatus.Code` is one of `accepted`
pub fn check_status_code_with(data: &Value, accepted: &[i64]) -> Result<(), StatusFailure> {
    let code = return_status_code(data);
    match code {
        Some(c) if accepted.contains(&c) => Ok(()),
        _ => {
            let description = data
                .get("ReturnStatus")
                .and_then(|status| status.get("Description"))
                .and_then(Value::as_str)
                .map(str::to_string);
            Err(StatusFailure { code, description })
        }
    }
}

/// Checks that `ReturnStatus.Code` is [`SUCCESS`]
pub fn check_status_code(data: &Value) -> Result<(), StatusFailure> {
    check_status_code_with(data, &[SUCCESS])
}

/// Parses an API timestamp into a naive UTC datetime
///
/// Offsets are applied before being dropped. Timestamps without offset are
/// taken as already in UTC.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
}

/// Naive `Timestamp` field, `None` when missing or unreadable
pub fn make_tz_naive(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(s) if !s.trim().is_empty() => {
            let parsed = parse_timestamp(s);
            if parsed.is_none() {
                warn!(timestamp = %s, "Unparseable Timestamp, using current time");
            }
            parsed
        }
        _ => None,
    }
}

/// Python-style truthiness: null, false, 0, "" and empty containers are false
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Converts the `_raw_elements` of a response with `elem2dict`
///
/// Entries that are not valid XML are skipped.
pub fn parse_raw_elements(raw: &Value) -> Vec<Map<String, Value>> {
    let entries: Vec<&Value> = match raw {
        Value::Array(items) => items.iter().collect(),
        Value::Null => Vec::new(),
        single => vec![single],
    };

    entries
        .into_iter()
        .filter_map(Value::as_str)
        .filter_map(|xml| match parse_raw_element(xml) {
            Ok(elem) => Some(elem2dict(&elem)),
            Err(e) => {
                warn!(error = %e, "Skipping unparseable raw element");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_check_status_code_success() {
        let data = json!({"ReturnStatus": {"Code": 0, "Description": "Success"}});
        assert!(check_status_code(&data).is_ok());

        let as_string = json!({"ReturnStatus": {"Code": "0"}});
        assert!(check_status_code(&as_string).is_ok());
    }

    #[test]
    fn test_check_status_code_failure() {
        let data = json!({"ReturnStatus": {"Code": 406, "Description": "PunterIsSuspended"}});
        let err = check_status_code(&data).unwrap_err();
        assert_eq!(err.code, Some(406));
        assert_eq!(err.description.as_deref(), Some("PunterIsSuspended"));
    }

    #[test]
    fn test_check_status_code_missing() {
        let err = check_status_code(&json!({"Orders": []})).unwrap_err();
        assert_eq!(err.code, None);
    }

    #[test]
    fn test_check_status_code_with_accepted_set() {
        let data = json!({"ReturnStatus": {"Code": 137}});
        assert!(check_status_code_with(&data, &[0, 137]).is_ok());
        assert!(check_status_code(&data).is_err());
    }

    #[test]
    fn test_make_tz_naive_applies_offset() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_milli_opt(10, 15, 30, 250)
            .unwrap();
        assert_eq!(
            make_tz_naive(&json!("2024-03-01T11:15:30.25+01:00")),
            Some(expected)
        );
        assert_eq!(
            make_tz_naive(&json!("2024-03-01T10:15:30.25Z")),
            Some(expected)
        );
        assert_eq!(
            make_tz_naive(&json!("2024-03-01T10:15:30.25")),
            Some(expected)
        );
    }

    #[test]
    fn test_make_tz_naive_absent_or_invalid() {
        assert_eq!(make_tz_naive(&Value::Null), None);
        assert_eq!(make_tz_naive(&json!("")), None);
        assert_eq!(make_tz_naive(&json!("yesterday")), None);
        assert_eq!(make_tz_naive(&json!(12)), None);
    }

    #[test]
    fn test_is_truthy() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(is_truthy(&json!(["<a/>"])));
        assert!(is_truthy(&json!({"a": 1})));
    }

    #[test]
    fn test_parse_raw_elements() {
        let raw = json!([
            "<Error xmlns=\"urn:other\"><Code>12</Code><Code>13</Code></Error>",
            "not xml"
        ]);
        let parsed = parse_raw_elements(&raw);
        assert_eq!(parsed.len(), 1);
        assert_eq!(Value::Object(parsed[0].clone()), json!({"Code": ["12", "13"]}));
    }
}
