//! Structural validation of a parsed log line.

use super::schema::TraceRecord;
use serde_json::Value;

/// Check that a JSON value has the shape of a trace record
///
/// **Public** - pure predicate, never fails on odd shapes
///
/// Requires `totalTime` to be a non-negative number, `request` a string
/// and `data` an object whose every value carries non-negative integer
/// `ct` and `wt` counters.
pub fn validate(value: &Value) -> bool {
    let Some(record) = value.as_object() else {
        return false;
    };

    let total_time_ok = record
        .get("totalTime")
        .and_then(Value::as_f64)
        .is_some_and(|t| t >= 0.0);

    let request_ok = record.get("request").is_some_and(Value::is_string);

    let data_ok = record
        .get("data")
        .and_then(Value::as_object)
        .is_some_and(|data| {
            data.iter()
                .all(|(path, sample)| !path.is_empty() && is_call_sample(sample))
        });

    total_time_ok && request_ok && data_ok
}

/// Validate and convert a parsed value into a record
///
/// **Public** - used by the line reader
pub fn into_record(value: Value) -> Option<TraceRecord> {
    if !validate(&value) {
        return None;
    }
    serde_json::from_value(value).ok()
}

fn is_call_sample(sample: &Value) -> bool {
    sample.as_object().is_some_and(|counters| {
        counters.get("ct").is_some_and(Value::is_u64)
            && counters.get("wt").is_some_and(Value::is_u64)
    })
}
