//! Non-cryptographic content fingerprints.

use serde::Serialize;
use serde_json::Value;
use std::fmt::Debug;

const DJB2_SEED: u32 = 5381;

/// DJB2-style rolling hash over the UTF-16 code units of `input`.
///
/// Each step computes `h = (h * 33) ^ unit` with 32-bit wrapping arithmetic. The result is
/// rendered as lowercase hex without padding, so it is 1 to 8 characters long.
pub fn fingerprint_str(input: &str) -> String {
    let h = input
        .encode_utf16()
        .fold(DJB2_SEED, |h, unit| h.wrapping_mul(33) ^ u32::from(unit));
    format!("{h:x}")
}

/// Fingerprint of a JSON value.
///
/// - `null` yields the empty string without hashing.
/// - Objects are serialised as JSON with keys sorted. `serde_json::Map` is built without
///   `preserve_order`, so keys come out sorted at every nesting level, not only the top one.
/// - Strings are hashed raw (no quotes); numbers and booleans by their display form; arrays as
///   JSON.
pub fn fingerprint(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => fingerprint_str(&flatten(other)),
    }
}

/// Best-effort JSON form of any serialisable value, for use in a hash payload.
///
/// If serialisation fails, the `Debug` rendering of `value` is returned as a JSON string, so
/// the value still contributes to the fingerprint. This never fails.
pub fn canonical_value<T>(value: &T) -> Value
where
    T: Serialize + Debug + ?Sized,
{
    serde_json::to_value(value).unwrap_or_else(|e| {
        tracing::warn!("payload value not serialisable, using debug form: {e}");
        Value::String(format!("{value:?}"))
    })
}

fn flatten(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        // Map iteration order is the sorted key order.
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
