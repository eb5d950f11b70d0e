//! Serde helpers shared by the record shapes.

use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

/// Deserializer for optional fields: the field may be absent (handled by
/// `#[serde(default)]`), but when present it must hold a real value.
/// An explicit `null` is rejected.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Serializer for numeric fields: integral values are written as integers,
/// so `3` reads back as `3` rather than `3.0`.
pub(crate) fn number<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    // Exactly representable integers only
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if value.fract() == 0.0 && value.abs() <= MAX_EXACT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// True when the JSON object carries any of `keys`.
pub(crate) fn has_any(value: &Value, keys: &[&str]) -> bool {
    value
        .as_object()
        .is_some_and(|object| keys.iter().any(|key| object.contains_key(*key)))
}
