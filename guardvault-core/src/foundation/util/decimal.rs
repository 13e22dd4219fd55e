//! Serde adapter that renders `U256` as a decimal string.
//!
//! Amounts and nonces cross the JSON boundary as decimal text so clients
//! never round-trip them through a float.

use alloy_primitives::U256;
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_string())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_decimal_u256(&raw).map_err(serde::de::Error::custom)
}

pub fn parse_decimal_u256(raw: &str) -> Result<U256, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("expected decimal integer string, got {:?}", raw));
    }
    U256::from_str_radix(trimmed, 10).map_err(|err| format!("decimal {:?} out of range: {}", raw, err))
}
