//! Deserializers for form fields that browsers and scripts send with loose JSON types.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Any JSON value as optional text: strings pass through, `null` is absent and
/// anything else keeps its JSON rendering, so validation sees it instead of serde.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
