//! Serde helpers shared by the record types.

use serde::{Deserialize, Deserializer, de};
use uuid::Uuid;

/// Decodes an optional back-reference. Older documents store a missing link
/// as an empty string.
pub(crate) fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => Uuid::parse_str(value).map(Some).map_err(de::Error::custom),
    }
}
