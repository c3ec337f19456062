//! Lenient deserializers for nullable columns

use serde::{Deserialize, Deserializer};

/// Deserialize `null` as `T::default()`.
///
/// `#[serde(default)]` only covers a missing key; the store sends explicit
/// nulls for empty columns, which this also accepts.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
