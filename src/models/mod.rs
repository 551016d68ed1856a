//! Input shapes accepted by the services.
//!
//! Partial updates are typed: every field is an `Option`, and nullable
//! columns use `Option<Option<T>>` so "not supplied" and "set to null" stay
//! distinguishable. Only supplied fields are applied.

pub mod anime;
pub mod catalog;
pub mod episode;
pub mod progress;

use serde::{Deserialize, Deserializer};

/// Deserializes a present field (including an explicit `null`) as `Some(..)`.
///
/// Combine with `#[serde(default)]` so an absent field stays `None`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
