//! Persisted entity types.
//!
//! Every entity carries an `isActive` flag; deleting a record only clears it.

mod character;
mod map;
mod party;
mod world_note;

pub use character::{
    Ability, Alignment, Attribute, AttributeKind, Character, Class, Equipment, HistoryEntry,
    Saves, Table,
};
pub use map::{Map, MapBackground, MapIcon};
pub use party::Party;
pub use world_note::WorldNote;

use serde::{Deserialize, Deserializer};

/// Deserialize `null` as the type's default.
///
/// Older sheets wrote empty collections as `null`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
