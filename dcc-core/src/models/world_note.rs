//! Campaign notes.

use serde::{Deserialize, Serialize};

/// A campaign note: an NPC, location, quest and so on.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorldNote {
    pub id: String,
    pub title: String,
    pub content: String,
    /// NPC, Location, Quest, etc.
    pub category: String,
    pub is_active: bool,
}
