//! Character sheet types.
//!
//! A [`Character`] is always handled as a complete snapshot: every save
//! replaces the whole record on disk, so the struct carries every field of
//! the sheet, including the ones the change detector ignores.

use super::null_as_default;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Character
// ============================================================================

/// A DCC character sheet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Character {
    /// Stable identifier, also the record's file stem.
    pub id: String,
    pub name: String,
    pub occupation: String,
    pub level: i64,
    pub class: String,
    pub class_description: String,
    pub alignment: Alignment,
    pub max_health: i64,
    pub current_health: i64,
    pub current_experience: i64,
    pub experience_needed: i64,
    pub armor_class: i64,
    pub total_experience: i64,
    pub speed: i64,
    pub initiative: i64,
    /// Soft-delete flag. Not compared by the change detector.
    pub is_active: bool,

    pub strength: Attribute,
    pub agility: Attribute,
    pub stamina: Attribute,
    pub personality: Attribute,
    pub intelligence: Attribute,
    pub luck: Attribute,

    pub saves: Saves,
    pub notes: String,

    #[serde(deserialize_with = "null_as_default")]
    pub equipment: Vec<Equipment>,
    #[serde(deserialize_with = "null_as_default")]
    pub abilities: Vec<Ability>,
    #[serde(deserialize_with = "null_as_default")]
    pub classes: Vec<Class>,
    #[serde(deserialize_with = "null_as_default")]
    pub tables: Vec<Table>,

    pub action_dice: String,
    pub attack: i64,
    pub crit_dice: String,
    pub crit_table: String,
    pub melee_attack_bonus: i64,
    pub melee_damage_bonus: i64,
    pub missile_attack_bonus: i64,
    pub missile_damage_bonus: i64,

    /// Audit log, owned by the character store once the record exists.
    #[serde(deserialize_with = "null_as_default")]
    pub history: Vec<HistoryEntry>,
}

impl Character {
    /// Create a fresh, active level-0 character with a new id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            is_active: true,
            ..Default::default()
        }
    }

    /// Look up an attribute by kind.
    pub fn attribute(&self, kind: AttributeKind) -> &Attribute {
        match kind {
            AttributeKind::Strength => &self.strength,
            AttributeKind::Agility => &self.agility,
            AttributeKind::Stamina => &self.stamina,
            AttributeKind::Personality => &self.personality,
            AttributeKind::Intelligence => &self.intelligence,
            AttributeKind::Luck => &self.luck,
        }
    }

    /// Mutable access to an attribute by kind.
    pub fn attribute_mut(&mut self, kind: AttributeKind) -> &mut Attribute {
        match kind {
            AttributeKind::Strength => &mut self.strength,
            AttributeKind::Agility => &mut self.agility,
            AttributeKind::Stamina => &mut self.stamina,
            AttributeKind::Personality => &mut self.personality,
            AttributeKind::Intelligence => &mut self.intelligence,
            AttributeKind::Luck => &mut self.luck,
        }
    }
}

/// Character alignment, stored as an integer (0 neutral, 1 lawful, 2 chaotic).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Alignment {
    #[default]
    Neutral,
    Lawful,
    Chaotic,
    /// Any value written by a newer sheet that this build does not know.
    Other(i64),
}

impl From<i64> for Alignment {
    fn from(value: i64) -> Self {
        match value {
            0 => Alignment::Neutral,
            1 => Alignment::Lawful,
            2 => Alignment::Chaotic,
            other => Alignment::Other(other),
        }
    }
}

impl From<Alignment> for i64 {
    fn from(alignment: Alignment) -> Self {
        match alignment {
            Alignment::Neutral => 0,
            Alignment::Lawful => 1,
            Alignment::Chaotic => 2,
            Alignment::Other(value) => value,
        }
    }
}

// ============================================================================
// Attributes
// ============================================================================

/// The six DCC attributes, in sheet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Strength,
    Agility,
    Stamina,
    Personality,
    Intelligence,
    Luck,
}

impl AttributeKind {
    /// All attributes in the order they appear on the sheet.
    pub const ALL: [AttributeKind; 6] = [
        AttributeKind::Strength,
        AttributeKind::Agility,
        AttributeKind::Stamina,
        AttributeKind::Personality,
        AttributeKind::Intelligence,
        AttributeKind::Luck,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AttributeKind::Strength => "Strength",
            AttributeKind::Agility => "Agility",
            AttributeKind::Stamina => "Stamina",
            AttributeKind::Personality => "Personality",
            AttributeKind::Intelligence => "Intelligence",
            AttributeKind::Luck => "Luck",
        }
    }
}

/// An attribute score with a transient modifier layered on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Attribute {
    pub base: i64,
    pub temporary: i64,
}

impl Attribute {
    pub fn new(base: i64, temporary: i64) -> Self {
        Self { base, temporary }
    }
}

/// Saving throw bonuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Saves {
    pub reflex: i64,
    pub fortitude: i64,
    pub willpower: i64,
}

// ============================================================================
// Sub-entities
// ============================================================================

/// An item carried by the character.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Equipment {
    pub id: String,
    pub name: String,
    pub quantity: i64,
    pub weight: f64,
    pub value: f64,
    pub category: String,
    pub equipped: bool,
    pub ac_bonus: i64,
    pub reflex_save: i64,
    pub fortitude_save: i64,
    pub willpower_save: i64,
    /// Weapons only.
    pub damage_dice: String,
    /// Weapons only.
    pub attack_bonus: i64,
    pub description: String,
    pub is_active: bool,
}

impl Equipment {
    pub fn new(name: impl Into<String>, quantity: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            quantity,
            is_active: true,
            ..Default::default()
        }
    }
}

/// A spell, ability or trait.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Ability {
    pub id: String,
    pub name: String,
    pub description: String,
    /// spell, ability, trait, etc.
    #[serde(rename = "type")]
    pub kind: String,
    pub page_number: String,
    pub is_active: bool,
}

impl Ability {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            is_active: true,
            ..Default::default()
        }
    }
}

/// A class the character has levels in.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Class {
    pub id: String,
    pub name: String,
    pub level: i64,
    pub description: String,
    pub is_active: bool,
}

impl Class {
    pub fn new(name: impl Into<String>, level: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            level,
            is_active: true,
            ..Default::default()
        }
    }
}

/// A custom roll table reference kept on the sheet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Table {
    pub id: String,
    pub name: String,
    pub number: String,
    pub dice: String,
    pub is_active: bool,
}

// ============================================================================
// History
// ============================================================================

/// One save event in a character's audit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub changes: Vec<String>,
    #[serde(default)]
    pub note: String,
}

impl HistoryEntry {
    pub fn new(timestamp: DateTime<Utc>, changes: Vec<String>, note: impl Into<String>) -> Self {
        Self {
            timestamp,
            changes,
            note: note.into(),
        }
    }
}
