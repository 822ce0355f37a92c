//! Testing utilities.
//!
//! This module provides:
//! - `sample_character` for a fully populated sheet
//! - `FixedClock` for deterministic history timestamps
//! - `RecordingSink` for asserting on store events
//! - `scratch_stores` for stores in a temporary directory

use crate::clock::Clock;
use crate::config::StoreConfig;
use crate::events::{EventSink, StoreEvent};
use crate::models::{Ability, Attribute, Character, Class, Equipment, Saves};
use crate::store::{StoreError, Stores};
use chrono::{DateTime, Duration, Utc};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

/// Create a level 1 warrior with a few items, an ability and a class.
pub fn sample_character(name: &str) -> Character {
    let mut character = Character::new(name);

    character.occupation = "Gravedigger".to_string();
    character.level = 1;
    character.class = "Warrior".to_string();
    character.max_health = 12;
    character.current_health = 12;
    character.armor_class = 12;
    character.speed = 30;
    character.total_experience = 10;
    character.action_dice = "1d20".to_string();
    character.crit_dice = "1d12".to_string();
    character.crit_table = "III".to_string();

    character.strength = Attribute::new(14, 0);
    character.agility = Attribute::new(11, 0);
    character.stamina = Attribute::new(13, 0);
    character.personality = Attribute::new(9, 0);
    character.intelligence = Attribute::new(8, 0);
    character.luck = Attribute::new(12, 0);
    character.saves = Saves {
        reflex: 1,
        fortitude: 1,
        willpower: 0,
    };

    character.equipment.push(Equipment::new("Shovel", 1));
    character.equipment.push(Equipment {
        damage_dice: "1d6".to_string(),
        attack_bonus: 1,
        ..Equipment::new("Hand axe", 1)
    });
    character.equipment.push(Equipment::new("Torch", 3));
    character.abilities.push(Ability::new("Mighty Deed of Arms"));
    character.classes.push(Class::new("Warrior", 1));

    character
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Move the clock forward.
    pub fn advance_secs(&self, secs: i64) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += Duration::seconds(secs);
    }
}

impl Default for FixedClock {
    /// Noon UTC on 2024-01-01.
    fn default() -> Self {
        Self::new(DateTime::from_timestamp(1_704_110_400, 0).unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// An event sink that keeps everything it receives.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<StoreEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received so far, oldest first.
    pub fn events(&self) -> Vec<StoreEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl EventSink for RecordingSink {
    fn record(&self, event: &StoreEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

/// Stores under `base_dir` wired to a fixed clock and a recording sink.
pub async fn scratch_stores(
    base_dir: impl AsRef<Path>,
) -> Result<(Stores, Arc<FixedClock>, Arc<RecordingSink>), StoreError> {
    let clock = Arc::new(FixedClock::default());
    let events = Arc::new(RecordingSink::new());
    let stores = StoreConfig::new(base_dir.as_ref())
        .with_clock(clock.clone())
        .with_events(events.clone())
        .open()
        .await?;
    Ok((stores, clock, events))
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert that a character's latest history entry has exactly these changes.
#[track_caller]
pub fn assert_last_changes(character: &Character, expected: &[&str]) {
    let entry = character
        .history
        .last()
        .unwrap_or_else(|| panic!("Expected '{}' to have history", character.name));
    assert_eq!(
        entry.changes, expected,
        "Unexpected changes in latest history entry of '{}'",
        character.name
    );
}
