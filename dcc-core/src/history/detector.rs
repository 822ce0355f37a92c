//! Field-by-field comparison of two character snapshots.
//!
//! The output order is fixed: scalar stats, the six attributes, then the
//! equipment, ability and class collections. History logs depend on that
//! order staying stable between runs.

use crate::models::{Ability, AttributeKind, Character, Class, Equipment};
use std::collections::HashMap;

/// Produces human-readable change descriptions between two snapshots.
///
/// Stateless; both snapshots are only borrowed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeDetector;

impl ChangeDetector {
    pub fn new() -> Self {
        Self
    }

    /// Compare two snapshots of the same character.
    ///
    /// Returns an empty list when nothing tracked differs. The character's own
    /// `is_active` flag is not compared.
    pub fn compare(&self, old: &Character, new: &Character) -> Vec<String> {
        let mut changes = Vec::new();

        if old.name != new.name {
            changes.push(format!(
                "Name changed from '{}' to '{}'",
                old.name, new.name
            ));
        }

        if old.level != new.level {
            changes.push(format!(
                "Level changed from {} to {}",
                old.level, new.level
            ));
        }

        if old.current_health != new.current_health {
            changes.push(format!(
                "Health {}",
                describe_delta(old.current_health, new.current_health)
            ));
        }

        if old.max_health != new.max_health {
            changes.push(format!(
                "Max health changed from {} to {}",
                old.max_health, new.max_health
            ));
        }

        if old.total_experience != new.total_experience {
            let gained = i128::from(new.total_experience) - i128::from(old.total_experience);
            changes.push(format!(
                "Experience gained: {gained} (total: {})",
                new.total_experience
            ));
        }

        for kind in AttributeKind::ALL {
            let (before, after) = (old.attribute(kind), new.attribute(kind));
            if before != after {
                changes.push(format!(
                    "{} changed: {}/{} → {}/{}",
                    kind.name(),
                    before.base,
                    before.temporary,
                    after.base,
                    after.temporary
                ));
            }
        }

        changes.extend(self.compare_equipment(&old.equipment, &new.equipment));
        changes.extend(self.compare_abilities(&old.abilities, &new.abilities));
        changes.extend(self.compare_classes(&old.classes, &new.classes));

        changes
    }

    /// Compare two equipment lists.
    pub fn compare_equipment(&self, old: &[Equipment], new: &[Equipment]) -> Vec<String> {
        compare_collection(old, new)
    }

    /// Compare two ability lists.
    pub fn compare_abilities(&self, old: &[Ability], new: &[Ability]) -> Vec<String> {
        compare_collection(old, new)
    }

    /// Compare two class lists.
    pub fn compare_classes(&self, old: &[Class], new: &[Class]) -> Vec<String> {
        compare_collection(old, new)
    }
}

/// Render a signed change as "increased by N (A → B)" or "decreased by N (A → B)".
fn describe_delta(old: i64, new: i64) -> String {
    let diff = i128::from(new) - i128::from(old);
    let direction = if diff > 0 { "increased" } else { "decreased" };
    format!("{direction} by {} ({old} → {new})", diff.abs())
}

// ============================================================================
// Collections
// ============================================================================

/// A sub-entity of a character, keyed by a stable id.
pub trait TrackedItem {
    /// Display label, e.g. "Equipment".
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn is_active(&self) -> bool;

    /// Message for an item that did not exist before.
    fn describe_added(&self) -> String {
        format!("Added {}: {}", Self::KIND.to_lowercase(), self.name())
    }

    /// Message for a change to the item's own fields, if any.
    ///
    /// Checked before the active flag; the first message wins.
    fn describe_change(old: &Self, new: &Self) -> Option<String>;
}

impl TrackedItem for Equipment {
    const KIND: &'static str = "Equipment";

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn describe_change(old: &Self, new: &Self) -> Option<String> {
        (old.quantity != new.quantity).then(|| {
            format!(
                "Equipment '{}' quantity: {} → {}",
                new.name, old.quantity, new.quantity
            )
        })
    }
}

impl TrackedItem for Ability {
    const KIND: &'static str = "Ability";

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn describe_change(old: &Self, new: &Self) -> Option<String> {
        (old.name != new.name)
            .then(|| format!("Ability renamed: '{}' → '{}'", old.name, new.name))
    }
}

impl TrackedItem for Class {
    const KIND: &'static str = "Class";

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn describe_added(&self) -> String {
        format!("Added class: {} (Level {})", self.name, self.level)
    }

    fn describe_change(old: &Self, new: &Self) -> Option<String> {
        if old.name != new.name {
            Some(format!("Class renamed: '{}' → '{}'", old.name, new.name))
        } else if old.level != new.level {
            Some(format!(
                "Class '{}' level {}",
                new.name,
                describe_delta(old.level, new.level)
            ))
        } else {
            None
        }
    }
}

/// Diff two same-kind lists by id.
///
/// Items in `new` are visited in order and each yields at most one message:
/// added, then field change, then active flip. Items that vanished from the
/// list entirely are reported afterwards, in `old`'s order, if they were
/// active.
pub fn compare_collection<T: TrackedItem>(old: &[T], new: &[T]) -> Vec<String> {
    let old_index: HashMap<&str, &T> = old.iter().map(|item| (item.id(), item)).collect();
    let new_index: HashMap<&str, &T> = new.iter().map(|item| (item.id(), item)).collect();

    let mut changes = Vec::new();

    for item in new {
        let Some(previous) = old_index.get(item.id()) else {
            if item.is_active() {
                changes.push(item.describe_added());
            }
            continue;
        };

        if let Some(change) = T::describe_change(previous, item) {
            changes.push(change);
        } else if previous.is_active() != item.is_active() {
            let verb = if item.is_active() { "restored" } else { "removed" };
            changes.push(format!("{} {verb}: {}", T::KIND, item.name()));
        }
    }

    for item in old {
        if item.is_active() && !new_index.contains_key(item.id()) {
            changes.push(format!("{} removed: {}", T::KIND, item.name()));
        }
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Attribute;
    use crate::testing::sample_character;

    fn detector() -> ChangeDetector {
        ChangeDetector::new()
    }

    #[test]
    fn test_identical_snapshots_have_no_changes() {
        let character = sample_character("Zed");
        assert!(detector().compare(&character, &character).is_empty());
        assert!(detector()
            .compare(&character, &character.clone())
            .is_empty());
    }

    #[test]
    fn test_health_increase_and_decrease() {
        let mut old = sample_character("Zed");
        old.current_health = 10;
        let mut new = old.clone();
        new.current_health = 14;

        assert_eq!(
            detector().compare(&old, &new),
            vec!["Health increased by 4 (10 → 14)"]
        );
        assert_eq!(
            detector().compare(&new, &old),
            vec!["Health decreased by 4 (14 → 10)"]
        );
    }

    #[test]
    fn test_scalar_messages_in_order() {
        let old = sample_character("Zed");
        let mut new = old.clone();
        new.name = "Zed the Bold".to_string();
        new.level = old.level + 1;
        new.max_health = old.max_health + 5;
        new.total_experience = old.total_experience + 50;

        let changes = detector().compare(&old, &new);
        assert_eq!(
            changes,
            vec![
                "Name changed from 'Zed' to 'Zed the Bold'".to_string(),
                format!("Level changed from {} to {}", old.level, new.level),
                format!(
                    "Max health changed from {} to {}",
                    old.max_health, new.max_health
                ),
                format!("Experience gained: 50 (total: {})", new.total_experience),
            ]
        );
    }

    #[test]
    fn test_experience_loss_keeps_gained_wording() {
        let mut old = sample_character("Zed");
        old.total_experience = 100;
        let mut new = old.clone();
        new.total_experience = 90;

        assert_eq!(
            detector().compare(&old, &new),
            vec!["Experience gained: -10 (total: 90)"]
        );
    }

    #[test]
    fn test_temporary_only_attribute_change() {
        let mut old = sample_character("Zed");
        old.agility = Attribute::new(12, 0);
        let mut new = old.clone();
        new.agility = Attribute::new(12, -2);

        assert_eq!(
            detector().compare(&old, &new),
            vec!["Agility changed: 12/0 → 12/-2"]
        );
    }

    #[test]
    fn test_attributes_reported_in_sheet_order() {
        let old = sample_character("Zed");
        let mut new = old.clone();
        new.luck.base += 1;
        new.strength.temporary += 1;
        new.intelligence.base -= 1;

        let changes = detector().compare(&old, &new);
        assert_eq!(changes.len(), 3);
        assert!(changes[0].starts_with("Strength changed"));
        assert!(changes[1].starts_with("Intelligence changed"));
        assert!(changes[2].starts_with("Luck changed"));
    }

    #[test]
    fn test_inactive_equipment_addition_is_silent() {
        let old = sample_character("Zed");
        let mut new = old.clone();
        new.equipment.push(Equipment {
            is_active: false,
            ..Equipment::new("Broken Lantern", 1)
        });

        assert!(detector().compare(&old, &new).is_empty());
    }

    #[test]
    fn test_equipment_added_quantity_and_removed() {
        let torch = Equipment::new("Torch", 3);
        let rope = Equipment::new("Rope", 1);
        let old = vec![torch.clone(), rope.clone()];

        let mut fewer_torches = torch.clone();
        fewer_torches.quantity = 1;
        let new = vec![fewer_torches, Equipment::new("Chalk", 5)];

        assert_eq!(
            detector().compare_equipment(&old, &new),
            vec![
                "Equipment 'Torch' quantity: 3 → 1",
                "Added equipment: Chalk",
                "Equipment removed: Rope",
            ]
        );
    }

    #[test]
    fn test_equipment_deactivation_and_restore() {
        let torch = Equipment::new("Torch", 3);
        let mut stashed = torch.clone();
        stashed.is_active = false;

        assert_eq!(
            detector().compare_equipment(&[torch.clone()], &[stashed.clone()]),
            vec!["Equipment removed: Torch"]
        );
        assert_eq!(
            detector().compare_equipment(&[stashed], &[torch]),
            vec!["Equipment restored: Torch"]
        );
    }

    #[test]
    fn test_quantity_change_suppresses_active_flip() {
        let torch = Equipment::new("Torch", 3);
        let mut changed = torch.clone();
        changed.quantity = 0;
        changed.is_active = false;

        assert_eq!(
            detector().compare_equipment(&[torch], &[changed]),
            vec!["Equipment 'Torch' quantity: 3 → 0"]
        );
    }

    #[test]
    fn test_dropped_inactive_item_is_silent() {
        let mut torch = Equipment::new("Torch", 3);
        torch.is_active = false;
        assert!(detector().compare_equipment(&[torch], &[]).is_empty());
    }

    #[test]
    fn test_display_only_equipment_fields_ignored() {
        let torch = Equipment::new("Torch", 3);
        let mut heavier = torch.clone();
        heavier.weight = 2.5;
        heavier.value = 10.0;
        heavier.ac_bonus = 1;
        heavier.description = "Smoky".to_string();

        assert!(detector().compare_equipment(&[torch], &[heavier]).is_empty());
    }

    #[test]
    fn test_ability_rename_suppresses_active_flip() {
        let spell = Ability::new("Magic Shield");
        let mut renamed = spell.clone();
        renamed.name = "Magic Shield (lost)".to_string();
        renamed.is_active = false;

        assert_eq!(
            detector().compare_abilities(&[spell], &[renamed]),
            vec!["Ability renamed: 'Magic Shield' → 'Magic Shield (lost)'"]
        );
    }

    #[test]
    fn test_ability_added_and_removed() {
        let old = vec![Ability::new("Backstab")];
        let new = vec![Ability::new("Sneak")];

        assert_eq!(
            detector().compare_abilities(&old, &new),
            vec!["Added ability: Sneak", "Ability removed: Backstab"]
        );
    }

    #[test]
    fn test_class_messages() {
        let warrior = Class::new("Warrior", 1);

        let mut promoted = warrior.clone();
        promoted.level = 3;
        assert_eq!(
            detector().compare_classes(&[warrior.clone()], &[promoted.clone()]),
            vec!["Class 'Warrior' level increased by 2 (1 → 3)"]
        );
        assert_eq!(
            detector().compare_classes(&[promoted], &[warrior.clone()]),
            vec!["Class 'Warrior' level decreased by 2 (3 → 1)"]
        );

        let mut renamed = warrior.clone();
        renamed.name = "Reaver".to_string();
        renamed.level = 2;
        assert_eq!(
            detector().compare_classes(&[warrior], &[renamed]),
            vec!["Class renamed: 'Warrior' → 'Reaver'"]
        );

        assert_eq!(
            detector().compare_classes(&[], &[Class::new("Cleric", 1)]),
            vec!["Added class: Cleric (Level 1)"]
        );

        let thief = Class::new("Thief", 2);
        let mut retired = thief.clone();
        retired.is_active = false;
        assert_eq!(
            detector().compare_classes(&[thief.clone()], &[retired.clone()]),
            vec!["Class removed: Thief"]
        );
        assert_eq!(
            detector().compare_classes(&[retired], &[thief.clone()]),
            vec!["Class restored: Thief"]
        );
        assert_eq!(
            detector().compare_classes(&[thief], &[]),
            vec!["Class removed: Thief"]
        );
    }

    #[test]
    fn test_ability_restored() {
        let mut sneak = Ability::new("Sneak");
        sneak.is_active = false;
        let mut back = sneak.clone();
        back.is_active = true;

        assert_eq!(
            detector().compare_abilities(&[sneak], &[back]),
            vec!["Ability restored: Sneak"]
        );
    }

    #[test]
    fn test_collections_follow_attributes() {
        let old = sample_character("Zed");
        let mut new = old.clone();
        new.classes.push(Class::new("Thief", 1));
        new.abilities.push(Ability::new("Luck Burn"));
        new.equipment.push(Equipment::new("Dagger", 1));
        new.stamina.base += 1;

        let changes = detector().compare(&old, &new);
        assert_eq!(changes.len(), 4);
        assert!(changes[0].starts_with("Stamina changed"));
        assert_eq!(changes[1], "Added equipment: Dagger");
        assert_eq!(changes[2], "Added ability: Luck Burn");
        assert_eq!(changes[3], "Added class: Thief (Level 1)");
    }

    #[test]
    fn test_character_active_flag_not_compared() {
        let old = sample_character("Zed");
        let mut new = old.clone();
        new.is_active = false;

        assert!(detector().compare(&old, &new).is_empty());
    }

    #[test]
    fn test_extreme_health_delta_does_not_overflow() {
        let mut old = sample_character("Zed");
        old.current_health = i64::MIN;
        let mut new = old.clone();
        new.current_health = i64::MAX;

        let changes = detector().compare(&old, &new);
        assert_eq!(changes.len(), 1);
        assert!(changes[0].starts_with("Health increased by 18446744073709551615"));
    }
}
