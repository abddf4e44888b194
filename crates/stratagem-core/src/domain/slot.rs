//! Slots: physical keys and the stratagem currently assigned to each.
//!
//! A [`SlotTable`] is built by the host application whenever the active
//! layout changes (numeric keypad or a custom grid) and is mutated by drag and
//! drop or profile loads.  The engine only ever calls
//! [`SlotRegistry::lookup`], once per key-down, and never caches the answer.

use std::fmt;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use super::DomainError;

/// Maximum number of keys a custom layout may bind.
pub const MAX_CUSTOM_KEYS: usize = 20;

/// Scan codes and labels of the standard numeric keypad, top-left to bottom-right.
///
/// Numpad Enter shares scan code 28 with the main Enter key and numpad `/`
/// shares 53 with the main `/`; the hook tells them apart with the extended
/// flag (see [`crate::keymap::windows_scan::is_keypad_key`]).
pub const NUMPAD_KEYS: [(u16, &str); 16] = [
    (53, "/"),
    (55, "*"),
    (74, "-"),
    (71, "7"),
    (72, "8"),
    (73, "9"),
    (78, "+"),
    (75, "4"),
    (76, "5"),
    (77, "6"),
    (79, "1"),
    (80, "2"),
    (81, "3"),
    (28, "Enter"),
    (82, "0"),
    (83, "."),
];

/// Device-level key identity: the OS scan code, independent of layout and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhysicalKeyId(pub u16);

impl fmt::Display for PhysicalKeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sc{}", self.0)
    }
}

/// What the engine learns about an assigned slot at trigger time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotAssignment {
    pub macro_name: String,
    /// Label printed on the key (e.g. `"7"`, `"Enter"`).
    pub key_label: String,
}

/// Read-only view over slot assignments consumed by the engine.
#[cfg_attr(test, mockall::automock)]
pub trait SlotRegistry: Send + Sync {
    /// Returns the current assignment for `key`, or `None` when the key is not
    /// a slot or the slot is empty.
    fn lookup(&self, key: PhysicalKeyId) -> Option<SlotAssignment>;
}

/// One key of the active layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub key: PhysicalKeyId,
    pub label: String,
    pub assigned: Option<String>,
}

/// Thread-safe slot table shared between the host application and the engine.
///
/// Cloning is cheap and every clone refers to the same slots.
#[derive(Debug, Clone)]
pub struct SlotTable {
    slots: Arc<RwLock<Vec<Slot>>>,
}

impl SlotTable {
    /// Builds the 16 standard numeric keypad slots, all empty.
    pub fn numpad() -> Self {
        let slots = NUMPAD_KEYS
            .iter()
            .map(|&(code, label)| Slot {
                key: PhysicalKeyId(code),
                label: label.to_string(),
                assigned: None,
            })
            .collect();
        Self::from_slots(slots)
    }

    /// Builds a custom layout from captured `(key, label)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::TooManyCustomKeys`] above [`MAX_CUSTOM_KEYS`] and
    /// [`DomainError::DuplicateKey`] if a key is captured twice.
    pub fn custom<I>(keys: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = (PhysicalKeyId, String)>,
    {
        let mut slots: Vec<Slot> = Vec::new();
        for (key, label) in keys {
            if slots.iter().any(|s| s.key == key) {
                return Err(DomainError::DuplicateKey(key.0));
            }
            slots.push(Slot {
                key,
                label,
                assigned: None,
            });
        }
        if slots.len() > MAX_CUSTOM_KEYS {
            return Err(DomainError::TooManyCustomKeys {
                count: slots.len(),
                max: MAX_CUSTOM_KEYS,
            });
        }
        Ok(Self::from_slots(slots))
    }

    fn from_slots(slots: Vec<Slot>) -> Self {
        Self {
            slots: Arc::new(RwLock::new(slots)),
        }
    }

    /// Assigns `macro_name` to `key`, returning the previous assignment.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownSlot`] if `key` is not part of the layout.
    pub fn assign(
        &self,
        key: PhysicalKeyId,
        macro_name: impl Into<String>,
    ) -> Result<Option<String>, DomainError> {
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        let slot = slots
            .iter_mut()
            .find(|s| s.key == key)
            .ok_or(DomainError::UnknownSlot(key.0))?;
        Ok(slot.assigned.replace(macro_name.into()))
    }

    /// Empties the slot for `key`, returning what was assigned.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownSlot`] if `key` is not part of the layout.
    pub fn clear(&self, key: PhysicalKeyId) -> Result<Option<String>, DomainError> {
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        let slot = slots
            .iter_mut()
            .find(|s| s.key == key)
            .ok_or(DomainError::UnknownSlot(key.0))?;
        Ok(slot.assigned.take())
    }

    pub fn clear_all(&self) {
        let mut slots = self.slots.write().unwrap_or_else(|e| e.into_inner());
        for slot in slots.iter_mut() {
            slot.assigned = None;
        }
    }

    /// Number of slots that currently hold a stratagem.
    pub fn assigned_count(&self) -> usize {
        self.slots
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|s| s.assigned.is_some())
            .count()
    }

    /// Copy of every slot in layout order.
    pub fn slots(&self) -> Vec<Slot> {
        self.slots.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl SlotRegistry for SlotTable {
    fn lookup(&self, key: PhysicalKeyId) -> Option<SlotAssignment> {
        let slots = self.slots.read().unwrap_or_else(|e| e.into_inner());
        let slot = slots.iter().find(|s| s.key == key)?;
        slot.assigned.as_ref().map(|name| SlotAssignment {
            macro_name: name.clone(),
            key_label: slot.label.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numpad_table_has_sixteen_empty_slots() {
        let table = SlotTable::numpad();
        let slots = table.slots();
        assert_eq!(slots.len(), 16);
        assert!(slots.iter().all(|s| s.assigned.is_none()));
        assert_eq!(table.assigned_count(), 0);
    }

    #[test]
    fn test_lookup_returns_none_for_empty_slot() {
        let table = SlotTable::numpad();
        assert_eq!(table.lookup(PhysicalKeyId(71)), None);
    }

    #[test]
    fn test_lookup_returns_none_for_key_outside_layout() {
        let table = SlotTable::numpad();
        assert_eq!(table.lookup(PhysicalKeyId(30)), None);
    }

    #[test]
    fn test_assign_then_lookup_carries_label() {
        // Arrange
        let table = SlotTable::numpad();

        // Act
        let previous = table.assign(PhysicalKeyId(28), "Reinforce").unwrap();

        // Assert
        assert_eq!(previous, None);
        assert_eq!(
            table.lookup(PhysicalKeyId(28)),
            Some(SlotAssignment {
                macro_name: "Reinforce".to_string(),
                key_label: "Enter".to_string(),
            })
        );
    }

    #[test]
    fn test_assign_replaces_and_returns_previous() {
        let table = SlotTable::numpad();
        table.assign(PhysicalKeyId(71), "Resupply").unwrap();
        let previous = table.assign(PhysicalKeyId(71), "Reinforce").unwrap();
        assert_eq!(previous.as_deref(), Some("Resupply"));
    }

    #[test]
    fn test_assign_unknown_key_fails() {
        let table = SlotTable::numpad();
        assert_eq!(
            table.assign(PhysicalKeyId(2), "Resupply"),
            Err(DomainError::UnknownSlot(2))
        );
    }

    #[test]
    fn test_clear_and_clear_all() {
        let table = SlotTable::numpad();
        table.assign(PhysicalKeyId(71), "Resupply").unwrap();
        table.assign(PhysicalKeyId(72), "Reinforce").unwrap();

        assert_eq!(table.clear(PhysicalKeyId(71)).unwrap().as_deref(), Some("Resupply"));
        assert_eq!(table.assigned_count(), 1);

        table.clear_all();
        assert_eq!(table.assigned_count(), 0);
    }

    #[test]
    fn test_clones_share_assignments() {
        let host = SlotTable::numpad();
        let engine_view = host.clone();
        host.assign(PhysicalKeyId(82), "Eagle Rearm").unwrap();
        assert!(engine_view.lookup(PhysicalKeyId(82)).is_some());
    }

    #[test]
    fn test_custom_layout_rejects_more_than_twenty_keys() {
        let keys = (0..21u16).map(|i| (PhysicalKeyId(100 + i), format!("k{i}")));
        assert_eq!(
            SlotTable::custom(keys).unwrap_err(),
            DomainError::TooManyCustomKeys { count: 21, max: 20 }
        );
    }

    #[test]
    fn test_custom_layout_rejects_duplicate_keys() {
        let keys = vec![
            (PhysicalKeyId(16), "Q".to_string()),
            (PhysicalKeyId(16), "Q again".to_string()),
        ];
        assert_eq!(SlotTable::custom(keys).unwrap_err(), DomainError::DuplicateKey(16));
    }

    #[test]
    fn test_custom_layout_treats_keys_as_opaque_ids() {
        let table = SlotTable::custom(vec![(PhysicalKeyId(59), "F1".to_string())]).unwrap();
        table.assign(PhysicalKeyId(59), "Orbital Laser").unwrap();
        assert_eq!(
            table.lookup(PhysicalKeyId(59)).map(|a| a.key_label),
            Some("F1".to_string())
        );
    }
}
