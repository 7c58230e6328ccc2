//! Stackable item inventory with a slot limit.

use crate::config::BalanceConfig;

/// One stack of a single item id.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct InventorySlot {
    pub item_id: String,
    pub quantity: u32,
}

/// Item stacks carried by the player.
///
/// Each item id occupies at most one slot. A new id is refused once
/// `max_slots` slots are in use; existing stacks always grow.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Inventory {
    #[cfg_attr(feature = "serde", serde(default))]
    pub items: Vec<InventorySlot>,
    #[cfg_attr(feature = "serde", serde(default = "default_max_slots"))]
    pub max_slots: usize,
}

#[cfg(feature = "serde")]
fn default_max_slots() -> usize {
    BalanceConfig::MAX_INVENTORY_SLOTS
}

impl Default for Inventory {
    fn default() -> Self {
        Self::with_capacity(BalanceConfig::MAX_INVENTORY_SLOTS)
    }
}

impl Inventory {
    pub fn with_capacity(max_slots: usize) -> Self {
        Self {
            items: Vec::new(),
            max_slots,
        }
    }

    /// Adds `quantity` of an item. Returns `false` if a new slot was
    /// needed and the inventory is full.
    pub fn add(&mut self, item_id: &str, quantity: u32) -> bool {
        if let Some(slot) = self.items.iter_mut().find(|s| s.item_id == item_id) {
            slot.quantity = slot.quantity.saturating_add(quantity);
            return true;
        }
        if self.items.len() >= self.max_slots {
            return false;
        }
        self.items.push(InventorySlot {
            item_id: item_id.to_owned(),
            quantity,
        });
        true
    }

    /// Removes `quantity` units. The slot disappears when it reaches zero.
    ///
    /// Returns `false`, leaving the inventory untouched, when fewer than
    /// `quantity` units are held.
    pub fn remove(&mut self, item_id: &str, quantity: u32) -> bool {
        let Some(index) = self
            .items
            .iter()
            .position(|s| s.item_id == item_id && s.quantity >= quantity)
        else {
            return false;
        };
        let slot = &mut self.items[index];
        slot.quantity -= quantity;
        if slot.quantity == 0 {
            self.items.remove(index);
        }
        true
    }

    pub fn has(&self, item_id: &str) -> bool {
        self.count(item_id) > 0
    }

    pub fn count(&self, item_id: &str) -> u32 {
        self.items
            .iter()
            .find(|s| s.item_id == item_id)
            .map_or(0, |s| s.quantity)
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.max_slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stacks_existing_items() {
        let mut inv = Inventory::default();
        assert!(inv.add("item-debug-log", 1));
        assert!(inv.add("item-debug-log", 2));
        assert_eq!(inv.items.len(), 1);
        assert_eq!(inv.count("item-debug-log"), 3);
    }

    #[test]
    fn full_inventory_refuses_new_ids_but_stacks() {
        let mut inv = Inventory::with_capacity(1);
        assert!(inv.add("a", 1));
        assert!(!inv.add("b", 1));
        assert!(inv.add("a", 1));
        assert!(!inv.has("b"));
    }

    #[test]
    fn removing_last_unit_frees_the_slot() {
        let mut inv = Inventory::default();
        inv.add("a", 2);
        assert!(inv.remove("a", 1));
        assert_eq!(inv.count("a"), 1);
        assert!(!inv.remove("a", 5));
        assert_eq!(inv.count("a"), 1);
        assert!(inv.remove("a", 1));
        assert!(inv.items.is_empty());
        assert!(!inv.remove("a", 1));
    }
}
