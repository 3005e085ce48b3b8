//! Items and per-player inventories.

use serde::{Deserialize, Serialize};

/// Items a chest can drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    /// Lets the holder attack an occupied cell.
    Sword,
    /// Absorbs one sword in combat.
    Shield,
    /// Digs through one wall.
    Shovel,
    /// Widens the view window by one cell in every direction.
    ViewExpander,
}

impl ItemType {
    /// Every item, in drop-table order.
    pub const ALL: [ItemType; 4] = [ItemType::Sword, ItemType::Shield, ItemType::Shovel, ItemType::ViewExpander];
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ItemType::Sword => "sword",
            ItemType::Shield => "shield",
            ItemType::Shovel => "shovel",
            ItemType::ViewExpander => "view expander",
        };
        f.write_str(name)
    }
}

/// Item counts held by one player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Inventory {
    pub swords: u32,
    pub shields: u32,
    pub shovels: u32,
    pub view_expanders: u32,
}

impl Inventory {
    #[must_use]
    pub fn count(&self, item: ItemType) -> u32 {
        match item {
            ItemType::Sword => self.swords,
            ItemType::Shield => self.shields,
            ItemType::Shovel => self.shovels,
            ItemType::ViewExpander => self.view_expanders,
        }
    }

    fn slot_mut(&mut self, item: ItemType) -> &mut u32 {
        match item {
            ItemType::Sword => &mut self.swords,
            ItemType::Shield => &mut self.shields,
            ItemType::Shovel => &mut self.shovels,
            ItemType::ViewExpander => &mut self.view_expanders,
        }
    }

    /// Add one item.
    pub fn add(&mut self, item: ItemType) {
        let slot = self.slot_mut(item);
        *slot = slot.saturating_add(1);
    }

    /// Remove one item. Returns false, leaving the count at zero, if none was held.
    pub fn take(&mut self, item: ItemType) -> bool {
        let slot = self.slot_mut(item);
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }
}
