//! Items carried by players.
//!
//! Items are counted stacks keyed by name. Picking up an item with a name
//! the player already carries adds to the existing stack; counts never drop
//! below zero.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Item name for arrows.
pub const ARROWS: &str = "Arrows";
/// Item name for the Wumpus' gold.
pub const GOLD: &str = "Gold";

/// A named, counted stack of items.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub name: String,
    pub count: u32,
}

impl ItemStack {
    pub fn new(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }

    /// A stack of one.
    pub fn single(name: impl Into<String>) -> Self {
        Self::new(name, 1)
    }
}

/// A player's items in pickup order.
///
/// ```
/// use rust_wumpus::world::{Inventory, ItemStack, ARROWS};
///
/// let mut bag = Inventory::new();
/// bag.add(ItemStack::new(ARROWS, 2));
/// bag.add(ItemStack::single(ARROWS));
/// assert_eq!(bag.count(ARROWS), 3);
///
/// bag.remove(ARROWS, 5);
/// assert_eq!(bag.count(ARROWS), 0);
/// assert!(bag.carries(ARROWS));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    stacks: SmallVec<[ItemStack; 4]>,
}

impl Inventory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stack, merging with an existing stack of the same name.
    pub fn add(&mut self, item: ItemStack) {
        match self.stacks.iter_mut().find(|s| s.name == item.name) {
            Some(stack) => stack.count += item.count,
            None => self.stacks.push(item),
        }
    }

    /// Take up to `amount` from the named stack. The stack stays listed
    /// even when it reaches zero.
    pub fn remove(&mut self, name: &str, amount: u32) {
        if let Some(stack) = self.stacks.iter_mut().find(|s| s.name == name) {
            stack.count = stack.count.saturating_sub(amount);
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ItemStack> {
        self.stacks.iter().find(|s| s.name == name)
    }

    /// Whether a stack of this name has ever been picked up.
    #[must_use]
    pub fn carries(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Count held, zero when the item was never picked up.
    #[must_use]
    pub fn count(&self, name: &str) -> u32 {
        self.get(name).map_or(0, |s| s.count)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemStack> {
        self.stacks.iter()
    }

    /// One `name: count` line per stack.
    #[must_use]
    pub fn listing(&self) -> String {
        self.stacks
            .iter()
            .map(|s| format!("{}: {}\n", s.name, s.count))
            .collect()
    }
}
