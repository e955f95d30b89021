//! Item ledger: item mutations scoped to a parent list.

use std::collections::HashMap;

use crate::error::GroceryError;
use crate::model::{new_id, GroceryItem, ItemId, Unit};
use crate::normalize::Ingredient;
use crate::state::GroceryState;
use crate::validation::validate_item_name;

#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    /// A new item was appended.
    Added { item_id: ItemId },
    /// An item with the same name and unit absorbed the quantity.
    Updated { item_id: ItemId, quantity: f64 },
}

impl AddOutcome {
    pub fn item_id(&self) -> &str {
        match self {
            AddOutcome::Added { item_id } | AddOutcome::Updated { item_id, .. } => item_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchOutcome {
    pub added: usize,
    pub updated: usize,
    /// Names dropped for an invalid name or quantity, including totals that
    /// would no longer be a finite positive number.
    pub skipped: Vec<String>,
}

impl BatchOutcome {
    pub fn changed(&self) -> bool {
        self.added + self.updated > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    Cleared { removed: usize },
    AlreadyEmpty,
}

fn valid_quantity(quantity: f64) -> bool {
    quantity.is_finite() && quantity > 0.0
}

impl GroceryState {
    /// Adds an item, merging into an existing item with the same name and unit.
    ///
    /// Names are stored trimmed and lowercased. A merge must leave the item
    /// with a positive quantity.
    pub fn add_item(
        &mut self,
        list_id: &str,
        name: &str,
        quantity: f64,
        unit: Unit,
    ) -> Result<AddOutcome, GroceryError> {
        let list = self
            .list_mut(list_id)
            .ok_or_else(|| GroceryError::ListNotFound(list_id.to_string()))?;
        validate_item_name(name).map_err(GroceryError::InvalidItemName)?;
        let name = name.trim().to_lowercase();

        let outcome = if let Some(existing) =
            list.items.iter_mut().find(|item| item.matches(&name, unit))
        {
            let merged = existing.quantity + quantity;
            if !valid_quantity(merged) {
                return Err(GroceryError::InvalidQuantity(quantity));
            }
            existing.quantity = merged;
            grocery_logging::grocery_debug!("Merged {} {} into {:?}", quantity, unit, name);
            AddOutcome::Updated {
                item_id: existing.id.clone(),
                quantity: merged,
            }
        } else {
            if !valid_quantity(quantity) {
                return Err(GroceryError::InvalidQuantity(quantity));
            }
            let item = GroceryItem {
                id: new_id(),
                name,
                completed: false,
                quantity,
                unit,
            };
            let item_id = item.id.clone();
            list.items.push(item);
            AddOutcome::Added { item_id }
        };

        self.mark_dirty();
        Ok(outcome)
    }

    /// Adds a batch in one committed change.
    ///
    /// Entries are grouped by (lowercased name, unit) with quantities summed
    /// before merging into the list. Unknown units are recorded as pieces.
    pub fn add_items(
        &mut self,
        list_id: &str,
        batch: &[Ingredient],
    ) -> Result<BatchOutcome, GroceryError> {
        let list = self
            .list_mut(list_id)
            .ok_or_else(|| GroceryError::ListNotFound(list_id.to_string()))?;

        let mut outcome = BatchOutcome::default();
        let mut groups: Vec<(String, Unit, f64)> = Vec::new();
        let mut index: HashMap<(String, Unit), usize> = HashMap::new();
        for entry in batch {
            if validate_item_name(&entry.name).is_err() || !valid_quantity(entry.quantity) {
                outcome.skipped.push(entry.name.clone());
                continue;
            }
            let name = entry.name.trim().to_lowercase();
            let unit = Unit::parse_or_piece(&entry.unit);
            match index.get(&(name.clone(), unit)) {
                Some(&slot) => groups[slot].2 += entry.quantity,
                None => {
                    index.insert((name.clone(), unit), groups.len());
                    groups.push((name, unit, entry.quantity));
                }
            }
        }

        for (name, unit, quantity) in groups {
            if !valid_quantity(quantity) {
                outcome.skipped.push(name);
                continue;
            }
            if let Some(existing) = list.items.iter_mut().find(|item| item.matches(&name, unit)) {
                let merged = existing.quantity + quantity;
                if !valid_quantity(merged) {
                    outcome.skipped.push(name);
                    continue;
                }
                existing.quantity = merged;
                outcome.updated += 1;
            } else {
                list.items.push(GroceryItem {
                    id: new_id(),
                    name,
                    completed: false,
                    quantity,
                    unit,
                });
                outcome.added += 1;
            }
        }

        if outcome.changed() {
            self.mark_dirty();
        }
        Ok(outcome)
    }

    /// Flips `completed`. Returns the new value, or `None` when the item is absent.
    pub fn toggle_item(&mut self, list_id: &str, item_id: &str) -> Result<Option<bool>, GroceryError> {
        let list = self
            .list_mut(list_id)
            .ok_or_else(|| GroceryError::ListNotFound(list_id.to_string()))?;
        let Some(item) = list.items.iter_mut().find(|item| item.id == item_id) else {
            return Ok(None);
        };
        item.completed = !item.completed;
        let completed = item.completed;
        self.mark_dirty();
        Ok(Some(completed))
    }

    pub fn delete_item(&mut self, list_id: &str, item_id: &str) -> Result<GroceryItem, GroceryError> {
        let list = self
            .list_mut(list_id)
            .ok_or_else(|| GroceryError::ListNotFound(list_id.to_string()))?;
        let index = list
            .items
            .iter()
            .position(|item| item.id == item_id)
            .ok_or_else(|| GroceryError::ItemNotFound(item_id.to_string()))?;
        let removed = list.items.remove(index);
        self.mark_dirty();
        Ok(removed)
    }

    /// Sets quantity and unit together. No merge with same-named items is attempted.
    pub fn update_item_quantity(
        &mut self,
        list_id: &str,
        item_id: &str,
        quantity: f64,
        unit: Unit,
    ) -> Result<(), GroceryError> {
        let list = self
            .list_mut(list_id)
            .ok_or_else(|| GroceryError::ListNotFound(list_id.to_string()))?;
        if !valid_quantity(quantity) {
            return Err(GroceryError::InvalidQuantity(quantity));
        }
        let item = list
            .items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or_else(|| GroceryError::ItemNotFound(item_id.to_string()))?;
        item.quantity = quantity;
        item.unit = unit;
        self.mark_dirty();
        Ok(())
    }

    pub fn clear_list(&mut self, list_id: &str) -> Result<ClearOutcome, GroceryError> {
        let list = self
            .list_mut(list_id)
            .ok_or_else(|| GroceryError::ListNotFound(list_id.to_string()))?;
        if list.items.is_empty() {
            return Ok(ClearOutcome::AlreadyEmpty);
        }
        let removed = list.items.len();
        list.items.clear();
        self.mark_dirty();
        Ok(ClearOutcome::Cleared { removed })
    }
}
