//! List registry: create, rename, delete and select lists.

use crate::error::GroceryError;
use crate::model::{now_millis, GroceryList, ListId};
use crate::state::{most_recent, GroceryState};
use crate::validation::validate_list_name;

impl GroceryState {
    /// Creates an empty list and makes it active.
    pub fn create_list(&mut self, name: &str) -> Result<ListId, GroceryError> {
        self.create_list_at(name, now_millis())
    }

    /// [`GroceryState::create_list`] with an explicit creation timestamp.
    pub fn create_list_at(&mut self, name: &str, created_at: i64) -> Result<ListId, GroceryError> {
        validate_list_name(name, &self.lists).map_err(GroceryError::InvalidListName)?;

        let list = GroceryList::new(name.trim(), created_at);
        let id = list.id.clone();
        grocery_logging::grocery_info!("Created list {} ({:?})", id, list.name);
        self.lists.push(list);
        self.active_list_id = Some(id.clone());
        self.mark_dirty();
        Ok(id)
    }

    /// Renames a list. Returns `Ok(false)` when the trimmed name is unchanged.
    ///
    /// The new name is validated against every list, the renamed one
    /// included, so a case-only change collides with the list's own name.
    pub fn rename_list(&mut self, list_id: &str, new_name: &str) -> Result<bool, GroceryError> {
        let current = self
            .list(list_id)
            .ok_or_else(|| GroceryError::ListNotFound(list_id.to_string()))?;
        let trimmed = new_name.trim();
        if trimmed == current.name {
            return Ok(false);
        }

        validate_list_name(new_name, &self.lists).map_err(GroceryError::InvalidListName)?;

        if let Some(list) = self.list_mut(list_id) {
            list.name = trimmed.to_string();
        }
        self.mark_dirty();
        Ok(true)
    }

    /// Deletes a list and returns it. The last remaining list cannot be deleted.
    pub fn delete_list(&mut self, list_id: &str) -> Result<GroceryList, GroceryError> {
        let index = self
            .lists
            .iter()
            .position(|list| list.id == list_id)
            .ok_or_else(|| GroceryError::ListNotFound(list_id.to_string()))?;
        if self.lists.len() == 1 {
            return Err(GroceryError::LastListProtected);
        }

        let removed = self.lists.remove(index);
        if self.active_list_id.as_deref() == Some(list_id) {
            self.active_list_id = most_recent(&self.lists).map(|list| list.id.clone());
        }
        grocery_logging::grocery_info!("Deleted list {} ({:?})", removed.id, removed.name);
        self.mark_dirty();
        Ok(removed)
    }

    /// Points the active list at `list_id`. Selection is not persisted.
    pub fn select_list(&mut self, list_id: &str) -> Result<(), GroceryError> {
        if self.list(list_id).is_none() {
            return Err(GroceryError::ListNotFound(list_id.to_string()));
        }
        self.active_list_id = Some(list_id.to_string());
        Ok(())
    }
}
