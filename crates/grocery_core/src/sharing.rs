//! Share identifiers. Holding an identifier grants read access; there is no
//! authorization model behind it.

use crate::error::GroceryError;
use crate::model::{new_id, GroceryList, ShareId};
use crate::state::GroceryState;

impl GroceryState {
    /// Marks a list shared and returns its identifier. Already shared lists
    /// keep the identifier they have.
    pub fn share_list(&mut self, list_id: &str) -> Result<ShareId, GroceryError> {
        let list = self
            .list_mut(list_id)
            .ok_or_else(|| GroceryError::ListNotFound(list_id.to_string()))?;
        if let Some(existing) = list.share_id.as_ref() {
            return Ok(existing.clone());
        }
        let share_id = new_id();
        list.is_shared = true;
        list.share_id = Some(share_id.clone());
        self.mark_dirty();
        Ok(share_id)
    }

    /// Revokes sharing. Returns `Ok(false)` when the list was not shared.
    pub fn unshare_list(&mut self, list_id: &str) -> Result<bool, GroceryError> {
        let list = self
            .list_mut(list_id)
            .ok_or_else(|| GroceryError::ListNotFound(list_id.to_string()))?;
        if !list.is_shared {
            return Ok(false);
        }
        list.is_shared = false;
        list.share_id = None;
        self.mark_dirty();
        Ok(true)
    }

    pub fn shared_list(&self, share_id: &str) -> Option<&GroceryList> {
        self.lists
            .iter()
            .find(|list| list.share_id.as_deref() == Some(share_id))
    }
}
