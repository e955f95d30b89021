use crate::model::{GroceryList, ListId};
use crate::view_model::{GroceryViewModel, ListSummary};

/// In-memory collection of lists plus the active-list pointer.
///
/// All mutation goes through the registry, ledger and sharing methods.
/// `dirty` is raised by every committed change so hosts know to persist.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroceryState {
    pub(crate) lists: Vec<GroceryList>,
    pub(crate) active_list_id: Option<ListId>,
    dirty: bool,
}

impl GroceryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds state from loaded lists, activating the most recently created one.
    pub fn from_lists(lists: Vec<GroceryList>) -> Self {
        let active_list_id = most_recent(&lists).map(|list| list.id.clone());
        Self {
            lists,
            active_list_id,
            dirty: false,
        }
    }

    pub fn lists(&self) -> &[GroceryList] {
        &self.lists
    }

    pub fn list(&self, list_id: &str) -> Option<&GroceryList> {
        self.lists.iter().find(|list| list.id == list_id)
    }

    pub(crate) fn list_mut(&mut self, list_id: &str) -> Option<&mut GroceryList> {
        self.lists.iter_mut().find(|list| list.id == list_id)
    }

    pub fn active_list_id(&self) -> Option<&str> {
        self.active_list_id.as_deref()
    }

    pub fn active_list(&self) -> Option<&GroceryList> {
        self.active_list_id
            .as_deref()
            .and_then(|id| self.list(id))
    }

    pub fn view(&self) -> GroceryViewModel {
        GroceryViewModel {
            lists: self.lists.iter().map(ListSummary::from_list).collect(),
            active_list_id: self.active_list_id.clone(),
            active_items: self
                .active_list()
                .map(|list| list.items.clone())
                .unwrap_or_default(),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns whether state changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

/// Most recently created list. Ties on `created_at` resolve to the earliest
/// list in collection order.
pub(crate) fn most_recent(lists: &[GroceryList]) -> Option<&GroceryList> {
    lists.iter().fold(None, |best: Option<&GroceryList>, list| match best {
        Some(current) if list.created_at <= current.created_at => Some(current),
        _ => Some(list),
    })
}
