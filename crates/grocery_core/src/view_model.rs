use crate::model::{GroceryItem, GroceryList, ListId};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroceryViewModel {
    pub lists: Vec<ListSummary>,
    pub active_list_id: Option<ListId>,
    pub active_items: Vec<GroceryItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSummary {
    pub id: ListId,
    pub name: String,
    pub item_count: usize,
    pub completed_count: usize,
    pub is_shared: bool,
}

impl ListSummary {
    pub(crate) fn from_list(list: &GroceryList) -> Self {
        Self {
            id: list.id.clone(),
            name: list.name.clone(),
            item_count: list.items.len(),
            completed_count: list.completed_count(),
            is_shared: list.is_shared,
        }
    }
}
