use crate::model::{ItemId, ListId, Unit};
use crate::normalize::Ingredient;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User asked for a new list.
    CreateList { name: String },
    RenameList { list_id: ListId, name: String },
    DeleteList { list_id: ListId },
    /// User switched the list being edited.
    SelectList { list_id: ListId },
    AddItem {
        list_id: ListId,
        name: String,
        quantity: f64,
        unit: Unit,
    },
    /// A normalized batch, typically the result of a recipe import.
    AddIngredients {
        list_id: ListId,
        ingredients: Vec<Ingredient>,
    },
    ToggleItem { list_id: ListId, item_id: ItemId },
    DeleteItem { list_id: ListId, item_id: ItemId },
    UpdateItemQuantity {
        list_id: ListId,
        item_id: ItemId,
        quantity: f64,
        unit: Unit,
    },
    ClearList { list_id: ListId },
    ShareList { list_id: ListId },
    UnshareList { list_id: ListId },
    /// User submitted a recipe URL to import into a list.
    ImportRecipeRequested { list_id: ListId, url: String },
}
