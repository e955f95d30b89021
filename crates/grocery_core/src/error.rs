use crate::model::{ItemId, ListId};

/// Why a list or item name was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("name must be at least {min} characters")]
    TooShort { min: usize },
    #[error("name must be at most {max} characters")]
    TooLong { max: usize },
    #[error("cannot create more than {max} lists")]
    LimitReached { max: usize },
    #[error("a list with this name already exists")]
    DuplicateName,
}

/// Failure of a state transition. State is unchanged whenever one is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GroceryError {
    #[error("invalid list name: {0}")]
    InvalidListName(NameError),
    #[error("invalid item name: {0}")]
    InvalidItemName(NameError),
    #[error("quantity must be greater than 0 (got {0})")]
    InvalidQuantity(f64),
    #[error("list {0} not found")]
    ListNotFound(ListId),
    #[error("item {0} not found")]
    ItemNotFound(ItemId),
    #[error("you must have at least one list")]
    LastListProtected,
}

impl GroceryError {
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            GroceryError::InvalidListName(_)
                | GroceryError::InvalidItemName(_)
                | GroceryError::InvalidQuantity(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GroceryError::ListNotFound(_) | GroceryError::ItemNotFound(_)
        )
    }
}
