//! Grocery core: pure list state, validation and ingredient normalization.
mod effect;
mod error;
mod ledger;
mod model;
mod msg;
mod normalize;
mod registry;
mod sharing;
mod state;
mod update;
mod validation;
mod view_model;

pub use effect::{Effect, Notice};
pub use error::{GroceryError, NameError};
pub use ledger::{AddOutcome, BatchOutcome, ClearOutcome};
pub use model::{
    now_millis, GroceryItem, GroceryList, ItemId, ListId, ShareId, Unit, UnknownUnit,
};
pub use msg::Msg;
pub use normalize::{
    normalize_ingredients, parse_amount, Ingredient, RawIngredient, RawQuantity, Unparsed,
    DEFAULT_UNIT,
};
pub use state::GroceryState;
pub use update::update;
pub use validation::{
    validate_item_name, validate_list_name, MAX_LISTS, MAX_LIST_NAME_LEN, MIN_ITEM_NAME_LEN,
    MIN_LIST_NAME_LEN,
};
pub use view_model::{GroceryViewModel, ListSummary};
