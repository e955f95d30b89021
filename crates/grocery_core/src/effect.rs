use std::fmt;

use crate::error::GroceryError;
use crate::model::{ListId, ShareId, Unit};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// The list collection changed and should be written out.
    Persist,
    /// Run the recipe import pipeline and feed the result back as
    /// [`crate::Msg::AddIngredients`].
    FetchRecipe { list_id: ListId, url: String },
    /// Outcome for the user.
    Notify(Notice),
}

/// User-facing outcome of a message. Hosts decide how to present it.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    ListCreated { list_id: ListId, name: String },
    ListRenamed { list_id: ListId, name: String },
    ListDeleted { name: String },
    ItemAdded {
        list_id: ListId,
        name: String,
        quantity: f64,
        unit: Unit,
    },
    ItemUpdated {
        list_id: ListId,
        name: String,
        quantity: f64,
        unit: Unit,
    },
    ItemsImported {
        list_id: ListId,
        added: usize,
        updated: usize,
        skipped: usize,
    },
    ItemRemoved { list_id: ListId, name: String },
    ListCleared { list_id: ListId, removed: usize },
    NothingToClear { list_id: ListId },
    ListShared { list_id: ListId, share_id: ShareId },
    ListUnshared { list_id: ListId },
    Rejected(GroceryError),
    ImportFailed { list_id: ListId, reason: String },
    SaveFailed { reason: String },
    LoadRecovered { reason: String },
}

impl Notice {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Notice::Rejected(_)
                | Notice::ImportFailed { .. }
                | Notice::SaveFailed { .. }
                | Notice::LoadRecovered { .. }
        )
    }
}

fn amount(quantity: f64, unit: Unit) -> String {
    if unit == Unit::Piece && quantity > 1.0 {
        format!("{quantity} pieces")
    } else {
        format!("{quantity} {unit}")
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::ListCreated { name, .. } => write!(f, "{name} has been created"),
            Notice::ListRenamed { name, .. } => write!(f, "List has been renamed to {name}"),
            Notice::ListDeleted { name } => write!(f, "{name} has been deleted"),
            Notice::ItemAdded {
                name,
                quantity,
                unit,
                ..
            } => write!(f, "{} of {name} added", amount(*quantity, *unit)),
            Notice::ItemUpdated {
                name,
                quantity,
                unit,
                ..
            } => write!(f, "Updated {name} to {}", amount(*quantity, *unit)),
            Notice::ItemsImported {
                added,
                updated,
                skipped,
                ..
            } => {
                write!(f, "Imported {added} new and {updated} existing items")?;
                if *skipped > 0 {
                    write!(f, " ({skipped} skipped)")?;
                }
                Ok(())
            }
            Notice::ItemRemoved { name, .. } => write!(f, "{name} has been removed"),
            Notice::ListCleared { .. } => write!(f, "All items have been removed"),
            Notice::NothingToClear { .. } => write!(f, "This list is already empty"),
            Notice::ListShared { .. } => {
                write!(f, "A sharing link has been generated for this list")
            }
            Notice::ListUnshared { .. } => write!(f, "The list is no longer shared"),
            Notice::Rejected(err) => write!(f, "{err}"),
            Notice::ImportFailed { reason, .. } => write!(f, "Recipe import failed: {reason}"),
            Notice::SaveFailed { reason } => write!(
                f,
                "Failed to save your changes ({reason}). They may be lost on reload."
            ),
            Notice::LoadRecovered { reason } => write!(
                f,
                "There was a problem loading your grocery lists ({reason}). Starting fresh."
            ),
        }
    }
}
