use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

pub type ListId = String;
pub type ItemId = String;
pub type ShareId = String;

/// Units an item quantity can be expressed in. Units are never converted.
///
/// Serializes as the lowercase short name. Deserialization goes through
/// [`Unit::parse_or_piece`] so stored spellings like `"L"` or `"cloves"` load
/// instead of failing the whole collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Piece,
    Kg,
    G,
    Lb,
    Oz,
    L,
    Ml,
    Cup,
    Tbsp,
    Tsp,
    Dozen,
}

impl Unit {
    pub const ALL: [Unit; 11] = [
        Unit::Piece,
        Unit::Kg,
        Unit::G,
        Unit::Lb,
        Unit::Oz,
        Unit::L,
        Unit::Ml,
        Unit::Cup,
        Unit::Tbsp,
        Unit::Tsp,
        Unit::Dozen,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Piece => "piece",
            Unit::Kg => "kg",
            Unit::G => "g",
            Unit::Lb => "lb",
            Unit::Oz => "oz",
            Unit::L => "l",
            Unit::Ml => "ml",
            Unit::Cup => "cup",
            Unit::Tbsp => "tbsp",
            Unit::Tsp => "tsp",
            Unit::Dozen => "dozen",
        }
    }

    /// Parses a unit name, falling back to [`Unit::Piece`] for anything unknown.
    pub fn parse_or_piece(raw: &str) -> Unit {
        match raw.parse() {
            Ok(unit) => unit,
            Err(UnknownUnit(name)) => {
                grocery_logging::grocery_warn!("Unknown unit {:?}, using piece", name);
                Unit::Piece
            }
        }
    }
}

impl<'de> Deserialize<'de> for Unit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map_or(Unit::Piece, Unit::parse_or_piece))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown unit {0:?}")]
pub struct UnknownUnit(pub String);

impl FromStr for Unit {
    type Err = UnknownUnit;

    /// Case-insensitive; accepts plural and spelled-out forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        let unit = match key.trim_end_matches('.') {
            "" | "piece" | "pieces" | "pc" | "pcs" | "each" => Unit::Piece,
            "kg" | "kgs" | "kilo" | "kilos" | "kilogram" | "kilograms" => Unit::Kg,
            "g" | "gr" | "gram" | "grams" => Unit::G,
            "lb" | "lbs" | "pound" | "pounds" => Unit::Lb,
            "oz" | "ounce" | "ounces" => Unit::Oz,
            "l" | "liter" | "liters" | "litre" | "litres" => Unit::L,
            "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => Unit::Ml,
            "cup" | "cups" => Unit::Cup,
            "tbsp" | "tbs" | "tablespoon" | "tablespoons" => Unit::Tbsp,
            "tsp" | "teaspoon" | "teaspoons" => Unit::Tsp,
            "dozen" | "dozens" | "doz" => Unit::Dozen,
            _ => return Err(UnknownUnit(key)),
        };
        Ok(unit)
    }
}

fn default_quantity() -> f64 {
    1.0
}

/// A single entry on a grocery list.
///
/// `quantity` and `unit` default on load so items written by the older
/// quantity-less layout still deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryItem {
    pub id: ItemId,
    pub name: String,
    pub completed: bool,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    #[serde(default)]
    pub unit: Unit,
}

impl GroceryItem {
    /// True when `name`/`unit` identify the same logical item.
    pub fn matches(&self, name: &str, unit: Unit) -> bool {
        self.unit == unit && self.name.trim().to_lowercase() == name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryList {
    pub id: ListId,
    pub name: String,
    #[serde(default)]
    pub items: Vec<GroceryItem>,
    #[serde(default)]
    pub is_shared: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_id: Option<ShareId>,
    pub created_at: i64,
}

impl GroceryList {
    pub const DEFAULT_NAME: &'static str = "My Grocery List";

    pub fn new(name: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            items: Vec::new(),
            is_shared: false,
            share_id: None,
            created_at,
        }
    }

    /// The list materialized when storage holds nothing usable.
    pub fn default_list() -> Self {
        Self::new(Self::DEFAULT_NAME, now_millis())
    }

    pub fn item(&self, item_id: &str) -> Option<&GroceryItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|item| item.completed).count()
    }
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
