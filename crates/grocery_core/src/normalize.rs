//! Ingredient normalization for externally parsed recipe data.
//!
//! Entries are keyed by (name, unit). Units are never converted, so
//! "flour"/"cup" and "flour"/"g" remain separate rows.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Quantity exactly as a parser produced it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawQuantity {
    Number(f64),
    Text(String),
    Other(Unparsed),
}

/// Any JSON value that is neither a number nor a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unparsed;

impl<'de> Deserialize<'de> for Unparsed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde::de::IgnoredAny::deserialize(deserializer).map(|_| Unparsed)
    }
}

impl RawQuantity {
    /// Positive numeric value, if any.
    pub fn value(&self) -> Option<f64> {
        let value = match self {
            RawQuantity::Number(n) => *n,
            RawQuantity::Text(text) => parse_amount(text)?,
            RawQuantity::Other(_) => return None,
        };
        (value.is_finite() && value > 0.0).then_some(value)
    }
}

impl From<f64> for RawQuantity {
    fn from(value: f64) -> Self {
        RawQuantity::Number(value)
    }
}

impl From<&str> for RawQuantity {
    fn from(value: &str) -> Self {
        RawQuantity::Text(value.to_string())
    }
}

/// Unvalidated ingredient from a parse collaborator.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RawIngredient {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: Option<RawQuantity>,
    #[serde(default)]
    pub unit: Option<String>,
}

impl RawIngredient {
    pub fn new(
        name: impl Into<String>,
        quantity: impl Into<RawQuantity>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            quantity: Some(quantity.into()),
            unit: Some(unit.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

pub const DEFAULT_UNIT: &str = "piece";

/// Lowercases and trims names and units, defaults quantity to 1 and unit to
/// "piece", then sums quantities per (name, unit) in order of first appearance.
/// Entries with an empty name are dropped.
pub fn normalize_ingredients(raw: &[RawIngredient]) -> Vec<Ingredient> {
    let mut merged: Vec<Ingredient> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for entry in raw {
        let name = entry.name.trim().to_lowercase();
        if name.is_empty() {
            continue;
        }
        let quantity = entry
            .quantity
            .as_ref()
            .and_then(RawQuantity::value)
            .unwrap_or(1.0);
        let unit = entry
            .unit
            .as_deref()
            .map(|unit| unit.trim().to_lowercase())
            .filter(|unit| !unit.is_empty())
            .unwrap_or_else(|| DEFAULT_UNIT.to_string());

        match index.get(&(name.clone(), unit.clone())) {
            Some(&slot) => merged[slot].quantity += quantity,
            None => {
                index.insert((name.clone(), unit.clone()), merged.len());
                merged.push(Ingredient {
                    name,
                    quantity,
                    unit,
                });
            }
        }
    }

    merged
}

/// Parses "2", "0.5", "1/2", "1 1/2" and the common unicode vulgar fractions.
pub fn parse_amount(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(value) = text.parse::<f64>() {
        return Some(value);
    }

    let mut total = 0.0;
    for part in text.split_whitespace() {
        total += parse_amount_part(part)?;
    }
    Some(total)
}

fn parse_amount_part(part: &str) -> Option<f64> {
    if let Ok(value) = part.parse::<f64>() {
        return Some(value);
    }
    if let Some((num, den)) = part.split_once('/') {
        let num: f64 = num.parse().ok()?;
        let den: f64 = den.parse().ok()?;
        return (den != 0.0).then(|| num / den);
    }
    // "1½" style: whole number followed by a vulgar fraction.
    let mut chars = part.chars();
    let last = chars.next_back()?;
    let fraction = vulgar_fraction(last)?;
    let whole = chars.as_str();
    if whole.is_empty() {
        Some(fraction)
    } else {
        whole.parse::<f64>().ok().map(|w| w + fraction)
    }
}

fn vulgar_fraction(c: char) -> Option<f64> {
    let value = match c {
        '¼' => 0.25,
        '½' => 0.5,
        '¾' => 0.75,
        '⅓' => 1.0 / 3.0,
        '⅔' => 2.0 / 3.0,
        '⅛' => 0.125,
        _ => return None,
    };
    Some(value)
}
