use grocery_core::{normalize_ingredients, Ingredient, RawIngredient};
use pretty_assertions::assert_eq;

fn ingredient(name: &str, quantity: f64, unit: &str) -> Ingredient {
    Ingredient {
        name: name.to_string(),
        quantity,
        unit: unit.to_string(),
    }
}

#[test]
fn merges_same_name_and_unit_across_spellings() {
    let raw = vec![
        RawIngredient::new("Egg ", "2", ""),
        RawIngredient::new("egg", 1.0, "piece"),
    ];
    assert_eq!(normalize_ingredients(&raw), vec![ingredient("egg", 3.0, "piece")]);
}

#[test]
fn units_are_not_converted() {
    let raw = vec![
        RawIngredient::new("Flour", 2.0, "Cup"),
        RawIngredient::new("flour", 100.0, " g "),
        RawIngredient::new("FLOUR", 1.0, "cup"),
    ];
    assert_eq!(
        normalize_ingredients(&raw),
        vec![ingredient("flour", 3.0, "cup"), ingredient("flour", 100.0, "g")]
    );
}

#[test]
fn deserializes_loose_parser_output() {
    let raw: Vec<RawIngredient> = serde_json::from_str(
        r#"[
            {"name": "Sugar", "quantity": "1/2", "unit": "Cup"},
            {"name": "Salt", "quantity": null},
            {"name": "Butter", "quantity": true, "unit": "tbsp"},
            {"name": "  ", "quantity": 3, "unit": "g"},
            {"quantity": 1}
        ]"#,
    )
    .unwrap();

    assert_eq!(
        normalize_ingredients(&raw),
        vec![
            ingredient("sugar", 0.5, "cup"),
            ingredient("salt", 1.0, "piece"),
            ingredient("butter", 1.0, "tbsp"),
        ]
    );
}

#[test]
fn empty_input_yields_empty_output() {
    assert!(normalize_ingredients(&[]).is_empty());
}
