use std::fs;
use std::sync::Once;

use grocery_core::{GroceryList, Unit};
use grocery_engine::{
    load_lists, save_lists, JsonFileStore, ListStore, MemoryStore, StorageError,
    LEGACY_ITEMS_FILENAME, LISTS_FILENAME,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(grocery_logging::initialize_for_tests);
}

#[test]
fn missing_file_yields_default_list_and_persists_it() {
    init_logging();
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path());

    let outcome = load_lists(&store);

    assert_eq!(outcome.lists.len(), 1);
    assert_eq!(outcome.lists[0].name, GroceryList::DEFAULT_NAME);
    assert!(outcome.lists[0].items.is_empty());
    assert!(outcome.recovered.is_none());
    assert!(dir.path().join(LISTS_FILENAME).exists());
}

#[test]
fn saved_lists_load_back_unchanged() {
    init_logging();
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().join("nested"));
    let mut weekly = GroceryList::new("Weekly", 10);
    weekly.items.push(grocery_core::GroceryItem {
        id: "item-1".into(),
        name: "Flour".into(),
        completed: true,
        quantity: 2.5,
        unit: Unit::Kg,
    });
    let party = GroceryList::new("Party", 20);

    save_lists(&store, &[weekly.clone(), party.clone()]).expect("save");
    let outcome = load_lists(&store);

    assert_eq!(outcome.lists, vec![weekly, party]);
    assert!(outcome.recovered.is_none());
}

#[test]
fn malformed_file_is_replaced_by_default_list() {
    init_logging();
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join(LISTS_FILENAME), "{not json").expect("write");
    let store = JsonFileStore::new(dir.path());

    let outcome = load_lists(&store);

    assert_eq!(outcome.lists.len(), 1);
    assert_eq!(outcome.lists[0].name, GroceryList::DEFAULT_NAME);
    assert!(matches!(outcome.recovered, Some(StorageError::Malformed(_))));

    let rewritten = fs::read_to_string(store.path()).expect("read back");
    let lists: Vec<GroceryList> = serde_json::from_str(&rewritten).expect("valid json");
    assert_eq!(lists, outcome.lists);
}

#[test]
fn non_array_json_counts_as_malformed() {
    init_logging();
    let store = MemoryStore::with_contents(r#"{"lists": []}"#);

    let outcome = load_lists(&store);

    assert_eq!(outcome.lists.len(), 1);
    assert!(matches!(outcome.recovered, Some(StorageError::Malformed(_))));
}

#[test]
fn empty_array_gets_a_default_list_without_recovery_notice() {
    init_logging();
    let store = MemoryStore::with_contents("[]");

    let outcome = load_lists(&store);

    assert_eq!(outcome.lists.len(), 1);
    assert!(outcome.recovered.is_none());
    assert_eq!(store.write_count(), 1);
}

#[test]
fn stored_lists_are_not_rewritten_on_load() {
    init_logging();
    let json = serde_json::to_string(&[GroceryList::new("Weekly", 1)]).expect("serialize");
    let store = MemoryStore::with_contents(json);

    let outcome = load_lists(&store);

    assert_eq!(outcome.lists[0].name, "Weekly");
    assert_eq!(store.write_count(), 0);
}

#[test]
fn legacy_items_are_migrated_into_the_default_list() {
    init_logging();
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join(LEGACY_ITEMS_FILENAME),
        r#"[{"id":"a","name":"Milk","completed":false},{"id":"b","name":"Rice","completed":true,"quantity":2,"unit":"kg"}]"#,
    )
    .expect("write legacy");
    let store = JsonFileStore::new(dir.path());

    let outcome = load_lists(&store);

    let list = &outcome.lists[0];
    assert_eq!(list.name, GroceryList::DEFAULT_NAME);
    assert_eq!(list.items.len(), 2);
    assert_eq!(list.items[0].quantity, 1.0);
    assert_eq!(list.items[0].unit, Unit::Piece);
    assert_eq!(list.items[1].unit, Unit::Kg);
    assert!(store.read().expect("read").is_some());
}

#[test]
fn malformed_legacy_items_are_ignored() {
    init_logging();
    let store = MemoryStore::with_legacy("oops");

    let outcome = load_lists(&store);

    assert_eq!(outcome.lists.len(), 1);
    assert!(outcome.lists[0].items.is_empty());
    assert!(outcome.recovered.is_none());
}

#[test]
fn unreadable_store_recovers_with_default_list() {
    init_logging();
    let store = MemoryStore::new();
    store.set_fail_reads(true);

    let outcome = load_lists(&store);

    assert_eq!(outcome.lists.len(), 1);
    assert!(matches!(
        outcome.recovered,
        Some(StorageError::Unavailable(_))
    ));
}

#[test]
fn refused_writes_surface_as_errors() {
    init_logging();
    let store = MemoryStore::new();
    store.set_fail_writes(true);

    let err = save_lists(&store, &[GroceryList::new("Weekly", 1)]).expect_err("write refused");

    assert!(matches!(err, StorageError::Unavailable(_)));
    assert!(store.contents().is_none());
}

#[test]
fn writer_rejects_a_file_in_place_of_the_directory() {
    init_logging();
    let dir = tempfile::tempdir().expect("tempdir");
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "x").expect("write");
    let store = JsonFileStore::new(&blocker);

    let err = save_lists(&store, &[]).expect_err("not a directory");

    assert!(matches!(err, StorageError::OutputDir(_)));
}

#[test]
fn stored_unit_spellings_outside_the_enum_keep_the_collection() {
    init_logging();
    let json = r#"[
        {"id":"a","name":"Weekly","items":[{"id":"i1","name":"milk","completed":false,"quantity":1,"unit":"L"}],"isShared":false,"createdAt":1},
        {"id":"b","name":"Curry","items":[{"id":"i2","name":"garlic","completed":true,"quantity":3,"unit":"cloves"},{"id":"i3","name":"rice","completed":false,"quantity":2,"unit":null}],"isShared":false,"createdAt":2}
    ]"#;
    let store = MemoryStore::with_contents(json);

    let outcome = load_lists(&store);

    assert!(outcome.recovered.is_none());
    assert_eq!(
        outcome
            .lists
            .iter()
            .map(|list| list.name.as_str())
            .collect::<Vec<_>>(),
        vec!["Weekly", "Curry"]
    );
    assert_eq!(outcome.lists[0].items[0].unit, Unit::L);
    assert_eq!(outcome.lists[1].items[0].unit, Unit::Piece);
    assert_eq!(outcome.lists[1].items[0].quantity, 3.0);
    assert_eq!(outcome.lists[1].items[1].unit, Unit::Piece);
    assert_eq!(store.write_count(), 0);
}
