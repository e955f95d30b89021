//! Grocery engine: persistence, recipe import collaborators and the session
//! that executes effects produced by `grocery_core`.
mod config;
mod engine;
mod import;
mod parse;
mod persist;
mod scrape;
mod session;
mod store;
mod types;

pub use config::{ConfigError, EngineConfig};
pub use engine::{ImportEvent, ImportHandle};
pub use import::{ImportError, RecipeImporter};
pub use parse::{
    parse_ingredient_line, parse_service_body, IngredientParser, ParseServiceClient,
    ParseSettings, RuleBasedParser,
};
pub use persist::{ensure_storage_dir, AtomicFileWriter, StorageError};
pub use scrape::{
    extract_recipe, FetchSettings, HttpScraper, RetrySettings, RetryingScraper, Scraper,
    DEFAULT_CONTENT_SELECTOR,
};
pub use session::{Dispatched, FetchRequest, GrocerySession, Mutation};
pub use store::{
    load_lists, save_lists, JsonFileStore, ListStore, LoadOutcome, MemoryStore,
    LEGACY_ITEMS_FILENAME, LISTS_FILENAME,
};
pub use types::{CollaboratorError, FailureKind, ScrapedPage};
