use std::sync::Arc;

use grocery_core::{normalize_ingredients, Ingredient};
use grocery_logging::{grocery_info, grocery_warn};
use tokio_util::sync::CancellationToken;

use crate::{IngredientParser, Scraper};

const SCRAPE_FALLBACK: &str = "Failed to scrape recipe";
const PARSE_FALLBACK: &str = "Failed to parse recipe";
const EMPTY_PAGE: &str = "No content found on the specified URL";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    #[error("{0}")]
    ScrapeFailed(String),
    #[error("{0}")]
    ParseFailed(String),
    #[error("No ingredients found in the recipe")]
    NoIngredientsFound,
    #[error("Recipe import was cancelled")]
    Cancelled,
}

/// Scrape, then parse, then normalize. Each stage runs only if the previous
/// one produced something.
#[derive(Clone)]
pub struct RecipeImporter {
    scraper: Arc<dyn Scraper>,
    parser: Arc<dyn IngredientParser>,
}

impl RecipeImporter {
    pub fn new(scraper: Arc<dyn Scraper>, parser: Arc<dyn IngredientParser>) -> Self {
        Self { scraper, parser }
    }

    pub async fn import(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Ingredient>, ImportError> {
        grocery_info!("Importing recipe from {}", url);

        let page = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ImportError::Cancelled),
            result = self.scraper.scrape(url) => result.map_err(|err| {
                grocery_warn!("Scrape failed for {}: {}", url, err);
                ImportError::ScrapeFailed(err.message_or(SCRAPE_FALLBACK).to_string())
            })?,
        };
        if page.html.trim().is_empty() {
            return Err(ImportError::ScrapeFailed(EMPTY_PAGE.to_string()));
        }

        let raw = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ImportError::Cancelled),
            result = self.parser.parse(&page.html) => result.map_err(|err| {
                grocery_warn!("Parse failed for {}: {}", url, err);
                ImportError::ParseFailed(err.message_or(PARSE_FALLBACK).to_string())
            })?,
        };

        let ingredients = normalize_ingredients(&raw);
        if ingredients.is_empty() {
            return Err(ImportError::NoIngredientsFound);
        }
        grocery_info!("Found {} ingredients in {}", ingredients.len(), url);
        Ok(ingredients)
    }
}
