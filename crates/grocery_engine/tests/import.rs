use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use grocery_core::{Ingredient, RawIngredient};
use grocery_engine::{
    CollaboratorError, FailureKind, ImportError, IngredientParser, RecipeImporter, RetrySettings,
    RetryingScraper, ScrapedPage, Scraper,
};
use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(grocery_logging::initialize_for_tests);
}

fn page(html: &str) -> ScrapedPage {
    ScrapedPage {
        html: html.to_string(),
        title: None,
        url: "https://recipes.example/soup".into(),
    }
}

/// Fails with `failure` for the first `failures` calls, then succeeds.
struct FlakyScraper {
    failures: usize,
    failure: CollaboratorError,
    calls: AtomicUsize,
}

impl FlakyScraper {
    fn new(failures: usize, failure: CollaboratorError) -> Self {
        Self {
            failures,
            failure,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl Scraper for FlakyScraper {
    async fn scrape(&self, _url: &str) -> Result<ScrapedPage, CollaboratorError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            Err(self.failure.clone())
        } else {
            Ok(page("<li>1 onion</li>"))
        }
    }
}

/// Never finishes; used to exercise cancellation.
struct StalledScraper;

#[async_trait::async_trait]
impl Scraper for StalledScraper {
    async fn scrape(&self, _url: &str) -> Result<ScrapedPage, CollaboratorError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(page("late"))
    }
}

struct StaticParser(Result<Vec<RawIngredient>, CollaboratorError>);

#[async_trait::async_trait]
impl IngredientParser for StaticParser {
    async fn parse(&self, _content: &str) -> Result<Vec<RawIngredient>, CollaboratorError> {
        self.0.clone()
    }
}

fn onion() -> Vec<RawIngredient> {
    vec![RawIngredient::new(" Onion ", "2", "Piece")]
}

fn no_delay(attempts: u32) -> RetrySettings {
    RetrySettings {
        attempts,
        delay: Duration::ZERO,
    }
}

#[tokio::test]
async fn successful_pipeline_returns_normalized_ingredients() {
    init_logging();
    let importer = RecipeImporter::new(
        Arc::new(FlakyScraper::new(0, CollaboratorError::new(FailureKind::Network, ""))),
        Arc::new(StaticParser(Ok(onion()))),
    );

    let ingredients = importer
        .import("https://recipes.example/soup", &CancellationToken::new())
        .await
        .expect("import");

    assert_eq!(
        ingredients,
        vec![Ingredient {
            name: "onion".into(),
            quantity: 2.0,
            unit: "piece".into(),
        }]
    );
}

#[tokio::test]
async fn scrape_errors_keep_their_message() {
    init_logging();
    let importer = RecipeImporter::new(
        Arc::new(FlakyScraper::new(
            1,
            CollaboratorError::new(FailureKind::EmptyContent, "No content found on the specified URL"),
        )),
        Arc::new(StaticParser(Ok(onion()))),
    );

    let err = importer
        .import("https://recipes.example/soup", &CancellationToken::new())
        .await
        .expect_err("scrape fails");

    assert_eq!(
        err,
        ImportError::ScrapeFailed("No content found on the specified URL".into())
    );
}

#[tokio::test]
async fn parse_errors_without_message_use_the_fallback() {
    init_logging();
    let importer = RecipeImporter::new(
        Arc::new(FlakyScraper::new(0, CollaboratorError::new(FailureKind::Network, ""))),
        Arc::new(StaticParser(Err(CollaboratorError::new(FailureKind::Service, "  ")))),
    );

    let err = importer
        .import("https://recipes.example/soup", &CancellationToken::new())
        .await
        .expect_err("parse fails");

    assert_eq!(err, ImportError::ParseFailed("Failed to parse recipe".into()));
}

#[tokio::test]
async fn empty_parse_result_means_no_ingredients() {
    init_logging();
    let importer = RecipeImporter::new(
        Arc::new(FlakyScraper::new(0, CollaboratorError::new(FailureKind::Network, ""))),
        Arc::new(StaticParser(Ok(vec![RawIngredient::new("   ", 1.0, "kg")]))),
    );

    let err = importer
        .import("https://recipes.example/soup", &CancellationToken::new())
        .await
        .expect_err("nothing usable");

    assert_eq!(err, ImportError::NoIngredientsFound);
}

#[tokio::test]
async fn cancellation_aborts_a_stalled_scrape() {
    init_logging();
    let importer = RecipeImporter::new(
        Arc::new(StalledScraper),
        Arc::new(StaticParser(Ok(onion()))),
    );
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let err = tokio::time::timeout(
        Duration::from_secs(5),
        importer.import("https://recipes.example/soup", &cancel),
    )
    .await
    .expect("cancelled promptly")
    .expect_err("cancelled");

    assert_eq!(err, ImportError::Cancelled);
}

#[tokio::test]
async fn retrying_scraper_recovers_from_transient_failures() {
    init_logging();
    let flaky = Arc::new(FlakyScraper::new(
        2,
        CollaboratorError::new(FailureKind::HttpStatus(503), "503 Service Unavailable"),
    ));
    let scraper = RetryingScraper::new(SharedScraper(flaky.clone()), no_delay(3));

    let scraped = scraper
        .scrape("https://recipes.example/soup")
        .await
        .expect("third attempt succeeds");

    assert_eq!(scraped.html, "<li>1 onion</li>");
    assert_eq!(flaky.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn retrying_scraper_gives_up_after_the_last_attempt() {
    init_logging();
    let flaky = Arc::new(FlakyScraper::new(
        5,
        CollaboratorError::new(FailureKind::Timeout, "timed out"),
    ));
    let scraper = RetryingScraper::new(SharedScraper(flaky.clone()), no_delay(3));

    let err = scraper
        .scrape("https://recipes.example/soup")
        .await
        .expect_err("still failing");

    assert_eq!(err.kind, FailureKind::Timeout);
    assert_eq!(flaky.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn permanent_failures_are_not_retried() {
    init_logging();
    let flaky = Arc::new(FlakyScraper::new(
        5,
        CollaboratorError::new(FailureKind::HttpStatus(404), "404 Not Found"),
    ));
    let scraper = RetryingScraper::new(SharedScraper(flaky.clone()), no_delay(3));

    let err = scraper
        .scrape("https://recipes.example/soup")
        .await
        .expect_err("not found");

    assert_eq!(err.kind, FailureKind::HttpStatus(404));
    assert_eq!(flaky.calls.load(Ordering::SeqCst), 1);
}

struct SharedScraper(Arc<FlakyScraper>);

#[async_trait::async_trait]
impl Scraper for SharedScraper {
    async fn scrape(&self, url: &str) -> Result<ScrapedPage, CollaboratorError> {
        self.0.scrape(url).await
    }
}
