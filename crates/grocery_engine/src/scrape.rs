//! Scrape collaborators: fetch a recipe page and narrow it to recipe content.

use std::collections::HashSet;
use std::time::Duration;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use futures_util::StreamExt;
use grocery_logging::{grocery_debug, grocery_warn};
use reqwest::header::CONTENT_TYPE;
use scraper::{Html, Selector};

use crate::{CollaboratorError, FailureKind, ScrapedPage};

/// Selector for the page regions that usually hold a recipe.
pub const DEFAULT_CONTENT_SELECTOR: &str = "article, main, .recipe-content, .ingredients";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub allowed_content_types: Vec<String>,
    pub content_selector: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            allowed_content_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
            ],
            content_selector: DEFAULT_CONTENT_SELECTOR.to_string(),
        }
    }
}

#[async_trait::async_trait]
pub trait Scraper: Send + Sync {
    async fn scrape(&self, url: &str) -> Result<ScrapedPage, CollaboratorError>;
}

/// Fetches the page directly over HTTP.
#[derive(Debug, Clone, Default)]
pub struct HttpScraper {
    settings: FetchSettings,
}

impl HttpScraper {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, CollaboratorError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(self.settings.redirect_limit))
            .build()
            .map_err(|err| CollaboratorError::new(FailureKind::Network, err.to_string()))
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ct))
    }

    fn too_large(&self, actual: u64) -> CollaboratorError {
        CollaboratorError::new(
            FailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual: Some(actual),
            },
            "response too large",
        )
    }
}

#[async_trait::async_trait]
impl Scraper for HttpScraper {
    async fn scrape(&self, url: &str) -> Result<ScrapedPage, CollaboratorError> {
        let parsed = url::Url::parse(url)
            .map_err(|err| CollaboratorError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let client = self.build_client()?;

        let response = client.get(parsed).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollaboratorError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(self.too_large(content_len));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        if let Some(ct) = content_type.as_deref() {
            if !self.is_content_type_allowed(ct) {
                return Err(CollaboratorError::new(
                    FailureKind::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    "unsupported content type",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(self.too_large(next_len));
            }
            bytes.extend_from_slice(&chunk);
        }
        grocery_debug!("Fetched {} bytes from {}", bytes.len(), url);

        let html = decode_html(&bytes, content_type.as_deref())?;
        let (title, content) = extract_recipe(&html, &self.settings.content_selector);
        if content.trim().is_empty() {
            return Err(CollaboratorError::new(
                FailureKind::EmptyContent,
                "No content found on the specified URL",
            ));
        }

        Ok(ScrapedPage {
            html: content,
            title,
            url: url.to_string(),
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> CollaboratorError {
    if err.is_timeout() {
        return CollaboratorError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return CollaboratorError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    CollaboratorError::new(FailureKind::Network, err.to_string())
}

/// Decode raw bytes into UTF-8 using: BOM -> Content-Type charset -> chardetng.
fn decode_html(bytes: &[u8], content_type: Option<&str>) -> Result<String, CollaboratorError> {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| {
            content_type
                .and_then(charset_label)
                .and_then(|label| Encoding::for_label(label.as_bytes()))
        })
        .unwrap_or_else(|| {
            let mut detector = EncodingDetector::new();
            detector.feed(bytes, true);
            detector.guess(None, true)
        });

    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(CollaboratorError::new(
            FailureKind::Decode,
            format!("failed to decode page as {}", encoding.name()),
        ));
    }
    Ok(text.into_owned())
}

fn charset_label(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let (key, value) = part.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(&['"', '\''][..]).to_string())
    })
}

/// Pulls the `<title>` and the outer HTML of every outermost element
/// matching `selector`, falling back to `<body>` then the whole document.
pub fn extract_recipe(html: &str, selector: &str) -> (Option<String>, String) {
    let doc = Html::parse_document(html);

    let title = Selector::parse("title")
        .ok()
        .and_then(|sel| {
            doc.select(&sel)
                .next()
                .map(|t| t.text().collect::<String>().trim().to_string())
        })
        .filter(|t| !t.is_empty());

    let content = match Selector::parse(selector) {
        Ok(sel) => {
            let matched: Vec<_> = doc.select(&sel).collect();
            let ids: HashSet<_> = matched.iter().map(|el| el.id()).collect();
            matched
                .iter()
                .filter(|el| !el.ancestors().any(|ancestor| ids.contains(&ancestor.id())))
                .map(|el| el.html())
                .collect::<Vec<_>>()
                .join("\n")
        }
        Err(_) => {
            grocery_warn!("Invalid content selector {:?}, using page body", selector);
            String::new()
        }
    };
    if !content.trim().is_empty() {
        return (title, content);
    }

    let body = Selector::parse("body")
        .ok()
        .and_then(|sel| doc.select(&sel).next().map(|node| node.inner_html()))
        .unwrap_or_else(|| doc.root_element().html());
    (title, body)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrySettings {
    /// Total attempts, the first one included.
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

/// Retries transient failures of the wrapped scraper with a fixed delay.
#[derive(Debug, Clone)]
pub struct RetryingScraper<S> {
    inner: S,
    settings: RetrySettings,
}

impl<S: Scraper> RetryingScraper<S> {
    pub fn new(inner: S, settings: RetrySettings) -> Self {
        Self { inner, settings }
    }
}

#[async_trait::async_trait]
impl<S: Scraper> Scraper for RetryingScraper<S> {
    async fn scrape(&self, url: &str) -> Result<ScrapedPage, CollaboratorError> {
        let mut attempt = 1;
        loop {
            match self.inner.scrape(url).await {
                Ok(page) => return Ok(page),
                Err(err) if err.is_transient() && attempt < self.settings.attempts => {
                    grocery_warn!(
                        "Scrape attempt {}/{} for {} failed: {}",
                        attempt,
                        self.settings.attempts,
                        url,
                        err
                    );
                    tokio::time::sleep(self.settings.delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
