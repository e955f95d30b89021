//! Parse collaborators: turn recipe content into raw ingredients.

use std::time::Duration;

use grocery_core::{parse_amount, RawIngredient, RawQuantity, Unit};
use grocery_logging::grocery_debug;
use scraper::{Html, Selector};
use serde::Deserialize;

use crate::{CollaboratorError, FailureKind};

#[async_trait::async_trait]
pub trait IngredientParser: Send + Sync {
    async fn parse(&self, content: &str) -> Result<Vec<RawIngredient>, CollaboratorError>;
}

#[derive(Debug, Clone)]
pub struct ParseSettings {
    pub request_timeout: Duration,
    /// Send markdown instead of HTML to keep payloads small.
    pub convert_to_markdown: bool,
}

impl Default for ParseSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(60),
            convert_to_markdown: true,
        }
    }
}

/// Client for a remote parse service.
///
/// Request: `{"content": "..."}`. Response: `{"ingredients": [...]}` or
/// `{"error": "..."}`, optionally wrapped in a markdown code fence.
#[derive(Debug, Clone)]
pub struct ParseServiceClient {
    endpoint: String,
    settings: ParseSettings,
}

impl ParseServiceClient {
    pub fn new(endpoint: impl Into<String>, settings: ParseSettings) -> Self {
        Self {
            endpoint: endpoint.into(),
            settings,
        }
    }
}

#[async_trait::async_trait]
impl IngredientParser for ParseServiceClient {
    async fn parse(&self, content: &str) -> Result<Vec<RawIngredient>, CollaboratorError> {
        let client = reqwest::Client::builder()
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| CollaboratorError::new(FailureKind::Network, err.to_string()))?;
        let body = if self.settings.convert_to_markdown {
            html2md::parse_html(content)
        } else {
            content.to_string()
        };

        let response = client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "content": body }))
            .send()
            .await
            .map_err(|err| {
                let kind = if err.is_timeout() {
                    FailureKind::Timeout
                } else {
                    FailureKind::Network
                };
                CollaboratorError::new(kind, err.to_string())
            })?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| CollaboratorError::new(FailureKind::Network, err.to_string()))?;

        if !status.is_success() {
            let message = service_error(&text).unwrap_or_else(|| status.to_string());
            return Err(CollaboratorError::new(
                FailureKind::HttpStatus(status.as_u16()),
                message,
            ));
        }
        parse_service_body(&text)
    }
}

#[derive(Debug, Deserialize)]
struct ServiceResponse {
    #[serde(default)]
    ingredients: Option<Vec<RawIngredient>>,
    #[serde(default)]
    error: Option<String>,
}

fn service_error(text: &str) -> Option<String> {
    serde_json::from_str::<ServiceResponse>(strip_code_fence(text))
        .ok()
        .and_then(|response| response.error)
}

/// Decodes a parse service body. A bare JSON array is accepted as well.
pub fn parse_service_body(text: &str) -> Result<Vec<RawIngredient>, CollaboratorError> {
    let json = strip_code_fence(text);
    if let Ok(response) = serde_json::from_str::<ServiceResponse>(json) {
        if let Some(error) = response.error {
            return Err(CollaboratorError::new(FailureKind::Service, error));
        }
        if let Some(ingredients) = response.ingredients {
            return Ok(ingredients);
        }
    }
    serde_json::from_str::<Vec<RawIngredient>>(json).map_err(|_| {
        CollaboratorError::new(
            FailureKind::BadResponse,
            "Invalid ingredients data returned from parser",
        )
    })
}

/// Returns the body of a markdown code fence, or the trimmed input.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed;
    };
    let after = &trimmed[start + 3..];
    let after = after.strip_prefix("json").unwrap_or(after);
    match after.find("```") {
        Some(end) => after[..end].trim(),
        None => trimmed,
    }
}

/// Heuristic parser: reads `<li>` entries from ingredient sections.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleBasedParser;

#[async_trait::async_trait]
impl IngredientParser for RuleBasedParser {
    async fn parse(&self, content: &str) -> Result<Vec<RawIngredient>, CollaboratorError> {
        let lines = ingredient_lines(content);
        grocery_debug!("Rule-based parser found {} candidate lines", lines.len());
        Ok(lines
            .iter()
            .filter_map(|line| parse_ingredient_line(line))
            .collect())
    }
}

const INGREDIENT_ITEMS: &str =
    "[class*=ingredient] li, [id*=ingredient] li, li[class*=ingredient]";

fn ingredient_lines(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let collect = |selector: &str| -> Vec<String> {
        let Ok(sel) = Selector::parse(selector) else {
            return Vec::new();
        };
        doc.select(&sel)
            .map(|el| {
                el.text()
                    .flat_map(str::split_whitespace)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .filter(|line| !line.is_empty())
            .collect()
    };

    let lines = collect(INGREDIENT_ITEMS);
    if lines.is_empty() {
        collect("li")
    } else {
        lines
    }
}

/// Splits a line such as "1 1/2 cups of flour, sifted" into quantity, unit
/// and name. Parenthesized notes and anything after the first comma are
/// dropped. Returns `None` when no name remains.
pub fn parse_ingredient_line(line: &str) -> Option<RawIngredient> {
    let without_notes = strip_parenthesized(line);
    let head = without_notes.split(',').next().unwrap_or_default();
    let tokens: Vec<&str> = head.split_whitespace().collect();

    let mut rest = &tokens[..];
    let mut quantity: Option<f64> = None;
    while let Some((first, tail)) = rest.split_first() {
        match parse_amount(first) {
            Some(amount) => {
                quantity = Some(quantity.unwrap_or(0.0) + amount);
                rest = tail;
            }
            None => break,
        }
    }

    let mut unit = None;
    if let [first, tail @ ..] = rest {
        if !tail.is_empty() {
            if let Ok(parsed) = first.parse::<Unit>() {
                unit = Some(parsed.as_str().to_string());
                rest = tail;
            }
        }
    }
    if unit.is_some() {
        if let [first, tail @ ..] = rest {
            if first.eq_ignore_ascii_case("of") && !tail.is_empty() {
                rest = tail;
            }
        }
    }

    let name = rest.join(" ");
    if name.is_empty() {
        return None;
    }
    Some(RawIngredient {
        name,
        quantity: quantity.map(RawQuantity::Number),
        unit,
    })
}

fn strip_parenthesized(line: &str) -> String {
    let mut depth = 0usize;
    line.chars()
        .filter(|c| match c {
            '(' => {
                depth += 1;
                false
            }
            ')' => {
                depth = depth.saturating_sub(1);
                false
            }
            _ => depth == 0,
        })
        .collect()
}
