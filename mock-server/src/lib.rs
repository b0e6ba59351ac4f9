use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use log::info;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

const FIXTURES: &str = include_str!("../fixtures/volumes.json");

pub const DEFAULT_MAX_RESULTS: u32 = 10;
pub const MAX_RESULTS_LIMIT: u32 = 40;

/// Volume items served by the mock, in relevance order.
pub type Catalog = Arc<Vec<Value>>;

#[derive(Debug, Default, Deserialize)]
pub struct VolumesParams {
    pub q: Option<String>,
    #[serde(rename = "maxResults")]
    pub max_results: Option<u32>,
    #[serde(rename = "orderBy")]
    pub order_by: Option<String>,
}

/// `intitle:` / `inauthor:` terms pulled out of `q`.
///
/// Words following a prefixed term belong to it until the next prefix, so
/// `intitle:Dune Messiah` searches the title for both words. Words before
/// any prefix match either field.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SearchTerms {
    pub title: Vec<String>,
    pub author: Vec<String>,
    pub any: Vec<String>,
}

#[derive(Clone, Copy)]
enum Field {
    Any,
    Title,
    Author,
}

impl SearchTerms {
    pub fn parse(q: &str) -> Self {
        let mut terms = SearchTerms::default();
        let mut field = Field::Any;
        for word in q.split_whitespace() {
            let word = if let Some(rest) = word.strip_prefix("intitle:") {
                field = Field::Title;
                rest
            } else if let Some(rest) = word.strip_prefix("inauthor:") {
                field = Field::Author;
                rest
            } else {
                word
            };
            if word.is_empty() {
                continue;
            }
            let word = word.to_lowercase();
            match field {
                Field::Any => terms.any.push(word),
                Field::Title => terms.title.push(word),
                Field::Author => terms.author.push(word),
            }
        }
        terms
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.author.is_empty() && self.any.is_empty()
    }

    pub fn matches(&self, item: &Value) -> bool {
        let info = &item["volumeInfo"];
        let title = info["title"].as_str().unwrap_or_default().to_lowercase();
        let authors = info["authors"]
            .as_array()
            .map(|authors| {
                authors
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(" ")
                    .to_lowercase()
            })
            .unwrap_or_default();

        self.title.iter().all(|t| title.contains(t))
            && self.author.iter().all(|a| authors.contains(a))
            && self
                .any
                .iter()
                .all(|w| title.contains(w) || authors.contains(w))
    }
}

pub fn default_catalog() -> Vec<Value> {
    serde_json::from_str(FIXTURES).expect("bundled fixtures are valid JSON")
}

pub fn app() -> Router {
    app_with_catalog(default_catalog())
}

pub fn app_with_catalog(items: Vec<Value>) -> Router {
    let catalog: Catalog = Arc::new(items);
    Router::new()
        .route("/books/v1/volumes", get(search_volumes))
        .with_state(catalog)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_catalog(listener: TcpListener, items: Vec<Value>) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_catalog(items)).await
}

type ApiFailure = (StatusCode, Json<Value>);

fn bad_request(message: &str) -> ApiFailure {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": {
                "code": 400,
                "message": message,
                "errors": [{ "domain": "global", "reason": "invalid", "message": message }]
            }
        })),
    )
}

async fn search_volumes(
    State(catalog): State<Catalog>,
    Query(params): Query<VolumesParams>,
) -> Result<Json<Value>, ApiFailure> {
    let q = params.q.as_deref().unwrap_or_default();
    let terms = SearchTerms::parse(q);
    if terms.is_empty() {
        return Err(bad_request("Missing query."));
    }

    let max_results = params.max_results.unwrap_or(DEFAULT_MAX_RESULTS);
    if !(1..=MAX_RESULTS_LIMIT).contains(&max_results) {
        return Err(bad_request("Invalid value for maxResults."));
    }

    let newest = match params.order_by.as_deref() {
        None | Some("relevance") => false,
        Some("newest") => true,
        Some(_) => return Err(bad_request("Invalid value for orderBy.")),
    };

    let mut matched: Vec<&Value> = catalog.iter().filter(|item| terms.matches(item)).collect();
    if newest {
        matched.sort_by(|a, b| published(b).cmp(published(a)));
    }
    info!("q={q:?} matched {} of {} volumes", matched.len(), catalog.len());

    let total = matched.len();
    let page: Vec<Value> = matched
        .into_iter()
        .take(max_results as usize)
        .cloned()
        .collect();

    let mut body = json!({ "kind": "books#volumes", "totalItems": total });
    if !page.is_empty() {
        body["items"] = Value::Array(page);
    }
    Ok(Json(body))
}

fn published(item: &Value) -> &str {
    item["volumeInfo"]["publishedDate"].as_str().unwrap_or_default()
}
