//! Stateless request builder and response parser for the `volumes` search.
//!
//! # Design
//! `BooksClient` holds only a `base_url` and carries no mutable state
//! between calls. A search is split into `build_search`, which produces an
//! `HttpRequest`, and `parse_search`, which consumes an `HttpResponse`. The
//! round-trip in between belongs to a `Transport`, keeping this half of the
//! pipeline deterministic.

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::parse::parse_volumes;
use crate::query::{SearchOptions, SearchQuery};
use crate::types::BookRecord;

/// Public Books API host.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com";

const VOLUMES_PATH: &str = "/books/v1/volumes";

#[derive(Debug, Clone)]
pub struct BooksClient {
    base_url: String,
}

impl Default for BooksClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl BooksClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The full search URL for `query` with `options` appended.
    pub fn search_url(&self, query: &SearchQuery, options: &SearchOptions) -> String {
        format!(
            "{}{VOLUMES_PATH}?q={}&maxResults={}&orderBy={}",
            self.base_url,
            query.to_query_param(),
            options.max_results,
            options.order_by,
        )
    }

    pub fn build_search(
        &self,
        query: &SearchQuery,
        options: &SearchOptions,
    ) -> Result<HttpRequest, ApiError> {
        options.validate()?;
        Ok(HttpRequest {
            url: self.search_url(query, options),
            headers: vec![("accept".to_string(), "application/json".to_string())],
        })
    }

    /// Interpret a search response. Anything but 200 is an `HttpError`.
    pub fn parse_search(&self, response: HttpResponse) -> Result<Vec<BookRecord>, ApiError> {
        parse_volumes(&response.into_body()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::OrderBy;

    fn client() -> BooksClient {
        BooksClient::new("http://localhost:3000")
    }

    #[test]
    fn build_search_produces_correct_request() {
        let query = SearchQuery::new("Dune", None).unwrap();
        let req = client().build_search(&query, &SearchOptions::default()).unwrap();
        assert_eq!(
            req.url,
            "http://localhost:3000/books/v1/volumes?q=+intitle:Dune&maxResults=10&orderBy=relevance"
        );
        assert_eq!(
            req.headers,
            vec![("accept".to_string(), "application/json".to_string())]
        );
    }

    #[test]
    fn build_search_with_author_and_newest() {
        let query = SearchQuery::new("Dune Messiah", Some("Frank Herbert")).unwrap();
        let options = SearchOptions {
            max_results: 40,
            order_by: OrderBy::Newest,
        };
        let req = client().build_search(&query, &options).unwrap();
        assert_eq!(
            req.url,
            "http://localhost:3000/books/v1/volumes?q=+intitle:Dune+Messiah+inauthor:Frank+Herbert&maxResults=40&orderBy=newest"
        );
    }

    #[test]
    fn build_search_rejects_out_of_range_max_results() {
        let query = SearchQuery::new("Dune", None).unwrap();
        let options = SearchOptions {
            max_results: 0,
            ..SearchOptions::default()
        };
        let err = client().build_search(&query, &options).unwrap_err();
        assert!(matches!(err, ApiError::InvalidQuery(_)));
    }

    #[test]
    fn default_client_targets_public_api() {
        let query = SearchQuery::new("Dune", None).unwrap();
        let url = BooksClient::default().search_url(&query, &SearchOptions::default());
        assert!(url.starts_with("https://www.googleapis.com/books/v1/volumes?q=+intitle:Dune"));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = BooksClient::new("http://localhost:3000/");
        assert_eq!(client.base_url(), "http://localhost:3000");
    }

    #[test]
    fn parse_search_success() {
        let response = HttpResponse::ok(
            r#"{"totalItems":1,"items":[{"volumeInfo":{"title":"Dune","authors":["Frank Herbert"]}}]}"#,
        );
        let books = client().parse_search(response).unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Dune");
        assert_eq!(books[0].author, "Frank Herbert");
    }

    #[test]
    fn parse_search_wrong_status() {
        let response = HttpResponse {
            status: 503,
            headers: Vec::new(),
            body: "backend unavailable".to_string(),
        };
        let err = client().parse_search(response).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 503, .. }));
    }

    #[test]
    fn parse_search_bad_json() {
        let err = client().parse_search(HttpResponse::ok("not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn parse_search_empty_body_is_empty_list() {
        let books = client().parse_search(HttpResponse::ok("")).unwrap();
        assert!(books.is_empty());
    }
}
