//! Google Books search core: query building, fetching, parsing, and a
//! background loader with last-request-wins delivery.
//!
//! # Overview
//! A search flows through four pieces:
//! - `query` validates form input into a `SearchQuery` plus `SearchOptions`.
//! - `client` turns those into an `HttpRequest` and parses the
//!   `HttpResponse` into `BookRecord`s (host-does-IO; no network here).
//! - `fetch` owns the `Transport` seam and the ureq-backed implementation.
//! - `loader` runs fetch+parse on a worker thread and hands exactly one
//!   result set per request back to the owning thread.
//!
//! # Design
//! - Every failure degrades to an empty result list. The `ApiError` behind
//!   it is logged and kept for tests, classified by `FailureKind`.
//! - `BookRecord` uses zero sentinels for unknown price, rating and page
//!   count; `display` is the one place that turns them into text.
//! - Wire DTOs are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod client;
pub mod display;
pub mod error;
pub mod fetch;
pub mod http;
pub mod loader;
pub mod parse;
pub mod query;
pub mod types;

pub use client::{BooksClient, DEFAULT_BASE_URL};
pub use error::{ApiError, FailureKind};
pub use fetch::{fetch, fetch_books, try_fetch, try_fetch_books, Timeouts, Transport, UreqTransport};
pub use http::{HttpRequest, HttpResponse};
pub use loader::{BookLoader, CancellationToken, LoaderState, RequestId};
pub use parse::parse_volumes;
pub use query::{OrderBy, SearchOptions, SearchQuery, DEFAULT_MAX_RESULTS, MAX_RESULTS_LIMIT};
pub use types::BookRecord;
