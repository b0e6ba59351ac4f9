//! Response parser: raw `volumes` JSON to an ordered list of `BookRecord`.

use log::{debug, warn};

use crate::error::ApiError;
use crate::types::{AccessInfo, Availability, BookRecord, SaleInfo, Volume, VolumeInfo, VolumesResponse};

/// Parse a search response body into records, preserving source order.
///
/// An empty body and a document without `items` both yield `Ok` with no
/// records; only a body that is not a JSON object is an error. A field with
/// the wrong JSON type falls back to its default like a missing one; an
/// item that is not an object at all is logged and skipped.
pub fn parse_volumes(body: &str) -> Result<Vec<BookRecord>, ApiError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let response: VolumesResponse =
        serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))?;

    let Some(items) = response.items else {
        debug!(
            "response has no items (totalItems={})",
            response.total_items.unwrap_or(0)
        );
        return Ok(Vec::new());
    };

    let mut books = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Volume>(item) {
            Ok(volume) => books.push(BookRecord::from(volume)),
            Err(e) => warn!("skipping malformed item {index}: {e}"),
        }
    }
    Ok(books)
}

impl From<Volume> for BookRecord {
    fn from(volume: Volume) -> Self {
        let mut book = BookRecord::default();
        if let Some(info) = volume.volume_info {
            apply_volume_info(&mut book, info);
        }
        if let Some(sale) = volume.sale_info {
            apply_sale_info(&mut book, sale);
        }
        if let Some(access) = volume.access_info {
            apply_access_info(&mut book, access);
        }
        book
    }
}

fn apply_volume_info(book: &mut BookRecord, info: VolumeInfo) {
    book.title = info.title.unwrap_or_default();
    book.author = join_authors(info.authors.unwrap_or_default());
    book.published_date = info.published_date.unwrap_or_default();
    book.categories = info
        .categories
        .and_then(|c| c.into_iter().next())
        .unwrap_or_default();
    book.language = info.language.unwrap_or_default();
    book.page_count = info
        .page_count
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0);
    book.print_type = info.print_type.unwrap_or_default();
    book.rating = info.average_rating.map(half_step_rating).unwrap_or(0.0);
    book.description = info.description.unwrap_or_default();
    book.thumbnail_link = info
        .image_links
        .and_then(|links| links.small_thumbnail)
        .unwrap_or_default();
    book.preview_link = info.preview_link.unwrap_or_default();
}

fn apply_sale_info(book: &mut BookRecord, sale: SaleInfo) {
    // Currency is only read alongside an amount.
    if let Some(amount) = sale.retail_price.as_ref().and_then(|p| p.amount) {
        book.retail_price = amount.max(0.0);
        book.currency_code = sale
            .retail_price
            .and_then(|p| p.currency_code)
            .unwrap_or_default();
    }
    book.buying_link = sale.buy_link.unwrap_or_default();
}

fn apply_access_info(book: &mut BookRecord, access: AccessInfo) {
    book.epub_available = is_available(access.epub);
    book.pdf_available = is_available(access.pdf);
}

fn is_available(format: Option<Availability>) -> bool {
    format.and_then(|f| f.is_available).unwrap_or(false)
}

/// Nearest half step in 0.5..=5.0. Any positive rating stays rated.
fn half_step_rating(rating: f64) -> f64 {
    if rating.is_nan() || rating <= 0.0 {
        return 0.0;
    }
    ((rating.min(5.0) * 2.0).round() / 2.0).max(0.5)
}

fn join_authors(authors: Vec<String>) -> String {
    match authors.len() {
        0 => String::new(),
        1 => authors.into_iter().next().unwrap_or_default(),
        _ => authors.join(", "),
    }
}
