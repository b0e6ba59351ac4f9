//! Domain record and wire DTOs for the Books API `volumes` endpoint.
//!
//! # Design
//! The wire types mirror the subset of the API response we read. Every
//! field is an `Option` because the API omits keys freely; the parser
//! collapses absence into the sentinels documented on `BookRecord`, so
//! `None` never leaks past this crate. The mock server defines its own
//! independent fixtures, and integration tests catch schema drift.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// A single normalized search result.
///
/// Zero values are sentinels, not data: `retail_price == 0.0` means the
/// book has no price information, `rating == 0.0` means it is unrated, and
/// `page_count == 0` means the page count is unknown. Empty strings mean
/// the field was absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    /// Contributors joined with `", "`.
    pub author: String,
    /// `YYYY`, `YYYY-MM`, or `YYYY-MM-DD`, exactly as the API sent it.
    pub published_date: String,
    /// First category only.
    pub categories: String,
    pub language: String,
    pub page_count: u32,
    pub print_type: String,
    pub retail_price: f64,
    /// Only meaningful when `retail_price > 0.0`.
    pub currency_code: String,
    pub buying_link: String,
    pub preview_link: String,
    pub epub_available: bool,
    pub pdf_available: bool,
    /// 0.5..=5.0 in half steps, or 0.0 when unrated.
    pub rating: f64,
    pub description: String,
    pub thumbnail_link: String,
}

impl BookRecord {
    pub fn is_priced(&self) -> bool {
        self.retail_price > 0.0
    }

    pub fn is_rated(&self) -> bool {
        self.rating > 0.0
    }

    pub fn has_page_count(&self) -> bool {
        self.page_count > 0
    }
}

/// Top-level search response. `items` is absent when nothing matched.
///
/// Items stay as raw values so that one entry that is not an object does
/// not discard its siblings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumesResponse {
    pub total_items: Option<u64>,
    pub items: Option<Vec<serde_json::Value>>,
}

/// One entry of `items`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    #[serde(default, deserialize_with = "lenient")]
    pub volume_info: Option<VolumeInfo>,
    #[serde(default, deserialize_with = "lenient")]
    pub sale_info: Option<SaleInfo>,
    #[serde(default, deserialize_with = "lenient")]
    pub access_info: Option<AccessInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub authors: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub published_date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub categories: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub page_count: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub print_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub average_rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub image_links: Option<ImageLinks>,
    #[serde(default, deserialize_with = "lenient")]
    pub preview_link: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    #[serde(default, deserialize_with = "lenient")]
    pub small_thumbnail: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleInfo {
    #[serde(default, deserialize_with = "lenient")]
    pub retail_price: Option<Price>,
    #[serde(default, deserialize_with = "lenient")]
    pub buy_link: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    #[serde(default, deserialize_with = "lenient")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub currency_code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessInfo {
    #[serde(default, deserialize_with = "lenient")]
    pub epub: Option<Availability>,
    #[serde(default, deserialize_with = "lenient")]
    pub pdf: Option<Availability>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    #[serde(default, deserialize_with = "lenient")]
    pub is_available: Option<bool>,
}

/// Deserialize an optional field, collapsing a value of the wrong JSON type
/// to `None` instead of failing the whole item.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}
