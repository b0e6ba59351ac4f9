//! Sentinel-aware formatting for list rows and the detail view.

use chrono::NaiveDate;
use log::debug;

use crate::types::BookRecord;

const STAR_FULL: char = '★';
const STAR_HALF: char = '⯪';
const STAR_EMPTY: char = '☆';

/// Price with currency symbol, or `None` when the book is not priced.
pub fn price_label(book: &BookRecord) -> Option<String> {
    if !book.is_priced() {
        return None;
    }
    let amount = book.retail_price;
    Some(match book.currency_code.as_str() {
        "GBP" => format!("£{amount:.2}"),
        "USD" => format!("${amount:.2}"),
        "EUR" => format!("€{amount:.2}"),
        "" => format!("{amount:.2}"),
        code => format!("{code} {amount:.2}"),
    })
}

/// Five-glyph star bar for a half-step rating in 0.5..=5.0.
///
/// Unrated books and ratings that are not half steps get `None`.
pub fn rating_stars(rating: f64) -> Option<String> {
    let halves = rating * 2.0;
    if !(1.0..=10.0).contains(&halves) || halves.fract() != 0.0 {
        return None;
    }
    let halves = halves as usize;
    let full = halves / 2;
    let half = halves % 2;
    let mut stars = String::with_capacity(5 * STAR_FULL.len_utf8());
    stars.extend(std::iter::repeat(STAR_FULL).take(full));
    stars.extend(std::iter::repeat(STAR_HALF).take(half));
    stars.extend(std::iter::repeat(STAR_EMPTY).take(5 - full - half));
    Some(stars)
}

/// `2001-03-15` and `2001-03` become `Mar 2001`; `2001` stays `2001`.
///
/// Dates longer than ten characters (timestamps) are cut to the date part.
pub fn format_published_date(date: &str) -> Option<String> {
    let date = date.trim();
    let date = date.get(..10).unwrap_or(date);
    let parsed = match date.len() {
        4 => return date.parse::<u16>().ok().map(|year| year.to_string()),
        7 => NaiveDate::parse_from_str(&format!("{date}-01"), "%Y-%m-%d"),
        10 => NaiveDate::parse_from_str(date, "%Y-%m-%d"),
        _ => {
            if !date.is_empty() {
                debug!("unrecognised published date {date:?}");
            }
            return None;
        }
    };
    match parsed {
        Ok(day) => Some(day.format("%b %Y").to_string()),
        Err(e) => {
            debug!("unparsable published date {date:?}: {e}");
            None
        }
    }
}

pub fn author_label(book: &BookRecord) -> &str {
    if book.author.is_empty() {
        "Unknown author"
    } else {
        &book.author
    }
}

/// Downloadable formats, in a fixed order.
pub fn formats(book: &BookRecord) -> Vec<&'static str> {
    let mut formats = Vec::new();
    if book.epub_available {
        formats.push("EPUB");
    }
    if book.pdf_available {
        formats.push("PDF");
    }
    formats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(amount: f64, code: &str) -> BookRecord {
        BookRecord {
            retail_price: amount,
            currency_code: code.to_string(),
            ..BookRecord::default()
        }
    }

    #[test]
    fn zero_price_is_not_priced() {
        assert_eq!(price_label(&priced(0.0, "USD")), None);
    }

    #[test]
    fn known_currencies_use_symbols() {
        assert_eq!(price_label(&priced(12.5, "GBP")).unwrap(), "£12.50");
        assert_eq!(price_label(&priced(3.0, "USD")).unwrap(), "$3.00");
        assert_eq!(price_label(&priced(9.99, "EUR")).unwrap(), "€9.99");
        assert_eq!(price_label(&priced(450.0, "INR")).unwrap(), "INR 450.00");
    }

    #[test]
    fn stars_for_half_steps() {
        assert_eq!(rating_stars(5.0).unwrap(), "★★★★★");
        assert_eq!(rating_stars(3.5).unwrap(), "★★★⯪☆");
        assert_eq!(rating_stars(0.5).unwrap(), "⯪☆☆☆☆");
        assert_eq!(rating_stars(1.0).unwrap(), "★☆☆☆☆");
    }

    #[test]
    fn no_stars_for_unrated_or_odd_values() {
        assert_eq!(rating_stars(0.0), None);
        assert_eq!(rating_stars(3.7), None);
        assert_eq!(rating_stars(5.5), None);
    }

    #[test]
    fn published_date_forms() {
        assert_eq!(format_published_date("2001-03-15").unwrap(), "Mar 2001");
        assert_eq!(format_published_date("1965-08").unwrap(), "Aug 1965");
        assert_eq!(format_published_date("1965").unwrap(), "1965");
        assert_eq!(format_published_date("2019-11-05T00:00:00Z").unwrap(), "Nov 2019");
        assert_eq!(format_published_date(""), None);
        assert_eq!(format_published_date("19xx"), None);
        assert_eq!(format_published_date("2001-13-01"), None);
        assert_eq!(format_published_date("65"), None);
    }

    #[test]
    fn missing_author_has_placeholder() {
        let book = BookRecord::default();
        assert_eq!(author_label(&book), "Unknown author");
        let book = BookRecord {
            author: "A, B".to_string(),
            ..BookRecord::default()
        };
        assert_eq!(author_label(&book), "A, B");
    }

    #[test]
    fn formats_in_order() {
        let book = BookRecord {
            epub_available: true,
            pdf_available: true,
            ..BookRecord::default()
        };
        assert_eq!(formats(&book), ["EPUB", "PDF"]);
        assert!(formats(&BookRecord::default()).is_empty());
    }
}
