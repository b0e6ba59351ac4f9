//! Plain-text list and detail views.

use std::fmt::Write;

use bookfinder_core::display::{author_label, format_published_date, formats, price_label, rating_stars};
use bookfinder_core::BookRecord;

pub const NO_RESULTS: &str = "No books found.";

/// One entry per book, numbered from 1 so `--detail N` can refer to it.
pub fn render_list(books: &[BookRecord]) -> String {
    if books.is_empty() {
        return format!("{NO_RESULTS}\n");
    }
    let mut out = String::new();
    for (i, book) in books.iter().enumerate() {
        let _ = writeln!(out, "{:>2}. {}", i + 1, book.title);
        let _ = writeln!(
            out,
            "    {} | {} | {}",
            author_label(book),
            price_label(book).unwrap_or_else(|| "Not priced".to_string()),
            rating_label(book),
        );
    }
    out
}

pub fn render_detail(book: &BookRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", book.title);
    let _ = writeln!(out, "by {}", author_label(book));
    let _ = writeln!(out);

    match rating_stars(book.rating) {
        Some(stars) => {
            let _ = writeln!(out, "Rating:     {stars} ({:.1})", book.rating);
        }
        None => {
            let _ = writeln!(out, "Rating:     {}", rating_label(book));
        }
    }
    let _ = writeln!(
        out,
        "Price:      {}",
        price_label(book).unwrap_or_else(|| "Not priced".to_string())
    );

    if let Some(published) = format_published_date(&book.published_date) {
        let _ = writeln!(out, "Published:  {published}");
    }
    field(&mut out, "Category:", &book.categories);
    field(&mut out, "Print type:", &book.print_type);
    field(&mut out, "Language:", &book.language);
    if book.has_page_count() {
        let _ = writeln!(out, "Pages:      {}", book.page_count);
    }
    let formats = formats(book);
    if !formats.is_empty() {
        let _ = writeln!(out, "Formats:    {}", formats.join(", "));
    }
    field(&mut out, "Buy:", &book.buying_link);
    field(&mut out, "Preview:", &book.preview_link);
    field(&mut out, "Cover:", &book.thumbnail_link);

    if !book.description.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", book.description);
    }
    out
}

/// Stars when the rating is a half step, the number for any other rated value.
fn rating_label(book: &BookRecord) -> String {
    match rating_stars(book.rating) {
        Some(stars) => stars,
        None if book.is_rated() => format!("{:.1}", book.rating),
        None => "No rating".to_string(),
    }
}

fn field(out: &mut String, label: &str, value: &str) {
    if !value.is_empty() {
        let _ = writeln!(out, "{label:<11} {value}");
    }
}
