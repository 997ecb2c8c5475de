pub mod details;
pub mod results;

pub use details::*;
pub use results::*;

use scraper::ElementRef;

/// Collapse runs of whitespace into single spaces.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Rendered text of an element, roughly what a browser reports as `innerText`.
/// The parser has already decoded entities, so only whitespace is touched.
pub fn element_text(element: &ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}
