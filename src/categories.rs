//! Category index derivation.
//!
//! The distinct-category list is a pure derived view over the quote
//! collection, recomputed after every mutation. It is never a source of
//! truth itself.

use crate::models::Quote;

/// Label used by the filter to mean "no filtering".
pub const ALL_CATEGORIES: &str = "all";

/// Return the distinct category labels present in the collection, in
/// first-seen order.
pub fn distinct_categories(quotes: &[Quote]) -> Vec<String> {
    let mut seen = Vec::new();
    for quote in quotes {
        if !seen.iter().any(|c: &String| c == &quote.category) {
            seen.push(quote.category.clone());
        }
    }
    seen
}
