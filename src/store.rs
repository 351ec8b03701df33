//! The quote store.
//!
//! An owned, ordered collection of quotes. New items append; nothing is
//! ever deleted. Duplicates are allowed on add and import; only the sync
//! merge applies the identity rule (see `sync`).

use rand::Rng;

use crate::categories::{distinct_categories, ALL_CATEGORIES};
use crate::error::{QuoteError, QuoteResult};
use crate::models::Quote;
use crate::validation::{validate_category, validate_quote_text};

/// Ordered collection of quotes with add/import/filter operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteStore {
    quotes: Vec<Quote>,
}

impl QuoteStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given quotes
    pub fn from_quotes(quotes: Vec<Quote>) -> Self {
        Self { quotes }
    }

    /// Create a store holding the seed collection
    pub fn seeded() -> Self {
        Self::from_quotes(Quote::seed())
    }

    /// All quotes, in insertion order
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Validate and append a new quote. Text and category are trimmed;
    /// either being empty after trimming is a validation error. Duplicates
    /// are allowed.
    pub fn add(&mut self, text: &str, category: &str) -> QuoteResult<Quote> {
        validate_quote_text(text)?;
        validate_category(category)?;

        let quote = Quote::new(text.trim(), category.trim());
        self.quotes.push(quote.clone());
        Ok(quote)
    }

    /// Append all given quotes. No deduplication is applied.
    pub fn import_many(&mut self, quotes: Vec<Quote>) {
        self.quotes.extend(quotes);
    }

    /// Append a single quote without validation. Used by the sync merge,
    /// which takes server records as-is.
    pub fn append(&mut self, quote: Quote) {
        self.quotes.push(quote);
    }

    /// Position of the first quote that is "the same" as the given one
    /// under the identity rule.
    pub fn position_of(&self, quote: &Quote) -> Option<usize> {
        self.quotes.iter().position(|q| q.same_identity(quote))
    }

    /// Replace the quote at the given index wholesale.
    pub fn replace_at(&mut self, index: usize, quote: Quote) {
        self.quotes[index] = quote;
    }

    /// Quotes matching the given category, order preserved. The label
    /// "all" matches everything.
    pub fn filtered_by(&self, category: &str) -> Vec<Quote> {
        if category == ALL_CATEGORIES {
            return self.quotes.clone();
        }
        self.quotes
            .iter()
            .filter(|q| q.category == category)
            .cloned()
            .collect()
    }

    /// Distinct category labels in first-seen order
    pub fn categories(&self) -> Vec<String> {
        distinct_categories(&self.quotes)
    }

    /// Serialize the full store as pretty-printed JSON (2-space indent)
    pub fn serialize(&self) -> QuoteResult<String> {
        Ok(serde_json::to_string_pretty(&self.quotes)?)
    }

    /// Parse a JSON document into a quote sequence. The top level must be
    /// an array of quote-shaped objects.
    pub fn deserialize(text: &str) -> QuoteResult<Vec<Quote>> {
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| QuoteError::format(format!("invalid JSON: {}", e)))?;

        if !value.is_array() {
            return Err(QuoteError::format(
                "invalid format, expected an array of quotes",
            ));
        }

        serde_json::from_value(value)
            .map_err(|e| QuoteError::format(format!("invalid quote record: {}", e)))
    }
}

/// Pick a uniformly random quote from the given slice.
pub fn pick_random(quotes: &[Quote]) -> QuoteResult<&Quote> {
    if quotes.is_empty() {
        return Err(QuoteError::empty("no quotes available"));
    }
    let index = rand::thread_rng().gen_range(0..quotes.len());
    Ok(&quotes[index])
}
