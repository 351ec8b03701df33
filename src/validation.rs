//! Input validation for QuoteCore.
//!
//! All validators return QuoteError::Validation on failure. Values are
//! trimmed before checking, so whitespace-only input counts as empty.

use crate::error::{QuoteError, QuoteResult};

// Limits
pub const MAX_QUOTE_TEXT_LENGTH: usize = 10_000;
pub const MAX_CATEGORY_LENGTH: usize = 100;

/// Validate quote text: non-empty after trimming, within the length limit.
pub fn validate_quote_text(value: &str) -> QuoteResult<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(QuoteError::validation("text", "quote text must not be empty"));
    }
    if trimmed.len() > MAX_QUOTE_TEXT_LENGTH {
        return Err(QuoteError::validation(
            "text",
            format!(
                "quote text must be at most {} characters, got {}",
                MAX_QUOTE_TEXT_LENGTH,
                trimmed.len()
            ),
        ));
    }
    Ok(())
}

/// Validate a category label: non-empty after trimming, within the length
/// limit.
pub fn validate_category(value: &str) -> QuoteResult<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(QuoteError::validation(
            "category",
            "category must not be empty",
        ));
    }
    if trimmed.len() > MAX_CATEGORY_LENGTH {
        return Err(QuoteError::validation(
            "category",
            format!(
                "category must be at most {} characters, got {}",
                MAX_CATEGORY_LENGTH,
                trimmed.len()
            ),
        ));
    }
    Ok(())
}
