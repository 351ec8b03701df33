//! Presentation interface.
//!
//! The host implements this trait; the core only pushes data out through
//! it. Nothing in the core reads presentation state back.

use crate::models::Quote;

/// Interface the host presentation layer implements.
pub trait QuoteView: Send + Sync {
    /// Display a single quote (text and category)
    fn render_quote(&self, quote: &Quote);

    /// Display the empty state for a category with no quotes
    fn render_empty(&self, category: &str);

    /// Repopulate the category selector with the distinct category list
    fn set_categories(&self, categories: &[String]);
}

/// View that discards everything. Useful for headless hosts and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullView;

impl QuoteView for NullView {
    fn render_quote(&self, _quote: &Quote) {}
    fn render_empty(&self, _category: &str) {}
    fn set_categories(&self, _categories: &[String]) {}
}

/// View that records everything it receives. Shared by tests across
/// modules.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingView {
    pub rendered: std::sync::Mutex<Vec<Quote>>,
    pub empty_renders: std::sync::Mutex<Vec<String>>,
    pub category_lists: std::sync::Mutex<Vec<Vec<String>>>,
}

#[cfg(test)]
impl QuoteView for RecordingView {
    fn render_quote(&self, quote: &Quote) {
        self.rendered.lock().unwrap().push(quote.clone());
    }

    fn render_empty(&self, category: &str) {
        self.empty_renders.lock().unwrap().push(category.to_string());
    }

    fn set_categories(&self, categories: &[String]) {
        self.category_lists.lock().unwrap().push(categories.to_vec());
    }
}
