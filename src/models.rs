//! Data models for QuoteCore.
//!
//! This module defines the core entities: the Quote record and the shape of
//! records returned by the remote feed.

use serde::{Deserialize, Serialize};

/// Category label attached to every quote pulled from the server.
pub const SERVER_CATEGORY: &str = "Server";

/// A single quote in the collection.
///
/// Quotes created locally carry no id; quotes pulled from the server carry
/// the feed's numeric identifier rendered as a string. Quotes are replaced
/// wholesale on conflict resolution, never field-patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// The quote text
    pub text: String,
    /// Category label (e.g. "Inspiration", or "Server" for synced quotes)
    pub category: String,
    /// Remote identifier, present only on quotes that came from the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Quote {
    /// Create a new local quote (no remote identifier)
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
            id: None,
        }
    }

    /// Identity rule: two quotes are the same if their texts are equal, or
    /// both carry an id and the ids are equal.
    pub fn same_identity(&self, other: &Quote) -> bool {
        if self.text == other.text {
            return true;
        }
        matches!((&self.id, &other.id), (Some(a), Some(b)) if a == b)
    }

    /// Content comparison used by conflict resolution: a matched quote is
    /// only replaced if text or category differ.
    pub fn same_content(&self, other: &Quote) -> bool {
        self.text == other.text && self.category == other.category
    }

    /// The seed collection shipped with the application, used when the
    /// durable store holds no quote blob yet.
    pub fn seed() -> Vec<Quote> {
        vec![
            Quote::new(
                "The only way to do great work is to love what you do.",
                "Inspiration",
            ),
            Quote::new(
                "Innovation distinguishes between a leader and a follower.",
                "Leadership",
            ),
            Quote::new(
                "Life is what happens when you're busy making other plans.",
                "Life",
            ),
            Quote::new(
                "The future belongs to those who believe in the beauty of their dreams.",
                "Dreams",
            ),
            Quote::new(
                "Success is not final, failure is not fatal: it is the courage to continue that counts.",
                "Motivation",
            ),
        ]
    }
}

/// One record of the remote feed. Unknown fields are ignored; only the
/// numeric identifier and the title-like text field matter.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedPost {
    pub id: u64,
    pub title: String,
}

impl From<FeedPost> for Quote {
    fn from(post: FeedPost) -> Self {
        Quote {
            text: post.title,
            category: SERVER_CATEGORY.to_string(),
            id: Some(post.id.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_creation() {
        let quote = Quote::new("Test text", "Test");
        assert_eq!(quote.text, "Test text");
        assert_eq!(quote.category, "Test");
        assert!(quote.id.is_none());
    }

    #[test]
    fn test_identity_by_text() {
        let a = Quote::new("same text", "A");
        let b = Quote::new("same text", "B");
        assert!(a.same_identity(&b));
        assert!(!a.same_content(&b));
    }

    #[test]
    fn test_identity_by_id() {
        let mut a = Quote::new("one", "A");
        let mut b = Quote::new("two", "B");
        a.id = Some("7".to_string());
        b.id = Some("7".to_string());
        assert!(a.same_identity(&b));
    }

    #[test]
    fn test_no_identity_when_ids_absent() {
        let a = Quote::new("one", "A");
        let b = Quote::new("two", "A");
        assert!(!a.same_identity(&b));
    }

    #[test]
    fn test_feed_post_mapping() {
        let post = FeedPost {
            id: 42,
            title: "A server quote".to_string(),
        };
        let quote: Quote = post.into();
        assert_eq!(quote.text, "A server quote");
        assert_eq!(quote.category, SERVER_CATEGORY);
        assert_eq!(quote.id.as_deref(), Some("42"));
    }

    #[test]
    fn test_feed_post_ignores_extra_fields() {
        let json = r#"{"userId": 1, "id": 3, "title": "hello", "body": "ignored"}"#;
        let post: FeedPost = serde_json::from_str(json).unwrap();
        assert_eq!(post.id, 3);
        assert_eq!(post.title, "hello");
    }

    #[test]
    fn test_seed_collection() {
        let seed = Quote::seed();
        assert_eq!(seed.len(), 5);
        assert!(seed.iter().all(|q| q.id.is_none()));
        assert_eq!(seed[0].category, "Inspiration");
    }

    #[test]
    fn test_quote_serde_omits_absent_id() {
        let quote = Quote::new("text", "cat");
        let json = serde_json::to_string(&quote).unwrap();
        assert!(!json.contains("\"id\""));

        let parsed: Quote = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, quote);
    }
}
