//! QuoteCore - core library for the quote manager.
//!
//! This library provides the core functionality behind the quote manager
//! front end:
//! - The quote store (add, import/export, category filtering, random pick)
//! - Persistence through a narrow key/value interface (SQLite-backed)
//! - The category index derived from the collection
//! - Server synchronization with a server-wins merge policy
//!
//! The presentation layer is external: it implements [`QuoteView`] and
//! [`StatusSink`] and calls into [`QuoteManager`]. The core never touches
//! the UI directly.

pub mod app;
pub mod categories;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod storage;
pub mod store;
pub mod sync;
pub mod validation;
pub mod view;

// Re-export commonly used types
pub use app::QuoteManager;
pub use categories::{distinct_categories, ALL_CATEGORIES};
pub use config::Config;
pub use error::{QuoteError, QuoteResult};
pub use models::{FeedPost, Quote, SERVER_CATEGORY};
pub use notify::{LogSink, StatusLevel, StatusSink};
pub use storage::{KeyValueStore, MemoryStore, SessionSlot, SqliteStore};
pub use store::{pick_random, QuoteStore};
pub use sync::{map_feed, merge_server_quotes, SyncEngine, SyncOutcome, SyncTask};
pub use view::{NullView, QuoteView};
