//! Persistence for QuoteCore.
//!
//! The core persists through a narrow key/value interface: the quote
//! collection as a JSON blob and the last-selected category as a plain
//! label. A SQLite-backed implementation is provided for desktop hosts and
//! an in-memory one for tests. The session slot holds the last viewed
//! quote and does not survive a restart.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::QuoteResult;
use crate::models::Quote;
use crate::store::QuoteStore;

/// Key under which the quote collection blob is stored
pub const QUOTES_KEY: &str = "quotes";

/// Key under which the last-selected category filter is stored
pub const LAST_CATEGORY_KEY: &str = "lastSelectedCategory";

/// Durable string-to-string mapping consumed by the core.
pub trait KeyValueStore: Send + Sync {
    fn get_string(&self, key: &str) -> QuoteResult<Option<String>>;
    fn set_string(&self, key: &str, value: &str) -> QuoteResult<()>;
}

/// SQLite-backed key/value store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the store at the given path
    pub fn new<P: AsRef<Path>>(db_path: P) -> QuoteResult<Self> {
        let conn = Connection::open(db_path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn new_in_memory() -> QuoteResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> QuoteResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    fn get_string(&self, key: &str) -> QuoteResult<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let value = conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_string(&self, key: &str, value: &str) -> QuoteResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}

/// In-memory key/value store (for testing)
#[derive(Default)]
pub struct MemoryStore {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_string(&self, key: &str) -> QuoteResult<Option<String>> {
        Ok(self.map.lock().unwrap().get(key).cloned())
    }

    fn set_string(&self, key: &str, value: &str) -> QuoteResult<()> {
        self.map
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Restore the quote collection from the durable store.
///
/// An absent key yields the seed collection. A corrupt blob is logged and
/// also falls back to the seeds rather than failing startup.
pub fn load_quotes(storage: &dyn KeyValueStore) -> QuoteResult<QuoteStore> {
    match storage.get_string(QUOTES_KEY)? {
        Some(blob) => match QuoteStore::deserialize(&blob) {
            Ok(quotes) => Ok(QuoteStore::from_quotes(quotes)),
            Err(e) => {
                tracing::warn!("Stored quote blob is unreadable ({}), using seed data", e);
                Ok(QuoteStore::seeded())
            }
        },
        None => Ok(QuoteStore::seeded()),
    }
}

/// Persist the full quote collection to the durable store.
pub fn save_quotes(storage: &dyn KeyValueStore, store: &QuoteStore) -> QuoteResult<()> {
    let blob = store.serialize()?;
    storage.set_string(QUOTES_KEY, &blob)
}

/// Single-slot transient store for the last viewed quote.
#[derive(Default)]
pub struct SessionSlot {
    slot: Mutex<Option<Quote>>,
}

impl SessionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the slot with the given quote
    pub fn set(&self, quote: Quote) {
        *self.slot.lock().unwrap() = Some(quote);
    }

    /// The last viewed quote, if any
    pub fn get(&self) -> Option<Quote> {
        self.slot.lock().unwrap().clone()
    }
}
