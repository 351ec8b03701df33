//! Application orchestration.
//!
//! `QuoteManager` owns the store and wires it to the persistence layer,
//! the host view, the status sink, and the sync engine. On startup the
//! collection and the last-used filter are restored, the category list is
//! pushed to the view, and an initial quote is displayed; the host then
//! calls [`QuoteManager::start_sync`] to begin the periodic passes.

use std::sync::{Arc, Mutex};

use crate::categories::ALL_CATEGORIES;
use crate::config::Config;
use crate::error::QuoteResult;
use crate::models::Quote;
use crate::notify::StatusSink;
use crate::storage::{
    load_quotes, save_quotes, KeyValueStore, SessionSlot, LAST_CATEGORY_KEY,
};
use crate::store::{pick_random, QuoteStore};
use crate::sync::{SyncEngine, SyncOutcome, SyncTask};
use crate::view::QuoteView;

/// The quote manager application core.
pub struct QuoteManager {
    store: Arc<Mutex<QuoteStore>>,
    storage: Arc<dyn KeyValueStore>,
    session: SessionSlot,
    view: Arc<dyn QuoteView>,
    sink: Arc<dyn StatusSink>,
    filter: Mutex<String>,
    engine: Arc<SyncEngine>,
}

impl QuoteManager {
    /// Restore state from the durable store and wire up the sync engine.
    pub fn new(
        storage: Arc<dyn KeyValueStore>,
        view: Arc<dyn QuoteView>,
        sink: Arc<dyn StatusSink>,
        config: Config,
    ) -> QuoteResult<Self> {
        let store = Arc::new(Mutex::new(load_quotes(storage.as_ref())?));

        let filter = storage
            .get_string(LAST_CATEGORY_KEY)?
            .unwrap_or_else(|| ALL_CATEGORIES.to_string());

        let engine = Arc::new(SyncEngine::new(
            Arc::clone(&store),
            Arc::clone(&storage),
            Arc::clone(&view),
            Arc::clone(&sink),
            config,
        )?);

        Ok(Self {
            store,
            storage,
            session: SessionSlot::new(),
            view,
            sink,
            filter: Mutex::new(filter),
            engine,
        })
    }

    /// Push the category list to the view and display an initial quote.
    pub fn initialize(&self) {
        let categories = self.store.lock().unwrap().categories();
        self.view.set_categories(&categories);
        self.show_random_quote();
    }

    /// Start the recurring sync task and run the startup pass. The
    /// returned handle cancels the recurring task; the startup pass runs
    /// to completion before this returns.
    pub async fn start_sync(&self) -> (SyncTask, SyncOutcome) {
        let task = self.engine.start_periodic();
        let outcome = self.engine.sync_once().await;
        (task, outcome)
    }

    /// Validate and add a quote, persist, repopulate categories, publish
    /// to the server, and display it when it matches the active filter.
    pub async fn add_quote(&self, text: &str, category: &str) -> QuoteResult<Quote> {
        let (quote, categories) = {
            let mut store = self.store.lock().unwrap();
            let quote = store.add(text, category)?;
            save_quotes(self.storage.as_ref(), &store)?;
            (quote, store.categories())
        };

        self.view.set_categories(&categories);
        self.sink.notify("Quote added successfully!");

        // Fire-and-forget toward the server; failure is a toast, not an
        // error, and a slow server must not hold up the add flow
        let engine = Arc::clone(&self.engine);
        let published = quote.clone();
        tokio::spawn(async move { engine.publish_quote(published).await });

        let filter = self.current_filter();
        if filter == ALL_CATEGORIES || filter == quote.category {
            self.view.render_quote(&quote);
        }

        Ok(quote)
    }

    /// Import quotes from a JSON document. The store is untouched when the
    /// payload is malformed.
    pub fn import_from_json(&self, text: &str) -> QuoteResult<usize> {
        let imported = QuoteStore::deserialize(text)?;
        let count = imported.len();

        let categories = {
            let mut store = self.store.lock().unwrap();
            store.import_many(imported);
            save_quotes(self.storage.as_ref(), &store)?;
            store.categories()
        };

        self.view.set_categories(&categories);
        self.sink.notify("Quotes imported successfully!");
        self.show_random_quote();
        Ok(count)
    }

    /// Export the full collection as a pretty-printed JSON document.
    pub fn export_to_json(&self) -> QuoteResult<String> {
        let json = self.store.lock().unwrap().serialize()?;
        self.sink.notify("Quotes exported successfully!");
        Ok(json)
    }

    /// Change the active category filter, persist it, and re-display.
    pub fn set_filter(&self, category: &str) -> QuoteResult<()> {
        self.storage.set_string(LAST_CATEGORY_KEY, category)?;
        *self.filter.lock().unwrap() = category.to_string();
        self.show_random_quote();
        Ok(())
    }

    /// Display a random quote from the active filter. An empty filtered
    /// set renders the empty state instead.
    pub fn show_random_quote(&self) {
        let filter = self.current_filter();
        let filtered = self.store.lock().unwrap().filtered_by(&filter);

        match pick_random(&filtered) {
            Ok(quote) => {
                self.session.set(quote.clone());
                self.view.render_quote(quote);
            }
            Err(_) => self.view.render_empty(&filter),
        }
    }

    /// The active category filter
    pub fn current_filter(&self) -> String {
        self.filter.lock().unwrap().clone()
    }

    /// The last quote displayed in this session, if any
    pub fn last_viewed(&self) -> Option<Quote> {
        self.session.get()
    }

    /// Snapshot of the current collection
    pub fn quotes(&self) -> Vec<Quote> {
        self.store.lock().unwrap().quotes().to_vec()
    }

    /// The sync engine, for hosts that drive passes manually
    pub fn sync_engine(&self) -> &Arc<SyncEngine> {
        &self.engine
    }
}
