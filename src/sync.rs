//! Server synchronization.
//!
//! One-directional pull-and-overwrite against the remote quote feed:
//! - fetch a bounded batch of feed records and map them into quotes
//! - merge them into the local store, server wins on conflict
//! - report outcomes through the status sink
//!
//! Passes run once at startup and then on a fixed interval. Overlapping
//! triggers are serialized by a busy flag: a trigger that arrives while a
//! pass is in flight is dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use reqwest::Client;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

use crate::config::Config;
use crate::error::{QuoteError, QuoteResult};
use crate::models::{FeedPost, Quote};
use crate::notify::{StatusLevel, StatusSink};
use crate::storage::{save_quotes, KeyValueStore};
use crate::store::QuoteStore;
use crate::view::QuoteView;

/// Result of one sync pass. Computed fresh each pass, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    pub new_quotes_added: usize,
    pub conflicts_resolved: usize,
}

impl SyncOutcome {
    /// True if the pass changed nothing
    pub fn is_empty(&self) -> bool {
        self.new_quotes_added == 0 && self.conflicts_resolved == 0
    }
}

/// Merge server quotes into the store, in the order received.
///
/// A record with no identity match is appended. A matched record whose
/// text or category differs replaces the local quote wholesale (server
/// wins). A matched, identical record is a no-op.
pub fn merge_server_quotes(store: &mut QuoteStore, server_quotes: &[Quote]) -> SyncOutcome {
    let mut outcome = SyncOutcome::default();

    for server_quote in server_quotes {
        match store.position_of(server_quote) {
            None => {
                store.append(server_quote.clone());
                outcome.new_quotes_added += 1;
            }
            Some(index) => {
                if !store.quotes()[index].same_content(server_quote) {
                    store.replace_at(index, server_quote.clone());
                    outcome.conflicts_resolved += 1;
                }
            }
        }
    }

    outcome
}

/// Map feed records into server-tagged quotes, bounded to the first
/// `limit` records, order preserved.
pub fn map_feed(posts: Vec<FeedPost>, limit: usize) -> Vec<Quote> {
    posts.into_iter().take(limit).map(Quote::from).collect()
}

/// Handle to the recurring sync task.
pub struct SyncTask {
    handle: JoinHandle<()>,
}

impl SyncTask {
    /// Stop the recurring task. In-flight HTTP requests are abandoned.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Sync engine: owns the HTTP client and drives passes against the feed.
pub struct SyncEngine {
    store: Arc<Mutex<QuoteStore>>,
    storage: Arc<dyn KeyValueStore>,
    view: Arc<dyn QuoteView>,
    sink: Arc<dyn StatusSink>,
    client: Client,
    config: Config,
    in_flight: AtomicBool,
}

impl SyncEngine {
    /// Create a new sync engine
    pub fn new(
        store: Arc<Mutex<QuoteStore>>,
        storage: Arc<dyn KeyValueStore>,
        view: Arc<dyn QuoteView>,
        sink: Arc<dyn StatusSink>,
        config: Config,
    ) -> QuoteResult<Self> {
        let client = Client::builder()
            .timeout(config.http_timeout())
            .build()
            .map_err(|e| QuoteError::network(e.to_string()))?;

        Ok(Self {
            store,
            storage,
            view,
            sink,
            client,
            config,
            in_flight: AtomicBool::new(false),
        })
    }

    /// Fetch a bounded batch of feed records and map them into quotes
    /// tagged with the server category.
    pub async fn fetch_server_quotes(&self) -> QuoteResult<Vec<Quote>> {
        let response = self
            .client
            .get(&self.config.server_url)
            .send()
            .await
            .map_err(|e| QuoteError::network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(QuoteError::sync(format!(
                "Fetch failed with status {}",
                response.status()
            )));
        }

        let posts: Vec<FeedPost> = response
            .json()
            .await
            .map_err(|e| QuoteError::sync(format!("Failed to parse feed: {}", e)))?;

        Ok(map_feed(posts, self.config.fetch_limit))
    }

    /// Post a quote to the feed endpoint. The response body is logged and
    /// otherwise ignored.
    pub async fn post_quote(&self, quote: &Quote) -> QuoteResult<()> {
        let response = self
            .client
            .post(&self.config.server_url)
            .json(quote)
            .send()
            .await
            .map_err(|e| QuoteError::network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(QuoteError::sync(format!(
                "Post failed with status {}",
                response.status()
            )));
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!("Quote posted to server: {}", body);
        Ok(())
    }

    /// Post a quote, converting any failure into a user notification.
    pub async fn publish_quote(&self, quote: Quote) {
        if let Err(e) = self.post_quote(&quote).await {
            tracing::warn!("Error posting to server: {}", e);
            self.sink.notify("Failed to post quote to server");
        }
    }

    /// Run one sync pass. A pass already in flight drops this trigger.
    pub async fn sync_once(&self) -> SyncOutcome {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            tracing::debug!("Sync pass already in flight, dropping trigger");
            return SyncOutcome::default();
        }

        let outcome = self.run_pass().await;
        self.in_flight.store(false, Ordering::SeqCst);
        outcome
    }

    async fn run_pass(&self) -> SyncOutcome {
        self.sink
            .sync_status("Syncing with server...", StatusLevel::Info);

        let server_quotes = match self.fetch_server_quotes().await {
            Ok(quotes) => quotes,
            Err(e) => {
                tracing::warn!("Sync failed: {}", e);
                self.sink
                    .sync_status("Sync failed. Using local data.", StatusLevel::Info);
                return SyncOutcome::default();
            }
        };

        self.apply_server_quotes(server_quotes)
    }

    /// Merge already-fetched server quotes and report the outcome. Split
    /// from the fetch so tests can drive passes deterministically.
    pub fn apply_server_quotes(&self, server_quotes: Vec<Quote>) -> SyncOutcome {
        if server_quotes.is_empty() {
            self.sink
                .sync_status("No new data from server", StatusLevel::Info);
            return SyncOutcome::default();
        }

        let (outcome, categories, total_quotes) = {
            let mut store = self.store.lock().unwrap();
            let outcome = merge_server_quotes(&mut store, &server_quotes);

            if !outcome.is_empty() {
                if let Err(e) = save_quotes(self.storage.as_ref(), &store) {
                    tracing::warn!("Failed to persist merged quotes: {}", e);
                }
            }

            (outcome, store.categories(), store.len())
        };

        if !outcome.is_empty() {
            self.view.set_categories(&categories);

            let mut message = String::new();
            if outcome.new_quotes_added > 0 {
                message.push_str(&format!(
                    "{} new quote(s) synced from server. ",
                    outcome.new_quotes_added
                ));
            }
            if outcome.conflicts_resolved > 0 {
                message.push_str(&format!(
                    "{} conflict(s) resolved (server data applied).",
                    outcome.conflicts_resolved
                ));
            }
            self.sink
                .sync_status(message.trim_end(), StatusLevel::Success);

            if outcome.conflicts_resolved > 0 {
                self.sink.notify(&format!(
                    "Conflicts resolved: Server data has been applied to {} quote(s)",
                    outcome.conflicts_resolved
                ));
            }
        } else {
            self.sink
                .sync_status("Data is up to date", StatusLevel::Info);
        }

        tracing::debug!(
            new_quotes_added = outcome.new_quotes_added,
            conflicts_resolved = outcome.conflicts_resolved,
            total_quotes,
            "Sync completed"
        );

        outcome
    }

    /// Start the recurring sync task. The first scheduled pass runs one
    /// full interval after start; the startup pass is issued separately by
    /// the caller.
    pub fn start_periodic(self: &Arc<Self>) -> SyncTask {
        let engine = Arc::clone(self);
        let period = engine.config.sync_interval();

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                engine.sync_once().await;
            }
        });

        tracing::debug!("Periodic sync started (every {:?})", period);
        SyncTask { handle }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingSink;
    use crate::storage::{load_quotes, MemoryStore, QUOTES_KEY};
    use crate::view::RecordingView;

    fn server_quote(text: &str, id: u64) -> Quote {
        Quote {
            text: text.to_string(),
            category: "Server".to_string(),
            id: Some(id.to_string()),
        }
    }

    fn engine_with(
        store: QuoteStore,
    ) -> (
        Arc<SyncEngine>,
        Arc<MemoryStore>,
        Arc<RecordingView>,
        Arc<RecordingSink>,
    ) {
        let storage = Arc::new(MemoryStore::new());
        let view = Arc::new(RecordingView::default());
        let sink = Arc::new(RecordingSink::default());
        let engine = SyncEngine::new(
            Arc::new(Mutex::new(store)),
            storage.clone(),
            view.clone(),
            sink.clone(),
            Config::default(),
        )
        .unwrap();
        (Arc::new(engine), storage, view, sink)
    }

    fn feed_post(id: u64, title: &str) -> FeedPost {
        FeedPost {
            id,
            title: title.to_string(),
        }
    }

    #[test]
    fn test_map_feed_truncates_to_limit() {
        let posts: Vec<FeedPost> = (1..=8)
            .map(|i| feed_post(i, &format!("post {}", i)))
            .collect();

        let quotes = map_feed(posts, 5);
        assert_eq!(quotes.len(), 5);
        assert_eq!(quotes[0].text, "post 1");
        assert_eq!(quotes[4].text, "post 5");
        assert!(quotes.iter().all(|q| q.category == "Server"));
        assert_eq!(quotes[2].id.as_deref(), Some("3"));
    }

    #[test]
    fn test_map_feed_shorter_than_limit() {
        let posts = vec![feed_post(1, "only one")];
        let quotes = map_feed(posts, 5);
        assert_eq!(quotes.len(), 1);
    }

    #[test]
    fn test_merge_adds_fresh_quotes() {
        // Scenario: 5 seed quotes, 3 fresh server titles
        let mut store = QuoteStore::seeded();
        let remote = vec![
            server_quote("fresh one", 1),
            server_quote("fresh two", 2),
            server_quote("fresh three", 3),
        ];

        let outcome = merge_server_quotes(&mut store, &remote);
        assert_eq!(store.len(), 8);
        assert_eq!(outcome.new_quotes_added, 3);
        assert_eq!(outcome.conflicts_resolved, 0);
    }

    #[test]
    fn test_merge_server_wins_on_text_match() {
        let mut store = QuoteStore::from_quotes(vec![Quote::new("X", "Old")]);
        let remote = vec![Quote::new("X", "New")];

        let outcome = merge_server_quotes(&mut store, &remote);
        assert_eq!(store.len(), 1);
        assert_eq!(store.quotes()[0].category, "New");
        assert_eq!(outcome.conflicts_resolved, 1);
        assert_eq!(outcome.new_quotes_added, 0);
    }

    #[test]
    fn test_merge_server_wins_on_id_match() {
        let mut local = server_quote("old text", 7);
        local.category = "Local".to_string();
        let mut store = QuoteStore::from_quotes(vec![local]);

        let remote = vec![server_quote("replacement text", 7)];
        let outcome = merge_server_quotes(&mut store, &remote);

        assert_eq!(store.len(), 1);
        assert_eq!(store.quotes()[0].text, "replacement text");
        assert_eq!(outcome.conflicts_resolved, 1);
    }

    #[test]
    fn test_merge_identical_record_is_noop() {
        let mut store = QuoteStore::from_quotes(vec![server_quote("same", 1)]);
        let outcome = merge_server_quotes(&mut store, &[server_quote("same", 1)]);
        assert!(outcome.is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut store = QuoteStore::seeded();
        let remote = vec![server_quote("once", 1), server_quote("twice", 2)];

        let first = merge_server_quotes(&mut store, &remote);
        assert_eq!(first.new_quotes_added, 2);

        let second = merge_server_quotes(&mut store, &remote);
        assert!(second.is_empty());
        assert_eq!(store.len(), 7);
    }

    #[test]
    fn test_merge_replaces_in_place() {
        let mut store = QuoteStore::from_quotes(vec![
            Quote::new("first", "A"),
            Quote::new("X", "Old"),
            Quote::new("last", "B"),
        ]);

        merge_server_quotes(&mut store, &[Quote::new("X", "New")]);
        assert_eq!(store.quotes()[1].text, "X");
        assert_eq!(store.quotes()[1].category, "New");
        assert_eq!(store.quotes()[2].text, "last");
    }

    #[test]
    fn test_apply_empty_feed_reports_no_new_data() {
        let (engine, storage, _view, sink) = engine_with(QuoteStore::seeded());

        let outcome = engine.apply_server_quotes(Vec::new());
        assert!(outcome.is_empty());
        assert_eq!(storage.get_string(QUOTES_KEY).unwrap(), None);

        let statuses = sink.statuses.lock().unwrap();
        assert_eq!(statuses[0].0, "No new data from server");
        assert_eq!(statuses[0].1, StatusLevel::Info);
    }

    #[test]
    fn test_apply_persists_and_reports_counts() {
        let (engine, storage, view, sink) = engine_with(QuoteStore::from_quotes(vec![
            Quote::new("X", "Old"),
        ]));

        let outcome = engine.apply_server_quotes(vec![
            Quote::new("X", "New"),
            server_quote("fresh", 9),
        ]);
        assert_eq!(outcome.new_quotes_added, 1);
        assert_eq!(outcome.conflicts_resolved, 1);

        // persisted store reflects the merge
        let restored = load_quotes(storage.as_ref()).unwrap();
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.quotes()[0].category, "New");

        // category index pushed to the view
        let lists = view.category_lists.lock().unwrap();
        assert_eq!(lists.last().unwrap(), &vec!["New".to_string(), "Server".to_string()]);

        let statuses = sink.statuses.lock().unwrap();
        let (message, level) = statuses.last().unwrap();
        assert!(message.contains("1 new quote(s) synced from server."));
        assert!(message.contains("1 conflict(s) resolved (server data applied)."));
        assert_eq!(*level, StatusLevel::Success);

        let notifications = sink.notifications.lock().unwrap();
        assert_eq!(
            notifications[0],
            "Conflicts resolved: Server data has been applied to 1 quote(s)"
        );
    }

    #[test]
    fn test_apply_unchanged_feed_reports_up_to_date() {
        let (engine, storage, _view, sink) =
            engine_with(QuoteStore::from_quotes(vec![server_quote("same", 1)]));

        let outcome = engine.apply_server_quotes(vec![server_quote("same", 1)]);
        assert!(outcome.is_empty());
        assert_eq!(storage.get_string(QUOTES_KEY).unwrap(), None);
        assert_eq!(
            sink.statuses.lock().unwrap().last().unwrap().0,
            "Data is up to date"
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_degrades_to_local_data() {
        let storage = Arc::new(MemoryStore::new());
        let sink = Arc::new(RecordingSink::default());
        let store = Arc::new(Mutex::new(QuoteStore::seeded()));

        let mut config = Config::default();
        config.server_url = "not a valid url".to_string();

        let engine = SyncEngine::new(
            store.clone(),
            storage.clone(),
            Arc::new(RecordingView::default()),
            sink.clone(),
            config,
        )
        .unwrap();

        let outcome = engine.sync_once().await;
        assert!(outcome.is_empty());
        assert_eq!(store.lock().unwrap().len(), 5);
        assert_eq!(storage.get_string(QUOTES_KEY).unwrap(), None);

        let statuses = sink.statuses.lock().unwrap();
        assert_eq!(statuses[0].0, "Syncing with server...");
        assert_eq!(statuses[1].0, "Sync failed. Using local data.");
        assert_eq!(statuses[1].1, StatusLevel::Info);
    }

    #[tokio::test]
    async fn test_in_flight_trigger_is_dropped() {
        let (engine, _storage, _view, sink) = engine_with(QuoteStore::seeded());

        engine.in_flight.store(true, Ordering::SeqCst);
        let outcome = engine.sync_once().await;
        assert!(outcome.is_empty());
        // the dropped trigger reports nothing
        assert!(sink.statuses.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_periodic_task_cancel() {
        let (engine, _storage, _view, _sink) = engine_with(QuoteStore::new());

        let task = engine.start_periodic();
        assert!(!task.is_finished());
        task.cancel();
    }
}
