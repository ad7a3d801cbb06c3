//! Shared test utilities.
//!
//! Post builders for the search and sitemap tests, plus fakes for the two
//! seams of the offline cache engine:
//!
//! - [`FakeNetwork`]: serves canned responses by cache key, 404 otherwise,
//!   and can be switched offline
//! - [`FailingStore`]: a [`CacheStorage`] whose every call errors
//! - [`StalledStore`]: a memory store whose puts never complete
//!
//! ```rust
//! let net = FakeNetwork::new().with("/app.js", page("js"));
//! let (worker, store, net) = worker_with(net);
//! net.set_offline(true);
//! ```

use crate::config::WorkerSettings;
use crate::types::Post;
use crate::worker::{
    CacheStorage, FetchError, MemoryCacheStorage, Network, Request, Response, ServiceWorker,
    StoreError, WorkerConfig,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use url::Url;

// =========================================================================
// Posts
// =========================================================================

/// A post with empty excerpt, no author and no date.
pub fn post(slug: &str, title: &str, tags: &[&str], category: &str) -> Post {
    Post {
        slug: slug.to_string(),
        title: title.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        category: category.to_string(),
        ..Post::default()
    }
}

/// Three posts with disjoint vocabularies.
pub fn sample_posts() -> Vec<Post> {
    let mut etfs = post(
        "dividend-etfs",
        "Dividend ETFs for steady income",
        &["ETF", "Dividends"],
        "Investing",
    );
    etfs.excerpt = "Funds that pay out quarterly.".into();
    etfs.date = chrono::NaiveDate::from_ymd_opt(2024, 3, 2);

    let mut halving = post(
        "bitcoin-halving",
        "Bitcoin halving explained",
        &["Bitcoin", "Supply"],
        "Crypto",
    );
    halving.excerpt = "Every four years the block reward halves.".into();
    halving.author = Some("Priya Nair".into());
    halving.date = chrono::NaiveDate::from_ymd_opt(2024, 4, 19);

    let mut budget = post(
        "household-budget",
        "Building a household budget",
        &["Budgeting"],
        "Personal Finance",
    );
    budget.excerpt = "Track spending for one month first.".into();
    budget.author = Some("Sam Ortiz".into());
    budget.date = chrono::NaiveDate::from_ymd_opt(2023, 9, 14);

    vec![etfs, halving, budget]
}

// =========================================================================
// Offline cache engine fakes
// =========================================================================

/// A 200 response with no `Date` header, so always fresh.
pub fn page(body: &str) -> Response {
    Response::new(200, body.to_string()).with_header("Content-Type", "text/html")
}

/// A 200 response stamped with `Date: at`.
pub fn dated(body: &str, at: DateTime<Utc>) -> Response {
    page(body).with_header("Date", at.to_rfc2822())
}

#[derive(Debug, Default)]
pub struct FakeNetwork {
    responses: HashMap<String, Response>,
    offline: AtomicBool,
    fetches: AtomicUsize,
}

impl FakeNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `response` for requests whose cache key is `key`.
    pub fn with(mut self, key: &str, response: Response) -> Self {
        self.responses.insert(key.to_string(), response);
        self
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of fetches attempted, including failed ones.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Network for FakeNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(FetchError::Unreachable(request.url.to_string()));
        }
        Ok(self
            .responses
            .get(&request.cache_key())
            .cloned()
            .unwrap_or_else(|| Response::new(404, "not found")))
    }
}

/// Every operation fails.
pub struct FailingStore;

#[async_trait]
impl CacheStorage for FailingStore {
    async fn open(&self, _: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("quota exceeded".into()))
    }
    async fn lookup(&self, _: &str, _: &str) -> Result<Option<Response>, StoreError> {
        Err(StoreError::Unavailable("quota exceeded".into()))
    }
    async fn lookup_any(&self, _: &str) -> Result<Option<Response>, StoreError> {
        Err(StoreError::Unavailable("quota exceeded".into()))
    }
    async fn put(&self, _: &str, _: &str, _: Response) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("quota exceeded".into()))
    }
    async fn partitions(&self) -> Result<Vec<String>, StoreError> {
        Err(StoreError::Unavailable("quota exceeded".into()))
    }
    async fn delete(&self, _: &str) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("quota exceeded".into()))
    }
}

/// Reads go to an inner memory store; `put` never resolves.
#[derive(Default)]
pub struct StalledStore {
    inner: MemoryCacheStorage,
}

#[async_trait]
impl CacheStorage for StalledStore {
    async fn open(&self, partition: &str) -> Result<(), StoreError> {
        self.inner.open(partition).await
    }
    async fn lookup(&self, partition: &str, key: &str) -> Result<Option<Response>, StoreError> {
        self.inner.lookup(partition, key).await
    }
    async fn lookup_any(&self, key: &str) -> Result<Option<Response>, StoreError> {
        self.inner.lookup_any(key).await
    }
    async fn put(&self, _: &str, _: &str, _: Response) -> Result<(), StoreError> {
        std::future::pending().await
    }
    async fn partitions(&self) -> Result<Vec<String>, StoreError> {
        self.inner.partitions().await
    }
    async fn delete(&self, partition: &str) -> Result<bool, StoreError> {
        self.inner.delete(partition).await
    }
}

/// A worker for `https://blog.example.com` with default settings, an empty
/// memory store and `net`.
pub fn worker_with(
    net: FakeNetwork,
) -> (ServiceWorker, Arc<MemoryCacheStorage>, Arc<FakeNetwork>) {
    let store = Arc::new(MemoryCacheStorage::new());
    let net = Arc::new(net);
    let config = WorkerConfig::from_settings(
        Url::parse("https://blog.example.com").unwrap(),
        &WorkerSettings::default(),
    );
    let worker = ServiceWorker::new(config, store.clone(), net.clone());
    (worker, store, net)
}
