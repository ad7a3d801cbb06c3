//! Fetch handling: cache-first and network-first executors and the final
//! fallback chain.
//!
//! Cache problems never fail a request. A store error while reading is a
//! miss, a store error while writing is logged and dropped.

use super::ServiceWorker;
use super::http::{Request, Response};
use super::network::FetchError;
use super::offline;
use super::router::Strategy;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

/// Whether a cached response is younger than `max_age`, judged by its
/// `Date` header.
///
/// No `Date` header means fresh. An unparseable one means stale. A date in
/// the future counts as age zero.
pub fn is_fresh_at(response: &Response, max_age: Duration, now: DateTime<Utc>) -> bool {
    if response.header("date").is_none() {
        return true;
    }
    let Some(captured) = response.date() else {
        return false;
    };
    match (now - captured).to_std() {
        Ok(age) => age < max_age,
        Err(_) => true,
    }
}

pub fn is_fresh(response: &Response, max_age: Duration) -> bool {
    is_fresh_at(response, max_age, Utc::now())
}

impl ServiceWorker {
    /// Answer an intercepted request, or `None` to let it pass through.
    pub async fn handle_fetch(&self, request: &Request) -> Option<Response> {
        let strategy = self.config.router.route(request);
        let result = match &strategy {
            Strategy::NoStrategy => return None,
            Strategy::CacheFirst { partition, max_age } => {
                self.cache_first(request, partition, *max_age).await
            }
            Strategy::NetworkFirst { partition, max_age } => {
                self.network_first(request, partition, *max_age).await
            }
        };

        match result {
            Ok(response) => Some(response),
            Err(err) => {
                log::error!("fetch failed for {}: {err}", request.url);
                Some(self.final_fallback(request).await)
            }
        }
    }

    /// Serve a fresh cached copy if there is one, otherwise go to the
    /// network. A stale copy is still better than a network failure.
    pub async fn cache_first(
        &self,
        request: &Request,
        partition: &str,
        max_age: Duration,
    ) -> Result<Response, FetchError> {
        self.open_partition(partition).await;
        let key = request.cache_key();
        let cached = self.cached(partition, &key).await;

        if let Some(hit) = &cached
            && is_fresh(hit, max_age)
        {
            return Ok(hit.clone());
        }

        match self.network.fetch(request).await {
            Ok(response) => {
                if response.is_ok() {
                    self.write_behind(partition, key, response.clone());
                }
                Ok(response)
            }
            Err(err) => match cached {
                Some(stale) => {
                    log::info!("serving stale cache for {}", request.url);
                    Ok(stale)
                }
                None => Err(err),
            },
        }
    }

    /// Always try the network first. On failure fall back to this
    /// partition, then (for navigations) the offline page.
    ///
    /// `max_age` is not consulted: anything cached beats a failure.
    pub async fn network_first(
        &self,
        request: &Request,
        partition: &str,
        _max_age: Duration,
    ) -> Result<Response, FetchError> {
        self.open_partition(partition).await;
        let key = request.cache_key();

        let err = match self.network.fetch(request).await {
            Ok(response) => {
                if response.is_ok() {
                    self.write_behind(partition, key, response.clone());
                }
                return Ok(response);
            }
            Err(err) => err,
        };

        if let Some(cached) = self.cached(partition, &key).await {
            log::info!("network failed, serving from cache: {}", request.url);
            return Ok(cached);
        }

        if request.is_navigation() {
            let offline_page = &self.config.offline_page;
            if let Some(doc) = self.cached(partition, offline_page).await {
                return Ok(doc);
            }
            if partition != self.config.static_partition
                && let Some(doc) = self.cached(&self.config.static_partition, offline_page).await
            {
                return Ok(doc);
            }
        }

        Err(err)
    }

    /// Last resort after a strategy gave up.
    async fn final_fallback(&self, request: &Request) -> Response {
        if !request.is_navigation() {
            return offline::network_error();
        }
        match self.store.lookup_any(&self.config.offline_page).await {
            Ok(Some(doc)) => doc,
            Ok(None) => offline::offline_document(),
            Err(err) => {
                log::warn!("offline page lookup failed: {err}");
                offline::offline_document()
            }
        }
    }

    async fn open_partition(&self, partition: &str) {
        if let Err(err) = self.store.open(partition).await {
            log::warn!("could not open cache {partition}: {err}");
        }
    }

    async fn cached(&self, partition: &str, key: &str) -> Option<Response> {
        match self.store.lookup(partition, key).await {
            Ok(hit) => hit,
            Err(err) => {
                log::warn!("cache lookup {partition}:{key} failed: {err}");
                None
            }
        }
    }

    fn write_behind(&self, partition: &str, key: String, response: Response) {
        let store = Arc::clone(&self.store);
        let partition = partition.to_string();
        self.tasks.spawn(async move {
            if let Err(err) = store.put(&partition, &key, response).await {
                log::warn!("skipping cache put for {key}: {err}");
            }
        });
    }
}
