//! Install and activate.
//!
//! Install warms the static partition with the core assets, all or
//! nothing: if any asset fails to fetch, none are stored. A failed warm-up
//! is logged and install still completes, so a flaky asset can never block
//! a new version from taking over.
//!
//! Activate deletes every partition the current version does not own and
//! claims open pages. Running it twice is harmless.

use super::http::{Request, Response};
use super::{LifecycleState, ServiceWorker};
use futures::future::join_all;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    /// Core assets written to the static partition.
    pub cached: Vec<String>,
    /// Assets that failed, with the reason. Non-empty means nothing was
    /// cached.
    pub failed: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivateReport {
    pub deleted: Vec<String>,
    pub kept: Vec<String>,
}

impl ServiceWorker {
    pub async fn install(&self) -> InstallReport {
        self.set_state(LifecycleState::Installing);
        log::info!("installing, warming {}", self.config.static_partition);

        let report = self.warm_core_assets().await;
        if report.failed.is_empty() {
            log::info!("cached {} core assets", report.cached.len());
        } else {
            for (asset, reason) in &report.failed {
                log::error!("error caching core asset {asset}: {reason}");
            }
        }

        self.skip_waiting();
        self.set_state(LifecycleState::Installed);
        report
    }

    async fn warm_core_assets(&self) -> InstallReport {
        let mut report = InstallReport::default();
        let partition = &self.config.static_partition;

        if let Err(err) = self.store.open(partition).await {
            report.failed = self
                .config
                .core_assets
                .iter()
                .map(|a| (a.clone(), err.to_string()))
                .collect();
            return report;
        }

        let fetches = self.config.core_assets.iter().map(|asset| async move {
            let result = self.fetch_core_asset(asset).await;
            (asset.clone(), result)
        });

        let mut fetched: Vec<(String, Response)> = Vec::new();
        for (asset, result) in join_all(fetches).await {
            match result {
                Ok(response) => fetched.push((asset, response)),
                Err(reason) => report.failed.push((asset, reason)),
            }
        }
        if !report.failed.is_empty() {
            return report;
        }

        for (asset, response) in fetched {
            let key = self
                .config
                .origin()
                .join(&asset)
                .map(|url| Request::get(url).cache_key())
                .unwrap_or_else(|_| asset.clone());
            match self.store.put(partition, &key, response).await {
                Ok(()) => report.cached.push(asset),
                Err(err) => report.failed.push((asset, err.to_string())),
            }
        }
        report
    }

    async fn fetch_core_asset(&self, asset: &str) -> Result<Response, String> {
        let url = self
            .config
            .origin()
            .join(asset)
            .map_err(|e| format!("invalid asset path: {e}"))?;
        let response = self
            .network
            .fetch(&Request::get(url))
            .await
            .map_err(|e| e.to_string())?;
        if !response.is_ok() {
            return Err(format!("HTTP {}", response.status));
        }
        Ok(response)
    }

    pub async fn activate(&self) -> ActivateReport {
        self.set_state(LifecycleState::Activating);
        log::info!("activating");

        let mut report = ActivateReport::default();
        let existing = match self.store.partitions().await {
            Ok(names) => names,
            Err(err) => {
                log::error!("could not list cache partitions: {err}");
                Vec::new()
            }
        };

        for name in existing {
            if self.config.owns(&name) {
                report.kept.push(name);
                continue;
            }
            log::info!("deleting old cache: {name}");
            match self.store.delete(&name).await {
                Ok(_) => report.deleted.push(name),
                Err(err) => log::error!("could not delete cache {name}: {err}"),
            }
        }

        self.with_status(|s| s.clients_claimed = true);
        self.set_state(LifecycleState::Activated);
        report
    }
}
