//! Offline cache engine.
//!
//! Mirrors the lifecycle of a browser service worker: it installs (warming
//! the core assets), activates (purging partitions from older versions and
//! claiming open pages), then answers intercepted requests from the network
//! or its cache partitions.
//!
//! ```text
//! host ──▶ dispatch(WorkerEvent) ──▶ Install   ─▶ lifecycle::install
//!                                  ├▶ Activate  ─▶ lifecycle::activate
//!                                  ├▶ Fetch     ─▶ router ─▶ strategy ─▶ fallback
//!                                  ├▶ Message   ─▶ control
//!                                  └▶ Sync      ─▶ (logged only)
//! ```
//!
//! The engine is written against two seams, [`CacheStorage`] and
//! [`Network`], so the same code drives an in-memory store in tests and a
//! real HTTP client from the CLI.
//!
//! Cache writes after a successful network response are write-behind: the
//! response goes back to the page immediately and the put runs on a
//! tracked task. [`ServiceWorker::settle`] waits for those writes.

pub mod control;
pub mod http;
pub mod lifecycle;
pub mod network;
pub mod offline;
pub mod router;
pub mod store;
pub mod strategy;

pub use control::{ControlMessage, ControlReply, MessageEvent};
pub use http::{Request, RequestMode, Response};
pub use lifecycle::{ActivateReport, InstallReport};
pub use network::{FetchError, HttpNetwork, Network};
pub use router::{Policy, Router, Strategy, StrategyRule};
pub use store::{CacheStorage, MemoryCacheStorage, StoreError};

use crate::config::{WorkerProfile, WorkerSettings};
use std::sync::{Arc, Mutex};
use tokio_util::task::TaskTracker;
use url::Url;

/// Immutable engine configuration: partition names and routing table for
/// one worker version.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Partition receiving core assets; also searched for the offline page.
    pub static_partition: String,
    /// Every partition this version owns. Activation deletes the rest.
    pub partitions: Vec<String>,
    pub router: Router,
    pub core_assets: Vec<String>,
    pub offline_page: String,
}

impl WorkerConfig {
    pub fn from_settings(origin: Url, settings: &WorkerSettings) -> Self {
        let version = &settings.version;
        let (router, partitions) = match settings.profile {
            WorkerProfile::Tiered => {
                let static_ = format!("static-{version}");
                let images = format!("images-{version}");
                let runtime = format!("runtime-{version}");
                let router = Router::standard(origin, &static_, &images, &runtime);
                (router, vec![static_, images, runtime])
            }
            WorkerProfile::Single => {
                let name = format!("blog-pwa-{version}");
                let router = Router::network_only_partition(origin, &name);
                (router, vec![name])
            }
        };

        Self {
            static_partition: partitions[0].clone(),
            partitions,
            router,
            core_assets: settings.core_assets.clone(),
            offline_page: settings.offline_page.clone(),
        }
    }

    pub fn origin(&self) -> &Url {
        self.router.origin()
    }

    pub fn owns(&self, partition: &str) -> bool {
        self.partitions.iter().any(|p| p == partition)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Parsed,
    Installing,
    Installed,
    Activating,
    Activated,
}

#[derive(Debug)]
struct Status {
    state: LifecycleState,
    skip_waiting: bool,
    clients_claimed: bool,
}

/// Events the host delivers to the worker.
#[derive(Debug)]
pub enum WorkerEvent {
    Install,
    Activate,
    Fetch(Request),
    Message(MessageEvent),
    /// Background sync with its tag.
    Sync(String),
}

/// What handling an event produced.
#[derive(Debug)]
pub enum Outcome {
    Installed(InstallReport),
    Activated(ActivateReport),
    /// The worker answered the request.
    Respond(Response),
    /// The worker declined; the host performs the request itself.
    Passthrough,
    /// Message or sync handled; nothing to return.
    Handled,
}

pub struct ServiceWorker {
    config: WorkerConfig,
    store: Arc<dyn CacheStorage>,
    network: Arc<dyn Network>,
    tasks: TaskTracker,
    status: Mutex<Status>,
}

impl ServiceWorker {
    pub fn new(
        config: WorkerConfig,
        store: Arc<dyn CacheStorage>,
        network: Arc<dyn Network>,
    ) -> Self {
        Self {
            config,
            store,
            network,
            tasks: TaskTracker::new(),
            status: Mutex::new(Status {
                state: LifecycleState::Parsed,
                skip_waiting: false,
                clients_claimed: false,
            }),
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn state(&self) -> LifecycleState {
        self.with_status(|s| s.state)
    }

    /// Whether the worker asked to activate without waiting for old pages
    /// to close.
    pub fn skip_waiting_requested(&self) -> bool {
        self.with_status(|s| s.skip_waiting)
    }

    /// Whether the worker has claimed already-open pages.
    pub fn controls_clients(&self) -> bool {
        self.with_status(|s| s.clients_claimed)
    }

    fn with_status<T>(&self, f: impl FnOnce(&mut Status) -> T) -> T {
        let mut guard = self
            .status
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }

    fn set_state(&self, state: LifecycleState) {
        log::debug!("lifecycle -> {state:?}");
        self.with_status(|s| s.state = state);
    }

    fn skip_waiting(&self) {
        self.with_status(|s| s.skip_waiting = true);
    }

    pub async fn dispatch(&self, event: WorkerEvent) -> Outcome {
        match event {
            WorkerEvent::Install => Outcome::Installed(self.install().await),
            WorkerEvent::Activate => Outcome::Activated(self.activate().await),
            WorkerEvent::Fetch(request) => match self.handle_fetch(&request).await {
                Some(response) => Outcome::Respond(response),
                None => Outcome::Passthrough,
            },
            WorkerEvent::Message(message) => {
                self.handle_message(message).await;
                Outcome::Handled
            }
            WorkerEvent::Sync(tag) => {
                self.handle_sync(&tag);
                Outcome::Handled
            }
        }
    }

    /// Wait for every write-behind cache put started so far.
    pub async fn settle(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        self.tasks.reopen();
    }

    fn handle_sync(&self, tag: &str) {
        if tag == "sync-posts" {
            log::info!("background sync requested: {tag}");
        } else {
            log::debug!("ignoring sync tag {tag:?}");
        }
    }
}
