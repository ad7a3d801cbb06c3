//! Page-to-worker control messages.
//!
//! Messages arrive as JSON objects tagged by `type`:
//!
//! ```json
//! {"type": "SKIP_WAITING"}
//! {"type": "CLEAR_CACHE"}
//! ```
//!
//! `CLEAR_CACHE` waits for pending write-behind puts and deletes every
//! partition, including ones owned by the running version. It then answers
//! `{"type": "CACHE_CLEARED"}` on the reply port if the sender supplied one.
//! Unknown message types are ignored.

use super::ServiceWorker;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlMessage {
    SkipWaiting,
    ClearCache,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlReply {
    CacheCleared,
}

/// A posted message with an optional reply port.
#[derive(Debug)]
pub struct MessageEvent {
    pub data: serde_json::Value,
    pub reply: Option<oneshot::Sender<ControlReply>>,
}

impl MessageEvent {
    pub fn new(data: serde_json::Value) -> Self {
        Self { data, reply: None }
    }

    /// Attach a reply port; the receiving half is returned.
    pub fn with_reply(data: serde_json::Value) -> (Self, oneshot::Receiver<ControlReply>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                data,
                reply: Some(tx),
            },
            rx,
        )
    }
}

impl ServiceWorker {
    /// Handle a posted message. Returns the recognized message, if any.
    pub async fn handle_message(&self, event: MessageEvent) -> Option<ControlMessage> {
        let message = match serde_json::from_value::<ControlMessage>(event.data) {
            Ok(m) => m,
            Err(err) => {
                log::debug!("ignoring message: {err}");
                return None;
            }
        };

        match message {
            ControlMessage::SkipWaiting => self.skip_waiting(),
            ControlMessage::ClearCache => {
                self.clear_all().await;
                match event.reply {
                    Some(port) => {
                        if port.send(ControlReply::CacheCleared).is_err() {
                            log::warn!("CACHE_CLEARED reply dropped: sender went away");
                        }
                    }
                    None => log::warn!("CLEAR_CACHE without a reply port"),
                }
            }
        }
        Some(message)
    }

    async fn clear_all(&self) {
        // A put still in flight would recreate its partition after the clear.
        self.settle().await;
        let names = match self.store.partitions().await {
            Ok(names) => names,
            Err(err) => {
                log::error!("could not list cache partitions: {err}");
                return;
            }
        };
        for name in names {
            if let Err(err) = self.store.delete(&name).await {
                log::error!("could not delete cache {name}: {err}");
            }
        }
        log::info!("all caches cleared");
    }
}
