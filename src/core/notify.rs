//! Best-effort "forecast changed" notifications.
//!
//! Publishing never blocks and never fails the caller: refreshes go through a
//! bounded queue drained by a background thread, and anything that does not
//! fit or fails to deliver is logged and dropped. Only groups with at least
//! one live subscriber, as counted by the injected registry, are notified.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use parking_lot::RwLock;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Subscription channel a view can listen on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SubscriptionGroup {
    Worker(i64),
    Project(i64),
    All,
}

impl fmt::Display for SubscriptionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionGroup::Worker(id) => write!(f, "forecast_worker_{id}"),
            SubscriptionGroup::Project(id) => write!(f, "forecast_project_{id}"),
            SubscriptionGroup::All => write!(f, "forecast_all"),
        }
    }
}

/// Live subscriber count per group. Owned by the transport layer and shared
/// with the notifier.
#[derive(Debug, Default)]
pub struct SubscriberRegistry {
    counts: RwLock<HashMap<SubscriptionGroup, usize>>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, group: SubscriptionGroup) {
        *self.counts.write().entry(group).or_insert(0) += 1;
    }

    pub fn unsubscribe(&self, group: &SubscriptionGroup) {
        let mut counts = self.counts.write();
        if let Some(n) = counts.get_mut(group) {
            *n = n.saturating_sub(1);
            if *n == 0 {
                counts.remove(group);
            }
        }
    }

    pub fn count(&self, group: &SubscriptionGroup) -> usize {
        self.counts.read().get(group).copied().unwrap_or(0)
    }
}

/// What changed after a committed ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastRefresh {
    pub worker_id: i64,
    pub project_ids: BTreeSet<i64>,
}

impl ForecastRefresh {
    pub fn groups(&self) -> Vec<SubscriptionGroup> {
        let mut groups = vec![SubscriptionGroup::Worker(self.worker_id)];
        groups.extend(self.project_ids.iter().map(|id| SubscriptionGroup::Project(*id)));
        groups.push(SubscriptionGroup::All);
        groups
    }
}

/// Delivery end of the notifier (websocket fan-out, log, test channel).
pub trait ViewSink: Send + 'static {
    fn push(&self, group: &str, payload: &str) -> Result<(), String>;
}

/// Sink that only logs the refresh, used when no push transport is wired.
pub struct TracingSink;

impl ViewSink for TracingSink {
    fn push(&self, group: &str, payload: &str) -> Result<(), String> {
        tracing::info!(group, payload, "forecast refresh");
        Ok(())
    }
}

struct Message {
    group: String,
    payload: String,
}

pub struct Notifier {
    tx: Option<SyncSender<Message>>,
    registry: Arc<SubscriberRegistry>,
    handle: Option<JoinHandle<()>>,
}

impl Notifier {
    /// Start the delivery thread with a queue of `capacity` pending messages.
    pub fn spawn<S: ViewSink>(sink: S, registry: Arc<SubscriberRegistry>, capacity: usize) -> Self {
        let (tx, rx) = mpsc::sync_channel::<Message>(capacity.max(1));
        let handle = thread::Builder::new()
            .name("semafor-notify".into())
            .spawn(move || drain(rx, sink))
            .map_err(|e| warn!(error = %e, "could not start notifier thread"))
            .ok();

        Self {
            tx: handle.as_ref().map(|_| tx),
            registry,
            handle,
        }
    }

    /// Queue a refresh for every subscribed group. Returns how many
    /// messages were queued.
    pub fn publish(&self, refresh: &ForecastRefresh) -> usize {
        let Some(tx) = &self.tx else {
            return 0;
        };

        let payload = match serde_json::to_string(refresh) {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "could not encode forecast refresh");
                return 0;
            }
        };

        let mut queued = 0;
        for group in refresh.groups() {
            if self.registry.count(&group) == 0 {
                continue;
            }
            let msg = Message {
                group: group.to_string(),
                payload: payload.clone(),
            };
            match tx.try_send(msg) {
                Ok(()) => queued += 1,
                Err(TrySendError::Full(m)) => {
                    warn!(group = %m.group, "notification queue full, dropping refresh")
                }
                Err(TrySendError::Disconnected(m)) => {
                    warn!(group = %m.group, "notifier stopped, dropping refresh")
                }
            }
        }
        queued
    }

    /// Close the queue and wait for pending messages to be delivered.
    pub fn shutdown(mut self) {
        self.tx.take();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!("notifier thread panicked");
        }
    }
}

fn drain<S: ViewSink>(rx: Receiver<Message>, sink: S) {
    for msg in rx {
        match sink.push(&msg.group, &msg.payload) {
            Ok(()) => debug!(group = %msg.group, "refresh delivered"),
            Err(e) => warn!(group = %msg.group, error = %e, "refresh delivery failed"),
        }
    }
}
