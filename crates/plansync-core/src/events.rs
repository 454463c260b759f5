//! Merge events for monitoring and auditing.
//!
//! [`MergeEvent`] describes one strategy decision. [`EventBus`] fans events out
//! to subscribers; wrap any strategy in [`crate::strategy::Observed`] to
//! publish its decisions.

use crate::strategy::{Removal, Side};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, Weak};

/// One decision taken while merging.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MergeEvent {
    /// A non-conflicting outcome was accepted (`side` is `None` when declined).
    ValueUpdated {
        entity: String,
        field: String,
        proposed: Side,
        side: Option<Side>,
    },
    /// Both sides changed a value.
    ValueConflict {
        entity: String,
        field: String,
        ours: String,
        theirs: String,
        side: Option<Side>,
    },
    /// A remote item new since the baseline.
    ItemAdded {
        entity: String,
        field: String,
        item: String,
        accepted: bool,
    },
    /// A remote deletion of an unedited local item.
    ItemRemoved {
        entity: String,
        field: String,
        item: String,
        accepted: bool,
    },
    /// A delete/modify conflict.
    RemovalConflict {
        entity: String,
        field: String,
        item: String,
        removal: Removal,
        resolution: String,
    },
}

/// Subscription handle that unsubscribes automatically when dropped.
///
/// Hold this value to keep receiving events; drop it to unsubscribe.
pub struct Subscription {
    bus: Weak<EventBus>,
    id: usize,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.unsubscribe(self.id);
        }
    }
}

type Callback = Arc<dyn Fn(&MergeEvent) + Send + Sync>;

/// Event bus for publishing merge events to subscribers.
///
/// Wrap in `Arc` to enable subscriptions.
pub struct EventBus {
    callbacks: RwLock<Vec<(usize, Callback)>>,
    next_id: AtomicUsize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self {
            callbacks: RwLock::new(Vec::new()),
            next_id: AtomicUsize::new(0),
        }
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to events. Returns `Subscription` that unsubscribes on drop.
    pub fn subscribe(
        self: &Arc<Self>,
        callback: impl Fn(&MergeEvent) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.callbacks
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push((id, Arc::new(callback)));
        Subscription {
            bus: Arc::downgrade(self),
            id,
        }
    }

    fn unsubscribe(&self, id: usize) {
        // try_write: Drop may run while emit holds the read lock during unwinding.
        if let Ok(mut guard) = self.callbacks.try_write() {
            guard.retain(|(i, _)| *i != id);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.callbacks.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Emit an event to all subscribers.
    pub fn emit(&self, event: MergeEvent) {
        // Snapshot so a callback may subscribe without deadlocking.
        let callbacks: Vec<_> = self
            .callbacks
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();

        for callback in callbacks {
            callback(&event);
        }
    }
}
