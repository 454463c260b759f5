//! Single-writer ownership for tracked properties.
//!
//! An entity graph is bound to one [`SyncContext`], created on the thread that
//! owns the graph (typically the UI/event thread). Every mutating merge
//! operation asserts it runs on that thread before touching any state.

use crate::mergeable::{MergeError, Result};
use std::fmt;
use std::sync::Arc;
use std::thread::{self, ThreadId};

/// Handle to the owner context of an entity graph.
///
/// Cheap to clone; all clones refer to the same owner.
#[derive(Clone)]
pub struct SyncContext {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    owner: ThreadId,
    name: String,
}

impl SyncContext {
    /// Create a context owned by the calling thread.
    pub fn current() -> Self {
        Self::named("sync")
    }

    /// Create a context owned by the calling thread, with a name for diagnostics.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                owner: thread::current().id(),
                name: name.into(),
            }),
        }
    }

    /// Name given at creation.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Whether the calling thread owns this context.
    pub fn is_owner(&self) -> bool {
        thread::current().id() == self.inner.owner
    }

    /// Whether two handles refer to the same owner context.
    pub fn same_as(&self, other: &SyncContext) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for SyncContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncContext")
            .field("name", &self.inner.name)
            .field("owner", &self.inner.owner)
            .finish()
    }
}

/// The entity a tracked property belongs to.
///
/// Pairs the graph's [`SyncContext`] with a human-readable label of the owning
/// entity (e.g. `Mission 6f1c…`) used in conflict records.
#[derive(Clone)]
pub struct PropertyOwner {
    context: SyncContext,
    label: Arc<str>,
}

impl PropertyOwner {
    pub fn new(context: &SyncContext, label: impl Into<String>) -> Self {
        Self {
            context: context.clone(),
            label: Arc::from(label.into()),
        }
    }

    /// Label of the owning entity, e.g. `Project 3f2a…`.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn context(&self) -> &SyncContext {
        &self.context
    }

    /// Assert that the calling thread may mutate `field` of this entity.
    pub fn check_access(&self, field: &str) -> Result<()> {
        if self.context.is_owner() {
            Ok(())
        } else {
            Err(MergeError::WrongThread {
                entity: self.label.to_string(),
                field: field.to_string(),
            })
        }
    }
}

impl fmt::Debug for PropertyOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_thread_has_access() {
        let context = SyncContext::current();
        let owner = PropertyOwner::new(&context, "Project p1");
        assert!(context.is_owner());
        assert!(owner.check_access("name").is_ok());
        assert_eq!(owner.label(), "Project p1");
    }

    #[test]
    fn test_other_thread_is_rejected() {
        let context = SyncContext::named("ui");
        let owner = PropertyOwner::new(&context, "Mission m1");

        let result = thread::spawn(move || owner.check_access("name")).join().unwrap();
        match result {
            Err(MergeError::WrongThread { entity, field }) => {
                assert_eq!(entity, "Mission m1");
                assert_eq!(field, "name");
            }
            other => panic!("expected WrongThread, got {:?}", other),
        }
    }

    #[test]
    fn test_clones_share_owner() {
        let a = SyncContext::current();
        let b = a.clone();
        let c = SyncContext::current();
        assert!(a.same_as(&b));
        assert!(!a.same_as(&c));
        assert_eq!(c.name(), "sync");
    }
}
