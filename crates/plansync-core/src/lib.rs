//! plansync-core: three-way merge and document codec for offline project sync.
//!
//! This crate provides:
//! - Tracked properties that remember their last synchronized baseline
//! - Recursive three-way merge of a remote snapshot into a local entity graph
//! - Pluggable conflict policies (dry-run, keep-ours, keep-theirs)
//! - A self-describing JSON document codec with polymorphic type tags

pub mod codec;
pub mod context;
pub mod diff;
pub mod events;
pub mod mergeable;
pub mod strategy;
pub mod tracked;

pub use codec::{
    CodecError, CodecOptions, Deserializable, ReadContext, Serializable, TypeRegistry, WireEnum,
    WireValue, WriteContext,
};
pub use context::{PropertyOwner, SyncContext};
pub use events::{EventBus, MergeEvent, Subscription};
pub use mergeable::{Dirty, Identifiable, MergeError, Mergeable, SyncEq, any_dirty};
pub use strategy::{
    Conflict, ConflictKind, ConflictReport, DryRun, KeepOurs, KeepTheirs, MergeStrategy, Observed,
    Removal, RemovalResolution, Side, Site, StrategyKind,
};
pub use tracked::{
    TrackedBool, TrackedDouble, TrackedEntity, TrackedFloat, TrackedInt, TrackedList, TrackedLong,
    TrackedSet, TrackedString, TrackedValue,
};
