//! Tracked properties: field values that remember their synchronized baseline.
//!
//! - [`TrackedValue`]: scalar fields (numbers, strings, enums, geometry)
//! - [`TrackedEntity`]: a field holding one nested, identifiable entity
//! - [`TrackedList`] / [`TrackedSet`]: collections of identifiable entities

mod collection;
mod entity;
mod value;

pub use collection::{
    Membership, Ordered, SharedItems, TrackedCollection, TrackedList, TrackedSet, Unordered,
};
pub use entity::TrackedEntity;
pub use value::{
    TrackedBool, TrackedDouble, TrackedFloat, TrackedInt, TrackedLong, TrackedString, TrackedValue,
};
