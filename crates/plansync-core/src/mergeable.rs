//! Contracts every merge participant implements.
//!
//! - [`Identifiable`]: a stable identity used to match "our" item to "their" item
//! - [`Dirty`]: whether local state diverged from the last synchronized baseline
//! - [`Mergeable`]: recursive three-way merge of a remote snapshot into `self`
//! - [`SyncEq`]: the equality tracked values are compared with

use crate::strategy::MergeStrategy;
use chrono::{DateTime, TimeZone};
use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("{entity}.{field} accessed from a thread that does not own its sync context")]
    WrongThread { entity: String, field: String },

    #[error("Lock on {entity}.{field} is poisoned")]
    LockPoisoned { entity: String, field: String },

    #[error("Merge of {entity} failed: {message}")]
    Entity { entity: String, message: String },
}

pub type Result<T> = std::result::Result<T, MergeError>;

/// An entity with an identity that survives edits and remote round-trips.
pub trait Identifiable {
    type Id: Eq + Hash + Clone + Debug;

    fn id(&self) -> &Self::Id;
}

/// Divergence from the synchronized baseline.
///
/// Object-safe so heterogeneous fields can be checked together with [`any_dirty`].
pub trait Dirty {
    fn is_dirty(&self) -> bool;
}

/// Recursive three-way merge capability.
///
/// Entities implement this by delegating to each of their tracked properties.
pub trait Mergeable: Dirty {
    /// Merge `remote` ("theirs") into `self` ("ours") under `strategy`.
    ///
    /// Never advances baselines on its own; only the strategy's decisions
    /// (applied through `update`) do.
    fn merge(&mut self, remote: &Self, strategy: &mut dyn MergeStrategy) -> Result<()>;

    /// Accept the current state as synchronized: every baseline becomes the
    /// current value.
    fn mark_synced(&mut self) -> Result<()>;

    /// Take baselines from `baseline`, a previously synchronized snapshot of
    /// the same entity. Current values are left untouched.
    fn rebase(&mut self, baseline: &Self) -> Result<()>;
}

/// Value equality for change detection.
///
/// Same as `PartialEq`, except that floats compare by bit pattern: every NaN
/// equals every other NaN, and `0.0` differs from `-0.0`. This keeps the
/// relation reflexive, so a value accepted as synchronized is never dirty.
pub trait SyncEq {
    fn sync_eq(&self, other: &Self) -> bool;
}

macro_rules! sync_eq_by_partial_eq {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SyncEq for $ty {
                fn sync_eq(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

sync_eq_by_partial_eq!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, str, String,
    uuid::Uuid,
);

macro_rules! sync_eq_by_bits {
    ($($ty:ty),*) => {
        $(
            impl SyncEq for $ty {
                fn sync_eq(&self, other: &Self) -> bool {
                    (self.is_nan() && other.is_nan()) || self.to_bits() == other.to_bits()
                }
            }
        )*
    };
}

sync_eq_by_bits!(f32, f64);

impl<Tz: TimeZone> SyncEq for DateTime<Tz> {
    fn sync_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl<T: SyncEq> SyncEq for Option<T> {
    fn sync_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.sync_eq(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: SyncEq> SyncEq for [T] {
    fn sync_eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.sync_eq(b))
    }
}

impl<T: SyncEq, const N: usize> SyncEq for [T; N] {
    fn sync_eq(&self, other: &Self) -> bool {
        self.as_slice().sync_eq(other.as_slice())
    }
}

impl<T: SyncEq> SyncEq for Vec<T> {
    fn sync_eq(&self, other: &Self) -> bool {
        self.as_slice().sync_eq(other.as_slice())
    }
}

/// Logical OR of the dirtiness of `parts`.
pub fn any_dirty(parts: &[&dyn Dirty]) -> bool {
    parts.iter().any(|part| part.is_dirty())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flag(bool);

    impl Dirty for Flag {
        fn is_dirty(&self) -> bool {
            self.0
        }
    }

    #[test]
    fn test_sync_eq_treats_nan_as_itself() {
        assert!(f64::NAN.sync_eq(&f64::NAN));
        assert!(f32::NAN.sync_eq(&-f32::NAN));
        assert!(!f64::NAN.sync_eq(&1.0));
        assert!(!0.0_f64.sync_eq(&-0.0));
        assert!([1.0, f64::NAN].sync_eq(&[1.0, f64::NAN]));
        assert!(vec![[f64::NAN; 2]].sync_eq(&vec![[f64::NAN; 2]]));
        assert!(Some(f32::NAN).sync_eq(&Some(f32::NAN)));
        assert!(!Some(1).sync_eq(&None));
        assert!("north".to_string().sync_eq(&"north".to_string()));
    }

    #[test]
    fn test_any_dirty() {
        assert!(!any_dirty(&[]));
        assert!(!any_dirty(&[&Flag(false), &Flag(false)]));
        assert!(any_dirty(&[&Flag(false), &Flag(true), &Flag(false)]));
    }
}
