//! Tracked scalar property: a value plus its synchronized baseline.

use crate::context::PropertyOwner;
use crate::mergeable::{Dirty, Mergeable, Result, SyncEq};
use crate::strategy::{MergeStrategy, Side, Site};
use std::fmt::{self, Debug};
use tracing::trace;

/// A field value with a remembered synchronization baseline.
///
/// `set` is an ordinary edit and leaves the baseline alone; `update` accepts a
/// value as synchronized and moves both. A fresh property has no baseline
/// ("never synchronized"), which differs from every value.
///
/// Values compare with [`SyncEq`], exactly: floats have no epsilon and NaN
/// equals NaN.
#[derive(Clone)]
pub struct TrackedValue<T> {
    owner: PropertyOwner,
    field: &'static str,
    current: T,
    baseline: Option<T>,
}

pub type TrackedBool = TrackedValue<bool>;
pub type TrackedInt = TrackedValue<i32>;
pub type TrackedLong = TrackedValue<i64>;
pub type TrackedFloat = TrackedValue<f32>;
pub type TrackedDouble = TrackedValue<f64>;
pub type TrackedString = TrackedValue<String>;

impl<T> TrackedValue<T>
where
    T: Clone + SyncEq + Debug,
{
    /// A property holding `value` with no baseline yet.
    pub fn new(owner: &PropertyOwner, field: &'static str, value: T) -> Self {
        Self {
            owner: owner.clone(),
            field,
            current: value,
            baseline: None,
        }
    }

    pub fn get(&self) -> &T {
        &self.current
    }

    /// Local edit. Does not touch the baseline.
    pub fn set(&mut self, value: T) {
        self.current = value;
    }

    pub fn baseline(&self) -> Option<&T> {
        self.baseline.as_ref()
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Accept `value` as synchronized: current and baseline both become `value`.
    pub fn update(&mut self, value: T) -> Result<()> {
        self.owner.check_access(self.field)?;
        self.commit(value);
        Ok(())
    }

    /// Three-way merge of `remote` into this property.
    pub fn merge_value(&mut self, remote: &T, strategy: &mut dyn MergeStrategy) -> Result<()> {
        self.owner.check_access(self.field)?;

        let decision = {
            let site = Site {
                entity: self.owner.label(),
                field: self.field,
            };

            if self.current.sync_eq(remote) {
                trace!("{}: both sides hold {:?}", site, remote);
                strategy.update_value(&site, Side::Ours)
            } else {
                let ours_changed = departs(self.baseline.as_ref(), &self.current);
                let theirs_changed = departs(self.baseline.as_ref(), remote);

                match (ours_changed, theirs_changed) {
                    (true, false) => {
                        trace!("{}: only ours changed ({:?})", site, self.current);
                        strategy.update_value(&site, Side::Ours)
                    }
                    (false, true) => {
                        trace!("{}: only theirs changed ({:?})", site, remote);
                        strategy.update_value(&site, Side::Theirs)
                    }
                    (true, true) => strategy.resolve_value_conflict(&site, &self.current, remote),
                    // Unequal values cannot both equal the baseline under an
                    // equivalence; kept as a no-op.
                    (false, false) => {
                        trace!("{}: values differ but neither left the baseline", site);
                        None
                    }
                }
            }
        };

        match decision {
            Some(Side::Ours) => {
                let ours = self.current.clone();
                self.commit(ours);
            }
            Some(Side::Theirs) => self.commit(remote.clone()),
            None => {}
        }
        Ok(())
    }

    fn commit(&mut self, value: T) {
        self.baseline = Some(value.clone());
        self.current = value;
    }
}

/// Whether `value` left `baseline`. A missing baseline differs from everything.
fn departs<T: SyncEq>(baseline: Option<&T>, value: &T) -> bool {
    baseline.is_none_or(|synced| !synced.sync_eq(value))
}

impl<T> Dirty for TrackedValue<T>
where
    T: SyncEq,
{
    fn is_dirty(&self) -> bool {
        departs(self.baseline.as_ref(), &self.current)
    }
}

impl<T> Mergeable for TrackedValue<T>
where
    T: Clone + SyncEq + Debug,
{
    fn merge(&mut self, remote: &Self, strategy: &mut dyn MergeStrategy) -> Result<()> {
        self.merge_value(&remote.current, strategy)
    }

    fn mark_synced(&mut self) -> Result<()> {
        let current = self.current.clone();
        self.update(current)
    }

    fn rebase(&mut self, baseline: &Self) -> Result<()> {
        self.owner.check_access(self.field)?;
        self.baseline = Some(baseline.current.clone());
        Ok(())
    }
}

impl<T: Debug> Debug for TrackedValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.current.fmt(f)
    }
}
