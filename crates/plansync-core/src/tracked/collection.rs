//! Tracked collections of identifiable entities (list and set variants).
//!
//! The baseline of a collection is not a copy of its members but the set of
//! member identities seen at the last synchronization. Comparing three
//! identity sets (baseline, ours, theirs) tells "we removed X" apart from
//! "they removed X", independently of edits inside surviving members.
//!
//! Merge order matters and is fixed:
//! 1. delete/modify conflicts for items we removed
//! 2. remote removals (plain or conflicting) of items we still hold
//! 3. recursive merge of items present on both sides
//! 4. insertion of items new on their side

use crate::context::PropertyOwner;
use crate::diff::{get_by_id, id_difference, position_of};
use crate::mergeable::{Dirty, Identifiable, MergeError, Mergeable, Result};
use crate::strategy::{MergeStrategy, Removal, RemovalResolution, Site};
use std::collections::HashSet;
use std::fmt::{self, Debug};
use std::marker::PhantomData;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, trace};

/// Member ordering of a tracked collection.
pub trait Membership {
    /// Whether member order is part of the collection's state.
    const ORDERED: bool;
}

/// Ordered members: order changes make the collection dirty.
#[derive(Debug, Clone, Copy)]
pub struct Ordered;

/// Unordered members with unique identities.
#[derive(Debug, Clone, Copy)]
pub struct Unordered;

impl Membership for Ordered {
    const ORDERED: bool = true;
}

impl Membership for Unordered {
    const ORDERED: bool = false;
}

pub type TrackedList<T> = TrackedCollection<T, Ordered>;
pub type TrackedSet<T> = TrackedCollection<T, Unordered>;

/// Shared view of a collection's members for readers outside the merge
/// (e.g. a UI list). Reads block while a merge holds the write lock, so a
/// reader never observes a partially merged collection.
pub struct SharedItems<T> {
    inner: Arc<RwLock<Vec<T>>>,
}

impl<T> Clone for SharedItems<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> SharedItems<T> {
    fn new(items: Vec<T>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(items)),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Vec<T>> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn snapshot(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.read().clone()
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<T>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_exclusive(
        &self,
        owner: &PropertyOwner,
        field: &str,
    ) -> Result<RwLockWriteGuard<'_, Vec<T>>> {
        self.inner.write().map_err(|_| MergeError::LockPoisoned {
            entity: owner.label().to_string(),
            field: field.to_string(),
        })
    }

    fn same_as(&self, other: &SharedItems<T>) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// A collection field of identifiable members with an identity baseline.
pub struct TrackedCollection<T: Identifiable, K> {
    owner: PropertyOwner,
    field: &'static str,
    items: SharedItems<T>,
    baseline: Vec<T::Id>,
    _membership: PhantomData<K>,
}

impl<T, K> TrackedCollection<T, K>
where
    T: Identifiable,
    K: Membership,
{
    pub fn new(owner: &PropertyOwner, field: &'static str) -> Self {
        Self::from_items(owner, field, Vec::new())
    }

    /// A collection holding `items` with an empty baseline.
    pub fn from_items(owner: &PropertyOwner, field: &'static str, items: Vec<T>) -> Self {
        Self {
            owner: owner.clone(),
            field,
            items: SharedItems::new(items),
            baseline: Vec::new(),
            _membership: PhantomData,
        }
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Handle for readers that outlive a borrow of the owning entity.
    pub fn handle(&self) -> SharedItems<T> {
        self.items.clone()
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Vec<T>> {
        self.items.read()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Member identities, in member order.
    pub fn ids(&self) -> Vec<T::Id> {
        self.read().iter().map(|item| item.id().clone()).collect()
    }

    /// Identities observed at the last synchronization.
    pub fn baseline_ids(&self) -> &[T::Id] {
        &self.baseline
    }

    pub fn contains_id(&self, id: &T::Id) -> bool {
        position_of(self.read().as_slice(), id).is_some()
    }

    pub fn snapshot(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.snapshot()
    }

    /// Edit the member carrying `id`, if present.
    pub fn with_item_mut<R>(&mut self, id: &T::Id, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut items = self.items.write();
        items.iter_mut().find(|item| item.id() == id).map(f)
    }

    /// Local deletion. Does not touch the baseline.
    pub fn remove(&mut self, id: &T::Id) -> Option<T> {
        let mut items = self.items.write();
        position_of(items.as_slice(), id).map(|pos| items.remove(pos))
    }

    /// Record the current membership as synchronized. Members are unchanged.
    pub fn update(&mut self) -> Result<()> {
        self.owner.check_access(self.field)?;
        self.baseline = self.ids();
        Ok(())
    }

    fn membership_changed(&self) -> bool {
        let ids = self.ids();
        if K::ORDERED {
            ids != self.baseline
        } else {
            let baseline: HashSet<&T::Id> = self.baseline.iter().collect();
            ids.len() != self.baseline.len() || ids.iter().collect::<HashSet<_>>() != baseline
        }
    }

    /// Three-way merge of `remote`, whose elements may be of a different type.
    ///
    /// `create` materializes a remote element that has no local counterpart;
    /// `merge_item` merges a matched pair. The local collection is locked for
    /// the whole merge.
    pub fn merge_with<S, C, M>(
        &mut self,
        remote: &[S],
        strategy: &mut dyn MergeStrategy,
        create: C,
        mut merge_item: M,
    ) -> Result<()>
    where
        T: Dirty + Debug,
        S: Identifiable<Id = T::Id> + Dirty + Debug,
        C: Fn(&S) -> T,
        M: FnMut(&mut T, &S, &mut dyn MergeStrategy) -> Result<()>,
    {
        self.owner.check_access(self.field)?;
        let mut items = self.items.lock_exclusive(&self.owner, self.field)?;
        let site = Site {
            entity: self.owner.label(),
            field: self.field,
        };
        merge_members(
            &site,
            &mut *items,
            &self.baseline,
            remote,
            strategy,
            &create,
            &mut merge_item,
        )
    }
}

impl<T> TrackedCollection<T, Ordered>
where
    T: Identifiable,
{
    pub fn push(&mut self, item: T) {
        self.items.write().push(item);
    }

    /// Insert at `index`, clamped to the current length.
    pub fn insert(&mut self, index: usize, item: T) {
        let mut items = self.items.write();
        let index = index.min(items.len());
        items.insert(index, item);
    }
}

impl<T> TrackedCollection<T, Unordered>
where
    T: Identifiable,
{
    /// Insert `item` unless a member with the same identity exists.
    pub fn insert(&mut self, item: T) -> bool {
        let mut items = self.items.write();
        if position_of(items.as_slice(), item.id()).is_some() {
            return false;
        }
        items.push(item);
        true
    }
}

fn merge_members<T, S>(
    site: &Site<'_>,
    items: &mut Vec<T>,
    baseline: &[T::Id],
    remote: &[S],
    strategy: &mut dyn MergeStrategy,
    create: &dyn Fn(&S) -> T,
    merge_item: &mut dyn FnMut(&mut T, &S, &mut dyn MergeStrategy) -> Result<()>,
) -> Result<()>
where
    T: Identifiable + Dirty + Debug,
    S: Identifiable<Id = T::Id> + Dirty + Debug,
{
    let remote_ids: Vec<T::Id> = remote.iter().map(|item| item.id().clone()).collect();
    let local_ids: Vec<T::Id> = items.iter().map(|item| item.id().clone()).collect();

    let their_added = id_difference(&remote_ids, baseline);
    let our_removed = id_difference(baseline, &local_ids);
    let their_removed = id_difference(baseline, &remote_ids);
    debug!(
        "{}: {} added remotely, {} removed locally, {} removed remotely",
        site,
        their_added.len(),
        our_removed.len(),
        their_removed.len()
    );

    // We deleted it; a remote edit makes that a conflict.
    for id in &our_removed {
        let Some(theirs) = get_by_id(remote, id) else {
            continue;
        };
        if !theirs.is_dirty() {
            trace!("{}: local removal of {:?} stands", site, id);
            continue;
        }
        match strategy.resolve_item_removed_conflict(site, theirs, Removal::DeletedLocally) {
            RemovalResolution::Resurrect => items.push(create(theirs)),
            RemovalResolution::Leave | RemovalResolution::Delete => {}
        }
    }

    // They deleted it; a local edit makes that a conflict.
    for id in &their_removed {
        let Some(pos) = position_of(items.as_slice(), id) else {
            continue;
        };
        let remove = if items[pos].is_dirty() {
            strategy.resolve_item_removed_conflict(site, &items[pos], Removal::DeletedRemotely)
                == RemovalResolution::Delete
        } else {
            strategy.remove_item(site, &items[pos])
        };
        if remove {
            items.remove(pos);
        }
    }

    // Present on both sides.
    let skip: HashSet<&T::Id> = their_added.iter().chain(&our_removed).collect();
    for theirs in remote {
        if skip.contains(theirs.id()) {
            continue;
        }
        if let Some(ours) = items.iter_mut().find(|item| item.id() == theirs.id()) {
            merge_item(ours, theirs, strategy)?;
        }
    }

    // New on their side.
    for id in &their_added {
        let Some(theirs) = get_by_id(remote, id) else {
            continue;
        };
        if let Some(ours) = items.iter_mut().find(|item| item.id() == id) {
            // Added on both sides under the same identity.
            merge_item(ours, theirs, strategy)?;
        } else if strategy.add_item(site, theirs) {
            items.push(create(theirs));
        }
    }

    Ok(())
}

impl<T, K> Dirty for TrackedCollection<T, K>
where
    T: Identifiable + Dirty,
    K: Membership,
{
    /// Dirty when membership left the baseline or any member is dirty.
    fn is_dirty(&self) -> bool {
        self.membership_changed() || self.read().iter().any(Dirty::is_dirty)
    }
}

impl<T, K> Mergeable for TrackedCollection<T, K>
where
    T: Mergeable + Identifiable + Clone + Debug,
    K: Membership,
{
    fn merge(&mut self, remote: &Self, strategy: &mut dyn MergeStrategy) -> Result<()> {
        if self.items.same_as(&remote.items) {
            trace!("{}.{}: merging with itself", self.owner.label(), self.field);
            return Ok(());
        }
        self.owner.check_access(self.field)?;

        let mut items = self.items.lock_exclusive(&self.owner, self.field)?;
        let theirs = remote.items.lock_exclusive(&remote.owner, remote.field)?;
        let site = Site {
            entity: self.owner.label(),
            field: self.field,
        };
        merge_members(
            &site,
            &mut *items,
            &self.baseline,
            theirs.as_slice(),
            strategy,
            &T::clone,
            &mut |ours: &mut T, theirs: &T, strategy: &mut dyn MergeStrategy| {
                ours.merge(theirs, strategy)
            },
        )
    }

    fn mark_synced(&mut self) -> Result<()> {
        self.owner.check_access(self.field)?;
        {
            let mut items = self.items.lock_exclusive(&self.owner, self.field)?;
            for item in items.iter_mut() {
                item.mark_synced()?;
            }
        }
        self.update()
    }

    fn rebase(&mut self, baseline: &Self) -> Result<()> {
        if self.items.same_as(&baseline.items) {
            return self.mark_synced();
        }
        self.owner.check_access(self.field)?;

        let mut items = self.items.lock_exclusive(&self.owner, self.field)?;
        let synced = baseline.read();
        for item in items.iter_mut() {
            if let Some(base) = get_by_id(synced.as_slice(), item.id()) {
                item.rebase(base)?;
            }
        }
        self.baseline = synced.iter().map(|item| item.id().clone()).collect();
        Ok(())
    }
}

impl<T, K> Clone for TrackedCollection<T, K>
where
    T: Identifiable + Clone,
{
    /// Deep copy: the clone gets its own member storage.
    fn clone(&self) -> Self {
        Self {
            owner: self.owner.clone(),
            field: self.field,
            items: SharedItems::new(self.items.snapshot()),
            baseline: self.baseline.clone(),
            _membership: PhantomData,
        }
    }
}

impl<T, K> Debug for TrackedCollection<T, K>
where
    T: Identifiable + Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.read().iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SyncContext;
    use crate::strategy::{ConflictKind, DryRun, KeepOurs, KeepTheirs};
    use crate::tracked::TrackedValue;

    #[derive(Clone)]
    struct Flight {
        id: u32,
        altitude: TrackedValue<i32>,
    }

    impl Flight {
        fn new(id: u32, altitude: i32) -> Self {
            let owner = PropertyOwner::new(&SyncContext::current(), format!("Flight {}", id));
            let mut flight = Self {
                id,
                altitude: TrackedValue::new(&owner, "altitude", altitude),
            };
            flight.mark_synced().unwrap();
            flight
        }
    }

    impl Debug for Flight {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Flight({}, {})", self.id, self.altitude.get())
        }
    }

    impl Identifiable for Flight {
        type Id = u32;

        fn id(&self) -> &u32 {
            &self.id
        }
    }

    impl Dirty for Flight {
        fn is_dirty(&self) -> bool {
            self.altitude.is_dirty()
        }
    }

    impl Mergeable for Flight {
        fn merge(&mut self, remote: &Self, strategy: &mut dyn MergeStrategy) -> Result<()> {
            self.altitude.merge(&remote.altitude, strategy)
        }

        fn mark_synced(&mut self) -> Result<()> {
            self.altitude.mark_synced()
        }

        fn rebase(&mut self, baseline: &Self) -> Result<()> {
            self.altitude.rebase(&baseline.altitude)
        }
    }

    fn owner() -> PropertyOwner {
        PropertyOwner::new(&SyncContext::current(), "Mission m1")
    }

    fn list(flights: &[(u32, i32)]) -> TrackedList<Flight> {
        let items = flights.iter().map(|&(id, alt)| Flight::new(id, alt)).collect();
        let mut list = TrackedList::from_items(&owner(), "flights", items);
        list.update().unwrap();
        list
    }

    fn ids<K: Membership>(collection: &TrackedCollection<Flight, K>) -> Vec<u32> {
        let mut ids = collection.ids();
        ids.sort();
        ids
    }

    #[test]
    fn test_local_delete_and_remote_add_under_keep_ours() {
        let mut ours = list(&[(1, 100), (2, 100)]);
        ours.remove(&1);
        let mut theirs = list(&[(1, 100), (2, 100)]);
        theirs.push(Flight::new(3, 100));

        ours.merge(&theirs, &mut KeepOurs).unwrap();
        assert_eq!(ids(&ours), vec![2, 3]);
    }

    #[test]
    fn test_agreement_is_idempotent() {
        let mut ours = list(&[(1, 100), (2, 120)]);
        let theirs = list(&[(1, 100), (2, 120)]);
        let mut dry = DryRun::new();

        ours.merge(&theirs, &mut dry).unwrap();
        ours.merge(&theirs, &mut KeepOurs).unwrap();
        assert!(!dry.has_conflicts());
        assert!(!ours.is_dirty());
        assert_eq!(ids(&ours), vec![1, 2]);
    }

    #[test]
    fn test_matched_members_merge_recursively() {
        let mut ours = list(&[(1, 100)]);
        let theirs = list(&[(1, 150)]);

        ours.merge(&theirs, &mut KeepOurs).unwrap();
        assert_eq!(*ours.read()[0].altitude.get(), 150);
    }

    #[test]
    fn test_remote_removal_of_clean_item() {
        let mut ours = list(&[(1, 100), (2, 100)]);
        let mut theirs = list(&[(1, 100), (2, 100)]);
        theirs.remove(&2);

        let mut dry = DryRun::new();
        ours.merge(&theirs, &mut dry).unwrap();
        assert_eq!(ids(&ours), vec![1, 2]);
        assert!(!dry.has_conflicts());

        ours.merge(&theirs, &mut KeepOurs).unwrap();
        assert_eq!(ids(&ours), vec![1]);
    }

    #[test]
    fn test_remote_removal_of_edited_item() {
        let build = || {
            let mut ours = list(&[(1, 100), (2, 100)]);
            ours.with_item_mut(&2, |f| f.altitude.set(140));
            let mut theirs = list(&[(1, 100), (2, 100)]);
            theirs.remove(&2);
            (ours, theirs)
        };

        let (mut ours, theirs) = build();
        let mut dry = DryRun::new();
        ours.merge(&theirs, &mut dry).unwrap();
        assert_eq!(dry.conflicts().len(), 1);
        assert_eq!(dry.conflicts()[0].kind, ConflictKind::DeletedRemotely);

        let (mut ours, theirs) = build();
        ours.merge(&theirs, &mut KeepOurs).unwrap();
        assert_eq!(ids(&ours), vec![1, 2]);

        let (mut ours, theirs) = build();
        ours.merge(&theirs, &mut KeepTheirs).unwrap();
        assert_eq!(ids(&ours), vec![1]);
    }

    #[test]
    fn test_local_removal_of_remotely_edited_item() {
        let build = || {
            let mut ours = list(&[(1, 100), (2, 100)]);
            ours.remove(&2);
            let mut theirs = list(&[(1, 100), (2, 100)]);
            theirs.with_item_mut(&2, |f| f.altitude.set(90));
            (ours, theirs)
        };

        let (mut ours, theirs) = build();
        let mut dry = DryRun::new();
        ours.merge(&theirs, &mut dry).unwrap();
        assert_eq!(dry.conflicts().len(), 1);
        assert_eq!(dry.conflicts()[0].kind, ConflictKind::DeletedLocally);
        assert_eq!(dry.conflicts()[0].theirs, "Flight(2, 90)");

        let (mut ours, theirs) = build();
        ours.merge(&theirs, &mut KeepOurs).unwrap();
        assert_eq!(ids(&ours), vec![1]);

        let (mut ours, theirs) = build();
        ours.merge(&theirs, &mut KeepTheirs).unwrap();
        assert_eq!(ids(&ours), vec![1, 2]);
        assert_eq!(*ours.read()[1].altitude.get(), 90);
    }

    #[test]
    fn test_added_on_both_sides_merges_instead_of_duplicating() {
        let mut ours = list(&[(1, 100)]);
        ours.push(Flight::new(5, 60));
        let mut theirs = list(&[(1, 100)]);
        theirs.push(Flight::new(5, 60));

        ours.merge(&theirs, &mut KeepOurs).unwrap();
        assert_eq!(ids(&ours), vec![1, 5]);
    }

    #[test]
    fn test_dry_run_leaves_membership() {
        let mut ours = list(&[(1, 100)]);
        let mut theirs = list(&[(1, 100)]);
        theirs.push(Flight::new(2, 100));

        ours.merge(&theirs, &mut DryRun::new()).unwrap();
        assert_eq!(ids(&ours), vec![1]);
    }

    #[test]
    fn test_merge_with_converts_remote_items() {
        #[derive(Debug)]
        struct Summary {
            id: u32,
            altitude: i32,
        }

        impl Identifiable for Summary {
            type Id = u32;

            fn id(&self) -> &u32 {
                &self.id
            }
        }

        impl Dirty for Summary {
            fn is_dirty(&self) -> bool {
                true
            }
        }

        let mut ours = list(&[(1, 100)]);
        let remote = vec![
            Summary { id: 1, altitude: 130 },
            Summary { id: 4, altitude: 70 },
        ];

        ours.merge_with(
            &remote,
            &mut KeepOurs,
            |s| Flight::new(s.id, s.altitude),
            |ours, theirs, strategy| ours.altitude.merge_value(&theirs.altitude, strategy),
        )
        .unwrap();

        assert_eq!(ids(&ours), vec![1, 4]);
        assert_eq!(*ours.read()[0].altitude.get(), 130);
    }

    #[test]
    fn test_dirty_tracks_membership_and_members() {
        let mut flights = list(&[(1, 100), (2, 100)]);
        assert!(!flights.is_dirty());

        flights.with_item_mut(&1, |f| f.altitude.set(10));
        assert!(flights.is_dirty());
        flights.mark_synced().unwrap();
        assert!(!flights.is_dirty());

        flights.remove(&2);
        assert!(flights.is_dirty());
        flights.update().unwrap();
        assert!(!flights.is_dirty());
    }

    #[test]
    fn test_set_ignores_order_and_duplicates() {
        let mut set: TrackedSet<Flight> =
            TrackedSet::from_items(&owner(), "flights", vec![Flight::new(1, 1), Flight::new(2, 2)]);
        set.update().unwrap();
        assert!(!set.insert(Flight::new(1, 5)));

        let a = set.remove(&1).unwrap();
        set.insert(a);
        assert_eq!(set.ids(), vec![2, 1]);
        assert!(!set.is_dirty());
    }

    #[test]
    fn test_list_order_is_state() {
        let mut flights = list(&[(1, 1), (2, 2)]);
        let first = flights.remove(&1).unwrap();
        flights.push(first);
        assert!(flights.is_dirty());
    }

    #[test]
    fn test_rebase_adopts_baseline_membership() {
        let mut ours = list(&[(1, 100), (2, 100)]);
        ours.with_item_mut(&1, |f| f.altitude.set(50));
        let baseline = list(&[(1, 80), (3, 100)]);

        ours.rebase(&baseline).unwrap();
        assert_eq!(ours.baseline_ids(), &[1, 3]);
        assert_eq!(ours.read()[0].altitude.baseline(), Some(&80));
    }

    #[test]
    fn test_merge_with_itself_is_a_no_op() {
        let mut ours = list(&[(1, 100)]);
        let alias = TrackedList {
            owner: ours.owner.clone(),
            field: ours.field,
            items: ours.handle(),
            baseline: Vec::new(),
            _membership: PhantomData,
        };
        ours.merge(&alias, &mut KeepTheirs).unwrap();
        assert_eq!(ids(&ours), vec![1]);
    }

    #[test]
    fn test_handle_sees_merged_members() {
        let mut ours = list(&[(1, 100)]);
        let handle = ours.handle();
        let mut theirs = list(&[(1, 100)]);
        theirs.push(Flight::new(2, 100));

        ours.merge(&theirs, &mut KeepTheirs).unwrap();
        assert_eq!(handle.len(), 2);
    }

    fn poison(items: SharedItems<Flight>) {
        let crashed = std::thread::spawn(move || {
            let _guard = items.write();
            panic!("writer crashed while holding the member lock");
        })
        .join();
        assert!(crashed.is_err());
    }

    #[test]
    fn test_poisoned_lock_fails_merge() {
        let mut ours = list(&[(1, 100)]);
        let theirs = list(&[(1, 100), (2, 100)]);
        poison(ours.handle());

        let result = ours.merge(&theirs, &mut KeepOurs);
        assert!(matches!(
            result,
            Err(MergeError::LockPoisoned { ref entity, ref field })
                if entity == "Mission m1" && field == "flights"
        ));
        assert!(matches!(ours.mark_synced(), Err(MergeError::LockPoisoned { .. })));

        // Plain reads recover the data.
        assert_eq!(ours.ids(), vec![1]);
        assert_eq!(ours.handle().len(), 1);
        assert!(!ours.is_dirty());
    }

    #[test]
    fn test_poisoned_remote_lock_fails_merge() {
        let mut ours = list(&[(1, 100)]);
        let theirs = list(&[(1, 100), (2, 100)]);
        poison(theirs.handle());

        let result = ours.merge(&theirs, &mut KeepOurs);
        assert!(matches!(result, Err(MergeError::LockPoisoned { .. })));
        assert_eq!(ids(&ours), vec![1]);
    }

    #[test]
    fn test_clone_is_deep() {
        let mut original = list(&[(1, 100)]);
        let copy = original.clone();
        original.push(Flight::new(2, 100));
        assert_eq!(copy.len(), 1);
    }
}
