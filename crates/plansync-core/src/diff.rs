//! Identity-based collection differences.
//!
//! Pure helpers used by tracked collections to classify members as added,
//! removed, or present on both sides. Everything here is O(|left|·|right|);
//! callers with large collections can pass an indexed `right` (a `HashSet`)
//! and a matching predicate to get linear behaviour.

use crate::mergeable::Identifiable;
use std::collections::HashSet;
use std::hash::Hash;

/// Check whether any element of `items` carries the identity `id`.
pub fn contains_id<'a, T, I>(items: I, id: &T::Id) -> bool
where
    T: Identifiable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items.into_iter().any(|item| item.id() == id)
}

/// Find the element of `items` carrying the identity `id`.
pub fn get_by_id<'a, T>(items: &'a [T], id: &T::Id) -> Option<&'a T>
where
    T: Identifiable,
{
    items.iter().find(|item| item.id() == id)
}

/// Position of the element carrying `id`, if any.
pub(crate) fn position_of<T>(items: &[T], id: &T::Id) -> Option<usize>
where
    T: Identifiable,
{
    items.iter().position(|item| item.id() == id)
}

/// Keys of every element of `left` for which `matches(element, right)` is false.
///
/// `key` projects the surviving elements into the returned values, so the
/// same function answers "which ids are new" and "which items were dropped".
///
/// # Examples
/// ```
/// use plansync_core::diff::difference;
///
/// let baseline = vec![1, 2, 3];
/// let current = vec![2, 3, 4];
/// let removed = difference(&baseline, &current, |id, right| right.contains(id), |id| *id);
/// assert_eq!(removed, vec![1]);
/// ```
pub fn difference<'a, L, R, K>(
    left: impl IntoIterator<Item = &'a L>,
    right: &R,
    matches: impl Fn(&L, &R) -> bool,
    key: impl Fn(&'a L) -> K,
) -> Vec<K>
where
    L: 'a,
    R: ?Sized,
{
    left.into_iter()
        .filter(|element| !matches(element, right))
        .map(key)
        .collect()
}

/// Identities in `left` that do not appear in `right`, in `left` order.
pub fn id_difference<Id>(left: &[Id], right: &[Id]) -> Vec<Id>
where
    Id: Eq + Hash + Clone,
{
    let index: HashSet<&Id> = right.iter().collect();
    difference(left, &index, |id, index| index.contains(id), Clone::clone)
}

/// Baseline identities split by whether they survived into `current`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdPartition<Id> {
    /// Present in both the baseline and `current`.
    pub retained: Vec<Id>,
    /// Present in the baseline, missing from `current`.
    pub removed: Vec<Id>,
}

/// Classify every baseline identity as retained or removed.
///
/// Each id of `baseline` lands in exactly one of the two lists.
pub fn partition_ids<Id>(baseline: &[Id], current: &[Id]) -> IdPartition<Id>
where
    Id: Eq + Hash + Clone,
{
    let index: HashSet<&Id> = current.iter().collect();
    let (retained, removed): (Vec<Id>, Vec<Id>) = baseline
        .iter()
        .cloned()
        .partition(|id| index.contains(id));
    IdPartition { retained, removed }
}
