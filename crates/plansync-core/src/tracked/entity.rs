//! Tracked object property holding a nested entity.

use crate::context::PropertyOwner;
use crate::mergeable::{Dirty, Identifiable, Mergeable, Result};
use crate::strategy::{MergeStrategy, Side, Site};
use std::fmt::{self, Debug};
use tracing::trace;

/// A field holding a nested, identifiable entity.
///
/// When both sides hold the entity with the same identity, the merge recurses
/// into it field by field instead of treating it as one value. When the
/// identities differ the field merges like a scalar over identities, and a
/// decision for their side replaces the entity wholesale.
///
/// The baseline is the identity of the entity last synchronized.
#[derive(Clone)]
pub struct TrackedEntity<T: Identifiable> {
    owner: PropertyOwner,
    field: &'static str,
    current: T,
    baseline: Option<T::Id>,
}

impl<T> TrackedEntity<T>
where
    T: Mergeable + Identifiable + Clone + Debug,
{
    pub fn new(owner: &PropertyOwner, field: &'static str, entity: T) -> Self {
        Self {
            owner: owner.clone(),
            field,
            current: entity,
            baseline: None,
        }
    }

    pub fn get(&self) -> &T {
        &self.current
    }

    /// Edit the nested entity in place.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.current
    }

    /// Replace the nested entity. Does not touch the baseline.
    pub fn set(&mut self, entity: T) {
        self.current = entity;
    }

    pub fn baseline_id(&self) -> Option<&T::Id> {
        self.baseline.as_ref()
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Accept `entity` as the synchronized occupant of this field.
    pub fn update(&mut self, entity: T) -> Result<()> {
        self.owner.check_access(self.field)?;
        self.commit(entity);
        Ok(())
    }

    /// Three-way merge of `remote` into this property.
    pub fn merge_entity(&mut self, remote: &T, strategy: &mut dyn MergeStrategy) -> Result<()> {
        self.owner.check_access(self.field)?;

        if self.current.id() == remote.id() {
            trace!(
                "{}.{}: same entity {:?}, merging fields",
                self.owner.label(),
                self.field,
                remote.id()
            );
            return self.current.merge(remote, strategy);
        }

        let decision = {
            let site = Site {
                entity: self.owner.label(),
                field: self.field,
            };
            let ours_changed = self.baseline.as_ref() != Some(self.current.id());
            let theirs_changed = self.baseline.as_ref() != Some(remote.id());

            match (ours_changed, theirs_changed) {
                (true, false) => strategy.update_value(&site, Side::Ours),
                (false, true) => strategy.update_value(&site, Side::Theirs),
                (true, true) => strategy.resolve_value_conflict(&site, &self.current, remote),
                // Different identities cannot both equal the baseline.
                (false, false) => None,
            }
        };

        match decision {
            Some(Side::Ours) => self.baseline = Some(self.current.id().clone()),
            Some(Side::Theirs) => self.commit(remote.clone()),
            None => {}
        }
        Ok(())
    }

    fn commit(&mut self, entity: T) {
        self.baseline = Some(entity.id().clone());
        self.current = entity;
    }
}

impl<T> Dirty for TrackedEntity<T>
where
    T: Identifiable + Dirty,
{
    fn is_dirty(&self) -> bool {
        self.baseline.as_ref() != Some(self.current.id()) || self.current.is_dirty()
    }
}

impl<T> Mergeable for TrackedEntity<T>
where
    T: Mergeable + Identifiable + Clone + Debug,
{
    fn merge(&mut self, remote: &Self, strategy: &mut dyn MergeStrategy) -> Result<()> {
        self.merge_entity(&remote.current, strategy)
    }

    fn mark_synced(&mut self) -> Result<()> {
        self.owner.check_access(self.field)?;
        self.baseline = Some(self.current.id().clone());
        self.current.mark_synced()
    }

    fn rebase(&mut self, baseline: &Self) -> Result<()> {
        self.owner.check_access(self.field)?;
        self.baseline = Some(baseline.current.id().clone());
        if self.current.id() == baseline.current.id() {
            self.current.rebase(&baseline.current)?;
        }
        Ok(())
    }
}

impl<T: Identifiable + Debug> Debug for TrackedEntity<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.current.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SyncContext;
    use crate::mergeable::any_dirty;
    use crate::strategy::{DryRun, KeepOurs, KeepTheirs};
    use crate::tracked::TrackedValue;

    #[derive(Clone)]
    struct Camera {
        id: u32,
        model: TrackedValue<String>,
        iso: TrackedValue<i32>,
    }

    impl Camera {
        fn new(id: u32, model: &str, iso: i32) -> Self {
            let owner = PropertyOwner::new(&SyncContext::current(), format!("Camera {}", id));
            Self {
                id,
                model: TrackedValue::new(&owner, "model", model.to_string()),
                iso: TrackedValue::new(&owner, "iso", iso),
            }
        }
    }

    impl Debug for Camera {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Camera({})", self.id)
        }
    }

    impl Identifiable for Camera {
        type Id = u32;

        fn id(&self) -> &u32 {
            &self.id
        }
    }

    impl Dirty for Camera {
        fn is_dirty(&self) -> bool {
            any_dirty(&[&self.model, &self.iso])
        }
    }

    impl Mergeable for Camera {
        fn merge(&mut self, remote: &Self, strategy: &mut dyn MergeStrategy) -> Result<()> {
            self.model.merge(&remote.model, strategy)?;
            self.iso.merge(&remote.iso, strategy)
        }

        fn mark_synced(&mut self) -> Result<()> {
            self.model.mark_synced()?;
            self.iso.mark_synced()
        }

        fn rebase(&mut self, baseline: &Self) -> Result<()> {
            self.model.rebase(&baseline.model)?;
            self.iso.rebase(&baseline.iso)
        }
    }

    fn synced(camera: Camera) -> TrackedEntity<Camera> {
        let owner = PropertyOwner::new(&SyncContext::current(), "Mission m1");
        let mut property = TrackedEntity::new(&owner, "camera", camera);
        property.mark_synced().unwrap();
        property
    }

    #[test]
    fn test_same_identity_merges_fields_independently() {
        let mut ours = synced(Camera::new(1, "M3E", 100));
        let mut theirs = synced(Camera::new(1, "M3E", 100));
        ours.get_mut().model.set("M30T".into());
        theirs.get_mut().iso.set(400);

        let mut dry = DryRun::new();
        ours.merge(&theirs, &mut dry).unwrap();
        assert!(!dry.has_conflicts());

        ours.merge(&theirs, &mut KeepOurs).unwrap();
        assert_eq!(ours.get().model.get(), "M30T");
        assert_eq!(*ours.get().iso.get(), 400);
        assert_eq!(ours.baseline_id(), Some(&1));
    }

    #[test]
    fn test_remote_replacement_is_adopted() {
        let mut ours = synced(Camera::new(1, "M3E", 100));
        let theirs = TrackedEntity::new(&ours.owner, "camera", Camera::new(2, "H20", 200));

        ours.merge(&theirs, &mut KeepOurs).unwrap();
        assert_eq!(ours.get().id, 2);
        assert_eq!(ours.baseline_id(), Some(&2));
    }

    #[test]
    fn test_both_replaced_is_a_conflict() {
        let mut ours = synced(Camera::new(1, "M3E", 100));
        ours.set(Camera::new(3, "P1", 100));
        let theirs = synced(Camera::new(2, "H20", 200));

        let mut dry = DryRun::new();
        ours.merge(&theirs, &mut dry).unwrap();
        assert_eq!(dry.conflicts().len(), 1);
        assert_eq!(dry.conflicts()[0].ours, "Camera(3)");
        assert_eq!(dry.conflicts()[0].theirs, "Camera(2)");

        ours.merge(&theirs, &mut KeepTheirs).unwrap();
        assert_eq!(ours.get().id, 2);
    }

    #[test]
    fn test_dirty_propagates_from_nested_entity() {
        let mut property = synced(Camera::new(1, "M3E", 100));
        assert!(!property.is_dirty());
        property.get_mut().iso.set(800);
        assert!(property.is_dirty());
        property.mark_synced().unwrap();
        assert!(!property.is_dirty());
    }
}
