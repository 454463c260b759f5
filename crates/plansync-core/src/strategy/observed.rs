//! Strategy decorator that publishes every decision on an [`EventBus`].

use super::{MergeStrategy, Removal, RemovalResolution, Side, Site};
use crate::events::{EventBus, MergeEvent};
use std::fmt::Debug;

/// Wraps a strategy and emits one [`MergeEvent`] per decision it takes.
pub struct Observed<'a, S> {
    inner: S,
    bus: &'a EventBus,
}

impl<'a, S: MergeStrategy> Observed<'a, S> {
    pub fn new(inner: S, bus: &'a EventBus) -> Self {
        Self { inner, bus }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: MergeStrategy> MergeStrategy for Observed<'_, S> {
    fn update_value(&mut self, site: &Site<'_>, proposed: Side) -> Option<Side> {
        let side = self.inner.update_value(site, proposed);
        self.bus.emit(MergeEvent::ValueUpdated {
            entity: site.entity.to_string(),
            field: site.field.to_string(),
            proposed,
            side,
        });
        side
    }

    fn resolve_value_conflict(
        &mut self,
        site: &Site<'_>,
        ours: &dyn Debug,
        theirs: &dyn Debug,
    ) -> Option<Side> {
        let side = self.inner.resolve_value_conflict(site, ours, theirs);
        self.bus.emit(MergeEvent::ValueConflict {
            entity: site.entity.to_string(),
            field: site.field.to_string(),
            ours: format!("{:?}", ours),
            theirs: format!("{:?}", theirs),
            side,
        });
        side
    }

    fn add_item(&mut self, site: &Site<'_>, item: &dyn Debug) -> bool {
        let accepted = self.inner.add_item(site, item);
        self.bus.emit(MergeEvent::ItemAdded {
            entity: site.entity.to_string(),
            field: site.field.to_string(),
            item: format!("{:?}", item),
            accepted,
        });
        accepted
    }

    fn remove_item(&mut self, site: &Site<'_>, item: &dyn Debug) -> bool {
        let accepted = self.inner.remove_item(site, item);
        self.bus.emit(MergeEvent::ItemRemoved {
            entity: site.entity.to_string(),
            field: site.field.to_string(),
            item: format!("{:?}", item),
            accepted,
        });
        accepted
    }

    fn resolve_item_removed_conflict(
        &mut self,
        site: &Site<'_>,
        item: &dyn Debug,
        removal: Removal,
    ) -> RemovalResolution {
        let resolution = self.inner.resolve_item_removed_conflict(site, item, removal);
        self.bus.emit(MergeEvent::RemovalConflict {
            entity: site.entity.to_string(),
            field: site.field.to_string(),
            item: format!("{:?}", item),
            removal,
            resolution: format!("{:?}", resolution),
        });
        resolution
    }
}
