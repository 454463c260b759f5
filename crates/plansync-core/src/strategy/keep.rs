//! Committing policies: keep ours or keep theirs on conflict.

use super::{MergeStrategy, Removal, RemovalResolution, Side, Site};
use std::fmt::Debug;
use tracing::trace;

/// Local edits win.
///
/// Non-conflicting outcomes are accepted as proposed, so remote-only changes
/// are still adopted. Delete/modify conflicts leave local membership alone:
/// our deletion stands, and so does our edited copy of an item they deleted.
/// Remote additions are never conflicts and are always inserted.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeepOurs;

impl MergeStrategy for KeepOurs {
    fn update_value(&mut self, _site: &Site<'_>, proposed: Side) -> Option<Side> {
        Some(proposed)
    }

    fn resolve_value_conflict(
        &mut self,
        site: &Site<'_>,
        ours: &dyn Debug,
        theirs: &dyn Debug,
    ) -> Option<Side> {
        trace!("{}: keeping ours {:?} over {:?}", site, ours, theirs);
        Some(Side::Ours)
    }

    fn add_item(&mut self, _site: &Site<'_>, _item: &dyn Debug) -> bool {
        true
    }

    fn remove_item(&mut self, _site: &Site<'_>, _item: &dyn Debug) -> bool {
        true
    }

    fn resolve_item_removed_conflict(
        &mut self,
        site: &Site<'_>,
        item: &dyn Debug,
        removal: Removal,
    ) -> RemovalResolution {
        trace!("{}: {:?} conflict on {:?}, keeping ours", site, removal, item);
        RemovalResolution::Leave
    }
}

/// Remote edits win.
///
/// Every value outcome, conflicting or not, settles on their value. A remote
/// edit resurrects an item we deleted; a remote deletion removes an item even
/// if we edited it.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeepTheirs;

impl MergeStrategy for KeepTheirs {
    fn update_value(&mut self, _site: &Site<'_>, _proposed: Side) -> Option<Side> {
        Some(Side::Theirs)
    }

    fn resolve_value_conflict(
        &mut self,
        site: &Site<'_>,
        ours: &dyn Debug,
        theirs: &dyn Debug,
    ) -> Option<Side> {
        trace!("{}: taking theirs {:?} over {:?}", site, theirs, ours);
        Some(Side::Theirs)
    }

    fn add_item(&mut self, _site: &Site<'_>, _item: &dyn Debug) -> bool {
        true
    }

    fn remove_item(&mut self, _site: &Site<'_>, _item: &dyn Debug) -> bool {
        true
    }

    fn resolve_item_removed_conflict(
        &mut self,
        site: &Site<'_>,
        item: &dyn Debug,
        removal: Removal,
    ) -> RemovalResolution {
        trace!("{}: {:?} conflict on {:?}, taking theirs", site, removal, item);
        match removal {
            Removal::DeletedLocally => RemovalResolution::Resurrect,
            Removal::DeletedRemotely => RemovalResolution::Delete,
        }
    }
}
