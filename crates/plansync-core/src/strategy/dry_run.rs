//! Dry-run policy: observe a merge without changing anything.

use super::{Conflict, ConflictReport, MergeStrategy, Removal, RemovalResolution, Side, Site};
use std::fmt::Debug;
use tracing::debug;

/// Records every conflict and declines every mutation.
///
/// Run a merge under `DryRun` to preview the conflicts a real merge would hit,
/// then pick a committing policy and merge again.
#[derive(Debug, Default)]
pub struct DryRun {
    conflicts: Vec<Conflict>,
}

impl DryRun {
    pub fn new() -> Self {
        Self::default()
    }

    /// Conflicts recorded so far, in the order they were found.
    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    pub fn into_report(self) -> ConflictReport {
        ConflictReport {
            conflicts: self.conflicts,
        }
    }
}

impl MergeStrategy for DryRun {
    fn update_value(&mut self, _site: &Site<'_>, _proposed: Side) -> Option<Side> {
        None
    }

    fn resolve_value_conflict(
        &mut self,
        site: &Site<'_>,
        ours: &dyn Debug,
        theirs: &dyn Debug,
    ) -> Option<Side> {
        let conflict = Conflict::value(site, ours, theirs);
        debug!("Dry run recorded conflict: {}", conflict);
        self.conflicts.push(conflict);
        None
    }

    fn add_item(&mut self, _site: &Site<'_>, _item: &dyn Debug) -> bool {
        false
    }

    fn remove_item(&mut self, _site: &Site<'_>, _item: &dyn Debug) -> bool {
        false
    }

    fn resolve_item_removed_conflict(
        &mut self,
        site: &Site<'_>,
        item: &dyn Debug,
        removal: Removal,
    ) -> RemovalResolution {
        let conflict = Conflict::removal(site, item, removal);
        debug!("Dry run recorded conflict: {}", conflict);
        self.conflicts.push(conflict);
        RemovalResolution::Leave
    }
}
