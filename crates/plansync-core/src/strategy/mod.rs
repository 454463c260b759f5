//! Merge strategies: the policy consulted at every merge decision point.
//!
//! Tracked properties detect what happened (agreement, one-sided change,
//! conflict, addition, removal) and ask the strategy what to do about it. The
//! strategy answers with a decision; the property applies it. Strategies never
//! see or mutate properties directly, which keeps them object-safe and lets a
//! dry run observe a merge without changing anything.
//!
//! Built-in policies:
//! - [`DryRun`]: records conflicts, changes nothing
//! - [`KeepOurs`]: local edits win conflicts, remote additions are accepted
//! - [`KeepTheirs`]: remote edits win conflicts, including deletions

mod dry_run;
mod keep;
mod observed;

pub use dry_run::DryRun;
pub use keep::{KeepOurs, KeepTheirs};
pub use observed::Observed;

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Where a decision is being made: the owning entity and the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Site<'a> {
    pub entity: &'a str,
    pub field: &'a str,
}

impl Display for Site<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.entity, self.field)
    }
}

/// Which side's value a decision keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Ours,
    Theirs,
}

/// Which side deleted an item the other side modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Removal {
    /// We deleted it locally; they edited it. The remote item can be materialized.
    DeletedLocally,
    /// They deleted it remotely; we edited it.
    DeletedRemotely,
}

/// Outcome of a delete/modify conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalResolution {
    /// Keep local membership as it is.
    Leave,
    /// Materialize the remote item and insert it locally.
    Resurrect,
    /// Remove the local item.
    Delete,
}

/// Policy invoked by tracked properties. Never called by application code.
pub trait MergeStrategy {
    /// A non-conflicting outcome was found; `proposed` is the side the merge
    /// algorithm would keep. Returning `Some(side)` makes the property accept
    /// that side's value as synchronized (`update`); `None` changes nothing.
    fn update_value(&mut self, site: &Site<'_>, proposed: Side) -> Option<Side>;

    /// Both sides diverged from the baseline to different values.
    fn resolve_value_conflict(
        &mut self,
        site: &Site<'_>,
        ours: &dyn Debug,
        theirs: &dyn Debug,
    ) -> Option<Side>;

    /// A remote item is new since the baseline. Returns whether to insert it.
    fn add_item(&mut self, site: &Site<'_>, item: &dyn Debug) -> bool;

    /// A local item without local edits was deleted remotely. Returns whether
    /// to remove it.
    fn remove_item(&mut self, site: &Site<'_>, item: &dyn Debug) -> bool;

    /// One side deleted an item the other side modified.
    fn resolve_item_removed_conflict(
        &mut self,
        site: &Site<'_>,
        item: &dyn Debug,
        removal: Removal,
    ) -> RemovalResolution;
}

impl<S: MergeStrategy + ?Sized> MergeStrategy for &mut S {
    fn update_value(&mut self, site: &Site<'_>, proposed: Side) -> Option<Side> {
        (**self).update_value(site, proposed)
    }

    fn resolve_value_conflict(
        &mut self,
        site: &Site<'_>,
        ours: &dyn Debug,
        theirs: &dyn Debug,
    ) -> Option<Side> {
        (**self).resolve_value_conflict(site, ours, theirs)
    }

    fn add_item(&mut self, site: &Site<'_>, item: &dyn Debug) -> bool {
        (**self).add_item(site, item)
    }

    fn remove_item(&mut self, site: &Site<'_>, item: &dyn Debug) -> bool {
        (**self).remove_item(site, item)
    }

    fn resolve_item_removed_conflict(
        &mut self,
        site: &Site<'_>,
        item: &dyn Debug,
        removal: Removal,
    ) -> RemovalResolution {
        (**self).resolve_item_removed_conflict(site, item, removal)
    }
}

/// Kind of recorded conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConflictKind {
    /// Both sides changed a value.
    Value,
    /// We deleted an item they modified.
    DeletedLocally,
    /// They deleted an item we modified.
    DeletedRemotely,
}

impl From<Removal> for ConflictKind {
    fn from(removal: Removal) -> Self {
        match removal {
            Removal::DeletedLocally => ConflictKind::DeletedLocally,
            Removal::DeletedRemotely => ConflictKind::DeletedRemotely,
        }
    }
}

/// A conflict observed during a merge, rendered for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    /// Owning entity label.
    pub entity: String,
    /// Field name on the owning entity.
    pub field: String,
    pub kind: ConflictKind,
    /// Our value (`{:?}`), or `<deleted>` when we deleted the item.
    pub ours: String,
    /// Their value (`{:?}`), or `<deleted>` when they deleted the item.
    pub theirs: String,
}

pub(crate) const DELETED: &str = "<deleted>";

impl Conflict {
    pub fn value(site: &Site<'_>, ours: &dyn Debug, theirs: &dyn Debug) -> Self {
        Self {
            entity: site.entity.to_string(),
            field: site.field.to_string(),
            kind: ConflictKind::Value,
            ours: format!("{:?}", ours),
            theirs: format!("{:?}", theirs),
        }
    }

    pub fn removal(site: &Site<'_>, item: &dyn Debug, removal: Removal) -> Self {
        let rendered = format!("{:?}", item);
        let (ours, theirs) = match removal {
            Removal::DeletedLocally => (DELETED.to_string(), rendered),
            Removal::DeletedRemotely => (rendered, DELETED.to_string()),
        };
        Self {
            entity: site.entity.to_string(),
            field: site.field.to_string(),
            kind: removal.into(),
            ours,
            theirs,
        }
    }
}

impl Display for Conflict {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}: ours={} theirs={}",
            self.entity, self.field, self.ours, self.theirs
        )
    }
}

/// Conflicts collected by a dry run, ready to show to a user.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConflictReport {
    pub conflicts: Vec<Conflict>,
}

impl ConflictReport {
    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    /// Conflicts recorded against one entity label.
    pub fn for_entity<'a>(&'a self, entity: &'a str) -> impl Iterator<Item = &'a Conflict> + 'a {
        self.conflicts.iter().filter(move |c| c.entity == entity)
    }
}

impl Display for ConflictReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for conflict in &self.conflicts {
            writeln!(f, "{}", conflict)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
#[error("Unknown merge strategy '{0}': expected dry-run, keep-ours or keep-theirs")]
pub struct UnknownStrategy(String);

/// Names of the built-in policies, for configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    DryRun,
    #[default]
    KeepOurs,
    KeepTheirs,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::DryRun => "dry-run",
            StrategyKind::KeepOurs => "keep-ours",
            StrategyKind::KeepTheirs => "keep-theirs",
        }
    }

    /// Whether a merge under this policy mutates the local graph.
    pub fn commits(&self) -> bool {
        !matches!(self, StrategyKind::DryRun)
    }
}

impl Display for StrategyKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dry-run" | "dryrun" => Ok(StrategyKind::DryRun),
            "keep-ours" | "ours" => Ok(StrategyKind::KeepOurs),
            "keep-theirs" | "theirs" => Ok(StrategyKind::KeepTheirs),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}
