//! Sync session: load → rebase → preview or merge → serialize.
//!
//! A session holds the local ("ours") and remote ("theirs") project graphs,
//! both rebased onto the last synchronized baseline document when one exists.
//! Without a baseline every property counts as never synchronized.

use crate::model::Project;
use plansync_core::codec::{self, CodecError, CodecOptions};
use plansync_core::{
    ConflictReport, DryRun, EventBus, Identifiable, KeepOurs, KeepTheirs, MergeError,
    MergeStrategy, Mergeable, Observed, StrategyKind, SyncContext,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to decode {role} document: {source}")]
    Decode {
        role: &'static str,
        source: CodecError,
    },

    #[error("Failed to encode merged document: {0}")]
    Encode(#[source] CodecError),

    #[error("Merge failed: {0}")]
    Merge(#[from] MergeError),
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// Outcome of [`SyncSession::merge`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeSummary {
    pub strategy: StrategyKind,
    /// Whether the local graph was changed and re-baselined.
    pub committed: bool,
    /// Conflicts found before the policy resolved them.
    pub conflicts: ConflictReport,
}

/// What `check` found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckSummary {
    pub project: String,
    pub missions: usize,
    pub flights: usize,
    pub members: usize,
}

pub struct SyncSession {
    local: Project,
    remote: Project,
    events: Arc<EventBus>,
}

fn decode(role: &'static str, bytes: &[u8], sync: &SyncContext) -> Result<Project> {
    codec::from_slice(bytes, sync).map_err(|source| SessionError::Decode { role, source })
}

impl SyncSession {
    /// Decode the three documents and attach the baseline to both sides.
    pub fn open(
        sync: &SyncContext,
        local: &[u8],
        remote: &[u8],
        baseline: Option<&[u8]>,
    ) -> Result<Self> {
        let mut local = decode("local", local, sync)?;
        let mut remote = decode("remote", remote, sync)?;

        match baseline {
            Some(bytes) => {
                let baseline = decode("baseline", bytes, sync)?;
                local.rebase(&baseline)?;
                remote.rebase(&baseline)?;
                info!("Rebased local and remote onto baseline of {}", baseline.id());
            }
            None => info!("No baseline document, every change counts as unsynchronized"),
        }

        Ok(Self {
            local,
            remote,
            events: Arc::new(EventBus::new()),
        })
    }

    pub fn local(&self) -> &Project {
        &self.local
    }

    pub fn remote(&self) -> &Project {
        &self.remote
    }

    /// Bus that receives one event per strategy decision.
    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// Conflicts a merge would hit. Leaves the local graph untouched.
    pub fn preview(&mut self) -> Result<ConflictReport> {
        let mut strategy = Observed::new(DryRun::new(), &self.events);
        self.local.merge(&self.remote, &mut strategy)?;
        let report = strategy.into_inner().into_report();
        info!("Dry run found {} conflict(s)", report.len());
        Ok(report)
    }

    /// Merge the remote graph into the local one under `strategy`.
    ///
    /// Committing policies re-baseline the whole local graph afterwards.
    pub fn merge(&mut self, strategy: StrategyKind) -> Result<MergeSummary> {
        let conflicts = self.preview()?;
        match strategy {
            StrategyKind::DryRun => {}
            StrategyKind::KeepOurs => self.commit(KeepOurs)?,
            StrategyKind::KeepTheirs => self.commit(KeepTheirs)?,
        }
        Ok(MergeSummary {
            strategy,
            committed: strategy.commits(),
            conflicts,
        })
    }

    fn commit<S: MergeStrategy>(&mut self, strategy: S) -> Result<()> {
        let mut strategy = Observed::new(strategy, &self.events);
        self.local.merge(&self.remote, &mut strategy)?;
        self.local.mark_synced()?;
        debug!(
            "Merged into {}: {} mission(s), {} member(s)",
            self.local.id(),
            self.local.missions.len(),
            self.local.members.len()
        );
        Ok(())
    }

    /// Serialize the local graph.
    pub fn document(&self, options: CodecOptions) -> Result<Vec<u8>> {
        codec::to_vec(&self.local, options).map_err(SessionError::Encode)
    }
}

/// Decode a document, re-encode it and decode the result again.
///
/// Fails on the first structural error, and if the second decode disagrees
/// with the first.
pub fn check(sync: &SyncContext, bytes: &[u8]) -> Result<CheckSummary> {
    let project = decode("checked", bytes, sync)?;
    let encoded = codec::to_vec(&project, CodecOptions::compact()).map_err(SessionError::Encode)?;
    let again = decode("re-encoded", &encoded, sync)?;

    let summary = summarize(&project);
    if summarize(&again) != summary {
        return Err(SessionError::Encode(CodecError::InvalidValue {
            path: "$".to_string(),
            reason: "document does not survive a round trip".to_string(),
        }));
    }
    Ok(summary)
}

fn summarize(project: &Project) -> CheckSummary {
    CheckSummary {
        project: project.name.get().clone(),
        missions: project.missions.len(),
        flights: project.flight_count(),
        members: project.members.len(),
    }
}
