use super::label;
use chrono::{DateTime, Utc};
use plansync_core::codec::{self, Deserializable, ReadContext, Serializable, WireEnum, WriteContext};
use plansync_core::mergeable::Result;
use plansync_core::{
    Dirty, Identifiable, MergeStrategy, Mergeable, PropertyOwner, SyncContext, SyncEq,
    TrackedString, TrackedValue, any_dirty,
};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRole {
    Owner,
    Editor,
    Viewer,
}

impl SyncEq for MemberRole {
    fn sync_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl WireEnum for MemberRole {
    fn name(&self) -> &'static str {
        match self {
            MemberRole::Owner => "Owner",
            MemberRole::Editor => "Editor",
            MemberRole::Viewer => "Viewer",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "Owner" => Some(MemberRole::Owner),
            "Editor" => Some(MemberRole::Editor),
            "Viewer" => Some(MemberRole::Viewer),
            _ => None,
        }
    }
}

/// A user with access to the project.
#[derive(Clone)]
pub struct Member {
    id: Uuid,
    pub display_name: TrackedString,
    pub role: TrackedValue<MemberRole>,
    pub joined_at: TrackedValue<DateTime<Utc>>,
}

impl Member {
    pub fn new(
        sync: &SyncContext,
        id: Uuid,
        display_name: &str,
        role: MemberRole,
        joined_at: DateTime<Utc>,
    ) -> Self {
        let owner = PropertyOwner::new(sync, label("Member", &id));
        Self {
            id,
            display_name: TrackedValue::new(&owner, "displayName", display_name.to_string()),
            role: TrackedValue::new(&owner, "role", role),
            joined_at: TrackedValue::new(&owner, "joinedAt", joined_at),
        }
    }
}

impl Identifiable for Member {
    type Id = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }
}

impl Dirty for Member {
    fn is_dirty(&self) -> bool {
        any_dirty(&[&self.display_name, &self.role, &self.joined_at])
    }
}

impl Mergeable for Member {
    fn merge(&mut self, remote: &Self, strategy: &mut dyn MergeStrategy) -> Result<()> {
        self.display_name.merge(&remote.display_name, strategy)?;
        self.role.merge(&remote.role, strategy)?;
        self.joined_at.merge(&remote.joined_at, strategy)
    }

    fn mark_synced(&mut self) -> Result<()> {
        self.display_name.mark_synced()?;
        self.role.mark_synced()?;
        self.joined_at.mark_synced()
    }

    fn rebase(&mut self, baseline: &Self) -> Result<()> {
        self.display_name.rebase(&baseline.display_name)?;
        self.role.rebase(&baseline.role)?;
        self.joined_at.rebase(&baseline.joined_at)
    }
}

impl Serializable for Member {
    fn write_fields(&self, ctx: &mut WriteContext<'_>) -> codec::Result<()> {
        ctx.write_value("id", &self.id)?;
        ctx.write_value("displayName", self.display_name.get())?;
        ctx.write_enum("role", self.role.get())?;
        ctx.write_value("joinedAt", self.joined_at.get())
    }
}

impl Deserializable for Member {
    fn from_context(ctx: &ReadContext<'_>) -> codec::Result<Self> {
        Ok(Self::new(
            ctx.sync_context(),
            ctx.read_value("id")?,
            &ctx.read_value::<String>("displayName")?,
            ctx.read_enum("role")?,
            ctx.read_value("joinedAt")?,
        ))
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Member {} {:?}", self.id, self.display_name.get())
    }
}
