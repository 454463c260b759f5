use super::{GEOMETRY_TYPES, Geometry, Member, Mission, label};
use plansync_core::codec::{self, Deserializable, ReadContext, Serializable, WriteContext};
use plansync_core::mergeable::Result;
use plansync_core::{
    Dirty, Identifiable, MergeError, MergeStrategy, Mergeable, PropertyOwner, SyncContext,
    TrackedBool, TrackedInt, TrackedList, TrackedSet, TrackedString, TrackedValue, any_dirty,
};
use std::fmt;
use uuid::Uuid;

/// Root of a plansync document.
#[derive(Clone)]
pub struct Project {
    id: Uuid,
    owner: PropertyOwner,
    pub name: TrackedString,
    pub description: TrackedString,
    pub archived: TrackedBool,
    /// Home point `[lat, lon, alt]` flights return to.
    pub home: TrackedValue<[f64; 3]>,
    pub boundary: TrackedValue<Geometry>,
    /// Regulatory altitude ceiling, metres.
    pub max_altitude: TrackedInt,
    pub missions: TrackedList<Mission>,
    pub members: TrackedSet<Member>,
}

impl Project {
    pub fn new(
        sync: &SyncContext,
        id: Uuid,
        name: &str,
        home: [f64; 3],
        boundary: Geometry,
    ) -> Self {
        let owner = PropertyOwner::new(sync, label("Project", &id));
        Self {
            id,
            name: TrackedValue::new(&owner, "name", name.to_string()),
            description: TrackedValue::new(&owner, "description", String::new()),
            archived: TrackedValue::new(&owner, "archived", false),
            home: TrackedValue::new(&owner, "home", home),
            boundary: TrackedValue::new(&owner, "boundary", boundary),
            max_altitude: TrackedValue::new(&owner, "maxAltitude", 120),
            missions: TrackedList::new(&owner, "missions"),
            members: TrackedSet::new(&owner, "members"),
            owner,
        }
    }

    /// Number of flights across all missions.
    pub fn flight_count(&self) -> usize {
        self.missions.read().iter().map(|m| m.flights.len()).sum()
    }

    fn same_project(&self, other: &Project) -> Result<()> {
        if self.id == other.id {
            Ok(())
        } else {
            Err(MergeError::Entity {
                entity: self.owner.label().to_string(),
                message: format!("other snapshot belongs to project {}", other.id),
            })
        }
    }
}

impl Identifiable for Project {
    type Id = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }
}

impl Dirty for Project {
    fn is_dirty(&self) -> bool {
        any_dirty(&[
            &self.name,
            &self.description,
            &self.archived,
            &self.home,
            &self.boundary,
            &self.max_altitude,
            &self.missions,
            &self.members,
        ])
    }
}

impl Mergeable for Project {
    fn merge(&mut self, remote: &Self, strategy: &mut dyn MergeStrategy) -> Result<()> {
        self.same_project(remote)?;
        self.name.merge(&remote.name, strategy)?;
        self.description.merge(&remote.description, strategy)?;
        self.archived.merge(&remote.archived, strategy)?;
        self.home.merge(&remote.home, strategy)?;
        self.boundary.merge(&remote.boundary, strategy)?;
        self.max_altitude.merge(&remote.max_altitude, strategy)?;
        self.missions.merge(&remote.missions, strategy)?;
        self.members.merge(&remote.members, strategy)
    }

    fn mark_synced(&mut self) -> Result<()> {
        self.name.mark_synced()?;
        self.description.mark_synced()?;
        self.archived.mark_synced()?;
        self.home.mark_synced()?;
        self.boundary.mark_synced()?;
        self.max_altitude.mark_synced()?;
        self.missions.mark_synced()?;
        self.members.mark_synced()
    }

    fn rebase(&mut self, baseline: &Self) -> Result<()> {
        self.same_project(baseline)?;
        self.name.rebase(&baseline.name)?;
        self.description.rebase(&baseline.description)?;
        self.archived.rebase(&baseline.archived)?;
        self.home.rebase(&baseline.home)?;
        self.boundary.rebase(&baseline.boundary)?;
        self.max_altitude.rebase(&baseline.max_altitude)?;
        self.missions.rebase(&baseline.missions)?;
        self.members.rebase(&baseline.members)
    }
}

impl Serializable for Project {
    fn write_fields(&self, ctx: &mut WriteContext<'_>) -> codec::Result<()> {
        ctx.write_value("id", &self.id)?;
        ctx.write_value("name", self.name.get())?;
        ctx.write_value("description", self.description.get())?;
        ctx.write_value("archived", self.archived.get())?;
        ctx.write_value("home", self.home.get())?;
        ctx.write_polymorphic("boundary", self.boundary.get())?;
        ctx.write_value("maxAltitude", self.max_altitude.get())?;
        ctx.write_list("missions", self.missions.read().iter())?;
        ctx.write_list("members", self.members.read().iter())
    }
}

impl Deserializable for Project {
    fn from_context(ctx: &ReadContext<'_>) -> codec::Result<Self> {
        let mut project = Self::new(
            ctx.sync_context(),
            ctx.read_value("id")?,
            &ctx.read_value::<String>("name")?,
            ctx.read_value("home")?,
            ctx.read_polymorphic("boundary", &GEOMETRY_TYPES)?,
        );
        project
            .description
            .set(ctx.read_optional("description")?.unwrap_or_default());
        project.archived.set(ctx.read_optional("archived")?.unwrap_or(false));
        if let Some(max_altitude) = ctx.read_optional("maxAltitude")? {
            project.max_altitude.set(max_altitude);
        }
        for mission in ctx.read_list::<Mission>("missions")? {
            project.missions.push(mission);
        }
        for member in ctx.read_list::<Member>("members")? {
            let id = *member.id();
            if !project.members.insert(member) {
                return Err(codec::CodecError::InvalidValue {
                    path: ctx.field_path("members"),
                    reason: format!("duplicate member {}", id),
                });
            }
        }
        Ok(project)
    }
}

impl fmt::Debug for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Project {} {:?}", self.id, self.name.get())
    }
}
