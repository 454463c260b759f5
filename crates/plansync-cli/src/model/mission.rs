use super::{CameraProfile, Flight, GEOMETRY_TYPES, Geometry, label};
use plansync_core::codec::{self, Deserializable, ReadContext, Serializable, WireEnum, WriteContext};
use plansync_core::mergeable::Result;
use plansync_core::{
    Dirty, Identifiable, MergeStrategy, Mergeable, PropertyOwner, SyncContext, SyncEq,
    TrackedEntity, TrackedList, TrackedString, TrackedValue, any_dirty,
};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionStatus {
    Planned,
    Ready,
    Flown,
    Archived,
}

impl SyncEq for MissionStatus {
    fn sync_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl WireEnum for MissionStatus {
    fn name(&self) -> &'static str {
        match self {
            MissionStatus::Planned => "Planned",
            MissionStatus::Ready => "Ready",
            MissionStatus::Flown => "Flown",
            MissionStatus::Archived => "Archived",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "Planned" => Some(MissionStatus::Planned),
            "Ready" => Some(MissionStatus::Ready),
            "Flown" => Some(MissionStatus::Flown),
            "Archived" => Some(MissionStatus::Archived),
            _ => None,
        }
    }
}

/// A survey of one area with one camera, flown as one or more flights.
#[derive(Clone)]
pub struct Mission {
    id: Uuid,
    pub name: TrackedString,
    pub description: TrackedString,
    pub status: TrackedValue<MissionStatus>,
    pub area: TrackedValue<Geometry>,
    pub camera: TrackedEntity<CameraProfile>,
    pub flights: TrackedList<Flight>,
}

impl Mission {
    pub fn new(
        sync: &SyncContext,
        id: Uuid,
        name: &str,
        area: Geometry,
        camera: CameraProfile,
    ) -> Self {
        let owner = PropertyOwner::new(sync, label("Mission", &id));
        Self {
            id,
            name: TrackedValue::new(&owner, "name", name.to_string()),
            description: TrackedValue::new(&owner, "description", String::new()),
            status: TrackedValue::new(&owner, "status", MissionStatus::Planned),
            area: TrackedValue::new(&owner, "area", area),
            camera: TrackedEntity::new(&owner, "camera", camera),
            flights: TrackedList::new(&owner, "flights"),
        }
    }
}

impl Identifiable for Mission {
    type Id = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }
}

impl Dirty for Mission {
    fn is_dirty(&self) -> bool {
        any_dirty(&[
            &self.name,
            &self.description,
            &self.status,
            &self.area,
            &self.camera,
            &self.flights,
        ])
    }
}

impl Mergeable for Mission {
    fn merge(&mut self, remote: &Self, strategy: &mut dyn MergeStrategy) -> Result<()> {
        self.name.merge(&remote.name, strategy)?;
        self.description.merge(&remote.description, strategy)?;
        self.status.merge(&remote.status, strategy)?;
        self.area.merge(&remote.area, strategy)?;
        self.camera.merge(&remote.camera, strategy)?;
        self.flights.merge(&remote.flights, strategy)
    }

    fn mark_synced(&mut self) -> Result<()> {
        self.name.mark_synced()?;
        self.description.mark_synced()?;
        self.status.mark_synced()?;
        self.area.mark_synced()?;
        self.camera.mark_synced()?;
        self.flights.mark_synced()
    }

    fn rebase(&mut self, baseline: &Self) -> Result<()> {
        self.name.rebase(&baseline.name)?;
        self.description.rebase(&baseline.description)?;
        self.status.rebase(&baseline.status)?;
        self.area.rebase(&baseline.area)?;
        self.camera.rebase(&baseline.camera)?;
        self.flights.rebase(&baseline.flights)
    }
}

impl Serializable for Mission {
    fn write_fields(&self, ctx: &mut WriteContext<'_>) -> codec::Result<()> {
        ctx.write_value("id", &self.id)?;
        ctx.write_value("name", self.name.get())?;
        ctx.write_value("description", self.description.get())?;
        ctx.write_enum("status", self.status.get())?;
        ctx.write_polymorphic("area", self.area.get())?;
        ctx.write_object("camera", self.camera.get())?;
        ctx.write_list("flights", self.flights.read().iter())
    }
}

impl Deserializable for Mission {
    fn from_context(ctx: &ReadContext<'_>) -> codec::Result<Self> {
        let id: Uuid = ctx.read_value("id")?;
        let owner = PropertyOwner::new(ctx.sync_context(), label("Mission", &id));
        Ok(Self {
            id,
            name: TrackedValue::new(&owner, "name", ctx.read_value("name")?),
            description: TrackedValue::new(
                &owner,
                "description",
                ctx.read_optional("description")?.unwrap_or_default(),
            ),
            status: TrackedValue::new(&owner, "status", ctx.read_enum("status")?),
            area: TrackedValue::new(&owner, "area", ctx.read_polymorphic("area", &GEOMETRY_TYPES)?),
            camera: TrackedEntity::new(&owner, "camera", ctx.read_object("camera")?),
            flights: TrackedList::from_items(&owner, "flights", ctx.read_list("flights")?),
        })
    }
}

impl fmt::Debug for Mission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mission {} {:?}", self.id, self.name.get())
    }
}
