use super::label;
use plansync_core::codec::{self, Deserializable, ReadContext, Serializable, WriteContext};
use plansync_core::mergeable::Result;
use plansync_core::{
    Dirty, Identifiable, MergeStrategy, Mergeable, PropertyOwner, SyncContext, TrackedDouble,
    TrackedString, TrackedValue, any_dirty,
};
use std::fmt;
use uuid::Uuid;

/// Camera payload a mission is planned for.
#[derive(Clone)]
pub struct CameraProfile {
    id: Uuid,
    pub model: TrackedString,
    /// Focal length in millimetres.
    pub focal_length: TrackedDouble,
    /// Sensor size `[width, height]` in millimetres.
    pub sensor: TrackedValue<[f64; 2]>,
}

impl CameraProfile {
    pub fn new(
        sync: &SyncContext,
        id: Uuid,
        model: &str,
        focal_length: f64,
        sensor: [f64; 2],
    ) -> Self {
        let owner = PropertyOwner::new(sync, label("Camera", &id));
        Self {
            id,
            model: TrackedValue::new(&owner, "model", model.to_string()),
            focal_length: TrackedValue::new(&owner, "focalLength", focal_length),
            sensor: TrackedValue::new(&owner, "sensor", sensor),
        }
    }
}

impl Identifiable for CameraProfile {
    type Id = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }
}

impl Dirty for CameraProfile {
    fn is_dirty(&self) -> bool {
        any_dirty(&[&self.model, &self.focal_length, &self.sensor])
    }
}

impl Mergeable for CameraProfile {
    fn merge(&mut self, remote: &Self, strategy: &mut dyn MergeStrategy) -> Result<()> {
        self.model.merge(&remote.model, strategy)?;
        self.focal_length.merge(&remote.focal_length, strategy)?;
        self.sensor.merge(&remote.sensor, strategy)
    }

    fn mark_synced(&mut self) -> Result<()> {
        self.model.mark_synced()?;
        self.focal_length.mark_synced()?;
        self.sensor.mark_synced()
    }

    fn rebase(&mut self, baseline: &Self) -> Result<()> {
        self.model.rebase(&baseline.model)?;
        self.focal_length.rebase(&baseline.focal_length)?;
        self.sensor.rebase(&baseline.sensor)
    }
}

impl Serializable for CameraProfile {
    fn write_fields(&self, ctx: &mut WriteContext<'_>) -> codec::Result<()> {
        ctx.write_value("id", &self.id)?;
        ctx.write_value("model", self.model.get())?;
        ctx.write_value("focalLength", self.focal_length.get())?;
        ctx.write_value("sensor", self.sensor.get())
    }
}

impl Deserializable for CameraProfile {
    fn from_context(ctx: &ReadContext<'_>) -> codec::Result<Self> {
        Ok(Self::new(
            ctx.sync_context(),
            ctx.read_value("id")?,
            &ctx.read_value::<String>("model")?,
            ctx.read_value("focalLength")?,
            ctx.read_value("sensor")?,
        ))
    }
}

impl fmt::Debug for CameraProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Camera {} {:?}", self.id, self.model.get())
    }
}
