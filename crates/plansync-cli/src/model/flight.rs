use super::label;
use chrono::{DateTime, FixedOffset};
use plansync_core::codec::{self, Deserializable, ReadContext, Serializable, WriteContext};
use plansync_core::mergeable::Result;
use plansync_core::{
    Dirty, Identifiable, MergeStrategy, Mergeable, PropertyOwner, SyncContext, TrackedDouble,
    TrackedFloat, TrackedInt, TrackedString, TrackedValue, any_dirty,
};
use std::fmt;
use uuid::Uuid;

/// One planned (or flown) sortie of a mission.
#[derive(Clone)]
pub struct Flight {
    id: Uuid,
    pub name: TrackedString,
    /// Altitude above takeoff, metres.
    pub altitude: TrackedDouble,
    /// Ground speed, metres per second.
    pub speed: TrackedFloat,
    pub planned_at: TrackedValue<DateTime<FixedOffset>>,
    pub capture_count: TrackedInt,
    /// Raw flight log uploaded after the flight, if any.
    pub log: TrackedValue<Option<Vec<u8>>>,
}

impl Flight {
    pub fn new(
        sync: &SyncContext,
        id: Uuid,
        name: &str,
        altitude: f64,
        speed: f32,
        planned_at: DateTime<FixedOffset>,
    ) -> Self {
        let owner = PropertyOwner::new(sync, label("Flight", &id));
        Self {
            id,
            name: TrackedValue::new(&owner, "name", name.to_string()),
            altitude: TrackedValue::new(&owner, "altitude", altitude),
            speed: TrackedValue::new(&owner, "speed", speed),
            planned_at: TrackedValue::new(&owner, "plannedAt", planned_at),
            capture_count: TrackedValue::new(&owner, "captureCount", 0),
            log: TrackedValue::new(&owner, "log", None),
        }
    }
}

impl Identifiable for Flight {
    type Id = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }
}

impl Dirty for Flight {
    fn is_dirty(&self) -> bool {
        any_dirty(&[
            &self.name,
            &self.altitude,
            &self.speed,
            &self.planned_at,
            &self.capture_count,
            &self.log,
        ])
    }
}

impl Mergeable for Flight {
    fn merge(&mut self, remote: &Self, strategy: &mut dyn MergeStrategy) -> Result<()> {
        self.name.merge(&remote.name, strategy)?;
        self.altitude.merge(&remote.altitude, strategy)?;
        self.speed.merge(&remote.speed, strategy)?;
        self.planned_at.merge(&remote.planned_at, strategy)?;
        self.capture_count.merge(&remote.capture_count, strategy)?;
        self.log.merge(&remote.log, strategy)
    }

    fn mark_synced(&mut self) -> Result<()> {
        self.name.mark_synced()?;
        self.altitude.mark_synced()?;
        self.speed.mark_synced()?;
        self.planned_at.mark_synced()?;
        self.capture_count.mark_synced()?;
        self.log.mark_synced()
    }

    fn rebase(&mut self, baseline: &Self) -> Result<()> {
        self.name.rebase(&baseline.name)?;
        self.altitude.rebase(&baseline.altitude)?;
        self.speed.rebase(&baseline.speed)?;
        self.planned_at.rebase(&baseline.planned_at)?;
        self.capture_count.rebase(&baseline.capture_count)?;
        self.log.rebase(&baseline.log)
    }
}

impl Serializable for Flight {
    fn write_fields(&self, ctx: &mut WriteContext<'_>) -> codec::Result<()> {
        ctx.write_value("id", &self.id)?;
        ctx.write_value("name", self.name.get())?;
        ctx.write_value("altitude", self.altitude.get())?;
        ctx.write_value("speed", self.speed.get())?;
        ctx.write_value("plannedAt", self.planned_at.get())?;
        ctx.write_value("captureCount", self.capture_count.get())?;
        if let Some(log) = self.log.get() {
            ctx.write_bytes("log", log)?;
        }
        Ok(())
    }
}

impl Deserializable for Flight {
    fn from_context(ctx: &ReadContext<'_>) -> codec::Result<Self> {
        let mut flight = Self::new(
            ctx.sync_context(),
            ctx.read_value("id")?,
            &ctx.read_value::<String>("name")?,
            ctx.read_value("altitude")?,
            ctx.read_value("speed")?,
            ctx.read_value("plannedAt")?,
        );
        flight.capture_count.set(ctx.read_optional("captureCount")?.unwrap_or(0));
        flight.log.set(ctx.read_optional_bytes("log")?);
        Ok(flight)
    }
}

impl fmt::Debug for Flight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Flight {} {:?}", self.id, self.name.get())
    }
}
