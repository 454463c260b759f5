//! Project model: the entity graph that plansync documents hold.
//!
//! A project owns missions and members; a mission owns its flights and one
//! camera profile. Every field is a tracked property bound to the owning
//! entity, so the whole graph merges recursively.

mod camera;
mod flight;
mod geometry;
mod member;
mod mission;
mod project;

pub use camera::CameraProfile;
pub use flight::Flight;
pub use geometry::{GEOMETRY_TYPES, Geometry};
pub use member::{Member, MemberRole};
pub use mission::{Mission, MissionStatus};
pub use project::Project;

use uuid::Uuid;

/// Label used for an entity in conflict records, e.g. `Mission 6f1c…`.
fn label(kind: &str, id: &Uuid) -> String {
    format!("{} {}", kind, id)
}
