//! plansync library: project model and sync session over plansync-core.
//!
//! This is the layer the `plansync` binary drives, exposed so integration
//! tests can build documents and sessions directly.

pub mod config;
pub mod model;
pub mod session;

// Re-export key types for convenience
pub use config::{Config, ConfigError};
pub use model::{
    CameraProfile, Flight, Geometry, Member, MemberRole, Mission, MissionStatus, Project,
};
pub use session::{CheckSummary, MergeSummary, SessionError, SyncSession};
