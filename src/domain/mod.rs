//! Domain types for eventcrew.
//!
//! This module contains the core data structures:
//! - EventRequest: Validated planning parameters
//! - Credentials: Per-request API keys
//! - Crew: Agents, tasks and their outputs
//! - Artifacts: Venue and marketing JSON documents

pub mod artifact;
pub mod credentials;
pub mod crew;
pub mod request;

// Re-export commonly used types
pub use artifact::{ArtifactKind, MarketingReport, VenueDetails};
pub use credentials::Credentials;
pub use crew::{AgentRole, AgentSpec, Crew, CrewOutput, TaskOutput, TaskSpec, ToolKind};
pub use request::{EventRequest, VenueType, DATE_FORMAT};
