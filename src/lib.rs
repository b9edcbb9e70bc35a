//! eventcrew - Event planning front end for a multi-agent LLM crew
//!
//! Collects event parameters through a web form or the CLI, hands them to
//! a crew of three role agents (venue, logistics, marketing) and renders
//! the venue and marketing artifacts the crew leaves behind.
//!
//! # Architecture
//!
//! Data flows strictly forward:
//! - Validation turns raw form input into an `EventRequest` and per-request `Credentials`
//! - The builder templates the three task descriptions
//! - The planner submits the crew to an `Engine` and waits for the result
//! - The renderer reads the JSON artifacts back and presents them
//!
//! # Modules
//!
//! - `adapters`: Engine trait and HTTP integrations (OpenAI, Serper, scraping)
//! - `core`: Validation, task building, planning, rendering
//! - `domain`: Data structures (EventRequest, Crew, artifacts)
//! - `server`: Web form
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Plan from the command line
//! eventcrew plan --topic "Rust Meetup" --description "Monthly meetup" \
//!     --city Berlin --date 2026-11-05 --participants 120 --budget 5000 \
//!     --venue-type Hotel
//!
//! # Serve the web form
//! eventcrew serve --address 127.0.0.1:8501
//!
//! # Re-render artifacts from a previous run
//! eventcrew render ./artifacts
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;

// Re-export main types at crate root for convenience
pub use adapters::{CrewEngine, Engine, KickoffContext};
pub use crate::core::{render, Planner, Report, Section};
pub use domain::{
    ArtifactKind, Credentials, CrewOutput, EventRequest, MarketingReport, VenueDetails, VenueType,
};
