//! Adapter interfaces for external systems.
//!
//! The orchestration engine is reached only through the `Engine` trait, so
//! the planner can be driven by the HTTP-backed `CrewEngine` in production
//! and by deterministic fakes in tests.

pub mod crew;
pub mod openai;
pub mod scrape;
pub mod serper;

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{Credentials, Crew, CrewOutput};

pub use crew::CrewEngine;
pub use openai::{ChatClient, ChatMessage, ChatOutput};
pub use scrape::ScrapeClient;
pub use serper::{SearchResult, SerperClient};

/// Everything a kickoff needs besides the crew itself
#[derive(Debug, Clone)]
pub struct KickoffContext {
    /// Keyed substitution map (`{event_topic}` etc.)
    pub inputs: BTreeMap<String, Value>,

    /// Keys and model for this request only
    pub credentials: Credentials,

    /// Directory structured task outputs are written to
    pub artifact_dir: PathBuf,
}

/// Trait for orchestration engines
#[async_trait]
pub trait Engine: Send + Sync {
    /// Human-readable engine name
    fn name(&self) -> &str;

    /// Run every task of the crew and return the combined result
    ///
    /// Blocks until all tasks finish. Errors are returned as-is; callers do
    /// not retry.
    async fn submit(&self, crew: &Crew, ctx: &KickoffContext) -> Result<CrewOutput>;
}
