//! Orchestration client for a planning run.
//!
//! Registers the three role agents, binds the builder's tasks to them and
//! submits the crew to the engine in one blocking call.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{error, info, instrument};

use crate::adapters::{Engine, KickoffContext};
use crate::domain::{AgentRole, AgentSpec, Credentials, Crew, CrewOutput, EventRequest, ToolKind};

use super::builder::build_tasks;

/// Main planning client
pub struct Planner {
    engine: Arc<dyn Engine>,
}

impl Planner {
    /// Create a planner on top of an engine
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Self { engine }
    }

    /// Name of the underlying engine
    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    /// Assemble the crew for a request
    pub fn crew(request: &EventRequest) -> Crew {
        Crew {
            agents: agents(),
            tasks: build_tasks(request),
        }
    }

    /// Run the planning crew for a validated request
    ///
    /// Structured outputs land in `artifact_dir`. Engine failures are
    /// returned to the caller as-is.
    #[instrument(skip_all, fields(engine = %self.engine.name(), topic = %request.topic))]
    pub async fn kickoff(
        &self,
        request: &EventRequest,
        credentials: &Credentials,
        artifact_dir: PathBuf,
    ) -> Result<CrewOutput> {
        let crew = Self::crew(request);
        let ctx = KickoffContext {
            inputs: request.inputs(),
            credentials: credentials.clone(),
            artifact_dir,
        };

        info!(tasks = crew.tasks.len(), "Running planning crew");
        let started = Instant::now();

        let output = self
            .engine
            .submit(&crew, &ctx)
            .await
            .map_err(|e| {
                error!(error = %format!("{:#}", e), "Planning crew failed");
                e
            })
            .context("Event planning failed")?;

        info!(
            duration_ms = started.elapsed().as_millis() as u64,
            tasks = output.tasks_output.len(),
            "Planning crew completed"
        );
        Ok(output)
    }
}

/// The venue, logistics and marketing agents, each with search and scrape
pub fn agents() -> Vec<AgentSpec> {
    let tools = [ToolKind::Search, ToolKind::Scrape];

    vec![
        AgentSpec::new(
            AgentRole::VenueCoordinator,
            "Find and book the most suitable venue for the event",
            "You're a logistics genius who can find a perfect venue for any tech event. \
             You balance cost, capacity, availability, and quality while ensuring the venue \
             meets the event's needs.",
        )
        .with_tools(tools),
        AgentSpec::new(
            AgentRole::LogisticsManager,
            "Handle catering and equipment logistics smoothly",
            "You manage catering and technical setup with efficiency and precision.",
        )
        .with_tools(tools),
        AgentSpec::new(
            AgentRole::MarketingCommunications,
            "Promote the event and ensure maximum attendance",
            "You excel at designing effective marketing campaigns and reaching the right audience.",
        )
        .with_tools(tools),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VenueType;
    use chrono::NaiveDate;

    fn request() -> EventRequest {
        EventRequest {
            topic: "Rust Meetup".to_string(),
            description: "Community meetup".to_string(),
            city: "Berlin".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 11, 5).unwrap(),
            expected_participants: 50,
            budget: 2000.0,
            venue_type: VenueType::Hotel,
        }
    }

    #[test]
    fn test_crew_binds_each_task_to_its_agent() {
        let crew = Planner::crew(&request());

        assert!(crew.validate().is_ok());
        assert_eq!(crew.agents.len(), 3);
        let roles: Vec<_> = crew.tasks.iter().map(|t| t.agent).collect();
        assert_eq!(
            roles,
            [
                AgentRole::VenueCoordinator,
                AgentRole::LogisticsManager,
                AgentRole::MarketingCommunications
            ]
        );
    }

    #[test]
    fn test_agents_have_search_and_scrape() {
        for agent in agents() {
            assert!(agent.has_tool(ToolKind::Search), "{}", agent.role);
            assert!(agent.has_tool(ToolKind::Scrape), "{}", agent.role);
        }
    }
}
