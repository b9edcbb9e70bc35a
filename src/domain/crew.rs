//! Agents, tasks and the results of a crew kickoff.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The role-specialized agents of a planning crew
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    VenueCoordinator,
    LogisticsManager,
    MarketingCommunications,
}

impl AgentRole {
    /// Human-readable role name, as reported in task outputs
    pub fn title(&self) -> &'static str {
        match self {
            Self::VenueCoordinator => "Venue Coordinator",
            Self::LogisticsManager => "Logistics Manager",
            Self::MarketingCommunications => "Marketing and Communications Agent",
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Capabilities an agent may call while working on a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    /// Web search
    Search,

    /// Fetch a page and extract its text
    Scrape,
}

/// An agent definition: role, goal, persona and tools
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub role: AgentRole,
    pub goal: String,
    pub backstory: String,
    pub tools: Vec<ToolKind>,
}

impl AgentSpec {
    pub fn new(role: AgentRole, goal: impl Into<String>, backstory: impl Into<String>) -> Self {
        Self {
            role,
            goal: goal.into(),
            backstory: backstory.into(),
            tools: Vec::new(),
        }
    }

    pub fn with_tools(mut self, tools: impl IntoIterator<Item = ToolKind>) -> Self {
        self.tools = tools.into_iter().collect();
        self
    }

    pub fn has_tool(&self, tool: ToolKind) -> bool {
        self.tools.contains(&tool)
    }
}

/// A unit of work bound to one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Short stable name (e.g. "venue")
    pub name: String,

    /// Natural-language instructions
    pub description: String,

    /// Free-text hint describing the expected result
    pub expected_output: String,

    /// JSON Schema the output must follow, for structured tasks
    pub output_schema: Option<Value>,

    /// File the structured output is persisted to
    pub output_file: Option<String>,

    /// Agent responsible for this task
    pub agent: AgentRole,
}

impl TaskSpec {
    /// Whether the engine must return JSON for this task
    pub fn is_structured(&self) -> bool {
        self.output_schema.is_some()
    }
}

/// Agents plus the ordered tasks submitted in one kickoff
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crew {
    pub agents: Vec<AgentSpec>,
    pub tasks: Vec<TaskSpec>,
}

impl Crew {
    /// Find the agent registered for a role
    pub fn agent(&self, role: AgentRole) -> Option<&AgentSpec> {
        self.agents.iter().find(|a| a.role == role)
    }

    /// Check that every task is bound to a registered agent
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tasks.is_empty() {
            anyhow::bail!("Crew must have at least one task");
        }

        for task in &self.tasks {
            if self.agent(task.agent).is_none() {
                anyhow::bail!(
                    "Task '{}' is assigned to unregistered agent '{}'",
                    task.name,
                    task.agent
                );
            }
        }

        Ok(())
    }
}

/// Output of a single task
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskOutput {
    /// Responsible agent's role name
    #[serde(default)]
    pub agent: Option<String>,

    /// The task description that was executed
    #[serde(default)]
    pub description: String,

    /// Short summary of the result
    #[serde(default)]
    pub summary: Option<String>,

    /// Raw model output
    #[serde(default)]
    pub raw: String,

    /// Parsed JSON output for structured tasks
    #[serde(default)]
    pub json: Option<Value>,

    /// Artifact written for this task
    #[serde(default)]
    pub output_file: Option<PathBuf>,
}

/// Combined result of a kickoff
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrewOutput {
    /// Raw output of the final task
    pub raw: String,

    /// Per-task outputs, in execution order
    #[serde(default)]
    pub tasks_output: Vec<TaskOutput>,

    /// Tokens used across all model calls (if reported)
    #[serde(default)]
    pub tokens_used: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(agent: AgentRole) -> TaskSpec {
        TaskSpec {
            name: "t".to_string(),
            description: "do it".to_string(),
            expected_output: "done".to_string(),
            output_schema: None,
            output_file: None,
            agent,
        }
    }

    #[test]
    fn test_crew_validation_rejects_unbound_task() {
        let crew = Crew {
            agents: vec![AgentSpec::new(AgentRole::VenueCoordinator, "goal", "story")],
            tasks: vec![task(AgentRole::LogisticsManager)],
        };
        assert!(crew.validate().is_err());
    }

    #[test]
    fn test_crew_validation_accepts_bound_tasks() {
        let crew = Crew {
            agents: vec![AgentSpec::new(AgentRole::VenueCoordinator, "goal", "story")
                .with_tools([ToolKind::Search])],
            tasks: vec![task(AgentRole::VenueCoordinator)],
        };
        assert!(crew.validate().is_ok());
        assert!(crew.agents[0].has_tool(ToolKind::Search));
        assert!(!crew.agents[0].has_tool(ToolKind::Scrape));
    }

    #[test]
    fn test_task_output_tolerates_missing_fields() {
        let output: TaskOutput = serde_json::from_str(r#"{"raw":"ok"}"#).unwrap();
        assert_eq!(output.raw, "ok");
        assert!(output.agent.is_none());
        assert!(output.summary.is_none());
    }
}
