//! Rendering of planning results.
//!
//! Each artifact is probed and parsed independently: a missing file becomes
//! a warning, a malformed one an error message, and neither stops the other
//! artifact or the task summaries from rendering.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

use crate::domain::{ArtifactKind, CrewOutput, MarketingReport, VenueDetails};

/// Characters of a task description shown in the summary list
pub const DESCRIPTION_PREVIEW_CHARS: usize = 120;

/// Errors reading a single artifact
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Parse(#[from] serde_json::Error),
}

/// Rendered state of one artifact
#[derive(Debug, Clone, PartialEq)]
pub enum Section<T> {
    /// Parsed successfully; `raw` is the file's exact content
    Loaded { value: T, raw: String },

    /// File does not exist
    Missing { warning: String },

    /// File exists but could not be read or parsed
    Failed { error: String },
}

impl<T> Section<T> {
    /// Download payload, when the artifact loaded
    pub fn raw(&self) -> Option<&str> {
        match self {
            Self::Loaded { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

/// One row of the task summary list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSummary {
    pub agent: String,
    pub description: String,
    pub summary: String,
}

/// Everything shown after a planning run
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub venue: Section<VenueDetails>,
    pub marketing: Section<MarketingReport>,
    pub tasks: Vec<TaskSummary>,
}

/// Build the report for an artifact directory and an optional crew result
pub fn render(dir: &Path, output: Option<&CrewOutput>) -> Report {
    Report {
        venue: load_section(
            dir,
            ArtifactKind::Venue,
            "Venue details file not found or not properly generated.",
            "Error loading venue details",
        ),
        marketing: load_section(
            dir,
            ArtifactKind::Marketing,
            "Marketing report file not found.",
            "Error loading marketing report",
        ),
        tasks: output.map(task_summaries).unwrap_or_default(),
    }
}

fn load_section<T: DeserializeOwned>(
    dir: &Path,
    kind: ArtifactKind,
    missing: &str,
    failed: &str,
) -> Section<T> {
    let path = kind.path_in(dir);
    if !path.exists() {
        warn!(path = %path.display(), "Artifact not found");
        return Section::Missing {
            warning: missing.to_string(),
        };
    }

    match read_artifact(&path) {
        Ok((value, raw)) => Section::Loaded { value, raw },
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Artifact could not be loaded");
            Section::Failed {
                error: format!("{}: {}", failed, e),
            }
        }
    }
}

/// Read and parse an artifact, returning it with its raw content
pub fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<(T, String), ArtifactError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value = serde_json::from_str(&raw)?;
    Ok((value, raw))
}

/// Summaries for every task output
pub fn task_summaries(output: &CrewOutput) -> Vec<TaskSummary> {
    output
        .tasks_output
        .iter()
        .map(|task| TaskSummary {
            agent: task
                .agent
                .clone()
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            description: preview(&task.description, DESCRIPTION_PREVIEW_CHARS),
            summary: task
                .summary
                .clone()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "No summary available.".to_string()),
        })
        .collect()
}

/// First `max` characters followed by an ellipsis
fn preview(text: &str, max: usize) -> String {
    let head: String = text.chars().take(max).collect();
    format!("{}...", head)
}

impl Report {
    /// Markdown rendering for the terminal
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("### AI Planning Summary\n\n");

        out.push_str("#### Venue Details\n\n");
        match &self.venue {
            Section::Loaded { value, .. } => {
                let _ = writeln!(out, "**Name:** {}  ", value.name);
                let _ = writeln!(out, "**Address:** {}  ", value.address);
                let _ = writeln!(out, "**Capacity:** {}  ", value.capacity);
                let _ = writeln!(out, "**Booking Status:** {}  ", value.booking_status);
            }
            Section::Missing { warning } => {
                let _ = writeln!(out, "> Warning: {}", warning);
            }
            Section::Failed { error } => {
                let _ = writeln!(out, "> Error: {}", error);
            }
        }

        out.push_str("\n#### Marketing Report\n\n");
        match &self.marketing {
            Section::Loaded { value, .. } => {
                let _ = writeln!(out, "**Summary:** {}  ", value.summary);
                let _ = writeln!(out, "**Estimated Reach:** {}  ", value.estimated_reach);
                out.push_str("**Campaigns:**  \n");
                for campaign in &value.campaigns {
                    let _ = writeln!(out, "- {}", campaign);
                }
            }
            Section::Missing { warning } => {
                let _ = writeln!(out, "> Warning: {}", warning);
            }
            Section::Failed { error } => {
                let _ = writeln!(out, "> Error: {}", error);
            }
        }

        if !self.tasks.is_empty() {
            out.push_str("\n#### Agent Task Summaries\n\n");
            for task in &self.tasks {
                let _ = writeln!(out, "**Agent:** {}  ", task.agent);
                let _ = writeln!(out, "Task: {}  ", task.description);
                let _ = writeln!(out, "Summary: {}\n", task.summary);
                out.push_str("---\n\n");
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskOutput;
    use tempfile::TempDir;

    const VENUE_JSON: &str = r#"{
  "name": "Grand Hall",
  "address": "123 Main St",
  "capacity": 200,
  "booking_status": "Confirmed"
}"#;

    #[test]
    fn test_loaded_venue_keeps_raw_bytes() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("venue_details.json"), VENUE_JSON).unwrap();

        let report = render(temp.path(), None);
        match &report.venue {
            Section::Loaded { value, raw } => {
                assert_eq!(value.name, "Grand Hall");
                assert_eq!(value.capacity, 200);
                assert_eq!(raw, VENUE_JSON);
            }
            other => panic!("unexpected section: {:?}", other),
        }
        assert_eq!(report.venue.raw(), Some(VENUE_JSON));
    }

    #[test]
    fn test_missing_marketing_is_a_warning() {
        let temp = TempDir::new().unwrap();
        let report = render(temp.path(), None);

        assert_eq!(
            report.marketing,
            Section::Missing {
                warning: "Marketing report file not found.".to_string()
            }
        );
        assert!(report.marketing.raw().is_none());
    }

    #[test]
    fn test_missing_key_is_reported() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("venue_details.json"),
            r#"{"name": "Grand Hall", "address": "123 Main St", "booking_status": "Confirmed"}"#,
        )
        .unwrap();

        match render(temp.path(), None).venue {
            Section::Failed { error } => {
                assert!(error.starts_with("Error loading venue details:"));
                assert!(error.contains("capacity"));
            }
            other => panic!("unexpected section: {:?}", other),
        }
    }

    #[test]
    fn test_task_summaries_placeholders() {
        let output = CrewOutput {
            raw: String::new(),
            tasks_output: vec![
                TaskOutput {
                    agent: None,
                    description: "x".repeat(200),
                    summary: None,
                    ..Default::default()
                },
                TaskOutput {
                    agent: Some("Logistics Manager".to_string()),
                    description: "Arrange catering".to_string(),
                    summary: Some("All booked".to_string()),
                    ..Default::default()
                },
            ],
            tokens_used: None,
        };

        let summaries = task_summaries(&output);
        assert_eq!(summaries[0].agent, "Unknown");
        assert_eq!(summaries[0].description, format!("{}...", "x".repeat(120)));
        assert_eq!(summaries[0].summary, "No summary available.");
        assert_eq!(summaries[1].description, "Arrange catering...");
        assert_eq!(summaries[1].summary, "All booked");
    }

    #[test]
    fn test_markdown_lists_campaigns() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("marketing_report.json"),
            r#"{"summary": "Go wide", "campaigns": ["Facebook", "Local radio"], "estimated_reach": 5000}"#,
        )
        .unwrap();

        let markdown = render(temp.path(), None).to_markdown();
        assert!(markdown.contains("**Estimated Reach:** 5000"));
        assert!(markdown.contains("- Facebook\n- Local radio\n"));
        assert!(markdown.contains("> Warning: Venue details file not found"));
        assert!(!markdown.contains("Agent Task Summaries"));
    }
}
