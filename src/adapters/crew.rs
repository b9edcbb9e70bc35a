//! Sequential crew engine backed by HTTP APIs.
//!
//! Tasks run in the order they were submitted. Each task gets the agent's
//! persona, the outputs of earlier tasks, and whatever the agent's tools
//! found. Structured tasks must answer with a JSON object, which is written
//! to the artifact directory when the task names an output file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::config::EngineSettings;
use crate::domain::{AgentSpec, Crew, CrewOutput, TaskOutput, TaskSpec, ToolKind};

use super::openai::{ChatClient, ChatMessage};
use super::scrape::ScrapeClient;
use super::serper::{format_results, SearchResult, SerperClient};
use super::{Engine, KickoffContext};

/// Number of words kept in a task summary
const SUMMARY_WORDS: usize = 30;

/// HTTP-backed engine running tasks one after another
pub struct CrewEngine {
    chat: ChatClient,
    search: SerperClient,
    scrape: ScrapeClient,
    search_results: usize,
}

impl CrewEngine {
    /// Create an engine from settings
    pub fn new(settings: &EngineSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_seconds))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            chat: ChatClient::new(settings.openai_base_url.clone(), client.clone()),
            search: SerperClient::new(settings.serper_base_url.clone(), client.clone()),
            scrape: ScrapeClient::new(client, settings.scrape_max_chars),
            search_results: settings.search_results,
        })
    }

    #[instrument(skip_all, fields(task = %task.name, agent = %agent.role))]
    async fn execute_task(
        &self,
        agent: &AgentSpec,
        task: &TaskSpec,
        description: &str,
        previous: &[TaskOutput],
        ctx: &KickoffContext,
    ) -> Result<(TaskOutput, Option<u64>)> {
        let started = Instant::now();
        let observations = self.use_tools(agent, description, ctx).await?;

        let messages = [
            ChatMessage::system(persona_prompt(agent)),
            ChatMessage::user(task_prompt(task, description, previous, &observations)),
        ];

        let output = self
            .chat
            .complete(
                &ctx.credentials.model_api_key,
                &ctx.credentials.model,
                &messages,
                task.is_structured(),
            )
            .await
            .with_context(|| format!("Task '{}' model call failed", task.name))?;

        let json = if task.is_structured() {
            Some(
                extract_json(&output.content)
                    .with_context(|| format!("Task '{}' returned malformed JSON", task.name))?,
            )
        } else {
            None
        };

        let output_file = match (&json, &task.output_file) {
            (Some(value), Some(file)) => Some(write_artifact(&ctx.artifact_dir, file, value).await?),
            _ => None,
        };

        info!(
            duration_ms = started.elapsed().as_millis() as u64,
            tokens = output.tokens_used,
            "Task completed"
        );

        let task_output = TaskOutput {
            agent: Some(agent.role.title().to_string()),
            description: description.to_string(),
            summary: summarize(&output.content),
            raw: output.content.trim().to_string(),
            json,
            output_file,
        };

        Ok((task_output, output.tokens_used))
    }

    /// Run the agent's tools for a task and collect their findings
    ///
    /// Search errors fail the task. A page that cannot be scraped becomes a
    /// finding for the agent instead.
    async fn use_tools(
        &self,
        agent: &AgentSpec,
        description: &str,
        ctx: &KickoffContext,
    ) -> Result<String> {
        let mut sections = Vec::new();
        let mut results: Vec<SearchResult> = Vec::new();

        if agent.has_tool(ToolKind::Search) {
            results = self
                .search
                .search(&ctx.credentials.search_api_key, description, self.search_results)
                .await
                .context("Search tool failed")?;
            debug!(results = results.len(), "Search tool returned");
            if !results.is_empty() {
                sections.push(format!("Search results:\n{}", format_results(&results)));
            }
        }

        if agent.has_tool(ToolKind::Scrape) {
            if let Some(top) = results.first() {
                match self.scrape.scrape(&top.link).await {
                    Ok(text) => sections.push(format!("Content of {}:\n{}", top.link, text)),
                    Err(e) => {
                        warn!(link = %top.link, error = %format!("{:#}", e), "Scrape tool failed");
                        sections.push(format!("Could not fetch {}: {:#}", top.link, e));
                    }
                }
            } else {
                warn!("No search result to scrape");
            }
        }

        Ok(sections.join("\n\n"))
    }
}

#[async_trait]
impl Engine for CrewEngine {
    fn name(&self) -> &str {
        "crew"
    }

    async fn submit(&self, crew: &Crew, ctx: &KickoffContext) -> Result<CrewOutput> {
        crew.validate()?;

        let mut outputs: Vec<TaskOutput> = Vec::with_capacity(crew.tasks.len());
        let mut tokens_used: Option<u64> = None;

        for task in &crew.tasks {
            let agent = crew
                .agent(task.agent)
                .with_context(|| format!("No agent registered for '{}'", task.agent))?;
            let description = interpolate(&task.description, &ctx.inputs);

            let (output, tokens) = self
                .execute_task(agent, task, &description, &outputs, ctx)
                .await?;
            if let Some(tokens) = tokens {
                tokens_used = Some(tokens_used.unwrap_or(0) + tokens);
            }
            outputs.push(output);
        }

        let raw = outputs.last().map(|o| o.raw.clone()).unwrap_or_default();

        Ok(CrewOutput {
            raw,
            tasks_output: outputs,
            tokens_used,
        })
    }
}

/// Replace `{key}` placeholders with values from the inputs map
///
/// Unknown placeholders are left untouched.
pub fn interpolate(template: &str, inputs: &BTreeMap<String, Value>) -> String {
    let mut result = template.to_string();
    for (key, value) in inputs {
        let placeholder = format!("{{{}}}", key);
        if result.contains(&placeholder) {
            let replacement = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            result = result.replace(&placeholder, &replacement);
        }
    }
    result
}

fn persona_prompt(agent: &AgentSpec) -> String {
    format!(
        "You are {}. {}\nYour personal goal is: {}",
        agent.role.title(),
        agent.backstory,
        agent.goal
    )
}

fn task_prompt(
    task: &TaskSpec,
    description: &str,
    previous: &[TaskOutput],
    observations: &str,
) -> String {
    let mut prompt = format!("Current task: {}\n", description);

    if !previous.is_empty() {
        prompt.push_str("\nContext from previous tasks:\n");
        for output in previous {
            prompt.push_str(&format!("- {}\n", output.raw));
        }
    }

    if !observations.is_empty() {
        prompt.push_str(&format!("\nTool findings:\n{}\n", observations));
    }

    prompt.push_str(&format!(
        "\nThis is the expected criteria for your final answer: {}\n",
        task.expected_output
    ));

    if let Some(ref schema) = task.output_schema {
        prompt.push_str(&format!(
            "Respond with a single JSON object matching this schema and nothing else:\n{}\n",
            schema
        ));
    }

    prompt
}

/// Pull a JSON object out of a model reply, tolerating code fences
pub fn extract_json(content: &str) -> Result<Value> {
    let trimmed = content.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    let value: Value = serde_json::from_str(unfenced).context("Output is not valid JSON")?;
    if !value.is_object() {
        anyhow::bail!("Output is JSON but not an object");
    }
    Ok(value)
}

fn summarize(content: &str) -> Option<String> {
    let words: Vec<&str> = content.split_whitespace().collect();
    if words.is_empty() {
        return None;
    }

    let mut summary = words[..words.len().min(SUMMARY_WORDS)].join(" ");
    if words.len() > SUMMARY_WORDS {
        summary.push_str("...");
    }
    Some(summary)
}

async fn write_artifact(dir: &Path, file: &str, value: &Value) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create artifact directory: {}", dir.display()))?;

    let path = dir.join(file);
    let content = serde_json::to_string_pretty(value).context("Failed to serialize artifact")?;
    tokio::fs::write(&path, content)
        .await
        .with_context(|| format!("Failed to write artifact: {}", path.display()))?;

    debug!(path = %path.display(), "Artifact written");
    Ok(path)
}
