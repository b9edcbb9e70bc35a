//! Command-line interface for eventcrew.
//!
//! Provides commands for running a planning crew, rendering existing
//! artifacts, serving the web form, and inspecting configuration.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::adapters::CrewEngine;
use crate::config::{self, ResolvedConfig};
use crate::core::validation::{validate, RawSubmission, ValidationRules};
use crate::core::{render, Planner};
use crate::server::{self, AppState};

/// eventcrew - Event planning with a multi-agent LLM crew
#[derive(Parser, Debug)]
#[command(name = "eventcrew")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Plan an event: validate inputs, run the crew, render the results
    Plan(PlanArgs),

    /// Render artifacts left in a directory by an earlier run
    Render {
        /// Artifact directory (defaults to the configured output directory)
        dir: Option<PathBuf>,
    },

    /// Serve the planning web form
    ///
    /// Each submission writes its artifacts to <output_dir>/runs/<run_id>/.
    /// Run directories are never deleted by the server; prune them yourself.
    Serve {
        /// Address to bind to (defaults to the configured bind address)
        #[arg(short, long)]
        address: Option<String>,

        /// Use the widget form rules (participants >= 10, budget >= 10000, fixed venue types)
        #[arg(long)]
        widget: bool,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Event parameters, taken as text so they go through the same rules as the form
#[derive(clap::Args, Debug)]
pub struct PlanArgs {
    /// Event topic
    #[arg(long, default_value = "")]
    pub topic: String,

    /// Event description
    #[arg(long, default_value = "")]
    pub description: String,

    /// City
    #[arg(long, default_value = "")]
    pub city: String,

    /// Event date (YYYY-MM-DD)
    #[arg(long, default_value = "")]
    pub date: String,

    /// Expected participants
    #[arg(long, default_value = "")]
    pub participants: String,

    /// Budget
    #[arg(long, default_value = "")]
    pub budget: String,

    /// Preferred venue type
    #[arg(long, default_value = "")]
    pub venue_type: String,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, default_value = "")]
    pub openai_api_key: String,

    /// Serper API key
    #[arg(long, env = "SERPER_API_KEY", hide_env_values = true, default_value = "")]
    pub serper_api_key: String,

    /// Directory the artifacts are written to
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Use the widget form rules
    #[arg(long)]
    pub widget: bool,
}

impl From<&PlanArgs> for RawSubmission {
    fn from(args: &PlanArgs) -> Self {
        Self {
            event_topic: args.topic.clone(),
            event_description: args.description.clone(),
            event_city: args.city.clone(),
            tentative_date: args.date.clone(),
            expected_participants: args.participants.clone(),
            budget: args.budget.clone(),
            venue_type: args.venue_type.clone(),
            openai_api_key: args.openai_api_key.clone(),
            serper_api_key: args.serper_api_key.clone(),
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Plan(args) => plan(args).await,
            Commands::Render { dir } => render_dir(dir).await,
            Commands::Serve { address, widget } => serve(address, widget).await,
            Commands::Config => show_config().await,
        }
    }
}

fn rules(cfg: &ResolvedConfig, widget: bool) -> ValidationRules {
    if widget {
        ValidationRules::widget()
    } else {
        cfg.validation.clone()
    }
}

/// Validate, run the crew and print the report
async fn plan(args: PlanArgs) -> Result<()> {
    let cfg = config::config()?;
    let rules = rules(cfg, args.widget);

    let validated = match validate(&RawSubmission::from(&args), &rules, &cfg.model) {
        Ok(validated) => validated,
        Err(errors) => {
            for error in errors.errors() {
                eprintln!("error: {}", error.message);
            }
            std::process::exit(2);
        }
    };

    let output_dir = args.output_dir.unwrap_or_else(|| cfg.output_dir.clone());

    eprintln!("All inputs are valid! Running AI agents...");
    let planner = Planner::new(Arc::new(CrewEngine::new(&cfg.engine)?));
    let output = planner
        .kickoff(&validated.request, &validated.credentials, output_dir.clone())
        .await?;

    let report = render(&output_dir, Some(&output));
    println!("{}", report.to_markdown());
    eprintln!("[Event planning completed. Artifacts in {}]", output_dir.display());

    Ok(())
}

/// Render whatever artifacts a directory holds
async fn render_dir(dir: Option<PathBuf>) -> Result<()> {
    let dir = match dir {
        Some(dir) => dir,
        None => config::config()?.output_dir.clone(),
    };

    let report = render(&dir, None);
    println!("{}", report.to_markdown());
    Ok(())
}

/// Start the web form
async fn serve(address: Option<String>, widget: bool) -> Result<()> {
    let cfg = config::config()?;
    let address = address.unwrap_or_else(|| cfg.bind.clone());

    let state = AppState {
        planner: Planner::new(Arc::new(CrewEngine::new(&cfg.engine)?)),
        output_dir: cfg.output_dir.clone(),
        rules: rules(cfg, widget),
        model: cfg.model.clone(),
    };

    server::serve(&address, state).await
}

/// Show the resolved configuration (for debugging)
async fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("eventcrew configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!(
        "Config version: {}",
        cfg.version.as_deref().unwrap_or("(unspecified)")
    );
    println!();
    println!("Output directory: {}", cfg.output_dir.display());
    println!("Bind address:     {}", cfg.bind);
    println!("Model:            {}", cfg.model);
    println!();
    println!("Validation:");
    println!("  Min participants:     {}", cfg.validation.min_participants);
    println!(
        "  Min budget:           {}",
        cfg.validation
            .min_budget
            .map(|b| b.to_string())
            .unwrap_or_else(|| "(any positive amount)".to_string())
    );
    println!("  Restrict venue types: {}", cfg.validation.restrict_venue_types);
    println!();
    println!("Engine:");
    println!("  OpenAI base URL:  {}", cfg.engine.openai_base_url);
    println!("  Serper base URL:  {}", cfg.engine.serper_base_url);
    println!("  Search results:   {}", cfg.engine.search_results);
    println!("  Scrape max chars: {}", cfg.engine.scrape_max_chars);
    println!("  Request timeout:  {}s", cfg.engine.request_timeout_seconds);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_args_parse() {
        let cli = Cli::try_parse_from([
            "eventcrew",
            "plan",
            "--topic",
            "Rust Meetup",
            "--participants",
            "120",
            "--budget",
            "1000.50",
            "--openai-api-key",
            "sk-test",
            "--widget",
        ])
        .unwrap();

        let Commands::Plan(args) = cli.command else {
            panic!("expected plan command");
        };
        let raw = RawSubmission::from(&args);
        assert_eq!(raw.event_topic, "Rust Meetup");
        assert_eq!(raw.expected_participants, "120");
        assert_eq!(raw.openai_api_key, "sk-test");
        assert!(args.widget);
    }

    #[test]
    fn test_serve_help_mentions_run_directories() {
        use clap::CommandFactory;

        let mut cmd = Cli::command();
        let serve = cmd.find_subcommand_mut("serve").unwrap();
        let help = serve.render_long_help().to_string();

        assert!(help.contains("<output_dir>/runs/<run_id>/"));
        assert!(help.contains("never deleted"));
    }

    #[test]
    fn test_widget_flag_overrides_config_rules() {
        let cfg = config::reload_config().unwrap();
        assert_eq!(rules(&cfg, true), ValidationRules::widget());
        assert_eq!(rules(&cfg, false), cfg.validation);
    }
}
