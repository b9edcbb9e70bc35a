//! Core planning logic.
//!
//! This module contains:
//! - Validation: Form submission rules
//! - Builder: Task descriptions for the three sub-tasks
//! - Planner: Crew assembly and engine kickoff
//! - Renderer: Artifact loading and presentation

pub mod builder;
pub mod planner;
pub mod renderer;
pub mod validation;

// Re-export commonly used types
pub use builder::build_tasks;
pub use planner::Planner;
pub use renderer::{render, ArtifactError, Report, Section, TaskSummary};
pub use validation::{
    validate, Field, FieldError, RawSubmission, ValidatedSubmission, ValidationErrors,
    ValidationRules,
};
