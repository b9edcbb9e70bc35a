//! Form submission validation.
//!
//! Turns the raw strings of a submission into an `EventRequest` plus
//! per-request `Credentials`, or reports every violated field rule.
//! Nothing downstream runs unless this succeeds.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Credentials, EventRequest, VenueType, DATE_FORMAT};

/// Unvalidated submission, exactly as received from the form or CLI
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSubmission {
    #[serde(default)]
    pub event_topic: String,
    #[serde(default)]
    pub event_description: String,
    #[serde(default)]
    pub event_city: String,
    #[serde(default)]
    pub tentative_date: String,
    #[serde(default)]
    pub expected_participants: String,
    #[serde(default)]
    pub budget: String,
    #[serde(default)]
    pub venue_type: String,
    #[serde(default)]
    pub openai_api_key: String,
    #[serde(default)]
    pub serper_api_key: String,
}

/// Limits applied on top of the basic field rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRules {
    /// Smallest accepted participant count (never below 1)
    pub min_participants: u32,

    /// Smallest accepted budget; `None` means any positive amount
    pub min_budget: Option<f64>,

    /// Only accept the fixed venue type choices
    pub restrict_venue_types: bool,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            min_participants: 1,
            min_budget: None,
            restrict_venue_types: false,
        }
    }
}

impl ValidationRules {
    /// Rules matching the select/number widget form
    pub fn widget() -> Self {
        Self {
            min_participants: 10,
            min_budget: Some(10_000.0),
            restrict_venue_types: true,
        }
    }
}

/// Form fields, for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    EventTopic,
    EventDescription,
    EventCity,
    TentativeDate,
    ExpectedParticipants,
    Budget,
    VenueType,
    OpenaiApiKey,
    SerperApiKey,
}

impl Field {
    /// Label shown next to the input
    pub fn label(&self) -> &'static str {
        match self {
            Self::EventTopic => "Event Topic",
            Self::EventDescription => "Event Description",
            Self::EventCity => "City",
            Self::TentativeDate => "Event Date",
            Self::ExpectedParticipants => "Expected Participants",
            Self::Budget => "Budget",
            Self::VenueType => "Preferred Venue Type",
            Self::OpenaiApiKey => "OpenAI API Key",
            Self::SerperApiKey => "Serper API Key",
        }
    }
}

/// A single violated rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    fn required(field: Field) -> Self {
        Self::new(field, format!("{} is required.", field.label()))
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Every rule a submission violated, in form order
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid submission: {}", messages(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

fn messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Message for a specific field, if it failed
    pub fn for_field(&self, field: Field) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

/// A submission that passed every rule
#[derive(Debug, Clone)]
pub struct ValidatedSubmission {
    pub request: EventRequest,
    pub credentials: Credentials,
}

/// Validate a raw submission against the rules
///
/// `model` is the chat model name placed in the resulting credentials.
pub fn validate(
    raw: &RawSubmission,
    rules: &ValidationRules,
    model: &str,
) -> Result<ValidatedSubmission, ValidationErrors> {
    let mut errors = Vec::new();

    let topic = required_text(&raw.event_topic, Field::EventTopic, &mut errors);
    let description = required_text(&raw.event_description, Field::EventDescription, &mut errors);
    let city = required_text(&raw.event_city, Field::EventCity, &mut errors);
    let date = collect(parse_date(&raw.tentative_date), &mut errors);
    let participants = collect(parse_participants(&raw.expected_participants, rules), &mut errors);
    let budget = collect(parse_budget(&raw.budget, rules), &mut errors);
    let venue_type = collect(parse_venue_type(&raw.venue_type, rules), &mut errors);
    let model_key = required_text(&raw.openai_api_key, Field::OpenaiApiKey, &mut errors);
    let search_key = required_text(&raw.serper_api_key, Field::SerperApiKey, &mut errors);

    match (
        topic,
        description,
        city,
        date,
        participants,
        budget,
        venue_type,
        model_key,
        search_key,
    ) {
        (
            Some(topic),
            Some(description),
            Some(city),
            Some(date),
            Some(expected_participants),
            Some(budget),
            Some(venue_type),
            Some(model_key),
            Some(search_key),
        ) if errors.is_empty() => Ok(ValidatedSubmission {
            request: EventRequest {
                topic,
                description,
                city,
                date,
                expected_participants,
                budget,
                venue_type,
            },
            credentials: Credentials::new(model_key, search_key, model),
        }),
        _ => Err(ValidationErrors(errors)),
    }
}

fn collect<T>(result: Result<T, FieldError>, errors: &mut Vec<FieldError>) -> Option<T> {
    result.map_err(|e| errors.push(e)).ok()
}

fn required_text(value: &str, field: Field, errors: &mut Vec<FieldError>) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(FieldError::required(field));
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse `YYYY-MM-DD`
pub fn parse_date(value: &str) -> Result<NaiveDate, FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::required(Field::TentativeDate));
    }

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| {
        FieldError::new(
            Field::TentativeDate,
            "Event Date must be a valid date (YYYY-MM-DD).",
        )
    })
}

/// Parse a whole, positive participant count
///
/// Only ASCII digits are accepted, so signs and decimal points are rejected
/// as "not a whole number" rather than as out of range.
pub fn parse_participants(value: &str, rules: &ValidationRules) -> Result<u32, FieldError> {
    let field = Field::ExpectedParticipants;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::required(field));
    }

    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FieldError::new(
            field,
            "Expected Participants must be a whole number.",
        ));
    }

    let count: u32 = trimmed.parse().map_err(|_| {
        FieldError::new(field, "Expected Participants is too large.")
    })?;

    if count == 0 {
        return Err(FieldError::new(
            field,
            "Expected participants must be greater than 0.",
        ));
    }

    if count < rules.min_participants {
        return Err(FieldError::new(
            field,
            format!(
                "Expected participants must be at least {}.",
                rules.min_participants
            ),
        ));
    }

    Ok(count)
}

/// Parse a positive decimal budget
pub fn parse_budget(value: &str, rules: &ValidationRules) -> Result<f64, FieldError> {
    let field = Field::Budget;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::required(field));
    }

    let budget = trimmed
        .parse::<f64>()
        .ok()
        .filter(|b| b.is_finite())
        .ok_or_else(|| {
            FieldError::new(field, "Budget must be a valid number (e.g., 1000 or 1000.50).")
        })?;

    if budget <= 0.0 {
        return Err(FieldError::new(field, "Budget must be greater than 0."));
    }

    if let Some(min) = rules.min_budget {
        if budget < min {
            return Err(FieldError::new(
                field,
                format!("Budget must be at least {}.", min),
            ));
        }
    }

    Ok(budget)
}

/// Parse the venue type, enforcing the fixed choices when configured
pub fn parse_venue_type(value: &str, rules: &ValidationRules) -> Result<VenueType, FieldError> {
    let field = Field::VenueType;
    if value.trim().is_empty() {
        return Err(FieldError::required(field));
    }

    let venue_type = VenueType::parse(value);
    if rules.restrict_venue_types && !venue_type.is_choice() {
        let choices = VenueType::CHOICES
            .iter()
            .map(VenueType::label)
            .collect::<Vec<_>>()
            .join(", ");
        return Err(FieldError::new(
            field,
            format!("{} must be one of: {}.", field.label(), choices),
        ));
    }

    Ok(venue_type)
}
