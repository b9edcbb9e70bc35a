//! Event planning request submitted through the form or CLI.
//!
//! An `EventRequest` only exists once validation has passed, so every
//! value it holds already satisfies the field rules.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Date format used in task descriptions and the inputs map
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A validated event planning request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRequest {
    /// Event topic (e.g. "Rust Meetup")
    pub topic: String,

    /// Free-form description of the event
    pub description: String,

    /// City the event takes place in
    pub city: String,

    /// Tentative event date
    pub date: NaiveDate,

    /// Expected number of participants (>= 1)
    pub expected_participants: u32,

    /// Budget (> 0)
    pub budget: f64,

    /// Preferred venue type
    pub venue_type: VenueType,
}

impl EventRequest {
    /// Date rendered as `YYYY-MM-DD`
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// Budget as shown in task descriptions
    ///
    /// Whole amounts keep one decimal place (`25000.0`), others print as-is.
    pub fn budget_string(&self) -> String {
        if self.budget.fract() == 0.0 {
            format!("{:.1}", self.budget)
        } else {
            self.budget.to_string()
        }
    }

    /// Keyed substitution map handed to the engine at kickoff
    pub fn inputs(&self) -> BTreeMap<String, Value> {
        let mut inputs = BTreeMap::new();
        inputs.insert("event_topic".to_string(), Value::from(self.topic.clone()));
        inputs.insert(
            "event_description".to_string(),
            Value::from(self.description.clone()),
        );
        inputs.insert("event_city".to_string(), Value::from(self.city.clone()));
        inputs.insert("tentative_date".to_string(), Value::from(self.date_string()));
        inputs.insert(
            "expected_participants".to_string(),
            Value::from(self.expected_participants),
        );
        inputs.insert("budget".to_string(), Value::from(self.budget));
        inputs.insert(
            "venue_type".to_string(),
            Value::from(self.venue_type.to_string()),
        );
        inputs
    }
}

/// Preferred venue type
///
/// The widget form restricts the choice to the fixed variants; the free-text
/// form accepts anything and keeps it as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum VenueType {
    ConferenceHall,
    Auditorium,
    Outdoor,
    Hotel,
    UniversityCampus,
    Other(String),
}

impl VenueType {
    /// The fixed choices offered by the select widget, in display order
    pub const CHOICES: [VenueType; 5] = [
        VenueType::ConferenceHall,
        VenueType::Auditorium,
        VenueType::Outdoor,
        VenueType::Hotel,
        VenueType::UniversityCampus,
    ];

    /// Display label
    pub fn label(&self) -> &str {
        match self {
            Self::ConferenceHall => "Conference Hall",
            Self::Auditorium => "Auditorium",
            Self::Outdoor => "Outdoor",
            Self::Hotel => "Hotel",
            Self::UniversityCampus => "University Campus",
            Self::Other(value) => value,
        }
    }

    /// Parse a label, matching the fixed choices case-insensitively
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        Self::CHOICES
            .iter()
            .find(|choice| choice.label().eq_ignore_ascii_case(trimmed))
            .cloned()
            .unwrap_or_else(|| Self::Other(trimmed.to_string()))
    }

    /// Whether this is one of the fixed choices
    pub fn is_choice(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for VenueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for VenueType {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<VenueType> for String {
    fn from(value: VenueType) -> Self {
        value.label().to_string()
    }
}
