//! Task descriptions for the three planning sub-tasks.
//!
//! Pure templating over a validated `EventRequest`: the same request always
//! yields the same tasks.

use serde_json::{json, Value};

use crate::domain::{AgentRole, ArtifactKind, EventRequest, TaskSpec};

/// Task name for the venue search
pub const VENUE_TASK: &str = "venue";
/// Task name for catering and equipment
pub const LOGISTICS_TASK: &str = "logistics";
/// Task name for the marketing plan
pub const MARKETING_TASK: &str = "marketing";

/// Build all three tasks in submission order
pub fn build_tasks(request: &EventRequest) -> Vec<TaskSpec> {
    vec![
        venue_task(request),
        logistics_task(request),
        marketing_task(request),
    ]
}

pub fn venue_task(request: &EventRequest) -> TaskSpec {
    TaskSpec {
        name: VENUE_TASK.to_string(),
        description: format!(
            "Find a venue in {city} suitable for hosting a {topic}. \
             The venue must support at least {participants} participants, \
             stay within the budget of {budget}, be available on {date}, \
             and have appropriate tech facilities. \
             Return only one most suitable venue as structured JSON.",
            city = request.city,
            topic = request.topic,
            participants = request.expected_participants,
            budget = request.budget_string(),
            date = request.date_string(),
        ),
        expected_output: "Return the venue's name, address, capacity, and booking_status."
            .to_string(),
        output_schema: Some(venue_schema()),
        output_file: Some(ArtifactKind::Venue.file_name().to_string()),
        agent: AgentRole::VenueCoordinator,
    }
}

pub fn logistics_task(request: &EventRequest) -> TaskSpec {
    TaskSpec {
        name: LOGISTICS_TASK.to_string(),
        description: format!(
            "Arrange catering and equipment for an event happening on {date} with \
             {participants} participants. Ensure all logistics are confirmed and documented.",
            date = request.date_string(),
            participants = request.expected_participants,
        ),
        expected_output: "Confirmation of all arrangements for food, seating, projectors, \
                          mics, and stage setup."
            .to_string(),
        output_schema: None,
        output_file: None,
        agent: AgentRole::LogisticsManager,
    }
}

pub fn marketing_task(request: &EventRequest) -> TaskSpec {
    TaskSpec {
        name: MARKETING_TASK.to_string(),
        description: format!(
            "Plan a marketing campaign to promote the {topic} in {city} aiming to reach \
             at least {participants} people. Suggest at least 3 channels \
             (e.g., Facebook, local radio, WhatsApp groups).",
            topic = request.topic,
            city = request.city,
            participants = request.expected_participants,
        ),
        expected_output: "Return summary, campaign list, and estimated audience reach."
            .to_string(),
        output_schema: Some(marketing_schema()),
        output_file: Some(ArtifactKind::Marketing.file_name().to_string()),
        agent: AgentRole::MarketingCommunications,
    }
}

/// JSON Schema for `VenueDetails`
pub fn venue_schema() -> Value {
    json!({
        "title": "VenueDetails",
        "type": "object",
        "properties": {
            "name": { "type": "string" },
            "address": { "type": "string" },
            "capacity": { "type": "integer" },
            "booking_status": { "type": "string" }
        },
        "required": ["name", "address", "capacity", "booking_status"]
    })
}

/// JSON Schema for `MarketingReport`
pub fn marketing_schema() -> Value {
    json!({
        "title": "MarketingReport",
        "type": "object",
        "properties": {
            "summary": { "type": "string" },
            "campaigns": { "type": "array", "items": { "type": "string" } },
            "estimated_reach": { "type": "integer" }
        },
        "required": ["summary", "campaigns", "estimated_reach"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VenueType;
    use chrono::NaiveDate;

    fn request() -> EventRequest {
        EventRequest {
            topic: "AI Summit".to_string(),
            description: "Two-day summit".to_string(),
            city: "Lagos".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            expected_participants: 300,
            budget: 25000.0,
            venue_type: VenueType::ConferenceHall,
        }
    }

    #[test]
    fn test_venue_description() {
        let task = venue_task(&request());

        assert_eq!(
            task.description,
            "Find a venue in Lagos suitable for hosting a AI Summit. \
             The venue must support at least 300 participants, stay within the budget of 25000.0, \
             be available on 2026-03-14, and have appropriate tech facilities. \
             Return only one most suitable venue as structured JSON."
        );
        assert_eq!(task.output_file.as_deref(), Some("venue_details.json"));
        assert_eq!(task.agent, AgentRole::VenueCoordinator);
        assert!(task.is_structured());
    }

    #[test]
    fn test_venue_description_budget_format() {
        let mut request = request();
        request.budget = 1000.5;

        assert!(venue_task(&request)
            .description
            .contains("stay within the budget of 1000.5, be available"));
    }

    #[test]
    fn test_logistics_task_is_unstructured() {
        let task = logistics_task(&request());

        assert!(task.description.contains("2026-03-14"));
        assert!(task.description.contains("300 participants"));
        assert!(!task.is_structured());
        assert!(task.output_file.is_none());
    }

    #[test]
    fn test_marketing_task() {
        let task = marketing_task(&request());

        assert!(task
            .description
            .starts_with("Plan a marketing campaign to promote the AI Summit in Lagos"));
        assert!(task.description.contains("at least 300 people"));
        assert_eq!(task.output_file.as_deref(), Some("marketing_report.json"));
        assert_eq!(
            task.output_schema.as_ref().unwrap()["required"],
            json!(["summary", "campaigns", "estimated_reach"])
        );
    }

    #[test]
    fn test_build_tasks_is_deterministic() {
        let first = build_tasks(&request());
        let second = build_tasks(&request());

        assert_eq!(first, second);
        let names: Vec<_> = first.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, [VENUE_TASK, LOGISTICS_TASK, MARKETING_TASK]);
    }
}
