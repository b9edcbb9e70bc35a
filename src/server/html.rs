//! HTML pages for the web form, rendered with askama.
//!
//! Templates live in `templates/` and escape every interpolated value.

use askama::Template;
use uuid::Uuid;

use crate::core::validation::{Field, RawSubmission, ValidationErrors, ValidationRules};
use crate::core::{Report, Section, TaskSummary};
use crate::domain::{ArtifactKind, MarketingReport, VenueDetails, VenueType};

/// One `<option>` of the venue type select
pub struct SelectOption {
    pub label: String,
    pub selected: bool,
}

/// One labelled form control
pub struct FormField {
    pub name: String,
    pub label: &'static str,
    /// `text`, `password`, `date`, `number`, `textarea` or `select`
    pub kind: &'static str,
    pub value: String,
    pub min: Option<String>,
    pub step_any: bool,
    pub placeholder: Option<&'static str>,
    pub options: Vec<SelectOption>,
    pub error: Option<String>,
}

impl FormField {
    fn new(field: Field, kind: &'static str, value: &str, errors: Option<&ValidationErrors>) -> Self {
        Self {
            name: field_name(field),
            label: field.label(),
            kind,
            value: value.to_string(),
            min: None,
            step_any: false,
            placeholder: None,
            options: Vec::new(),
            error: errors
                .and_then(|e| e.for_field(field))
                .map(str::to_string),
        }
    }

    fn min(mut self, min: impl ToString) -> Self {
        self.min = Some(min.to_string());
        self
    }

    fn step_any(mut self) -> Self {
        self.step_any = true;
        self
    }

    fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }
}

/// The planning form, optionally pre-filled and annotated with errors
///
/// API keys are never echoed back.
#[derive(Template)]
#[template(path = "form.html")]
pub struct FormPage {
    pub errors: Vec<String>,
    pub api_fields: Vec<FormField>,
    pub event_fields: Vec<FormField>,
}

impl FormPage {
    pub fn new(
        values: &RawSubmission,
        errors: Option<&ValidationErrors>,
        rules: &ValidationRules,
    ) -> Self {
        let api_fields = vec![
            FormField::new(Field::OpenaiApiKey, "password", "", errors),
            FormField::new(Field::SerperApiKey, "password", "", errors),
        ];

        let mut event_fields = vec![
            FormField::new(Field::EventTopic, "text", &values.event_topic, errors),
            FormField::new(
                Field::EventDescription,
                "textarea",
                &values.event_description,
                errors,
            ),
            FormField::new(Field::EventCity, "text", &values.event_city, errors),
            FormField::new(Field::TentativeDate, "date", &values.tentative_date, errors),
        ];

        if rules.restrict_venue_types {
            event_fields.push(
                FormField::new(
                    Field::ExpectedParticipants,
                    "number",
                    &values.expected_participants,
                    errors,
                )
                .min(rules.min_participants),
            );

            let budget = FormField::new(Field::Budget, "number", &values.budget, errors).step_any();
            event_fields.push(match rules.min_budget {
                Some(min) => budget.min(min),
                None => budget,
            });

            let selected = VenueType::parse(&values.venue_type);
            let mut venue = FormField::new(Field::VenueType, "select", "", errors);
            venue.options = VenueType::CHOICES
                .iter()
                .map(|choice| SelectOption {
                    label: choice.label().to_string(),
                    selected: *choice == selected,
                })
                .collect();
            event_fields.push(venue);
        } else {
            event_fields.extend([
                FormField::new(
                    Field::ExpectedParticipants,
                    "text",
                    &values.expected_participants,
                    errors,
                )
                .placeholder("Enter the Expected Participants"),
                FormField::new(Field::Budget, "text", &values.budget, errors)
                    .placeholder("Enter your Budget"),
                FormField::new(Field::VenueType, "text", &values.venue_type, errors)
                    .placeholder("e.g., Hotel, Banquet Hall, Outdoor, etc."),
            ]);
        }

        Self {
            errors: errors
                .map(|e| e.errors().iter().map(|e| e.message.clone()).collect())
                .unwrap_or_default(),
            api_fields,
            event_fields,
        }
    }
}

fn field_name(field: Field) -> String {
    // serde's snake_case names double as form field names
    serde_json::to_value(field)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

/// Warning or error shown in place of an artifact
pub struct Notice {
    pub class: &'static str,
    pub text: String,
}

fn split_section<T: Clone>(section: &Section<T>) -> (Option<T>, Option<Notice>) {
    match section {
        Section::Loaded { value, .. } => (Some(value.clone()), None),
        Section::Missing { warning } => (
            None,
            Some(Notice {
                class: "warning",
                text: warning.clone(),
            }),
        ),
        Section::Failed { error } => (
            None,
            Some(Notice {
                class: "error",
                text: error.clone(),
            }),
        ),
    }
}

/// The result page of a completed run
#[derive(Template)]
#[template(path = "report.html")]
pub struct ReportPage {
    pub run_id: Uuid,
    pub venue: Option<VenueDetails>,
    pub venue_notice: Option<Notice>,
    pub venue_file: &'static str,
    pub marketing: Option<MarketingReport>,
    pub marketing_notice: Option<Notice>,
    pub marketing_file: &'static str,
    pub tasks: Vec<TaskSummary>,
}

impl ReportPage {
    pub fn new(run_id: Uuid, report: &Report) -> Self {
        let (venue, venue_notice) = split_section(&report.venue);
        let (marketing, marketing_notice) = split_section(&report.marketing);

        Self {
            run_id,
            venue,
            venue_notice,
            venue_file: ArtifactKind::Venue.file_name(),
            marketing,
            marketing_notice,
            marketing_file: ArtifactKind::Marketing.file_name(),
            tasks: report.tasks.clone(),
        }
    }
}

/// Page shown when the planning run itself failed
#[derive(Template)]
#[template(path = "failure.html")]
pub struct FailurePage {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> Report {
        Report {
            venue: Section::Loaded {
                value: VenueDetails {
                    name: "Hall <A> & \"B\"".to_string(),
                    address: "123 Main St".to_string(),
                    capacity: 200,
                    booking_status: "Confirmed".to_string(),
                },
                raw: String::new(),
            },
            marketing: Section::Failed {
                error: "Error loading marketing report: missing field `summary`".to_string(),
            },
            tasks: vec![TaskSummary {
                agent: "Venue Coordinator".to_string(),
                description: "Find a venue...".to_string(),
                summary: "<script>alert(1)</script>".to_string(),
            }],
        }
    }

    #[test]
    fn test_field_names_match_form_keys() {
        assert_eq!(field_name(Field::EventTopic), "event_topic");
        assert_eq!(field_name(Field::OpenaiApiKey), "openai_api_key");
        assert_eq!(field_name(Field::TentativeDate), "tentative_date");
    }

    #[test]
    fn test_form_never_echoes_keys() {
        let values = RawSubmission {
            event_topic: "Meetup".to_string(),
            openai_api_key: "sk-secret".to_string(),
            ..Default::default()
        };
        let html = FormPage::new(&values, None, &ValidationRules::default())
            .render()
            .unwrap();

        assert!(html.contains("value=\"Meetup\""));
        assert!(!html.contains("sk-secret"));
        assert!(html.contains("placeholder=\"Enter your Budget\""));
    }

    #[test]
    fn test_form_escapes_submitted_values() {
        let values = RawSubmission {
            event_topic: "\"><b>x</b>".to_string(),
            ..Default::default()
        };
        let html = FormPage::new(&values, None, &ValidationRules::default())
            .render()
            .unwrap();

        assert!(!html.contains("<b>x</b>"));
        assert!(html.contains("&lt;b&gt;"));
    }

    #[test]
    fn test_widget_form_uses_select() {
        let values = RawSubmission {
            venue_type: "hotel".to_string(),
            ..Default::default()
        };
        let html = FormPage::new(&values, None, &ValidationRules::widget())
            .render()
            .unwrap();

        assert!(html.contains("<select id=\"venue_type\""));
        assert!(html.contains("<option value=\"University Campus\">"));
        assert!(html.contains("<option value=\"Hotel\" selected>"));
        assert!(html.contains("min=\"10\""));
        assert!(html.contains("min=\"10000\" step=\"any\""));
    }

    #[test]
    fn test_form_lists_errors() {
        let raw = RawSubmission {
            expected_participants: "abc".to_string(),
            ..Default::default()
        };
        let errors = crate::core::validate(&raw, &ValidationRules::default(), "m").unwrap_err();
        let html = FormPage::new(&raw, Some(&errors), &ValidationRules::default())
            .render()
            .unwrap();

        assert!(html.contains("<li>Expected Participants must be a whole number.</li>"));
        assert!(html.contains("<span class=\"error\">Event Topic is required.</span>"));
    }

    #[test]
    fn test_report_escapes_engine_text() {
        let run_id = Uuid::new_v4();
        let html = ReportPage::new(run_id, &sample_report()).render().unwrap();

        assert!(html.contains("<dd>Hall &lt;A&gt; &amp; &quot;B&quot;</dd>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains(&format!("/runs/{}/venue_details.json", run_id)));
        assert!(!html.contains("marketing_report.json"));
        assert!(html.contains("<p class=\"error\">Error loading marketing report"));
    }

    #[test]
    fn test_failure_page_escapes_message() {
        let html = FailurePage {
            message: "bad <gateway>".to_string(),
        }
        .render()
        .unwrap();

        assert!(html.contains("Event planning failed: bad &lt;gateway&gt;"));
    }
}
