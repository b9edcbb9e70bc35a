use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{body, body::Body, http::Request};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::adapters::{Engine, KickoffContext};
use crate::domain::{Crew, CrewOutput, TaskOutput};

const VENUE_JSON: &str = "{\n  \"name\": \"Grand Hall\",\n  \"address\": \"123 Main St\",\n  \"capacity\": 200,\n  \"booking_status\": \"Confirmed\"\n}";

/// Writes only the venue artifact and counts calls
struct VenueOnlyEngine {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Engine for VenueOnlyEngine {
    fn name(&self) -> &str {
        "venue-only"
    }

    async fn submit(&self, crew: &Crew, ctx: &KickoffContext) -> anyhow::Result<CrewOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::fs::create_dir_all(&ctx.artifact_dir).await?;
        tokio::fs::write(ctx.artifact_dir.join("venue_details.json"), VENUE_JSON).await?;

        Ok(CrewOutput {
            raw: "done".to_string(),
            tasks_output: crew
                .tasks
                .iter()
                .map(|t| TaskOutput {
                    agent: Some(t.agent.title().to_string()),
                    description: t.description.clone(),
                    summary: Some(format!("{} <done>", t.name)),
                    ..Default::default()
                })
                .collect(),
            tokens_used: None,
        })
    }
}

struct FailingEngine;

#[async_trait]
impl Engine for FailingEngine {
    fn name(&self) -> &str {
        "failing"
    }

    async fn submit(&self, _crew: &Crew, _ctx: &KickoffContext) -> anyhow::Result<CrewOutput> {
        anyhow::bail!("model backend unreachable")
    }
}

fn test_app(engine: Arc<dyn Engine>, output_dir: &std::path::Path) -> Router {
    build_router(Arc::new(AppState {
        planner: Planner::new(engine),
        output_dir: output_dir.to_path_buf(),
        rules: ValidationRules::default(),
        model: "gpt-3.5-turbo".to_string(),
    }))
}

fn form_body(participants: &str) -> String {
    format!(
        "event_topic=Rust+Meetup&event_description=Monthly+meetup&event_city=Berlin\
         &tentative_date=2026-11-05&expected_participants={}&budget=1000.50\
         &venue_type=Hotel&openai_api_key=sk-test&serper_api_key=serper-test",
        participants
    )
}

fn post_plan(body: String) -> Request<Body> {
    Request::post("/plan")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .expect("request")
}

async fn body_string(response: Response) -> String {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8")
}

#[tokio::test]
async fn healthz_reports_ok() {
    let temp = TempDir::new().unwrap();
    let app = test_app(Arc::new(FailingEngine), temp.path());

    let response = app
        .oneshot(Request::get("/healthz").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn form_page_renders() {
    let temp = TempDir::new().unwrap();
    let app = test_app(Arc::new(FailingEngine), temp.path());

    let response = app
        .oneshot(Request::get("/").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let html = body_string(response).await;
    assert!(html.contains("<form method=\"post\" action=\"/plan\">"));
    assert!(html.contains("name=\"serper_api_key\""));
}

#[tokio::test]
async fn invalid_submission_never_reaches_engine() {
    let temp = TempDir::new().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let app = test_app(
        Arc::new(VenueOnlyEngine {
            calls: calls.clone(),
        }),
        temp.path(),
    );

    let response = app.oneshot(post_plan(form_body("abc"))).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let html = body_string(response).await;
    assert!(html.contains("Expected Participants must be a whole number."));
    assert!(html.contains("value=\"Rust Meetup\""));
    assert!(!html.contains("sk-test"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn valid_submission_renders_report_and_download() {
    let temp = TempDir::new().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let app = test_app(
        Arc::new(VenueOnlyEngine {
            calls: calls.clone(),
        }),
        temp.path(),
    );

    let response = app
        .clone()
        .oneshot(post_plan(form_body("120")))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let html = body_string(response).await;
    assert!(html.contains("<dd>Grand Hall</dd>"));
    assert!(html.contains("<dd>123 Main St</dd>"));
    assert!(html.contains("<dd>200</dd>"));
    assert!(html.contains("<dd>Confirmed</dd>"));
    assert!(html.contains("Marketing report file not found."));
    assert!(html.contains("venue &lt;done&gt;"));

    let start = html.find("/runs/").expect("download link");
    let link: String = html[start..]
        .chars()
        .take_while(|c| *c != '"')
        .collect();
    assert!(link.ends_with("/venue_details.json"));

    let download = app
        .oneshot(Request::get(link.as_str()).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(download.status(), StatusCode::OK);
    assert_eq!(
        download.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"venue_details.json\""
    );
    assert_eq!(body_string(download).await, VENUE_JSON);
}

#[tokio::test]
async fn engine_failure_is_reported() {
    let temp = TempDir::new().unwrap();
    let app = test_app(Arc::new(FailingEngine), temp.path());

    let response = app.oneshot(post_plan(form_body("120"))).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let html = body_string(response).await;
    assert!(html.contains("model backend unreachable"));
}

#[tokio::test]
async fn unknown_artifact_is_not_found() {
    let temp = TempDir::new().unwrap();
    let app = test_app(Arc::new(FailingEngine), temp.path());

    let uri = format!("/runs/{}/secrets.json", Uuid::new_v4());
    let response = app
        .oneshot(Request::get(uri.as_str()).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
