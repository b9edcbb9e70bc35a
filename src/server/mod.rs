//! Web form front end.
//!
//! Routes:
//! - `GET /`: planning form
//! - `POST /plan`: validate, run the crew, render the results
//! - `GET /runs/:run_id/:file`: download a raw artifact
//! - `GET /healthz`: liveness probe
//!
//! Every submission gets its own artifact directory under
//! `<output_dir>/runs/<run_id>/`, and its credentials live only in the
//! request, so concurrent submissions never share state.

pub mod html;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::core::validation::{validate, RawSubmission, ValidationRules};
use crate::core::{render, Planner};
use crate::domain::ArtifactKind;

use html::{FailurePage, FormPage, ReportPage};

/// Shared state of the web app
pub struct AppState {
    pub planner: Planner,
    pub output_dir: PathBuf,
    pub rules: ValidationRules,
    pub model: String,
}

impl AppState {
    /// Artifact directory of a run
    pub fn run_dir(&self, run_id: Uuid) -> PathBuf {
        self.output_dir.join("runs").join(run_id.to_string())
    }
}

/// Build the router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(show_form))
        .route("/plan", post(submit_plan))
        .route("/runs/:run_id/:file", get(download_artifact))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn serve(address: &str, state: AppState) -> Result<()> {
    let addr: SocketAddr = address
        .parse()
        .with_context(|| format!("Invalid bind address: {}", address))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(%addr, engine = %state.planner.engine_name(), "Event planner listening");

    axum::serve(listener, build_router(Arc::new(state)))
        .await
        .context("Server error")
}

async fn healthz() -> &'static str {
    "ok"
}

async fn show_form(State(state): State<Arc<AppState>>) -> FormPage {
    FormPage::new(&RawSubmission::default(), None, &state.rules)
}

async fn submit_plan(
    State(state): State<Arc<AppState>>,
    Form(raw): Form<RawSubmission>,
) -> Response {
    let validated = match validate(&raw, &state.rules, &state.model) {
        Ok(validated) => validated,
        Err(errors) => {
            info!(errors = errors.errors().len(), "Rejected invalid submission");
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                FormPage::new(&raw, Some(&errors), &state.rules),
            )
                .into_response();
        }
    };

    let run_id = Uuid::new_v4();
    let run_dir = state.run_dir(run_id);
    info!(%run_id, "Starting planning run");

    let output = match state
        .planner
        .kickoff(&validated.request, &validated.credentials, run_dir.clone())
        .await
    {
        Ok(output) => output,
        Err(e) => {
            let message = format!("{:#}", e);
            error!(%run_id, error = %message, "Planning run failed");
            return (StatusCode::BAD_GATEWAY, FailurePage { message }).into_response();
        }
    };

    let report = render(&run_dir, Some(&output));
    ReportPage::new(run_id, &report).into_response()
}

async fn download_artifact(
    State(state): State<Arc<AppState>>,
    Path((run_id, file)): Path<(Uuid, String)>,
) -> Response {
    let Some(kind) = ArtifactKind::from_file_name(&file) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let path = kind.path_in(&state.run_dir(run_id));
    match tokio::fs::read(&path).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "application/json".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", kind.file_name()),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            warn!(%run_id, path = %path.display(), error = %e, "Artifact download failed");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

#[cfg(test)]
mod tests;
